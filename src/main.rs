use clap::{
    Parser,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};

use phraselist::{cli, config, error};

fn styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::White.on_default() | Effects::BOLD)
        .usage(AnsiColor::White.on_default() | Effects::BOLD)
        .literal(AnsiColor::BrightBlue.on_default())
        .placeholder(AnsiColor::BrightGreen.on_default())
}

#[derive(Parser, Debug, Clone)]
#[clap(
  version = env!("CARGO_PKG_VERSION"),
  name=env!("CARGO_PKG_NAME"),
  bin_name=env!("CARGO_PKG_NAME"),
  about=env!("CARGO_PKG_DESCRIPTION"),
  styles=styles(),
)]
struct Cli {
    /// Phrase to spell out with track titles
    phrase: String,

    /// Name of the playlist to create
    playlist_name: String,

    /// Spotify user id that owns the playlist (overrides SPOTIFY_USER_ID)
    #[clap(long)]
    user: Option<String>,

    /// Print URLs instead of opening them in the browser
    #[clap(long)]
    no_browser: bool,

    /// Keep tracks in the order they were matched (last words first)
    #[clap(long)]
    keep_discovery_order: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    if let Err(e) = config::load_env().await {
        error!("Cannot load environment. Err: {}", e);
    }

    let args = Cli::parse();

    let opts = cli::PipelineOptions {
        phrase: args.phrase,
        playlist_name: args.playlist_name,
        user: args.user,
        open_browser: !args.no_browser,
        keep_discovery_order: args.keep_discovery_order,
    };

    if let Err(e) = cli::run(opts).await {
        error!("{}", e);
    }
}
