use tabled::Table;

use crate::{
    Res,
    config::Settings,
    credentials::Credentials,
    info,
    phrase::Phrase,
    resolver::{self, Resolution},
    spotify::{self, SpotifyContext},
    success,
    types::{Track, TrackTableRow},
    utils, warning,
};

#[derive(Debug, Clone)]
pub struct PipelineOptions {
    pub phrase: String,
    pub playlist_name: String,
    pub user: Option<String>,
    pub open_browser: bool,
    pub keep_discovery_order: bool,
}

pub async fn run(opts: PipelineOptions) -> Res<()> {
    let mut settings = Settings::from_env()?;
    if opts.user.is_some() {
        settings.user_id = opts.user.clone();
    }
    let owner = settings.require_user_id()?.to_string();
    let credentials = Credentials::load(&settings.credentials_path).await?;

    let phrase = Phrase::sanitize(&opts.phrase);
    if phrase.is_empty() {
        warning!("The phrase contains no usable words; the playlist will be empty.");
    }

    let client = spotify::http_client(settings.request_timeout)?;
    let pending = spotify::auth::begin_authorization(&settings, &credentials).await?;
    info!(
        "Waiting for Spotify authorization on {}",
        settings.redirect_uri
    );
    if opts.open_browser {
        utils::open_in_browser(pending.authorize_url());
    } else {
        info!("Open this URL to authorize:\n{}", pending.authorize_url());
    }

    let token = pending.complete(&client).await?;
    success!("Authentication successful!");

    let ctx = SpotifyContext::new(client, &settings.api_url, token)
        .with_page_size(settings.search_page_size)
        .with_progress(utils::spinner("Resolving phrase..."));

    let resolution = resolver::resolve(&ctx, &phrase).await;
    ctx.progress().finish_and_clear();
    let resolution = resolution?;

    report(&resolution);
    let tracks = if opts.keep_discovery_order {
        resolution.discovered().to_vec()
    } else {
        resolution.in_phrase_order()
    };

    info!("Creating playlist...");
    let playlist =
        spotify::playlist::create(&ctx, &owner, &opts.playlist_name, &phrase.description())
            .await?;
    success!("Playlist '{}' created.", opts.playlist_name);

    if tracks.is_empty() {
        warning!("No tracks to add.");
    } else {
        info!("Adding songs to playlist...");
        if let Err(e) = spotify::playlist::add_tracks(&ctx, &playlist.id, &tracks).await {
            warning!(
                "Playlist was created but tracks could not be added: {}",
                playlist.url
            );
            return Err(e.into());
        }
        success!("Added {} tracks.", tracks.len());
    }

    println!("{}", playlist.url);
    if opts.open_browser {
        utils::open_in_browser(&playlist.url);
    }

    Ok(())
}

fn report(resolution: &Resolution) {
    if resolution.is_complete() {
        success!(
            "All songs found! ({} searches, {} cached)",
            resolution.remote_searches(),
            resolution.cache_hits()
        );
    } else {
        warning!(
            "Could not resolve '{}'; dropping it.",
            resolution.dropped().join(" ")
        );
    }

    if !resolution.is_empty() {
        println!("{}", Table::new(table_rows(&resolution.in_phrase_order())));
    }
}

fn table_rows(tracks: &[Track]) -> Vec<TrackTableRow> {
    tracks
        .iter()
        .enumerate()
        .map(|(i, t)| TrackTableRow {
            position: i + 1,
            title: t.name.clone(),
            artist: t.primary_artist().to_string(),
            uri: t.uri.clone(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TrackArtist;

    #[test]
    fn table_rows_are_numbered_from_one() {
        let tracks = vec![
            Track {
                id: Some("1".into()),
                name: "Good Life".into(),
                uri: "spotify:track:1".into(),
                artists: vec![TrackArtist {
                    id: None,
                    name: "Kanye West".into(),
                }],
            },
            Track {
                id: Some("2".into()),
                name: "Happy".into(),
                uri: "spotify:track:2".into(),
                artists: vec![],
            },
        ];

        let rows = table_rows(&tracks);
        assert_eq!(rows[0].position, 1);
        assert_eq!(rows[0].artist, "Kanye West");
        assert_eq!(rows[1].position, 2);
        assert_eq!(rows[1].artist, "");
    }
}
