use reqwest::StatusCode;

use crate::{
    resolver::TrackCatalog,
    spotify::{SpotifyContext, SpotifyError, ensure_success},
    success,
    types::{SearchResponse, Track},
    warning,
};

/// Fetches one page of track search results for `subphrase`.
///
/// A response without a `tracks` object counts as an empty page. Spotify
/// answers offsets beyond its search window with `400 Bad Request`; that is
/// treated as the end of the results rather than a failure.
///
/// # Errors
///
/// Transport failures, any other non-success status, and bodies that are
/// not valid search responses.
pub async fn get_page(
    ctx: &SpotifyContext,
    subphrase: &str,
    offset: u32,
) -> Result<Vec<Track>, SpotifyError> {
    let response = ctx
        .client()
        .get(ctx.endpoint("/search"))
        .bearer_auth(ctx.access_token())
        .query(&[("q", subphrase), ("type", "track")])
        .query(&[("limit", ctx.page_size()), ("offset", offset)])
        .send()
        .await?;

    if response.status() == StatusCode::BAD_REQUEST {
        return Ok(Vec::new());
    }

    let body = ensure_success(response).await?.text().await?;
    let res: SearchResponse = serde_json::from_str(&body)?;

    Ok(res
        .tracks
        .map(|page| page.items.into_iter().flatten().collect())
        .unwrap_or_default())
}

/// Pages through the catalog until a track titled exactly `subphrase`
/// (ignoring case) shows up, or a page comes back empty.
///
/// The first match in catalog order wins. There is no page limit of our own;
/// the loop ends when the service stops returning results.
pub async fn search_track(
    ctx: &SpotifyContext,
    subphrase: &str,
) -> Result<Option<Track>, SpotifyError> {
    let wanted = subphrase.to_lowercase();
    let mut offset = 0;
    let mut page = 0;

    loop {
        let items = get_page(ctx, subphrase, offset).await?;
        if items.is_empty() {
            ctx.progress()
                .suspend(|| warning!("Cannot find: '{}'", subphrase));
            return Ok(None);
        }

        page += 1;
        ctx.progress()
            .set_message(format!("Searching page {} for '{}'", page, subphrase));

        if let Some(track) = items.into_iter().find(|t| t.name.to_lowercase() == wanted) {
            ctx.progress()
                .suspend(|| success!("FOUND: {} by {}", track.name, track.primary_artist()));
            return Ok(Some(track));
        }

        offset += ctx.page_size();
    }
}

impl TrackCatalog for SpotifyContext {
    async fn search(&self, subphrase: &str) -> Result<Option<Track>, SpotifyError> {
        search_track(self, subphrase).await
    }
}
