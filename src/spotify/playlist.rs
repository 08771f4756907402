use reqwest::header::CONTENT_LENGTH;

use crate::{
    spotify::{SpotifyContext, SpotifyError, ensure_success},
    types::{
        AddTracksResponse, CreatePlaylistRequest, CreatePlaylistResponse, CreatedPlaylist, Track,
    },
};

/// Spotify accepts at most this many URIs per append request.
pub const MAX_TRACKS_PER_REQUEST: usize = 100;

/// Creates an empty public playlist owned by `owner_id`.
///
/// The description is the sanitized phrase, not the resolved titles.
pub async fn create(
    ctx: &SpotifyContext,
    owner_id: &str,
    name: &str,
    description: &str,
) -> Result<CreatedPlaylist, SpotifyError> {
    let request = CreatePlaylistRequest {
        name: name.to_string(),
        description: description.to_string(),
        public: true,
    };

    let response = ctx
        .client()
        .post(ctx.endpoint(&format!("/users/{}/playlists", owner_id)))
        .bearer_auth(ctx.access_token())
        .json(&request)
        .send()
        .await?;

    let body = ensure_success(response).await?.text().await?;
    let created: CreatePlaylistResponse = serde_json::from_str(&body)?;

    Ok(CreatedPlaylist {
        id: created.id,
        url: created.external_urls.spotify,
    })
}

/// Appends `tracks` to the playlist in the given order.
///
/// URIs go out as a comma-joined `uris` query parameter, in chunks of
/// [`MAX_TRACKS_PER_REQUEST`]. An empty slice sends nothing. Returns the
/// number of tracks appended.
///
/// # Errors
///
/// [`SpotifyError::AppendRejected`] when the response carries an `error`
/// object; earlier chunks stay in the playlist.
pub async fn add_tracks(
    ctx: &SpotifyContext,
    playlist_id: &str,
    tracks: &[Track],
) -> Result<usize, SpotifyError> {
    let url = ctx.endpoint(&format!("/playlists/{}/tracks", playlist_id));

    for chunk in tracks.chunks(MAX_TRACKS_PER_REQUEST) {
        let uris = chunk
            .iter()
            .map(|t| t.uri.as_str())
            .collect::<Vec<_>>()
            .join(",");

        let response = ctx
            .client()
            .post(&url)
            .bearer_auth(ctx.access_token())
            .header(CONTENT_LENGTH, 0)
            .query(&[("uris", uris)])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        match serde_json::from_str::<AddTracksResponse>(&body) {
            Ok(AddTracksResponse::Snapshot { .. }) => {}
            Ok(AddTracksResponse::Error { error }) => {
                return Err(SpotifyError::AppendRejected {
                    status: error.status,
                    message: error.message,
                });
            }
            Err(e) if status.is_success() => return Err(SpotifyError::Decode(e)),
            Err(_) => {
                return Err(SpotifyError::AppendRejected {
                    status: status.as_u16(),
                    message: body.trim().to_string(),
                });
            }
        }
    }

    Ok(tracks.len())
}
