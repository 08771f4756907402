//! Phrase-to-track resolution.
//!
//! The resolver walks the phrase from its end. On each pass it tries the
//! trailing window of up to [`MAX_WINDOW`] tokens, then shorter trailing
//! windows, until one of them is the exact title of a track. The matched
//! window is cut off and the next pass starts on what is left. A pass where
//! no window matches ends the run; the tokens still left are dropped.
//!
//! Longer windows are preferred, so a phrase that is itself a track title
//! resolves to that single track. Tokens in front of the last five are never
//! tried together with them in the same pass.
//!
//! Tracks are collected in discovery order, tail first. [`Resolution`] can
//! hand them back in phrase order as well.

use std::collections::{HashMap, HashSet};

use crate::{info, phrase::Phrase, spotify::SpotifyError, types::Track};

/// Largest window tried as one title.
pub const MAX_WINDOW: usize = 5;

/// Sub-phrases whose tracks are titled differently, usually without the
/// contraction or possessive.
pub const SUBSTITUTIONS: &[(&str, &str)] = &[("they're", "they are"), ("year's", "years")];

/// Anything that can look up a track by its exact title.
#[allow(async_fn_in_trait)]
pub trait TrackCatalog {
    /// Returns the first track whose title equals `subphrase`, ignoring case.
    async fn search(&self, subphrase: &str) -> Result<Option<Track>, SpotifyError>;
}

/// Applies [`SUBSTITUTIONS`] to a whole window.
pub fn substitute(subphrase: &str) -> &str {
    SUBSTITUTIONS
        .iter()
        .find(|(from, _)| *from == subphrase)
        .map(|(_, to)| *to)
        .unwrap_or(subphrase)
}

/// Lookups already answered during one run, keyed by the substituted window.
#[derive(Debug, Default)]
pub struct ResolutionCache {
    hits: HashMap<String, Track>,
    misses: HashSet<String>,
}

enum Cached<'a> {
    Hit(&'a Track),
    Miss,
    Unknown,
}

impl ResolutionCache {
    fn lookup(&self, key: &str) -> Cached<'_> {
        if let Some(track) = self.hits.get(key) {
            Cached::Hit(track)
        } else if self.misses.contains(key) {
            Cached::Miss
        } else {
            Cached::Unknown
        }
    }

    fn record(&mut self, key: String, found: Option<&Track>) {
        match found {
            Some(track) => {
                self.hits.insert(key, track.clone());
            }
            None => {
                self.misses.insert(key);
            }
        }
    }
}

/// Outcome of one resolution run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Resolution {
    discovered: Vec<Track>,
    dropped: Vec<String>,
    remote_searches: usize,
    cache_hits: usize,
}

impl Resolution {
    /// Tracks in the order they were matched, last phrase window first.
    pub fn discovered(&self) -> &[Track] {
        &self.discovered
    }

    /// Tracks in left-to-right phrase order.
    pub fn in_phrase_order(&self) -> Vec<Track> {
        self.discovered.iter().rev().cloned().collect()
    }

    /// Leading tokens no window could be matched for.
    pub fn dropped(&self) -> &[String] {
        &self.dropped
    }

    pub fn is_complete(&self) -> bool {
        self.dropped.is_empty()
    }

    pub fn len(&self) -> usize {
        self.discovered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.discovered.is_empty()
    }

    pub fn remote_searches(&self) -> usize {
        self.remote_searches
    }

    pub fn cache_hits(&self) -> usize {
        self.cache_hits
    }
}

/// Resolves `phrase` against `catalog` with a fresh cache.
///
/// A window with no matching title is not an error; only failures reported
/// by the catalog itself are.
pub async fn resolve<C: TrackCatalog>(
    catalog: &C,
    phrase: &Phrase,
) -> Result<Resolution, SpotifyError> {
    let mut cache = ResolutionCache::default();
    let mut resolution = Resolution::default();
    let mut remaining: &[String] = phrase.tokens();

    while !remaining.is_empty() {
        let mut matched: Option<(usize, Track)> = None;

        for size in (1..=remaining.len().min(MAX_WINDOW)).rev() {
            let window = remaining[remaining.len() - size..].join(" ");
            let key = substitute(&window).to_string();

            match cache.lookup(&key) {
                Cached::Hit(track) => {
                    info!("Using cached result for '{}'", key);
                    resolution.cache_hits += 1;
                    matched = Some((size, track.clone()));
                    break;
                }
                Cached::Miss => continue,
                Cached::Unknown => {}
            }

            resolution.remote_searches += 1;
            let found = catalog.search(&key).await?;
            cache.record(key, found.as_ref());

            if let Some(track) = found {
                matched = Some((size, track));
                break;
            }
        }

        let Some((size, track)) = matched else {
            break;
        };
        remaining = &remaining[..remaining.len() - size];
        resolution.discovered.push(track);
    }

    resolution.dropped = remaining.to_vec();
    Ok(resolution)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn substitutes_whole_windows_only() {
        assert_eq!(substitute("they're"), "they are");
        assert_eq!(substitute("year's"), "years");
        assert_eq!(substitute("they're happy"), "they're happy");
        assert_eq!(substitute("happy"), "happy");
    }

    #[test]
    fn cache_tracks_hits_and_misses() {
        let track = Track {
            id: None,
            name: "Happy".into(),
            uri: "spotify:track:1".into(),
            artists: vec![],
        };
        let mut cache = ResolutionCache::default();
        assert!(matches!(cache.lookup("happy"), Cached::Unknown));

        cache.record("happy".into(), Some(&track));
        cache.record("sad".into(), None);

        assert!(matches!(cache.lookup("happy"), Cached::Hit(t) if t == &track));
        assert!(matches!(cache.lookup("sad"), Cached::Miss));
    }
}
