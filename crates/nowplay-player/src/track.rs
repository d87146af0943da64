#![forbid(unsafe_code)]

//! Track metadata and player-wide types shared with the playback engine.

use serde::{Deserialize, Serialize};

/// One entry of the playback queue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    pub id: String,
    /// Media location understood by the engine.
    pub url: String,
    pub title: String,
    pub artist: String,
    pub duration_secs: f64,
    /// Artwork location, if any.
    pub artwork: Option<String>,
}

impl Track {
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        url: impl Into<String>,
        title: impl Into<String>,
        artist: impl Into<String>,
        duration_secs: f64,
    ) -> Self {
        Self {
            id: id.into(),
            url: url.into(),
            title: title.into(),
            artist: artist.into(),
            duration_secs,
            artwork: None,
        }
    }

    #[must_use]
    pub fn with_artwork(mut self, artwork: impl Into<String>) -> Self {
        self.artwork = Some(artwork.into());
        self
    }

    /// Case-insensitive match of an already lowercased query against
    /// title or artist.
    #[must_use]
    pub fn matches(&self, lowercase_query: &str) -> bool {
        self.title.to_lowercase().contains(lowercase_query)
            || self.artist.to_lowercase().contains(lowercase_query)
    }
}

/// Engine playback state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PlaybackState {
    #[default]
    None,
    Ready,
    Playing,
    Paused,
    Stopped,
    Buffering,
    Error,
}

impl PlaybackState {
    #[inline]
    #[must_use]
    pub fn is_playing(self) -> bool {
        self == Self::Playing
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RepeatMode {
    #[default]
    Off,
    Track,
    /// Wrap around to the start when the queue ends.
    Queue,
}

/// Controls an engine may expose to the OS media surfaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Capability {
    Play,
    Pause,
    SkipToNext,
    SkipToPrevious,
    SeekTo,
    Stop,
}

/// Options handed to the engine on setup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerOptions {
    pub max_cache_bytes: u64,
    /// Interval between progress events, in milliseconds.
    pub progress_update_ms: u64,
    pub stop_when_app_killed: bool,
    pub capabilities: Vec<Capability>,
    pub compact_capabilities: Vec<Capability>,
}

impl Default for PlayerOptions {
    fn default() -> Self {
        Self {
            max_cache_bytes: 10 * 1024 * 1024,
            progress_update_ms: 1_000,
            stop_when_app_killed: true,
            capabilities: vec![
                Capability::Play,
                Capability::Pause,
                Capability::SkipToNext,
                Capability::SkipToPrevious,
                Capability::SeekTo,
                Capability::Stop,
            ],
            compact_capabilities: vec![
                Capability::Play,
                Capability::Pause,
                Capability::SkipToNext,
                Capability::SkipToPrevious,
            ],
        }
    }
}

impl PlayerOptions {
    /// Capabilities shown in the notification: everything but stop and seek.
    #[must_use]
    pub fn notification_capabilities(&self) -> Vec<Capability> {
        self.capabilities
            .iter()
            .copied()
            .filter(|cap| !matches!(cap, Capability::Stop | Capability::SeekTo))
            .collect()
    }
}

/// Current position within the loaded track.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Progress {
    pub position_secs: f64,
    pub duration_secs: f64,
}
