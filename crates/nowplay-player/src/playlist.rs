#![forbid(unsafe_code)]

//! Searchable queue view shown under the expanded panel.

use crate::engine::PlaybackEngine;
use crate::error::Result;
use crate::track::Track;

#[derive(Debug, Clone, Default)]
pub struct Playlist {
    queue: Vec<Track>,
    /// Indices into `queue` that match `query`.
    visible: Vec<usize>,
    query: String,
    current: Option<Track>,
}

impl Playlist {
    #[must_use]
    pub fn new(queue: Vec<Track>) -> Self {
        let visible = (0..queue.len()).collect();
        Self {
            queue,
            visible,
            query: String::new(),
            current: None,
        }
    }

    /// Load queue and current track from the engine.
    pub fn load<E: PlaybackEngine>(engine: &E) -> Result<Self> {
        let mut playlist = Self::new(engine.queue()?);
        playlist.refresh_current(engine)?;
        Ok(playlist)
    }

    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }

    #[must_use]
    pub fn current(&self) -> Option<&Track> {
        self.current.as_ref()
    }

    pub fn visible(&self) -> impl Iterator<Item = &Track> {
        self.visible.iter().filter_map(|&i| self.queue.get(i))
    }

    #[must_use]
    pub fn visible_len(&self) -> usize {
        self.visible.len()
    }

    /// Filter by title or artist. A blank query shows the whole queue.
    pub fn search(&mut self, query: &str) -> usize {
        self.query = query.to_owned();
        let needle = query.trim().to_lowercase();
        self.visible = if needle.is_empty() {
            (0..self.queue.len()).collect()
        } else {
            self.queue
                .iter()
                .enumerate()
                .filter(|(_, track)| track.matches(&needle))
                .map(|(i, _)| i)
                .collect()
        };
        self.visible.len()
    }

    #[must_use]
    pub fn is_current(&self, id: &str) -> bool {
        self.current.as_ref().is_some_and(|t| t.id == id)
    }

    /// Position of `id` in the full queue.
    #[must_use]
    pub fn position_of(&self, id: &str) -> Option<usize> {
        self.queue.iter().position(|t| t.id == id)
    }

    pub fn on_track_changed(&mut self, track: Option<Track>) {
        self.current = track;
    }

    pub fn refresh_current<E: PlaybackEngine>(&mut self, engine: &E) -> Result<()> {
        let track = match engine.current_index()? {
            Some(index) => engine.track(index)?,
            None => None,
        };
        self.on_track_changed(track);
        Ok(())
    }
}
