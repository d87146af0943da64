#![forbid(unsafe_code)]

//! Playback engine seam.
//!
//! The engine owns decoding, output, and the OS media session. The player
//! layer only issues commands through [`PlaybackEngine`] and reacts to the
//! [`PlayerEvent`]s the host forwards from it.
//!
//! [`MemoryEngine`] is a complete in-process engine with no audio output.
//! Headless hosts and tests drive it directly.

use crate::error::{PlayerError, Result};
use crate::track::{PlaybackState, PlayerOptions, Progress, RepeatMode, Track};

/// Commands an external media session can send.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RemoteCommand {
    Play,
    Pause,
    Next,
    Previous,
    Stop,
    /// Seek to an absolute position in seconds.
    Seek(f64),
}

/// Events the engine reports back to the player layer.
#[derive(Debug, Clone, PartialEq)]
pub enum PlayerEvent {
    Remote(RemoteCommand),
    PlaybackError { message: String },
    QueueEnded,
    TrackChanged { index: Option<usize> },
}

pub trait PlaybackEngine {
    /// Whether a previous setup is still live.
    fn is_running(&self) -> bool;

    fn setup(&mut self, options: &PlayerOptions) -> Result<()>;
    fn update_options(&mut self, options: &PlayerOptions) -> Result<()>;

    fn add(&mut self, tracks: &[Track]) -> Result<()>;
    fn queue(&self) -> Result<Vec<Track>>;
    fn current_index(&self) -> Result<Option<usize>>;

    fn play(&mut self) -> Result<()>;
    fn pause(&mut self) -> Result<()>;
    fn stop(&mut self) -> Result<()>;
    fn seek_to(&mut self, position_secs: f64) -> Result<()>;
    fn skip(&mut self, index: usize) -> Result<()>;
    fn skip_to_next(&mut self) -> Result<()>;
    fn skip_to_previous(&mut self) -> Result<()>;

    fn set_repeat_mode(&mut self, mode: RepeatMode) -> Result<()>;
    fn repeat_mode(&self) -> Result<RepeatMode>;
    fn playback_state(&self) -> Result<PlaybackState>;
    fn progress(&self) -> Result<Progress>;

    /// Track at `index`, if the queue holds one there.
    fn track(&self, index: usize) -> Result<Option<Track>> {
        Ok(self.queue()?.get(index).cloned())
    }
}

/// In-process engine: a queue, a cursor, and a clock the host advances.
#[derive(Debug, Default)]
pub struct MemoryEngine {
    running: bool,
    options: Option<PlayerOptions>,
    queue: Vec<Track>,
    current: Option<usize>,
    state: PlaybackState,
    repeat: RepeatMode,
    position_secs: f64,
    failing: Option<&'static str>,
}

impl MemoryEngine {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every call to `op` fail until [`Self::clear_failure`].
    pub fn fail_on(&mut self, op: &'static str) {
        self.failing = Some(op);
    }

    pub fn clear_failure(&mut self) {
        self.failing = None;
    }

    #[must_use]
    pub fn options(&self) -> Option<&PlayerOptions> {
        self.options.as_ref()
    }

    /// Advance the playback clock. Returns the event produced when the
    /// current track runs out, if any.
    pub fn advance(&mut self, secs: f64) -> Option<PlayerEvent> {
        if !self.state.is_playing() {
            return None;
        }
        let duration = self.current_track()?.duration_secs;
        self.position_secs += secs;
        if self.position_secs < duration {
            return None;
        }
        match self.repeat {
            RepeatMode::Track => {
                self.position_secs = 0.0;
                None
            }
            _ => match self.next_index() {
                Some(index) => {
                    self.load(index);
                    Some(PlayerEvent::TrackChanged { index: Some(index) })
                }
                None => {
                    self.position_secs = duration;
                    self.state = PlaybackState::Stopped;
                    Some(PlayerEvent::QueueEnded)
                }
            },
        }
    }

    fn check(&self, op: &'static str) -> Result<()> {
        match self.failing {
            Some(failing) if failing == op => Err(PlayerError::engine(op, "injected failure")),
            _ => Ok(()),
        }
    }

    fn current_track(&self) -> Option<&Track> {
        self.current.and_then(|index| self.queue.get(index))
    }

    fn next_index(&self) -> Option<usize> {
        let next = self.current? + 1;
        if next < self.queue.len() {
            Some(next)
        } else if self.repeat == RepeatMode::Queue && !self.queue.is_empty() {
            Some(0)
        } else {
            None
        }
    }

    fn previous_index(&self) -> Option<usize> {
        match self.current? {
            0 if self.repeat == RepeatMode::Queue => self.queue.len().checked_sub(1),
            0 => None,
            index => Some(index - 1),
        }
    }

    fn load(&mut self, index: usize) {
        self.current = Some(index);
        self.position_secs = 0.0;
    }
}

impl PlaybackEngine for MemoryEngine {
    fn is_running(&self) -> bool {
        self.running
    }

    fn setup(&mut self, options: &PlayerOptions) -> Result<()> {
        self.check("setup")?;
        if self.running {
            return Err(PlayerError::engine("setup", "player already initialized"));
        }
        self.running = true;
        self.options = Some(options.clone());
        self.state = PlaybackState::Ready;
        Ok(())
    }

    fn update_options(&mut self, options: &PlayerOptions) -> Result<()> {
        self.check("update_options")?;
        if !self.running {
            return Err(PlayerError::NotInitialized);
        }
        self.options = Some(options.clone());
        Ok(())
    }

    fn add(&mut self, tracks: &[Track]) -> Result<()> {
        self.check("add")?;
        self.queue.extend_from_slice(tracks);
        if self.current.is_none() && !self.queue.is_empty() {
            self.current = Some(0);
        }
        Ok(())
    }

    fn queue(&self) -> Result<Vec<Track>> {
        self.check("queue")?;
        Ok(self.queue.clone())
    }

    fn current_index(&self) -> Result<Option<usize>> {
        self.check("current_index")?;
        Ok(self.current)
    }

    fn play(&mut self) -> Result<()> {
        self.check("play")?;
        if self.current.is_none() {
            return Err(PlayerError::EmptyQueue);
        }
        self.state = PlaybackState::Playing;
        Ok(())
    }

    fn pause(&mut self) -> Result<()> {
        self.check("pause")?;
        if self.state.is_playing() {
            self.state = PlaybackState::Paused;
        }
        Ok(())
    }

    fn stop(&mut self) -> Result<()> {
        self.check("stop")?;
        self.state = PlaybackState::Stopped;
        self.position_secs = 0.0;
        Ok(())
    }

    fn seek_to(&mut self, position_secs: f64) -> Result<()> {
        self.check("seek_to")?;
        let Some(track) = self.current_track() else {
            return Err(PlayerError::EmptyQueue);
        };
        if !position_secs.is_finite() {
            return Err(PlayerError::engine("seek_to", "position is not finite"));
        }
        self.position_secs = position_secs.clamp(0.0, track.duration_secs.max(0.0));
        Ok(())
    }

    fn skip(&mut self, index: usize) -> Result<()> {
        self.check("skip")?;
        if index >= self.queue.len() {
            return Err(PlayerError::engine("skip", format!("index {index} out of range")));
        }
        self.load(index);
        Ok(())
    }

    fn skip_to_next(&mut self) -> Result<()> {
        self.check("skip_to_next")?;
        let index = self
            .next_index()
            .ok_or_else(|| PlayerError::engine("skip_to_next", "no next track"))?;
        self.load(index);
        Ok(())
    }

    fn skip_to_previous(&mut self) -> Result<()> {
        self.check("skip_to_previous")?;
        let index = self
            .previous_index()
            .ok_or_else(|| PlayerError::engine("skip_to_previous", "no previous track"))?;
        self.load(index);
        Ok(())
    }

    fn set_repeat_mode(&mut self, mode: RepeatMode) -> Result<()> {
        self.check("set_repeat_mode")?;
        self.repeat = mode;
        Ok(())
    }

    fn repeat_mode(&self) -> Result<RepeatMode> {
        self.check("repeat_mode")?;
        Ok(self.repeat)
    }

    fn playback_state(&self) -> Result<PlaybackState> {
        self.check("playback_state")?;
        Ok(self.state)
    }

    fn progress(&self) -> Result<Progress> {
        self.check("progress")?;
        Ok(Progress {
            position_secs: self.position_secs,
            duration_secs: self.current_track().map_or(0.0, |t| t.duration_secs),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine_with(n: usize) -> MemoryEngine {
        let mut engine = MemoryEngine::new();
        let tracks: Vec<Track> = (0..n)
            .map(|i| Track::new(i.to_string(), format!("{i}.mp3"), "t", "a", 10.0))
            .collect();
        engine.add(&tracks).unwrap();
        engine
    }

    #[test]
    fn next_wraps_only_with_queue_repeat() {
        let mut engine = engine_with(2);
        engine.skip(1).unwrap();
        assert!(engine.skip_to_next().is_err());

        engine.set_repeat_mode(RepeatMode::Queue).unwrap();
        engine.skip_to_next().unwrap();
        assert_eq!(engine.current_index().unwrap(), Some(0));
    }

    #[test]
    fn previous_from_first_wraps_with_queue_repeat() {
        let mut engine = engine_with(3);
        assert!(engine.skip_to_previous().is_err());
        engine.set_repeat_mode(RepeatMode::Queue).unwrap();
        engine.skip_to_previous().unwrap();
        assert_eq!(engine.current_index().unwrap(), Some(2));
    }

    #[test]
    fn advance_past_end_changes_track() {
        let mut engine = engine_with(2);
        engine.play().unwrap();
        assert_eq!(engine.advance(4.0), None);
        assert_eq!(
            engine.advance(7.0),
            Some(PlayerEvent::TrackChanged { index: Some(1) })
        );
        assert_eq!(engine.progress().unwrap().position_secs, 0.0);
        assert_eq!(engine.advance(10.0), Some(PlayerEvent::QueueEnded));
        assert_eq!(engine.playback_state().unwrap(), PlaybackState::Stopped);
    }

    #[test]
    fn seek_clamps_to_track_length() {
        let mut engine = engine_with(1);
        engine.seek_to(25.0).unwrap();
        assert_eq!(engine.progress().unwrap().position_secs, 10.0);
        assert!(engine.seek_to(f64::NAN).is_err());
    }

    #[test]
    fn injected_failure_hits_only_named_op() {
        let mut engine = engine_with(1);
        engine.fail_on("play");
        assert_eq!(
            engine.play(),
            Err(PlayerError::engine("play", "injected failure"))
        );
        assert!(engine.pause().is_ok());
        engine.clear_failure();
        assert!(engine.play().is_ok());
    }
}
