#![forbid(unsafe_code)]

//! Player service: setup, queue seeding, transport, and remote commands.
//!
//! # Invariants
//! 1. `setup` is idempotent: a running engine is never set up twice.
//! 2. `add_tracks` seeds the queue once; a non-empty queue is left alone.
//! 3. Remote commands are ignored unless handlers are registered.

use tracing::{debug, error, info, warn};

use crate::engine::{PlaybackEngine, PlayerEvent, RemoteCommand};
use crate::error::{PlayerError, Result};
use crate::track::{PlaybackState, PlayerOptions, RepeatMode, Track};

#[derive(Debug)]
pub struct PlayerService<E> {
    engine: E,
    options: PlayerOptions,
    initialized: bool,
    remote_registered: bool,
}

impl<E: PlaybackEngine> PlayerService<E> {
    pub fn new(engine: E, options: PlayerOptions) -> Self {
        Self {
            engine,
            options,
            initialized: false,
            remote_registered: false,
        }
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    #[must_use]
    pub fn remote_handlers_registered(&self) -> bool {
        self.remote_registered
    }

    /// Set the engine up and push the player options.
    pub fn setup(&mut self) -> Result<()> {
        if self.initialized && self.engine.is_running() {
            debug!("player already set up");
            return Ok(());
        }

        let result = self.setup_engine();
        self.initialized = result.is_ok();
        match &result {
            Ok(()) => info!(
                capabilities = self.options.capabilities.len(),
                "player set up"
            ),
            Err(err) => error!(error = %err, "player setup failed"),
        }
        result
    }

    fn setup_engine(&mut self) -> Result<()> {
        if !self.engine.is_running() {
            self.engine.setup(&self.options)?;
        }
        self.engine.update_options(&self.options)
    }

    /// Seed an empty queue. Returns how many tracks were added.
    pub fn add_tracks(&mut self, tracks: &[Track]) -> Result<usize> {
        let queued = self.engine.queue()?.len();
        if queued > 0 {
            debug!(queued, "queue already populated");
            return Ok(0);
        }
        self.engine.add(tracks)?;
        self.engine.set_repeat_mode(RepeatMode::Queue)?;
        info!(added = tracks.len(), "queue seeded");
        Ok(tracks.len())
    }

    /// Setup followed by seeding the queue with `tracks`.
    pub fn initialize(&mut self, tracks: &[Track]) -> Result<()> {
        self.setup()?;
        self.add_tracks(tracks)?;
        Ok(())
    }

    pub fn current_track_info(&self) -> Result<Option<Track>> {
        match self.engine.current_index()? {
            Some(index) => self.engine.track(index),
            None => Ok(None),
        }
    }

    pub fn toggle_playback(&mut self, should_play: bool) -> Result<()> {
        if should_play {
            self.engine.play()
        } else {
            self.engine.pause()
        }
    }

    /// Pause when playing, play otherwise. Returns whether playback was
    /// requested.
    pub fn toggle_from_state(&mut self) -> Result<bool> {
        let should_play = self.engine.playback_state()? != PlaybackState::Playing;
        self.toggle_playback(should_play)?;
        Ok(should_play)
    }

    pub fn skip_to_next(&mut self) -> Result<()> {
        self.engine.skip_to_next()
    }

    pub fn skip_to_previous(&mut self) -> Result<()> {
        self.engine.skip_to_previous()
    }

    /// Jump to the queued track with `id`.
    pub fn select_track(&mut self, id: &str) -> Result<()> {
        let index = self
            .engine
            .queue()?
            .iter()
            .position(|track| track.id == id)
            .ok_or_else(|| PlayerError::TrackNotFound { id: id.to_owned() })?;
        self.engine.skip(index)
    }

    /// Returns `false` if handlers were already registered.
    pub fn register_remote_handlers(&mut self) -> bool {
        if self.remote_registered {
            return false;
        }
        self.remote_registered = true;
        debug!("remote handlers registered");
        true
    }

    /// Returns `false` if no handlers were registered.
    pub fn cleanup_remote_handlers(&mut self) -> bool {
        if !self.remote_registered {
            return false;
        }
        self.remote_registered = false;
        debug!("remote handlers removed");
        true
    }

    pub fn handle_event(&mut self, event: PlayerEvent) -> Result<()> {
        match event {
            PlayerEvent::Remote(command) => {
                if !self.remote_registered {
                    debug!(?command, "remote command ignored: no handlers");
                    return Ok(());
                }
                self.handle_remote(command)
            }
            PlayerEvent::PlaybackError { message } => {
                error!(reason = %message, "playback error");
                Ok(())
            }
            PlayerEvent::QueueEnded => {
                info!("queue ended");
                Ok(())
            }
            PlayerEvent::TrackChanged { index } => {
                info!(?index, "track changed");
                Ok(())
            }
        }
    }

    fn handle_remote(&mut self, command: RemoteCommand) -> Result<()> {
        let result = match command {
            RemoteCommand::Play => self.engine.play(),
            RemoteCommand::Pause => self.engine.pause(),
            RemoteCommand::Next => self.engine.skip_to_next(),
            RemoteCommand::Previous => self.engine.skip_to_previous(),
            RemoteCommand::Stop => self.engine.stop(),
            RemoteCommand::Seek(position_secs) => self.engine.seek_to(position_secs),
        };
        if let Err(err) = &result {
            warn!(?command, error = %err, "remote command failed");
        }
        result
    }
}
