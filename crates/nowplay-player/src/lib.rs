#![forbid(unsafe_code)]

//! Player: the playback side of the now-playing screen.
//!
//! # Role in nowplay
//! `nowplay-player` sits between the views and an external playback engine.
//! It seeds and drives the queue, answers remote media commands, and holds
//! the small view models shown inside the panel: the searchable playlist,
//! the seek slider, and the waveform seek bar.
//!
//! # How it fits in the system
//! The engine is reached only through [`PlaybackEngine`]. The host forwards
//! engine callbacks as [`PlayerEvent`]s to [`PlayerService::handle_event`].
//! The panel itself lives in `nowplay-core` and knows nothing of playback.

pub mod engine;
pub mod error;
pub mod playlist;
pub mod progress;
pub mod service;
pub mod track;
pub mod waveform;

pub use engine::{MemoryEngine, PlaybackEngine, PlayerEvent, RemoteCommand};
pub use error::{PlayerError, Result};
pub use playlist::Playlist;
pub use progress::{ProgressSlider, format_time};
pub use service::PlayerService;
pub use track::{Capability, PlaybackState, PlayerOptions, Progress, RepeatMode, Track};
pub use waveform::{BarView, WaveformProgress};
