// Forbid unsafe throughout; nothing here needs it.
#![forbid(unsafe_code)]

//! Core: the draggable now-playing panel.
//!
//! # Role in nowplay
//! `nowplay-core` owns the expand/collapse interaction of the now-playing
//! panel. It turns pointer samples into a live offset, decides on release
//! whether the panel should open or close, settles it there with a spring,
//! and publishes the offset plus derived render parameters.
//!
//! # Primary responsibilities
//! - **GestureTracker**: vertical drag recognition, rubber-band overscroll,
//!   release classification.
//! - **SettleAnimator**: generation-tagged spring settle with a one-shot
//!   completion callback.
//! - **DerivedVisualState**: list fade, view cross-fade, and action button
//!   scale as pure functions of the offset.
//! - **PanelController**: the state machine tying them together.
//!
//! # How it fits in the system
//! Everything runs on the UI thread. The host forwards pointer samples to
//! the controller, drives [`PanelController::on_frame`] from its frame
//! callback while a settle is pending, and renders from
//! [`PanelController::observe`]. Playback itself lives in `nowplay-player`.

pub mod animation;
pub mod config;
pub mod controller;
pub mod error;
pub mod feed;
pub mod gesture;
pub mod model;
pub mod scheduler;
pub mod visual;

pub use animation::{AnimationGeneration, SettleAnimator, SettleTick};
pub use config::PanelConfig;
pub use controller::{PanelController, PanelSnapshot};
pub use error::{PanelError, Result};
pub use feed::{SnapshotFeed, Subscription};
pub use gesture::{GestureSample, GestureTracker, ReleaseDecision, ReleaseRule, classify_release};
pub use model::{PanelModel, PanelPhase, PanelState};
pub use scheduler::{FrameScheduler, ManualScheduler, UnavailableScheduler};
pub use visual::DerivedVisualState;
