#![forbid(unsafe_code)]

//! Seek slider model and time labels.
//!
//! While the user drags the slider, progress updates from the engine must
//! not yank the thumb back; `is_seeking` gates them.

use tracing::warn;

use crate::engine::PlaybackEngine;
use crate::error::Result;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ProgressSlider {
    value: f64,
    duration: f64,
    seeking: bool,
}

impl ProgressSlider {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_seeking(&self) -> bool {
        self.seeking
    }

    /// Engine progress update. The position is ignored mid-seek.
    pub fn on_progress(&mut self, position_secs: f64, duration_secs: f64) {
        self.duration = duration_secs;
        if !self.seeking {
            self.value = position_secs;
        }
    }

    pub fn begin_seek(&mut self) {
        self.seeking = true;
    }

    pub fn drag_to(&mut self, value: f64) {
        self.value = value;
    }

    /// Seek the engine to `value`. The seeking flag is cleared either way.
    pub fn complete_seek<E: PlaybackEngine>(&mut self, value: f64, engine: &mut E) -> Result<()> {
        self.value = value;
        let result = engine.seek_to(value);
        self.seeking = false;
        if let Err(err) = &result {
            warn!(value, error = %err, "seek failed");
        }
        result
    }

    /// Duration used as the slider maximum; never zero.
    #[must_use]
    pub fn safe_duration(&self) -> f64 {
        if self.duration.is_finite() && self.duration > 0.0 {
            self.duration
        } else {
            1.0
        }
    }

    #[must_use]
    pub fn display_value(&self) -> f64 {
        if self.value.is_nan() {
            return 0.0;
        }
        self.value.clamp(0.0, self.safe_duration())
    }

    #[must_use]
    pub fn enabled(&self) -> bool {
        self.safe_duration() > 1.0
    }

    #[must_use]
    pub fn elapsed_label(&self) -> String {
        format_time(self.display_value())
    }

    #[must_use]
    pub fn duration_label(&self) -> String {
        format_time(self.safe_duration())
    }
}

/// `m:ss`, with `0:00` for negative or non-finite input.
#[must_use]
pub fn format_time(secs: f64) -> String {
    if !secs.is_finite() || secs < 0.0 {
        return "0:00".to_owned();
    }
    let total = secs.floor() as u64;
    format!("{}:{:02}", total / 60, total % 60)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::MemoryEngine;
    use crate::track::Track;

    #[test]
    fn format_time_pads_seconds() {
        assert_eq!(format_time(0.0), "0:00");
        assert_eq!(format_time(65.9), "1:05");
        assert_eq!(format_time(600.0), "10:00");
        assert_eq!(format_time(-3.0), "0:00");
        assert_eq!(format_time(f64::NAN), "0:00");
    }

    #[test]
    fn progress_ignored_while_seeking() {
        let mut slider = ProgressSlider::new();
        slider.on_progress(10.0, 100.0);
        slider.begin_seek();
        slider.drag_to(50.0);
        slider.on_progress(11.0, 100.0);
        assert_eq!(slider.display_value(), 50.0);
    }

    #[test]
    fn labels_follow_clamped_values() {
        let mut slider = ProgressSlider::new();
        slider.on_progress(0.0, 0.0);
        assert_eq!(slider.duration_label(), "0:01");
        assert_eq!(slider.elapsed_label(), "0:00");

        slider.on_progress(250.0, 200.0);
        assert_eq!(slider.elapsed_label(), "3:20");
        assert_eq!(slider.duration_label(), "3:20");

        slider.on_progress(-4.0, f64::NAN);
        assert_eq!(slider.elapsed_label(), "0:00");
        assert_eq!(slider.duration_label(), "0:01");
    }

    #[test]
    fn zero_duration_disables_slider() {
        let mut slider = ProgressSlider::new();
        slider.on_progress(0.0, 0.0);
        assert_eq!(slider.safe_duration(), 1.0);
        assert!(!slider.enabled());
        slider.on_progress(0.0, 30.0);
        assert!(slider.enabled());
    }

    #[test]
    fn failed_seek_still_clears_flag() {
        let mut engine = MemoryEngine::new();
        engine
            .add(&[Track::new("1", "1.mp3", "t", "a", 100.0)])
            .unwrap();
        engine.fail_on("seek_to");

        let mut slider = ProgressSlider::new();
        slider.begin_seek();
        assert!(slider.complete_seek(40.0, &mut engine).is_err());
        assert!(!slider.is_seeking());

        engine.clear_failure();
        slider.begin_seek();
        slider.complete_seek(40.0, &mut engine).unwrap();
        assert_eq!(engine.progress().unwrap().position_secs, 40.0);
    }
}
