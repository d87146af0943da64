#![forbid(unsafe_code)]

//! Decorative waveform doubling as a vertical seek bar.
//!
//! Bars fill bottom-to-top as playback advances. The bar heights carry no
//! audio information; they are reshuffled whenever the track changes.

use rand::Rng;
use rand::SeedableRng;
use rand::rngs::SmallRng;

pub const BAR_COUNT: usize = 50;
const MIN_SCALE: f32 = 0.2;

/// One bar as the view draws it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BarView {
    pub scale: f32,
    pub passed: bool,
}

pub struct WaveformProgress {
    bars: Vec<f32>,
    rng: SmallRng,
}

impl std::fmt::Debug for WaveformProgress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WaveformProgress")
            .field("bars", &self.bars.len())
            .finish()
    }
}

impl Default for WaveformProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl WaveformProgress {
    #[must_use]
    pub fn new() -> Self {
        Self::from_rng(SmallRng::from_os_rng())
    }

    /// Deterministic bar heights.
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self::from_rng(SmallRng::seed_from_u64(seed))
    }

    fn from_rng(rng: SmallRng) -> Self {
        let mut waveform = Self {
            bars: Vec::with_capacity(BAR_COUNT),
            rng,
        };
        waveform.regenerate();
        waveform
    }

    /// Fresh bar heights in `[0.2, 1.0)`.
    pub fn regenerate(&mut self) {
        let rng = &mut self.rng;
        self.bars.clear();
        self.bars
            .extend((0..BAR_COUNT).map(|_| rng.random_range(MIN_SCALE..1.0)));
    }

    pub fn on_track_changed(&mut self) {
        self.regenerate();
    }

    #[must_use]
    pub fn bars(&self) -> &[f32] {
        &self.bars
    }

    /// Number of bars covered by `position`, counted from the bottom.
    #[must_use]
    pub fn progress_index(&self, position_secs: f64, duration_secs: f64) -> usize {
        if !(duration_secs.is_finite() && duration_secs > 0.0) || position_secs.is_nan() {
            return 0;
        }
        let ratio = (position_secs / duration_secs).max(0.0);
        ((ratio * BAR_COUNT as f64).floor() as usize).min(BAR_COUNT)
    }

    /// Bar `index` counts from the top; the fill rises from the bottom and
    /// always lights the bottom bar.
    #[must_use]
    pub fn is_passed(index: usize, progress_index: usize) -> bool {
        match (BAR_COUNT - 1).checked_sub(index) {
            Some(reversed) => reversed <= progress_index,
            None => false,
        }
    }

    pub fn bar_views(&self, position_secs: f64, duration_secs: f64) -> Vec<BarView> {
        let progress = self.progress_index(position_secs, duration_secs);
        self.bars
            .iter()
            .enumerate()
            .map(|(index, &scale)| BarView {
                scale,
                passed: Self::is_passed(index, progress),
            })
            .collect()
    }

    /// Seek position for a tap at `location` (from the top) on a bar of
    /// `height`. `None` when there is nothing to seek.
    #[must_use]
    pub fn seek_target(location: f64, height: f64, duration_secs: f64) -> Option<f64> {
        if !(duration_secs.is_finite() && duration_secs > 0.0) {
            return None;
        }
        if !(height.is_finite() && height > 0.0) || !location.is_finite() {
            return None;
        }
        let ratio = (location / height).clamp(0.0, 1.0);
        Some(ratio * duration_secs)
    }
}
