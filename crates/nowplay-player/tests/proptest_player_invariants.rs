//! Property-based invariant tests for the player view models.
//!
//! 1. `format_time` always yields `m:ss` with seconds below 60
//! 2. The waveform progress index is bounded and monotone in position
//! 3. Search results are a subset of the queue and a blank query shows all
//! 4. The slider display value stays within `[0, safe_duration]`

use nowplay_player::waveform::BAR_COUNT;
use nowplay_player::{Playlist, ProgressSlider, Track, WaveformProgress, format_time};
use proptest::prelude::*;

fn track_strategy() -> impl Strategy<Value = Track> {
    ("[a-z]{1,6}", "[A-Za-z ]{0,12}", "[A-Za-z ]{0,12}").prop_map(|(id, title, artist)| {
        Track::new(id.clone(), format!("{id}.mp3"), title, artist, 120.0)
    })
}

proptest! {
    #[test]
    fn format_time_shape(secs in -100.0f64..100_000.0) {
        let label = format_time(secs);
        let (minutes, seconds) = label.split_once(':').unwrap();
        prop_assert!(minutes.parse::<u64>().is_ok());
        prop_assert_eq!(seconds.len(), 2);
        prop_assert!(seconds.parse::<u64>().unwrap() < 60);
    }

    #[test]
    fn progress_index_bounded_and_monotone(
        a in -10.0f64..500.0,
        b in -10.0f64..500.0,
        duration in 0.0f64..400.0,
    ) {
        let waveform = WaveformProgress::with_seed(0);
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        let i_lo = waveform.progress_index(lo, duration);
        let i_hi = waveform.progress_index(hi, duration);
        prop_assert!(i_hi <= BAR_COUNT);
        prop_assert!(i_lo <= i_hi);
    }

    #[test]
    fn search_is_a_subset(
        tracks in prop::collection::vec(track_strategy(), 0..12),
        query in "[A-Za-z ]{0,4}",
    ) {
        let mut playlist = Playlist::new(tracks.clone());
        let shown = playlist.search(&query);
        prop_assert!(shown <= tracks.len());
        for track in playlist.visible() {
            prop_assert!(tracks.contains(track));
        }
        if query.trim().is_empty() {
            prop_assert_eq!(shown, tracks.len());
        }
    }

    #[test]
    fn slider_display_in_range(value in -50.0f64..500.0, duration in -5.0f64..300.0) {
        let mut slider = ProgressSlider::new();
        slider.on_progress(value, duration);
        let shown = slider.display_value();
        prop_assert!(shown >= 0.0);
        prop_assert!(shown <= slider.safe_duration());
    }
}
