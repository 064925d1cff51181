use std::fmt;

use error_stack::IntoReport;
use rand::seq::SliceRandom;
use rand::Rng;
use serde_json::Value;

use crate::cache::Track;

#[derive(Debug)]
pub enum SelectorError {
    NoEligibleTracks,
}

impl fmt::Display for SelectorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectorError::NoEligibleTracks => {
                f.write_str("No applicable tracks found for the given song length")
            }
        }
    }
}

impl std::error::Error for SelectorError {}

pub type SelectorResult<T> = error_stack::Result<T, SelectorError>;

/// Named song-length policy. `long` and `any` are fixed; the `normal` bounds
/// come from the config because circuits disagree on them.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    strum_macros::Display,
    strum_macros::EnumString,
    strum_macros::EnumIter,
)]
#[strum(serialize_all = "lowercase")]
pub enum DurationBand {
    Long,
    Normal,
    Any,
}

impl DurationBand {
    /// Inclusive bounds in seconds.
    pub fn bounds(&self, normal_band: (u64, u64)) -> (f64, f64) {
        match self {
            DurationBand::Long => (115.0, 130.0),
            DurationBand::Normal => (normal_band.0 as f64, normal_band.1 as f64),
            DurationBand::Any => (60.0, 600.0),
        }
    }
}

/// The ids of all tracks whose duration lies within the bounds. Entries
/// without an id or a numeric duration are skipped, not errors.
pub fn eligible_ids(tracks: &[Value], (min_length, max_length): (f64, f64)) -> Vec<String> {
    tracks
        .iter()
        .filter_map(Track::from_value)
        .filter(|track| min_length <= track.duration && track.duration <= max_length)
        .map(|track| track.video_id)
        .collect()
}

/// Uniformly picks one eligible track id. The rng is injected so callers can
/// seed it; production passes `thread_rng`.
pub fn select_song<R: Rng>(
    tracks: &[Value],
    bounds: (f64, f64),
    rng: &mut R,
) -> SelectorResult<String> {
    let applicable_tracks = eligible_ids(tracks, bounds);
    applicable_tracks
        .choose(rng)
        .cloned()
        .ok_or(SelectorError::NoEligibleTracks)
        .into_report()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{thread_rng, SeedableRng};
    use serde_json::json;

    fn track(id: &str, duration: f64) -> Value {
        json!({"title": id, "index": 0, "videoId": id, "duration": duration})
    }

    #[test]
    fn only_the_track_inside_the_band_can_win() {
        let tracks = vec![track("a", 100.0), track("b", 200.0)];
        let bounds = DurationBand::Normal.bounds((80, 115));
        for _ in 0..50 {
            assert_eq!(select_song(&tracks, bounds, &mut thread_rng()).unwrap(), "a");
        }
    }

    #[test]
    fn a_seeded_rng_makes_the_pick_deterministic() {
        let tracks: Vec<Value> = (0..20)
            .map(|i| track(&format!("id{}", i), 100.0))
            .collect();
        let bounds = DurationBand::Any.bounds((80, 115));
        let first = select_song(&tracks, bounds, &mut StdRng::seed_from_u64(7)).unwrap();
        let second = select_song(&tracks, bounds, &mut StdRng::seed_from_u64(7)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn every_pick_lies_within_the_band() {
        let tracks = vec![
            track("short", 70.0),
            track("a", 95.0),
            track("b", 110.0),
            track("long", 140.0),
        ];
        let bounds = DurationBand::Normal.bounds((80, 115));
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..50 {
            let pick = select_song(&tracks, bounds, &mut rng).unwrap();
            assert!(pick == "a" || pick == "b");
        }
    }

    #[test]
    fn band_bounds_are_inclusive() {
        let tracks = vec![track("low", 80.0), track("high", 115.0)];
        let eligible = eligible_ids(&tracks, DurationBand::Normal.bounds((80, 115)));
        assert_eq!(eligible, vec!["low".to_string(), "high".to_string()]);
    }

    #[test]
    fn the_stricter_normal_variant_drops_the_short_track() {
        let tracks = vec![track("edge", 85.0), track("safe", 100.0)];
        let relaxed = eligible_ids(&tracks, DurationBand::Normal.bounds((80, 115)));
        let strict = eligible_ids(&tracks, DurationBand::Normal.bounds((90, 115)));
        assert_eq!(relaxed.len(), 2);
        assert_eq!(strict, vec!["safe".to_string()]);
    }

    #[test]
    fn long_and_any_have_fixed_bounds() {
        assert_eq!(DurationBand::Long.bounds((90, 115)), (115.0, 130.0));
        assert_eq!(DurationBand::Any.bounds((90, 115)), (60.0, 600.0));
    }

    #[test]
    fn an_empty_eligible_set_is_an_error() {
        let tracks = vec![track("short", 70.0)];
        let result = select_song(
            &tracks,
            DurationBand::Long.bounds((80, 115)),
            &mut thread_rng(),
        );
        assert!(matches!(
            result.unwrap_err().current_context(),
            SelectorError::NoEligibleTracks
        ));
    }

    #[test]
    fn malformed_entries_are_skipped_not_fatal() {
        let tracks = vec![
            json!({"videoId": "broken", "duration": "1:40"}),
            json!({"duration": 100.0}),
            track("fine", 100.0),
        ];
        let eligible = eligible_ids(&tracks, DurationBand::Normal.bounds((80, 115)));
        assert_eq!(eligible, vec!["fine".to_string()]);
    }
}
