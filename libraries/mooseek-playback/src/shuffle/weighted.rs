//! Recency-weighted shuffle
//!
//! Produces one complete ordering at a time; it has no incremental
//! next/previous. Weights run linearly from 1.0 for the oldest `date_added`
//! to 3.0 for the newest, computed over the non-current tracks only.
//! Sampling without replacement uses exponential keys (`u^(1/w)`, largest
//! first), which draws the same distribution as repeated cumulative-weight
//! picks in O(n log n).

use mooseek_core::Track;
use rand::Rng;

const MIN_WEIGHT: f64 = 1.0;
const MAX_WEIGHT: f64 = 3.0;

/// Weight per track in `candidates`, in the same order
fn weights(tracks: &[Track], candidates: &[usize]) -> Vec<f64> {
    let dates = candidates.iter().map(|&i| tracks[i].date_added);
    let (min, max) = dates.fold((i64::MAX, i64::MIN), |(lo, hi), d| (lo.min(d), hi.max(d)));
    let range = max.saturating_sub(min);

    candidates
        .iter()
        .map(|&i| {
            if range <= 0 {
                MIN_WEIGHT
            } else {
                let t = (tracks[i].date_added - min) as f64 / range as f64;
                MIN_WEIGHT + (MAX_WEIGHT - MIN_WEIGHT) * t
            }
        })
        .collect()
}

/// Full play order as indices into `tracks`, with `current` (if any) first.
pub fn weighted_order<R: Rng + ?Sized>(
    tracks: &[Track],
    current: Option<usize>,
    rng: &mut R,
) -> Vec<usize> {
    let current = current.filter(|&c| c < tracks.len());
    let candidates: Vec<usize> = (0..tracks.len()).filter(|&i| Some(i) != current).collect();
    let weights = weights(tracks, &candidates);

    let mut keyed: Vec<(f64, usize)> = candidates
        .into_iter()
        .zip(weights)
        .map(|(index, weight)| {
            // 1 - [0,1) keeps u in (0,1] so the key never collapses to 0.
            let u: f64 = 1.0 - rng.gen::<f64>();
            (u.powf(1.0 / weight), index)
        })
        .collect();
    keyed.sort_by(|a, b| b.0.total_cmp(&a.0));

    current
        .into_iter()
        .chain(keyed.into_iter().map(|(_, index)| index))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn tracks_with_dates(dates: &[i64]) -> Vec<Track> {
        dates
            .iter()
            .enumerate()
            .map(|(i, &d)| {
                Track::new(i as i64, format!("t{}", i), format!("{}.mp3", i)).with_dates(d, d)
            })
            .collect()
    }

    #[test]
    fn weights_interpolate_between_one_and_three() {
        let tracks = tracks_with_dates(&[100, 200, 300]);
        let w = weights(&tracks, &[0, 1, 2]);
        assert_eq!(w, vec![1.0, 2.0, 3.0]);

        let flat = tracks_with_dates(&[5, 5, 5]);
        assert_eq!(weights(&flat, &[0, 1, 2]), vec![1.0, 1.0, 1.0]);
    }

    #[test]
    fn order_is_a_permutation_with_current_first() {
        let tracks = tracks_with_dates(&[1, 9, 4, 7, 3]);
        let mut rng = StdRng::seed_from_u64(2);
        let order = weighted_order(&tracks, Some(3), &mut rng);

        assert_eq!(order[0], 3);
        let mut sorted = order.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn empty_and_stale_current() {
        let mut rng = StdRng::seed_from_u64(0);
        assert!(weighted_order(&[], None, &mut rng).is_empty());

        let tracks = tracks_with_dates(&[1, 2]);
        let order = weighted_order(&tracks, Some(9), &mut rng);
        assert_eq!(order.len(), 2);
    }

    #[test]
    fn equal_dates_are_uniform() {
        let tracks = tracks_with_dates(&[10, 10, 10, 10]);
        let mut rng = StdRng::seed_from_u64(1234);
        let trials = 8000;
        let mut first = [0usize; 4];

        for _ in 0..trials {
            first[weighted_order(&tracks, None, &mut rng)[0]] += 1;
        }

        for count in first {
            let share = count as f64 / trials as f64;
            assert!((share - 0.25).abs() < 0.03, "share {} not near 0.25", share);
        }
    }

    #[test]
    fn newer_tracks_come_earlier_on_average() {
        let tracks = tracks_with_dates(&[0, 10, 20, 30, 40, 50, 60, 70, 80, 90]);
        let mut rng = StdRng::seed_from_u64(99);
        let trials = 4000;
        let (mut oldest_rank, mut newest_rank) = (0usize, 0usize);

        for _ in 0..trials {
            let order = weighted_order(&tracks, None, &mut rng);
            oldest_rank += order.iter().position(|&i| i == 0).unwrap();
            newest_rank += order.iter().position(|&i| i == 9).unwrap();
        }

        assert!(newest_rank < oldest_rank);
    }
}
