use crate::analyzers::types::{HourBucket, Window};
use crate::analyzers::utility::mean;

/// Finds the contiguous run of `hours` buckets with the highest mean availability.
///
/// A candidate counts only if every bucket in it has an average; a single
/// empty hour disqualifies the whole run. Ties keep the earliest start.
/// Returns [`Window::empty`] when no candidate qualifies, including when
/// `hours` is zero or wider than `buckets`.
pub fn best_window(buckets: &[HourBucket], hours: usize) -> Window {
    if hours == 0 {
        return Window::empty(hours);
    }

    let mut best = Window::empty(hours);

    for run in buckets.windows(hours) {
        let Some(averages) = run
            .iter()
            .map(|b| b.average_available)
            .collect::<Option<Vec<f64>>>()
        else {
            continue;
        };
        let Some(avg) = mean(&averages) else {
            continue;
        };

        let better = match best.average_available {
            None => true,
            Some(current) => avg > current,
        };
        if better {
            best = Window {
                start_hour: Some(run[0].hour),
                end_hour: Some(run[hours - 1].hour),
                average_available: Some(avg),
                length_hours: hours,
            };
        }
    }

    best
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buckets(averages: &[(u8, f64)]) -> Vec<HourBucket> {
        (0..24)
            .map(|hour| {
                let avg = averages.iter().find(|(h, _)| *h == hour).map(|(_, a)| *a);
                HourBucket {
                    hour,
                    average_available: avg,
                    sample_count: usize::from(avg.is_some()),
                }
            })
            .collect()
    }

    #[test]
    fn test_three_hour_window() {
        let b = buckets(&[(5, 3.0), (6, 5.0), (7, 4.0)]);
        let w = best_window(&b, 3);

        assert_eq!(w.start_hour, Some(5));
        assert_eq!(w.end_hour, Some(7));
        assert_eq!(w.average_available, Some(4.0));
        assert_eq!(w.length_hours, 3);
    }

    #[test]
    fn test_window_longer_than_data() {
        let b = buckets(&[(5, 3.0), (6, 5.0), (7, 4.0)]);
        let w = best_window(&b, 5);

        assert_eq!(w, Window::empty(5));
        assert!(w.is_empty());
    }

    #[test]
    fn test_gap_invalidates_window() {
        // 10..=11 would average 9 but 12 is missing
        let b = buckets(&[(1, 1.0), (2, 1.0), (3, 1.0), (10, 9.0), (11, 9.0), (13, 9.0)]);
        let w = best_window(&b, 3);

        assert_eq!(w.start_hour, Some(1));
        assert_eq!(w.average_available, Some(1.0));
    }

    #[test]
    fn test_tie_keeps_earliest() {
        let b = buckets(&[(2, 4.0), (3, 4.0), (8, 4.0), (9, 4.0)]);
        let w = best_window(&b, 2);

        assert_eq!(w.start_hour, Some(2));
        assert_eq!(w.end_hour, Some(3));
    }

    #[test]
    fn test_zero_is_a_valid_average() {
        let b = buckets(&[(0, 0.0), (1, 0.0)]);
        let w = best_window(&b, 2);

        assert_eq!(w.start_hour, Some(0));
        assert_eq!(w.average_available, Some(0.0));
    }

    #[test]
    fn test_hours_wider_than_range() {
        let b: Vec<HourBucket> = buckets(&[(5, 1.0), (6, 1.0)])[5..7].to_vec();
        assert_eq!(best_window(&b, 3), Window::empty(3));
        assert_eq!(best_window(&b, 0), Window::empty(0));
        assert_eq!(best_window(&[], 1), Window::empty(1));
    }

    #[test]
    fn test_single_hour_window() {
        let b = buckets(&[(4, 2.0), (17, 6.5), (18, 6.0)]);
        let w = best_window(&b, 1);

        assert_eq!(w.start_hour, Some(17));
        assert_eq!(w.end_hour, Some(17));
        assert_eq!(w.average_available, Some(6.5));
    }
}
