//! Temporal predicates: activity streaks, the night-owl window, and
//! join-to-first-post latency.

use std::collections::BTreeSet;

use chrono::{DateTime, Days, NaiveDate, Timelike, Utc};

use crate::config::EvaluationConfig;

/// Streak lengths in consecutive active calendar days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StreakSummary {
    /// Run still alive as of `today` (active today or yesterday)
    pub current: u64,
    /// Longest run ever seen
    pub longest: u64,
}

/// Compute streaks from the set of distinct active calendar days.
///
/// One ascending scan: a run extends while consecutive dates differ by
/// exactly one day. The current streak is the run containing `today`; a
/// run that last touched yesterday is still alive (the user can extend it
/// today), anything older has lapsed to 0.
pub fn streak_summary(days: &BTreeSet<NaiveDate>, today: NaiveDate) -> StreakSummary {
    let mut longest: u64 = 0;
    let mut run: u64 = 0;
    let mut prev: Option<NaiveDate> = None;
    let mut run_end: Option<NaiveDate> = None;

    for &day in days {
        run = match prev {
            Some(p) if p.succ_opt() == Some(day) => run + 1,
            _ => 1,
        };
        longest = longest.max(run);
        run_end = Some(day);
        prev = Some(day);
    }

    let yesterday = today.checked_sub_days(Days::new(1));
    let current = match run_end {
        Some(end) if end == today || Some(end) == yesterday => run,
        _ => 0,
    };

    StreakSummary { current, longest }
}

/// Whether an hour-of-day falls in the wrap-around night window.
pub fn in_night_window(hour: u32, config: &EvaluationConfig) -> bool {
    let start = config.night_window_start_hour;
    let end = config.night_window_end_hour;
    if start <= end {
        hour >= start && hour < end
    } else {
        hour >= start || hour < end
    }
}

/// Whether a timestamp falls in the night window.
pub fn is_night_post(timestamp: DateTime<Utc>, config: &EvaluationConfig) -> bool {
    in_night_window(timestamp.hour(), config)
}

/// Whether the earliest post came soon enough after joining.
pub fn is_early_bird(
    joined_at: DateTime<Utc>,
    earliest_post: DateTime<Utc>,
    config: &EvaluationConfig,
) -> bool {
    (earliest_post - joined_at).num_seconds() <= config.early_bird_max_secs
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_three_day_streak_at_end_of_day_three() {
        let days: BTreeSet<_> = [date(2024, 3, 1), date(2024, 3, 2), date(2024, 3, 3)]
            .into_iter()
            .collect();
        let summary = streak_summary(&days, date(2024, 3, 3));
        assert_eq!(summary.current, 3);
        assert_eq!(summary.longest, 3);
    }

    #[test]
    fn test_gap_resets_current_but_keeps_longest() {
        let days: BTreeSet<_> = [date(2024, 3, 1), date(2024, 3, 2), date(2024, 3, 3)]
            .into_iter()
            .collect();
        let summary = streak_summary(&days, date(2024, 3, 10));
        assert_eq!(summary.current, 0);
        assert_eq!(summary.longest, 3);
    }

    #[test]
    fn test_streak_alive_through_yesterday() {
        let days: BTreeSet<_> = [date(2024, 3, 2), date(2024, 3, 3)].into_iter().collect();
        let summary = streak_summary(&days, date(2024, 3, 4));
        assert_eq!(summary.current, 2);
    }

    #[test]
    fn test_longest_tracks_earlier_run() {
        let days: BTreeSet<_> = [
            date(2024, 2, 1),
            date(2024, 2, 2),
            date(2024, 2, 3),
            date(2024, 2, 4),
            date(2024, 3, 3),
        ]
        .into_iter()
        .collect();
        let summary = streak_summary(&days, date(2024, 3, 3));
        assert_eq!(summary.current, 1);
        assert_eq!(summary.longest, 4);
    }

    #[test]
    fn test_empty_days() {
        let summary = streak_summary(&BTreeSet::new(), date(2024, 3, 3));
        assert_eq!(summary, StreakSummary::default());
    }

    #[test]
    fn test_night_window_wraps_midnight() {
        let config = EvaluationConfig::default();
        assert!(in_night_window(22, &config));
        assert!(in_night_window(23, &config));
        assert!(in_night_window(0, &config));
        assert!(in_night_window(5, &config));
        assert!(!in_night_window(6, &config));
        assert!(!in_night_window(12, &config));
        assert!(!in_night_window(21, &config));
    }

    #[test]
    fn test_non_wrapping_window() {
        let config = EvaluationConfig {
            night_window_start_hour: 1,
            night_window_end_hour: 5,
            ..Default::default()
        };
        assert!(in_night_window(1, &config));
        assert!(in_night_window(4, &config));
        assert!(!in_night_window(5, &config));
        assert!(!in_night_window(0, &config));
    }

    #[test]
    fn test_early_bird_boundary() {
        let config = EvaluationConfig::default();
        let joined = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let exactly_one_hour = Utc.with_ymd_and_hms(2024, 3, 1, 13, 0, 0).unwrap();
        let one_second_late = Utc.with_ymd_and_hms(2024, 3, 1, 13, 0, 1).unwrap();
        assert!(is_early_bird(joined, exactly_one_hour, &config));
        assert!(!is_early_bird(joined, one_second_late, &config));
    }
}
