//! Time interval model.
//!
//! A `TimeInterval` is a half-open range `[time_start, time_end)` in local
//! seconds, plus the offset that converts local timestamps to UTC.
//!
//! # Time Model
//! `utc = local - seconds_offset`. Intervals are value types: they are
//! compared, hashed and ordered by all three fields, which makes them usable
//! as occupancy map keys.
//!
//! Sub-intervals from [`TimeInterval::break_down`] keep the window's offset,
//! so an availability check only matches bookings made with that same
//! offset. Callers that mix offsets for one resource see them as distinct.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::FusedIterator;

/// A half-open time interval `[time_start, time_end)` in local seconds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TimeInterval {
    /// Interval start (local seconds, inclusive).
    pub time_start: i64,
    /// Interval end (local seconds, exclusive).
    pub time_end: i64,
    /// Local-to-UTC shift in seconds.
    #[serde(default)]
    pub seconds_offset: i64,
}

impl TimeInterval {
    /// Creates an interval with a zero offset.
    pub fn new(time_start: i64, time_end: i64) -> Self {
        Self {
            time_start,
            time_end,
            seconds_offset: 0,
        }
    }

    /// Sets the local-to-UTC offset.
    pub fn with_offset(mut self, seconds_offset: i64) -> Self {
        self.seconds_offset = seconds_offset;
        self
    }

    /// Length of the interval (seconds), saturating at `i64::MAX`.
    #[inline]
    pub fn duration(&self) -> i64 {
        self.time_end.saturating_sub(self.time_start)
    }

    /// Whether `time_start < time_end`.
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.time_start < self.time_end
    }

    /// Whether a local timestamp falls within this interval.
    #[inline]
    pub fn contains(&self, time: i64) -> bool {
        time >= self.time_start && time < self.time_end
    }

    /// Whether two intervals share at least one instant.
    pub fn overlaps(&self, other: &Self) -> bool {
        self.time_start < other.time_end && other.time_start < self.time_end
    }

    /// Interval start in UTC.
    #[inline]
    pub fn utc_time_start(&self) -> i64 {
        self.time_start - self.seconds_offset
    }

    /// Interval end in UTC.
    #[inline]
    pub fn utc_time_end(&self) -> i64 {
        self.time_end - self.seconds_offset
    }

    /// Splits the interval into consecutive chunks of `per_duration` seconds.
    ///
    /// The last chunk takes whatever remains and may be shorter. Chunks are
    /// contiguous, cover the interval exactly and keep its offset.
    /// A non-positive `per_duration` yields nothing.
    ///
    /// ```
    /// use u_booking::models::TimeInterval;
    ///
    /// let parts: Vec<_> = TimeInterval::new(0, 70).break_down(30).collect();
    /// assert_eq!(parts.len(), 3);
    /// assert_eq!(parts[2], TimeInterval::new(60, 70));
    /// ```
    pub fn break_down(&self, per_duration: i64) -> BreakDown {
        BreakDown {
            current_start: self.time_start,
            time_end: if per_duration > 0 {
                self.time_end
            } else {
                self.time_start
            },
            per_duration,
            seconds_offset: self.seconds_offset,
        }
    }
}

impl fmt::Display for TimeInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}-{}]", self.time_start, self.time_end)
    }
}

/// Lazy sequence of sub-intervals produced by [`TimeInterval::break_down`].
#[derive(Debug, Clone)]
pub struct BreakDown {
    current_start: i64,
    time_end: i64,
    per_duration: i64,
    seconds_offset: i64,
}

impl Iterator for BreakDown {
    type Item = TimeInterval;

    fn next(&mut self) -> Option<TimeInterval> {
        // Saturation only understates a span wider than any chunk.
        let remaining = self.time_end.saturating_sub(self.current_start);
        if remaining <= 0 {
            return None;
        }

        let duration = self.per_duration.min(remaining);
        let interval = TimeInterval {
            time_start: self.current_start,
            time_end: self.current_start + duration,
            seconds_offset: self.seconds_offset,
        };
        self.current_start += duration;

        Some(interval)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = i128::from(self.time_end) - i128::from(self.current_start);
        let count = if remaining <= 0 {
            0
        } else {
            // per_duration > 0 whenever remaining > 0
            let per = i128::from(self.per_duration);
            usize::try_from(remaining / per + i128::from(remaining % per != 0))
                .unwrap_or(usize::MAX)
        };
        (count, Some(count))
    }
}

impl ExactSizeIterator for BreakDown {}

impl FusedIterator for BreakDown {}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::{Rng, SeedableRng};

    const HALF_HOUR: i64 = 30 * 60;

    #[test]
    fn test_interval_basics() {
        let i = TimeInterval::new(100, 200);
        assert_eq!(i.duration(), 100);
        assert!(i.is_valid());
        assert!(i.contains(100));
        assert!(!i.contains(200)); // exclusive end
        assert!(!TimeInterval::new(200, 200).is_valid());
        assert_eq!(TimeInterval::new(-10, i64::MAX).duration(), i64::MAX);
    }

    #[test]
    fn test_interval_overlap() {
        let a = TimeInterval::new(0, 100);
        assert!(a.overlaps(&TimeInterval::new(50, 150)));
        assert!(!a.overlaps(&TimeInterval::new(100, 200))); // touching
    }

    #[test]
    fn test_utc_shift() {
        let i = TimeInterval::new(7200, 10800).with_offset(3600);
        assert_eq!(i.utc_time_start(), 3600);
        assert_eq!(i.utc_time_end(), 7200);

        let west = TimeInterval::new(0, 10).with_offset(-3600);
        assert_eq!(west.utc_time_start(), 3600);
    }

    #[test]
    fn test_break_down_even() {
        let parts: Vec<_> = TimeInterval::new(0, 4 * HALF_HOUR)
            .break_down(HALF_HOUR)
            .collect();

        assert_eq!(parts.len(), 4);
        for (k, p) in parts.iter().enumerate() {
            assert_eq!(p.time_start, k as i64 * HALF_HOUR);
            assert_eq!(p.duration(), HALF_HOUR);
        }
    }

    #[test]
    fn test_break_down_remainder() {
        let parts: Vec<_> = TimeInterval::new(10, 85).break_down(30).collect();
        assert_eq!(
            parts,
            vec![
                TimeInterval::new(10, 40),
                TimeInterval::new(40, 70),
                TimeInterval::new(70, 85),
            ]
        );
    }

    #[test]
    fn test_break_down_non_positive() {
        let i = TimeInterval::new(0, 1000);
        assert_eq!(i.break_down(0).count(), 0);
        assert_eq!(i.break_down(-5).count(), 0);
        assert_eq!(i.break_down(0).len(), 0);
    }

    #[test]
    fn test_break_down_empty_interval() {
        assert_eq!(TimeInterval::new(50, 50).break_down(10).count(), 0);
        assert_eq!(TimeInterval::new(50, 20).break_down(10).count(), 0);
    }

    #[test]
    fn test_break_down_keeps_offset() {
        let parts: Vec<_> = TimeInterval::new(0, 20)
            .with_offset(7200)
            .break_down(10)
            .collect();
        assert!(parts.iter().all(|p| p.seconds_offset == 7200));
    }

    #[test]
    fn test_break_down_extreme_bounds() {
        let from_zero = TimeInterval::new(0, i64::MAX).break_down(3600);
        assert_eq!(from_zero.len(), (i64::MAX / 3600 + 1) as usize);

        let mut across_zero = TimeInterval::new(-10, i64::MAX).break_down(3600);
        let expected = (i128::from(i64::MAX) + 10 + 3599) / 3600;
        assert_eq!(across_zero.len() as i128, expected);
        assert_eq!(across_zero.next(), Some(TimeInterval::new(-10, 3590)));

        let parts: Vec<_> = TimeInterval::new(-10, i64::MAX)
            .break_down(i64::MAX)
            .collect();
        assert_eq!(
            parts,
            vec![
                TimeInterval::new(-10, i64::MAX - 10),
                TimeInterval::new(i64::MAX - 10, i64::MAX),
            ]
        );

        let tail: Vec<_> = TimeInterval::new(i64::MAX - 5000, i64::MAX)
            .break_down(3600)
            .collect();
        assert_eq!(tail.len(), 2);
        assert_eq!(tail[1], TimeInterval::new(i64::MAX - 1400, i64::MAX));

        let widest = TimeInterval::new(i64::MIN, i64::MAX).break_down(i64::MAX);
        assert_eq!(widest.len(), 3);
        assert_eq!(widest.last(), Some(TimeInterval::new(i64::MAX - 1, i64::MAX)));
    }

    #[test]
    fn test_break_down_covers_exactly() {
        let mut rng = SmallRng::seed_from_u64(42);

        for _ in 0..200 {
            let start = rng.random_range(-10_000..10_000);
            let len = rng.random_range(1..5_000);
            let per = rng.random_range(1..700);
            let interval = TimeInterval::new(start, start + len);

            let iter = interval.break_down(per);
            let expected = ((len + per - 1) / per) as usize;
            assert_eq!(iter.len(), expected);

            let parts: Vec<_> = iter.collect();
            assert_eq!(parts.len(), expected);
            assert_eq!(parts[0].time_start, start);
            assert_eq!(parts[parts.len() - 1].time_end, start + len);

            for pair in parts.windows(2) {
                assert_eq!(pair[0].time_end, pair[1].time_start);
                assert_eq!(pair[0].duration(), per);
            }

            let last = parts[parts.len() - 1].duration();
            let tail = if len % per == 0 { per } else { len % per };
            assert_eq!(last, tail);
        }
    }
}
