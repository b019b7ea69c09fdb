use chrono::{DateTime, Datelike, Timelike, Utc};
use serde::{Deserialize, Serialize};

/// Sampling granularity for equity-curve recording. A new [`crate::tracker::EquitySample`]
/// is appended only when the bucket derived from the current timestamp differs
/// from the previously recorded one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecordingInterval {
    Tick,
    Second,
    Minute,
    Hour,
    Day,
    Week,
    Month,
}

/// Bucket identity for a timestamp under a given [`RecordingInterval`].
///
/// Built from plain integer components (never from `DateTime` comparison
/// directly) so two timestamps compare equal exactly when they fall in the
/// same bucket, regardless of sub-bucket precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BucketKey(i32, u32, u32, u32, u32, u32);

impl RecordingInterval {
    /// Derives the bucket key for `ts` under this interval. `Tick` produces a
    /// distinct key per call so every sample is recorded.
    pub fn bucket_key(self, ts: DateTime<Utc>, ordinal: u64) -> BucketKey {
        match self {
            RecordingInterval::Tick => BucketKey(0, 0, 0, 0, 0, ordinal as u32),
            RecordingInterval::Second => BucketKey(
                ts.year(),
                ts.month(),
                ts.day(),
                ts.hour(),
                ts.minute(),
                ts.second(),
            ),
            RecordingInterval::Minute => {
                BucketKey(ts.year(), ts.month(), ts.day(), ts.hour(), ts.minute(), 0)
            }
            RecordingInterval::Hour => BucketKey(ts.year(), ts.month(), ts.day(), ts.hour(), 0, 0),
            RecordingInterval::Day => BucketKey(ts.year(), ts.month(), ts.day(), 0, 0, 0),
            RecordingInterval::Week => {
                let iso = ts.iso_week();
                BucketKey(iso.year(), iso.week(), 0, 0, 0, 0)
            }
            RecordingInterval::Month => BucketKey(ts.year(), ts.month(), 0, 0, 0, 0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ts(y: i32, m: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, mi, s).unwrap()
    }

    #[test]
    fn day_bucket_ignores_time_of_day() {
        let a = ts(2024, 1, 1, 9, 30, 0);
        let b = ts(2024, 1, 1, 15, 45, 0);
        assert_eq!(
            RecordingInterval::Day.bucket_key(a, 0),
            RecordingInterval::Day.bucket_key(b, 1)
        );
    }

    #[test]
    fn different_days_differ() {
        let a = ts(2024, 1, 1, 9, 30, 0);
        let b = ts(2024, 1, 2, 9, 30, 0);
        assert_ne!(
            RecordingInterval::Day.bucket_key(a, 0),
            RecordingInterval::Day.bucket_key(b, 0)
        );
    }

    #[test]
    fn tick_interval_always_distinct() {
        let a = ts(2024, 1, 1, 9, 30, 0);
        assert_ne!(
            RecordingInterval::Tick.bucket_key(a, 0),
            RecordingInterval::Tick.bucket_key(a, 1)
        );
    }

    #[test]
    fn week_bucket_groups_by_iso_week() {
        // Mon 2024-01-01 and Sun 2024-01-07 fall in the same ISO week.
        let mon = ts(2024, 1, 1, 0, 0, 0);
        let sun = ts(2024, 1, 7, 23, 0, 0);
        assert_eq!(
            RecordingInterval::Week.bucket_key(mon, 0),
            RecordingInterval::Week.bucket_key(sun, 1)
        );
    }
}
