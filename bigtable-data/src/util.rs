use chrono::{DateTime, Utc};

/// Timestamp value telling the service to use its own clock for a write.
pub const SERVER_TIME_MICROS: i64 = -1;

/// Converts a timestamp to microseconds since the Unix epoch, truncated to
/// millisecond granularity (the finest granularity the service stores).
pub fn timestamp_to_micros(timestamp: &DateTime<Utc>) -> i64 {
    let micros = timestamp.timestamp_micros();
    micros - micros.rem_euclid(1000)
}

pub fn micros_to_timestamp(micros: i64) -> Option<DateTime<Utc>> {
    DateTime::<Utc>::from_timestamp_micros(micros)
}

#[cfg(test)]
mod tests {
    use chrono::TimeDelta;

    use super::*;

    #[test]
    fn test_truncates_to_millis() {
        let timestamp = DateTime::UNIX_EPOCH + TimeDelta::microseconds(898_294_371);
        assert_eq!(timestamp_to_micros(&timestamp), 898_294_000);
    }

    #[test]
    fn test_before_epoch_truncates_down() {
        let timestamp = DateTime::UNIX_EPOCH - TimeDelta::microseconds(1_500);
        assert_eq!(timestamp_to_micros(&timestamp), -2_000);
    }
}
