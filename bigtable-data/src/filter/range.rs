use bytes::Bytes;
use chrono::{DateTime, Utc};

use crate::{
    error::ValidationError,
    util::timestamp_to_micros,
    wire::{WireBound, WireColumnRange, WireTimestampRange, WireValueRange},
};

use super::pattern::validate_family_id;

fn bound(value: &Option<Bytes>, inclusive: bool) -> Option<WireBound> {
    value.as_ref().map(|v| {
        if inclusive {
            WireBound::Closed(v.clone())
        } else {
            WireBound::Open(v.clone())
        }
    })
}

fn check_order<T: PartialOrd>(start: Option<&T>, end: Option<&T>) -> Result<(), ValidationError> {
    match (start, end) {
        (Some(start), Some(end)) if start > end => Err(ValidationError::InvertedRange),
        _ => Ok(()),
    }
}

/// Range of cell values. An unset start is the empty string (inclusive), an
/// unset end is unbounded.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ValueRange {
    start: Option<Bytes>,
    end: Option<Bytes>,
    inclusive_start: bool,
    inclusive_end: bool,
}

impl ValueRange {
    pub fn new(
        start: Option<Bytes>,
        end: Option<Bytes>,
        inclusive_start: bool,
        inclusive_end: bool,
    ) -> Result<Self, ValidationError> {
        let range = Self {
            start,
            end,
            inclusive_start,
            inclusive_end,
        };
        range.validate()?;
        Ok(range)
    }

    /// Both bounds included.
    pub fn closed(start: impl Into<Bytes>, end: impl Into<Bytes>) -> Result<Self, ValidationError> {
        Self::new(Some(start.into()), Some(end.into()), true, true)
    }

    pub fn start(&self) -> Option<&Bytes> {
        self.start.as_ref()
    }

    pub fn end(&self) -> Option<&Bytes> {
        self.end.as_ref()
    }

    pub(crate) fn validate(&self) -> Result<(), ValidationError> {
        check_order(self.start.as_ref(), self.end.as_ref())
    }

    pub(crate) fn to_wire(&self) -> WireValueRange {
        WireValueRange {
            start_value: bound(&self.start, self.inclusive_start),
            end_value: bound(&self.end, self.inclusive_end),
        }
    }
}

/// Range of column qualifiers within a single family.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ColumnRange {
    family: String,
    start_qualifier: Option<Bytes>,
    end_qualifier: Option<Bytes>,
    inclusive_start: bool,
    inclusive_end: bool,
}

impl ColumnRange {
    pub fn new(
        family: impl Into<String>,
        start_qualifier: Option<Bytes>,
        end_qualifier: Option<Bytes>,
        inclusive_start: bool,
        inclusive_end: bool,
    ) -> Result<Self, ValidationError> {
        let range = Self {
            family: family.into(),
            start_qualifier,
            end_qualifier,
            inclusive_start,
            inclusive_end,
        };
        range.validate()?;
        Ok(range)
    }

    /// Every column of `family`.
    pub fn family(family: impl Into<String>) -> Result<Self, ValidationError> {
        Self::new(family, None, None, true, true)
    }

    pub fn family_name(&self) -> &str {
        &self.family
    }

    pub(crate) fn validate(&self) -> Result<(), ValidationError> {
        validate_family_id(&self.family)?;
        check_order(self.start_qualifier.as_ref(), self.end_qualifier.as_ref())
    }

    pub(crate) fn to_wire(&self) -> WireColumnRange {
        WireColumnRange {
            family_name: self.family.clone(),
            start_qualifier: bound(&self.start_qualifier, self.inclusive_start),
            end_qualifier: bound(&self.end_qualifier, self.inclusive_end),
        }
    }
}

/// Range of cell timestamps, start inclusive and end exclusive.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct TimestampRange {
    start: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
}

impl TimestampRange {
    pub fn new(
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    ) -> Result<Self, ValidationError> {
        let range = Self { start, end };
        range.validate()?;
        Ok(range)
    }

    pub fn start(&self) -> Option<&DateTime<Utc>> {
        self.start.as_ref()
    }

    pub fn end(&self) -> Option<&DateTime<Utc>> {
        self.end.as_ref()
    }

    pub(crate) fn validate(&self) -> Result<(), ValidationError> {
        check_order(self.start.as_ref(), self.end.as_ref())
    }

    pub(crate) fn to_wire(&self) -> WireTimestampRange {
        WireTimestampRange {
            start_timestamp_micros: self.start.as_ref().map(timestamp_to_micros),
            end_timestamp_micros: self.end.as_ref().map(timestamp_to_micros),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeDelta;

    use super::*;

    #[test]
    fn test_value_range_bounds() {
        let range = ValueRange::new(
            Some(Bytes::from_static(b"a")),
            Some(Bytes::from_static(b"m")),
            true,
            false,
        )
        .unwrap();
        assert_eq!(
            range.to_wire(),
            WireValueRange {
                start_value: Some(WireBound::Closed(Bytes::from_static(b"a"))),
                end_value: Some(WireBound::Open(Bytes::from_static(b"m"))),
            }
        );
    }

    #[test]
    fn test_value_range_inverted() {
        assert_eq!(
            ValueRange::closed("z", "a"),
            Err(ValidationError::InvertedRange)
        );
        // A single point is a valid range.
        assert!(ValueRange::closed("a", "a").is_ok());
    }

    #[test]
    fn test_column_range_open_ended() {
        let range =
            ColumnRange::new("cf", Some(Bytes::from_static(b"q")), None, false, true).unwrap();
        let wire = range.to_wire();
        assert_eq!(wire.family_name, "cf");
        assert_eq!(
            wire.start_qualifier,
            Some(WireBound::Open(Bytes::from_static(b"q")))
        );
        assert_eq!(wire.end_qualifier, None);
    }

    #[test]
    fn test_column_range_invalid_family() {
        assert_eq!(
            ColumnRange::family("bad:family"),
            Err(ValidationError::InvalidFamilyId("bad:family".to_string()))
        );
    }

    #[test]
    fn test_timestamp_range() {
        let start = DateTime::UNIX_EPOCH + TimeDelta::microseconds(30_871_000);
        let range = TimestampRange::new(Some(start), None).unwrap();
        assert_eq!(
            range.to_wire(),
            WireTimestampRange {
                start_timestamp_micros: Some(30_871_000),
                end_timestamp_micros: None,
            }
        );

        let end = start - TimeDelta::seconds(1);
        assert_eq!(
            TimestampRange::new(Some(start), Some(end)),
            Err(ValidationError::InvertedRange)
        );
    }
}
