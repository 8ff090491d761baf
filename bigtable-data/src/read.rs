use bytes::{Bytes, BytesMut};

use crate::{error::CompileError, filter::Filter, wire::WireFilter};

/// Rows selected by a read.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RowSet {
    Key(Bytes),
    Range(RowRange),
}

/// Start key inclusive, end key exclusive. Unset bounds are open.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct RowRange {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub start_key: Option<Bytes>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub end_key: Option<Bytes>,
}

impl RowSet {
    pub fn key(key: impl Into<Bytes>) -> Self {
        RowSet::Key(key.into())
    }

    pub fn range(start_key: Option<impl Into<Bytes>>, end_key: Option<impl Into<Bytes>>) -> Self {
        RowSet::Range(RowRange {
            start_key: start_key.map(Into::into),
            end_key: end_key.map(Into::into),
        })
    }

    /// Every row of the table.
    pub fn all() -> Self {
        RowSet::Range(RowRange::default())
    }
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ReadRowsRequest {
    pub table_name: String,
    pub rows: RowSet,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub filter: Option<WireFilter>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub rows_limit: Option<u64>,
}

impl ReadRowsRequest {
    pub fn new(table_name: impl Into<String>, rows: RowSet) -> Self {
        Self {
            table_name: table_name.into(),
            rows,
            filter: None,
            rows_limit: None,
        }
    }

    pub fn with_filter(mut self, filter: &Filter) -> Result<Self, CompileError> {
        self.filter = Some(filter.compile()?);
        Ok(self)
    }

    pub fn with_rows_limit(mut self, rows_limit: u64) -> Self {
        self.rows_limit = Some(rows_limit);
        self
    }

    /// Builds the request that continues this read after `last_key`, once
    /// `rows_read` rows have been received. `None` when nothing remains.
    pub fn resume_after(&self, last_key: &Bytes, rows_read: u64) -> Option<Self> {
        let rows_limit = match self.rows_limit {
            Some(limit) if rows_read >= limit => return None,
            Some(limit) => Some(limit - rows_read),
            None => None,
        };

        let rows = match &self.rows {
            RowSet::Key(key) if key <= last_key => return None,
            RowSet::Key(key) => RowSet::Key(key.clone()),
            RowSet::Range(range) => {
                let next = key_successor(last_key);
                let start_key = match &range.start_key {
                    Some(start) if *start > next => start.clone(),
                    _ => next,
                };
                if let Some(end) = &range.end_key {
                    if start_key >= *end {
                        return None;
                    }
                }
                RowSet::Range(RowRange {
                    start_key: Some(start_key),
                    end_key: range.end_key.clone(),
                })
            }
        };

        Some(Self {
            table_name: self.table_name.clone(),
            rows,
            filter: self.filter.clone(),
            rows_limit,
        })
    }
}

/// Smallest key strictly greater than `key`.
fn key_successor(key: &Bytes) -> Bytes {
    let mut next = BytesMut::with_capacity(key.len() + 1);
    next.extend_from_slice(key);
    next.extend_from_slice(&[0]);
    next.freeze()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_filter_compiles() {
        let request = ReadRowsRequest::new("t", RowSet::all())
            .with_filter(&Filter::StripValue)
            .unwrap();
        assert_eq!(
            request.filter,
            Some(WireFilter::StripValueTransformer(true))
        );

        let invalid = ReadRowsRequest::new("t", RowSet::all()).with_filter(&Filter::Chain(vec![]));
        assert!(invalid.is_err());
    }

    #[test]
    fn test_resume_range() {
        let request = ReadRowsRequest::new("t", RowSet::range(Some("a"), Some("m")))
            .with_rows_limit(10);
        let resumed = request
            .resume_after(&Bytes::from_static(b"c"), 3)
            .unwrap();

        assert_eq!(resumed.rows, RowSet::range(Some(&b"c\x00"[..]), Some("m")));
        assert_eq!(resumed.rows_limit, Some(7));
    }

    #[test]
    fn test_resume_open_range() {
        let request = ReadRowsRequest::new("t", RowSet::all());
        let resumed = request
            .resume_after(&Bytes::from_static(b"k"), 1)
            .unwrap();
        assert_eq!(
            resumed.rows,
            RowSet::Range(RowRange {
                start_key: Some(Bytes::from_static(b"k\x00")),
                end_key: None,
            })
        );
        assert_eq!(resumed.rows_limit, None);
    }

    #[test]
    fn test_resume_exhausted() {
        let limited = ReadRowsRequest::new("t", RowSet::all()).with_rows_limit(2);
        assert!(limited.resume_after(&Bytes::from_static(b"b"), 2).is_none());

        let single = ReadRowsRequest::new("t", RowSet::key("r1"));
        assert!(single.resume_after(&Bytes::from_static(b"r1"), 1).is_none());

        let range = ReadRowsRequest::new("t", RowSet::range(Some("a"), Some("c\x00")));
        assert!(range.resume_after(&Bytes::from_static(b"c"), 1).is_none());
    }
}
