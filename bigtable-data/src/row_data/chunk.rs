use bytes::Bytes;

/// One streamed fragment of a row.
///
/// Unset `row_key`, `family_name` and `qualifier` fields continue the values of
/// the preceding chunk of the same row. A chunk with `value_split` set carries
/// only part of a value; the following chunks append to it until one arrives
/// without the flag.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ReadRowsChunk {
    #[serde(default)]
    pub row_key: Option<Bytes>,
    #[serde(default)]
    pub family_name: Option<String>,
    #[serde(default)]
    pub qualifier: Option<Bytes>,
    #[serde(default)]
    pub timestamp_micros: Option<i64>,
    #[serde(default)]
    pub labels: Vec<String>,
    #[serde(default)]
    pub value: Bytes,
    #[serde(default)]
    pub value_split: bool,
    #[serde(default)]
    pub reset_row: bool,
    #[serde(default)]
    pub commit_row: bool,
}

impl ReadRowsChunk {
    /// A complete cell in `family:qualifier`.
    pub fn cell(
        family: impl Into<String>,
        qualifier: impl Into<Bytes>,
        value: impl Into<Bytes>,
    ) -> Self {
        Self {
            family_name: Some(family.into()),
            qualifier: Some(qualifier.into()),
            value: value.into(),
            ..Default::default()
        }
    }

    /// A chunk that only continues a split value.
    pub fn value_fragment(value: impl Into<Bytes>) -> Self {
        Self {
            value: value.into(),
            ..Default::default()
        }
    }

    pub fn reset() -> Self {
        Self {
            reset_row: true,
            ..Default::default()
        }
    }

    /// A bare commit carrying no cell.
    pub fn commit() -> Self {
        Self {
            commit_row: true,
            ..Default::default()
        }
    }

    pub fn with_row_key(mut self, row_key: impl Into<Bytes>) -> Self {
        self.row_key = Some(row_key.into());
        self
    }

    pub fn with_timestamp_micros(mut self, timestamp_micros: i64) -> Self {
        self.timestamp_micros = Some(timestamp_micros);
        self
    }

    pub fn with_labels(mut self, labels: Vec<String>) -> Self {
        self.labels = labels;
        self
    }

    pub fn split(mut self) -> Self {
        self.value_split = true;
        self
    }

    pub fn committing(mut self) -> Self {
        self.commit_row = true;
        self
    }

    /// Whether the chunk describes (part of) a cell, as opposed to being a
    /// pure control signal.
    pub(crate) fn carries_cell_data(&self) -> bool {
        self.family_name.is_some()
            || self.qualifier.is_some()
            || self.timestamp_micros.is_some()
            || !self.labels.is_empty()
            || !self.value.is_empty()
            || self.value_split
    }
}
