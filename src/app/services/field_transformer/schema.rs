//! Output column layout derived from the source header

use crate::constants::columns;
use crate::{Error, Result};

/// Ordered output field names
///
/// Source columns keep their order with `DateTime` replaced in place by
/// `Event_DTG`, followed by the six date parts and the four place labels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputSchema {
    fields: Vec<String>,
}

impl OutputSchema {
    /// Derive the output layout from a source header row
    pub fn from_source_headers(headers: &[String]) -> Result<Self> {
        let position = headers
            .iter()
            .position(|h| h == columns::DATE_TIME)
            .ok_or_else(|| Error::missing_column("source header", columns::DATE_TIME))?;

        let mut fields: Vec<String> = headers.to_vec();
        fields[position] = columns::EVENT_DTG.to_string();
        fields.extend(columns::DATE_PARTS.iter().map(|s| s.to_string()));
        fields.extend(columns::LABELS.iter().map(|s| s.to_string()));

        Ok(Self { fields })
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
