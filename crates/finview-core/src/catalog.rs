//! Filter catalog: the closed set of fields the transaction list
//! can filter on, and how raw input becomes a wire-ready value
//!
//! The catalog is fixed at startup and never mutated. Field keys
//! double as the wire parameter names of the combined transaction
//! endpoint.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use crate::error::{CoreError, CoreResult};

/// How a field's raw input maps to a wire value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterValueKind {
    /// Local date+time boundary, serialized zero-padded with no
    /// timezone suffix
    DateTimeBoundary,
    /// One option out of a server-provided list, serialized as the
    /// option's identifier
    Enumerated,
    /// Raw user text, passed through unmodified
    FreeText,
}

/// One filterable field
#[derive(Debug, Clone, Copy)]
pub struct FilterField {
    /// Wire parameter name
    pub key: &'static str,
    /// Display name
    pub label: &'static str,
    pub kind: FilterValueKind,
}

/// Field newly added filters default to
pub const DEFAULT_FILTER_FIELD: &str = "description";

/// Canonical wire form of a date-time boundary
const DATETIME_WIRE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Input forms accepted for a date-time boundary
const DATETIME_INPUT_FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"];

/// The fixed registry of filterable fields
#[derive(Debug, Clone)]
pub struct FilterCatalog {
    fields: Vec<FilterField>,
}

impl FilterCatalog {
    /// The catalog of the combined transaction list
    pub fn standard() -> Self {
        Self {
            fields: vec![
                FilterField {
                    key: "datetime_from",
                    label: "Date from",
                    kind: FilterValueKind::DateTimeBoundary,
                },
                FilterField {
                    key: "datetime_to",
                    label: "Date to",
                    kind: FilterValueKind::DateTimeBoundary,
                },
                FilterField {
                    key: "transaction_type",
                    label: "Type",
                    kind: FilterValueKind::Enumerated,
                },
                FilterField {
                    key: "account",
                    label: "Account",
                    kind: FilterValueKind::Enumerated,
                },
                FilterField {
                    key: "category",
                    label: "Category",
                    kind: FilterValueKind::Enumerated,
                },
                FilterField {
                    key: "description",
                    label: "Description",
                    kind: FilterValueKind::FreeText,
                },
            ],
        }
    }

    /// All registered fields, in display order
    pub fn fields(&self) -> &[FilterField] {
        &self.fields
    }

    /// Look up a field by key
    pub fn describe(&self, key: &str) -> CoreResult<&FilterField> {
        self.fields
            .iter()
            .find(|field| field.key == key)
            .ok_or_else(|| CoreError::UnknownField {
                key: key.to_string(),
            })
    }

    /// Coerce raw input into the wire value for `key`'s field
    pub fn coerce(&self, key: &str, raw: &str) -> CoreResult<String> {
        let field = self.describe(key)?;
        match field.kind {
            FilterValueKind::DateTimeBoundary => coerce_datetime(raw),
            FilterValueKind::Enumerated | FilterValueKind::FreeText => Ok(raw.to_string()),
        }
    }
}

impl Default for FilterCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

/// Cleared input means "no boundary" and stays an empty string; the
/// translator still emits the parameter.
fn coerce_datetime(raw: &str) -> CoreResult<String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(String::new());
    }
    for format in DATETIME_INPUT_FORMATS {
        if let Ok(datetime) = NaiveDateTime::parse_from_str(raw, format) {
            return Ok(datetime.format(DATETIME_WIRE_FORMAT).to_string());
        }
    }
    // A bare date means midnight at the start of that day
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(date
            .and_time(NaiveTime::MIN)
            .format(DATETIME_WIRE_FORMAT)
            .to_string());
    }
    Err(CoreError::InvalidDateValue {
        input: raw.to_string(),
    })
}

// ==================== Tests ====================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_keys_unique() {
        let catalog = FilterCatalog::standard();
        let mut keys: Vec<&str> = catalog.fields().iter().map(|f| f.key).collect();
        keys.sort_unstable();
        keys.dedup();
        assert_eq!(keys.len(), catalog.fields().len());
    }

    #[test]
    fn test_describe_known_field() {
        let catalog = FilterCatalog::standard();
        let field = catalog.describe("datetime_from").unwrap();
        assert_eq!(field.kind, FilterValueKind::DateTimeBoundary);
        let field = catalog.describe("description").unwrap();
        assert_eq!(field.kind, FilterValueKind::FreeText);
    }

    #[test]
    fn test_describe_unknown_field() {
        let catalog = FilterCatalog::standard();
        let result = catalog.describe("amount_exact");
        assert!(matches!(result, Err(CoreError::UnknownField { .. })));
    }

    #[test]
    fn test_coerce_datetime_zero_padded() {
        let catalog = FilterCatalog::standard();
        assert_eq!(
            catalog.coerce("datetime_from", "2024-06-05 07:08:09").unwrap(),
            "2024-06-05T07:08:09"
        );
        assert_eq!(
            catalog.coerce("datetime_to", "2024-06-05 07:08").unwrap(),
            "2024-06-05T07:08:00"
        );
        assert_eq!(
            catalog.coerce("datetime_from", "2024-12-31T23:59:59").unwrap(),
            "2024-12-31T23:59:59"
        );
    }

    #[test]
    fn test_coerce_bare_date_is_midnight() {
        let catalog = FilterCatalog::standard();
        assert_eq!(
            catalog.coerce("datetime_from", "2024-06-05").unwrap(),
            "2024-06-05T00:00:00"
        );
    }

    #[test]
    fn test_coerce_empty_datetime_stays_empty() {
        let catalog = FilterCatalog::standard();
        assert_eq!(catalog.coerce("datetime_from", "").unwrap(), "");
        assert_eq!(catalog.coerce("datetime_to", "   ").unwrap(), "");
    }

    #[test]
    fn test_coerce_invalid_datetime_rejected() {
        let catalog = FilterCatalog::standard();
        let result = catalog.coerce("datetime_from", "yesterday");
        assert!(matches!(result, Err(CoreError::InvalidDateValue { .. })));
    }

    #[test]
    fn test_coerce_passthrough_kinds() {
        let catalog = FilterCatalog::standard();
        assert_eq!(catalog.coerce("category", "5").unwrap(), "5");
        assert_eq!(
            catalog.coerce("description", "coffee & cake").unwrap(),
            "coffee & cake"
        );
    }
}
