use serde::Deserialize;

use crate::domain::validation::{MAX_PAGE_SIZE, ValidationError, validate_paging_bounds};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
/// Paging arguments (`p`, `ps`) shared by the search endpoints.
///
/// `None` and `Some(0)` are both treated as "not provided" and are not sent.
pub struct PaginationArgs {
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

impl PaginationArgs {
    pub fn new(page: u32, page_size: u32) -> Self {
        Self {
            page: Some(page),
            page_size: Some(page_size),
        }
    }

    /// Validate against the generic `[1, 500]` page-size bound.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.validate_with_max(MAX_PAGE_SIZE)
    }

    /// Validate against an endpoint-specific page-size bound.
    pub fn validate_with_max(&self, max_page_size: i64) -> Result<(), ValidationError> {
        validate_paging_bounds(
            self.page.map(i64::from).unwrap_or(0),
            self.page_size.map(i64::from).unwrap_or(0),
            max_page_size,
        )
    }

    pub(crate) fn with_page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
/// Paging block returned by search endpoints.
pub struct Paging {
    pub page_index: u32,
    pub page_size: u32,
    pub total: u64,
}

/// One page of items plus the total count reported by the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ValidationErrorKind;

    #[test]
    fn unset_arguments_are_valid() {
        assert!(PaginationArgs::default().validate().is_ok());
        assert!(
            PaginationArgs {
                page: Some(0),
                page_size: Some(0)
            }
            .validate()
            .is_ok()
        );
    }

    #[test]
    fn endpoint_specific_bound_applies() {
        let args = PaginationArgs::new(1, 101);
        assert!(args.validate().is_ok());
        let err = args.validate_with_max(100).unwrap_err();
        assert_eq!(err.field, "ps");
        assert_eq!(err.kind, ValidationErrorKind::OutOfRange);
    }

    #[test]
    fn paging_defaults_missing_keys() {
        let paging: Paging = serde_json::from_str(r#"{"pageIndex": 2}"#).unwrap();
        assert_eq!(
            paging,
            Paging {
                page_index: 2,
                page_size: 0,
                total: 0
            }
        );
    }
}
