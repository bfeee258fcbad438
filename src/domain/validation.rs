//! Field-level validation predicates shared by every request options type.
//!
//! Each helper checks a single value and reports the first violation as a
//! [`ValidationError`] attributed to the wire parameter name.

use std::fmt;

/// Upper bound for `ps` on the generic search endpoints.
pub const MAX_PAGE_SIZE: i64 = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, thiserror::Error)]
/// Category of a [`ValidationError`].
pub enum ValidationErrorKind {
    /// A required value is absent or empty.
    #[error("missing required value")]
    MissingRequired,
    /// The value is not one of the accepted values.
    #[error("invalid value")]
    InvalidValue,
    /// The value does not have the expected shape.
    #[error("invalid format")]
    InvalidFormat,
    /// The value (or its length) is outside the accepted bounds.
    #[error("value out of range")]
    OutOfRange,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// A request option rejected before any HTTP call is made.
///
/// `field` is the API parameter name (for example `projectKey`). The
/// [`kind`](Self::kind) is exposed as the error source, so callers walking the
/// chain can match on it.
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
    pub kind: ValidationErrorKind,
}

impl ValidationError {
    pub fn new(
        field: &'static str,
        kind: ValidationErrorKind,
        message: impl Into<String>,
    ) -> Self {
        Self {
            field,
            message: message.into(),
            kind,
        }
    }

    pub fn missing(field: &'static str) -> Self {
        Self::new(
            field,
            ValidationErrorKind::MissingRequired,
            format!("{field} is required"),
        )
    }

    pub fn invalid_value(field: &'static str, message: impl Into<String>) -> Self {
        Self::new(field, ValidationErrorKind::InvalidValue, message)
    }

    pub fn out_of_range(field: &'static str, message: impl Into<String>) -> Self {
        Self::new(field, ValidationErrorKind::OutOfRange, message)
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.kind)
    }
}

/// Fail with [`ValidationErrorKind::MissingRequired`] when `value` is empty.
pub fn validate_required(value: &str, field: &'static str) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Err(ValidationError::missing(field));
    }
    Ok(())
}

/// Fail with [`ValidationErrorKind::OutOfRange`] when `value` has more than `max` characters.
pub fn validate_max_length(
    value: &str,
    max: usize,
    field: &'static str,
) -> Result<(), ValidationError> {
    let len = value.chars().count();
    if len > max {
        return Err(ValidationError::out_of_range(
            field,
            format!("{field} must be at most {max} characters long (got {len})"),
        ));
    }
    Ok(())
}

/// Fail with [`ValidationErrorKind::OutOfRange`] when a non-empty `value` has fewer
/// than `min` characters. Empty values count as "not provided" and pass.
pub fn validate_min_length(
    value: &str,
    min: usize,
    field: &'static str,
) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Ok(());
    }
    let len = value.chars().count();
    if len < min {
        return Err(ValidationError::out_of_range(
            field,
            format!("{field} must be at least {min} characters long (got {len})"),
        ));
    }
    Ok(())
}

/// Fail with [`ValidationErrorKind::OutOfRange`] when `value` is outside `min..=max`.
pub fn validate_range(
    value: i64,
    min: i64,
    max: i64,
    field: &'static str,
) -> Result<(), ValidationError> {
    if value < min || value > max {
        return Err(ValidationError::out_of_range(
            field,
            format!("{field} must be between {min} and {max} (got {value})"),
        ));
    }
    Ok(())
}

/// Case-insensitive membership check. Empty values pass.
pub fn validate_in_slice(
    value: &str,
    allowed: &[&str],
    field: &'static str,
) -> Result<(), ValidationError> {
    if value.is_empty() || allowed.iter().any(|it| it.eq_ignore_ascii_case(value)) {
        return Ok(());
    }
    Err(not_authorized(value, allowed, field))
}

/// Exact membership check. Unlike [`validate_in_slice`], an empty value is rejected.
pub fn is_value_authorized(
    value: &str,
    allowed: &[&str],
    field: &'static str,
) -> Result<(), ValidationError> {
    if allowed.contains(&value) {
        return Ok(());
    }
    Err(not_authorized(value, allowed, field))
}

fn not_authorized(value: &str, allowed: &[&str], field: &'static str) -> ValidationError {
    ValidationError::invalid_value(
        field,
        format!(
            "value {value:?} is not authorized for {field}; expected one of: {}",
            allowed.join(", ")
        ),
    )
}

/// Check generic paging arguments. Zero means "not provided" for both values.
pub fn validate_pagination(page: i64, page_size: i64) -> Result<(), ValidationError> {
    validate_paging_bounds(page, page_size, MAX_PAGE_SIZE)
}

pub(crate) fn validate_paging_bounds(
    page: i64,
    page_size: i64,
    max_page_size: i64,
) -> Result<(), ValidationError> {
    if page != 0 && page < 1 {
        return Err(ValidationError::out_of_range(
            "p",
            format!("p must be greater than or equal to 1 (got {page})"),
        ));
    }
    if page_size != 0 {
        validate_range(page_size, 1, max_page_size, "ps")?;
    }
    Ok(())
}

/// Require that at least one of two alternative parameters is provided.
///
/// The error is attributed to `field`, which usually names both alternatives.
pub fn validate_either(
    first: Option<&str>,
    second: Option<&str>,
    field: &'static str,
) -> Result<(), ValidationError> {
    let provided = |value: Option<&str>| value.is_some_and(|it| !it.is_empty());
    if provided(first) || provided(second) {
        return Ok(());
    }
    Err(ValidationError::new(
        field,
        ValidationErrorKind::MissingRequired,
        format!("either of {field} must be provided"),
    ))
}

/// Fail with [`ValidationErrorKind::InvalidFormat`] when a non-empty `value` does
/// not satisfy `is_valid`. `expected` describes the accepted shape.
pub fn validate_format(
    value: &str,
    is_valid: impl Fn(&str) -> bool,
    field: &'static str,
    expected: &str,
) -> Result<(), ValidationError> {
    if value.is_empty() || is_valid(value) {
        return Ok(());
    }
    Err(ValidationError::new(
        field,
        ValidationErrorKind::InvalidFormat,
        format!("{field} must be {expected} (got {value:?})"),
    ))
}

/// Apply `check` to an optional value; `None` passes.
pub(crate) fn optional<T: ?Sized>(
    value: Option<&T>,
    check: impl FnOnce(&T) -> Result<(), ValidationError>,
) -> Result<(), ValidationError> {
    match value {
        Some(value) => check(value),
        None => Ok(()),
    }
}
