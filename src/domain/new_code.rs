use crate::domain::validation::{
    ValidationError, ValidationErrorKind, is_value_authorized, validate_format, validate_required,
};

pub const PREVIOUS_VERSION: &str = "PREVIOUS_VERSION";
pub const NUMBER_OF_DAYS: &str = "NUMBER_OF_DAYS";
pub const REFERENCE_BRANCH: &str = "REFERENCE_BRANCH";
/// Only valid for a branch-scoped `new_code_periods/set`.
pub const SPECIFIC_ANALYSIS: &str = "SPECIFIC_ANALYSIS";

/// Accepted `newCodeDefinitionType` values on project import.
pub const NEW_CODE_DEFINITION_TYPES: &[&str] =
    &[PREVIOUS_VERSION, NUMBER_OF_DAYS, REFERENCE_BRANCH];

/// Accepted `type` values of `new_code_periods/set`.
pub const NEW_CODE_PERIOD_TYPES: &[&str] = &[
    PREVIOUS_VERSION,
    NUMBER_OF_DAYS,
    REFERENCE_BRANCH,
    SPECIFIC_ANALYSIS,
];

/// Require a positive number of days.
pub(crate) fn validate_days(value: &str, field: &'static str) -> Result<(), ValidationError> {
    validate_required(value, field)?;
    validate_format(
        value,
        |it| it.parse::<u32>().is_ok_and(|days| days > 0),
        field,
        "a positive number of days",
    )
}

/// Check a new-code definition `(type, value)` pair.
///
/// `NUMBER_OF_DAYS` needs a positive number of days as value; the other types
/// must not carry a value. A value without a type is rejected.
pub fn validate_new_code_definition(
    definition_type: Option<&str>,
    value: Option<&str>,
    type_field: &'static str,
    value_field: &'static str,
) -> Result<(), ValidationError> {
    let value = value.unwrap_or_default();
    let Some(definition_type) = definition_type.filter(|it| !it.is_empty()) else {
        if value.is_empty() {
            return Ok(());
        }
        return Err(ValidationError::missing(type_field));
    };

    is_value_authorized(definition_type, NEW_CODE_DEFINITION_TYPES, type_field)?;

    if definition_type == NUMBER_OF_DAYS {
        return validate_days(value, value_field);
    }

    if !value.is_empty() {
        return Err(ValidationError::new(
            value_field,
            ValidationErrorKind::InvalidValue,
            format!("{value_field} must not be set when {type_field} is {definition_type}"),
        ));
    }
    Ok(())
}
