//! Domain layer: validation rules and types shared across API resources (no I/O).

mod new_code;
mod paging;
mod validation;

pub use new_code::{
    NEW_CODE_DEFINITION_TYPES, NEW_CODE_PERIOD_TYPES, NUMBER_OF_DAYS, PREVIOUS_VERSION,
    REFERENCE_BRANCH, SPECIFIC_ANALYSIS, validate_new_code_definition,
};
pub use paging::{Page, PaginationArgs, Paging};
pub use validation::{
    MAX_PAGE_SIZE, ValidationError, ValidationErrorKind, is_value_authorized, validate_either,
    validate_format, validate_in_slice, validate_max_length, validate_min_length,
    validate_pagination, validate_range, validate_required,
};

pub(crate) use new_code::validate_days;
pub(crate) use validation::optional;
