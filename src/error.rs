use super::types::LineId;
use chrono::NaiveDate;

/// Constraint violations attached to a single buffer field.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum FieldError {
    #[error("This field is required")]
    Required,
    #[error("Value must be at least {min}")]
    Min { min: String },
    #[error("Value must not exceed {max}")]
    Max { max: String },
    #[error("Value does not match the expected format")]
    Pattern,
    #[error("Remaining quantity on the stock is {remaining}")]
    QuantityOverflow { remaining: u32 },
    #[error("Selected item is not available in the current item list")]
    UnknownProduct,
}

/// Misuse of the item list contract. Validation failures and duplicates are
/// outcomes, not errors, and never show up here.
#[derive(thiserror::Error, Debug)]
pub enum ListError {
    #[error("Item list is disabled")]
    Disabled,
    #[error("No line is being composed")]
    NotComposing,
    #[error("No line with id {0} in the item list")]
    UnknownLine(LineId),
    #[error("Failed to allocate a draft line id")]
    Identifier(#[from] anyhow::Error),
}

/// Document level checks run by a draft on submit.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum DraftError {
    #[error("Not permitted to {0} this document")]
    Forbidden(&'static str),
    #[error("Description exceeds {0} characters")]
    DescriptionTooLong(usize),
    #[error("Document date is required")]
    MissingDate,
    #[error("Document date {date} must fall between {min} and {max}")]
    DateOutOfRange {
        date: NaiveDate,
        min: NaiveDate,
        max: NaiveDate,
    },
    #[error("A {0} must be selected")]
    MissingParty(&'static str),
    #[error("Document has no line items")]
    NoLines,
}
