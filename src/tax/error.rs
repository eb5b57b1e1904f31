use crate::core::{MalformedRecord, ValidationErrors, VehicleCategory};
use schemars::JsonSchema;
use serde::Serialize;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TaxError {
    #[error("invalid vehicle details: {0}")]
    Validation(ValidationErrors),
    #[error("Vehicle category not supported yet: {0}")]
    UnsupportedCategory(VehicleCategory),
}

impl TaxError {
    /// Whether the caller supplied bad input, as opposed to the rules being incomplete
    pub fn is_client_error(&self) -> bool {
        matches!(self, TaxError::Validation(_))
    }
}

impl From<ValidationErrors> for TaxError {
    fn from(errors: ValidationErrors) -> Self {
        TaxError::Validation(errors)
    }
}

/// Error payload returned to callers in place of a `TaxResult`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ErrorReport {
    /// HTTP-style status code: 400 for bad input, 500 otherwise
    pub status: u16,
    pub message: String,
    pub debug_message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validation_errors: Option<ValidationErrors>,
}

impl ErrorReport {
    /// Report for a failure with no field-level details, such as an unsupported category
    pub fn internal(message: impl Into<String>) -> Self {
        ErrorReport {
            status: 500,
            message: message.into(),
            debug_message: "An internal error occurred".to_string(),
            validation_errors: None,
        }
    }
}

impl From<&TaxError> for ErrorReport {
    fn from(err: &TaxError) -> Self {
        match err {
            TaxError::Validation(errors) => ErrorReport {
                status: 400,
                message: "Validation error".to_string(),
                debug_message: "One or more fields have an error".to_string(),
                validation_errors: Some(errors.clone()),
            },
            TaxError::UnsupportedCategory(_) => ErrorReport::internal(err.to_string()),
        }
    }
}

impl From<&MalformedRecord> for ErrorReport {
    fn from(err: &MalformedRecord) -> Self {
        ErrorReport {
            status: 400,
            message: "Malformed vehicle record".to_string(),
            debug_message: err.to_string(),
            validation_errors: None,
        }
    }
}
