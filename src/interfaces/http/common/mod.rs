//! Shared HTTP building blocks

pub mod response;
pub mod validated_json;

pub use response::{api_error, status_for, ApiError, ErrorResponse};
pub use validated_json::{ValidatedJson, ValidatedJsonRejection};
