use actix_web::error::ErrorInternalServerError;
use tracing::error;

use crate::store::StoreError;

pub mod analytics;
pub mod checkin;
pub mod course;
pub mod remediation;
pub mod session;


/// Storage failures are logged and hidden behind a generic 500.
pub(crate) fn storage_failure(e: StoreError) -> actix_web::Error {
    error!(error = %e, "Storage operation failed");
    ErrorInternalServerError("Internal Server Error")
}
