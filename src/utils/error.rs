use log::error;
use rocket::http::Status;
use rocket::response::status::Custom;
use rocket::response::{self, Responder};
use rocket::serde::json::Json;
use rocket::Request;
use serde_json::json;
use thiserror::Error;

/// Unified request-failure taxonomy. Database detail never reaches the
/// client; it is logged and replaced with a generic message.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("{0}")]
    Conflict(&'static str),
    #[error("database error: {0}")]
    Database(#[from] mongodb::error::Error),
    #[error("internal error")]
    Internal,
}

impl ApiError {
    pub fn status(&self) -> Status {
        match self {
            ApiError::Validation(_) => Status::BadRequest,
            ApiError::InvalidCredentials => Status::Unauthorized,
            ApiError::NotFound(_) => Status::NotFound,
            ApiError::Conflict(_) => Status::Conflict,
            ApiError::Database(_) | ApiError::Internal => Status::InternalServerError,
        }
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let detail = errors
            .field_errors()
            .into_iter()
            .next()
            .map(|(field, errs)| match errs.first().and_then(|e| e.message.clone()) {
                Some(message) => format!("{field}: {message}"),
                None => format!("{field}: invalid value"),
            })
            .unwrap_or_else(|| "invalid payload".to_string());
        ApiError::Validation(detail)
    }
}

impl<'r> Responder<'r, 'static> for ApiError {
    fn respond_to(self, request: &'r Request<'_>) -> response::Result<'static> {
        let status = self.status();
        let message = if status == Status::InternalServerError {
            error!("{} {} failed: {self}", request.method(), request.uri());
            "Internal server error".to_string()
        } else {
            self.to_string()
        };
        Custom(status, Json(json!({ "success": false, "error": message }))).respond_to(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[test]
    fn status_codes_follow_the_taxonomy() {
        assert_eq!(ApiError::Validation("x".into()).status(), Status::BadRequest);
        assert_eq!(ApiError::InvalidCredentials.status(), Status::Unauthorized);
        assert_eq!(ApiError::NotFound("contact").status(), Status::NotFound);
        assert_eq!(ApiError::Conflict("duplicate").status(), Status::Conflict);
        assert_eq!(ApiError::Internal.status(), Status::InternalServerError);
    }

    #[test]
    fn validation_errors_name_the_failing_field() {
        #[derive(Validate)]
        struct Probe {
            #[validate(length(min = 10, message = "must be 10-2000 characters"))]
            message: String,
        }

        let err: ApiError = Probe { message: "hi".to_string() }.validate().unwrap_err().into();
        assert_eq!(err.to_string(), "message: must be 10-2000 characters");
        assert_eq!(err.status(), Status::BadRequest);
    }
}
