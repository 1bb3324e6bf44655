use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use roster_core::error::RosterError;

// ---------------------------------------------------------------------------
// Sentinels carried through the anyhow chain
// ---------------------------------------------------------------------------

/// Explicit 404 for things the core does not know about (form sessions).
#[derive(Debug)]
struct NotFoundError(String);

impl std::fmt::Display for NotFoundError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for NotFoundError {}

/// Explicit 422 for a submit attempted while the form is invalid.
#[derive(Debug)]
struct UnprocessableError(String);

impl std::fmt::Display for UnprocessableError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for UnprocessableError {}

// ---------------------------------------------------------------------------
// AppError
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct AppError(pub anyhow::Error);

impl AppError {
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self(NotFoundError(msg.into()).into())
    }

    pub fn unprocessable(msg: impl Into<String>) -> Self {
        Self(UnprocessableError(msg.into()).into())
    }

    fn status(&self) -> StatusCode {
        if self.0.downcast_ref::<NotFoundError>().is_some() {
            return StatusCode::NOT_FOUND;
        }
        if self.0.downcast_ref::<UnprocessableError>().is_some() {
            return StatusCode::UNPROCESSABLE_ENTITY;
        }
        match self.0.downcast_ref::<RosterError>() {
            Some(RosterError::EmployeeNotFound(_)) => StatusCode::NOT_FOUND,
            Some(
                RosterError::PathNotFound(_)
                | RosterError::NodeKind { .. }
                | RosterError::MissingMessage { .. }
                | RosterError::InvalidValue { .. }
                | RosterError::InvalidContactPreference(_)
                | RosterError::InvalidProficiency(_)
                | RosterError::MissingEmployeeId,
            ) => StatusCode::BAD_REQUEST,
            Some(RosterError::Io(_) | RosterError::Yaml(_) | RosterError::Json(_)) | None => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %format!("{:#}", self.0), "request failed");
        }
        let body = serde_json::json!({ "error": self.0.to_string() });
        (status, axum::Json(body)).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn employee_not_found_maps_to_404() {
        let err = AppError(RosterError::EmployeeNotFound(3).into());
        assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn unknown_path_maps_to_400() {
        let err = AppError(RosterError::PathNotFound("nope".into()).into());
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn invalid_value_maps_to_400() {
        let err = AppError(
            RosterError::InvalidValue {
                field: "skills.0.proficiency".into(),
                value: "guru".into(),
            }
            .into(),
        );
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn io_error_maps_to_500() {
        let err = AppError(RosterError::Io(std::io::Error::other("disk full")).into());
        assert_eq!(
            err.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn foreign_error_maps_to_500() {
        let err = AppError(anyhow::anyhow!("something unexpected"));
        assert_eq!(
            err.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn sentinels_map_to_their_status() {
        assert_eq!(
            AppError::not_found("no session").into_response().status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::unprocessable("invalid").into_response().status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }

    #[test]
    fn body_is_json() {
        let response = AppError::not_found("no session").into_response();
        let ct = response
            .headers()
            .get(axum::http::header::CONTENT_TYPE)
            .expect("should have content-type");
        assert!(ct.to_str().unwrap().contains("application/json"));
    }
}
