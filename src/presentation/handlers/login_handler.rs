use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
};
use chrono::{DateTime, Utc};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::error;

use crate::{
    domain::{
        error::DomainError,
        repositories::{
            attempt_tracker::{AttemptTracker, LockoutStatus},
            credential_repository::CredentialRepository,
        },
        services::password_service::PasswordHasher,
    },
    usecase::login_usecase::{LoginResult, LoginUsecase},
};

// Request

/// json for login request
///
/// No `Debug`: the password must not end up in logs.
#[derive(Deserialize)]
pub struct LoginRequest {
    pub identifier: String,
    pub password: String,
}

// Response

/// json for login response
#[derive(Serialize, Deserialize)]
pub struct LoginResponse {
    pub identifier: String,
    pub authenticated_at: DateTime<Utc>,
}

impl From<LoginResult> for LoginResponse {
    fn from(result: LoginResult) -> Self {
        Self {
            identifier: result.identifier,
            authenticated_at: result.authenticated_at,
        }
    }
}

/* Router Function and Handler Function */

/// function return Router object
/// Suppose to be nested by main router
pub fn create_login_router<C, A, P>(login_service: LoginUsecase<C, A, P>) -> Router
where
    C: CredentialRepository + 'static,
    A: AttemptTracker + LockoutStatus + 'static,
    P: PasswordHasher,
{
    Router::new()
        .route("/login", post(login::<C, A, P>))
        .with_state(Arc::new(login_service))
}

/// handler function for login
async fn login<C, A, P>(
    State(service): State<Arc<LoginUsecase<C, A, P>>>,
    Json(payload): Json<LoginRequest>,
) -> Response
where
    C: CredentialRepository + 'static,
    A: AttemptTracker + LockoutStatus + 'static,
    P: PasswordHasher,
{
    let password = SecretString::from(payload.password);

    match service.login(payload.identifier, password).await {
        Ok(result) => (StatusCode::OK, Json(LoginResponse::from(result))).into_response(),
        Err(err) => error_response(err),
    }
}

/// Unknown identifier, wrong password and locked account share one response.
/// Operational failures are logged here and reported without detail.
fn error_response(err: DomainError) -> Response {
    let (status, message) = match &err {
        DomainError::AuthenticationFailed => (StatusCode::UNAUTHORIZED, "Invalid credentials"),
        DomainError::InvalidInput(_) => (StatusCode::BAD_REQUEST, "Invalid request"),
        DomainError::Timeout => (StatusCode::SERVICE_UNAVAILABLE, "Service unavailable"),
        DomainError::CorruptCredentialRecord(_)
        | DomainError::Repository(_)
        | DomainError::Hashing(_)
        | DomainError::TaskFailed => {
            error!(error = %err, "login failed with internal error");
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
        }
    };

    (status, Json(json!({ "error": message }))).into_response()
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::domain::error::{CorruptRecordError, InputValidationError, RepositoryError};

    #[rstest]
    #[case(DomainError::AuthenticationFailed, StatusCode::UNAUTHORIZED)]
    #[case(
        DomainError::InvalidInput(InputValidationError::PasswordTooLong { max: 1024 }),
        StatusCode::BAD_REQUEST
    )]
    #[case(DomainError::Timeout, StatusCode::SERVICE_UNAVAILABLE)]
    #[case(
        DomainError::CorruptCredentialRecord(CorruptRecordError::MissingSalt),
        StatusCode::INTERNAL_SERVER_ERROR
    )]
    #[case(
        DomainError::Repository(RepositoryError::DatabaseError("down".to_string())),
        StatusCode::INTERNAL_SERVER_ERROR
    )]
    #[case(DomainError::TaskFailed, StatusCode::INTERNAL_SERVER_ERROR)]
    fn errors_map_to_status(#[case] err: DomainError, #[case] expected: StatusCode) {
        assert_eq!(error_response(err).status(), expected);
    }
}
