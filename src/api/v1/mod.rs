//! REST API
use crate::db::DatabaseError;
use actix_web::body::Body;
use actix_web::http::{header, HeaderValue, StatusCode};
use actix_web::web::Json;
use actix_web::{get, HttpResponse, ResponseError};
use actix_web_httpauth::headers::www_authenticate::bearer::{Bearer, Error};
use actix_web_httpauth::headers::www_authenticate::Challenge;
use serde::Serialize;

pub mod auth;
pub mod events;
pub mod guests;
pub mod middleware;
pub mod rsvps;

// WWW-Authenticate error-descriptions
pub(crate) static INVALID_ACCESS_TOKEN: &str = "invalid access token";
pub(crate) static INVALID_CREDENTIALS: &str = "invalid credentials";

/// Error type of all REST-endpoints
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Contains a bearer WWW-Authenticate header (0) & plaintext body (1) for a 401 response
    #[error("Authentication error: {1}")]
    Auth(Bearer, String),
    /// A duplicate username/email on signup, answered with 400
    #[error("{0}")]
    Conflict(String),
    #[error("The requesting user has insufficient permissions")]
    InsufficientPermission,
    #[error("The requested resource could not be found")]
    NotFound,
    #[error("Bad Request: {0}")]
    BadRequest(String),
    #[error("The provided JSON object does not follow the specified field constraints")]
    ValidationFailed,
    #[error("An internal server error occurred")]
    Internal,
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Auth(_, _) => StatusCode::UNAUTHORIZED,

            Self::Conflict(_) => StatusCode::BAD_REQUEST,

            Self::InsufficientPermission => StatusCode::FORBIDDEN,

            Self::NotFound => StatusCode::NOT_FOUND,

            Self::BadRequest(_) => StatusCode::BAD_REQUEST,

            Self::ValidationFailed => StatusCode::BAD_REQUEST,

            Self::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse<Body> {
        let mut response = HttpResponse::new(self.status_code());

        if let Self::Auth(bearer, _) = self {
            let header_value = match HeaderValue::from_maybe_shared(bearer.to_bytes()) {
                Ok(header_value) => header_value,
                Err(e) => {
                    log::error!(
                        "Error generating HeaderValue for WWW-Authenticate bearer '{:?}', {}",
                        bearer,
                        e
                    );
                    header::HeaderValue::from_static(r#"Bearer error="invalid_request""#)
                }
            };

            response
                .headers_mut()
                .insert(header::WWW_AUTHENTICATE, header_value);
        }

        response.headers_mut().insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("text/plain; charset=utf-8"),
        );

        response.set_body(Body::from(self.to_string()))
    }
}

impl ApiError {
    /// Create an invalid token [`ApiError::Auth`] error
    ///
    /// Resolves to the following WWW-Authenticate header:
    ///
    /// ```text
    /// Bearer error="invalid_token", error_description="<error_description>"
    /// ```
    ///
    /// The `response_body` will be sent as a plaintext body.
    pub fn auth_bearer_invalid_token(
        error_description: &'static str,
        response_body: String,
    ) -> ApiError {
        ApiError::Auth(
            Bearer::build()
                .error(Error::InvalidToken)
                .error_description(error_description)
                .finish(),
            response_body,
        )
    }

    /// Create an invalid request [`ApiError::Auth`] error
    ///
    /// Resolves to the following WWW-Authenticate header:
    ///
    /// ```text
    /// Bearer error="invalid_request", error_description="<error_description>"
    /// ```
    ///
    /// The `response_body` will be sent as a plaintext body.
    pub fn auth_bearer_invalid_request(
        error_description: &'static str,
        response_body: String,
    ) -> ApiError {
        ApiError::Auth(
            Bearer::build()
                .error(Error::InvalidRequest)
                .error_description(error_description)
                .finish(),
            response_body,
        )
    }
}

impl From<DatabaseError> for ApiError {
    fn from(e: DatabaseError) -> Self {
        match e {
            DatabaseError::NotFound => Self::NotFound,
            _ => Self::Internal,
        }
    }
}

/// JSON Body of the health check response
#[derive(Debug, Serialize)]
pub struct HealthStatus {
    message: &'static str,
}

/// API Endpoint *GET /*
///
/// Health check, returns a static healthy message.
#[get("/")]
pub async fn health() -> Json<HealthStatus> {
    Json(HealthStatus { message: "Healthy" })
}
