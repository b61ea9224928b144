use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use std::env;
use std::fmt;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Error {
    pub code: i32,
    pub message: String,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (code {})", self.message, self.code)
    }
}

impl From<env::VarError> for Error {
    fn from(err: env::VarError) -> Self {
        env_var_error(err)
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        reqwest_error(err)
    }
}

impl Error {
    pub fn is_internal(&self) -> bool {
        (1..=99).contains(&self.code)
    }
}

// User-facing failures are shown in place of the result page, so they go out
// as plain text with a 200 status.
impl IntoResponse for Error {
    fn into_response(self) -> Response {
        if self.is_internal() {
            tracing::error!(code = self.code, message = %self.message, "request failed");
            return (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response();
        }

        (StatusCode::OK, self.message).into_response()
    }
}

pub fn env_var_error(err: env::VarError) -> Error {
    Error {
        code: 1,
        message: format!("environment variable error: {}", err),
    }
}

pub fn invalid_config_error(detail: &str) -> Error {
    Error {
        code: 2,
        message: format!("invalid configuration: {}", detail),
    }
}

pub fn reqwest_error(err: reqwest::Error) -> Error {
    // the url carries the access token
    Error {
        code: 3,
        message: format!("request failed: {}", err.without_url()),
    }
}

pub fn upstream_error(status: u16) -> Error {
    Error {
        code: 4,
        message: format!("upstream returned status {}", status),
    }
}

pub fn malformed_response_error(detail: &str) -> Error {
    Error {
        code: 5,
        message: format!("malformed upstream response: {}", detail),
    }
}

pub fn server_error(detail: &str) -> Error {
    Error {
        code: 6,
        message: format!("server error: {}", detail),
    }
}

pub fn unresolved_address_error() -> Error {
    Error {
        code: 102,
        message: "could not resolve coordinates for one of the addresses".into(),
    }
}

pub fn no_routes_error() -> Error {
    Error {
        code: 103,
        message: "could not obtain routes".into(),
    }
}

#[test]
fn internal_errors_hide_their_message() {
    let response = server_error("bind failed").into_response();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[test]
fn user_facing_errors_render_with_ok_status() {
    let err = no_routes_error();
    assert!(!err.is_internal());

    let response = err.into_response();
    assert_eq!(response.status(), StatusCode::OK);
}

#[test]
fn missing_variable_maps_to_env_var_error() {
    let err: Error = env::VarError::NotPresent.into();

    assert_eq!(err.code, 1);
    assert!(err.is_internal());
}
