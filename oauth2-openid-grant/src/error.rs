use std::{error::Error, fmt::Display};

use http::{Response, StatusCode};

use crate::artifacts::ResponseParams;

/// Error type issuers and finalizers report failures with.
///
/// Returning an [AuthorizationError] boxed into a `BoxError` keeps its code
/// and description intact; any other error is reported as `server_error`.
pub type BoxError = Box<dyn Error + Send + Sync>;

pub(crate) const DENIED_BY_SERVER: &str = "Request denied by authorization server";
pub(crate) const UNABLE_TO_REDIRECT: &str = "Unable to issue redirect for OAuth 2.0 transaction";

#[derive(Clone, Debug, PartialEq)]
pub enum StartupError {
    InvalidParameter(String),
    MissingIssuer {
        response_type: &'static str,
        issuer: &'static str,
    },
}

impl Display for StartupError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StartupError::MissingIssuer {
                response_type,
                issuer,
            } => write!(f, "{} grant requires an {} issuer", response_type, issuer),
            _ => write!(f, "{:?}", self),
        }
    }
}
impl Error for StartupError {}

/// Failure of an authorization exchange, at request parsing or decision time.
#[derive(Clone, Debug, PartialEq)]
pub enum AuthorizationError {
    /// Malformed or missing request parameter.
    InvalidRequest(String),
    /// The resource owner or an issuer declined the request.
    AccessDenied(String),
    /// No responder is registered for the requested response mode.
    UnsupportedResponseMode(String),
    /// Opaque failure, typically raised by an issuer.
    ServerError(String),
    /// An OAuth 2.0 error chosen by the integrator, e.g. `invalid_scope`.
    Protocol {
        code: String,
        description: Option<String>,
        uri: Option<String>,
    },
}

impl AuthorizationError {
    pub fn protocol(code: impl Into<String>, description: impl Into<String>) -> Self {
        AuthorizationError::Protocol {
            code: code.into(),
            description: Some(description.into()),
            uri: None,
        }
    }

    /// Machine readable OAuth 2.0 error code.
    pub fn code(&self) -> &str {
        match self {
            AuthorizationError::InvalidRequest(_) => "invalid_request",
            AuthorizationError::AccessDenied(_) => "access_denied",
            AuthorizationError::UnsupportedResponseMode(_) => "unsupported_response_mode",
            AuthorizationError::ServerError(_) => "server_error",
            AuthorizationError::Protocol { code, .. } if !code.is_empty() => code.as_str(),
            AuthorizationError::Protocol { .. } => "server_error",
        }
    }

    /// Human readable message, if any.
    pub fn description(&self) -> Option<String> {
        let description = match self {
            AuthorizationError::InvalidRequest(message)
            | AuthorizationError::AccessDenied(message)
            | AuthorizationError::ServerError(message) => Some(message.clone()),
            AuthorizationError::UnsupportedResponseMode(mode) => {
                Some(format!("Unsupported response mode: {}", mode))
            }
            AuthorizationError::Protocol { description, .. } => description.clone(),
        };
        description.filter(|d| !d.is_empty())
    }

    pub fn uri(&self) -> Option<&str> {
        match self {
            AuthorizationError::Protocol { uri, .. } => uri.as_deref(),
            _ => None,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AuthorizationError::InvalidRequest(_) | AuthorizationError::Protocol { .. } => {
                StatusCode::BAD_REQUEST
            }
            AuthorizationError::AccessDenied(_) => StatusCode::FORBIDDEN,
            AuthorizationError::UnsupportedResponseMode(_) => StatusCode::NOT_IMPLEMENTED,
            AuthorizationError::ServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Parameters a responder encodes to deliver this error to the client.
    pub fn to_params(&self, state: Option<&str>) -> ResponseParams {
        let mut params = ResponseParams::new();
        params.set("error", self.code());
        if let Some(description) = self.description() {
            params.set("error_description", description);
        }
        if let Some(uri) = self.uri() {
            params.set("error_uri", uri);
        }
        if let Some(state) = state {
            params.set("state", state);
        }
        params
    }

    pub(crate) fn denied_by_server() -> Self {
        AuthorizationError::AccessDenied(DENIED_BY_SERVER.to_owned())
    }

    pub(crate) fn from_issuer_error(error: BoxError) -> Self {
        match error.downcast::<AuthorizationError>() {
            Ok(error) => *error,
            Err(error) => AuthorizationError::ServerError(error.to_string()),
        }
    }
}

impl Display for AuthorizationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.description() {
            Some(description) => write!(f, "{}: {}", self.code(), description),
            None => write!(f, "{}", self.code()),
        }
    }
}
impl Error for AuthorizationError {}

impl<B> From<AuthorizationError> for Response<B>
where
    B: Default,
{
    fn from(e: AuthorizationError) -> Self {
        let mut response = Response::new(B::default());
        *response.status_mut() = e.status();
        response
    }
}
