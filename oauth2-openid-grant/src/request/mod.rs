use http::Uri;
use log::debug;
use url::form_urlencoded;

use crate::{error::AuthorizationError, grant::ResponseType};

use self::extensions::OpenIdExtensions;

pub mod extensions;

/// Query parameters of an inbound authorization request, in arrival order.
///
/// A parameter that occurs more than once is treated as not being a string.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

pub(crate) struct Repeated;

impl QueryParams {
    pub fn parse(query: &str) -> Self {
        form_urlencoded::parse(query.trim_start_matches('?').as_bytes())
            .into_owned()
            .collect()
    }

    pub fn from_uri(uri: &Uri) -> Self {
        Self::parse(uri.query().unwrap_or_default())
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.pairs.push((name.into(), value.into()));
        self
    }

    pub fn get_all(&self, name: &str) -> Vec<&str> {
        self.pairs
            .iter()
            .filter(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
            .collect()
    }

    /// First value of `name`, empty values included.
    pub fn first(&self, name: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// The single, non-empty value of `name`.
    pub(crate) fn single(&self, name: &str) -> Result<Option<&str>, Repeated> {
        match self.get_all(name).as_slice() {
            [] => Ok(None),
            [value] if value.is_empty() => Ok(None),
            [value] => Ok(Some(*value)),
            _ => Err(Repeated),
        }
    }
}

impl<K, V> FromIterator<(K, V)> for QueryParams
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        QueryParams {
            pairs: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Authorization request as accepted by a grant, before consent.
#[derive(Clone, Debug, PartialEq)]
pub struct AuthorizationRequest {
    pub response_type: ResponseType,
    pub client_id: String,
    pub redirect_uri: Option<String>,
    /// Never an empty sequence.
    pub scope: Option<Vec<String>>,
    pub state: Option<String>,
    pub nonce: Option<String>,
    pub response_mode: Option<String>,
    pub extensions: Option<OpenIdExtensions>,
}

impl AuthorizationRequest {
    pub fn new(response_type: ResponseType, client_id: impl Into<String>) -> Self {
        AuthorizationRequest {
            response_type,
            client_id: client_id.into(),
            redirect_uri: None,
            scope: None,
            state: None,
            nonce: None,
            response_mode: None,
            extensions: None,
        }
    }

    pub fn redirect_uri(mut self, redirect_uri: impl Into<String>) -> Self {
        self.redirect_uri = Some(redirect_uri.into());
        self
    }

    pub fn scope(mut self, scope: &[impl ToString]) -> Self {
        self.scope = if scope.is_empty() {
            None
        } else {
            Some(scope.iter().map(|s| s.to_string()).collect())
        };
        self
    }

    pub fn state(mut self, state: impl Into<String>) -> Self {
        self.state = Some(state.into());
        self
    }

    pub fn nonce(mut self, nonce: impl Into<String>) -> Self {
        self.nonce = Some(nonce.into());
        self
    }

    pub fn response_mode(mut self, response_mode: impl Into<String>) -> Self {
        self.response_mode = Some(response_mode.into());
        self
    }

    /// Attach OpenID Connect extension parameters parsed from the same request.
    ///
    /// A nonce the grant did not require is taken over from the extensions.
    pub fn with_extensions(mut self, extensions: OpenIdExtensions) -> Self {
        if self.nonce.is_none() {
            self.nonce = extensions.nonce.clone();
        }
        self.extensions = Some(extensions);
        self
    }
}

/// Parses authorization requests for one response type.
#[derive(Clone, Debug)]
pub struct RequestParser {
    response_type: ResponseType,
    scope_separators: Vec<String>,
}

impl RequestParser {
    pub fn new(response_type: ResponseType, scope_separators: Vec<String>) -> Self {
        RequestParser {
            response_type,
            scope_separators,
        }
    }

    pub fn parse(&self, query: &QueryParams) -> Result<AuthorizationRequest, AuthorizationError> {
        self.parse_inner(query).map_err(|e| {
            debug!("Rejected {} request: {}", self.response_type, e);
            e
        })
    }

    fn parse_inner(&self, query: &QueryParams) -> Result<AuthorizationRequest, AuthorizationError> {
        let client_id = required(query, "client_id")?;
        let nonce = if self.response_type.issues_id_token() {
            Some(required(query, "nonce")?)
        } else {
            None
        };
        let scope = query
            .single("scope")
            .map_err(|_| must_be_string("scope"))?
            .map(|scope| split_scope(scope, &self.scope_separators));

        Ok(AuthorizationRequest {
            response_type: self.response_type,
            client_id,
            redirect_uri: query.first("redirect_uri").map(str::to_owned),
            scope,
            state: query
                .first("state")
                .filter(|state| !state.is_empty())
                .map(str::to_owned),
            nonce,
            response_mode: query.first("response_mode").map(str::to_owned),
            extensions: None,
        })
    }
}

fn required(query: &QueryParams, name: &str) -> Result<String, AuthorizationError> {
    match query.single(name) {
        Ok(Some(value)) => Ok(value.to_owned()),
        Ok(None) => Err(AuthorizationError::InvalidRequest(format!(
            "Missing required parameter: {}",
            name
        ))),
        Err(Repeated) => Err(must_be_string(name)),
    }
}

fn must_be_string(name: &str) -> AuthorizationError {
    AuthorizationError::InvalidRequest(format!("Invalid parameter: {} must be a string", name))
}

/// Split `scope` on the first separator that yields more than one value.
///
/// Separators are tried in order, which lets a server favor spaces and
/// fall back to commas for clients that do not follow RFC 6749.
pub fn split_scope(scope: &str, separators: &[String]) -> Vec<String> {
    separators
        .iter()
        .map(|separator| scope.split(separator.as_str()).collect::<Vec<_>>())
        .find(|values| values.len() > 1)
        .unwrap_or_else(|| vec![scope])
        .into_iter()
        .map(str::to_owned)
        .collect()
}
