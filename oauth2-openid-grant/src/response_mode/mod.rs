use std::{collections::HashMap, fmt, sync::Arc};

use http::{header::LOCATION, Response, StatusCode};
use url::Url;

#[cfg(test)]
use mockall::automock;

use crate::{
    artifacts::ResponseParams,
    error::{AuthorizationError, UNABLE_TO_REDIRECT},
    transaction::ResponseTarget,
};

pub use self::{form_post::FormPostResponder, fragment::FragmentResponder, query::QueryResponder};

mod form_post;
mod fragment;
mod query;

pub const DEFAULT_RESPONSE_MODE: &str = "fragment";

/// Delivers response parameters to the client for one response mode.
#[cfg_attr(test, automock)]
pub trait Responder: Send + Sync {
    /// Checked before anything is issued; a failure ends the exchange.
    fn validate(&self, _target: &ResponseTarget) -> Result<(), AuthorizationError> {
        Ok(())
    }

    fn respond(
        &self,
        target: &ResponseTarget,
        params: &ResponseParams,
    ) -> Result<Response<String>, AuthorizationError>;
}

/// Registry of responders by response mode name.
///
/// Read-only once a grant is built, and shared by every response it composes.
#[derive(Clone)]
pub struct ResponseModes {
    modes: HashMap<String, Arc<dyn Responder>>,
}

impl ResponseModes {
    /// A registry holding only the `fragment` responder.
    pub fn new() -> Self {
        let mut modes = Self {
            modes: HashMap::new(),
        };
        modes.register(DEFAULT_RESPONSE_MODE, FragmentResponder);
        modes
    }

    /// A registry holding the `fragment`, `query` and `form_post` responders.
    pub fn standard() -> Self {
        let mut modes = Self::new();
        modes.register("query", QueryResponder);
        modes.register("form_post", FormPostResponder);
        modes
    }

    /// Register `responder` for `name`, replacing any previous one.
    pub fn register(&mut self, name: impl Into<String>, responder: impl Responder + 'static) {
        self.register_arc(name, Arc::new(responder));
    }

    pub fn register_arc(&mut self, name: impl Into<String>, responder: Arc<dyn Responder>) {
        self.modes.insert(name.into(), responder);
    }

    pub fn resolve(&self, name: &str) -> Option<Arc<dyn Responder>> {
        self.modes.get(name).cloned()
    }

    pub fn names(&self) -> Vec<&str> {
        let mut names = self.modes.keys().map(String::as_str).collect::<Vec<_>>();
        names.sort_unstable();
        names
    }

    /// The responder for the mode `target` asks for, `fragment` when it asks for none.
    pub(crate) fn select(
        &self,
        target: &ResponseTarget,
    ) -> Result<Arc<dyn Responder>, AuthorizationError> {
        let mode = target
            .response_mode
            .as_deref()
            .unwrap_or(DEFAULT_RESPONSE_MODE);
        self.resolve(mode)
            .ok_or_else(|| AuthorizationError::UnsupportedResponseMode(mode.to_owned()))
    }
}

impl Default for ResponseModes {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ResponseModes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResponseModes")
            .field("modes", &self.names())
            .finish()
    }
}

fn redirect_uri(target: &ResponseTarget) -> Result<&Url, AuthorizationError> {
    target
        .redirect_uri
        .as_ref()
        .ok_or_else(|| AuthorizationError::ServerError(UNABLE_TO_REDIRECT.to_owned()))
}

fn redirect(location: &Url) -> Result<Response<String>, AuthorizationError> {
    Response::builder()
        .status(StatusCode::FOUND)
        .header(LOCATION, location.as_str())
        .body(String::new())
        .map_err(|e| AuthorizationError::ServerError(e.to_string()))
}
