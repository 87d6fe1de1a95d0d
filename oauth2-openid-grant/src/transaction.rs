use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use url::Url;

use crate::request::AuthorizationRequest;

/// Outcome of the resource owner's consent step.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AuthorizationDecision {
    pub allow: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<Vec<String>>,
    /// Any other fields the consent step negotiated, visible to issuers.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl AuthorizationDecision {
    pub fn allow() -> Self {
        AuthorizationDecision {
            allow: true,
            ..Default::default()
        }
    }

    pub fn deny() -> Self {
        Self::default()
    }

    pub fn scope(mut self, scope: &[impl ToString]) -> Self {
        self.scope = Some(scope.iter().map(|s| s.to_string()).collect());
        self
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(name.into(), value.into());
        self
    }
}

/// Unit of work of the decision phase.
///
/// Owned by the calling server; a grant only borrows it while
/// composing a response.
#[derive(Clone, Debug)]
pub struct Transaction<C, U> {
    pub client: C,
    pub user: U,
    pub request: AuthorizationRequest,
    pub decision: AuthorizationDecision,
    /// Free-form side channel for the integrator.
    pub locals: Map<String, Value>,
    /// Where the response is delivered, once the server resolved and trusted it.
    pub redirect_uri: Option<Url>,
}

impl<C, U> Transaction<C, U> {
    pub fn new(
        client: C,
        user: U,
        request: AuthorizationRequest,
        decision: AuthorizationDecision,
    ) -> Self {
        Transaction {
            client,
            user,
            request,
            decision,
            locals: Map::new(),
            redirect_uri: None,
        }
    }

    pub fn redirect_uri(mut self, redirect_uri: Url) -> Self {
        self.redirect_uri = Some(redirect_uri);
        self
    }

    pub fn local(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.locals.insert(name.into(), value.into());
        self
    }

    pub fn target(&self) -> ResponseTarget {
        ResponseTarget {
            redirect_uri: self.redirect_uri.clone(),
            response_mode: self.request.response_mode.clone(),
            state: self.request.state.clone().filter(|state| !state.is_empty()),
        }
    }
}

/// What a responder needs to know about a transaction to deliver parameters.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ResponseTarget {
    pub redirect_uri: Option<Url>,
    pub response_mode: Option<String>,
    pub state: Option<String>,
}
