use std::sync::Once;

use oauth2_openid_grant::{
    grant::ResponseType,
    request::AuthorizationRequest,
    transaction::{AuthorizationDecision, Transaction},
};

pub const REDIRECT_URI: &str = "http://example.com/auth/callback";

#[derive(Clone, Debug, PartialEq)]
pub struct Client {
    pub id: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct User {
    pub id: String,
}

static LOGGER: Once = Once::new();

pub fn init_logging() {
    LOGGER.call_once(|| {
        let _ = env_logger::builder().is_test(true).try_init();
    });
}

pub struct TransactionBuilder {
    request: AuthorizationRequest,
    decision: AuthorizationDecision,
    redirect_uri: Option<&'static str>,
}

impl TransactionBuilder {
    pub fn new(response_type: ResponseType) -> Self {
        TransactionBuilder {
            request: AuthorizationRequest::new(response_type, "c123"),
            decision: AuthorizationDecision::allow(),
            redirect_uri: Some(REDIRECT_URI),
        }
    }

    pub fn state(mut self, state: &str) -> Self {
        self.request = self.request.state(state);
        self
    }

    pub fn response_mode(mut self, response_mode: &str) -> Self {
        self.request = self.request.response_mode(response_mode);
        self
    }

    pub fn decision(mut self, decision: AuthorizationDecision) -> Self {
        self.decision = decision;
        self
    }

    pub fn redirect_uri(mut self, redirect_uri: Option<&'static str>) -> Self {
        self.redirect_uri = redirect_uri;
        self
    }

    pub fn build(self) -> Transaction<Client, User> {
        let txn = Transaction::new(
            Client {
                id: "c123".to_owned(),
            },
            User {
                id: "u123".to_owned(),
            },
            self.request,
            self.decision,
        );
        match self.redirect_uri {
            Some(redirect_uri) => txn.redirect_uri(redirect_uri.parse().unwrap()),
            None => txn,
        }
    }
}
