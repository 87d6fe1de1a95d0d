use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use oauth2_openid_grant::{
    artifacts::IssuedArtifacts,
    error::BoxError,
    issuer::{Finalizer, IssueContext, Issuance, Issuer},
    transaction::Transaction,
};

use super::context::{Client, User};

/// What an issuer saw when it was called.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Seen {
    pub access_token: Option<String>,
    pub code: Option<String>,
    pub redirect_uri: Option<String>,
}

#[derive(Clone)]
pub struct RecordingIssuer {
    outcome: Outcome,
    seen: Arc<Mutex<Vec<Seen>>>,
}

#[derive(Clone)]
enum Outcome {
    Issue(Issuance),
    Decline,
    Fail(String),
}

impl RecordingIssuer {
    pub fn issuing(issuance: impl Into<Issuance>) -> Self {
        Self::with_outcome(Outcome::Issue(issuance.into()))
    }

    pub fn declining() -> Self {
        Self::with_outcome(Outcome::Decline)
    }

    pub fn failing(message: &str) -> Self {
        Self::with_outcome(Outcome::Fail(message.to_owned()))
    }

    fn with_outcome(outcome: Outcome) -> Self {
        RecordingIssuer {
            outcome,
            seen: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn calls(&self) -> Vec<Seen> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl Issuer<Client, User> for RecordingIssuer {
    async fn issue(
        &self,
        ctx: &IssueContext<'_, Client, User>,
    ) -> Result<Option<Issuance>, BoxError> {
        self.seen.lock().unwrap().push(Seen {
            access_token: ctx.access_token().map(str::to_owned),
            code: ctx.authorization_code().map(str::to_owned),
            redirect_uri: ctx.redirect_uri.map(|uri| uri.to_string()),
        });
        match &self.outcome {
            Outcome::Issue(issuance) => Ok(Some(issuance.clone())),
            Outcome::Decline => Ok(None),
            Outcome::Fail(message) => Err(message.clone().into()),
        }
    }
}

#[derive(Clone, Default)]
pub struct RecordingFinalizer {
    fail: bool,
    seen: Arc<Mutex<Vec<String>>>,
}

impl RecordingFinalizer {
    pub fn failing() -> Self {
        RecordingFinalizer {
            fail: true,
            ..Default::default()
        }
    }

    /// Form encoded artifacts of every call.
    pub fn calls(&self) -> Vec<String> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl Finalizer<Client, User> for RecordingFinalizer {
    async fn complete(
        &self,
        _txn: &Transaction<Client, User>,
        issued: &IssuedArtifacts,
    ) -> Result<(), BoxError> {
        self.seen
            .lock()
            .unwrap()
            .push(issued.as_params().to_form_urlencoded());
        if self.fail {
            return Err("Failed to save transaction".into());
        }
        Ok(())
    }
}
