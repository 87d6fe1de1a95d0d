use async_trait::async_trait;
use futures_util::future::BoxFuture;
use serde_json::{Map, Value};
use url::Url;

use crate::{
    artifacts::{IssuedArtifacts, ResponseParams},
    error::BoxError,
    request::AuthorizationRequest,
    transaction::{AuthorizationDecision, Transaction},
};

/// Everything an issuer may base its artifact on.
///
/// Every issuer receives the same context, whatever stage it serves.
/// New fields may be added, so the struct can't be built outside this crate.
#[non_exhaustive]
pub struct IssueContext<'a, C, U> {
    pub client: &'a C,
    pub user: &'a U,
    pub decision: &'a AuthorizationDecision,
    pub request: &'a AuthorizationRequest,
    pub redirect_uri: Option<&'a Url>,
    /// Artifacts issued by earlier stages of the same response.
    pub issued: &'a IssuedArtifacts,
    pub locals: &'a Map<String, Value>,
}

impl<'a, C, U> IssueContext<'a, C, U> {
    pub(crate) fn bind(txn: &'a Transaction<C, U>, issued: &'a IssuedArtifacts) -> Self {
        IssueContext {
            client: &txn.client,
            user: &txn.user,
            decision: &txn.decision,
            request: &txn.request,
            redirect_uri: txn.redirect_uri.as_ref(),
            issued,
            locals: &txn.locals,
        }
    }

    /// Access token issued earlier in this response, used for `at_hash`.
    pub fn access_token(&self) -> Option<&str> {
        self.issued.access_token()
    }

    /// Authorization code issued earlier in this response, used for `c_hash`.
    pub fn authorization_code(&self) -> Option<&str> {
        self.issued.code()
    }
}

/// A successfully issued artifact and any parameters to send along with it.
#[derive(Clone, Debug, PartialEq)]
pub struct Issuance {
    pub value: String,
    pub params: ResponseParams,
}

impl Issuance {
    pub fn new(value: impl Into<String>) -> Self {
        Issuance {
            value: value.into(),
            params: ResponseParams::new(),
        }
    }

    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.set(name, value);
        self
    }
}

impl From<String> for Issuance {
    fn from(value: String) -> Self {
        Issuance::new(value)
    }
}

impl From<&str> for Issuance {
    fn from(value: &str) -> Self {
        Issuance::new(value)
    }
}

/// Integrator supplied producer of one artifact: access token, code or ID token.
///
/// `Ok(None)` means the authorization server declines to issue, which ends
/// the exchange with `access_denied`. Errors end it as well and are
/// reported to the client.
#[async_trait]
pub trait Issuer<C, U>: Send + Sync {
    async fn issue(&self, ctx: &IssueContext<'_, C, U>) -> Result<Option<Issuance>, BoxError>;
}

/// Issuer backed by a closure, see [issuer_fn].
pub struct FnIssuer<F>(F);

/// Wrap a closure returning a boxed future into an [Issuer].
///
/// ```
/// use futures_util::FutureExt;
/// use oauth2_openid_grant::error::BoxError;
/// use oauth2_openid_grant::issuer::{issuer_fn, Issuance, IssueContext};
///
/// let issuer = issuer_fn(|ctx: &IssueContext<'_, String, String>| {
///     let token = format!("at-{}", ctx.client);
///     async move { Ok::<_, BoxError>(Some(Issuance::new(token))) }.boxed()
/// });
/// # let _ = issuer;
/// ```
pub fn issuer_fn<C, U, F>(f: F) -> FnIssuer<F>
where
    F: for<'a, 'b> Fn(&'a IssueContext<'b, C, U>) -> BoxFuture<'static, Result<Option<Issuance>, BoxError>>
        + Send
        + Sync,
{
    FnIssuer(f)
}

#[async_trait]
impl<C, U, F> Issuer<C, U> for FnIssuer<F>
where
    C: Sync + 'static,
    U: Sync + 'static,
    F: for<'a, 'b> Fn(&'a IssueContext<'b, C, U>) -> BoxFuture<'static, Result<Option<Issuance>, BoxError>>
        + Send
        + Sync,
{
    async fn issue(&self, ctx: &IssueContext<'_, C, U>) -> Result<Option<Issuance>, BoxError> {
        (self.0)(ctx).await
    }
}

/// Last-mile side effects, e.g. persisting the transaction, run once every
/// artifact has been issued and before the response is sent.
#[async_trait]
pub trait Finalizer<C, U>: Send + Sync {
    async fn complete(
        &self,
        txn: &Transaction<C, U>,
        issued: &IssuedArtifacts,
    ) -> Result<(), BoxError>;
}
