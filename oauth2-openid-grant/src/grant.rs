use std::{fmt::Display, str::FromStr};

use http::Response;
use log::debug;

use crate::{
    builder::GrantBuilder,
    error::{AuthorizationError, StartupError},
    pipeline::{IssuancePipeline, Stage},
    request::{extensions::parse_extensions, AuthorizationRequest, QueryParams, RequestParser},
    response_mode::ResponseModes,
    transaction::Transaction,
};

/// Response type combinations a [Grant] can serve.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ResponseType {
    Token,
    CodeToken,
    IdToken,
    IdTokenToken,
    CodeIdToken,
    CodeIdTokenToken,
}

impl ResponseType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResponseType::Token => "token",
            ResponseType::CodeToken => "code token",
            ResponseType::IdToken => "id_token",
            ResponseType::IdTokenToken => "id_token token",
            ResponseType::CodeIdToken => "code id_token",
            ResponseType::CodeIdTokenToken => "code id_token token",
        }
    }

    pub fn issues_access_token(&self) -> bool {
        matches!(
            self,
            ResponseType::Token
                | ResponseType::CodeToken
                | ResponseType::IdTokenToken
                | ResponseType::CodeIdTokenToken
        )
    }

    pub fn issues_code(&self) -> bool {
        matches!(
            self,
            ResponseType::CodeToken | ResponseType::CodeIdToken | ResponseType::CodeIdTokenToken
        )
    }

    pub fn issues_id_token(&self) -> bool {
        matches!(
            self,
            ResponseType::IdToken
                | ResponseType::IdTokenToken
                | ResponseType::CodeIdToken
                | ResponseType::CodeIdTokenToken
        )
    }

    /// Stages this response type runs, in issuance order.
    pub(crate) fn stages(&self) -> Vec<Stage> {
        [
            (Stage::Token, self.issues_access_token()),
            (Stage::Code, self.issues_code()),
            (Stage::IdToken, self.issues_id_token()),
        ]
        .into_iter()
        .filter_map(|(stage, issued)| issued.then_some(stage))
        .collect()
    }
}

impl Display for ResponseType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ResponseType {
    type Err = StartupError;

    /// Parse a `response_type` value; the order of its values is not significant.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut values = s.split_whitespace().collect::<Vec<_>>();
        values.sort_unstable();
        match values.as_slice() {
            ["token"] => Ok(ResponseType::Token),
            ["code", "token"] => Ok(ResponseType::CodeToken),
            ["id_token"] => Ok(ResponseType::IdToken),
            ["id_token", "token"] => Ok(ResponseType::IdTokenToken),
            ["code", "id_token"] => Ok(ResponseType::CodeIdToken),
            ["code", "id_token", "token"] => Ok(ResponseType::CodeIdTokenToken),
            _ => Err(StartupError::InvalidParameter(format!(
                "Unsupported response type: {}",
                s
            ))),
        }
    }
}

/// Issues the response for one response type combination.
///
/// A grant is immutable once built and can be shared between any number of
/// concurrent decisions.
pub struct Grant<C, U> {
    pub(crate) response_type: ResponseType,
    pub(crate) parser: RequestParser,
    pub(crate) openid_extensions: bool,
    pub(crate) pipeline: IssuancePipeline<C, U>,
    pub(crate) modes: ResponseModes,
}

impl<C, U> Clone for Grant<C, U> {
    fn clone(&self) -> Self {
        Self {
            response_type: self.response_type,
            parser: self.parser.clone(),
            openid_extensions: self.openid_extensions,
            pipeline: self.pipeline.clone(),
            modes: self.modes.clone(),
        }
    }
}

impl<C, U> Grant<C, U>
where
    C: Send + Sync + 'static,
    U: Send + Sync + 'static,
{
    pub fn builder(response_type: ResponseType) -> GrantBuilder<C, U> {
        GrantBuilder::new(response_type)
    }

    /// The `response_type` value this grant handles, e.g. `code id_token`.
    pub fn name(&self) -> &'static str {
        self.response_type.as_str()
    }

    pub fn response_type(&self) -> ResponseType {
        self.response_type
    }

    pub fn response_modes(&self) -> &ResponseModes {
        &self.modes
    }

    /// Extract the authorization request from inbound query parameters.
    pub fn parse_request(
        &self,
        query: &QueryParams,
    ) -> Result<AuthorizationRequest, AuthorizationError> {
        let request = self.parser.parse(query)?;
        if !self.openid_extensions {
            return Ok(request);
        }
        let extensions = parse_extensions(query).map_err(|e| {
            debug!("Rejected {} request: {}", self.response_type, e);
            e
        })?;
        Ok(request.with_extensions(extensions))
    }

    /// Issue the artifacts for an approved transaction and encode them with
    /// the requested response mode.
    ///
    /// A denied transaction is answered with `access_denied` without invoking
    /// any issuer. Errors are returned to the caller, which is expected to
    /// pass them on to [Grant::map_error].
    pub async fn compose_response(
        &self,
        txn: &Transaction<C, U>,
    ) -> Result<Response<String>, AuthorizationError> {
        let target = txn.target();
        let responder = self.modes.select(&target)?;
        responder.validate(&target)?;

        if !txn.decision.allow {
            debug!(
                "Resource owner denied {} request of client '{}'",
                self.response_type, txn.request.client_id
            );
            let params = AuthorizationError::AccessDenied(String::new())
                .to_params(target.state.as_deref());
            return responder.respond(&target, &params);
        }

        let issued = self.pipeline.run(txn).await?;
        responder.respond(&target, issued.as_params())
    }

    /// Deliver `err` to the client with the transaction's response mode.
    ///
    /// `err` is handed back unchanged when it can't be delivered, leaving
    /// the response to the caller.
    pub fn map_error(
        &self,
        err: AuthorizationError,
        txn: &Transaction<C, U>,
    ) -> Result<Response<String>, AuthorizationError> {
        let target = txn.target();
        let responder = match self.modes.select(&target) {
            Ok(responder) => responder,
            Err(_) => return Err(err),
        };
        if responder.validate(&target).is_err() {
            return Err(err);
        }
        debug!(
            "Delivering {} to client '{}'",
            err.code(),
            txn.request.client_id
        );
        responder.respond(&target, &err.to_params(target.state.as_deref()))
    }

    /// [Grant::compose_response] followed by [Grant::map_error] on failure.
    ///
    /// Errors that can't be delivered to the client become a bare response
    /// with the error's status code.
    pub async fn respond(&self, txn: &Transaction<C, U>) -> Response<String> {
        match self.compose_response(txn).await {
            Ok(response) => response,
            Err(e) => self.map_error(e, txn).unwrap_or_else(Response::from),
        }
    }
}
