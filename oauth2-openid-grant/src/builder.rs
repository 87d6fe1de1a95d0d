use std::sync::Arc;

use log::info;
use serde::Deserialize;
use serde_with::{formats::PreferMany, serde_as, OneOrMany};

use crate::{
    error::StartupError,
    grant::{Grant, ResponseType},
    issuer::{Finalizer, Issuer},
    pipeline::{IssuancePipeline, Stage},
    request::RequestParser,
    response_mode::{Responder, ResponseModes},
};

/// Grant options that can be read from configuration files.
///
/// ```
/// use oauth2_openid_grant::builder::GrantOptions;
///
/// let options: GrantOptions = serde_json::from_str(r#"{ "scope_separator": [" ", ","] }"#).unwrap();
/// assert_eq!(options.scope_separators, vec![" ", ","]);
/// ```
#[serde_as]
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct GrantOptions {
    /// Separators tried in order when splitting `scope`.
    #[serde_as(as = "OneOrMany<_, PreferMany>")]
    #[serde(alias = "scope_separator")]
    pub scope_separators: Vec<String>,
    /// Parse OpenID Connect extension parameters along with the request.
    pub openid_extensions: bool,
}

impl Default for GrantOptions {
    fn default() -> Self {
        GrantOptions {
            scope_separators: vec![" ".to_owned()],
            openid_extensions: false,
        }
    }
}

pub struct GrantBuilder<C, U> {
    response_type: ResponseType,
    token: Option<Arc<dyn Issuer<C, U>>>,
    code: Option<Arc<dyn Issuer<C, U>>>,
    id_token: Option<Arc<dyn Issuer<C, U>>>,
    finalizer: Option<Arc<dyn Finalizer<C, U>>>,
    options: GrantOptions,
    modes: ResponseModes,
}

impl<C, U> GrantBuilder<C, U>
where
    C: Send + Sync + 'static,
    U: Send + Sync + 'static,
{
    pub(crate) fn new(response_type: ResponseType) -> Self {
        GrantBuilder {
            response_type,
            token: None,
            code: None,
            id_token: None,
            finalizer: None,
            options: GrantOptions::default(),
            modes: ResponseModes::new(),
        }
    }

    /// Set the access token issuer.
    ///
    /// Required by every response type containing `token`.
    pub fn issue_token(mut self, issuer: impl Issuer<C, U> + 'static) -> Self {
        self.token = Some(Arc::new(issuer));
        self
    }

    /// Set the authorization code issuer.
    ///
    /// Required by every response type containing `code`. The issuer sees the
    /// access token when one is issued in the same response.
    pub fn issue_code(mut self, issuer: impl Issuer<C, U> + 'static) -> Self {
        self.code = Some(Arc::new(issuer));
        self
    }

    /// Set the ID token issuer.
    ///
    /// Required by every response type containing `id_token`. The issuer sees
    /// the access token and code issued in the same response, needed to
    /// compute `at_hash` and `c_hash`.
    pub fn issue_id_token(mut self, issuer: impl Issuer<C, U> + 'static) -> Self {
        self.id_token = Some(Arc::new(issuer));
        self
    }

    /// Run `finalizer` once every artifact is issued, before responding.
    pub fn finalize(mut self, finalizer: impl Finalizer<C, U> + 'static) -> Self {
        self.finalizer = Some(Arc::new(finalizer));
        self
    }

    pub fn scope_separator(mut self, separator: impl Into<String>) -> Self {
        self.options.scope_separators = vec![separator.into()];
        self
    }

    /// Set the separators `scope` is split on.
    ///
    /// Separators are tried in order; the first one that splits the value
    /// wins. Default value is `[" "]`.
    pub fn scope_separators(mut self, separators: &[impl ToString]) -> Self {
        self.options.scope_separators = separators.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn openid_extensions(mut self, enabled: bool) -> Self {
        self.options.openid_extensions = enabled;
        self
    }

    /// Replace all options at once.
    pub fn options(mut self, options: GrantOptions) -> Self {
        self.options = options;
        self
    }

    /// Register an additional response mode, or replace a registered one.
    pub fn response_mode(
        mut self,
        name: impl Into<String>,
        responder: impl Responder + 'static,
    ) -> Self {
        self.modes.register(name, responder);
        self
    }

    /// Replace the response mode registry.
    ///
    /// By default only `fragment` is registered.
    pub fn response_modes(mut self, modes: ResponseModes) -> Self {
        self.modes = modes;
        self
    }

    /// Construct a Grant.
    pub fn build(self) -> Result<Grant<C, U>, StartupError> {
        let response_type = self.response_type;
        let mut stages = Vec::new();
        for stage in response_type.stages() {
            let (issuer, name) = match stage {
                Stage::Token => (&self.token, "access token"),
                Stage::Code => (&self.code, "authorization code"),
                Stage::IdToken => (&self.id_token, "ID token"),
            };
            let issuer = issuer.clone().ok_or(StartupError::MissingIssuer {
                response_type: response_type.as_str(),
                issuer: name,
            })?;
            stages.push((stage, issuer));
        }

        let separators = self.options.scope_separators;
        if separators.is_empty() {
            return Err(StartupError::InvalidParameter(
                "At least one scope separator is required".to_owned(),
            ));
        }
        if separators.iter().any(String::is_empty) {
            return Err(StartupError::InvalidParameter(
                "Scope separators must not be empty".to_owned(),
            ));
        }

        info!(
            "Built {} grant with response modes {:?}",
            response_type,
            self.modes.names()
        );
        Ok(Grant {
            response_type,
            parser: RequestParser::new(response_type, separators),
            openid_extensions: self.options.openid_extensions,
            pipeline: IssuancePipeline::new(stages, self.finalizer),
            modes: self.modes,
        })
    }
}
