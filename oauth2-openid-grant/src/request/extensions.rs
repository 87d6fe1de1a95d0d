use serde::Serialize;
use serde_json::Value;

use crate::error::AuthorizationError;

use super::QueryParams;

pub const DEFAULT_DISPLAY: &str = "page";

/// OpenID Connect request parameters that apply to every response type.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct OpenIdExtensions {
    pub nonce: Option<String>,
    pub display: String,
    pub prompt: Option<Vec<String>>,
    pub max_age: Option<u64>,
    pub ui_locales: Option<Vec<String>>,
    pub claims_locales: Option<Vec<String>>,
    pub id_token_hint: Option<String>,
    pub login_hint: Option<String>,
    pub acr_values: Option<Vec<String>>,
    pub claims: Option<Value>,
    pub registration: Option<Value>,
}

impl OpenIdExtensions {
    pub fn has_prompt(&self, prompt: &str) -> bool {
        self.prompt
            .as_ref()
            .is_some_and(|values| values.iter().any(|p| p == prompt))
    }
}

/// Parse the OpenID Connect extension parameters of an authorization request.
pub fn parse_extensions(query: &QueryParams) -> Result<OpenIdExtensions, AuthorizationError> {
    let extensions = OpenIdExtensions {
        nonce: string(query, "nonce")?,
        display: string(query, "display")?.unwrap_or_else(|| DEFAULT_DISPLAY.to_owned()),
        prompt: list(query, "prompt")?,
        max_age: string(query, "max_age")?
            .map(|max_age| {
                max_age.parse::<u64>().map_err(|_| {
                    AuthorizationError::InvalidRequest(
                        "Failed to parse max_age as integer".to_owned(),
                    )
                })
            })
            .transpose()?,
        ui_locales: list(query, "ui_locales")?,
        claims_locales: list(query, "claims_locales")?,
        id_token_hint: query.first("id_token_hint").map(str::to_owned),
        login_hint: query.first("login_hint").map(str::to_owned),
        acr_values: list(query, "acr_values")?,
        claims: json(query, "claims")?,
        registration: json(query, "registration")?,
    };

    if let Some(prompt) = &extensions.prompt {
        if prompt.len() > 1 && prompt.iter().any(|p| p == "none") {
            return Err(AuthorizationError::InvalidRequest(
                "Prompt includes none with other values".to_owned(),
            ));
        }
    }
    Ok(extensions)
}

fn string(query: &QueryParams, param: &str) -> Result<Option<String>, AuthorizationError> {
    query
        .single(param)
        .map(|value| value.map(str::to_owned))
        .map_err(|_| {
            AuthorizationError::InvalidRequest(format!("Failed to parse {} as string", param))
        })
}

fn list(query: &QueryParams, param: &str) -> Result<Option<Vec<String>>, AuthorizationError> {
    Ok(string(query, param)?.map(|value| value.split(' ').map(str::to_owned).collect()))
}

fn json(query: &QueryParams, param: &str) -> Result<Option<Value>, AuthorizationError> {
    string(query, param)?
        .map(|value| {
            serde_json::from_str(&value).map_err(|_| {
                AuthorizationError::InvalidRequest(format!("Failed to parse {} as JSON", param))
            })
        })
        .transpose()
}
