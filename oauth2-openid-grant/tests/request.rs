use http::Uri;
use oauth2_openid_grant::{
    builder::GrantOptions,
    error::{AuthorizationError, BoxError},
    grant::{Grant, ResponseType},
    issuer::{IssueContext, Issuance, Issuer},
    request::QueryParams,
};

use crate::common::context::{init_logging, Client, User};

pub mod common;

struct Unused;

#[async_trait::async_trait]
impl Issuer<Client, User> for Unused {
    async fn issue(
        &self,
        _ctx: &IssueContext<'_, Client, User>,
    ) -> Result<Option<Issuance>, BoxError> {
        Ok(None)
    }
}

fn grant(response_type: ResponseType, options: GrantOptions) -> Grant<Client, User> {
    Grant::<Client, User>::builder(response_type)
        .issue_token(Unused)
        .issue_code(Unused)
        .issue_id_token(Unused)
        .options(options)
        .build()
        .unwrap()
}

#[test]
fn parse_request() {
    init_logging();
    let uri: Uri = "/authorize?response_type=code%20token&client_id=c123&redirect_uri=http%3A%2F%2Fexample.com%2Fauth%2Fcallback&scope=read%20write&state=f1o1o1"
        .parse()
        .unwrap();
    let request = grant(ResponseType::CodeToken, GrantOptions::default())
        .parse_request(&QueryParams::from_uri(&uri))
        .unwrap();

    assert_eq!(request.response_type, ResponseType::CodeToken);
    assert_eq!(request.client_id, "c123");
    assert_eq!(
        request.redirect_uri.as_deref(),
        Some("http://example.com/auth/callback")
    );
    assert_eq!(
        request.scope,
        Some(vec!["read".to_owned(), "write".to_owned()])
    );
    assert_eq!(request.state.as_deref(), Some("f1o1o1"));
    assert_eq!(request.extensions, None);
}

#[test]
fn missing_client_id() {
    let result = grant(ResponseType::Token, GrantOptions::default())
        .parse_request(&QueryParams::parse("redirect_uri=http%3A%2F%2Fexample.com%2Fcb"));

    assert_eq!(
        result.unwrap_err(),
        AuthorizationError::InvalidRequest("Missing required parameter: client_id".to_owned())
    );
}

#[test]
fn missing_nonce() {
    let result = grant(ResponseType::CodeIdToken, GrantOptions::default())
        .parse_request(&QueryParams::parse("client_id=c123"));

    assert_eq!(
        result.unwrap_err(),
        AuthorizationError::InvalidRequest("Missing required parameter: nonce".to_owned())
    );
}

#[test]
fn comma_separated_scope() {
    let options: GrantOptions =
        serde_json::from_str(r#"{ "scope_separator": [" ", ","] }"#).unwrap();
    let request = grant(ResponseType::Token, options)
        .parse_request(&QueryParams::parse("client_id=c123&scope=read,write"))
        .unwrap();

    assert_eq!(
        request.scope,
        Some(vec!["read".to_owned(), "write".to_owned()])
    );
}

#[test]
fn openid_extensions() {
    let options = GrantOptions {
        openid_extensions: true,
        ..Default::default()
    };
    let request = grant(ResponseType::IdToken, options)
        .parse_request(&QueryParams::parse(
            "client_id=c123&nonce=n-0S6&prompt=login&max_age=60&login_hint=bob",
        ))
        .unwrap();
    let extensions = request.extensions.unwrap();

    assert_eq!(request.nonce.as_deref(), Some("n-0S6"));
    assert_eq!(extensions.display, "page");
    assert!(extensions.has_prompt("login"));
    assert_eq!(extensions.max_age, Some(60));
    assert_eq!(extensions.login_hint.as_deref(), Some("bob"));
}

#[test]
fn openid_extensions_nonce_without_id_token() {
    let options = GrantOptions {
        openid_extensions: true,
        ..Default::default()
    };
    let request = grant(ResponseType::CodeToken, options)
        .parse_request(&QueryParams::parse("client_id=c123&nonce=n-0S6"))
        .unwrap();

    assert_eq!(request.nonce.as_deref(), Some("n-0S6"));
}

#[test]
fn openid_extensions_invalid_prompt() {
    let options = GrantOptions {
        openid_extensions: true,
        ..Default::default()
    };
    let result = grant(ResponseType::IdToken, options)
        .parse_request(&QueryParams::parse("client_id=c123&nonce=n-0S6&prompt=none%20login"));

    assert_eq!(
        result.unwrap_err(),
        AuthorizationError::InvalidRequest("Prompt includes none with other values".to_owned())
    );
}
