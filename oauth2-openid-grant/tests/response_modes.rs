use http::{header::LOCATION, Response, StatusCode};
use oauth2_openid_grant::{
    artifacts::ResponseParams,
    error::AuthorizationError,
    grant::{Grant, ResponseType},
    response_mode::{Responder, ResponseModes},
    transaction::ResponseTarget,
};

use crate::common::{
    context::{init_logging, Client, TransactionBuilder, User},
    issuers::RecordingIssuer,
};

pub mod common;

/// Delivers parameters through a JSON body, as a web_message style mode would.
struct JsonResponder;

impl Responder for JsonResponder {
    fn respond(
        &self,
        _target: &ResponseTarget,
        params: &ResponseParams,
    ) -> Result<Response<String>, AuthorizationError> {
        let body = params
            .iter()
            .map(|(name, value)| (name.to_owned(), serde_json::Value::from(value)))
            .collect::<serde_json::Map<_, _>>();
        Ok(Response::new(serde_json::Value::Object(body).to_string()))
    }
}

#[tokio::test]
async fn custom_response_mode() {
    init_logging();
    let token = RecordingIssuer::issuing("xyz");
    let grant = Grant::<Client, User>::builder(ResponseType::Token)
        .issue_token(token.clone())
        .response_mode("web_message", JsonResponder)
        .build()
        .unwrap();
    let txn = TransactionBuilder::new(ResponseType::Token)
        .response_mode("web_message")
        .redirect_uri(None)
        .build();

    let response = grant.compose_response(&txn).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.body(),
        r#"{"access_token":"xyz","token_type":"Bearer"}"#
    );
    assert_eq!(token.calls().len(), 1);
}

#[tokio::test]
async fn custom_response_mode_delivers_errors() {
    let grant = Grant::<Client, User>::builder(ResponseType::Token)
        .issue_token(RecordingIssuer::declining())
        .response_mode("web_message", JsonResponder)
        .build()
        .unwrap();
    let txn = TransactionBuilder::new(ResponseType::Token)
        .response_mode("web_message")
        .state("f1o1o1")
        .build();

    let response = grant.respond(&txn).await;

    assert_eq!(
        response.body(),
        r#"{"error":"access_denied","error_description":"Request denied by authorization server","state":"f1o1o1"}"#
    );
}

#[tokio::test]
async fn standard_modes_are_opt_in() {
    let grant = Grant::<Client, User>::builder(ResponseType::Token)
        .issue_token(RecordingIssuer::issuing("xyz"))
        .build()
        .unwrap();
    let txn = TransactionBuilder::new(ResponseType::Token)
        .response_mode("query")
        .build();

    let err = grant.compose_response(&txn).await.unwrap_err();

    assert_eq!(err.code(), "unsupported_response_mode");
    assert_eq!(
        err.description().as_deref(),
        Some("Unsupported response mode: query")
    );
    assert_eq!(grant.response_modes().names(), vec!["fragment"]);
}

#[tokio::test]
async fn fragment_with_standard_modes() {
    let grant = Grant::<Client, User>::builder(ResponseType::Token)
        .issue_token(RecordingIssuer::issuing("xyz"))
        .response_modes(ResponseModes::standard())
        .build()
        .unwrap();
    let txn = TransactionBuilder::new(ResponseType::Token)
        .response_mode("fragment")
        .build();

    let response = grant.compose_response(&txn).await.unwrap();

    assert_eq!(
        response.headers().get(LOCATION).unwrap(),
        "http://example.com/auth/callback#access_token=xyz&token_type=Bearer"
    );
}
