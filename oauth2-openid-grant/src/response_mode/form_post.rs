use http::{
    header::{CACHE_CONTROL, CONTENT_TYPE},
    Response, StatusCode,
};

use crate::{artifacts::ResponseParams, error::AuthorizationError, transaction::ResponseTarget};

use super::{redirect_uri, Responder};

/// Renders an HTML page that POSTs the parameters to the redirect URI.
#[derive(Clone, Copy, Debug, Default)]
pub struct FormPostResponder;

impl Responder for FormPostResponder {
    fn validate(&self, target: &ResponseTarget) -> Result<(), AuthorizationError> {
        redirect_uri(target).map(|_| ())
    }

    fn respond(
        &self,
        target: &ResponseTarget,
        params: &ResponseParams,
    ) -> Result<Response<String>, AuthorizationError> {
        let action = redirect_uri(target)?;
        let inputs = params
            .iter()
            .map(|(name, value)| {
                format!(
                    r#"<input type="hidden" name="{}" value="{}"/>"#,
                    escape(name),
                    escape(value)
                )
            })
            .collect::<String>();
        let body = format!(
            concat!(
                "<html><head><title>Submit This Form</title></head>",
                r#"<body onload="javascript:document.forms[0].submit()">"#,
                r#"<form method="post" action="{}">{}</form>"#,
                "</body></html>"
            ),
            escape(action.as_str()),
            inputs
        );

        Response::builder()
            .status(StatusCode::OK)
            .header(CONTENT_TYPE, "text/html;charset=UTF-8")
            .header(CACHE_CONTROL, "no-cache, no-store")
            .body(body)
            .map_err(|e| AuthorizationError::ServerError(e.to_string()))
    }
}

fn escape(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
