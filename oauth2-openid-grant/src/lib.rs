#![doc = include_str!("../README.md")]

/// Ordered parameter sets: [ResponseParams](crate::artifacts::ResponseParams)
/// as encoded by responders, and the
/// [IssuedArtifacts](crate::artifacts::IssuedArtifacts) accumulated while a
/// response is issued.
pub mod artifacts;

/// Builder used to construct a [Grant](crate::grant::Grant) instance.
///
/// For further information on the different properties,
/// see [GrantBuilder](crate::builder::GrantBuilder).
///
/// # Example
///
/// ```
/// use futures_util::FutureExt;
/// use oauth2_openid_grant::error::BoxError;
/// use oauth2_openid_grant::grant::{Grant, ResponseType};
/// use oauth2_openid_grant::issuer::{issuer_fn, Issuance, IssueContext};
///
/// let grant = Grant::<String, String>::builder(ResponseType::CodeToken)
///     .issue_token(issuer_fn(|_: &IssueContext<'_, String, String>| {
///         async { Ok::<_, BoxError>(Some(Issuance::new("xyz"))) }.boxed()
///     }))
///     .issue_code(issuer_fn(|_: &IssueContext<'_, String, String>| {
///         async { Ok::<_, BoxError>(Some(Issuance::new("c-123"))) }.boxed()
///     }))
///     .build()
///     .expect("Failed to build grant");
/// assert_eq!(grant.name(), "code token");
/// ```
pub mod builder;

/// [AuthorizationError](crate::error::AuthorizationError) is the failure of an
/// authorization exchange, and what [map_error](crate::grant::Grant::map_error)
/// delivers to clients.
pub mod error;

/// [Grant](crate::grant::Grant) handles one response type combination,
/// from parsing the authorization request to responding to the client.
///
/// It's recommended to build each grant once and share it between
/// requests.
pub mod grant;

/// Integration points for producing artifacts.
///
/// Access tokens, codes and ID tokens are never created by this crate.
/// Implement [Issuer](crate::issuer::Issuer) for each artifact the grant's
/// response type contains.
pub mod issuer;

/// [Stage](crate::pipeline::Stage)s a grant issues artifacts in.
///
/// Access tokens come first, then authorization codes, then ID tokens, so
/// that each issuer sees what earlier stages produced.
pub mod pipeline;

/// Parsing of inbound authorization requests.
pub mod request;

/// [Responder](crate::response_mode::Responder) implementations and
/// the [ResponseModes](crate::response_mode::ResponseModes) registry
/// selecting between them.
///
/// You can provide your own responder to support additional response modes.
pub mod response_mode;

/// [Transaction](crate::transaction::Transaction) carries the outcome of the
/// consent step into [compose_response](crate::grant::Grant::compose_response).
pub mod transaction;
