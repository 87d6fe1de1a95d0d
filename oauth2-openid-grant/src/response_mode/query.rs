use http::Response;

use crate::{artifacts::ResponseParams, error::AuthorizationError, transaction::ResponseTarget};

use super::{redirect, redirect_uri, Responder};

/// Redirects with the parameters appended to the URI query.
///
/// Query parameters of the registered redirect URI are kept.
#[derive(Clone, Copy, Debug, Default)]
pub struct QueryResponder;

impl Responder for QueryResponder {
    fn validate(&self, target: &ResponseTarget) -> Result<(), AuthorizationError> {
        redirect_uri(target).map(|_| ())
    }

    fn respond(
        &self,
        target: &ResponseTarget,
        params: &ResponseParams,
    ) -> Result<Response<String>, AuthorizationError> {
        let mut location = redirect_uri(target)?.clone();
        location.query_pairs_mut().extend_pairs(params.iter());
        redirect(&location)
    }
}
