use http::Response;

use crate::{artifacts::ResponseParams, error::AuthorizationError, transaction::ResponseTarget};

use super::{redirect, redirect_uri, Responder};

/// Redirects with the parameters encoded in the URI fragment.
///
/// The default mode of every response type this crate handles, since all of
/// them deliver artifacts that must not reach the client's server logs.
#[derive(Clone, Copy, Debug, Default)]
pub struct FragmentResponder;

impl Responder for FragmentResponder {
    fn validate(&self, target: &ResponseTarget) -> Result<(), AuthorizationError> {
        redirect_uri(target).map(|_| ())
    }

    fn respond(
        &self,
        target: &ResponseTarget,
        params: &ResponseParams,
    ) -> Result<Response<String>, AuthorizationError> {
        let mut location = redirect_uri(target)?.clone();
        location.set_fragment(Some(&params.to_form_urlencoded()));
        redirect(&location)
    }
}
