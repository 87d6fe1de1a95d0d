use std::{any::Any, fmt::Display, panic::AssertUnwindSafe, sync::Arc};

use futures_util::{Future, FutureExt};
use log::{debug, warn};

use crate::{
    artifacts::IssuedArtifacts,
    error::{AuthorizationError, BoxError},
    issuer::{Finalizer, IssueContext, Issuance, Issuer},
    transaction::Transaction,
};

/// Issuance stages, in the order a response runs them.
///
/// ID tokens of hybrid responses carry hashes of the access token and
/// code (`at_hash`, `c_hash`), so those must be issued first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Stage {
    Token,
    Code,
    IdToken,
}

impl Stage {
    /// Response parameter the stage's artifact is delivered as.
    pub fn param(&self) -> &'static str {
        match self {
            Stage::Token => "access_token",
            Stage::Code => "code",
            Stage::IdToken => "id_token",
        }
    }
}

impl Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Stage::Token => write!(f, "token"),
            Stage::Code => write!(f, "code"),
            Stage::IdToken => write!(f, "id_token"),
        }
    }
}

pub(crate) struct IssuancePipeline<C, U> {
    stages: Vec<(Stage, Arc<dyn Issuer<C, U>>)>,
    finalizer: Option<Arc<dyn Finalizer<C, U>>>,
}

impl<C, U> Clone for IssuancePipeline<C, U> {
    fn clone(&self) -> Self {
        Self {
            stages: self.stages.clone(),
            finalizer: self.finalizer.clone(),
        }
    }
}

impl<C, U> IssuancePipeline<C, U> {
    pub(crate) fn new(
        mut stages: Vec<(Stage, Arc<dyn Issuer<C, U>>)>,
        finalizer: Option<Arc<dyn Finalizer<C, U>>>,
    ) -> Self {
        stages.sort_by_key(|(stage, _)| *stage);
        Self { stages, finalizer }
    }

    #[cfg(test)]
    pub(crate) fn stages(&self) -> impl Iterator<Item = Stage> + '_ {
        self.stages.iter().map(|(stage, _)| *stage)
    }

    /// Run every stage, then the finalizer.
    ///
    /// The first denial or error ends the run; later stages are not invoked.
    pub(crate) async fn run(
        &self,
        txn: &Transaction<C, U>,
    ) -> Result<IssuedArtifacts, AuthorizationError> {
        let mut issued = IssuedArtifacts::new();
        for (index, (stage, issuer)) in self.stages.iter().enumerate() {
            let issuance = {
                let ctx = IssueContext::bind(txn, &issued);
                guarded(*stage, async { issuer.issue(&ctx).await }).await?
            };
            let Issuance { value, params } = match issuance {
                Some(issuance) if !issuance.value.is_empty() => issuance,
                _ => {
                    debug!("Issuer declined {} stage for client '{}'", stage, txn.request.client_id);
                    return Err(AuthorizationError::denied_by_server());
                }
            };

            issued.record(stage.param(), value);
            if *stage == Stage::Token {
                issued.merge(params);
                issued.set_default("token_type", "Bearer");
            } else if !params.is_empty() {
                debug!("Ignoring extra parameters of {} stage", stage);
            }
            if index == 0 {
                if let Some(state) = txn.request.state.as_deref().filter(|s| !s.is_empty()) {
                    issued.set("state", state);
                }
            }
            debug!("Issued {} for client '{}'", stage, txn.request.client_id);
        }

        if let Some(finalizer) = &self.finalizer {
            guarded("complete", async { finalizer.complete(txn, &issued).await }).await?;
        }
        Ok(issued)
    }
}

/// Await an integrator future, turning its errors and panics into
/// [AuthorizationError]s.
async fn guarded<T>(
    stage: impl Display,
    fut: impl Future<Output = Result<T, BoxError>>,
) -> Result<T, AuthorizationError> {
    match AssertUnwindSafe(fut).catch_unwind().await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(e)) => {
            debug!("{} failed: {}", stage, e);
            Err(AuthorizationError::from_issuer_error(e))
        }
        Err(panic) => {
            let message = panic_message(panic.as_ref());
            warn!("{} panicked: {}", stage, message);
            Err(AuthorizationError::ServerError(message))
        }
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "Issuer failed unexpectedly".to_owned()
    }
}
