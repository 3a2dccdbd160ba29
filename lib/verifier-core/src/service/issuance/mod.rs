use std::sync::Arc;
use std::time::Duration;

use crate::provider::proof_engine::provider::ProofEngineProvider;

pub mod error_mapping;
pub mod service;
pub(crate) mod validator;

#[cfg(test)]
mod test;

#[derive(Clone)]
pub struct IssuanceService {
    proof_engines: Arc<dyn ProofEngineProvider>,
    timeout: Option<Duration>,
}

impl IssuanceService {
    pub fn new(proof_engines: Arc<dyn ProofEngineProvider>, timeout: Option<Duration>) -> Self {
        Self {
            proof_engines,
            timeout,
        }
    }
}
