use std::sync::Arc;
use std::time::Duration;

use crate::provider::did_resolver::DidResolver;
use crate::provider::proof_engine::provider::ProofEngineProvider;
use crate::provider::revocation::RevocationManager;
use crate::provider::signature_verifier::provider::SignatureVerifierProvider;
use crate::service::revocation_check::RevocationFailurePolicy;

pub mod service;


pub const DEFAULT_MAX_CONCURRENCY: usize = 8;

#[derive(Clone, Debug, PartialEq)]
pub struct VerificationSettings {
    pub revocation_policy: RevocationFailurePolicy,
    /// Applied to every status list lookup
    pub revocation_timeout: Option<Duration>,
    /// Upper bound of credentials verified at the same time
    pub max_concurrency: usize,
}

impl Default for VerificationSettings {
    fn default() -> Self {
        Self {
            revocation_policy: RevocationFailurePolicy::default(),
            revocation_timeout: None,
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
        }
    }
}

/// Every collaborator is optional: a missing one disables the checks that need it.
#[derive(Clone, Default)]
pub struct VerificationProviders {
    pub proof_engines: Option<Arc<dyn ProofEngineProvider>>,
    pub signature_verifiers: Option<Arc<dyn SignatureVerifierProvider>>,
    pub did_resolver: Option<Arc<dyn DidResolver>>,
    pub revocation_manager: Option<Arc<dyn RevocationManager>>,
}

#[derive(Clone)]
pub struct VerificationService {
    providers: VerificationProviders,
    settings: VerificationSettings,
}

impl VerificationService {
    pub fn new(providers: VerificationProviders, settings: VerificationSettings) -> Self {
        Self {
            providers,
            settings,
        }
    }
}
