use std::collections::HashMap;
use std::sync::Arc;

use config::core_config::CoreConfig;
use provider::did_resolver::DidResolver;
use provider::proof_engine::ProofEngine;
use provider::proof_engine::provider::{ProofEngineProvider, ProofEngineProviderImpl};
use provider::revocation::RevocationManager;
use provider::revocation::in_memory::InMemoryStatusListManager;
use provider::signature_verifier::SignatureVerifier;
use provider::signature_verifier::provider::{
    SignatureVerifierProvider, SignatureVerifierProviderImpl,
};
use service::issuance::IssuanceService;
use service::verification::{VerificationProviders, VerificationService};

pub mod config;
pub mod model;
pub mod provider;
pub mod service;
pub mod util;

#[derive(Clone)]
pub struct VerifierCore {
    pub config: Arc<CoreConfig>,
    pub verification_service: VerificationService,
    /// Present only when at least one proof engine is registered
    pub issuance_service: Option<IssuanceService>,
    pub revocation_manager: Option<Arc<dyn RevocationManager>>,
}

impl VerifierCore {
    pub fn builder(config: CoreConfig) -> VerifierCoreBuilder {
        VerifierCoreBuilder {
            config,
            proof_engines: vec![],
            signature_verifiers: HashMap::new(),
            did_resolver: None,
            revocation_manager: None,
        }
    }
}

pub struct VerifierCoreBuilder {
    config: CoreConfig,
    proof_engines: Vec<Arc<dyn ProofEngine>>,
    signature_verifiers: HashMap<String, Arc<dyn SignatureVerifier>>,
    did_resolver: Option<Arc<dyn DidResolver>>,
    revocation_manager: Option<Arc<dyn RevocationManager>>,
}

impl VerifierCoreBuilder {
    pub fn with_proof_engine(mut self, engine: Arc<dyn ProofEngine>) -> Self {
        self.proof_engines.push(engine);
        self
    }

    pub fn with_signature_verifier(
        mut self,
        proof_type: impl Into<String>,
        verifier: Arc<dyn SignatureVerifier>,
    ) -> Self {
        self.signature_verifiers.insert(proof_type.into(), verifier);
        self
    }

    pub fn with_did_resolver(mut self, did_resolver: Arc<dyn DidResolver>) -> Self {
        self.did_resolver = Some(did_resolver);
        self
    }

    pub fn with_revocation_manager(mut self, manager: Arc<dyn RevocationManager>) -> Self {
        self.revocation_manager = Some(manager);
        self
    }

    /// Status lists kept in process memory, sized and bounded by the revocation config
    pub fn with_in_memory_revocation(self) -> Self {
        let revocation = &self.config.revocation;
        let manager = InMemoryStatusListManager::new(revocation.default_status_list_size)
            .with_max_size(revocation.max_status_list_size);
        self.with_revocation_manager(Arc::new(manager))
    }

    pub fn build(self) -> VerifierCore {
        let proof_engines: Option<Arc<dyn ProofEngineProvider>> =
            (!self.proof_engines.is_empty())
                .then(|| Arc::new(ProofEngineProviderImpl::new(self.proof_engines)) as _);

        let signature_verifiers: Option<Arc<dyn SignatureVerifierProvider>> =
            (!self.signature_verifiers.is_empty()).then(|| {
                Arc::new(SignatureVerifierProviderImpl::new(self.signature_verifiers)) as _
            });

        let verification_service = VerificationService::new(
            VerificationProviders {
                proof_engines: proof_engines.clone(),
                signature_verifiers,
                did_resolver: self.did_resolver,
                revocation_manager: self.revocation_manager.clone(),
            },
            self.config.verification_settings(),
        );

        let issuance_service = proof_engines
            .map(|engines| IssuanceService::new(engines, self.config.issuance.timeout));

        VerifierCore {
            config: Arc::new(self.config),
            verification_service,
            issuance_service,
            revocation_manager: self.revocation_manager,
        }
    }
}
