use std::collections::HashMap;
use std::sync::Arc;

use super::SignatureVerifier;

#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
pub trait SignatureVerifierProvider: Send + Sync {
    fn get_signature_verifier(&self, proof_type: &str) -> Option<Arc<dyn SignatureVerifier>>;
}

pub struct SignatureVerifierProviderImpl {
    verifiers: HashMap<String, Arc<dyn SignatureVerifier>>,
}

impl SignatureVerifierProviderImpl {
    pub fn new(verifiers: HashMap<String, Arc<dyn SignatureVerifier>>) -> Self {
        Self { verifiers }
    }
}

impl SignatureVerifierProvider for SignatureVerifierProviderImpl {
    fn get_signature_verifier(&self, proof_type: &str) -> Option<Arc<dyn SignatureVerifier>> {
        self.verifiers.get(proof_type).cloned()
    }
}
