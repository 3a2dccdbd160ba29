use std::collections::HashMap;
use std::sync::Arc;

use serde_json::json;

use super::ProofEngine;

#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
pub trait ProofEngineProvider: Send + Sync {
    fn get_proof_engine(&self, format: &str) -> Option<Arc<dyn ProofEngine>>;

    fn get_proof_engine_by_proof_type(&self, proof_type: &str) -> Option<Arc<dyn ProofEngine>>;

    /// Sorted list of registered formats
    fn supported_formats(&self) -> Vec<String>;
}

pub struct ProofEngineProviderImpl {
    engines: HashMap<String, Arc<dyn ProofEngine>>,
}

impl ProofEngineProviderImpl {
    pub fn new(engines: impl IntoIterator<Item = Arc<dyn ProofEngine>>) -> Self {
        let engines: HashMap<String, Arc<dyn ProofEngine>> = engines
            .into_iter()
            .map(|engine| (engine.format(), engine))
            .collect();

        for (format, engine) in &engines {
            tracing::debug!(
                capabilities = %json!(engine.capabilities()),
                "Registered proof engine `{format}`"
            );
        }

        Self { engines }
    }
}

impl ProofEngineProvider for ProofEngineProviderImpl {
    fn get_proof_engine(&self, format: &str) -> Option<Arc<dyn ProofEngine>> {
        self.engines.get(format).cloned()
    }

    fn get_proof_engine_by_proof_type(&self, proof_type: &str) -> Option<Arc<dyn ProofEngine>> {
        self.engines
            .values()
            .find(|engine| {
                engine
                    .capabilities()
                    .proof_types
                    .iter()
                    .any(|supported| supported == proof_type)
            })
            .cloned()
    }

    fn supported_formats(&self) -> Vec<String> {
        let mut formats: Vec<String> = self.engines.keys().cloned().collect();
        formats.sort();
        formats
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::provider::proof_engine::{MockProofEngine, ProofEngineCapabilities};

    fn engine(format: &'static str, proof_type: &'static str) -> Arc<dyn ProofEngine> {
        let mut engine = MockProofEngine::new();
        engine.expect_format().returning(move || format.to_owned());
        engine
            .expect_capabilities()
            .returning(move || ProofEngineCapabilities {
                proof_types: vec![proof_type.to_owned()],
                ..Default::default()
            });
        Arc::new(engine)
    }

    #[test]
    fn test_lookup_by_format_and_proof_type() {
        let provider = ProofEngineProviderImpl::new([
            engine("JSON_LD", "DataIntegrityProof"),
            engine("JWT", "JsonWebSignature2020"),
        ]);

        assert!(provider.get_proof_engine("JWT").is_some());
        assert!(provider.get_proof_engine("MDOC").is_none());
        assert_eq!(
            provider
                .get_proof_engine_by_proof_type("DataIntegrityProof")
                .unwrap()
                .format(),
            "JSON_LD"
        );
        assert!(provider.get_proof_engine_by_proof_type("Unknown").is_none());
        assert_eq!(provider.supported_formats(), vec!["JSON_LD", "JWT"]);
    }
}
