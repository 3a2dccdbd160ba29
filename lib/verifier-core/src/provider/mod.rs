pub mod did_resolver;
pub mod proof_engine;
pub mod revocation;
pub mod signature_verifier;
pub mod trust_policy;
