use futures::{StreamExt, TryStreamExt, stream};
use time::OffsetDateTime;
use tokio_util::sync::CancellationToken;

use super::VerificationService;
use crate::model::common::Cancelled;
use crate::model::credential::Credential;
use crate::model::presentation::Presentation;
use crate::model::verification::{
    VerificationCheck, VerificationFailure, VerificationOptions, VerificationResult,
};
use crate::provider::did_resolver::did_from_verification_method;
use crate::provider::proof_engine::error::ProofEngineError;
use crate::service::presentation::{
    verify_challenge, verify_domain, verify_presentation_signature,
};
use crate::service::revocation_check::check_revocation_status;
use crate::service::validation::{
    validate_context, validate_expiration, validate_not_before, validate_proof_exists,
    validate_trust, validate_types,
};
use crate::util::canonical::canonicalize_without_proof;

/// Outcome of one verification stage
#[derive(Default)]
struct Stage {
    ran: bool,
    failures: Vec<VerificationFailure>,
    warnings: Vec<String>,
}

impl Stage {
    fn skipped() -> Self {
        Self::default()
    }

    fn from_failure(failure: Option<VerificationFailure>) -> Self {
        Self {
            ran: true,
            failures: failure.into_iter().collect(),
            warnings: vec![],
        }
    }
}

#[derive(Default)]
struct Collector {
    failures: Vec<VerificationFailure>,
    checks: Vec<VerificationCheck>,
    warnings: Vec<String>,
}

impl Collector {
    fn record(&mut self, check: VerificationCheck, stage: Stage) {
        if !stage.ran {
            return;
        }
        if stage.failures.is_empty() {
            self.checks.push(check);
        }
        self.failures.extend(stage.failures);
        self.warnings.extend(stage.warnings);
    }

    fn finish(self) -> VerificationResult {
        VerificationResult::from_failures(self.failures, self.checks, self.warnings)
    }
}

impl VerificationService {
    /// Runs every enabled check against `credential` and aggregates all failures.
    ///
    /// A credential without a proof is rejected without running the other checks.
    #[tracing::instrument(level = "debug", skip_all, err(Debug))]
    pub async fn verify_credential(
        &self,
        credential: &Credential,
        options: &VerificationOptions,
        cancellation: &CancellationToken,
    ) -> Result<VerificationResult, Cancelled> {
        tokio::select! {
            biased;
            _ = cancellation.cancelled() => Err(Cancelled),
            result = self.credential_pipeline(credential, options) => result,
        }
    }

    /// Results are returned in input order
    #[tracing::instrument(level = "debug", skip_all, fields(count = credentials.len()), err(Debug))]
    pub async fn verify_credentials(
        &self,
        credentials: &[Credential],
        options: &VerificationOptions,
        cancellation: &CancellationToken,
    ) -> Result<Vec<VerificationResult>, Cancelled> {
        let batch = stream::iter(credentials)
            .map(|credential| self.credential_pipeline(credential, options))
            .buffered(self.settings.max_concurrency.max(1))
            .try_collect::<Vec<_>>();

        tokio::select! {
            biased;
            _ = cancellation.cancelled() => Err(Cancelled),
            result = batch => result,
        }
    }

    #[tracing::instrument(level = "debug", skip_all, err(Debug))]
    pub async fn verify_presentation(
        &self,
        presentation: &Presentation,
        options: &VerificationOptions,
        cancellation: &CancellationToken,
    ) -> Result<VerificationResult, Cancelled> {
        tokio::select! {
            biased;
            _ = cancellation.cancelled() => Err(Cancelled),
            result = self.presentation_pipeline(presentation, options) => result,
        }
    }

    async fn credential_pipeline(
        &self,
        credential: &Credential,
        options: &VerificationOptions,
    ) -> Result<VerificationResult, Cancelled> {
        if let Some(failure) = validate_proof_exists(credential) {
            return Ok(failure.into());
        }

        let mut collector = Collector::default();
        collector.checks.push(VerificationCheck::ProofPresent);
        collector.record(
            VerificationCheck::Context,
            Stage::from_failure(validate_context(credential)),
        );
        collector.record(
            VerificationCheck::CredentialType,
            Stage::from_failure(validate_types(credential)),
        );

        let now = OffsetDateTime::now_utc();
        if options.check_not_before && credential.valid_from.is_some() {
            collector.record(
                VerificationCheck::NotBefore,
                Stage::from_failure(validate_not_before(credential, options, now)),
            );
        }
        if options.check_expiration && credential.expiration_date.is_some() {
            collector.record(
                VerificationCheck::Expiration,
                Stage::from_failure(validate_expiration(credential, options, now)),
            );
        }

        let (trust, proof, revocation) = tokio::join!(
            self.trust_stage(credential, options),
            self.proof_stage(credential, options),
            self.revocation_stage(credential, options),
        );

        collector.record(VerificationCheck::Trust, trust);
        collector.record(VerificationCheck::ProofSignature, proof?);
        collector.record(VerificationCheck::Revocation, revocation?);

        let result = collector.finish();
        if let Some(failure) = result.failure() {
            tracing::debug!("Credential verification failed: {failure}");
        }

        Ok(result)
    }

    async fn trust_stage(&self, credential: &Credential, options: &VerificationOptions) -> Stage {
        let applies = options.check_trust
            && options.trust_policy.is_some()
            && credential.issuer_did().is_some();
        if !applies {
            return Stage::skipped();
        }

        Stage::from_failure(validate_trust(credential, options).await)
    }

    /// Skipped when no proof engines are configured
    async fn proof_stage(
        &self,
        credential: &Credential,
        options: &VerificationOptions,
    ) -> Result<Stage, Cancelled> {
        let (Some(proof_engines), Some(proof)) = (&self.providers.proof_engines, &credential.proof)
        else {
            return Ok(Stage::skipped());
        };

        let Some(engine) = proof_engines.get_proof_engine_by_proof_type(&proof.r#type) else {
            return Ok(Stage::from_failure(Some(
                VerificationFailure::UnsupportedFormat {
                    format: proof.r#type.clone(),
                },
            )));
        };

        match engine.verify(credential, options).await {
            Ok(VerificationResult::Valid { warnings, .. }) => Ok(Stage {
                ran: true,
                failures: vec![],
                warnings,
            }),
            Ok(VerificationResult::Invalid(failure)) => Ok(Stage::from_failure(Some(failure))),
            Err(ProofEngineError::Cancelled) => Err(Cancelled),
            Err(error) => {
                tracing::warn!("Proof engine `{}` failed: {error}", engine.format());
                Ok(Stage::from_failure(Some(VerificationFailure::invalid_proof(
                    format!("Proof verification failed: {error}"),
                ))))
            }
        }
    }

    async fn revocation_stage(
        &self,
        credential: &Credential,
        options: &VerificationOptions,
    ) -> Result<Stage, Cancelled> {
        let manager = self.providers.revocation_manager.as_deref();
        if !options.check_revocation || manager.is_none() || credential.credential_status.is_none()
        {
            return Ok(Stage::skipped());
        }

        let outcome = check_revocation_status(
            credential,
            manager,
            self.settings.revocation_policy,
            self.settings.revocation_timeout,
        )
        .await?;

        Ok(Stage {
            ran: true,
            failures: outcome.failure.into_iter().collect(),
            warnings: outcome.warnings,
        })
    }

    async fn presentation_pipeline(
        &self,
        presentation: &Presentation,
        options: &VerificationOptions,
    ) -> Result<VerificationResult, Cancelled> {
        let mut collector = Collector::default();

        if options.check_challenge && options.expected_challenge.is_some() {
            collector.record(
                VerificationCheck::Challenge,
                Stage::from_failure(verify_challenge(presentation, options)),
            );
        }
        if options.check_domain && options.expected_domain.is_some() {
            collector.record(
                VerificationCheck::Domain,
                Stage::from_failure(verify_domain(presentation, options)),
            );
        }

        collector.record(
            VerificationCheck::HolderSignature,
            Stage::from_failure(self.verify_holder_proof(presentation).await),
        );

        let credentials = stream::iter(&presentation.verifiable_credential)
            .map(|credential| self.credential_pipeline(credential, options))
            .buffered(self.settings.max_concurrency.max(1))
            .try_collect::<Vec<_>>()
            .await?;

        let mut embedded = Stage {
            ran: true,
            ..Default::default()
        };
        for result in credentials {
            match result {
                VerificationResult::Valid { warnings, .. } => embedded.warnings.extend(warnings),
                VerificationResult::Invalid(failure) => embedded.failures.push(failure),
            }
        }
        collector.record(VerificationCheck::EmbeddedCredentials, embedded);

        Ok(collector.finish())
    }

    async fn verify_holder_proof(&self, presentation: &Presentation) -> Option<VerificationFailure> {
        let Some(proof) = &presentation.proof else {
            return Some(VerificationFailure::invalid_proof(
                "Presentation must have a proof property",
            ));
        };

        let (Some(did_resolver), Some(signature_verifiers)) = (
            &self.providers.did_resolver,
            &self.providers.signature_verifiers,
        ) else {
            return Some(VerificationFailure::invalid_proof(
                "Cannot verify presentation proof: no DID resolver or signature verifier configured",
            ));
        };

        let Some(holder_did) = did_from_verification_method(&proof.verification_method) else {
            return Some(VerificationFailure::invalid_proof(format!(
                "Invalid verification method reference `{}`",
                proof.verification_method
            )));
        };

        if let Some(holder) = &presentation.holder
            && holder != holder_did.as_str()
        {
            return Some(VerificationFailure::invalid_proof(format!(
                "Presentation proof key `{}` does not belong to holder `{holder}`",
                proof.verification_method
            )));
        }

        let document = match did_resolver.resolve(&holder_did).await {
            Ok(document) => document,
            Err(error) => {
                tracing::warn!("Failed to resolve holder `{holder_did}`: {error}");
                return Some(VerificationFailure::invalid_proof(format!(
                    "Unable to resolve holder `{holder_did}`: {error}"
                )));
            }
        };

        let Some(verification_method) = document.find_verification_method(&proof.verification_method)
        else {
            return Some(VerificationFailure::invalid_proof(format!(
                "Verification method `{}` not found in DID document",
                proof.verification_method
            )));
        };

        let canonical = match canonicalize_without_proof(presentation) {
            Ok(canonical) => canonical,
            Err(error) => {
                return Some(VerificationFailure::invalid_proof(format!(
                    "Unable to canonicalize presentation: {error}"
                )));
            }
        };

        let valid = verify_presentation_signature(
            &canonical,
            &proof.proof_value,
            verification_method,
            &proof.r#type,
            &**signature_verifiers,
        )
        .await;

        if valid {
            None
        } else {
            Some(VerificationFailure::invalid_proof(
                "Presentation holder signature is invalid",
            ))
        }
    }
}
