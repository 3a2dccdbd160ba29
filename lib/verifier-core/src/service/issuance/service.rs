use super::IssuanceService;
use super::error_mapping::{handle_issuance_errors, validate_engine_availability};
use super::validator::validate_issuance_request;
use crate::model::common::Cancelled;
use crate::model::issuance::{ENGINE_NOT_INITIALIZED, IssuanceFailure, IssuanceRequest, IssuanceResult};
use crate::provider::proof_engine::error::ProofEngineError;

impl IssuanceService {
    /// Issues a credential through the engine registered for `request.format`.
    ///
    /// Request problems, engine unavailability and engine errors all end up as
    /// [IssuanceResult::Failure]; only cancellation is returned as an error.
    #[tracing::instrument(level = "debug", skip_all, fields(format = %request.format), err(Debug))]
    pub async fn issue_credential(
        &self,
        request: &IssuanceRequest,
    ) -> Result<IssuanceResult, Cancelled> {
        if let Some(failure) = validate_issuance_request(request) {
            return Ok(failure.into());
        }

        if let Some(failure) = validate_engine_availability(&request.format, &*self.proof_engines)
        {
            return Ok(failure.into());
        }

        let Some(engine) = self.proof_engines.get_proof_engine(&request.format) else {
            return Ok(IssuanceFailure::AdapterNotReady {
                format: request.format.clone(),
                reason: ENGINE_NOT_INITIALIZED.to_owned(),
            }
            .into());
        };

        let attempt = async {
            match self.timeout {
                Some(timeout) => tokio::time::timeout(timeout, engine.issue(request))
                    .await
                    .unwrap_or(Err(ProofEngineError::Timeout(timeout))),
                None => engine.issue(request).await,
            }
        };

        let result = handle_issuance_errors(&request.format, attempt).await?;
        if result.is_success() {
            tracing::info!("Issued credential with `{}`", request.format);
        }

        Ok(result)
    }
}
