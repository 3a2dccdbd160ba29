use std::path::Path;
use std::sync::Arc;

use figment::Figment;
#[cfg(feature = "config_env")]
use figment::providers::Env;
#[cfg(feature = "config_json")]
use figment::providers::Json;
#[cfg(feature = "config_yaml")]
use figment::providers::Yaml;
use figment::providers::{Data, Format};
use serde::{Deserialize, Serialize};
use serde_with::{DurationSeconds, serde_as};
use shared_types::DidValue;

use super::{ConfigParsingError, ConfigValidationError};
use crate::model::verification::{DEFAULT_CLOCK_SKEW_TOLERANCE, VerificationOptions};
use crate::provider::revocation::model::{DEFAULT_STATUS_LIST_SIZE, MAX_STATUS_LIST_SIZE};
use crate::provider::trust_policy::{
    AcceptAllTrustPolicy, AllowListTrustPolicy, BlockListTrustPolicy, TrustPolicy,
    TrustPolicyType,
};
use crate::service::revocation_check::RevocationFailurePolicy;
use crate::service::verification::{DEFAULT_MAX_CONCURRENCY, VerificationSettings};

const ENV_PREFIX: &str = "VERIFIER_";

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoreConfig {
    #[serde(default)]
    pub verification: VerificationConfig,
    #[serde(default)]
    pub revocation: RevocationConfig,
    #[serde(default)]
    pub batch: BatchConfig,
    #[serde(default)]
    pub issuance: IssuanceConfig,
    #[serde(default)]
    pub trust_policy: TrustPolicyConfig,
}

#[serde_as]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VerificationConfig {
    pub check_not_before: bool,
    pub check_expiration: bool,
    pub check_revocation: bool,
    pub check_trust: bool,
    pub check_challenge: bool,
    pub check_domain: bool,
    #[serde_as(as = "DurationSeconds<i64>")]
    pub clock_skew_tolerance: time::Duration,
}

impl Default for VerificationConfig {
    fn default() -> Self {
        Self {
            check_not_before: true,
            check_expiration: true,
            check_revocation: true,
            check_trust: true,
            check_challenge: true,
            check_domain: true,
            clock_skew_tolerance: DEFAULT_CLOCK_SKEW_TOLERANCE,
        }
    }
}

#[serde_as]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RevocationConfig {
    pub failure_policy: RevocationFailurePolicy,
    /// Status list lookup timeout, no timeout when unset
    #[serde_as(as = "Option<DurationSeconds<u64>>")]
    pub timeout: Option<std::time::Duration>,
    pub default_status_list_size: usize,
    /// Upper bound for created and expanded lists
    pub max_status_list_size: usize,
}

impl Default for RevocationConfig {
    fn default() -> Self {
        Self {
            failure_policy: RevocationFailurePolicy::default(),
            timeout: Some(std::time::Duration::from_secs(10)),
            default_status_list_size: DEFAULT_STATUS_LIST_SIZE,
            max_status_list_size: MAX_STATUS_LIST_SIZE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BatchConfig {
    pub max_concurrency: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
        }
    }
}

#[serde_as]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct IssuanceConfig {
    #[serde_as(as = "Option<DurationSeconds<u64>>")]
    pub timeout: Option<std::time::Duration>,
}

impl Default for IssuanceConfig {
    fn default() -> Self {
        Self {
            timeout: Some(std::time::Duration::from_secs(30)),
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TrustPolicyConfig {
    pub r#type: TrustPolicyType,
    pub issuers: Vec<String>,
}

pub enum InputFormat {
    #[cfg(feature = "config_yaml")]
    Yaml(Data<Yaml>),
    #[cfg(feature = "config_json")]
    Json(Data<Json>),
}

impl InputFormat {
    #[cfg(feature = "config_yaml")]
    pub fn yaml_file(p: impl AsRef<Path>) -> InputFormat {
        InputFormat::Yaml(Yaml::file(p))
    }

    #[cfg(feature = "config_yaml")]
    pub fn yaml_str(s: impl AsRef<str>) -> InputFormat {
        InputFormat::Yaml(Yaml::string(s.as_ref()))
    }

    #[cfg(feature = "config_json")]
    pub fn json_file(p: impl AsRef<Path>) -> InputFormat {
        InputFormat::Json(Json::file(p))
    }

    #[cfg(feature = "config_json")]
    pub fn json_str(s: impl AsRef<str>) -> InputFormat {
        InputFormat::Json(Json::string(s.as_ref()))
    }
}

impl CoreConfig {
    pub fn from_files(files: &[impl AsRef<Path>]) -> Result<Self, ConfigParsingError> {
        let mut inputs: Vec<InputFormat> = Vec::with_capacity(files.len());

        for path in files {
            #[cfg(feature = "config_yaml")]
            if path
                .as_ref()
                .extension()
                .is_some_and(|ext| ext == "yml" || ext == "yaml")
            {
                inputs.push(InputFormat::yaml_file(path));
                continue;
            }

            #[cfg(feature = "config_json")]
            if path.as_ref().extension() == Some("json".as_ref()) {
                inputs.push(InputFormat::json_file(path));
                continue;
            }

            return Err(ConfigParsingError::GeneralParsingError(format!(
                "Unsupported file or missing file extension: {:?}",
                path.as_ref().to_str()
            )));
        }

        Self::parse(inputs)
    }

    #[cfg(feature = "config_yaml")]
    pub fn from_yaml(
        configs: impl IntoIterator<Item = impl AsRef<str>>,
    ) -> Result<Self, ConfigParsingError> {
        Self::parse(configs.into_iter().map(InputFormat::yaml_str))
    }

    /// Later inputs override earlier ones, environment variables override all
    pub fn parse(inputs: impl IntoIterator<Item = InputFormat>) -> Result<Self, ConfigParsingError> {
        let mut figment = Figment::new();

        for data in inputs {
            figment = match data {
                #[cfg(feature = "config_yaml")]
                InputFormat::Yaml(content) => figment.merge(content),
                #[cfg(feature = "config_json")]
                InputFormat::Json(content) => figment.merge(content),
            };
        }

        #[cfg(feature = "config_env")]
        {
            figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__").lowercase(false));
        }

        let config = figment
            .extract::<CoreConfig>()
            .map_err(|e| ConfigParsingError::GeneralParsingError(e.to_string()))?;
        config.validate()?;

        tracing::debug!(
            "Loaded config: revocation policy {}, trust policy {}",
            config.revocation.failure_policy,
            config.trust_policy.r#type
        );

        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.verification.clock_skew_tolerance.is_negative() {
            return Err(ConfigValidationError::MustNotBeNegative {
                field: "verification.clockSkewTolerance",
            });
        }
        if self.revocation.default_status_list_size == 0 {
            return Err(ConfigValidationError::MustBePositive {
                field: "revocation.defaultStatusListSize",
            });
        }
        if self.revocation.max_status_list_size > MAX_STATUS_LIST_SIZE {
            return Err(ConfigValidationError::MustNotExceed {
                field: "revocation.maxStatusListSize",
                limit: MAX_STATUS_LIST_SIZE,
            });
        }
        if self.revocation.default_status_list_size > self.revocation.max_status_list_size {
            return Err(ConfigValidationError::MustNotExceed {
                field: "revocation.defaultStatusListSize",
                limit: self.revocation.max_status_list_size,
            });
        }
        if self.batch.max_concurrency == 0 {
            return Err(ConfigValidationError::MustBePositive {
                field: "batch.maxConcurrency",
            });
        }
        if let Some(issuer) = self
            .trust_policy
            .issuers
            .iter()
            .find(|issuer| !DidValue::is_did(issuer))
        {
            return Err(ConfigValidationError::InvalidIssuer(issuer.clone()));
        }

        Ok(())
    }

    pub fn trust_policy(&self) -> Option<Arc<dyn TrustPolicy>> {
        let issuers = self.trust_policy.issuers.iter().cloned();

        match self.trust_policy.r#type {
            TrustPolicyType::None => None,
            TrustPolicyType::AcceptAll => Some(Arc::new(AcceptAllTrustPolicy)),
            TrustPolicyType::AllowList => Some(Arc::new(AllowListTrustPolicy::new(issuers))),
            TrustPolicyType::BlockList => Some(Arc::new(BlockListTrustPolicy::new(issuers))),
        }
    }

    /// Challenge and domain expectations are per request and left unset
    pub fn verification_options(&self) -> VerificationOptions {
        let verification = &self.verification;

        VerificationOptions {
            check_not_before: verification.check_not_before,
            check_expiration: verification.check_expiration,
            check_revocation: verification.check_revocation,
            check_trust: verification.check_trust,
            check_challenge: verification.check_challenge,
            check_domain: verification.check_domain,
            clock_skew_tolerance: verification.clock_skew_tolerance,
            expected_challenge: None,
            expected_domain: None,
            trust_policy: self.trust_policy(),
        }
    }

    pub fn verification_settings(&self) -> VerificationSettings {
        VerificationSettings {
            revocation_policy: self.revocation.failure_policy,
            revocation_timeout: self.revocation.timeout,
            max_concurrency: self.batch.max_concurrency,
        }
    }
}
