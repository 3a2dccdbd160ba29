use std::time::Duration;

use indoc::indoc;
use similar_asserts::assert_eq;

use super::ConfigValidationError;
use super::core_config::*;
use crate::provider::revocation::model::MAX_STATUS_LIST_SIZE;
use crate::provider::trust_policy::TrustPolicyType;
use crate::service::revocation_check::RevocationFailurePolicy;

#[test]
fn test_defaults_without_input() {
    let config = CoreConfig::parse(Vec::<InputFormat>::new()).unwrap();

    assert_eq!(config, CoreConfig::default());
    assert_eq!(
        config.revocation.failure_policy,
        RevocationFailurePolicy::FailClosed
    );
    assert_eq!(config.revocation.default_status_list_size, 131072);
    assert_eq!(config.batch.max_concurrency, 8);
    assert!(config.trust_policy().is_none());

    let options = config.verification_options();
    assert!(options.check_revocation);
    assert_eq!(options.clock_skew_tolerance, time::Duration::minutes(5));
}

#[test]
#[cfg(feature = "config_yaml")]
fn test_parse_yaml_overrides() {
    let base = indoc! {"
        verification:
            clockSkewTolerance: 60
        revocation:
            failurePolicy: FAIL_WITH_WARNING
            timeout: 3
        trustPolicy:
            type: ALLOW_LIST
            issuers:
                - did:example:issuer
    "};
    let overrides = indoc! {"
        verification:
            checkTrust: false
        batch:
            maxConcurrency: 2
        issuance:
            timeout: 5
    "};

    let config = CoreConfig::from_yaml([base, overrides]).unwrap();

    assert_eq!(
        config.verification.clock_skew_tolerance,
        time::Duration::seconds(60)
    );
    assert!(!config.verification.check_trust);
    assert!(config.verification.check_expiration);
    assert_eq!(
        config.revocation.failure_policy,
        RevocationFailurePolicy::FailWithWarning
    );
    assert_eq!(config.revocation.timeout, Some(Duration::from_secs(3)));
    assert_eq!(config.issuance.timeout, Some(Duration::from_secs(5)));
    assert_eq!(config.trust_policy.r#type, TrustPolicyType::AllowList);

    let settings = config.verification_settings();
    assert_eq!(settings.max_concurrency, 2);
    assert_eq!(
        settings.revocation_policy,
        RevocationFailurePolicy::FailWithWarning
    );
    assert!(config.verification_options().trust_policy.is_some());
}

#[test]
#[cfg(feature = "config_yaml")]
fn test_parse_rejects_unknown_policy() {
    let config = indoc! {"
        revocation:
            failurePolicy: FAIL_SOMETIMES
    "};

    assert!(matches!(
        CoreConfig::from_yaml([config]),
        Err(super::ConfigParsingError::GeneralParsingError(_))
    ));
}

#[test]
#[cfg(feature = "config_yaml")]
fn test_parse_runs_validation() {
    let config = indoc! {"
        batch:
            maxConcurrency: 0
    "};

    assert!(matches!(
        CoreConfig::from_yaml([config]),
        Err(super::ConfigParsingError::Validation(
            ConfigValidationError::MustBePositive { .. }
        ))
    ));
}

#[test]
fn test_validate_trust_policy_issuers() {
    let mut config = CoreConfig::default();
    config.trust_policy.issuers = vec!["https://issuer.example.com".to_owned()];

    assert_eq!(
        config.validate(),
        Err(ConfigValidationError::InvalidIssuer(
            "https://issuer.example.com".to_owned()
        ))
    );
}

#[test]
fn test_validate_status_list_size_limits() {
    let mut config = CoreConfig::default();
    config.revocation.max_status_list_size = 1024;
    config.revocation.default_status_list_size = 2048;
    assert_eq!(
        config.validate(),
        Err(ConfigValidationError::MustNotExceed {
            field: "revocation.defaultStatusListSize",
            limit: 1024
        })
    );

    config.revocation.max_status_list_size = usize::MAX;
    assert_eq!(
        config.validate(),
        Err(ConfigValidationError::MustNotExceed {
            field: "revocation.maxStatusListSize",
            limit: MAX_STATUS_LIST_SIZE
        })
    );
}

#[test]
fn test_unsupported_file_extension() {
    assert!(CoreConfig::from_files(&["config.toml"]).is_err());
}

#[cfg(all(feature = "config_yaml", feature = "config_env"))]
rusty_fork::rusty_fork_test! {
    #[test]
    fn test_env_overrides_files() {
        // SAFETY: runs in a forked process
        unsafe {
            std::env::set_var("VERIFIER_revocation__failurePolicy", "FAIL_OPEN");
            std::env::set_var("VERIFIER_batch__maxConcurrency", "16");
        }

        let config = CoreConfig::from_yaml([indoc! {"
            revocation:
                failurePolicy: FAIL_CLOSED
        "}])
        .unwrap();

        assert_eq!(config.revocation.failure_policy, RevocationFailurePolicy::FailOpen);
        assert_eq!(config.batch.max_concurrency, 16);
    }
}
