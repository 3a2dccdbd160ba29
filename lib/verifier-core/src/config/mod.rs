use thiserror::Error;

pub mod core_config;

#[cfg(test)]
mod test;

#[derive(Debug, Error)]
pub enum ConfigParsingError {
    #[error("Config parsing error: `{0}`")]
    GeneralParsingError(String),
    #[error(transparent)]
    Validation(#[from] ConfigValidationError),
}

#[derive(Debug, Error, PartialEq)]
pub enum ConfigValidationError {
    #[error("Field `{field}` must be greater than zero")]
    MustBePositive { field: &'static str },
    #[error("Field `{field}` must not be negative")]
    MustNotBeNegative { field: &'static str },
    #[error("Field `{field}` must not exceed {limit}")]
    MustNotExceed { field: &'static str, limit: usize },
    #[error("Trust policy issuer `{0}` is not a DID")]
    InvalidIssuer(String),
}
