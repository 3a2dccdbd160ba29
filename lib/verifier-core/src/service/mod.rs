pub mod issuance;
pub mod presentation;
pub mod revocation_check;
pub mod validation;
pub mod verification;

#[cfg(test)]
pub(crate) mod test_utilities;
