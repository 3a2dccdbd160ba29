pub mod common;
pub mod credential;
pub mod issuance;
pub mod presentation;
pub mod verification;
