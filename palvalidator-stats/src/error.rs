//! Error kinds owned by this crate: `CorrectionError` and
//! `McptConfigError`, construction-time validation for `MultipleTestingCorrector`
//! and `MonteCarloPermutationDriver`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CorrectionError {
    #[error("correction input is empty: {0}")]
    EmptyCorrectionInput(String),
}

#[derive(Debug, Error)]
pub enum McptConfigError {
    #[error("permutation count {0} is below the required minimum of {1}")]
    TooFewPermutations(u32, u32),
}
