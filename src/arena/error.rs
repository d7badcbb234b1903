use thiserror::Error;

use crate::store::StoreError;

/// Errors produced by matchmaking and result submission.
#[derive(Debug, Error)]
pub enum ArenaError {
    /// No category has two models with jokes. A startup-data problem; checked
    /// defensively so matchmaking fails loudly instead of panicking on an
    /// empty random choice.
    #[error("no overlapping joke categories with at least two models")]
    NoEligibleCategory,

    /// The battle token was already consumed, never existed, or is garbage.
    #[error("battle expired or unknown")]
    UnknownToken,

    /// The declared winner is not one of the two contestants.
    #[error("winner must be part of the battle")]
    InvalidWinner,

    /// The category index promised jokes that the catalog does not hold.
    #[error("catalog has no jokes for model '{model}' in category '{category}'")]
    CatalogInconsistency { model: String, category: String },

    #[error(transparent)]
    Store(#[from] StoreError),
}
