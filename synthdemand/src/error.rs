pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can stop customers from being generated for an area.
///
/// Problems with individual input records (a broken polygon, a cell with a negative population)
/// never show up here; those records are skipped with a warning. These errors mean the whole
/// area can't be handled, since a silently truncated customer count would corrupt downstream
/// demand figures.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid area identifier: {0}")]
    InvalidAreaIdentifier(#[from] IdentifierError),

    #[error("{demand} customers requested, but the area has no eligible land use to put them in")]
    NoEligibleArea { demand: usize },

    #[error("{demand} customers requested, but no grid cell has a positive population")]
    NoPopulatedCells { demand: usize },

    #[error("only placed {produced} of {target} customers after {rounds} sampling rounds")]
    SamplingNonConvergence {
        target: usize,
        produced: usize,
        rounds: usize,
    },

    #[error("invalid national constants: {0}")]
    InvalidConstants(String),

    #[error("data provider failed: {0:#}")]
    Provider(anyhow::Error),
}

/// Why an identifier didn't resolve to exactly one area.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum IdentifierError {
    #[error("{key:?} isn't a valid regkey: {reason}")]
    MalformedRegkey { key: String, reason: &'static str },

    #[error("no area matches {0:?}")]
    NotFound(String),

    #[error("{identifier:?} matches several areas: {}", candidates.join(", "))]
    Ambiguous {
        identifier: String,
        candidates: Vec<String>,
    },
}
