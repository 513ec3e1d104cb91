//! Error types for treeplex construction, game validation and solving.
//!
//! None of these are retryable. A treeplex or game error means the input was
//! malformed and is never handed to the solver; a solver error means an
//! invariant broke mid-run and the run is over.

use thiserror::Error;

use crate::sequence::{InfoSetId, Role, Sequence};

/// Structural problems found while building a [`Treeplex`](crate::Treeplex).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TreeplexError {
    /// An infoset whose first child comes after its last.
    #[error("infoset {infoset} has inverted child range {first}..={last}")]
    InvertedRange {
        infoset: InfoSetId,
        first: Sequence,
        last: Sequence,
    },

    /// Two infosets claim the same sequence.
    #[error("sequence {sequence} is owned by both infoset {first} and infoset {second}")]
    OverlappingSequence {
        sequence: Sequence,
        first: InfoSetId,
        second: InfoSetId,
    },

    /// A sequence below the count that no infoset owns.
    #[error("sequence {sequence} is not owned by any infoset")]
    UnownedSequence { sequence: Sequence },

    /// A father sequence the treeplex does not have.
    #[error("infoset {infoset} has father sequence {father} outside [0, {sequence_count})")]
    FatherOutOfRange {
        infoset: InfoSetId,
        father: Sequence,
        sequence_count: usize,
    },

    /// An infoset that follows one of its own actions.
    #[error("infoset {infoset} has father sequence {father} inside its own child range")]
    SelfParent { infoset: InfoSetId, father: Sequence },

    /// An infoset that cannot be reached from the empty infoset.
    #[error("infoset {infoset} is not reachable from the empty sequence")]
    Unreachable { infoset: InfoSetId },
}

/// Problems with a game detected once, at construction.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GameError {
    /// An entry whose utilities break the declared sum type.
    #[error(
        "utility entry ({player_sequence}, {opponent_sequence}) sums to {sum}, expected {expected} for a {sum_type} game"
    )]
    SumTypeMismatch {
        player_sequence: Sequence,
        opponent_sequence: Sequence,
        sum: f64,
        expected: f64,
        sum_type: &'static str,
    },

    /// An entry whose sequence is missing from its treeplex.
    #[error("utility entry references {role} sequence {sequence}, but the treeplex has {sequence_count}")]
    UnknownSequence {
        role: Role,
        sequence: Sequence,
        sequence_count: usize,
    },

    /// Both roles carry the same player id.
    #[error("player and opponent share the id {0}")]
    DuplicatePlayerId(usize),
}

/// Realization-plan invariant violations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlanError {
    /// Plan length differs from the sequence count.
    #[error("plan has {actual} entries, treeplex has {expected} sequences")]
    Length { expected: usize, actual: usize },

    /// The empty sequence is not reached with probability 1.
    #[error("empty sequence {sequence} has probability {value}, expected exactly 1")]
    RootProbability { sequence: Sequence, value: f64 },

    /// A probability below zero, or NaN.
    #[error("sequence {sequence} has negative or undefined probability {value}")]
    Negative { sequence: Sequence, value: f64 },

    /// Children of an infoset do not add up to their father.
    #[error(
        "infoset {infoset}: children sum to {children_sum}, father sequence {father} has {father_probability}"
    )]
    FlowConservation {
        infoset: InfoSetId,
        father: Sequence,
        father_probability: f64,
        children_sum: f64,
    },
}

/// Invalid solver configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No iterations to run.
    #[error("iteration budget must be at least 1")]
    ZeroIterations,

    /// Config file could not be read.
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    /// Config JSON is malformed.
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Fatal conditions raised while solving.
#[derive(Debug, Error)]
pub enum SolverError {
    /// A realization plan failed validation.
    #[error("{role} realization plan is invalid: {source}")]
    InvalidPlan {
        role: Role,
        #[source]
        source: PlanError,
    },

    /// Regret matching found a non-positive normalizer.
    #[error("infoset {infoset}: regret sum {sum} is not positive")]
    DegenerateRegret { infoset: InfoSetId, sum: f64 },

    /// The epsilon-Nash gap came out negative.
    #[error("epsilon-Nash gap {gap} is negative at iteration {iteration}")]
    NegativeGap { gap: f64, iteration: u64 },

    /// The configuration was rejected.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The driver is already `Done`.
    #[error("solver has already finished")]
    Finished,
}

impl SolverError {
    pub(crate) fn plan(role: Role) -> impl FnOnce(PlanError) -> SolverError {
        move |source| SolverError::InvalidPlan { role, source }
    }
}
