//! Sequence-form game model.
//!
//! A two-player extensive-form game in sequence form is one [`Treeplex`] per
//! player plus a sparse [`UtilityMatrix`] over pairs of terminal sequences.
//! Strategies are expressed either behaviorally (one distribution per
//! infoset) or as realization plans (reach probability per sequence).
//!
//! Everything here is built once and read by the solver; nothing in this
//! module holds solver state.

pub mod game;
pub mod strategy;
pub mod treeplex;
pub mod utility;

pub use game::Game;
pub use strategy::{BehavioralStrategyProfile, LossVector, RealizationPlan, FLOW_TOLERANCE};
pub use treeplex::{InfoSetId, InformationSet, Sequence, Treeplex, TreeplexBuilder};
pub use utility::{Outcome, Role, SumType, UtilityMatrix};
