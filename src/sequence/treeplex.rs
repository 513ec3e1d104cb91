//! Treeplex: one player's decision tree in sequence form.
//!
//! Every information set owns a contiguous range of sequence ids, one per
//! available action. The ranges of all infosets are disjoint and together
//! cover `[0, sequence_count)`. The empty infoset owns only the empty
//! sequence and is the root of the tree; every other infoset hangs below the
//! sequence (its *father*) that leads to it.
//!
//! The treeplex is stored as an arena indexed by id. The tables needed for
//! traversal (sequence owner, infosets following a sequence, breadth-first
//! order) are computed once in [`TreeplexBuilder::build`].

use std::collections::VecDeque;
use std::fmt;
use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

use crate::error::TreeplexError;
use crate::sequence::strategy::{BehavioralStrategyProfile, LossVector};

/// Sequence identifier, an index in `[0, sequence_count)`.
pub type Sequence = usize;

/// Information set identifier, an index in `[0, infoset_count)`.
pub type InfoSetId = usize;

/// A decision point of one player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InformationSet {
    id: InfoSetId,
    father: Option<Sequence>,
    first: Sequence,
    last: Sequence,
}

impl InformationSet {
    /// Infoset id.
    pub fn id(&self) -> InfoSetId {
        self.id
    }

    /// The sequence leading to this infoset. `None` only for the empty infoset.
    pub fn father(&self) -> Option<Sequence> {
        self.father
    }

    /// First child sequence.
    pub fn first(&self) -> Sequence {
        self.first
    }

    /// Last child sequence (inclusive).
    pub fn last(&self) -> Sequence {
        self.last
    }

    /// All child sequences, ascending.
    pub fn children(&self) -> RangeInclusive<Sequence> {
        self.first..=self.last
    }

    /// Number of actions available here.
    pub fn num_actions(&self) -> usize {
        self.last - self.first + 1
    }

    /// Whether `sequence` is one of this infoset's actions.
    pub fn owns(&self, sequence: Sequence) -> bool {
        self.children().contains(&sequence)
    }
}

impl fmt::Display for InformationSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.father {
            Some(father) => write!(
                f,
                "infoset {} (father {}, children {}..={})",
                self.id, father, self.first, self.last
            ),
            None => write!(f, "infoset {} (root, sequence {})", self.id, self.first),
        }
    }
}

/// One player's set of information sets in sequence form.
///
/// Immutable once built. Use [`TreeplexBuilder`] to construct one.
#[derive(Debug, Clone, Serialize)]
pub struct Treeplex {
    player: Option<usize>,
    infosets: Vec<InformationSet>,
    sequence_count: usize,
    empty_sequence: Sequence,
    empty_infoset: InfoSetId,

    /// sequence -> infoset owning it
    owner: Vec<InfoSetId>,
    /// sequence -> infosets whose father it is, ascending
    followers: Vec<Vec<InfoSetId>>,
    /// breadth-first order from the empty infoset
    order: Vec<InfoSetId>,
}

impl Treeplex {
    /// Player label attached by the builder, if any.
    pub fn player(&self) -> Option<usize> {
        self.player
    }

    /// Total number of sequences, including the empty one.
    pub fn sequence_count(&self) -> usize {
        self.sequence_count
    }

    /// Number of information sets, including the empty one.
    pub fn infoset_count(&self) -> usize {
        self.infosets.len()
    }

    /// The sequence representing "no action taken yet".
    pub fn empty_sequence(&self) -> Sequence {
        self.empty_sequence
    }

    /// The root infoset, owning only the empty sequence.
    pub fn empty_information_set(&self) -> &InformationSet {
        &self.infosets[self.empty_infoset]
    }

    /// Whether `infoset` is the root.
    pub fn is_empty_information_set(&self, infoset: InfoSetId) -> bool {
        infoset == self.empty_infoset
    }

    /// Whether the treeplex contains `sequence`.
    pub fn has_sequence(&self, sequence: Sequence) -> bool {
        sequence < self.sequence_count
    }

    /// Look up an infoset by id.
    pub fn information_set(&self, id: InfoSetId) -> Option<&InformationSet> {
        self.infosets.get(id)
    }

    /// All infosets in id order.
    pub fn information_sets(&self) -> &[InformationSet] {
        &self.infosets
    }

    /// The infoset owning `sequence`.
    pub fn owner_of(&self, sequence: Sequence) -> Option<&InformationSet> {
        self.owner.get(sequence).map(|&id| &self.infosets[id])
    }

    /// Ids of the infosets reached right after playing `sequence`, ascending.
    pub fn child_information_sets(&self, sequence: Sequence) -> &[InfoSetId] {
        self.followers
            .get(sequence)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Infosets in breadth-first order from the empty infoset.
    ///
    /// Parents always come before their children. Within one parent, child
    /// infosets follow ascending child sequence, then ascending infoset id.
    pub fn ordered_information_sets(&self) -> impl DoubleEndedIterator<Item = &InformationSet> + '_ {
        self.order.iter().map(move |&id| &self.infosets[id])
    }

    /// Expected value below every non-terminal sequence.
    ///
    /// Walks the infosets in reverse breadth-first order, so every infoset's
    /// subtree value is complete before it is folded into its father:
    ///
    /// ```text
    /// utility[father(I)] += profile(c) * (loss[c] + utility[c])   for c in children(I)
    /// ```
    ///
    /// The empty infoset has no father and contributes nothing. Terminal
    /// sequences end up with 0.
    pub fn subtree_utility(&self, profile: &BehavioralStrategyProfile, loss: &LossVector) -> LossVector {
        debug_assert_eq!(profile.len(), self.sequence_count);
        debug_assert_eq!(loss.len(), self.sequence_count);

        let mut utility = LossVector::zeros(self.sequence_count);

        for infoset in self.ordered_information_sets().rev() {
            let Some(father) = infoset.father else {
                continue;
            };
            for child in infoset.children() {
                let value = profile.probability(child) * (loss[child] + utility[child]);
                utility[father] += value;
            }
        }

        utility
    }
}

impl fmt::Display for Treeplex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, infoset) in self.ordered_information_sets().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", infoset)?;
        }
        Ok(())
    }
}

/// Builder for [`Treeplex`].
///
/// The empty infoset is created up front with id 0; every infoset added
/// afterwards gets the next id.
///
/// ```
/// use treeplex_cfr::TreeplexBuilder;
///
/// // empty sequence 0, one decision with actions 1 and 2,
/// // then a follow-up decision after action 1
/// let mut builder = TreeplexBuilder::new(0);
/// builder.information_set(0, 1, 2);
/// builder.information_set(1, 3, 4);
/// let treeplex = builder.build().unwrap();
///
/// assert_eq!(treeplex.sequence_count(), 5);
/// assert_eq!(treeplex.child_information_sets(1), &[2]);
/// ```
#[derive(Debug, Clone)]
pub struct TreeplexBuilder {
    player: Option<usize>,
    empty_sequence: Sequence,
    infosets: Vec<InformationSet>,
}

impl TreeplexBuilder {
    /// Start a treeplex whose empty sequence is `empty_sequence`.
    pub fn new(empty_sequence: Sequence) -> Self {
        Self {
            player: None,
            empty_sequence,
            infosets: vec![InformationSet {
                id: 0,
                father: None,
                first: empty_sequence,
                last: empty_sequence,
            }],
        }
    }

    /// Attach a player label.
    pub fn with_player(mut self, player: usize) -> Self {
        self.player = Some(player);
        self
    }

    /// Add an infoset reached after `father`, owning `first..=last`.
    pub fn information_set(&mut self, father: Sequence, first: Sequence, last: Sequence) -> InfoSetId {
        let id = self.infosets.len();
        self.infosets.push(InformationSet {
            id,
            father: Some(father),
            first,
            last,
        });
        id
    }

    /// Validate the structure and compute the traversal tables.
    pub fn build(self) -> Result<Treeplex, TreeplexError> {
        for infoset in &self.infosets {
            if infoset.first > infoset.last {
                return Err(TreeplexError::InvertedRange {
                    infoset: infoset.id,
                    first: infoset.first,
                    last: infoset.last,
                });
            }
        }

        let sequence_count = self
            .infosets
            .iter()
            .map(|i| i.last)
            .max()
            .unwrap_or(self.empty_sequence)
            .max(self.empty_sequence)
            + 1;

        let mut owner: Vec<Option<InfoSetId>> = vec![None; sequence_count];
        for infoset in &self.infosets {
            for sequence in infoset.children() {
                if let Some(first) = owner[sequence] {
                    return Err(TreeplexError::OverlappingSequence {
                        sequence,
                        first,
                        second: infoset.id,
                    });
                }
                owner[sequence] = Some(infoset.id);
            }
        }
        let owner = owner
            .into_iter()
            .enumerate()
            .map(|(sequence, id)| id.ok_or(TreeplexError::UnownedSequence { sequence }))
            .collect::<Result<Vec<_>, _>>()?;

        let mut followers = vec![Vec::new(); sequence_count];
        for infoset in &self.infosets {
            let Some(father) = infoset.father else {
                continue;
            };
            if father >= sequence_count {
                return Err(TreeplexError::FatherOutOfRange {
                    infoset: infoset.id,
                    father,
                    sequence_count,
                });
            }
            if infoset.owns(father) {
                return Err(TreeplexError::SelfParent {
                    infoset: infoset.id,
                    father,
                });
            }
            followers[father].push(infoset.id);
        }

        let order = breadth_first(&self.infosets, &followers, 0);
        if order.len() != self.infosets.len() {
            let mut seen = vec![false; self.infosets.len()];
            order.iter().for_each(|&id| seen[id] = true);
            let infoset = seen.iter().position(|&s| !s).unwrap_or_default();
            return Err(TreeplexError::Unreachable { infoset });
        }

        log::trace!(
            "built treeplex: {} infosets, {} sequences, empty sequence {}",
            self.infosets.len(),
            sequence_count,
            self.empty_sequence
        );

        Ok(Treeplex {
            player: self.player,
            infosets: self.infosets,
            sequence_count,
            empty_sequence: self.empty_sequence,
            empty_infoset: 0,
            owner,
            followers,
            order,
        })
    }
}

/// Breadth-first order from `root`. Each infoset has exactly one father, so
/// a cycle can only show up as infosets that are never reached.
fn breadth_first(
    infosets: &[InformationSet],
    followers: &[Vec<InfoSetId>],
    root: InfoSetId,
) -> Vec<InfoSetId> {
    let mut order = Vec::with_capacity(infosets.len());
    let mut queue = VecDeque::from([root]);

    while let Some(id) = queue.pop_front() {
        order.push(id);
        for sequence in infosets[id].children() {
            queue.extend(followers[sequence].iter().copied());
        }
    }

    order
}
