//! The contract a puzzle configuration must satisfy to be searched.

use std::hash::Hash;

use smallvec::SmallVec;

/// Successor list. Grid puzzles never have more than four neighbors, so this
/// stays on the stack for every board the crate ships.
pub type Successors<S> = SmallVec<[S; 4]>;

/// One configuration of a puzzle, as consumed by [`crate::solver::Solver`].
///
/// Implementations must be immutable values: the solver clones states freely
/// and shares them between search nodes.
pub trait PuzzleState: Clone {
    /// Structural identity used for duplicate suppression. Two states with
    /// identical layouts must produce equal signatures.
    type Signature: Hash + Eq;

    /// Whether this is the goal configuration
    fn is_goal(&self) -> bool;

    /// Lower-bound estimate of the moves left to reach the goal
    fn heuristic(&self) -> u32;

    /// All configurations one legal move away
    fn successors(&self) -> Successors<Self>;

    /// A fixed one-swap mutation with the opposite solvability parity.
    fn twin(&self) -> Self;

    fn signature(&self) -> Self::Signature;
}
