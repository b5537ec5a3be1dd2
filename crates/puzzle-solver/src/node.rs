//! Search nodes and their frontier ordering.

use std::cmp::Ordering;
use std::rc::Rc;

use crate::state::PuzzleState;

/// A state reached by a specific path. Nodes are never mutated after
/// construction; the back-links form a chain from any node to the root.
#[derive(Debug)]
pub struct SearchNode<S> {
    state: S,
    moves: usize,
    priority: usize,
    previous: Option<Rc<SearchNode<S>>>,
}

impl<S: PuzzleState> SearchNode<S> {
    /// Start of a search; zero moves.
    pub fn root(state: S) -> Rc<Self> {
        let priority = state.heuristic() as usize;
        Rc::new(Self {
            state,
            moves: 0,
            priority,
            previous: None,
        })
    }

    /// One move past `previous`.
    pub fn child(state: S, previous: &Rc<Self>) -> Rc<Self> {
        let moves = previous.moves + 1;
        let priority = state.heuristic() as usize + moves;
        Rc::new(Self {
            state,
            moves,
            priority,
            previous: Some(Rc::clone(previous)),
        })
    }
}

impl<S> SearchNode<S> {
    pub fn state(&self) -> &S {
        &self.state
    }

    /// Moves from the root to this node
    pub fn moves(&self) -> usize {
        self.moves
    }

    /// `heuristic + moves`; lower is expanded first.
    pub fn priority(&self) -> usize {
        self.priority
    }

    pub fn previous(&self) -> Option<&Rc<SearchNode<S>>> {
        self.previous.as_ref()
    }

    /// States from the root to this node, inclusive.
    pub fn path(&self) -> Vec<S>
    where
        S: Clone,
    {
        let mut path = Vec::with_capacity(self.moves + 1);
        let mut current = Some(self);
        while let Some(node) = current {
            path.push(node.state.clone());
            current = node.previous.as_deref();
        }
        path.reverse();
        path
    }
}

impl<S> Drop for SearchNode<S> {
    // Unlink the chain iteratively so long paths don't recurse on drop.
    fn drop(&mut self) {
        let mut previous = self.previous.take();
        while let Some(node) = previous {
            match Rc::try_unwrap(node) {
                Ok(mut node) => previous = node.previous.take(),
                Err(_) => break,
            }
        }
    }
}

/// Frontier entry: orders nodes so that `BinaryHeap` pops the lowest
/// priority first. Equal priorities compare equal; there is no tie-break.
pub(crate) struct Frontier<S>(pub(crate) Rc<SearchNode<S>>);

impl<S> PartialEq for Frontier<S> {
    fn eq(&self, other: &Self) -> bool {
        self.0.priority == other.0.priority
    }
}

impl<S> Eq for Frontier<S> {}

impl<S> PartialOrd for Frontier<S> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<S> Ord for Frontier<S> {
    fn cmp(&self, other: &Self) -> Ordering {
        // reversed: BinaryHeap is a max-heap
        other.0.priority.cmp(&self.0.priority)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Board, Slide};
    use std::collections::BinaryHeap;

    #[test]
    fn test_root_and_child_moves() {
        let goal = Board::goal(3).unwrap();
        let start = goal.slide(Slide::Up).unwrap().slide(Slide::Left).unwrap();

        let root = SearchNode::root(start.clone());
        assert_eq!(root.moves(), 0);
        assert_eq!(root.priority(), 2);
        assert!(root.previous().is_none());

        let next = SearchNode::child(start.slide(Slide::Right).unwrap(), &root);
        assert_eq!(next.moves(), 1);
        assert_eq!(next.priority(), 1 + 1);
        // the parent is untouched
        assert_eq!(root.moves(), 0);

        let last = SearchNode::child(goal.clone(), &next);
        assert_eq!(last.moves(), 2);
        assert_eq!(last.priority(), 2);
        assert_eq!(last.path(), vec![start, next.state().clone(), goal]);
    }

    #[test]
    fn test_chain_decreases_by_one() {
        let mut node = SearchNode::root(Board::goal(2).unwrap());
        for _ in 0..5 {
            let next = node.state().neighbors()[0].clone();
            node = SearchNode::child(next, &node);
        }
        let mut expected = node.moves();
        let mut current = Some(&node);
        while let Some(n) = current {
            assert_eq!(n.moves(), expected);
            expected = expected.wrapping_sub(1);
            current = n.previous();
        }
        assert_eq!(node.path().len(), 6);
    }

    #[test]
    fn test_frontier_pops_lowest_priority() {
        let goal = Board::goal(3).unwrap();
        let far = goal
            .slide(Slide::Up)
            .and_then(|b| b.slide(Slide::Up))
            .and_then(|b| b.slide(Slide::Left))
            .unwrap();
        let near = goal.slide(Slide::Left).unwrap();

        let mut heap = BinaryHeap::new();
        heap.push(Frontier(SearchNode::root(far)));
        heap.push(Frontier(SearchNode::root(goal.clone())));
        heap.push(Frontier(SearchNode::root(near)));

        let order: Vec<usize> = std::iter::from_fn(|| heap.pop().map(|f| f.0.priority())).collect();
        assert_eq!(order, vec![0, 1, 3]);
    }
}
