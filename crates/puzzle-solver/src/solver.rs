//! A* search with a twin-board unsolvability oracle.
//!
//! The solver races two best-first searches in lockstep: one from the
//! initial state and one from its twin. Exactly one of the pair can reach the
//! goal, so whichever lane gets there first decides solvability without
//! exhausting the state space.

use std::cell::OnceCell;
use std::collections::hash_map::Entry;
use std::collections::BinaryHeap;
use std::rc::Rc;
use std::time::{Duration, Instant};

use rustc_hash::FxHashMap;
use serde::Serialize;
use tracing::{debug, info};

use crate::config::{DuplicatePolicy, SolverConfig};
use crate::node::{Frontier, SearchNode};
use crate::state::PuzzleState;

/// Why the search stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Termination {
    /// The main lane popped a goal state
    Solved,
    /// The twin lane popped a goal state first
    TwinSolved,
    /// The main frontier ran dry
    MainExhausted,
    /// The twin frontier ran dry before the main lane finished
    TwinExhausted,
    /// Wall-clock ceiling reached
    TimedOut,
    /// Expansion budget reached
    ExpansionLimit,
}

impl Termination {
    pub fn verdict(self) -> Verdict {
        match self {
            Termination::Solved => Verdict::Solvable,
            Termination::TwinSolved | Termination::MainExhausted => Verdict::Unsolvable,
            Termination::TwinExhausted | Termination::TimedOut | Termination::ExpansionLimit => {
                Verdict::Inconclusive
            }
        }
    }
}

/// Outcome of a search. `Inconclusive` means the solver gave up without a
/// proof either way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Solvable,
    Unsolvable,
    Inconclusive,
}

/// Counters for one search lane
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LaneStats {
    /// Nodes whose successors were generated
    pub expanded: usize,
    /// Nodes pushed onto the frontier, including the root
    pub enqueued: usize,
    /// Superseded frontier entries discarded on pop
    pub stale_skipped: usize,
    pub peak_frontier: usize,
}

/// Counters for a whole run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchStats {
    pub main: LaneStats,
    pub twin: LaneStats,
    pub iterations: usize,
    pub elapsed: Duration,
}

/// One best-first search: a frontier plus the best known move count for
/// every signature ever enqueued.
struct Lane<S: PuzzleState> {
    frontier: BinaryHeap<Frontier<S>>,
    seen: FxHashMap<S::Signature, usize>,
    policy: DuplicatePolicy,
    stats: LaneStats,
}

impl<S: PuzzleState> Lane<S> {
    fn new(start: S, policy: DuplicatePolicy) -> Self {
        let mut seen = FxHashMap::default();
        seen.insert(start.signature(), 0);

        let mut frontier = BinaryHeap::new();
        frontier.push(Frontier(SearchNode::root(start)));

        Self {
            frontier,
            seen,
            policy,
            stats: LaneStats {
                enqueued: 1,
                peak_frontier: 1,
                ..LaneStats::default()
            },
        }
    }

    /// Remove the lowest-priority live node.
    fn pop(&mut self) -> Option<Rc<SearchNode<S>>> {
        loop {
            let Frontier(node) = self.frontier.pop()?;
            if self.policy == DuplicatePolicy::Reopen && self.is_stale(&node) {
                self.stats.stale_skipped += 1;
                continue;
            }
            return Some(node);
        }
    }

    fn is_stale(&self, node: &SearchNode<S>) -> bool {
        self.seen
            .get(&node.state().signature())
            .is_some_and(|&best| best < node.moves())
    }

    /// Push every successor of `node` that the duplicate policy admits.
    fn expand(&mut self, node: &Rc<SearchNode<S>>) {
        self.stats.expanded += 1;
        let moves = node.moves() + 1;

        for next in node.state().successors() {
            match self.seen.entry(next.signature()) {
                Entry::Vacant(entry) => {
                    entry.insert(moves);
                }
                Entry::Occupied(mut entry) => match self.policy {
                    DuplicatePolicy::FirstSeen => continue,
                    DuplicatePolicy::Reopen => {
                        if *entry.get() <= moves {
                            continue;
                        }
                        entry.insert(moves);
                    }
                },
            }
            self.frontier.push(Frontier(SearchNode::child(next, node)));
            self.stats.enqueued += 1;
        }

        self.stats.peak_frontier = self.stats.peak_frontier.max(self.frontier.len());
    }
}

/// Solves one puzzle. The search runs to completion in the constructor; the
/// accessors only read the result.
#[derive(Debug)]
pub struct Solver<S: PuzzleState> {
    termination: Termination,
    goal: Option<Rc<SearchNode<S>>>,
    solution: OnceCell<Vec<S>>,
    stats: SearchStats,
}

impl<S: PuzzleState> Solver<S> {
    /// Solve with [`SolverConfig::default`].
    pub fn new(initial: S) -> Self {
        Self::with_config(initial, &SolverConfig::default())
    }

    pub fn with_config(initial: S, config: &SolverConfig) -> Self {
        let start_time = Instant::now();
        let time_limit = config.time_limit();

        info!(
            policy = ?config.duplicate_policy,
            time_limit = ?time_limit,
            max_expansions = ?config.max_expansions,
            "Starting search"
        );

        let twin = initial.twin();
        let mut main = Lane::new(initial, config.duplicate_policy);
        let mut shadow = Lane::new(twin, config.duplicate_policy);
        let mut iterations = 0;

        let (termination, goal) = loop {
            iterations += 1;

            let Some(node) = main.pop() else {
                break (Termination::MainExhausted, None);
            };
            if node.state().is_goal() {
                break (Termination::Solved, Some(node));
            }

            let Some(twin_node) = shadow.pop() else {
                break (Termination::TwinExhausted, None);
            };
            if twin_node.state().is_goal() {
                break (Termination::TwinSolved, None);
            }

            main.expand(&node);
            shadow.expand(&twin_node);

            if time_limit.is_some_and(|limit| start_time.elapsed() >= limit) {
                break (Termination::TimedOut, None);
            }
            if config
                .max_expansions
                .is_some_and(|limit| main.stats.expanded >= limit)
            {
                break (Termination::ExpansionLimit, None);
            }

            if config.progress_interval > 0 && iterations % config.progress_interval == 0 {
                debug!(
                    iterations,
                    frontier = main.frontier.len(),
                    twin_frontier = shadow.frontier.len(),
                    best_priority = node.priority(),
                    elapsed_ms = start_time.elapsed().as_millis() as u64,
                    "Search progress"
                );
            }
        };

        let stats = SearchStats {
            main: main.stats,
            twin: shadow.stats,
            iterations,
            elapsed: start_time.elapsed(),
        };

        info!(
            ?termination,
            verdict = ?termination.verdict(),
            moves = ?goal.as_ref().map(|n| n.moves()),
            expanded = stats.main.expanded,
            twin_expanded = stats.twin.expanded,
            elapsed_ms = stats.elapsed.as_millis() as u64,
            "Search finished"
        );

        Self {
            termination,
            goal,
            solution: OnceCell::new(),
            stats,
        }
    }

    /// True only when a solution was actually found.
    pub fn is_solvable(&self) -> bool {
        self.termination == Termination::Solved
    }

    pub fn verdict(&self) -> Verdict {
        self.termination.verdict()
    }

    pub fn termination(&self) -> Termination {
        self.termination
    }

    /// Minimum number of moves, or `None` if no solution was found.
    pub fn moves(&self) -> Option<usize> {
        self.solution().map(|path| path.len() - 1)
    }

    /// States from the initial board to the goal, inclusive, or `None` if no
    /// solution was found. Extracted on first call and cached.
    pub fn solution(&self) -> Option<&[S]> {
        let goal = self.goal.as_ref()?;
        Some(self.solution.get_or_init(|| goal.path()))
    }

    pub fn stats(&self) -> &SearchStats {
        &self.stats
    }
}
