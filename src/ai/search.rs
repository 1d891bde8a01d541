//! Per-decision search driver

use std::time::Instant;

use anyhow::Result;
use rand::prelude::*;

use crate::core::{Action, DecisionTimer, FromIndex, GameConfig, GameState};
use crate::heuristics::Evaluator;
use crate::utils::make_rng;

use super::backprop::back_up;
use super::mcts::{NodeId, Tree};
use super::params::{SearchParams, StopMode};
use super::rollout;

/// Time-bounded searches keep at least this many milliseconds in reserve
const SAFETY_MARGIN_MS: f64 = 5.0;

#[derive(Debug, Clone, Copy)]
pub struct SearchResult {
    /// Recommended action index, always within `[0, num_actions)`
    pub action: usize,
    pub iterations: u32,
    pub fm_calls: u32,
    pub nodes: usize,
}

/// One decision's search. Owns a private copy of the root state, the tree
/// arena, the bound evaluator and the sequential generator; everything is
/// dropped when the decision returns.
pub struct Search<'a> {
    config: &'a GameConfig,
    params: SearchParams,
    root_state: GameState,
    evaluator: Evaluator,
    tree: Tree,
    rng: StdRng,
    iterations: u32,
    fm_calls: u32,
}

impl<'a> Search<'a> {
    pub fn new(config: &'a GameConfig, root_state: GameState, params: SearchParams) -> Result<Self> {
        params.validate()?;
        let evaluator = Evaluator::bind(params.evaluator, config, &root_state);
        let tree = Tree::new(root_state.num_actions());

        Ok(Self {
            config,
            params,
            root_state,
            evaluator,
            tree,
            rng: make_rng(params.seed),
            iterations: 0,
            fm_calls: 0,
        })
    }

    /// Run select/expand, rollout, backup iterations until the configured
    /// budget is exhausted, then read the recommendation off the root.
    pub fn run(&mut self, timer: &DecisionTimer) -> SearchResult {
        let mut acc_iter_ms = 0.0;

        loop {
            let iter_start = Instant::now();

            let mut state = self.root_state.clone();
            let leaf = self.tree_policy(&mut state);
            let start_depth = self.tree.node(leaf).depth;
            let result = rollout::run(
                self.config,
                &mut state,
                start_depth,
                &self.params,
                &self.evaluator,
                &mut self.rng,
            );
            back_up(
                &mut self.tree,
                leaf,
                result,
                self.params.backprop,
                self.params.discount,
            );

            self.iterations += 1;
            if self.should_stop(timer, iter_start, &mut acc_iter_ms) {
                break;
            }
        }

        let action = self.recommended_action();
        log::debug!(
            "search done: {} iterations, {} nodes, action {}",
            self.iterations,
            self.tree.len(),
            action
        );

        SearchResult {
            action,
            iterations: self.iterations,
            fm_calls: self.fm_calls,
            nodes: self.tree.len(),
        }
    }

    /// Budget check, polled once per completed iteration. Cooperative: a
    /// slow iteration can overshoot a time budget by its own duration.
    fn should_stop(&mut self, timer: &DecisionTimer, iter_start: Instant, acc_iter_ms: &mut f64) -> bool {
        match self.params.stop {
            StopMode::Time => {
                *acc_iter_ms += iter_start.elapsed().as_secs_f64() * 1000.0;
                let avg = *acc_iter_ms / self.iterations as f64;
                let remaining = timer.remaining_millis();
                if remaining.is_nan() {
                    log::warn!("timer returned an implausible reading; stopping search");
                    return true;
                }
                remaining <= (2.0 * avg).max(SAFETY_MARGIN_MS)
            }
            StopMode::Iterations { limit } => self.iterations >= limit,
            StopMode::FmCalls { limit } => {
                self.fm_calls += self.params.rollout_depth;
                self.fm_calls + self.params.rollout_depth > limit
            }
        }
    }

    /// Descend the expanded part of the tree, advancing the simulated
    /// state along the way, until a node gets a new child or the depth
    /// limit / a terminal state is reached.
    fn tree_policy(&mut self, state: &mut GameState) -> NodeId {
        let mut cur = Tree::ROOT;

        while !state.is_terminal(self.config)
            && self.tree.node(cur).depth < self.params.rollout_depth
        {
            if !self.tree.node(cur).is_fully_expanded() {
                return self.expand(cur, state);
            }
            cur = self.select(cur, state);
        }

        cur
    }

    /// Create one new child under `id` for a uniformly random unexpanded
    /// action
    fn expand(&mut self, id: NodeId, state: &mut GameState) -> NodeId {
        let open = self.tree.node(id).unexpanded();
        debug_assert!(!open.is_empty());
        let action_idx = open[self.rng.random_range(0..open.len())];

        let action = Action::from_index(action_idx).expect("child slots match action indices");
        rollout::roll(self.config, state, action, &mut self.rng);

        self.tree.add_child(id, action_idx, self.fm_calls)
    }

    fn select(&mut self, id: NodeId, state: &mut GameState) -> NodeId {
        let chosen = self.tree.select_child(
            id,
            self.params.k,
            self.params.bias,
            self.params.eps,
            &mut self.rng,
        );

        let action_idx = self
            .tree
            .node(chosen)
            .action
            .expect("non-root nodes record their action");
        let action = Action::from_index(action_idx).expect("child slots match action indices");
        rollout::roll(self.config, state, action, &mut self.rng);

        chosen
    }

    fn recommended_action(&mut self) -> usize {
        self.tree
            .most_visited_action(self.params.eps, &mut self.rng)
    }

    /// Read-only view of the finished tree, used by tests and diagnostics
    pub fn tree(&self) -> &Tree {
        &self.tree
    }
}
