//! Search configuration

use anyhow::{ensure, Result};

use crate::heuristics::EvaluatorKind;

/// When the iteration loop stops. Exactly one mode is active per search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StopMode {
    /// Wall-clock bounded; the caller supplies a started timer
    Time,
    /// Fixed number of completed iterations
    Iterations { limit: u32 },
    /// Forward-model-call cap, counted in rollout horizons
    FmCalls { limit: u32 },
}

/// Play-out strategy used from a tree leaf to the horizon
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RolloutKind {
    SafeRandom,
    OneStepLookahead,
    EvaluatedRandom,
}

/// Update rule applied on the leaf-to-root walk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackpropKind {
    Plain,
    Discounted,
}

/// Full configuration of one search instance. Every field is explicit;
/// there is no default set.
#[derive(Debug, Clone, Copy)]
pub struct SearchParams {
    /// UCB exploration constant
    pub k: f64,
    /// Progressive-bias constant, decaying with child visits
    pub bias: f64,
    /// Depth limit shared by the tree descent and the rollouts
    pub rollout_depth: u32,
    /// Per-depth decay factor for the discounted backup
    pub discount: f64,
    /// Tie-break perturbation magnitude, also the division guard
    pub eps: f64,
    pub stop: StopMode,
    pub rollout: RolloutKind,
    pub backprop: BackpropKind,
    pub evaluator: EvaluatorKind,
    pub seed: u64,
}

impl SearchParams {
    pub fn validate(&self) -> Result<()> {
        ensure!(self.k >= 0.0, "Exploration constant must be non-negative");
        ensure!(self.bias >= 0.0, "Bias constant must be non-negative");
        ensure!(
            self.eps > 0.0 && self.eps < 1.0,
            "Tie-break epsilon must be in (0, 1)"
        );
        ensure!(
            self.rollout_depth >= 1,
            "Rollout depth must be at least one"
        );
        if self.backprop == BackpropKind::Discounted {
            ensure!(
                self.discount > 0.0 && self.discount <= 1.0,
                "Discount factor must be in (0, 1]"
            );
        }
        match self.stop {
            StopMode::Time => {}
            StopMode::Iterations { limit } => {
                ensure!(limit >= 1, "Iteration limit must be positive")
            }
            StopMode::FmCalls { limit } => ensure!(
                limit >= self.rollout_depth,
                "Simulation-call cap must cover at least one rollout horizon"
            ),
        }
        Ok(())
    }
}
