//! Search tree arena and per-node statistics

use rand::prelude::*;

use crate::core::{noise, normalise};

pub type NodeId = usize;

/// One node of the search tree. Children sit in fixed slots, one per
/// action index; a filled slot was created by applying that action.
#[derive(Debug, Clone)]
pub struct Node {
    pub parent: Option<NodeId>,
    pub children: Vec<Option<NodeId>>,
    pub visits: u32,
    pub value: f64,
    /// Min and max of every value ever backed through this node
    pub bounds: [f64; 2],
    pub depth: u32,
    /// Action index that led from the parent to this node
    pub action: Option<usize>,
    /// Forward-model-call counter snapshot at creation
    pub fm_calls: u32,
}

impl Node {
    fn new(
        parent: Option<NodeId>,
        depth: u32,
        action: Option<usize>,
        num_actions: usize,
        fm_calls: u32,
    ) -> Self {
        Self {
            parent,
            children: vec![None; num_actions],
            visits: 0,
            value: 0.0,
            bounds: [f64::MAX, -f64::MAX],
            depth,
            action,
            fm_calls,
        }
    }

    pub fn mean(&self, eps: f64) -> f64 {
        self.value / (self.visits as f64 + eps)
    }

    pub fn is_fully_expanded(&self) -> bool {
        self.children.iter().all(|slot| slot.is_some())
    }

    /// Action indices with no child yet
    pub fn unexpanded(&self) -> Vec<usize> {
        self.children
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.is_none())
            .map(|(i, _)| i)
            .collect()
    }

    /// Fold one backed-up contribution into the statistics
    pub fn absorb(&mut self, contribution: f64) {
        self.visits += 1;
        self.value += contribution;
        self.bounds[0] = self.bounds[0].min(contribution);
        self.bounds[1] = self.bounds[1].max(contribution);
    }
}

/// Arena owning every node of one decision's tree. Ids are indices into
/// the arena; parents are non-owning back-references. The whole arena is
/// dropped when the decision returns.
#[derive(Debug)]
pub struct Tree {
    nodes: Vec<Node>,
    num_actions: usize,
}

impl Tree {
    pub const ROOT: NodeId = 0;

    pub fn new(num_actions: usize) -> Self {
        Self {
            nodes: vec![Node::new(None, 0, None, num_actions, 0)],
            num_actions,
        }
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Create the child reached by `action` from `parent`. The slot must
    /// be empty: expansion never replaces an existing child.
    pub fn add_child(&mut self, parent: NodeId, action: usize, fm_calls: u32) -> NodeId {
        debug_assert!(self.nodes[parent].children[action].is_none());
        let depth = self.nodes[parent].depth + 1;
        let id = self.nodes.len();
        self.nodes
            .push(Node::new(Some(parent), depth, Some(action), self.num_actions, fm_calls));
        self.nodes[parent].children[action] = Some(id);
        id
    }

    /// UCB descent step: pick the child maximising the normalised mean
    /// plus exploration bonus plus progressive bias, with a bounded random
    /// perturbation breaking exact ties.
    ///
    /// Panics if the node has no children; the caller only selects on
    /// fully expanded nodes, so an empty candidate set is a broken
    /// invariant, not a recoverable state.
    pub fn select_child(
        &self,
        id: NodeId,
        k: f64,
        bias: f64,
        eps: f64,
        rng: &mut impl Rng,
    ) -> NodeId {
        let parent = self.node(id);
        let [lo, hi] = parent.bounds;
        let ln_n = ((parent.visits + 1) as f64).ln();

        let mut selected = None;
        let mut best_score = f64::NEG_INFINITY;

        for child_id in parent.children.iter().flatten() {
            let child = self.node(*child_id);
            let visits = child.visits as f64;

            let exploit = normalise(child.mean(eps), lo, hi);
            let explore = k * (ln_n / (visits + eps)).sqrt();
            let progressive = bias / (1.0 + visits);
            let score = noise(exploit + explore + progressive, eps, rng.random());

            if score > best_score {
                best_score = score;
                selected = Some(*child_id);
            }
        }

        selected.unwrap_or_else(|| {
            panic!(
                "selection on a childless node: best score {}, bounds [{}, {}]",
                best_score, lo, hi
            )
        })
    }

    /// Recommend the most-visited root action, eps-noise breaking exact
    /// ties. When every expanded child has identical visits the mean value
    /// decides instead; with no children at all, action 0.
    pub fn most_visited_action(&self, eps: f64, rng: &mut impl Rng) -> usize {
        let root = self.node(Self::ROOT);

        let mut selected = None;
        let mut best_score = f64::NEG_INFINITY;
        let mut first_visits = None;
        let mut all_equal = true;

        for (action, slot) in root.children.iter().enumerate() {
            let Some(child_id) = slot else { continue };
            let child = self.node(*child_id);

            match first_visits {
                None => first_visits = Some(child.visits),
                Some(v) if v != child.visits => all_equal = false,
                Some(_) => {}
            }

            let score = noise(child.visits as f64, eps, rng.random());
            if score > best_score {
                best_score = score;
                selected = Some(action);
            }
        }

        match selected {
            None => 0,
            Some(_) if all_equal => self.best_mean_action(eps, rng),
            Some(action) => action,
        }
    }

    /// Highest-mean root action, same tie-break noise
    fn best_mean_action(&self, eps: f64, rng: &mut impl Rng) -> usize {
        let root = self.node(Self::ROOT);

        let mut selected = None;
        let mut best_score = f64::NEG_INFINITY;

        for (action, slot) in root.children.iter().enumerate() {
            let Some(child_id) = slot else { continue };
            let child = self.node(*child_id);

            let score = noise(child.mean(eps), eps, rng.random());
            if score > best_score {
                best_score = score;
                selected = Some(action);
            }
        }

        selected.unwrap_or(0)
    }
}
