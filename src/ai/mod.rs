//! Monte-Carlo tree search engine

pub mod backprop;
pub mod mcts;
pub mod params;
pub mod rollout;
pub mod search;

pub use mcts::{Node, NodeId, Tree};
pub use params::{BackpropKind, RolloutKind, SearchParams, StopMode};
pub use search::{Search, SearchResult};
