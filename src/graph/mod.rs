//! Similarity graph and best-first ranking.
//!
//! Movies become nodes linked by shared genres; candidates are ranked by A*
//! path cost from the searched movie.

pub mod builder;
pub mod heuristic;
pub mod ranking;
pub mod search;

pub use builder::{build_graph, Edge, Graph, Node};
pub use heuristic::heuristic;
pub use ranking::{rank, rank_from, RankOptions, RankedItem, DEFAULT_TOP_K};
pub use search::{search, search_with_deadline, Deadline, SearchError, SearchOutcome};
