use rayon::prelude::*;

use super::search::{search, search_with_deadline, Deadline, SearchError, SearchOutcome};
use super::Graph;
use crate::models::ItemId;

/// Number of recommendations kept when the caller does not say otherwise
pub const DEFAULT_TOP_K: usize = 12;

/// A reachable item and its path cost from the start item
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankedItem {
    pub id: ItemId,
    pub cost: f64,
}

#[derive(Debug, Clone)]
pub struct RankOptions {
    pub top_k: usize,
    pub deadline: Deadline,
    /// Run the per-goal searches on the rayon pool
    pub parallel: bool,
}

impl Default for RankOptions {
    fn default() -> Self {
        Self {
            top_k: DEFAULT_TOP_K,
            deadline: Deadline::none(),
            parallel: false,
        }
    }
}

/// Ranks every other node of `graph` by A* cost from `start`, sequentially.
pub fn rank(graph: &Graph, start: ItemId, top_k: usize) -> Vec<RankedItem> {
    let outcomes = goals(graph, start)
        .into_iter()
        .map(|goal| (goal, search(graph, start, goal)))
        .collect();

    assemble(outcomes, top_k)
}

/// Ranks every other node of `graph` by A* cost from `start`.
///
/// Unreachable nodes are dropped. Equal costs keep graph iteration order, and
/// the parallel path produces exactly the sequential ordering.
pub fn rank_from(
    graph: &Graph,
    start: ItemId,
    options: &RankOptions,
) -> Result<Vec<RankedItem>, SearchError> {
    let goals = goals(graph, start);
    let run = |goal: &ItemId| {
        search_with_deadline(graph, start, *goal, &options.deadline).map(|o| (*goal, o))
    };

    let outcomes = if options.parallel {
        goals.par_iter().map(run).collect::<Result<Vec<_>, _>>()?
    } else {
        goals.iter().map(run).collect::<Result<Vec<_>, _>>()?
    };

    Ok(assemble(outcomes, options.top_k))
}

fn goals(graph: &Graph, start: ItemId) -> Vec<ItemId> {
    graph.ids().filter(|&id| id != start).collect()
}

fn assemble(outcomes: Vec<(ItemId, SearchOutcome)>, top_k: usize) -> Vec<RankedItem> {
    let mut ranked: Vec<RankedItem> = outcomes
        .into_iter()
        .filter(|(_, outcome)| outcome.is_found())
        .map(|(id, outcome)| RankedItem {
            id,
            cost: outcome.cost,
        })
        .collect();

    // stable: ties stay in iteration order
    ranked.sort_by(|a, b| a.cost.total_cmp(&b.cost));
    ranked.truncate(top_k);
    ranked
}
