use ordered_float::OrderedFloat;
use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use super::{heuristic, Graph};
use crate::models::ItemId;

/// Reasons a bounded search stops before reaching a verdict
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchError {
    #[error("search deadline exceeded")]
    DeadlineExceeded,

    #[error("search cancelled")]
    Cancelled,
}

/// Expiry instant plus a cancellation flag shared by every clone
#[derive(Debug, Clone, Default)]
pub struct Deadline {
    expires_at: Option<Instant>,
    cancelled: Arc<AtomicBool>,
}

impl Deadline {
    /// A deadline that never expires (it can still be cancelled)
    pub fn none() -> Self {
        Self::default()
    }

    pub fn after(timeout: Duration) -> Self {
        Self {
            expires_at: Some(Instant::now() + timeout),
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Cancels every search holding a clone of this deadline
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    pub fn check(&self) -> Result<(), SearchError> {
        if self.cancelled.load(Ordering::Relaxed) {
            return Err(SearchError::Cancelled);
        }
        match self.expires_at {
            Some(at) if Instant::now() >= at => Err(SearchError::DeadlineExceeded),
            _ => Ok(()),
        }
    }
}

/// Result of one start → goal search
#[derive(Debug, Clone, PartialEq)]
pub struct SearchOutcome {
    /// Ids from start to goal inclusive, or `None` when no path exists
    pub path: Option<Vec<ItemId>>,
    /// Total edge cost of `path`, `f64::INFINITY` when there is none
    pub cost: f64,
}

impl SearchOutcome {
    pub fn not_found() -> Self {
        Self {
            path: None,
            cost: f64::INFINITY,
        }
    }

    pub fn is_found(&self) -> bool {
        self.path.is_some()
    }
}

/// Min-priority frontier keyed by (f-score, insertion sequence, node id).
///
/// The sequence number makes equal f-scores pop in discovery order.
#[derive(Default)]
struct Frontier {
    heap: BinaryHeap<Reverse<(OrderedFloat<f64>, u64, ItemId)>>,
    next_seq: u64,
}

impl Frontier {
    fn push(&mut self, priority: f64, node: ItemId) {
        self.heap
            .push(Reverse((OrderedFloat(priority), self.next_seq, node)));
        self.next_seq += 1;
    }

    fn pop(&mut self) -> Option<ItemId> {
        self.heap.pop().map(|Reverse((_, _, node))| node)
    }
}

/// A* search from `start` to `goal`.
///
/// Unknown ids and unreachable goals both yield [`SearchOutcome::not_found`].
pub fn search(graph: &Graph, start: ItemId, goal: ItemId) -> SearchOutcome {
    match search_with_deadline(graph, start, goal, &Deadline::none()) {
        Ok(outcome) => outcome,
        // an unshared Deadline::none() is never cancelled nor expired
        Err(_) => SearchOutcome::not_found(),
    }
}

/// A* search that checks `deadline` before expanding each frontier entry.
///
/// Entries made stale by a later improvement stay in the frontier; when they
/// are popped their neighbors fail the strict `tentative < g` test, so they
/// change nothing.
pub fn search_with_deadline(
    graph: &Graph,
    start: ItemId,
    goal: ItemId,
    deadline: &Deadline,
) -> Result<SearchOutcome, SearchError> {
    let Some(goal_node) = graph.get(goal) else {
        return Ok(SearchOutcome::not_found());
    };
    if !graph.contains(start) {
        return Ok(SearchOutcome::not_found());
    }

    let mut g_score: HashMap<ItemId, f64> = HashMap::new();
    let mut came_from: HashMap<ItemId, ItemId> = HashMap::new();
    let mut frontier = Frontier::default();

    g_score.insert(start, 0.0);
    frontier.push(0.0, start);

    while let Some(current) = frontier.pop() {
        deadline.check()?;

        let current_g = g_score.get(&current).copied().unwrap_or(f64::INFINITY);

        if current == goal {
            return Ok(SearchOutcome {
                path: Some(reconstruct_path(&came_from, goal)),
                cost: current_g,
            });
        }

        let Some(node) = graph.get(current) else {
            continue;
        };

        for edge in &node.neighbors {
            let tentative = current_g + edge.weight;
            let known = g_score.get(&edge.to).copied().unwrap_or(f64::INFINITY);
            if tentative >= known {
                continue;
            }

            let Some(neighbor) = graph.get(edge.to) else {
                continue;
            };
            came_from.insert(edge.to, current);
            g_score.insert(edge.to, tentative);
            frontier.push(tentative + heuristic(neighbor, goal_node), edge.to);
        }
    }

    Ok(SearchOutcome::not_found())
}

fn reconstruct_path(came_from: &HashMap<ItemId, ItemId>, goal: ItemId) -> Vec<ItemId> {
    let mut path = vec![goal];
    let mut current = goal;
    while let Some(&previous) = came_from.get(&current) {
        path.push(previous);
        current = previous;
    }
    path.reverse();
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::build_graph;
    use crate::models::ItemRecord;

    const A: ItemId = 1;
    const B: ItemId = 2;
    const C: ItemId = 3;
    const D: ItemId = 4;

    // A-B share 2 (0.5), B-C share 1 (1.0), A-C share none, D is isolated
    fn chain() -> Graph {
        build_graph(&[
            ItemRecord::new(A, "A").with_categories([10, 20]),
            ItemRecord::new(B, "B").with_categories([10, 20, 30]),
            ItemRecord::new(C, "C").with_categories([30]),
            ItemRecord::new(D, "D").with_categories([99]),
        ])
    }

    #[test]
    fn test_finds_path_through_intermediate_node() {
        let outcome = search(&chain(), A, C);

        assert_eq!(outcome.path, Some(vec![A, B, C]));
        assert_eq!(outcome.cost, 1.5);
    }

    #[test]
    fn test_unreachable_goal() {
        let outcome = search(&chain(), A, D);

        assert_eq!(outcome.path, None);
        assert!(outcome.cost.is_infinite());
        assert!(!outcome.is_found());
    }

    #[test]
    fn test_unknown_ids() {
        let graph = chain();

        assert_eq!(search(&graph, A, 9999), SearchOutcome::not_found());
        assert_eq!(search(&graph, 9999, A), SearchOutcome::not_found());
    }

    #[test]
    fn test_self_distance_is_zero() {
        let outcome = search(&chain(), A, A);

        assert_eq!(outcome.path, Some(vec![A]));
        assert_eq!(outcome.cost, 0.0);
    }

    #[test]
    fn test_repeated_searches_are_identical() {
        let graph = chain();
        let first = search(&graph, C, A);

        for _ in 0..10 {
            assert_eq!(search(&graph, C, A), first);
        }
        assert_eq!(first.path, Some(vec![C, B, A]));
    }

    #[test]
    fn test_prefers_cheaper_multi_hop_path() {
        // A-Z direct share 1 (1.0); A-M share 3 (1/3), M-Z share 3 (1/3)
        let graph = build_graph(&[
            ItemRecord::new(A, "A").with_categories([1, 2, 3, 9]),
            ItemRecord::new(B, "M").with_categories([1, 2, 3, 4, 5, 6]),
            ItemRecord::new(C, "Z").with_categories([4, 5, 6, 9]),
        ]);
        let outcome = search(&graph, A, C);

        assert_eq!(outcome.path, Some(vec![A, B, C]));
        assert!((outcome.cost - 2.0 / 3.0).abs() < 1e-12);
    }

    fn diamond(order: &[ItemId]) -> Graph {
        // B and C are interchangeable routes from A to D
        let records: Vec<ItemRecord> = order
            .iter()
            .map(|&id| match id {
                A => ItemRecord::new(A, "A").with_categories([1, 2]),
                B => ItemRecord::new(B, "B").with_categories([1, 3]),
                C => ItemRecord::new(C, "C").with_categories([2, 3]),
                _ => ItemRecord::new(D, "D").with_categories([3]),
            })
            .collect();
        build_graph(&records)
    }

    #[test]
    fn test_equal_priorities_resolve_in_discovery_order() {
        let via_b = search(&diamond(&[A, B, C, D]), A, D);
        assert_eq!(via_b.path, Some(vec![A, B, D]));
        assert_eq!(via_b.cost, 2.0);

        let via_c = search(&diamond(&[A, C, B, D]), A, D);
        assert_eq!(via_c.path, Some(vec![A, C, D]));
        assert_eq!(via_c.cost, 2.0);
    }

    #[test]
    fn test_cancelled_deadline_stops_search() {
        let deadline = Deadline::none();
        deadline.cancel();

        let result = search_with_deadline(&chain(), A, C, &deadline);
        assert_eq!(result, Err(SearchError::Cancelled));
    }

    #[test]
    fn test_cancel_is_shared_between_clones() {
        let deadline = Deadline::after(Duration::from_secs(60));
        let clone = deadline.clone();
        clone.cancel();

        assert_eq!(deadline.check(), Err(SearchError::Cancelled));
    }

    #[test]
    fn test_expired_deadline_stops_search() {
        let deadline = Deadline::after(Duration::ZERO);

        let result = search_with_deadline(&chain(), A, C, &deadline);
        assert_eq!(result, Err(SearchError::DeadlineExceeded));
    }

    #[test]
    fn test_generous_deadline_matches_unbounded_search() {
        let graph = chain();
        let deadline = Deadline::after(Duration::from_secs(60));

        let bounded = search_with_deadline(&graph, A, C, &deadline).unwrap();
        assert_eq!(bounded, search(&graph, A, C));
    }

    #[test]
    fn test_unknown_id_is_not_an_error_even_when_expired() {
        let deadline = Deadline::after(Duration::ZERO);
        let result = search_with_deadline(&chain(), A, 9999, &deadline);

        assert_eq!(result, Ok(SearchOutcome::not_found()));
    }
}
