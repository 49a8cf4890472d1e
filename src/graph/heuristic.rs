use super::Node;

/// Flat cost added when both movies name a director and the names differ.
/// Blank names count as unknown.
pub const DIRECTOR_MISMATCH_PENALTY: f64 = 0.5;

/// Estimated remaining cost from `node` to `goal`.
///
/// `1 / (shared + 1)` for genre overlap plus the director penalty. This can
/// overestimate the true remaining cost, so searches guided by it are
/// best-effort rather than guaranteed optimal.
pub fn heuristic(node: &Node, goal: &Node) -> f64 {
    let shared = node.shared_categories(goal);
    let genre_cost = 1.0 / (shared as f64 + 1.0);

    let penalty = match (&node.director, &goal.director) {
        (Some(a), Some(b)) if !a.is_empty() && !b.is_empty() && a != b => {
            DIRECTOR_MISMATCH_PENALTY
        }
        _ => 0.0,
    };

    genre_cost + penalty
}
