use std::collections::{BTreeSet, HashMap};

use crate::models::{CategoryId, ItemId, ItemRecord};

/// Weighted link to a neighboring node
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    pub to: ItemId,
    pub weight: f64,
}

/// Graph vertex wrapping one item record
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub id: ItemId,
    pub title: String,
    pub categories: BTreeSet<CategoryId>,
    pub director: Option<String>,
    pub neighbors: Vec<Edge>,
}

impl Node {
    fn from_record(record: &ItemRecord) -> Self {
        Self {
            id: record.id,
            title: record.title.clone(),
            categories: record.categories.clone(),
            director: record.director.clone(),
            neighbors: Vec::new(),
        }
    }

    /// Number of categories this node has in common with `other`
    pub fn shared_categories(&self, other: &Node) -> usize {
        self.categories.intersection(&other.categories).count()
    }
}

/// Undirected similarity graph keyed by item id
///
/// Nodes keep the order in which their ids were first seen; that order is the
/// iteration order used when ranking.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    nodes: Vec<Node>,
    index: HashMap<ItemId, usize>,
}

impl Graph {
    pub fn get(&self, id: ItemId) -> Option<&Node> {
        self.index.get(&id).map(|&i| &self.nodes[i])
    }

    pub fn contains(&self, id: ItemId) -> bool {
        self.index.contains_key(&id)
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter()
    }

    pub fn ids(&self) -> impl Iterator<Item = ItemId> + '_ {
        self.nodes.iter().map(|n| n.id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn edge_count(&self) -> usize {
        self.nodes.iter().map(|n| n.neighbors.len()).sum::<usize>() / 2
    }

    /// Weight of the direct edge `from -> to`, if any
    pub fn weight(&self, from: ItemId, to: ItemId) -> Option<f64> {
        self.get(from)?
            .neighbors
            .iter()
            .find(|edge| edge.to == to)
            .map(|edge| edge.weight)
    }
}

/// Builds the similarity graph for one request.
///
/// Every unordered pair of distinct items is compared, so construction is
/// O(n²) in the number of items. That is fine for the few dozen movies a
/// recommendation page carries; larger catalogs should bucket items by
/// category before pairing.
///
/// Items sharing `k >= 1` categories are linked in both directions with
/// weight `1 / k`. Items sharing nothing stay unlinked. When two records carry
/// the same id the later one wins.
pub fn build_graph(items: &[ItemRecord]) -> Graph {
    let mut graph = Graph::default();

    for record in items {
        let node = Node::from_record(record);
        match graph.index.get(&record.id) {
            Some(&slot) => graph.nodes[slot] = node,
            None => {
                graph.index.insert(record.id, graph.nodes.len());
                graph.nodes.push(node);
            }
        }
    }

    let count = graph.nodes.len();
    for i in 0..count {
        for j in (i + 1)..count {
            let shared = graph.nodes[i].shared_categories(&graph.nodes[j]);
            if shared == 0 {
                continue;
            }

            let weight = 1.0 / shared as f64;
            let (a, b) = (graph.nodes[i].id, graph.nodes[j].id);
            graph.nodes[i].neighbors.push(Edge { to: b, weight });
            graph.nodes[j].neighbors.push(Edge { to: a, weight });
        }
    }

    tracing::debug!(
        nodes = graph.len(),
        edges = graph.edge_count(),
        "Similarity graph built"
    );

    graph
}
