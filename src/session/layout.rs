//! Longest-path layering: every node sits one column right of its furthest upstream
//! neighbour, and free boundary ends are parked half a column outside their node.

use crate::config::LayoutConfig;
use crate::edges::EdgeKind;
use crate::model::Position;
use crate::visual::{EndpointSide, VisualGraph};
use ahash::AHashMap;
use itertools::Itertools;

/// Target positions computed by [`plan_layout`]; nothing is applied yet.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayoutPlan {
    pub nodes: Vec<(String, Position)>,
    /// New positions for the free end of boundary edges.
    pub free_ends: Vec<(String, EndpointSide, Position)>,
}

/// Column index of each node. Cycles are broken by visiting the remaining nodes in
/// graph order once no node without pending predecessors is left.
pub fn rank_nodes(graph: &VisualGraph) -> AHashMap<String, usize> {
    let ids: Vec<&str> = graph.nodes().map(|n| n.id.as_str()).collect();
    let links: Vec<(&str, &str)> = graph
        .edges()
        .filter_map(|e| Some((e.source.node_id()?, e.target.node_id()?)))
        .filter(|(from, to)| from != to && ids.contains(from) && ids.contains(to))
        .unique()
        .collect();

    let mut pending: AHashMap<&str, usize> = ids.iter().map(|id| (*id, 0)).collect();
    for (_, to) in &links {
        *pending.entry(*to).or_default() += 1;
    }

    let mut ranks: AHashMap<String, usize> = AHashMap::with_capacity(ids.len());
    let settle = |id: &str, ranks: &mut AHashMap<String, usize>| {
        let rank = links
            .iter()
            .filter(|(_, to)| *to == id)
            .filter_map(|(from, _)| ranks.get(*from).map(|r| r + 1))
            .max()
            .unwrap_or(0);
        ranks.insert(id.to_string(), rank);
    };

    while ranks.len() < ids.len() {
        let ready = ids
            .iter()
            .find(|id| !ranks.contains_key(**id) && pending[**id] == 0)
            .or_else(|| ids.iter().find(|id| !ranks.contains_key(**id)));
        let Some(&id) = ready else { break };
        settle(id, &mut ranks);
        for (_, to) in links.iter().filter(|(from, _)| *from == id) {
            if let Some(count) = pending.get_mut(to) {
                *count = count.saturating_sub(1);
            }
        }
    }
    ranks
}

pub fn plan_layout(graph: &VisualGraph, config: &LayoutConfig) -> LayoutPlan {
    let ranks = rank_nodes(graph);
    let columns = graph
        .nodes()
        .filter_map(|n| ranks.get(&n.id).map(|rank| (*rank, n)))
        .into_group_map();

    let mut plan = LayoutPlan::default();
    let mut placed: AHashMap<&str, Position> = AHashMap::new();
    for (rank, column) in columns.into_iter().sorted_by_key(|(rank, _)| *rank) {
        let ordered = column.into_iter().sorted_by(|a, b| {
            a.position
                .y
                .total_cmp(&b.position.y)
                .then_with(|| a.id.cmp(&b.id))
        });
        for (row, node) in ordered.enumerate() {
            let position = Position::new(
                config.origin.x + rank as f64 * config.column_spacing,
                config.origin.y + row as f64 * config.row_spacing,
            );
            placed.insert(node.id.as_str(), position);
            plan.nodes.push((node.id.clone(), position));
        }
    }

    for edge in graph.edges().filter(|e| e.kind.is_boundary()) {
        let (free_side, attached_side) = match edge.kind {
            EdgeKind::Input => (EndpointSide::Source, EndpointSide::Target),
            _ => (EndpointSide::Target, EndpointSide::Source),
        };
        let Some(node) = edge.endpoint(attached_side).node_id().and_then(|id| graph.node(id)) else {
            continue;
        };
        let Some(at) = placed.get(node.id.as_str()) else {
            continue;
        };
        let half = config.column_spacing / 2.0;
        let mid_y = at.y + node.size.height / 2.0;
        let point = match free_side {
            EndpointSide::Source => Position::new(at.x - half, mid_y),
            EndpointSide::Target => Position::new(at.x + node.size.width + half, mid_y),
        };
        plan.free_ends.push((edge.id.clone(), free_side, point));
    }
    plan
}
