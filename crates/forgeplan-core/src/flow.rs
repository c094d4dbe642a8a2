//! Flow allocation: distributes each output port's capacity over its edges.
//!
//! # Algorithm
//!
//! Edges are grouped by source port, keyed by node id and the port index
//! the output handle resolves to. Within a group, edges are ordered by their
//! target port's demand, highest first; ties keep the incoming edge order. Walking that order, each edge receives
//! `min(remaining capacity, target demand)`, so the largest consumers are
//! served first and the smallest starve last.
//!
//! A target port fed from several sources is not capped across groups: each
//! edge competes only against its own source's capacity.
//!
//! Every call recomputes from scratch. Edges that cannot be resolved (missing
//! handle, unknown node, unknown port) are returned with `flow == None`.

use crate::fixed::Fixed64;
use crate::handle::{PortDirection, PortKey, PortTable, handles_match};
use crate::model::{Edge, EdgeFlow, Node};
use crate::validate::{source_port, target_port};
use fixed::types::I64F64;
use std::collections::HashMap;
use tracing::{debug_span, trace};

const HUNDRED: Fixed64 = Fixed64::const_from_int(100);

/// Edges sharing one source port, in incoming order.
struct SourceGroup<'a> {
    key: PortKey<'a>,
    edges: Vec<usize>,
}

/// Recompute flow data for every edge. Inputs are left untouched.
pub fn calculate_flows(nodes: &[Node], edges: &[Edge]) -> Vec<Edge> {
    let _span = debug_span!("calculate_flows", nodes = nodes.len(), edges = edges.len()).entered();

    let ports = PortTable::new(nodes);
    let mut result: Vec<Edge> = edges
        .iter()
        .map(|edge| Edge {
            flow: None,
            ..edge.clone()
        })
        .collect();

    // Group by resolved source port, keeping first-seen group order. Handle
    // aliases of one port land in the same group.
    let mut groups: Vec<SourceGroup<'_>> = Vec::new();
    let mut group_index: HashMap<PortKey<'_>, usize> = HashMap::new();
    for (i, edge) in edges.iter().enumerate() {
        let Some(handle) = edge.source_handle.as_deref() else {
            trace!(edge = %edge.id, "skipping edge without source handle");
            continue;
        };
        let Some(key) = PortKey::from_handle(edge.source.as_str(), handle, PortDirection::Output)
        else {
            trace!(edge = %edge.id, handle, "skipping edge with malformed source handle");
            continue;
        };
        let slot = *group_index.entry(key).or_insert_with(|| {
            groups.push(SourceGroup {
                key,
                edges: Vec::new(),
            });
            groups.len() - 1
        });
        groups[slot].edges.push(i);
    }

    for group in &groups {
        let Some(port) = ports.get(&group.key) else {
            for &i in &group.edges {
                trace!(
                    edge = %edges[i].id,
                    node = group.key.node,
                    index = group.key.index,
                    "skipping edge from unknown source port"
                );
            }
            continue;
        };
        let capacity = port.canonical_rate();

        // Resolve each target's demand; unresolvable targets drop out.
        let mut members: Vec<(usize, Fixed64)> = Vec::with_capacity(group.edges.len());
        for &i in &group.edges {
            let edge = &edges[i];
            let demand = edge
                .target_handle
                .as_deref()
                .and_then(|handle| ports.input(edge.target.as_str(), handle));
            match demand {
                Some(target) => members.push((i, target.canonical_rate())),
                None => trace!(edge = %edge.id, "skipping edge to unknown target port"),
            }
        }

        // Stable: equal demands keep their incoming order.
        members.sort_by(|a, b| b.1.cmp(&a.1));

        let mut remaining = capacity;
        for (i, demand) in members {
            let flow = remaining.min(demand);
            remaining = remaining.saturating_sub(flow);
            let consumed = capacity.saturating_sub(remaining);
            let utilization_pct = utilization_pct(consumed, capacity);

            let edge = &edges[i];
            result[i].flow = Some(EdgeFlow {
                source_port_id: edge.source_handle.clone().unwrap_or_default(),
                target_port_id: edge.target_handle.clone().unwrap_or_default(),
                flow_per_min: flow,
                utilization_pct,
                color_hex: utilization_to_color(utilization_pct),
            });
        }
    }

    result
}

/// `consumed * 100 / capacity`, or zero when there is no capacity.
///
/// Scales before dividing, in Q64.64, so exact percentages stay exact.
pub fn utilization_pct(consumed: Fixed64, capacity: Fixed64) -> Fixed64 {
    if capacity <= Fixed64::ZERO {
        return Fixed64::ZERO;
    }
    let scaled = I64F64::from_num(consumed) * 100_i128;
    scaled
        .checked_div(I64F64::from_num(capacity))
        .map_or(Fixed64::ZERO, Fixed64::saturating_from_num)
}

/// Map a utilization percentage onto a red (0%) to green (100%) hex color.
///
/// Input is clamped to `[0, 100]` first; blue is always zero.
pub fn utilization_to_color(pct: Fixed64) -> String {
    let clamped = pct.clamp(Fixed64::ZERO, HUNDRED);
    let green = channel(clamped);
    let red = channel(HUNDRED - clamped);
    format!("#{red:02x}{green:02x}00")
}

/// `round(255 * pct / 100)` for `pct` in `[0, 100]`.
fn channel(pct: Fixed64) -> u8 {
    (pct * 255_i64 / 100_i64).round().to_num::<u8>()
}

// ---------------------------------------------------------------------------
// Port utilization queries
// ---------------------------------------------------------------------------

/// Share of an output port's capacity allocated across its outgoing edges.
/// Edges count by the port their handle resolves to, not by handle text.
///
/// Returns zero for an unknown port or a zero-capacity port.
pub fn source_utilization(node: &Node, source_handle: &str, edges: &[Edge]) -> Fixed64 {
    let Some(port) = source_port(node, source_handle) else {
        return Fixed64::ZERO;
    };
    let total: Fixed64 = edges
        .iter()
        .filter(|e| {
            e.source == node.id
                && e.source_handle
                    .as_deref()
                    .is_some_and(|h| handles_match(h, source_handle, PortDirection::Output))
        })
        .fold(Fixed64::ZERO, |acc, e| acc.saturating_add(e.flow_per_min()));
    utilization_pct(total, port.canonical_rate())
}

/// Share of an input port's demand covered by its incoming edges.
///
/// Inbound flow is not capped across sources, so this can exceed 100.
pub fn target_utilization(node: &Node, target_handle: &str, edges: &[Edge]) -> Fixed64 {
    let Some(port) = target_port(node, target_handle) else {
        return Fixed64::ZERO;
    };
    let total: Fixed64 = edges
        .iter()
        .filter(|e| {
            e.target == node.id
                && e.target_handle
                    .as_deref()
                    .is_some_and(|h| handles_match(h, target_handle, PortDirection::Input))
        })
        .fold(Fixed64::ZERO, |acc, e| acc.saturating_add(e.flow_per_min()));
    utilization_pct(total, port.canonical_rate())
}

// ===========================================================================
// Tests
// ===========================================================================
