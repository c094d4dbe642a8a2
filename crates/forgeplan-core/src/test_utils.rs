//! Shared test helpers for integration tests and benchmarks.
//!
//! Gated behind `#[cfg(any(test, feature = "test-utils"))]` so these helpers
//! are available in unit tests, integration tests, and benchmarks (via the
//! `test-utils` feature).

use crate::fixed::{Fixed64, f64_to_fixed64};
use crate::handle::{input_handle, output_handle};
use crate::model::*;
use crate::rate::RateUnit;

// ===========================================================================
// Fixed-point helper
// ===========================================================================

pub fn fixed(v: f64) -> Fixed64 {
    f64_to_fixed64(v)
}

// ===========================================================================
// Port constructors
// ===========================================================================

pub fn port(kind: PortKind, unit: RateUnit, rate: f64) -> Port {
    Port {
        id: String::new(),
        name: format!("{kind} port"),
        kind,
        unit,
        rate: fixed(rate),
    }
}

pub fn item_port(rate: f64) -> Port {
    port(PortKind::Item, RateUnit::ItemsPerMin, rate)
}

pub fn item_port_per_sec(rate: f64) -> Port {
    port(PortKind::Item, RateUnit::ItemsPerSec, rate)
}

pub fn fluid_port(rate: f64) -> Port {
    port(PortKind::Fluid, RateUnit::ItemsPerMin, rate)
}

pub fn power_port(rate: f64) -> Port {
    port(PortKind::Power, RateUnit::ItemsPerMin, rate)
}

// ===========================================================================
// Node constructors
// ===========================================================================

/// A model with the given ports. Port ids are rewritten to their handles.
pub fn make_model(block_type: BlockType, inputs: Vec<Port>, outputs: Vec<Port>) -> BlockModel {
    let inputs = inputs
        .into_iter()
        .enumerate()
        .map(|(i, mut p)| {
            p.id = input_handle(i);
            p
        })
        .collect();
    let outputs = outputs
        .into_iter()
        .enumerate()
        .map(|(i, mut p)| {
            p.id = output_handle(i);
            p
        })
        .collect();
    BlockModel {
        block_type,
        name: format!("{block_type:?}"),
        description: None,
        inputs,
        outputs,
        overclock_pct: None,
        power_estimate_mw: None,
        color: None,
        icon: None,
    }
}

pub fn node_with_ports(id: &str, inputs: Vec<Port>, outputs: Vec<Port>) -> Node {
    Node::new(id, make_model(BlockType::Assembler, inputs, outputs))
}

/// A miner-like node with a single item output of `rate` items/min.
pub fn source_node(id: &str, rate: f64) -> Node {
    Node::new(id, make_model(BlockType::Miner, vec![], vec![item_port(rate)]))
}

/// A node with a single item input demanding `demand` items/min.
pub fn sink_node(id: &str, demand: f64) -> Node {
    Node::new(
        id,
        make_model(BlockType::Smelter, vec![item_port(demand)], vec![]),
    )
}

// ===========================================================================
// Edge helpers
// ===========================================================================

/// An edge from `out-0` of `source` to `in-0` of `target`.
pub fn connect(id: &str, source: &str, target: &str) -> Edge {
    Edge::new(id, source, "out-0", target, "in-0")
}

pub fn find_edge<'a>(edges: &'a [Edge], id: &str) -> &'a Edge {
    edges
        .iter()
        .find(|e| e.id == id)
        .unwrap_or_else(|| panic!("edge {id} not found"))
}

/// Allocated flow on the edge with the given id.
pub fn flow_of(edges: &[Edge], id: &str) -> Fixed64 {
    find_edge(edges, id).flow_per_min()
}

/// Utilization recorded on the edge with the given id.
pub fn utilization_of(edges: &[Edge], id: &str) -> Fixed64 {
    find_edge(edges, id)
        .flow
        .as_ref()
        .map_or(Fixed64::ZERO, |f| f.utilization_pct)
}

// ===========================================================================
// Plan builders (for benchmarks, stress tests, and proptests)
// ===========================================================================

/// One source of `capacity` items/min feeding `demands.len()` sinks.
pub fn build_fan_out_plan(capacity: f64, demands: &[f64]) -> (Vec<Node>, Vec<Edge>) {
    let mut nodes = vec![source_node("source", capacity)];
    let mut edges = Vec::with_capacity(demands.len());
    for (i, &demand) in demands.iter().enumerate() {
        let id = format!("sink-{i}");
        nodes.push(sink_node(&id, demand));
        edges.push(connect(&format!("edge-{i}"), "source", &id));
    }
    (nodes, edges)
}

/// A linear chain: source -> pass-through -> ... -> sink, `length` nodes.
pub fn build_chain_plan(length: usize) -> (Vec<Node>, Vec<Edge>) {
    let mut nodes = Vec::with_capacity(length);
    let mut edges = Vec::with_capacity(length.saturating_sub(1));
    for i in 0..length {
        let id = format!("n{i}");
        let node = if i == 0 {
            source_node(&id, 60.0)
        } else {
            node_with_ports(&id, vec![item_port(30.0)], vec![item_port(30.0)])
        };
        nodes.push(node);
        if i > 0 {
            edges.push(connect(&format!("e{i}"), &format!("n{}", i - 1), &id));
        }
    }
    (nodes, edges)
}

/// A larger plan: `chains` chains of `chain_length` nodes, each chain's
/// head splitting into every node of the next chain.
pub fn build_large_plan(chains: usize, chain_length: usize) -> (Vec<Node>, Vec<Edge>) {
    let mut nodes = Vec::with_capacity(chains * chain_length);
    let mut edges = Vec::new();
    for c in 0..chains {
        for i in 0..chain_length {
            let id = format!("c{c}n{i}");
            let demand = 10.0 + ((c * 7 + i * 3) % 50) as f64;
            nodes.push(node_with_ports(
                &id,
                vec![item_port(demand)],
                vec![item_port(45.0), item_port_per_sec(0.5)],
            ));
            if i > 0 {
                edges.push(Edge::new(
                    format!("c{c}e{i}"),
                    format!("c{c}n{}", i - 1),
                    "out-0",
                    id.clone(),
                    "in-0",
                ));
            }
        }
    }
    for c in 0..chains.saturating_sub(1) {
        for i in 0..chain_length {
            edges.push(Edge::new(
                format!("x{c}-{i}"),
                format!("c{c}n0"),
                "out-1",
                format!("c{}n{i}", c + 1),
                "in-0",
            ));
        }
    }
    (nodes, edges)
}
