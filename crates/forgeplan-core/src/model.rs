//! Plan data model: ports, block models, nodes and edges.
//!
//! Nodes own ordered input and output port lists; ports are addressed
//! positionally through `in-N` / `out-N` handles (see [`crate::handle`]).
//! Edges reference ports by node id + handle and carry the derived
//! [`EdgeFlow`] written by the allocator.

use crate::fixed::Fixed64;
use crate::id::NodeId;
use crate::rate::{RateUnit, to_canonical_rate};
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Ports
// ---------------------------------------------------------------------------

/// The resource a port carries. Only ports of the same kind may connect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PortKind {
    Item,
    Fluid,
    Power,
}

impl PortKind {
    pub fn as_str(self) -> &'static str {
        match self {
            PortKind::Item => "item",
            PortKind::Fluid => "fluid",
            PortKind::Power => "power",
        }
    }
}

impl fmt::Display for PortKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A typed, rated connection point on a node.
///
/// `rate` is the nominal throughput in `unit`: the capacity of an output
/// port or the demand of an input port. Rates are assumed non-negative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Port {
    pub id: String,
    pub name: String,
    pub kind: PortKind,
    pub unit: RateUnit,
    pub rate: Fixed64,
}

impl Port {
    /// The nominal rate converted to items/min.
    #[inline]
    pub fn canonical_rate(&self) -> Fixed64 {
        to_canonical_rate(self.rate, self.unit)
    }
}

// ---------------------------------------------------------------------------
// Block models
// ---------------------------------------------------------------------------

/// The family a block model belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BlockType {
    Miner,
    Smelter,
    Foundry,
    Assembler,
    TrainFreight,
}

/// A block definition: port lists plus display metadata.
///
/// Only `inputs` and `outputs` matter to the engine; the rest is carried
/// through untouched for the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockModel {
    #[serde(rename = "type")]
    pub block_type: BlockType,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub inputs: Vec<Port>,
    #[serde(default)]
    pub outputs: Vec<Port>,
    /// 100 means nominal speed.
    #[serde(default)]
    pub overclock_pct: Option<Fixed64>,
    #[serde(default)]
    pub power_estimate_mw: Option<Fixed64>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
}

// ---------------------------------------------------------------------------
// Nodes and edges
// ---------------------------------------------------------------------------

/// A block placed on the plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    pub model: BlockModel,
}

impl Node {
    pub fn new(id: impl Into<NodeId>, model: BlockModel) -> Self {
        Self {
            id: id.into(),
            model,
        }
    }

    /// The Nth input port, if any.
    pub fn input(&self, index: usize) -> Option<&Port> {
        self.model.inputs.get(index)
    }

    /// The Nth output port, if any.
    pub fn output(&self, index: usize) -> Option<&Port> {
        self.model.outputs.get(index)
    }
}

/// Flow data derived by the allocator for a single edge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeFlow {
    /// Source handle the flow was drawn from.
    pub source_port_id: String,
    /// Target handle the flow was delivered to.
    pub target_port_id: String,
    /// Transported quantity in items/min.
    pub flow_per_min: Fixed64,
    /// Cumulative share of the source port's capacity, 0..=100.
    pub utilization_pct: Fixed64,
    pub color_hex: String,
}

/// A connection from an output port to an input port.
///
/// Handles are optional because the host may hand over half-drawn
/// connections; such edges never receive flow data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    pub id: String,
    pub source: NodeId,
    pub target: NodeId,
    #[serde(default)]
    pub source_handle: Option<String>,
    #[serde(default)]
    pub target_handle: Option<String>,
    /// Recomputed from scratch on every allocator call.
    #[serde(default)]
    pub flow: Option<EdgeFlow>,
}

impl Edge {
    pub fn new(
        id: impl Into<String>,
        source: impl Into<NodeId>,
        source_handle: impl Into<String>,
        target: impl Into<NodeId>,
        target_handle: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            target: target.into(),
            source_handle: Some(source_handle.into()),
            target_handle: Some(target_handle.into()),
            flow: None,
        }
    }

    /// Whether this edge connects exactly the given port tuple.
    pub fn connects(
        &self,
        source: &str,
        source_handle: &str,
        target: &str,
        target_handle: &str,
    ) -> bool {
        self.source.as_str() == source
            && self.target.as_str() == target
            && self.source_handle.as_deref() == Some(source_handle)
            && self.target_handle.as_deref() == Some(target_handle)
    }

    /// Allocated flow in items/min, zero when the edge has no flow data.
    pub fn flow_per_min(&self) -> Fixed64 {
        self.flow
            .as_ref()
            .map_or(Fixed64::ZERO, |flow| flow.flow_per_min)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixed::f64_to_fixed64;

    fn port(kind: PortKind, unit: RateUnit, rate: f64) -> Port {
        Port {
            id: "p".to_string(),
            name: "Port".to_string(),
            kind,
            unit,
            rate: f64_to_fixed64(rate),
        }
    }

    #[test]
    fn canonical_rate_uses_port_unit() {
        assert_eq!(
            port(PortKind::Item, RateUnit::ItemsPerSec, 2.0).canonical_rate(),
            f64_to_fixed64(120.0)
        );
        assert_eq!(
            port(PortKind::Item, RateUnit::ItemsPerMin, 2.0).canonical_rate(),
            f64_to_fixed64(2.0)
        );
    }

    #[test]
    fn port_kind_display() {
        assert_eq!(PortKind::Item.to_string(), "item");
        assert_eq!(PortKind::Fluid.to_string(), "fluid");
        assert_eq!(PortKind::Power.to_string(), "power");
    }

    #[test]
    fn edge_connects_matches_full_tuple() {
        let edge = Edge::new("e1", "a", "out-0", "b", "in-0");
        assert!(edge.connects("a", "out-0", "b", "in-0"));
        assert!(!edge.connects("a", "out-0", "b", "in-1"));
        assert!(!edge.connects("b", "out-0", "a", "in-0"));
    }

    #[test]
    fn edge_without_handles_never_connects() {
        let mut edge = Edge::new("e1", "a", "out-0", "b", "in-0");
        edge.source_handle = None;
        assert!(!edge.connects("a", "out-0", "b", "in-0"));
    }

    #[test]
    fn flow_per_min_defaults_to_zero() {
        let edge = Edge::new("e1", "a", "out-0", "b", "in-0");
        assert_eq!(edge.flow_per_min(), Fixed64::ZERO);
    }

    #[test]
    fn node_port_accessors() {
        let node = Node::new(
            "n",
            BlockModel {
                block_type: BlockType::Smelter,
                name: "Smelter".to_string(),
                description: None,
                inputs: vec![port(PortKind::Item, RateUnit::ItemsPerMin, 30.0)],
                outputs: vec![],
                overclock_pct: None,
                power_estimate_mw: None,
                color: None,
                icon: None,
            },
        );
        assert!(node.input(0).is_some());
        assert!(node.input(1).is_none());
        assert!(node.output(0).is_none());
    }
}
