//! Serde data file structs for block catalogs and plan snapshots.
//!
//! These structs define the on-disk format. They are deserialized from RON,
//! JSON, or TOML data files and then resolved into engine types by the
//! catalog and plan loaders. Rates are plain `f64` here; resolution converts
//! them to fixed-point.

use forgeplan_core::model::{BlockType, PortKind};
use serde::Deserialize;

// ===========================================================================
// Block models
// ===========================================================================

/// A port on a block model in a data file.
#[derive(Debug, Clone, Deserialize)]
pub struct PortData {
    /// Defaults to the port's positional handle (`in-N` / `out-N`).
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    #[serde(default = "default_kind")]
    pub kind: PortKind,
    /// `"items/min"` (default) or `"items/s"`.
    #[serde(default)]
    pub unit: Option<String>,
    pub rate: f64,
}

fn default_kind() -> PortKind {
    PortKind::Item
}

/// A block model definition in a data file.
#[derive(Debug, Clone, Deserialize)]
pub struct BlockModelData {
    pub name: String,
    #[serde(rename = "type")]
    pub block_type: BlockType,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub inputs: Vec<PortData>,
    #[serde(default)]
    pub outputs: Vec<PortData>,
    #[serde(default)]
    pub overclock_pct: Option<f64>,
    #[serde(default)]
    pub power_estimate_mw: Option<f64>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
}

// ===========================================================================
// Plans
// ===========================================================================

/// A placed node. Exactly one of `model` (a catalog name) or `inline_model`
/// must be given.
#[derive(Debug, Clone, Deserialize)]
pub struct NodeData {
    pub id: String,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub inline_model: Option<BlockModelData>,
}

/// An edge between two ports, by node id and handle.
#[derive(Debug, Clone, Deserialize)]
pub struct EdgeData {
    pub id: String,
    pub source: String,
    pub target: String,
    #[serde(default)]
    pub source_handle: Option<String>,
    #[serde(default)]
    pub target_handle: Option<String>,
}

/// A plan snapshot: nodes and edges in canvas order.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlanData {
    #[serde(default)]
    pub nodes: Vec<NodeData>,
    #[serde(default)]
    pub edges: Vec<EdgeData>,
}

// ===========================================================================
// Tests
// ===========================================================================
