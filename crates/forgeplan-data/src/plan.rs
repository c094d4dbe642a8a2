//! Plan snapshots: read a saved plan and resolve it into engine nodes and
//! edges.
//!
//! Edges come back exactly as written. Whether they are admissible is the
//! validator's call, and the allocator skips any that cannot be resolved.

use forgeplan_core::model::{Edge, Node};
use forgeplan_core::registry::ModelRegistry;
use std::collections::HashMap;
use std::path::Path;
use tracing::debug;

use crate::catalog::resolve_block_model;
use crate::loader::{
    DataLoadError, check_duplicate, deserialize_file, require_data_file, resolve_model,
};
use crate::schema::{EdgeData, NodeData, PlanData};

/// Base name of the plan file inside a plan directory.
pub const PLAN_FILE: &str = "plan";

/// Load `plan.{ron,json,toml}` from `dir`. The file must exist, and exactly
/// one format of it.
pub fn load_plan_dir(
    dir: &Path,
    registry: &ModelRegistry,
) -> Result<(Vec<Node>, Vec<Edge>), DataLoadError> {
    let path = require_data_file(dir, PLAN_FILE)?;
    load_plan(&path, registry)
}

/// Load a plan snapshot from `path`, resolving model names against
/// `registry`.
pub fn load_plan(
    path: &Path,
    registry: &ModelRegistry,
) -> Result<(Vec<Node>, Vec<Edge>), DataLoadError> {
    let data: PlanData = deserialize_file(path)?;

    let mut seen: HashMap<String, usize> = HashMap::with_capacity(data.nodes.len());
    let mut nodes = Vec::with_capacity(data.nodes.len());
    for (index, node) in data.nodes.iter().enumerate() {
        check_duplicate(&seen, &node.id, path)?;
        seen.insert(node.id.clone(), index);
        nodes.push(resolve_node(node, registry, path)?);
    }

    let edges: Vec<Edge> = data.edges.iter().map(resolve_edge).collect();

    debug!(
        file = %path.display(),
        nodes = nodes.len(),
        edges = edges.len(),
        "loaded plan"
    );
    Ok((nodes, edges))
}

fn resolve_node(
    data: &NodeData,
    registry: &ModelRegistry,
    file: &Path,
) -> Result<Node, DataLoadError> {
    let model = match (&data.model, &data.inline_model) {
        (Some(name), None) => resolve_model(registry, name, file)?.clone(),
        (None, Some(inline)) => resolve_block_model(inline, file)?,
        (Some(_), Some(_)) => {
            return Err(DataLoadError::InvalidValue {
                file: file.to_path_buf(),
                field: "model",
                detail: format!("node '{}' has both a model name and an inline model", data.id),
            });
        }
        (None, None) => {
            return Err(DataLoadError::InvalidValue {
                file: file.to_path_buf(),
                field: "model",
                detail: format!("node '{}' has no model", data.id),
            });
        }
    };
    Ok(Node::new(data.id.as_str(), model))
}

fn resolve_edge(data: &EdgeData) -> Edge {
    Edge {
        id: data.id.clone(),
        source: data.source.as_str().into(),
        target: data.target.as_str().into(),
        source_handle: data.source_handle.clone(),
        target_handle: data.target_handle.clone(),
        flow: None,
    }
}

// ===========================================================================
// Tests
// ===========================================================================
