//! Positional port handles (`out-N` / `in-N`) and the port lookup table.
//!
//! All handle parsing goes through [`parse_handle_index`]. The allocator
//! resolves ports through a [`PortTable`] built once per call, keyed by
//! `(node id, direction, index)`.

use crate::model::{Node, Port};
use std::collections::HashMap;

/// Prefix of every output handle.
pub const OUTPUT_PREFIX: &str = "out-";
/// Prefix of every input handle.
pub const INPUT_PREFIX: &str = "in-";

/// Which side of a node a port sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PortDirection {
    Input,
    Output,
}

impl PortDirection {
    pub fn prefix(self) -> &'static str {
        match self {
            PortDirection::Input => INPUT_PREFIX,
            PortDirection::Output => OUTPUT_PREFIX,
        }
    }
}

/// Parse the positional index out of a handle.
///
/// The handle must start with the direction's prefix; the index is the text
/// after the *last* occurrence of that prefix and must be a non-negative
/// integer. Anything else yields `None`.
pub fn parse_handle_index(handle: &str, direction: PortDirection) -> Option<usize> {
    let prefix = direction.prefix();
    if !handle.starts_with(prefix) {
        return None;
    }
    let start = handle.rfind(prefix)? + prefix.len();
    let suffix = &handle[start..];
    if suffix.is_empty() || !suffix.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    suffix.parse().ok()
}

/// True if both handles address the same port index.
///
/// Aliases such as `out-0`, `out-00` and `out-out-0` all name port 0.
/// Handles that do not parse only match themselves.
pub fn handles_match(a: &str, b: &str, direction: PortDirection) -> bool {
    match (
        parse_handle_index(a, direction),
        parse_handle_index(b, direction),
    ) {
        (Some(x), Some(y)) => x == y,
        _ => a == b,
    }
}

/// Format the handle of the Nth output port.
pub fn output_handle(index: usize) -> String {
    format!("{OUTPUT_PREFIX}{index}")
}

/// Format the handle of the Nth input port.
pub fn input_handle(index: usize) -> String {
    format!("{INPUT_PREFIX}{index}")
}

// ---------------------------------------------------------------------------
// Port table
// ---------------------------------------------------------------------------

/// Key addressing one port of one node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PortKey<'a> {
    pub node: &'a str,
    pub direction: PortDirection,
    pub index: usize,
}

impl<'a> PortKey<'a> {
    /// Build a key from a node id and handle, or `None` if the handle does
    /// not parse for `direction`.
    pub fn from_handle(node: &'a str, handle: &str, direction: PortDirection) -> Option<Self> {
        parse_handle_index(handle, direction).map(|index| Self {
            node,
            direction,
            index,
        })
    }
}

/// Snapshot mapping of every port in a node collection.
///
/// Borrowed from the node slice it was built from; holds no state beyond
/// the lifetime of a single engine call. When two nodes share an id the
/// first one wins.
#[derive(Debug, Default)]
pub struct PortTable<'a> {
    ports: HashMap<PortKey<'a>, &'a Port>,
}

impl<'a> PortTable<'a> {
    pub fn new(nodes: &'a [Node]) -> Self {
        let mut ports = HashMap::new();
        for node in nodes {
            let id = node.id.as_str();
            let sides = [
                (PortDirection::Input, &node.model.inputs),
                (PortDirection::Output, &node.model.outputs),
            ];
            for (direction, list) in sides {
                for (index, port) in list.iter().enumerate() {
                    ports
                        .entry(PortKey {
                            node: id,
                            direction,
                            index,
                        })
                        .or_insert(port);
                }
            }
        }
        Self { ports }
    }

    pub fn get(&self, key: &PortKey<'_>) -> Option<&'a Port> {
        self.ports.get(key).copied()
    }

    /// Resolve an output handle on `node`.
    pub fn output(&self, node: &str, handle: &str) -> Option<&'a Port> {
        self.resolve(node, handle, PortDirection::Output)
    }

    /// Resolve an input handle on `node`.
    pub fn input(&self, node: &str, handle: &str) -> Option<&'a Port> {
        self.resolve(node, handle, PortDirection::Input)
    }

    fn resolve(&self, node: &str, handle: &str, direction: PortDirection) -> Option<&'a Port> {
        let key = PortKey::from_handle(node, handle, direction)?;
        self.get(&key)
    }

    pub fn len(&self) -> usize {
        self.ports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ports.is_empty()
    }
}
