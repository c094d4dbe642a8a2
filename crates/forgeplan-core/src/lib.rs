//! Forgeplan Core -- the flow engine behind the factory planning canvas.
//!
//! This crate holds the plan data model, connection validation, throughput
//! allocation, and deterministic fixed-point arithmetic that every host of
//! the planner (canvas UI, headless tools, tests) depends on.
//!
//! # Engine Entry Points
//!
//! The engine is a pair of pure functions over a plan snapshot:
//!
//! 1. **Validate** -- [`validate::validate_full_connection`] decides whether a
//!    proposed edge may be added and, if not, why.
//! 2. **Allocate** -- [`flow::calculate_flows`] distributes every output
//!    port's capacity over its edges, largest consumer first, and annotates
//!    each edge with its flow, utilization, and display color.
//!
//! Neither function mutates its inputs; callers replace their edge
//! collection with the returned one.
//!
//! # Graph Mutation Pattern
//!
//! Hosts that want a ready-made store use [`graph::PlanGraph`], where changes
//! are queued and then applied together:
//!
//! ```rust,ignore
//! let pending = graph.queue_connect(Edge::new("e1", "miner", "out-0", "smelter", "in-0"));
//! let result = graph.apply_mutations();
//! assert_eq!(result.resolve_edge(pending), Some("e1"));
//! ```
//!
//! # Key Types
//!
//! - [`model::Node`] / [`model::Edge`] -- placed blocks and the links between
//!   their ports, addressed by positional handles (`out-N` / `in-N`).
//! - [`handle::PortTable`] -- `(node, direction, index) -> Port` lookup.
//! - [`rate::RateUnit`] -- items/min (canonical) or items/s.
//! - [`fixed::Fixed64`] -- Q32.32 fixed-point type for deterministic math.
//! - [`registry::ModelRegistry`] -- Immutable catalog of block models,
//!   seeded with the stock block library.

pub mod fixed;
pub mod flow;
pub mod graph;
pub mod handle;
pub mod id;
pub mod model;
pub mod rate;
pub mod registry;
pub mod validate;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
