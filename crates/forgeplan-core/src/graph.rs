use crate::fixed::Fixed64;
use crate::flow::calculate_flows;
use crate::handle::{PortDirection, handles_match};
use crate::id::{NodeId, PendingEdgeId};
use crate::model::{BlockModel, BlockType, Edge, Node};
use std::collections::HashSet;
use crate::validate::{ConnectionRejection, ValidationResult, validate_full_connection};
use tracing::{debug, warn};

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors that can occur while applying plan mutations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
    #[error("node not found: {0}")]
    NodeNotFound(NodeId),
    #[error("node already exists: {0}")]
    DuplicateNode(NodeId),
    #[error("edge not found: {0}")]
    EdgeNotFound(String),
    #[error("edge already exists: {0}")]
    DuplicateEdge(String),
}

// ---------------------------------------------------------------------------
// Queued mutations
// ---------------------------------------------------------------------------

/// A mutation to be applied during the next `apply_mutations` call.
#[derive(Debug, Clone)]
enum Mutation {
    AddNode { node: Node },
    UpdateNode { id: NodeId, model: BlockModel },
    RemoveNode { id: NodeId },
    Connect { edge: Edge, pending_id: PendingEdgeId },
    Disconnect { edge_id: String },
}

/// Outcome of applying queued mutations.
#[derive(Debug, Default)]
pub struct MutationResult {
    /// Maps each admitted `PendingEdgeId` to the id of the stored edge.
    pub added_edges: Vec<(PendingEdgeId, String)>,
    /// Connections the validator refused, with the reason.
    pub rejected: Vec<(PendingEdgeId, ConnectionRejection)>,
    /// Mutations that referred to missing or conflicting ids.
    pub errors: Vec<GraphError>,
}

impl MutationResult {
    /// Look up the stored edge id for a pending connection.
    pub fn resolve_edge(&self, pending: PendingEdgeId) -> Option<&str> {
        self.added_edges
            .iter()
            .find(|(p, _)| *p == pending)
            .map(|(_, id)| id.as_str())
    }

    /// The rejection reason for a pending connection, if it was refused.
    pub fn rejection(&self, pending: PendingEdgeId) -> Option<&ConnectionRejection> {
        self.rejected
            .iter()
            .find(|(p, _)| *p == pending)
            .map(|(_, r)| r)
    }

    pub fn is_clean(&self) -> bool {
        self.rejected.is_empty() && self.errors.is_empty()
    }
}

/// Summary figures for a whole plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GraphStats {
    pub total_nodes: usize,
    pub total_edges: usize,
    /// Number of distinct [`BlockType`]s in use.
    pub unique_block_types: usize,
    /// Sum of allocated flow over every edge, in items/min.
    pub total_flow: Fixed64,
    /// Sum of the models' power estimates; models without one count as zero.
    pub total_power_mw: Fixed64,
}

// ---------------------------------------------------------------------------
// PlanGraph
// ---------------------------------------------------------------------------

/// The plan being edited: ordered nodes and edges, with flows kept current.
///
/// Edits are queued and applied together by [`PlanGraph::apply_mutations`],
/// which runs every connection through the validator and recomputes flows
/// once at the end. Node and edge order is insertion order, which is also
/// the allocator's tie-break order.
#[derive(Debug, Clone, Default)]
pub struct PlanGraph {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    mutations: Vec<Mutation>,
    next_pending_edge: u64,
}

impl PlanGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a graph from an existing snapshot. Edges are taken as given and
    /// flows are recomputed immediately.
    pub fn from_parts(nodes: Vec<Node>, edges: Vec<Edge>) -> Self {
        let edges = calculate_flows(&nodes, &edges);
        Self {
            nodes,
            edges,
            mutations: Vec::new(),
            next_pending_edge: 0,
        }
    }

    // -----------------------------------------------------------------------
    // Queued mutations
    // -----------------------------------------------------------------------

    pub fn queue_add_node(&mut self, node: Node) {
        self.mutations.push(Mutation::AddNode { node });
    }

    /// Queue a model swap for an existing node, e.g. a rate or port change.
    pub fn queue_update_node(&mut self, id: impl Into<NodeId>, model: BlockModel) {
        self.mutations.push(Mutation::UpdateNode {
            id: id.into(),
            model,
        });
    }

    /// Queue a node for removal. Every edge touching it goes with it.
    pub fn queue_remove_node(&mut self, id: impl Into<NodeId>) {
        self.mutations.push(Mutation::RemoveNode { id: id.into() });
    }

    /// Queue a connection. The edge is admitted only if the validator accepts
    /// it when the queue is applied.
    ///
    /// # Examples
    ///
    /// ```
    /// use forgeplan_core::graph::PlanGraph;
    /// use forgeplan_core::model::Edge;
    /// use forgeplan_core::registry::ModelRegistryBuilder;
    /// use forgeplan_core::model::Node;
    ///
    /// let registry = ModelRegistryBuilder::with_base_models().build();
    /// let mut graph = PlanGraph::new();
    /// graph.queue_add_node(Node::new("miner", registry.get("Miner").unwrap().clone()));
    /// graph.queue_add_node(Node::new("smelter", registry.get("Smelter").unwrap().clone()));
    /// let pending = graph.queue_connect(Edge::new("e1", "miner", "out-0", "smelter", "in-0"));
    /// let result = graph.apply_mutations();
    /// assert_eq!(result.resolve_edge(pending), Some("e1"));
    /// ```
    pub fn queue_connect(&mut self, edge: Edge) -> PendingEdgeId {
        let pending_id = PendingEdgeId(self.next_pending_edge);
        self.next_pending_edge += 1;
        self.mutations.push(Mutation::Connect { edge, pending_id });
        pending_id
    }

    pub fn queue_disconnect(&mut self, edge_id: impl Into<String>) {
        self.mutations.push(Mutation::Disconnect {
            edge_id: edge_id.into(),
        });
    }

    pub fn has_pending_mutations(&self) -> bool {
        !self.mutations.is_empty()
    }

    /// Apply all queued mutations in order, then recompute flows once if
    /// anything changed.
    pub fn apply_mutations(&mut self) -> MutationResult {
        let mutations = std::mem::take(&mut self.mutations);
        let mut result = MutationResult::default();
        let mut changed = false;

        for mutation in mutations {
            let outcome = match mutation {
                Mutation::AddNode { node } => self.add_node_immediate(node),
                Mutation::UpdateNode { id, model } => self.update_node_immediate(&id, model),
                Mutation::RemoveNode { id } => self.remove_node_immediate(&id),
                Mutation::Connect { edge, pending_id } => {
                    match self.connect_immediate(edge) {
                        Ok(Ok(edge_id)) => {
                            result.added_edges.push((pending_id, edge_id));
                            Ok(())
                        }
                        Ok(Err(rejection)) => {
                            result.rejected.push((pending_id, rejection));
                            continue;
                        }
                        Err(e) => Err(e),
                    }
                }
                Mutation::Disconnect { edge_id } => self.disconnect_immediate(&edge_id),
            };
            match outcome {
                Ok(()) => changed = true,
                Err(e) => {
                    warn!(error = %e, "plan mutation skipped");
                    result.errors.push(e);
                }
            }
        }

        if changed {
            self.edges = calculate_flows(&self.nodes, &self.edges);
        }
        result
    }

    // -----------------------------------------------------------------------
    // Immediate mutations, used only by apply_mutations
    // -----------------------------------------------------------------------

    fn add_node_immediate(&mut self, node: Node) -> Result<(), GraphError> {
        if self.node(node.id.as_str()).is_some() {
            return Err(GraphError::DuplicateNode(node.id));
        }
        self.nodes.push(node);
        Ok(())
    }

    fn update_node_immediate(&mut self, id: &NodeId, model: BlockModel) -> Result<(), GraphError> {
        let node = self
            .nodes
            .iter_mut()
            .find(|n| n.id == *id)
            .ok_or_else(|| GraphError::NodeNotFound(id.clone()))?;
        node.model = model;
        Ok(())
    }

    fn remove_node_immediate(&mut self, id: &NodeId) -> Result<(), GraphError> {
        let before = self.nodes.len();
        self.nodes.retain(|n| n.id != *id);
        if self.nodes.len() == before {
            return Err(GraphError::NodeNotFound(id.clone()));
        }
        self.edges.retain(|e| e.source != *id && e.target != *id);
        Ok(())
    }

    /// Outer error: the edge could not be considered at all. Inner error:
    /// the validator refused it.
    fn connect_immediate(
        &mut self,
        edge: Edge,
    ) -> Result<Result<String, ConnectionRejection>, GraphError> {
        if self.edge(&edge.id).is_some() {
            return Err(GraphError::DuplicateEdge(edge.id));
        }
        if let Err(rejection) = self.validate(&edge) {
            debug!(edge = %edge.id, reason = %rejection, "connection rejected");
            return Ok(Err(rejection));
        }
        let id = edge.id.clone();
        self.edges.push(Edge { flow: None, ..edge });
        Ok(Ok(id))
    }

    fn disconnect_immediate(&mut self, edge_id: &str) -> Result<(), GraphError> {
        let before = self.edges.len();
        self.edges.retain(|e| e.id != edge_id);
        if self.edges.len() == before {
            return Err(GraphError::EdgeNotFound(edge_id.to_string()));
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    /// Check whether `edge` would be admitted right now, without changing
    /// anything. Unknown endpoints are reported as a missing port.
    ///
    /// Errors from unknown node ids surface as [`GraphError`] only through
    /// `apply_mutations`; here they are a plain rejection so drag feedback
    /// has a single shape.
    pub fn validate(&self, edge: &Edge) -> ValidationResult {
        let (Some(source), Some(target)) = (
            self.node(edge.source.as_str()),
            self.node(edge.target.as_str()),
        ) else {
            return Err(ConnectionRejection::PortNotFound);
        };
        validate_full_connection(
            source,
            target,
            edge.source_handle.as_deref(),
            edge.target_handle.as_deref(),
            &self.edges,
        )
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Edges with their most recently computed flows.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id.as_str() == id)
    }

    pub fn edge(&self, id: &str) -> Option<&Edge> {
        self.edges.iter().find(|e| e.id == id)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Edges that start or end at `node`.
    pub fn node_edges<'a>(&'a self, node: &'a str) -> impl Iterator<Item = &'a Edge> + 'a {
        self.edges
            .iter()
            .filter(move |e| e.source.as_str() == node || e.target.as_str() == node)
    }

    pub fn incoming_edges<'a>(&'a self, node: &'a str) -> impl Iterator<Item = &'a Edge> + 'a {
        self.edges.iter().filter(move |e| e.target.as_str() == node)
    }

    pub fn outgoing_edges<'a>(&'a self, node: &'a str) -> impl Iterator<Item = &'a Edge> + 'a {
        self.edges.iter().filter(move |e| e.source.as_str() == node)
    }

    /// Edges attached to one port of `node`. An output handle selects
    /// outgoing edges, an input handle incoming ones; aliases of the same
    /// port index match.
    pub fn port_edges<'a>(
        &'a self,
        node: &'a str,
        handle: &'a str,
    ) -> impl Iterator<Item = &'a Edge> + 'a {
        self.edges.iter().filter(move |e| {
            let outgoing = e.source.as_str() == node
                && e.source_handle
                    .as_deref()
                    .is_some_and(|h| handles_match(h, handle, PortDirection::Output));
            let incoming = e.target.as_str() == node
                && e.target_handle
                    .as_deref()
                    .is_some_and(|h| handles_match(h, handle, PortDirection::Input));
            outgoing || incoming
        })
    }

    pub fn has_connections(&self, node: &str) -> bool {
        self.node_edges(node).next().is_some()
    }

    pub fn stats(&self) -> GraphStats {
        let block_types: HashSet<BlockType> =
            self.nodes.iter().map(|n| n.model.block_type).collect();
        GraphStats {
            total_nodes: self.nodes.len(),
            total_edges: self.edges.len(),
            unique_block_types: block_types.len(),
            total_flow: self
                .edges
                .iter()
                .fold(Fixed64::ZERO, |acc, e| acc.saturating_add(e.flow_per_min())),
            total_power_mw: self.nodes.iter().fold(Fixed64::ZERO, |acc, n| {
                acc.saturating_add(n.model.power_estimate_mw.unwrap_or(Fixed64::ZERO))
            }),
        }
    }

    /// Consume the graph, returning its nodes and flow-annotated edges.
    pub fn into_parts(self) -> (Vec<Node>, Vec<Edge>) {
        (self.nodes, self.edges)
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::ModelRegistryBuilder;
    use crate::test_utils::*;

    fn graph_with(nodes: Vec<Node>) -> PlanGraph {
        let mut graph = PlanGraph::new();
        for node in nodes {
            graph.queue_add_node(node);
        }
        let result = graph.apply_mutations();
        assert!(result.is_clean());
        graph
    }

    #[test]
    fn add_nodes() {
        let graph = graph_with(vec![source_node("a", 60.0), sink_node("b", 30.0)]);
        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.edge_count(), 0);
        assert!(graph.node("a").is_some());
        assert!(graph.node("z").is_none());
    }

    #[test]
    fn mutations_are_deferred_until_applied() {
        let mut graph = PlanGraph::new();
        graph.queue_add_node(source_node("a", 60.0));
        assert!(graph.has_pending_mutations());
        assert_eq!(graph.node_count(), 0);
        graph.apply_mutations();
        assert!(!graph.has_pending_mutations());
        assert_eq!(graph.node_count(), 1);
    }

    #[test]
    fn duplicate_node_is_an_error() {
        let mut graph = graph_with(vec![source_node("a", 60.0)]);
        graph.queue_add_node(source_node("a", 10.0));
        let result = graph.apply_mutations();
        assert_eq!(result.errors, vec![GraphError::DuplicateNode("a".into())]);
        assert_eq!(graph.node_count(), 1);
    }

    #[test]
    fn connect_computes_flow() {
        let mut graph = graph_with(vec![source_node("miner", 60.0), sink_node("smelter", 30.0)]);
        let pending = graph.queue_connect(connect("e1", "miner", "smelter"));
        let result = graph.apply_mutations();

        assert_eq!(result.resolve_edge(pending), Some("e1"));
        assert_eq!(flow_of(graph.edges(), "e1"), fixed(30.0));
        assert_eq!(utilization_of(graph.edges(), "e1"), fixed(50.0));
    }

    #[test]
    fn rejected_connection_is_reported_not_stored() {
        let mut graph = graph_with(vec![source_node("miner", 60.0), sink_node("smelter", 30.0)]);
        let pending = graph.queue_connect(Edge::new("bad", "miner", "in-0", "smelter", "in-0"));
        let result = graph.apply_mutations();

        assert_eq!(result.resolve_edge(pending), None);
        assert_eq!(
            result.rejection(pending),
            Some(&ConnectionRejection::SourceNotOutput)
        );
        assert!(result.errors.is_empty());
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn duplicate_connection_in_one_batch() {
        let mut graph = graph_with(vec![source_node("miner", 60.0), sink_node("smelter", 30.0)]);
        let first = graph.queue_connect(connect("e1", "miner", "smelter"));
        let second = graph.queue_connect(connect("e2", "miner", "smelter"));
        let result = graph.apply_mutations();

        assert_eq!(result.resolve_edge(first), Some("e1"));
        assert_eq!(
            result.rejection(second),
            Some(&ConnectionRejection::DuplicateConnection)
        );
        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn reused_edge_id_is_an_error() {
        let mut graph = graph_with(vec![
            source_node("miner", 60.0),
            sink_node("a", 30.0),
            sink_node("b", 30.0),
        ]);
        graph.queue_connect(connect("e1", "miner", "a"));
        graph.queue_connect(connect("e1", "miner", "b"));
        let result = graph.apply_mutations();
        assert_eq!(result.errors, vec![GraphError::DuplicateEdge("e1".into())]);
        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn connect_to_unknown_node_is_rejected() {
        let mut graph = graph_with(vec![source_node("miner", 60.0)]);
        let pending = graph.queue_connect(connect("e1", "miner", "ghost"));
        let result = graph.apply_mutations();
        assert_eq!(
            result.rejection(pending),
            Some(&ConnectionRejection::PortNotFound)
        );
    }

    #[test]
    fn connect_and_add_in_same_batch() {
        let mut graph = PlanGraph::new();
        graph.queue_add_node(source_node("miner", 60.0));
        graph.queue_add_node(sink_node("smelter", 30.0));
        let pending = graph.queue_connect(connect("e1", "miner", "smelter"));
        let result = graph.apply_mutations();
        assert!(result.is_clean());
        assert_eq!(result.resolve_edge(pending), Some("e1"));
        assert_eq!(flow_of(graph.edges(), "e1"), fixed(30.0));
    }

    #[test]
    fn remove_node_cascades_to_edges() {
        let (nodes, edges) = build_fan_out_plan(100.0, &[40.0, 40.0, 40.0]);
        let mut graph = PlanGraph::from_parts(nodes, edges);
        assert_eq!(flow_of(graph.edges(), "edge-2"), fixed(20.0));

        graph.queue_remove_node("sink-0");
        let result = graph.apply_mutations();
        assert!(result.is_clean());
        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.edge_count(), 2);
        assert!(graph.edge("edge-0").is_none());
        // The freed capacity flows to the remaining sinks.
        assert_eq!(flow_of(graph.edges(), "edge-1"), fixed(40.0));
        assert_eq!(flow_of(graph.edges(), "edge-2"), fixed(40.0));
    }

    #[test]
    fn remove_unknown_node_is_an_error() {
        let mut graph = PlanGraph::new();
        graph.queue_remove_node("ghost");
        let result = graph.apply_mutations();
        assert_eq!(result.errors, vec![GraphError::NodeNotFound("ghost".into())]);
        assert_eq!(
            result.errors[0].to_string(),
            "node not found: ghost"
        );
    }

    #[test]
    fn disconnect_recomputes_flows() {
        let (nodes, edges) = build_fan_out_plan(100.0, &[60.0, 60.0]);
        let mut graph = PlanGraph::from_parts(nodes, edges);
        assert_eq!(flow_of(graph.edges(), "edge-1"), fixed(40.0));

        graph.queue_disconnect("edge-0");
        let result = graph.apply_mutations();
        assert!(result.is_clean());
        assert_eq!(flow_of(graph.edges(), "edge-1"), fixed(60.0));
        assert_eq!(utilization_of(graph.edges(), "edge-1"), fixed(60.0));
    }

    #[test]
    fn disconnect_unknown_edge_is_an_error() {
        let mut graph = PlanGraph::new();
        graph.queue_disconnect("nope");
        let result = graph.apply_mutations();
        assert_eq!(result.errors, vec![GraphError::EdgeNotFound("nope".into())]);
    }

    #[test]
    fn update_node_rate_recomputes_flows() {
        let mut graph = graph_with(vec![source_node("miner", 60.0), sink_node("smelter", 30.0)]);
        graph.queue_connect(connect("e1", "miner", "smelter"));
        graph.apply_mutations();
        assert_eq!(flow_of(graph.edges(), "e1"), fixed(30.0));

        let faster = make_model(BlockType::Miner, vec![], vec![item_port(20.0)]);
        graph.queue_update_node("miner", faster);
        let result = graph.apply_mutations();
        assert!(result.is_clean());
        assert_eq!(flow_of(graph.edges(), "e1"), fixed(20.0));
        assert_eq!(utilization_of(graph.edges(), "e1"), fixed(100.0));
    }

    #[test]
    fn update_that_drops_a_port_leaves_edge_without_flow() {
        let mut graph = graph_with(vec![source_node("miner", 60.0), sink_node("smelter", 30.0)]);
        graph.queue_connect(connect("e1", "miner", "smelter"));
        graph.apply_mutations();

        graph.queue_update_node("miner", make_model(BlockType::Miner, vec![], vec![]));
        graph.apply_mutations();
        assert_eq!(graph.edge_count(), 1);
        assert!(graph.edge("e1").unwrap().flow.is_none());
    }

    #[test]
    fn update_unknown_node_is_an_error() {
        let mut graph = PlanGraph::new();
        graph.queue_update_node("ghost", make_model(BlockType::Miner, vec![], vec![]));
        let result = graph.apply_mutations();
        assert_eq!(result.errors, vec![GraphError::NodeNotFound("ghost".into())]);
    }

    #[test]
    fn speculative_validate_has_no_side_effects() {
        let mut graph = graph_with(vec![source_node("miner", 60.0), sink_node("smelter", 30.0)]);
        graph.queue_connect(connect("e1", "miner", "smelter"));
        graph.apply_mutations();
        let before = graph.edges().to_vec();

        let candidate = connect("e2", "miner", "smelter");
        assert_eq!(
            graph.validate(&candidate),
            Err(ConnectionRejection::DuplicateConnection)
        );
        let other = Edge::new("e3", "miner", "out-0", "smelter", "in-1");
        assert_eq!(graph.validate(&other), Err(ConnectionRejection::PortNotFound));
        assert_eq!(graph.edges(), before.as_slice());
        assert!(!graph.has_pending_mutations());
    }

    #[test]
    fn empty_apply_changes_nothing() {
        let (nodes, edges) = build_chain_plan(3);
        let mut graph = PlanGraph::from_parts(nodes, edges);
        let before = graph.edges().to_vec();
        let result = graph.apply_mutations();
        assert!(result.is_clean());
        assert!(result.added_edges.is_empty());
        assert_eq!(graph.edges(), before.as_slice());
    }

    #[test]
    fn into_parts_returns_flow_annotated_edges() {
        let (nodes, edges) = build_chain_plan(2);
        let (nodes, edges) = PlanGraph::from_parts(nodes, edges).into_parts();
        assert_eq!(nodes.len(), 2);
        assert_eq!(flow_of(&edges, "e1"), fixed(30.0));
    }

    // -----------------------------------------------------------------------
    // Selectors
    // -----------------------------------------------------------------------

    fn fan_graph() -> PlanGraph {
        let mut graph = graph_with(vec![
            source_node("miner", 60.0),
            sink_node("left", 30.0),
            sink_node("right", 20.0),
            sink_node("idle", 10.0),
        ]);
        graph.queue_connect(connect("to-left", "miner", "left"));
        graph.queue_connect(connect("to-right", "miner", "right"));
        assert!(graph.apply_mutations().is_clean());
        graph
    }

    fn ids<'a>(edges: impl Iterator<Item = &'a Edge>) -> Vec<&'a str> {
        edges.map(|e| e.id.as_str()).collect()
    }

    #[test]
    fn node_edge_selectors() {
        let graph = fan_graph();
        assert_eq!(ids(graph.node_edges("miner")), ["to-left", "to-right"]);
        assert_eq!(ids(graph.node_edges("left")), ["to-left"]);
        assert_eq!(ids(graph.outgoing_edges("miner")), ["to-left", "to-right"]);
        assert!(graph.incoming_edges("miner").next().is_none());
        assert_eq!(ids(graph.incoming_edges("right")), ["to-right"]);
        assert!(graph.outgoing_edges("right").next().is_none());
    }

    #[test]
    fn port_edges_by_direction_and_alias() {
        let graph = fan_graph();
        assert_eq!(ids(graph.port_edges("miner", "out-0")), ["to-left", "to-right"]);
        assert_eq!(ids(graph.port_edges("miner", "out-00")), ["to-left", "to-right"]);
        assert!(graph.port_edges("miner", "in-0").next().is_none());
        assert!(graph.port_edges("miner", "out-1").next().is_none());
        assert_eq!(ids(graph.port_edges("left", "in-0")), ["to-left"]);
    }

    #[test]
    fn has_connections() {
        let graph = fan_graph();
        assert!(graph.has_connections("miner"));
        assert!(graph.has_connections("right"));
        assert!(!graph.has_connections("idle"));
        assert!(!graph.has_connections("ghost"));
    }

    #[test]
    fn stats_sum_flow_and_power() {
        let registry = ModelRegistryBuilder::with_base_models().build();
        let model = |name: &str| registry.get(name).unwrap().clone();
        let mut graph = graph_with(vec![
            Node::new("m1", model("Miner")),
            Node::new("m2", model("Miner")),
            Node::new("smelter", model("Smelter")),
        ]);
        graph.queue_connect(connect("e", "m1", "smelter"));
        assert!(graph.apply_mutations().is_clean());

        let stats = graph.stats();
        assert_eq!(stats.total_nodes, 3);
        assert_eq!(stats.total_edges, 1);
        assert_eq!(stats.unique_block_types, 2);
        assert_eq!(stats.total_flow, fixed(30.0));
        // Three stock blocks at 4 MW each.
        assert_eq!(stats.total_power_mw, fixed(12.0));
    }

    #[test]
    fn stats_of_empty_graph() {
        let stats = PlanGraph::new().stats();
        assert_eq!(stats, GraphStats::default());
    }

    #[test]
    fn stats_ignore_missing_power_estimates() {
        let graph = graph_with(vec![source_node("a", 60.0), sink_node("b", 30.0)]);
        let stats = graph.stats();
        assert_eq!(stats.total_power_mw, Fixed64::ZERO);
        assert_eq!(stats.unique_block_types, 2);
    }
}
