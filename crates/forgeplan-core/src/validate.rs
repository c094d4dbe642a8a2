//! Connection validation: decides whether a proposed edge may enter the plan.
//!
//! Validation is pure. A rejection is a normal return value carrying the
//! reason, never a panic, so hosts can call it speculatively while the user
//! is still dragging a connection.

use crate::handle::{
    INPUT_PREFIX, OUTPUT_PREFIX, PortDirection, handles_match, parse_handle_index,
};
use crate::model::{Edge, Node, Port, PortKind};

// ---------------------------------------------------------------------------
// Rejection reasons
// ---------------------------------------------------------------------------

/// Why a connection was refused. The `Display` form is the user-facing reason.
///
/// Variants are listed in the order the checks run; the first failing check
/// wins.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConnectionRejection {
    #[error("missing handles")]
    MissingHandles,
    #[error("source handle must be an output")]
    SourceNotOutput,
    #[error("target handle must be an input")]
    TargetNotInput,
    #[error("self-connection not allowed")]
    SelfConnection,
    #[error("invalid handle index")]
    InvalidHandleIndex,
    #[error("port does not exist")]
    PortNotFound,
    #[error("incompatible port kinds: {from} → {to}")]
    IncompatibleKinds { from: PortKind, to: PortKind },
    #[error("duplicate connection")]
    DuplicateConnection,
}

/// `Ok(())` when the connection is admissible, otherwise the rejection.
pub type ValidationResult = Result<(), ConnectionRejection>;

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Structural and type checks for a single candidate connection.
pub fn validate_connection(
    source: &Node,
    target: &Node,
    source_handle: Option<&str>,
    target_handle: Option<&str>,
) -> ValidationResult {
    let (Some(source_handle), Some(target_handle)) = (source_handle, target_handle) else {
        return Err(ConnectionRejection::MissingHandles);
    };

    if !source_handle.starts_with(OUTPUT_PREFIX) {
        return Err(ConnectionRejection::SourceNotOutput);
    }
    if !target_handle.starts_with(INPUT_PREFIX) {
        return Err(ConnectionRejection::TargetNotInput);
    }
    if source.id == target.id {
        return Err(ConnectionRejection::SelfConnection);
    }

    let (Some(source_index), Some(target_index)) = (
        parse_handle_index(source_handle, PortDirection::Output),
        parse_handle_index(target_handle, PortDirection::Input),
    ) else {
        return Err(ConnectionRejection::InvalidHandleIndex);
    };

    let (Some(source_port), Some(target_port)) =
        (source.output(source_index), target.input(target_index))
    else {
        return Err(ConnectionRejection::PortNotFound);
    };

    if !ports_compatible(source_port, target_port) {
        return Err(ConnectionRejection::IncompatibleKinds {
            from: source_port.kind,
            to: target_port.kind,
        });
    }

    Ok(())
}

/// [`validate_connection`] plus a duplicate check against `existing_edges`.
pub fn validate_full_connection(
    source: &Node,
    target: &Node,
    source_handle: Option<&str>,
    target_handle: Option<&str>,
    existing_edges: &[Edge],
) -> ValidationResult {
    validate_connection(source, target, source_handle, target_handle)?;

    // Both handles are present once the base checks pass.
    let duplicate = match (source_handle, target_handle) {
        (Some(sh), Some(th)) => {
            is_connection_duplicate(existing_edges, source.id.as_str(), target.id.as_str(), sh, th)
        }
        _ => false,
    };
    if duplicate {
        return Err(ConnectionRejection::DuplicateConnection);
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Lookup helpers
// ---------------------------------------------------------------------------

/// True if an edge already joins the same source port to the same target
/// port. Handles are compared by the port index they resolve to.
pub fn is_connection_duplicate(
    edges: &[Edge],
    source: &str,
    target: &str,
    source_handle: &str,
    target_handle: &str,
) -> bool {
    edges.iter().any(|e| {
        e.source.as_str() == source
            && e.target.as_str() == target
            && e.source_handle
                .as_deref()
                .is_some_and(|h| handles_match(h, source_handle, PortDirection::Output))
            && e.target_handle
                .as_deref()
                .is_some_and(|h| handles_match(h, target_handle, PortDirection::Input))
    })
}

/// The output port addressed by `handle` on `node`.
pub fn source_port<'a>(node: &'a Node, handle: &str) -> Option<&'a Port> {
    parse_handle_index(handle, PortDirection::Output).and_then(|i| node.output(i))
}

/// The input port addressed by `handle` on `node`.
pub fn target_port<'a>(node: &'a Node, handle: &str) -> Option<&'a Port> {
    parse_handle_index(handle, PortDirection::Input).and_then(|i| node.input(i))
}

/// Ports may connect when they carry the same resource kind.
pub fn ports_compatible(a: &Port, b: &Port) -> bool {
    a.kind == b.kind
}

// ===========================================================================
// Tests
// ===========================================================================
