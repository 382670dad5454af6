use crate::network::NodeId;

/// Errors from network construction and traversal.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
    /// A generation parameter is out of range or inconsistent.
    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter {
        /// Parameter name as it appears in configuration.
        name: &'static str,
        /// Why the value was rejected.
        reason: String,
    },

    /// A node id does not exist in the graph.
    #[error("node {node} out of range for graph with {node_count} nodes")]
    NodeOutOfRange {
        /// Offending node id.
        node: NodeId,
        /// Number of nodes in the graph.
        node_count: usize,
    },

    /// An edge would connect a node to itself.
    #[error("self-loop on node {0} is not allowed")]
    SelfLoop(NodeId),
}

impl GraphError {
    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}
