use std::path::PathBuf;

use rumor_graph::GraphError;

/// Errors surfaced by configuration and simulation.
///
/// Every variant is a deterministic function of the input; nothing here is
/// worth retrying.
#[derive(Debug, thiserror::Error)]
pub enum SimError {
    /// Out-of-range or inconsistent configuration, detected before the run.
    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter {
        /// Configuration field name.
        name: &'static str,
        /// Why the value was rejected.
        reason: String,
    },

    /// Network construction or traversal failed.
    #[error(transparent)]
    Graph(#[from] GraphError),

    /// A configuration file could not be read.
    #[error("failed to read config {path}: {source}")]
    ConfigRead {
        /// Path that was read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A configuration file is not valid TOML for [`crate::SimulationConfig`].
    #[error("failed to parse config: {0}")]
    ConfigParse(#[from] toml::de::Error),
}

impl SimError {
    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }

    /// Name of the rejected parameter, for either layer's
    /// `InvalidParameter`.
    #[must_use]
    pub fn invalid_parameter(&self) -> Option<&'static str> {
        match self {
            Self::InvalidParameter { name, .. }
            | Self::Graph(GraphError::InvalidParameter { name, .. }) => Some(*name),
            _ => None,
        }
    }
}
