//! Error types for plugin operations.

use thiserror::Error;

/// Structured error types for the plugin chain.
///
/// Plugins report failures with these variants (or any other crate error);
/// a failure during node creation aborts that node.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum PluginError {
    /// A plugin failed while enhancing a node
    #[error("Plugin '{plugin}' failed while enhancing field '{path}': {reason}")]
    EnhancementFailed {
        plugin: String,
        path: String,
        reason: String,
    },

    /// A plugin required a capability that is not installed on the node
    #[error("Capability '{capability}' is not installed on field '{path}'")]
    CapabilityMissing { capability: String, path: String },
}

impl PluginError {
    /// Check if this error is an enhancement failure
    pub fn is_enhancement_error(&self) -> bool {
        matches!(self, PluginError::EnhancementFailed { .. })
    }

    /// Check if this error is a missing-capability failure
    pub fn is_capability_error(&self) -> bool {
        matches!(self, PluginError::CapabilityMissing { .. })
    }

    /// Get the field path associated with this error
    pub fn path(&self) -> &str {
        match self {
            PluginError::EnhancementFailed { path, .. }
            | PluginError::CapabilityMissing { path, .. } => path,
        }
    }
}

impl From<PluginError> for crate::Error {
    fn from(err: PluginError) -> Self {
        crate::Error::Plugin(err)
    }
}
