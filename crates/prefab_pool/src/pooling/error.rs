//! Pool errors

use crate::config::ConfigError;
use crate::scene::NodeId;

/// Errors that can occur while pooling instances
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PoolError {
    /// The pool has no template to create instances from
    #[error("Pool '{pool}' has no template to instantiate")]
    MissingTemplate {
        /// Name of the pool
        pool: String,
    },
    
    /// The configured template no longer exists in the scene
    #[error("Template {template:?} of pool '{pool}' does not exist")]
    TemplateNotFound {
        /// Name of the pool
        pool: String,
        /// The missing template node
        template: NodeId,
    },
    
    /// An instance was returned while it was not checked out
    #[error("Instance {node:?} was returned to pool '{pool}' more than once")]
    AlreadyReturned {
        /// Name of the pool
        pool: String,
        /// The instance returned twice
        node: NodeId,
    },
    
    /// A handle owned by another pool was returned here
    #[error("Instance {node:?} does not belong to pool '{pool}'")]
    ForeignHandle {
        /// Name of the pool
        pool: String,
        /// The foreign instance
        node: NodeId,
    },
    
    /// Invalid configuration
    #[error("Invalid pool configuration: {0}")]
    Config(#[from] ConfigError),
}
