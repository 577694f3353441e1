//! # Configuration System
//!
//! Builder-style configuration for pools and engine-wide behavior. Every
//! configuration type validates itself; pools refuse to start from an
//! invalid configuration.

use crate::scene::NodeId;

/// Default number of instances a pool keeps alive
pub const DEFAULT_POOL_CAPACITY: usize = 10;

/// Configuration errors
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Capacity below the minimum of one
    #[error("Pool capacity must be at least 1, got {0}")]
    InvalidCapacity(usize),
    
    /// Pool name is empty
    #[error("Pool name cannot be empty")]
    EmptyName,
}

/// # Pool Configuration
///
/// Describes what a [`RecyclingPool`](crate::pooling::RecyclingPool) copies and
/// how many copies it keeps around.
///
/// The template is optional here on purpose: a missing template is reported
/// when the pool first needs to create an instance, not when it is configured.
#[derive(Debug, Clone, PartialEq)]
pub struct PoolConfig {
    /// Pool name, also used for the holder node free instances are parked under
    pub name: String,
    /// Template node instances are copied from
    pub template: Option<NodeId>,
    /// Number of live instances kept before returned ones are destroyed
    pub capacity: usize,
    /// Whether to detect instances being returned twice
    pub collection_check: bool,
}

impl PoolConfig {
    /// Create a new pool configuration
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            template: None,
            capacity: DEFAULT_POOL_CAPACITY,
            collection_check: cfg!(debug_assertions),
        }
    }
    
    /// Set the template node
    pub fn with_template(mut self, template: NodeId) -> Self {
        self.template = Some(template);
        self
    }
    
    /// Set the capacity
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }
    
    /// Enable or disable double-return detection
    pub fn with_collection_check(mut self, enabled: bool) -> Self {
        self.collection_check = enabled;
        self
    }
    
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.name.is_empty() {
            return Err(ConfigError::EmptyName);
        }
        validate_capacity(self.capacity)
    }
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self::new("Pool")
    }
}

/// Check that a capacity is usable
pub fn validate_capacity(capacity: usize) -> Result<(), ConfigError> {
    if capacity == 0 {
        return Err(ConfigError::InvalidCapacity(capacity));
    }
    Ok(())
}

/// # Engine Configuration
///
/// Process-wide behavior that is not tied to a single pool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Default log filter, used when `RUST_LOG` is not set
    pub log_level: String,
}

impl EngineConfig {
    /// Create a new engine configuration
    pub fn new() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
    
    /// Set log level
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    
    #[test]
    fn test_default_pool_config_is_valid() {
        let config = PoolConfig::default();
        assert_eq!(config.capacity, DEFAULT_POOL_CAPACITY);
        assert!(config.template.is_none());
        assert!(config.validate().is_ok());
    }
    
    #[test]
    fn test_zero_capacity_rejected() {
        let config = PoolConfig::new("Bullets").with_capacity(0);
        assert_eq!(config.validate(), Err(ConfigError::InvalidCapacity(0)));
    }
    
    #[test]
    fn test_empty_name_rejected() {
        let config = PoolConfig::new("");
        assert_eq!(config.validate(), Err(ConfigError::EmptyName));
    }
    
    #[test]
    fn test_engine_config_builder() {
        let config = EngineConfig::new().with_log_level("debug");
        assert_eq!(config.log_level, "debug");
    }
}
