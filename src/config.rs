use serde::{Deserialize, Serialize};

/// Default capacity for the registry command channel.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 128;

/// Ordering domain for tab indices. Index values are dense (`0..n-1`)
/// within each scope.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderingScope {
    /// Every owning extension keeps its own index sequence.
    #[default]
    PerExtension,
    /// One index sequence across all tabs in the registry.
    Global,
}

/// Configuration for the tab registry service.
#[derive(Debug, Clone)]
pub struct RegistryConfig {
    /// How tab indices are scoped
    pub ordering: OrderingScope,
    /// Capacity of the command channel between handles and the service
    pub channel_capacity: usize,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            ordering: OrderingScope::PerExtension,
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
        }
    }
}
