use crate::tab::TabId;

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("Tab not found: {0}")]
    NotFound(TabId),

    #[error("Index {index} out of range for {len} tabs")]
    InvalidIndex { index: usize, len: usize },

    #[error("Registry service channel closed")]
    ChannelClosed,
}
