pub mod clicks;
pub mod config;
pub mod errors;
pub mod events;
pub mod handle;
pub mod query;
pub mod registry;
pub mod service;
pub mod store;
pub mod tab;

pub use clicks::ClickDispatch;
pub use config::{OrderingScope, RegistryConfig};
pub use errors::RegistryError;
pub use events::{EventDispatcher, ListenerError, TabEvent, TabEventKind, TabListener};
pub use handle::RegistryHandle;
pub use query::TabFilter;
pub use registry::{BatchReport, Created, TabRegistry};
pub use service::{RegistryCommand, TabService};
pub use tab::{Tab, TabId, TabIds, TabProperties};
