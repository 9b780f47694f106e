pub mod config;
pub mod coordinator;
pub mod loader;
pub mod resolver;
pub mod worker;

pub use config::{ConfigOptions, Configuration};
pub use coordinator::{Callback, LoadBatch, LoadCoordinator, ResourceKind, ResourceRequest};
pub use loader::{Completion, LoadOutcome, Loader};
