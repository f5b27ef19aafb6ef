pub mod connector;
pub mod tracing;

pub use connector::ScriptedConnector;
pub use tracing::{CapturedEvent, capture_events};
