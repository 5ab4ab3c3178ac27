//! Services
//!
//! Business logic services for the application.
//! Services handle the core functionality and are called by commands.

pub mod designer;
pub mod file_sink;
pub mod generation;
pub mod in_flight;
pub mod ledger;
pub mod persistence;

pub use designer::{DesignerService, Endpoints};
pub use file_sink::{DirectorySink, FileSink};
pub use generation::{GenerationClient, HttpGenerationClient};
pub use in_flight::{ActionClass, InFlight};
pub use ledger::ArtifactLedger;
pub use persistence::PersistenceBridge;
