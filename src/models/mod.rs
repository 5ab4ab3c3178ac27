//! Data Models
//!
//! Contains all data structures used throughout the application.

pub mod artifact;
pub mod response;
pub mod settings;
pub mod workspace;

pub use artifact::*;
pub use response::*;
pub use settings::*;
pub use workspace::*;
