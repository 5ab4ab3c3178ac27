//! BRB Designer Core
//!
//! In-memory data model for BRB design projects. This crate has zero
//! dependencies on application-level code (database, HTTP, configuration).
//!
//! ## Module Organization
//!
//! - `error` - Core error types (`CoreError`, `CoreResult`)
//! - `record` - Parameter records, quantity rows and integer parsing
//! - `store` - Ordered, never-empty record store with the derived total
//! - `reorder` - Drag-and-drop reorder state machine
//! - `codec` - Project document serialization with legacy-schema tolerance
//!
//! ## Design Principles
//!
//! 1. **No I/O** - everything here is synchronous and deterministic
//! 2. **Raw text in, validated numbers out** - user input is preserved
//!    verbatim and only checked when a generation request is built
//! 3. **Unidirectional dependency** - this crate depends on nothing else in the workspace

pub mod codec;
pub mod error;
pub mod record;
pub mod reorder;
pub mod store;

// ── Error Types ────────────────────────────────────────────────────────
pub use error::{CoreError, CoreResult};

// ── Records ────────────────────────────────────────────────────────────
pub use record::{
    parse_int_prefix, ParameterRecord, QuantityRow, RecordField, RowColumn, Template,
    DEFAULT_CORE_MATERIAL,
};

// ── Store ──────────────────────────────────────────────────────────────
pub use store::{compute_total, Mutation, RecordStore};

// ── Reorder Protocol ───────────────────────────────────────────────────
pub use reorder::{Bounds, DragEvent, DragState, ReorderCommit, ReorderProtocol};

// ── Project Codec ──────────────────────────────────────────────────────
pub use codec::{ProjectDocument, FORMAT_VERSION};
