//! Draftwright Domain Layer
//!
//! Value types shared by the extraction engine and its callers. The only
//! external dependency is `serde`, so that finalized snapshots can be handed
//! to document renderers as plain serialized records.
//!
//! ## Key Concepts
//!
//! - **Flow kind**: which document-creation dialogue is active
//!   (quotation, MoU, invoice)
//! - **Draft record**: the in-progress accumulation of fields for the active flow
//! - **Line item**: one confirmed row of the document (waste code, category, price, ...)
//! - **Snapshot**: an immutable, fully populated copy of a draft taken at finalize time

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod draft;
pub mod field;
pub mod flow;
pub mod snapshot;

// Re-exports for convenience
pub use draft::{DraftRecord, LineItem};
pub use field::{ChargeField, HeaderField, ItemField};
pub use flow::FlowKind;
pub use snapshot::SnapshotRecord;
