//! Shared DTOs (schemas-as-code) for the protopack workspace.
//!
//! # Design constraints
//! - These types are intended to be serialized to disk.
//! - Be conservative with breaking changes.
//! - Prefer adding optional fields over changing semantics.

pub mod compiler;
pub mod manifest;
pub mod report;
pub mod schema_source;

/// Schema identifiers.
pub mod schema {
    pub const PROTOPACK_MANIFEST_V1: &str = "protopack.manifest.v1";
    pub const PROTOPACK_REPORT_V1: &str = "protopack.report.v1";
}
