//! Embeddable core library for protopack.
//!
//! Provides a clap-free, I/O-abstracted entry point that regenerates
//! protobuf-derived sources and hands a package manifest to a packaging
//! step.
//!
//! # Port traits
//!
//! All side effects are abstracted behind port traits in [`ports`]:
//! - [`EnvPort`](ports::EnvPort): read environment variables
//! - [`ProcessPort`](ports::ProcessPort): run the schema compiler
//! - [`Packager`](ports::Packager): the packaging step the build hook wraps
//! - [`WritePort`](ports::WritePort): write files and create directories
//!
//! The [`adapters`] module provides default system-backed implementations
//! plus in-memory ones for embedding and tests.
//!
//! # Entry points
//!
//! - [`locate_compiler`](compiler::locate_compiler): find the compiler
//! - [`run_generate`](pipeline::run_generate): regenerate stale sources
//! - [`build_manifest`](pipeline::build_manifest): discover packages and data files
//! - [`run_build`](pipeline::run_build): the full build hook

pub mod adapters;
pub mod compiler;
pub mod error;
pub mod generate;
pub mod pipeline;
pub mod ports;
pub mod settings;

pub use error::{BuildError, BuildResult};

// Re-export the DTOs so embedders don't need protopack-types directly.
pub use protopack_types::compiler::{CompilerLocation, LocationSource};
pub use protopack_types::manifest::{DistributionInfo, PackageManifest};
pub use protopack_types::report::BuildReport;
pub use protopack_types::schema_source::{Freshness, GenerateOutcome, SchemaSource};
