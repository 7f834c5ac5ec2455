//! Configuration layer for the `protopack` binary.

pub mod config;
