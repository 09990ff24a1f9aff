//! SchemaScope CLI library.

pub mod cli;
pub mod metadata;
pub mod output;
