//! Record-level helpers shared by the engine and the CLI.

pub mod records;
