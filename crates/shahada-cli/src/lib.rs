//! Command-line front end for the shahada certificate renderer
//!
//! The `shahada` binary renders one certificate from flags, a batch of
//! certificates from JSONL, or walks through the four fields in an
//! interactive conversation on stdin.

pub mod cli;
pub mod commands;
pub mod dialogue;
pub mod error;
