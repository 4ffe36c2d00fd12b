//! Host integration: newline-delimited JSON over stdin/stdout.

pub mod stdio;
