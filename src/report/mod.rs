//! Rendering of analysis results for the terminal.

pub mod generator;

pub use generator::*;
