//! Mapping flagged conversation indices back to full conversation records.

pub mod examples;
pub mod structure;

pub use examples::{DetailedExample, DetailedExampleReporter, ExampleReport};
pub use structure::{reply_tree, render_lines, StructureLine};
