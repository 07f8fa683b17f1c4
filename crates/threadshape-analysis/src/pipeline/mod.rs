//! Pipeline stages wired through an artifact store.

pub mod stages;

pub use stages::{Pipeline, RunReport};
