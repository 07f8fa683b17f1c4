//! Feature tensor assembly.

pub mod builder;

pub use builder::{FeatureMatrixBuilder, TensorBuild};
