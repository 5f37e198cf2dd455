//! Shared CLI argument types

mod common;
mod global;

pub use common::{JsonArg, OutputFormat};
pub use global::GlobalOptions;
