//! Exposing helpers.
pub mod errors;
pub mod math_procs;
pub mod utils;
