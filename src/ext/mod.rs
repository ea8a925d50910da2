//! Extending standard functions and structures.

pub mod vec;
pub mod fmt;
pub mod sys;
