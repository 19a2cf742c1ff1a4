//! Shared test support and end-to-end answering properties.

pub mod doubles;
