//! Context-affixed value extraction.
//!
//! `patterns` holds the rule schema and the default registry table, `engine`
//! runs a table against text with ordered greedy matching and masking.

pub mod engine;
pub mod patterns;
