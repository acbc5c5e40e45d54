//! Transit route planner.
//!
//! Answers "what is the fastest way from A to B on this network?" and,
//! when lines are disrupted, "what else could I take?". The network graph
//! is built once from a catalog and swapped atomically on rebuild.

pub mod catalog;
pub mod domain;
pub mod engine;
pub mod graph;
pub mod planner;
pub mod web;
