//! Task hierarchy engine.
//!
//! Turns a flat batch of task records (each pointing at its parent by id)
//! into a three-level tree, rolls up counters over it, filters it without
//! losing the ancestors of a match, and tracks which nodes are expanded.
//! The `tt` binary wraps the engine in a small CLI.

pub mod cli;
pub mod io;
pub mod model;
pub mod ops;
pub mod util;
