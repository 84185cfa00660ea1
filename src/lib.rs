//! Building blocks for Advent of Code solutions: input parsing, grids,
//! intervals, graphs, number theory, containers and worker pools.

pub mod bits;
pub mod error;
pub mod graph;
pub mod grid;
pub mod heap;
pub mod interval;
pub mod intervalset;
pub mod misc;
pub mod num;
pub mod parallel;
pub mod parse;
pub mod queue;
pub mod radix;
pub mod set;
pub mod sparse;
pub mod split;

pub use error::{Error, ParseError, Result};
