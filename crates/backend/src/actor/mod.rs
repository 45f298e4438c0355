//! Actor-based concurrency primitives
//!
//! Each input file gets its own reader task publishing into a bounded `mpsc`
//! queue, and a single aggregator task owns all join state. Tasks share
//! nothing but their queues and a group cancellation token.
//!
//! # Architecture
//!
//! ```text
//! events.csv  ─ reader ─┐  10
//! commits.csv ─ reader ─┼─────▶ aggregator ──oneshot──▶ caller
//! repos.csv   ─ reader ─┘
//! ```
//!
//! - [`reader`]: streams one file as trimmed records, closing its queue on exit
//! - [`supervisor`]: runs the tasks as a fail-fast [`TaskGroup`]

pub mod reader;
pub mod supervisor;

pub use reader::{ReaderOptions, SplitPolicy, StreamError, read_lines};
pub use supervisor::{TaskGroup, TaskPanicked, log_interrupt};
