//! peakscope-shell: everything around the trace generator.
//!
//! The generator in `peakscope-trace` is pure; this crate is the shell that
//! feeds it and presents its output:
//! - Parsing user text into an input sequence, and random rotated inputs
//! - The built-in example battery
//! - A playback state machine with a clock-driven driver
//! - Plain-text rendering of steps, logs and reports
//! - JSONL export of traces

pub mod cases;
pub mod command;
pub mod driver;
pub mod error;
pub mod input;
pub mod player;
pub mod render;
pub mod ticker;
pub mod writer;

pub use cases::{CaseReport, EXAMPLE_CASES, ExampleCase, find_case, run_examples};
pub use command::{Command, HELP, MAX_INTERVAL, MIN_INTERVAL, clamp_interval};
pub use driver::{DriverEvent, PlaybackDriver};
pub use error::{InputError, Result, ShellError};
pub use input::{format_sequence, parse_sequence, random_rotation};
pub use player::{PlaybackState, Player, TickOutcome};
pub use render::{render_array, render_case_table, render_log, render_step};
pub use ticker::{Tick, Ticker};
pub use writer::{TraceRecord, TraceWriter, WriterConfig};
