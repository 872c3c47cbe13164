//! Small utilities shared by every crate in the workspace: logging setup, timing of long phases,
//! number formatting, and JSON files on disk.

mod io;
pub mod logger;
mod time;

pub use crate::io::{read_json, to_json, write_json};
pub use crate::time::{elapsed_seconds, prettyprint_time, prettyprint_usize, Timer};
