//! Command-line frontend support.
//!
//! Handles turning argument strings into engine inputs, writing reports to
//! stdout and installing the log subscriber.

mod input;
mod logging;
mod output;

pub use input::{parse_cell, parse_matrix, parse_vector};
pub use logging::init_logging;
pub use output::write_outcome;
