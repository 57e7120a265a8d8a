//! Command handlers for CLI subcommands
//!
//! This module contains the implementation logic for each CLI subcommand.

mod check;
mod completions;
mod decode;
mod encode;
mod utils;

pub use check::handle_check;
pub use completions::handle_completions;
pub use decode::handle_decode;
pub use encode::handle_encode;
