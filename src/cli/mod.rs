//! Handles Command Line Interface (CLI) related functionalities.
//!
//! Includes defining commands, parsing arguments, handling user interaction
//! (prompts, menus), rendering results and managing application state relevant to the UI.

mod commands;
mod prompts;
mod render;

pub use commands::*;
pub use prompts::*;
