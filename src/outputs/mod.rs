//! Output generation for an exported conversation.
//!
//! # Submodules
//!
//! - [`markdown`]: Renders a `Transcript` as a single Markdown document
//! - [`file`]: Saves the rendered artifact into the output directory
//!
//! # Output Structure
//!
//! ```text
//! output_dir/
//! └── How_do_lifetimes_work.md   # one file per run, named after the conversation
//! ```

pub mod file;
pub mod markdown;
