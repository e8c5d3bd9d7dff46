//! CLI command implementations.

mod interfaces;
mod locate;

pub use interfaces::show_interfaces;
pub use locate::{locate, LocateOptions, Strategy};

/// How a command ended, mapped to the process exit code
pub enum Outcome {
    Found,
    NotFound,
}
