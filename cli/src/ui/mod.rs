//! UI utilities for terminal output.

mod qr;
mod report;

pub use qr::print_qr_code;
pub use report::{print_candidates, print_connection, print_not_found};
