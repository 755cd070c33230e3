//! CLI formatting utilities.
//!
//! Consistent colors and layout for the publish plan, per-step progress
//! and the final summary.

mod headers;
mod output;
mod status;
mod tables;

pub use headers::{print_section_header, SectionStyle};
pub use output::{format_duration, print_key_value, print_separator_with_spacing, print_summary_box};
pub use status::{print_error, print_success, print_warning, Status};
pub use tables::print_package_table;
