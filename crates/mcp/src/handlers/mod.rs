//! Tool handlers
//!
//! Every handler follows the same shape: attempt one side effect, format a
//! text summary on success, and on failure return an error-flagged response
//! whose text starts with a handler-specific prefix followed by the
//! underlying message.

mod config_file;
mod listing;
mod logs;
mod report;
mod results;

pub use config_file::get_config;
pub use listing::{list_page_objects, list_tests};
pub use logs::{analyze_logs, tail_lines};
pub use report::{generate_report, resolve_report_command};
pub use results::get_results;
pub use run_test::{resolve_test_command, run_test};

use osmos_common::Error;

/// Error message, plus the command's stderr when it exited non-zero
fn failure_detail(err: &Error) -> String {
    match err {
        Error::CommandFailed { stderr, .. } if !stderr.trim().is_empty() => {
            format!("{}\n{}", err, stderr.trim_end())
        }
        _ => err.to_string(),
    }
}
