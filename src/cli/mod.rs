//! CLI command handling

pub mod check;
pub mod output;
pub mod run;
pub mod show_config;
pub mod test_notify;

pub use check::*;
pub use output::*;
pub use run::*;
pub use show_config::*;
pub use test_notify::*;
