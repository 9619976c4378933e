//! Line-oriented shell over a project session.

pub mod context;
pub mod output;
pub mod shell;
pub mod table;

pub use shell::run_cli;
