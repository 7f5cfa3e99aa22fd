//! Engine module: CLI parsing, the run handler, and path tools

pub mod arg_parser;
pub mod cli;
pub mod tools;

pub use arg_parser::Cli;
pub use cli::{RunSettings, build_readdir, handle_run};
pub use tools::{
    filter_by_globs, glob_match, is_hidden_name, normalize, path_relative_to, resolve_root,
};
