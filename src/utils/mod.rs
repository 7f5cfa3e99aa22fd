pub mod config;
pub mod dirstream_toml;
pub mod logger;

pub use config::*;
pub use dirstream_toml::{
    DirstreamToml, apply_file_to_settings, load_dirstream_toml, parse_dirstream_toml,
};
pub use logger::{Colors, setup_logging};
