#[macro_use]
pub mod macros;

pub mod fs_toml_util;
