pub mod toolset;
pub mod types;

pub use toolset::ToolsetConfig;
pub use types::Cli;
