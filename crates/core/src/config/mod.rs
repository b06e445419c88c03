pub mod directives;
pub mod loader;
pub mod parser;

pub use directives::{Directive, ProjectConfig, ProjectConfigBuilder, parse_directive};
pub use loader::{ConfigLoader, ConfigLoaderBuilder};
pub use parser::ConfigParser;
