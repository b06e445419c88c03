pub mod json;
pub mod post;

pub use json::{JsonConfig, JsonFormatter, report_to_json};
pub use post::{PostConfig, PostFormatter, compose_post, render_post};
