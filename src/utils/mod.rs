pub mod environment;
pub mod terminal;

pub use environment::{app_cache_dir, default_log_file};
pub use terminal::{sanitize_server_text, single_line};
