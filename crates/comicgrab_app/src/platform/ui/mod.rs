pub mod constants;
pub mod progress;
pub mod prompt;
pub mod render;
