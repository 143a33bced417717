pub mod naming;
pub mod progress;
pub mod prompt;
