pub mod config;
pub mod rule;
pub mod word;

pub use config::*;
pub use rule::*;
pub use word::*;
