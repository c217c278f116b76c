pub mod config;
pub mod tab;
pub mod task;

pub use config::*;
pub use tab::*;
pub use task::*;
