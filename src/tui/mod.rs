pub mod app;
pub mod draft;
pub mod input;
pub mod render;
pub mod theme;

pub use app::run;
