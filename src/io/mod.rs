pub mod config_io;
pub mod lock;
pub mod log;
pub mod paths;
pub mod tabs_io;
pub mod watcher;
