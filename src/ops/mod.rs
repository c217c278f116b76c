pub mod navigation;
pub mod tab_ops;
pub mod task_ops;
