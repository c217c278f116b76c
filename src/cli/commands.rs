use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "eztood", about = concat!("eztood v", env!("CARGO_PKG_VERSION"), " - a todo list that stays out of your way"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Use a different data directory (default: platform data dir)
    #[arg(long = "data-dir", global = true, value_name = "PATH")]
    pub data_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List tasks of a tab
    List(ListArgs),
    /// Add a task to the end of a tab
    Add(AddArgs),
    /// Toggle a task done / not done
    Done(TaskRef),
    /// Delete a task
    Rm(TaskRef),
    /// Move a task up or down
    Mv(MvArgs),
    /// List tabs
    Tabs,
    /// Tab management
    Tab(TabCmd),
    /// Show or set the UI opacity
    Opacity(OpacityArgs),
}

#[derive(Args)]
pub struct ListArgs {
    /// Tab name (default: the selected tab)
    #[arg(long)]
    pub tab: Option<String>,
}

#[derive(Args)]
pub struct AddArgs {
    /// Task title
    #[arg(required = true, num_args = 1..)]
    pub title: Vec<String>,
    /// Tab name (default: the selected tab)
    #[arg(long)]
    pub tab: Option<String>,
}

#[derive(Args)]
pub struct TaskRef {
    /// 1-based position in the list, or an id prefix
    pub task: String,
    /// Tab name (default: the selected tab)
    #[arg(long)]
    pub tab: Option<String>,
}

#[derive(Args)]
pub struct MvArgs {
    /// 1-based position in the list, or an id prefix
    pub task: String,
    /// Positions to move; negative moves up
    #[arg(long, allow_hyphen_values = true)]
    pub by: isize,
    /// Tab name (default: the selected tab)
    #[arg(long)]
    pub tab: Option<String>,
}

#[derive(Args)]
pub struct TabCmd {
    #[command(subcommand)]
    pub action: TabAction,
}

#[derive(Subcommand)]
pub enum TabAction {
    /// Add a tab and select it
    Add(TabAddArgs),
    /// Close a tab (the last tab can't be closed)
    Close(TabNameArg),
    /// Select a tab
    Select(TabNameArg),
}

#[derive(Args)]
pub struct TabAddArgs {
    /// Tab name; taken names get a " 2", " 3", ... suffix
    pub name: Option<String>,
}

#[derive(Args)]
pub struct TabNameArg {
    pub name: String,
}

#[derive(Args)]
pub struct OpacityArgs {
    /// New opacity between 0.2 and 1.0
    pub value: Option<f64>,
}
