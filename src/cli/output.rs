use serde::Serialize;

use crate::model::tab::Tab;
use crate::model::task::Task;

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct TaskJson {
    /// 1-based position in its tab
    pub position: usize,
    pub id: String,
    pub title: String,
    pub done: bool,
}

#[derive(Serialize)]
pub struct TaskListJson {
    pub tab: String,
    pub tasks: Vec<TaskJson>,
}

#[derive(Serialize)]
pub struct TabJson {
    pub id: String,
    pub name: String,
    pub selected: bool,
    pub open: usize,
    pub done: usize,
}

#[derive(Serialize)]
pub struct OpacityJson {
    pub opacity: f64,
}

pub fn task_to_json(position: usize, task: &Task) -> TaskJson {
    TaskJson {
        position,
        id: task.id.to_string(),
        title: task.title.clone(),
        done: task.is_done,
    }
}

pub fn tab_to_json(tab: &Tab, selected: bool) -> TabJson {
    let done = tab.tasks.iter().filter(|t| t.is_done).count();
    TabJson {
        id: tab.id.to_string(),
        name: tab.name.clone(),
        selected,
        open: tab.tasks.len() - done,
        done,
    }
}

// ---------------------------------------------------------------------------
// Human-readable formatting
// ---------------------------------------------------------------------------

/// `  2. [x] Title  (id 1a2b3c4d)`
pub fn format_task_line(position: usize, task: &Task) -> String {
    let mark = if task.is_done { 'x' } else { ' ' };
    format!(
        "{:>3}. [{}] {}  ({})",
        position,
        mark,
        task.title,
        task.id.short()
    )
}

/// `* Home  (2 open, 1 done)`
pub fn format_tab_line(tab: &Tab, selected: bool) -> String {
    let done = tab.tasks.iter().filter(|t| t.is_done).count();
    let marker = if selected { '*' } else { ' ' };
    format!(
        "{} {}  ({} open, {} done)",
        marker,
        tab.name,
        tab.tasks.len() - done,
        done
    )
}
