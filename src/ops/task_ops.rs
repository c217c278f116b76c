//! Operations on a single ordered task list.
//!
//! Every function is a silent no-op on unknown ids or out-of-range input
//! and reports whether the list changed.

use crate::model::task::{Task, TaskId};

/// Position of a task in the list
pub fn index_of(tasks: &[Task], id: TaskId) -> Option<usize> {
    tasks.iter().position(|t| t.id == id)
}

/// Append a new task. Blank titles are rejected.
pub fn add(tasks: &mut Vec<Task>, title: &str) -> Option<TaskId> {
    let task = Task::new(title)?;
    let id = task.id;
    tasks.push(task);
    Some(id)
}

/// Remove a task, returning the index it occupied
pub fn delete(tasks: &mut Vec<Task>, id: TaskId) -> Option<usize> {
    let idx = index_of(tasks, id)?;
    tasks.remove(idx);
    Some(idx)
}

pub fn toggle_done(tasks: &mut [Task], id: TaskId) -> bool {
    match tasks.iter_mut().find(|t| t.id == id) {
        Some(task) => {
            task.is_done = !task.is_done;
            true
        }
        None => false,
    }
}

/// Move a task by `delta` positions. The target index is clamped into the
/// list, so a large delta jumps straight to the first or last slot.
pub fn move_by(tasks: &mut Vec<Task>, id: TaskId, delta: isize) -> bool {
    if delta == 0 {
        return false;
    }
    let Some(current) = index_of(tasks, id) else {
        return false;
    };
    let last = tasks.len() as isize - 1;
    let target = (current as isize).saturating_add(delta).clamp(0, last) as usize;
    if target == current {
        return false;
    }
    let task = tasks.remove(current);
    tasks.insert(target, task);
    true
}

/// Move the task at `from` so it lands before the item currently at
/// `to_offset` (offsets are measured before removal; `len` means the end).
pub fn move_to_offset(tasks: &mut Vec<Task>, from: usize, to_offset: usize) -> bool {
    if from >= tasks.len() {
        return false;
    }
    let to_offset = to_offset.min(tasks.len());
    let dest = if to_offset > from { to_offset - 1 } else { to_offset };
    if dest == from {
        return false;
    }
    let task = tasks.remove(from);
    tasks.insert(dest, task);
    true
}

/// Offset to pass to [`move_to_offset`] when a dragged row at `from`
/// enters the row at `to`: after the target when moving down, before it
/// when moving up.
pub fn drop_offset(from: usize, to: usize) -> usize {
    if to > from { to + 1 } else { to }
}
