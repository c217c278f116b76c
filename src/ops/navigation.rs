//! Pure selection arithmetic over an ordered id list.

use crate::model::task::TaskId;

/// Step the selection by `direction` (+1 next, -1 previous).
///
/// - empty list: selection unchanged
/// - nothing selected: first id going forward, last id going backward
/// - selection not in the list: first id
/// - otherwise: neighbour in that direction, saturating at the ends
pub fn step_selection(ids: &[TaskId], current: Option<TaskId>, direction: isize) -> Option<TaskId> {
    if ids.is_empty() {
        return current;
    }
    let Some(current) = current else {
        return if direction > 0 {
            ids.first().copied()
        } else {
            ids.last().copied()
        };
    };
    let Some(idx) = ids.iter().position(|id| *id == current) else {
        return ids.first().copied();
    };
    let last = ids.len() as isize - 1;
    let new_idx = (idx as isize).saturating_add(direction).clamp(0, last) as usize;
    Some(ids[new_idx])
}

/// Selection after the task at `removed_index` was deleted: whatever now
/// sits at that index (or the new last task), or nothing for an empty list.
pub fn selection_after_delete(ids_after: &[TaskId], removed_index: usize) -> Option<TaskId> {
    if ids_after.is_empty() {
        return None;
    }
    Some(ids_after[removed_index.min(ids_after.len() - 1)])
}
