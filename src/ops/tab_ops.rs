use crate::model::tab::{Tab, TabCollection, TabId};
use crate::model::task::TaskId;
use crate::ops::task_ops;

// ---------------------------------------------------------------------------
// Tab structure
// ---------------------------------------------------------------------------

/// Pick a name not used by any existing tab: `base`, then `base 2`,
/// `base 3`, ...
pub fn unique_tab_name(collection: &TabCollection, base: &str) -> String {
    let taken = |name: &str| collection.tabs().iter().any(|t| t.name == name);
    if !taken(base) {
        return base.to_string();
    }
    let mut n = 2;
    loop {
        let proposed = format!("{} {}", base, n);
        if !taken(&proposed) {
            return proposed;
        }
        n += 1;
    }
}

/// Append a new empty tab with a unique name and select it
pub fn add_tab(collection: &mut TabCollection, base_name: &str) -> TabId {
    let tab = Tab::new(unique_tab_name(collection, base_name));
    let id = tab.id;
    collection.tabs_mut().push(tab);
    collection.set_selected(id);
    id
}

/// Close a tab. The last remaining tab can't be closed. When the selected
/// tab goes away, the tab now at its index (or the new last tab) is
/// selected.
pub fn close_tab(collection: &mut TabCollection, id: TabId) -> bool {
    if collection.tabs().len() < 2 {
        return false;
    }
    let Some(idx) = collection.index_of(id) else {
        return false;
    };
    let was_selected = collection.selected_tab_id() == id;
    collection.tabs_mut().remove(idx);
    if was_selected {
        let remaining = collection.tabs().len();
        let new_id = collection.tabs()[idx.min(remaining - 1)].id;
        collection.set_selected(new_id);
    }
    true
}

pub fn select_tab(collection: &mut TabCollection, id: TabId) -> bool {
    if collection.selected_tab_id() == id || collection.index_of(id).is_none() {
        return false;
    }
    collection.set_selected(id);
    true
}

/// Select the tab `delta` positions away, stopping at the first/last tab
pub fn select_relative(collection: &mut TabCollection, delta: isize) -> bool {
    let last = collection.tabs().len() as isize - 1;
    let current = collection.selected_index() as isize;
    let target = current.saturating_add(delta).clamp(0, last) as usize;
    let id = collection.tabs()[target].id;
    select_tab(collection, id)
}

// ---------------------------------------------------------------------------
// Task operations, scoped to the selected tab
// ---------------------------------------------------------------------------

pub fn add_task(collection: &mut TabCollection, title: &str) -> Option<TaskId> {
    task_ops::add(&mut collection.selected_tab_mut().tasks, title)
}

pub fn delete_task(collection: &mut TabCollection, id: TaskId) -> Option<usize> {
    task_ops::delete(&mut collection.selected_tab_mut().tasks, id)
}

pub fn toggle_task(collection: &mut TabCollection, id: TaskId) -> bool {
    task_ops::toggle_done(&mut collection.selected_tab_mut().tasks, id)
}

pub fn move_task(collection: &mut TabCollection, id: TaskId, delta: isize) -> bool {
    task_ops::move_by(&mut collection.selected_tab_mut().tasks, id, delta)
}

pub fn move_task_to_offset(collection: &mut TabCollection, from: usize, to_offset: usize) -> bool {
    task_ops::move_to_offset(&mut collection.selected_tab_mut().tasks, from, to_offset)
}
