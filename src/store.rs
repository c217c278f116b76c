//! The single owner of application state.
//!
//! Every mutation goes through [`TabStore::apply`], and every mutation that
//! changes the collection is handed to the store's [`Persist`] observer.

use tracing::debug;

use crate::io::tabs_io::JsonFile;
use crate::model::tab::{TabCollection, TabId};
use crate::model::task::{Task, TaskId};
use crate::ops::tab_ops;

/// A typed request to change the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    AddTask(String),
    DeleteTask(TaskId),
    ToggleTask(TaskId),
    /// Clamp-jump by `delta` positions
    MoveTask { id: TaskId, delta: isize },
    /// Index-pair move with insert-before-offset semantics
    MoveTaskToOffset { from: usize, to_offset: usize },
    AddTab(String),
    CloseTab(TabId),
    SelectTab(TabId),
    SelectTabRelative(isize),
}

/// What `apply` did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Unchanged,
    Changed,
    TaskAdded(TaskId),
    /// The deleted task used to sit at `index`
    TaskDeleted { index: usize },
    TabAdded(TabId),
}

impl Outcome {
    pub fn changed(self) -> bool {
        self != Outcome::Unchanged
    }
}

/// Observer notified with the full state after each change. Implementations
/// must not fail loudly: persistence is best-effort.
///
/// Each `apply` calls `refresh`, then `save` if the intent changed anything,
/// then `release`.
pub trait Persist {
    /// State someone else wrote since our last save. The intent is applied
    /// on top of it so their change survives our write.
    fn refresh(&mut self) -> Option<TabCollection> {
        None
    }

    fn save(&mut self, collection: &TabCollection);

    /// End of one `apply`, whether or not it saved
    fn release(&mut self) {}
}

/// Discards every change
#[derive(Debug, Default)]
pub struct NoPersist;

impl Persist for NoPersist {
    fn save(&mut self, _collection: &TabCollection) {}
}

pub struct TabStore<P: Persist = JsonFile> {
    collection: TabCollection,
    persist: P,
    /// Set when `apply` picked up an external change
    rebased: bool,
}

impl<P: Persist> TabStore<P> {
    pub fn new(collection: TabCollection, persist: P) -> Self {
        TabStore {
            collection,
            persist,
            rebased: false,
        }
    }

    pub fn collection(&self) -> &TabCollection {
        &self.collection
    }

    /// Tasks of the selected tab
    pub fn tasks(&self) -> &[Task] {
        self.collection.tasks()
    }

    pub fn task_ids(&self) -> Vec<TaskId> {
        self.tasks().iter().map(|t| t.id).collect()
    }

    pub fn persist(&self) -> &P {
        &self.persist
    }

    pub fn persist_mut(&mut self) -> &mut P {
        &mut self.persist
    }

    pub fn apply(&mut self, intent: Intent) -> Outcome {
        if let Some(newer) = self.persist.refresh() {
            debug!("rebasing on external change");
            self.collection = newer;
            self.rebased = true;
        }

        let c = &mut self.collection;
        let outcome = match &intent {
            Intent::AddTask(title) => tab_ops::add_task(c, title)
                .map_or(Outcome::Unchanged, Outcome::TaskAdded),
            Intent::DeleteTask(id) => tab_ops::delete_task(c, *id)
                .map_or(Outcome::Unchanged, |index| Outcome::TaskDeleted { index }),
            Intent::ToggleTask(id) => changed(tab_ops::toggle_task(c, *id)),
            Intent::MoveTask { id, delta } => changed(tab_ops::move_task(c, *id, *delta)),
            Intent::MoveTaskToOffset { from, to_offset } => {
                changed(tab_ops::move_task_to_offset(c, *from, *to_offset))
            }
            Intent::AddTab(base) => Outcome::TabAdded(tab_ops::add_tab(c, base)),
            Intent::CloseTab(id) => changed(tab_ops::close_tab(c, *id)),
            Intent::SelectTab(id) => changed(tab_ops::select_tab(c, *id)),
            Intent::SelectTabRelative(delta) => changed(tab_ops::select_relative(c, *delta)),
        };

        if outcome.changed() {
            debug!(?intent, ?outcome, "store changed");
            self.persist.save(&self.collection);
        }
        self.persist.release();
        outcome
    }

    /// Whether an `apply` since the last call swapped in external state
    pub fn take_rebased(&mut self) -> bool {
        std::mem::take(&mut self.rebased)
    }

    /// Swap in state loaded from elsewhere (an external edit of the file).
    /// Not persisted back.
    pub fn replace(&mut self, collection: TabCollection) {
        self.collection = collection;
    }
}

fn changed(did_change: bool) -> Outcome {
    if did_change {
        Outcome::Changed
    } else {
        Outcome::Unchanged
    }
}
