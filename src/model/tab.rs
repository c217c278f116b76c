use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::task::Task;

/// Name given to the tab created when no saved state exists
pub const DEFAULT_TAB_NAME: &str = "Home";

/// Base name used by "new tab"
pub const NEW_TAB_BASE_NAME: &str = "Tab";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TabId(Uuid);

impl TabId {
    pub fn new() -> Self {
        TabId(Uuid::new_v4())
    }
}

impl Default for TabId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TabId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TabId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(TabId)
    }
}

/// A named, independently ordered task list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tab {
    pub id: TabId,
    pub name: String,
    #[serde(default)]
    pub tasks: Vec<Task>,
}

impl Tab {
    pub fn new(name: impl Into<String>) -> Self {
        Tab {
            id: TabId::new(),
            name: name.into(),
            tasks: Vec::new(),
        }
    }
}

/// Every tab plus the active-tab pointer. This is the whole persisted
/// document.
///
/// Invariants: `tabs` is never empty and `selected_tab_id` names one of
/// them. Deserialization enforces both (an empty list is rejected, a
/// dangling selection is repaired to the first tab).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawCollection")]
pub struct TabCollection {
    tabs: Vec<Tab>,
    #[serde(rename = "selectedTabID")]
    selected_tab_id: TabId,
}

/// Unvalidated shape of the persisted document
#[derive(Deserialize)]
struct RawCollection {
    tabs: Vec<Tab>,
    #[serde(rename = "selectedTabID")]
    selected_tab_id: Option<TabId>,
}

/// Why a persisted document could not become a collection
#[derive(Debug, thiserror::Error)]
pub enum CollectionError {
    #[error("document contains no tabs")]
    NoTabs,
}

impl TryFrom<RawCollection> for TabCollection {
    type Error = CollectionError;

    fn try_from(raw: RawCollection) -> Result<Self, Self::Error> {
        let first = raw.tabs.first().ok_or(CollectionError::NoTabs)?.id;
        let selected = raw
            .selected_tab_id
            .filter(|id| raw.tabs.iter().any(|t| t.id == *id))
            .unwrap_or(first);
        Ok(TabCollection {
            tabs: raw.tabs,
            selected_tab_id: selected,
        })
    }
}

impl Default for TabCollection {
    /// A single empty "Home" tab, selected
    fn default() -> Self {
        let home = Tab::new(DEFAULT_TAB_NAME);
        TabCollection {
            selected_tab_id: home.id,
            tabs: vec![home],
        }
    }
}

impl TabCollection {
    /// Build a collection from parts, enforcing the invariants.
    pub fn from_parts(tabs: Vec<Tab>, selected: TabId) -> Result<Self, CollectionError> {
        TabCollection::try_from(RawCollection {
            tabs,
            selected_tab_id: Some(selected),
        })
    }

    pub fn tabs(&self) -> &[Tab] {
        &self.tabs
    }

    pub fn selected_tab_id(&self) -> TabId {
        self.selected_tab_id
    }

    pub fn selected_index(&self) -> usize {
        self.index_of(self.selected_tab_id).unwrap_or(0)
    }

    pub fn selected_tab(&self) -> &Tab {
        &self.tabs[self.selected_index()]
    }

    pub fn selected_tab_mut(&mut self) -> &mut Tab {
        let idx = self.selected_index();
        &mut self.tabs[idx]
    }

    /// Tasks of the selected tab
    pub fn tasks(&self) -> &[Task] {
        &self.selected_tab().tasks
    }

    pub fn index_of(&self, id: TabId) -> Option<usize> {
        self.tabs.iter().position(|t| t.id == id)
    }

    pub fn find_by_name(&self, name: &str) -> Option<&Tab> {
        self.tabs.iter().find(|t| t.name == name)
    }

    // Mutation is restricted to ops::tab_ops so the invariants hold.

    pub(crate) fn tabs_mut(&mut self) -> &mut Vec<Tab> {
        &mut self.tabs
    }

    pub(crate) fn set_selected(&mut self, id: TabId) {
        self.selected_tab_id = id;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_single_home_tab() {
        let c = TabCollection::default();
        assert_eq!(c.tabs().len(), 1);
        assert_eq!(c.selected_tab().name, "Home");
        assert_eq!(c.selected_tab_id(), c.tabs()[0].id);
        assert!(c.tasks().is_empty());
    }

    #[test]
    fn serializes_with_selected_tab_id_key() {
        let c = TabCollection::default();
        let json = serde_json::to_value(&c).unwrap();
        assert_eq!(json["selectedTabID"], c.selected_tab_id().to_string());
        assert_eq!(json["tabs"][0]["name"], "Home");
        assert!(json["tabs"][0]["tasks"].as_array().unwrap().is_empty());
    }

    #[test]
    fn empty_tab_list_is_rejected() {
        let json = r#"{"tabs":[],"selectedTabID":"e621e1f8-c36c-495a-93fc-0c247a3e6e5f"}"#;
        assert!(serde_json::from_str::<TabCollection>(json).is_err());
    }

    #[test]
    fn dangling_selection_is_repaired() {
        let json = r#"{
            "tabs": [
                {"id":"11111111-1111-4111-8111-111111111111","name":"A","tasks":[]},
                {"id":"22222222-2222-4222-8222-222222222222","name":"B","tasks":[]}
            ],
            "selectedTabID":"e621e1f8-c36c-495a-93fc-0c247a3e6e5f"
        }"#;
        let c: TabCollection = serde_json::from_str(json).unwrap();
        assert_eq!(c.selected_tab().name, "A");
    }

    #[test]
    fn missing_tasks_field_defaults_to_empty() {
        let json = r#"{
            "tabs": [{"id":"11111111-1111-4111-8111-111111111111","name":"A"}],
            "selectedTabID":"11111111-1111-4111-8111-111111111111"
        }"#;
        let c: TabCollection = serde_json::from_str(json).unwrap();
        assert!(c.tasks().is_empty());
    }
}
