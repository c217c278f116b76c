use std::path::{Path, PathBuf};
use std::sync::mpsc;

use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};

use crate::io::tabs_io::TABS_FILE;

/// Events sent from the file watcher to the TUI event loop.
#[derive(Debug)]
pub enum FileEvent {
    /// tabs.json was created, modified, replaced or removed
    TabsChanged,
}

/// Watches the data directory for edits to tabs.json made by other
/// processes (usually the CLI).
pub struct DataWatcher {
    _watcher: RecommendedWatcher,
    rx: mpsc::Receiver<FileEvent>,
}

impl DataWatcher {
    /// Start watching `data_dir`. Call `poll()` each tick.
    pub fn start(data_dir: &Path) -> Result<Self, notify::Error> {
        let (tx, rx) = mpsc::channel();

        let mut watcher = RecommendedWatcher::new(
            move |result: Result<Event, notify::Error>| {
                let Ok(event) = result else {
                    return;
                };
                if is_tabs_event(&event.kind, &event.paths) {
                    let _ = tx.send(FileEvent::TabsChanged);
                }
            },
            Config::default(),
        )?;

        watcher.watch(data_dir, RecursiveMode::NonRecursive)?;
        Ok(DataWatcher {
            _watcher: watcher,
            rx,
        })
    }

    /// Non-blocking poll. Multiple queued events collapse into one.
    pub fn poll(&self) -> Option<FileEvent> {
        let mut latest = None;
        while let Ok(evt) = self.rx.try_recv() {
            latest = Some(evt);
        }
        latest
    }
}

/// Only creates, modifications and removes of tabs.json itself matter.
/// Atomic writes show up as a create/rename targeting tabs.json; the temp
/// file and `.lock` are ignored.
fn is_tabs_event(kind: &EventKind, paths: &[PathBuf]) -> bool {
    if !matches!(
        kind,
        EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_)
    ) {
        return false;
    }
    paths
        .iter()
        .any(|p| p.file_name().and_then(|n| n.to_str()) == Some(TABS_FILE))
}
