use std::io;
use std::path::Path;
use std::time::{Duration, Instant};

use crossterm::event::{
    self, DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
    Event, KeyEventKind, KeyboardEnhancementFlags, PopKeyboardEnhancementFlags,
    PushKeyboardEnhancementFlags,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
    supports_keyboard_enhancement,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::Rect;
use tracing::{debug, info, warn};

use crate::io::config_io::load_config_or_default;
use crate::io::tabs_io::JsonFile;
use crate::io::watcher::DataWatcher;
use crate::io::{log, paths};
use crate::model::tab::{NEW_TAB_BASE_NAME, TabCollection, TabId};
use crate::model::task::{Task, TaskId};
use crate::ops::navigation;
use crate::store::{Intent, Outcome, Persist, TabStore};

use super::draft::Draft;
use super::input;
use super::render;
use super::theme::Theme;

/// A first Ctrl+W on a non-empty tab, waiting for the second press
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CloseConfirm {
    pub tab_id: TabId,
    pub armed_at: Instant,
}

/// A row being dragged with the mouse
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DragState {
    pub task_id: TaskId,
}

/// A task row as last drawn, for mouse hit-testing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowHit {
    pub area: Rect,
    pub task_id: TaskId,
    /// Columns of the toggle / delete glyphs, when shown
    pub toggle_col: Option<u16>,
    pub delete_col: Option<u16>,
}

/// Screen regions recorded during the last render
#[derive(Debug, Clone, Default)]
pub struct HitMap {
    pub tabs: Vec<(Rect, TabId)>,
    pub rows: Vec<RowHit>,
    pub entry: Option<Rect>,
}

fn contains(area: Rect, col: u16, row: u16) -> bool {
    col >= area.x && col < area.x + area.width && row >= area.y && row < area.y + area.height
}

impl HitMap {
    pub fn tab_at(&self, col: u16, row: u16) -> Option<TabId> {
        self.tabs
            .iter()
            .find(|(area, _)| contains(*area, col, row))
            .map(|(_, id)| *id)
    }

    pub fn row_at(&self, col: u16, row: u16) -> Option<&RowHit> {
        self.rows.iter().find(|hit| contains(hit.area, col, row))
    }

    pub fn in_entry(&self, col: u16, row: u16) -> bool {
        self.entry.is_some_and(|area| contains(area, col, row))
    }
}

/// Main application state
pub struct App<P: Persist = JsonFile> {
    pub store: TabStore<P>,
    pub theme: Theme,
    /// Highlighted task in the selected tab
    pub selection: Option<TaskId>,
    pub draft: Draft,
    pub input_focused: bool,
    pub hover: Option<TaskId>,
    pub drag: Option<DragState>,
    pub close_confirm: Option<CloseConfirm>,
    /// How long a close confirmation stays armed
    pub confirm_window: Duration,
    /// First visible row of the task list
    pub list_scroll: usize,
    pub hit_map: HitMap,
    pub should_quit: bool,
}

impl<P: Persist> App<P> {
    pub fn new(store: TabStore<P>, theme: Theme) -> Self {
        App {
            store,
            theme,
            selection: None,
            draft: Draft::default(),
            input_focused: true,
            hover: None,
            drag: None,
            close_confirm: None,
            confirm_window: Duration::from_secs(3),
            list_scroll: 0,
            hit_map: HitMap::default(),
            should_quit: false,
        }
    }

    pub fn collection(&self) -> &TabCollection {
        self.store.collection()
    }

    pub fn tasks(&self) -> &[Task] {
        self.store.tasks()
    }

    /// Run an intent. If the store picked up an external change first, drop
    /// ui state that points at tasks or tabs that are gone.
    fn apply(&mut self, intent: Intent) -> Outcome {
        let outcome = self.store.apply(intent);
        if self.store.take_rebased() {
            info!("tabs.json changed on disk, applied on top of it");
            self.repair_after_reload();
        }
        outcome
    }

    /// The selection, if it still names a task in the selected tab
    pub fn selected_task(&self) -> Option<&Task> {
        let id = self.selection?;
        self.tasks().iter().find(|t| t.id == id)
    }

    // -----------------------------------------------------------------------
    // Task intents
    // -----------------------------------------------------------------------

    /// Commit the draft as a new task. A blank draft just refocuses the field.
    pub fn commit_draft(&mut self) {
        self.input_focused = true;
        if self.draft.is_blank() {
            return;
        }
        let title = self.draft.take();
        self.apply(Intent::AddTask(title));
    }

    /// Clear the draft and put focus in the field
    pub fn begin_new_task(&mut self) {
        self.draft.clear();
        self.input_focused = true;
    }

    /// Delete a task. When it was the selection, the selection moves to the
    /// task now at the same index.
    pub fn delete_task(&mut self, id: TaskId) {
        if let Outcome::TaskDeleted { index } = self.apply(Intent::DeleteTask(id)) {
            if self.selection == Some(id) {
                self.selection = navigation::selection_after_delete(&self.store.task_ids(), index);
            }
            if self.hover == Some(id) {
                self.hover = None;
            }
        }
    }

    pub fn delete_selected(&mut self) {
        if let Some(id) = self.selection {
            self.delete_task(id);
        }
    }

    pub fn toggle_task(&mut self, id: TaskId) {
        self.apply(Intent::ToggleTask(id));
    }

    pub fn toggle_selected(&mut self) {
        if let Some(id) = self.selection {
            self.toggle_task(id);
        }
    }

    /// Step the selection through the list (+1 next, -1 previous)
    pub fn move_selection(&mut self, direction: isize) {
        let ids = self.store.task_ids();
        self.selection = navigation::step_selection(&ids, self.selection, direction);
        if !ids.is_empty() {
            self.input_focused = false;
        }
    }

    /// Reorder the selected task by `delta` positions
    pub fn move_selected(&mut self, delta: isize) {
        if let Some(id) = self.selection {
            self.apply(Intent::MoveTask { id, delta });
        }
    }

    // -----------------------------------------------------------------------
    // Drag reorder
    // -----------------------------------------------------------------------

    pub fn begin_drag(&mut self, id: TaskId) {
        self.drag = Some(DragState { task_id: id });
    }

    /// The dragged row entered `target`: move it there right away
    pub fn drag_enter(&mut self, target: TaskId) {
        let Some(drag) = self.drag else {
            return;
        };
        if drag.task_id == target {
            return;
        }
        let tasks = self.tasks();
        let from = tasks.iter().position(|t| t.id == drag.task_id);
        let to = tasks.iter().position(|t| t.id == target);
        if let (Some(from), Some(to)) = (from, to) {
            let to_offset = crate::ops::task_ops::drop_offset(from, to);
            self.apply(Intent::MoveTaskToOffset { from, to_offset });
        }
    }

    /// Finish the drag: the moved task becomes the selection
    pub fn drop_drag(&mut self) {
        if let Some(drag) = self.drag.take() {
            self.selection = Some(drag.task_id);
            self.input_focused = false;
        }
    }

    // -----------------------------------------------------------------------
    // Tab intents
    // -----------------------------------------------------------------------

    pub fn new_tab(&mut self) {
        if let Outcome::TabAdded(_) = self.apply(Intent::AddTab(NEW_TAB_BASE_NAME.into())) {
            self.after_tab_switch();
        }
    }

    pub fn select_tab(&mut self, id: TabId) {
        if self.apply(Intent::SelectTab(id)).changed() {
            self.after_tab_switch();
        }
    }

    pub fn switch_tab(&mut self, delta: isize) {
        if self.apply(Intent::SelectTabRelative(delta)).changed() {
            self.after_tab_switch();
        }
    }

    /// Ctrl+W. Empty tabs close at once; a tab with tasks needs a second
    /// press within the confirm window.
    pub fn request_close_tab(&mut self, now: Instant) {
        let collection = self.collection();
        if collection.tabs().len() < 2 {
            return;
        }
        let tab = collection.selected_tab();
        let tab_id = tab.id;
        let confirmed = self.close_confirm.is_some_and(|c| {
            c.tab_id == tab_id && now.duration_since(c.armed_at) < self.confirm_window
        });

        if tab.tasks.is_empty() || confirmed {
            self.close_confirm = None;
            if self.apply(Intent::CloseTab(tab_id)).changed() {
                self.after_tab_switch();
            }
        } else {
            self.close_confirm = Some(CloseConfirm {
                tab_id,
                armed_at: now,
            });
        }
    }

    /// Periodic housekeeping: expire the close confirmation
    pub fn tick(&mut self, now: Instant) {
        if let Some(c) = self.close_confirm
            && now.duration_since(c.armed_at) >= self.confirm_window
        {
            self.close_confirm = None;
        }
    }

    fn after_tab_switch(&mut self) {
        self.selection = None;
        self.hover = None;
        self.drag = None;
        self.list_scroll = 0;
        if self
            .close_confirm
            .is_some_and(|c| c.tab_id != self.collection().selected_tab_id())
        {
            self.close_confirm = None;
        }
    }

    /// Adopt state changed on disk by another process
    pub fn adopt_external(&mut self, collection: TabCollection) {
        self.store.replace(collection);
        self.repair_after_reload();
    }

    fn repair_after_reload(&mut self) {
        if self.selected_task().is_none() {
            self.selection = None;
        }
        if let Some(drag) = self.drag
            && !self.tasks().iter().any(|t| t.id == drag.task_id)
        {
            self.drag = None;
        }
        if let Some(c) = self.close_confirm
            && self.collection().index_of(c.tab_id).is_none()
        {
            self.close_confirm = None;
        }
    }
}

impl App<JsonFile> {
    /// Reload tabs.json if someone else rewrote it
    pub fn sync_external(&mut self) {
        if let Some(collection) = self.store.persist_mut().read_external_change() {
            info!("tabs.json changed on disk, reloading");
            self.adopt_external(collection);
        }
    }
}

/// Run the TUI application
pub fn run(data_dir: &Path) -> Result<(), Box<dyn std::error::Error>> {
    log::init_file_logging(data_dir);
    std::fs::create_dir_all(data_dir)?;

    let config = load_config_or_default(&paths::config_dir());
    let mut persist = JsonFile::new(data_dir);
    let collection = persist.load();
    let mut app = App::new(TabStore::new(collection, persist), Theme::from_config(&config.ui));
    app.confirm_window = config.ui.confirm_window();

    let watcher = match DataWatcher::start(data_dir) {
        Ok(w) => Some(w),
        Err(e) => {
            warn!(error = %e, "file watcher unavailable, external edits won't be picked up");
            None
        }
    };

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(
        stdout,
        EnterAlternateScreen,
        EnableMouseCapture,
        EnableBracketedPaste
    )?;

    // Kitty protocol distinguishes Ctrl+Enter from Enter
    let kitty = config.ui.kitty_keyboard.unwrap_or(true)
        && supports_keyboard_enhancement().unwrap_or(false);
    if kitty {
        execute!(
            stdout,
            PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES)
        )?;
    }
    debug!(kitty, "terminal ready");

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Install panic hook to restore terminal on panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let mut out = io::stdout();
        if kitty {
            let _ = execute!(out, PopKeyboardEnhancementFlags);
        }
        let _ = disable_raw_mode();
        let _ = execute!(
            out,
            DisableBracketedPaste,
            DisableMouseCapture,
            LeaveAlternateScreen
        );
        original_hook(panic_info);
    }));

    let result = run_event_loop(&mut terminal, &mut app, watcher.as_ref());

    // Restore terminal
    if kitty {
        execute!(terminal.backend_mut(), PopKeyboardEnhancementFlags)?;
    }
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableBracketedPaste,
        DisableMouseCapture,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;

    result
}

fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    watcher: Option<&DataWatcher>,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        terminal.draw(|frame| render::render(frame, app))?;

        if event::poll(Duration::from_millis(250))? {
            match event::read()? {
                Event::Key(key) if key.kind != KeyEventKind::Release => {
                    input::handle_key(app, key, Instant::now());
                }
                Event::Mouse(mouse) => input::handle_mouse(app, mouse),
                Event::Paste(text) => input::handle_paste(app, &text),
                _ => {}
            }
        }

        if watcher.and_then(DataWatcher::poll).is_some() {
            app.sync_external();
        }
        app.tick(Instant::now());

        if app.should_quit {
            break;
        }
    }
    Ok(())
}
