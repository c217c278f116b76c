use std::error::Error;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::cli::commands::*;
use crate::cli::output::*;
use crate::io::config_io;
use crate::io::lock::FileLock;
use crate::io::paths;
use crate::io::tabs_io::{self, StorageError};
use crate::model::tab::{NEW_TAB_BASE_NAME, TabCollection, TabId};
use crate::model::task::{Task, TaskId};
use crate::store::{Intent, Outcome, Persist, TabStore};

type CmdResult = Result<(), Box<dyn Error>>;

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn dispatch(cli: Cli) -> CmdResult {
    let json = cli.json;
    let data_dir = paths::data_dir(cli.data_dir.as_deref());
    debug!(data_dir = %data_dir.display(), "cli");

    let Some(cmd) = cli.command else {
        return Ok(());
    };
    match cmd {
        // Read commands
        Commands::List(args) => cmd_list(&data_dir, args, json),
        Commands::Tabs => cmd_tabs(&data_dir, json),

        // Write commands
        Commands::Add(args) => cmd_add(&data_dir, args, json),
        Commands::Done(args) => cmd_done(&data_dir, args, json),
        Commands::Rm(args) => cmd_rm(&data_dir, args, json),
        Commands::Mv(args) => cmd_mv(&data_dir, args, json),
        Commands::Tab(cmd) => match cmd.action {
            TabAction::Add(args) => cmd_tab_add(&data_dir, args, json),
            TabAction::Close(args) => cmd_tab_close(&data_dir, args),
            TabAction::Select(args) => cmd_tab_select(&data_dir, args),
        },

        Commands::Opacity(args) => cmd_opacity(args, json),
    }
}

// ---------------------------------------------------------------------------
// Write session
// ---------------------------------------------------------------------------

/// Records that the store changed. The session writes once at the end so
/// a failed write becomes a command error instead of being dropped.
#[derive(Default)]
struct Batch {
    dirty: bool,
}

impl Persist for Batch {
    fn save(&mut self, _collection: &TabCollection) {
        self.dirty = true;
    }
}

/// Load-modify-save cycle under the data-dir lock
struct Session {
    _lock: FileLock,
    path: PathBuf,
    loaded: TabCollection,
    store: TabStore<Batch>,
}

impl Session {
    fn open(data_dir: &Path) -> Result<Self, Box<dyn Error>> {
        let lock = FileLock::acquire_default(data_dir)?;
        let path = tabs_io::tabs_path(data_dir);
        let loaded = tabs_io::load_or_default(&path);
        Ok(Session {
            _lock: lock,
            path,
            store: TabStore::new(loaded.clone(), Batch::default()),
            loaded,
        })
    }

    /// Write the file if anything actually changed
    fn commit(self) -> Result<(), StorageError> {
        if self.store.persist().dirty && self.store.collection() != &self.loaded {
            tabs_io::write_collection(&self.path, self.store.collection())?;
        }
        Ok(())
    }
}

/// Run `f` with `tab` selected, then restore the previous selection
fn in_tab<T>(
    store: &mut TabStore<Batch>,
    tab: TabId,
    f: impl FnOnce(&mut TabStore<Batch>) -> T,
) -> T {
    let original = store.collection().selected_tab_id();
    store.apply(Intent::SelectTab(tab));
    let out = f(store);
    store.apply(Intent::SelectTab(original));
    out
}

// ---------------------------------------------------------------------------
// Lookups
// ---------------------------------------------------------------------------

/// Named tab, or the selected one
fn resolve_tab(collection: &TabCollection, name: Option<&str>) -> Result<TabId, Box<dyn Error>> {
    match name {
        None => Ok(collection.selected_tab_id()),
        Some(name) => collection
            .find_by_name(name)
            .map(|t| t.id)
            .ok_or_else(|| format!("no tab named '{}'", name).into()),
    }
}

/// Shortest id prefix accepted, so small numbers never match ids by accident
const MIN_ID_PREFIX: usize = 4;

/// A task by 1-based position, else by id prefix
fn resolve_task(tasks: &[Task], reference: &str) -> Result<TaskId, Box<dyn Error>> {
    if let Ok(pos) = reference.parse::<usize>()
        && (1..=tasks.len()).contains(&pos)
    {
        return Ok(tasks[pos - 1].id);
    }
    if reference.len() < MIN_ID_PREFIX {
        return Err(format!("no task '{}'", reference).into());
    }
    let matches: Vec<&Task> = tasks
        .iter()
        .filter(|t| t.id.matches_prefix(reference))
        .collect();
    match matches.as_slice() {
        [task] => Ok(task.id),
        [] => Err(format!("no task '{}'", reference).into()),
        _ => Err(format!("task id prefix '{}' is ambiguous", reference).into()),
    }
}

fn find_task(collection: &TabCollection, tab: TabId, id: TaskId) -> Option<(usize, &Task)> {
    let idx = collection.index_of(tab)?;
    collection.tabs()[idx]
        .tasks
        .iter()
        .enumerate()
        .find(|(_, t)| t.id == id)
        .map(|(i, t)| (i + 1, t))
}

fn print_task(tab: TabId, collection: &TabCollection, id: TaskId, verb: &str, json: bool) -> CmdResult {
    if let Some((pos, task)) = find_task(collection, tab, id) {
        if json {
            println!("{}", serde_json::to_string_pretty(&task_to_json(pos, task))?);
        } else {
            println!("{}: {}", verb, format_task_line(pos, task).trim_start());
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Read commands
// ---------------------------------------------------------------------------

fn load_read_only(data_dir: &Path) -> TabCollection {
    tabs_io::load_or_default(&tabs_io::tabs_path(data_dir))
}

fn cmd_list(data_dir: &Path, args: ListArgs, json: bool) -> CmdResult {
    let collection = load_read_only(data_dir);
    let tab_id = resolve_tab(&collection, args.tab.as_deref())?;
    let tab = &collection.tabs()[collection.index_of(tab_id).unwrap_or(0)];

    if json {
        let out = TaskListJson {
            tab: tab.name.clone(),
            tasks: tab
                .tasks
                .iter()
                .enumerate()
                .map(|(i, t)| task_to_json(i + 1, t))
                .collect(),
        };
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else if tab.tasks.is_empty() {
        println!("{}: no tasks", tab.name);
    } else {
        println!("{}", tab.name);
        for (i, task) in tab.tasks.iter().enumerate() {
            println!("{}", format_task_line(i + 1, task));
        }
    }
    Ok(())
}

fn cmd_tabs(data_dir: &Path, json: bool) -> CmdResult {
    let collection = load_read_only(data_dir);
    let selected = collection.selected_tab_id();

    if json {
        let tabs: Vec<TabJson> = collection
            .tabs()
            .iter()
            .map(|t| tab_to_json(t, t.id == selected))
            .collect();
        println!("{}", serde_json::to_string_pretty(&tabs)?);
    } else {
        for tab in collection.tabs() {
            println!("{}", format_tab_line(tab, tab.id == selected));
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Task commands
// ---------------------------------------------------------------------------

fn cmd_add(data_dir: &Path, args: AddArgs, json: bool) -> CmdResult {
    let mut session = Session::open(data_dir)?;
    let tab = resolve_tab(session.store.collection(), args.tab.as_deref())?;
    let title = args.title.join(" ");

    let outcome = in_tab(&mut session.store, tab, |s| s.apply(Intent::AddTask(title)));
    let Outcome::TaskAdded(id) = outcome else {
        return Err("task title is empty".into());
    };
    print_task(tab, session.store.collection(), id, "added", json)?;
    session.commit()?;
    Ok(())
}

fn cmd_done(data_dir: &Path, args: TaskRef, json: bool) -> CmdResult {
    let mut session = Session::open(data_dir)?;
    let tab = resolve_tab(session.store.collection(), args.tab.as_deref())?;

    let id = in_tab(&mut session.store, tab, |s| {
        let id = resolve_task(s.tasks(), &args.task)?;
        s.apply(Intent::ToggleTask(id));
        Ok::<_, Box<dyn Error>>(id)
    })?;
    let is_done = find_task(session.store.collection(), tab, id).is_some_and(|(_, t)| t.is_done);
    let verb = if is_done { "done" } else { "not done" };
    print_task(tab, session.store.collection(), id, verb, json)?;
    session.commit()?;
    Ok(())
}

fn cmd_rm(data_dir: &Path, args: TaskRef, json: bool) -> CmdResult {
    let mut session = Session::open(data_dir)?;
    let tab = resolve_tab(session.store.collection(), args.tab.as_deref())?;

    let removed = in_tab(&mut session.store, tab, |s| {
        let id = resolve_task(s.tasks(), &args.task)?;
        let (pos, task) = s
            .tasks()
            .iter()
            .enumerate()
            .find(|(_, t)| t.id == id)
            .map(|(i, t)| (i + 1, t.clone()))
            .ok_or("task vanished")?;
        s.apply(Intent::DeleteTask(id));
        Ok::<_, Box<dyn Error>>((pos, task))
    })?;
    session.commit()?;

    let (pos, task) = removed;
    if json {
        println!("{}", serde_json::to_string_pretty(&task_to_json(pos, &task))?);
    } else {
        println!("deleted: {}", format_task_line(pos, &task).trim_start());
    }
    Ok(())
}

fn cmd_mv(data_dir: &Path, args: MvArgs, json: bool) -> CmdResult {
    let mut session = Session::open(data_dir)?;
    let tab = resolve_tab(session.store.collection(), args.tab.as_deref())?;

    let id = in_tab(&mut session.store, tab, |s| {
        let id = resolve_task(s.tasks(), &args.task)?;
        s.apply(Intent::MoveTask { id, delta: args.by });
        Ok::<_, Box<dyn Error>>(id)
    })?;
    print_task(tab, session.store.collection(), id, "moved", json)?;
    session.commit()?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Tab commands
// ---------------------------------------------------------------------------

fn cmd_tab_add(data_dir: &Path, args: TabAddArgs, json: bool) -> CmdResult {
    let mut session = Session::open(data_dir)?;
    let base = args.name.as_deref().map(str::trim).unwrap_or(NEW_TAB_BASE_NAME);
    if base.is_empty() {
        return Err("tab name is empty".into());
    }
    let Outcome::TabAdded(id) = session.store.apply(Intent::AddTab(base.to_string())) else {
        return Err("could not add tab".into());
    };
    let collection = session.store.collection();
    let tab = &collection.tabs()[collection.index_of(id).unwrap_or(0)];
    let name = tab.name.clone();
    let tab_json = tab_to_json(tab, true);
    session.commit()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&tab_json)?);
    } else {
        println!("added tab: {}", name);
    }
    Ok(())
}

fn cmd_tab_close(data_dir: &Path, args: TabNameArg) -> CmdResult {
    let mut session = Session::open(data_dir)?;
    let tab = resolve_tab(session.store.collection(), Some(&args.name))?;
    if session.store.collection().tabs().len() < 2 {
        return Err("can't close the only tab".into());
    }
    session.store.apply(Intent::CloseTab(tab));
    session.commit()?;
    println!("closed tab: {}", args.name);
    Ok(())
}

fn cmd_tab_select(data_dir: &Path, args: TabNameArg) -> CmdResult {
    let mut session = Session::open(data_dir)?;
    let tab = resolve_tab(session.store.collection(), Some(&args.name))?;
    session.store.apply(Intent::SelectTab(tab));
    session.commit()?;
    println!("selected tab: {}", args.name);
    Ok(())
}

// ---------------------------------------------------------------------------
// Settings
// ---------------------------------------------------------------------------

fn cmd_opacity(args: OpacityArgs, json: bool) -> CmdResult {
    let config_dir = paths::config_dir();
    let opacity = match args.value {
        Some(value) => config_io::set_opacity(&config_dir, value)?,
        None => config_io::read_config(&config_dir)?.ui.effective_opacity(),
    };
    if json {
        println!("{}", serde_json::to_string_pretty(&OpacityJson { opacity })?);
    } else {
        println!("opacity: {:.2}", opacity);
    }
    Ok(())
}
