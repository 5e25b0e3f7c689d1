//! snapp: Markdown notes with a live heading outline.
#![allow(clippy::multiple_crate_versions)]

use clap::Parser;
use edtui::{EditorEventHandler, EditorMode};
use ratatui::crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use snapp::app_state::{AppState, Pane, Shortcut, View};
use snapp::navigation::Location;
use snapp::shortcuts::{chord_from_key_event, ShortcutRegistry, TerminalKeys};
use snapp::store::{JsonNoteStore, MemoryNoteStore, NoteStore};
use snapp::{config, ui};
use std::fs::OpenOptions;
use std::io;
use std::path::PathBuf;

type Shortcuts = ShortcutRegistry<Shortcut, TerminalKeys>;

#[derive(Parser)]
#[command(name = "snapp")]
#[command(about = "Three-pane Markdown note taking in the terminal", long_about = None)]
struct Args {
    /// Notebook file (overrides `store_path` from snapp.toml)
    #[arg(long, value_name = "PATH")]
    store: Option<PathBuf>,

    /// Keep notes in memory for this session only
    #[arg(long, conflicts_with = "store")]
    scratch: bool,

    /// Note and line to open, e.g. "?note=2&line=10"
    #[arg(long, value_name = "QUERY")]
    location: Option<String>,

    /// Maximum visible characters in search snippets
    #[arg(long, value_name = "CHARS")]
    snippet_budget: Option<usize>,
}

fn main() -> io::Result<()> {
    let args = Args::parse();
    let mut cfg = config::Config::load();

    // Override config with command line args
    if let Some(budget) = args.snippet_budget {
        cfg.snippet_budget = budget;
    }

    init_logging(&cfg)?;

    let store: Box<dyn NoteStore> = if args.scratch {
        Box::new(MemoryNoteStore::with_welcome())
    } else {
        let path = args
            .store
            .unwrap_or_else(|| PathBuf::from(&cfg.store_path));
        Box::new(JsonNoteStore::open(path)?)
    };

    let mut state = AppState::new(store, cfg.snippet_options())?;

    if let Some(query) = args.location {
        state.open_location(Location::parse(&query));
    }

    run_tui(state)
}

/// Logs go to the configured file, filtered by `RUST_LOG` (default `info`).
///
/// Without a log file nothing is logged, since stderr would draw over the TUI.
fn init_logging(cfg: &config::Config) -> io::Result<()> {
    if cfg.log_file.is_empty() {
        return Ok(());
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&cfg.log_file)?;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .try_init()
        .map_err(io::Error::other)
}

fn run_tui(mut app: AppState) -> io::Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut shortcuts = Shortcuts::new(TerminalKeys::default());
    for (chord, action) in [
        ("Ctrl+S", Shortcut::Save),
        ("Ctrl+N", Shortcut::NewNote),
        ("Ctrl+F", Shortcut::Search),
        ("Ctrl+Q", Shortcut::Quit),
        ("Tab", Shortcut::NextPane),
        ("Shift+Tab", Shortcut::PrevPane),
    ] {
        shortcuts.subscribe(chord, action);
    }

    let mut editor_handler = EditorEventHandler::default();

    let result = run_app(&mut terminal, &mut app, &shortcuts, &mut editor_handler);

    shortcuts.clear();
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(e) = result {
        eprintln!("Error: {e}");
    } else {
        let discarded = app.tree.dirty_ids().len();
        if discarded > 0 {
            println!("{} notes, {discarded} with unsaved changes discarded", app.tree.len());
        } else {
            println!("{} notes", app.tree.len());
        }
    }

    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut AppState,
    shortcuts: &Shortcuts,
    editor_handler: &mut EditorEventHandler,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui::draw(f, app))?;

        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            handle_key(app, shortcuts, editor_handler, key);
            if app.should_quit {
                return Ok(());
            }
        }
    }
}

fn handle_key(
    app: &mut AppState,
    shortcuts: &Shortcuts,
    editor_handler: &mut EditorEventHandler,
    key: KeyEvent,
) {
    if let Some(chord) = chord_from_key_event(&key) {
        if app.accepts_shortcut(&chord) {
            let actions = shortcuts.dispatch(&chord);
            if !actions.is_empty() {
                for action in actions {
                    app.apply_shortcut(action);
                }
                return;
            }
        }
    }

    match app.current_view {
        View::Command => match key.code {
            KeyCode::Char(c) => app.command_buffer.push(c),
            KeyCode::Backspace => {
                app.command_buffer.pop();
            }
            KeyCode::Enter => {
                let cmd = std::mem::take(&mut app.command_buffer);
                app.current_view = View::Normal; // Always return to Normal view
                app.execute_command(&cmd);
            }
            KeyCode::Esc => {
                app.current_view = View::Normal;
                app.command_buffer.clear();
            }
            _ => {}
        },
        View::SearchInput => match key.code {
            KeyCode::Char(c) => app.command_buffer.push(c),
            KeyCode::Backspace => {
                app.command_buffer.pop();
            }
            KeyCode::Enter => {
                let query = std::mem::take(&mut app.command_buffer);
                if query.is_empty() {
                    app.current_view = View::Normal;
                } else {
                    app.run_search(&query);
                }
            }
            KeyCode::Esc => {
                app.current_view = View::Normal;
                app.command_buffer.clear();
            }
            _ => {}
        },
        View::SearchResults => match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                app.search_index = app.search_index.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if app.search_index + 1 < app.search_results.len() {
                    app.search_index += 1;
                }
            }
            KeyCode::Enter => app.open_search_hit(app.search_index),
            KeyCode::Char('/') => app.apply_shortcut(Shortcut::Search),
            KeyCode::Esc | KeyCode::Char('q') => app.close_search(),
            _ => {}
        },
        View::Normal => {
            app.message = None;
            match app.focus {
                Pane::Tree => handle_tree_key(app, key),
                Pane::Outline => handle_outline_key(app, key),
                Pane::Editor => handle_editor_key(app, editor_handler, key),
            }
        }
    }
}

fn handle_tree_key(app: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') => app.request_quit(false),
        KeyCode::Up | KeyCode::Char('k') => app.select_prev(),
        KeyCode::Down | KeyCode::Char('j') => app.select_next(),
        KeyCode::Enter | KeyCode::Right | KeyCode::Char('l') => {
            if app.editor_state.is_some() {
                app.focus = Pane::Editor;
            }
        }
        KeyCode::Char('n') => app.begin_command("new "),
        KeyCode::Char('r') => app.begin_command("rename "),
        KeyCode::Char('d') => app.begin_command("delete"),
        KeyCode::Char('/') => app.apply_shortcut(Shortcut::Search),
        KeyCode::Char(':') => app.begin_command(""),
        _ => {}
    }
}

fn handle_outline_key(app: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Up | KeyCode::Char('k') => app.outline_up(),
        KeyCode::Down | KeyCode::Char('j') => app.outline_down(),
        KeyCode::Enter => app.jump_to_heading(app.outline_index),
        KeyCode::Left | KeyCode::Char('h') => app.focus = Pane::Editor,
        KeyCode::Esc => app.focus = Pane::Tree,
        KeyCode::Char(':') => app.begin_command(""),
        _ => {}
    }
}

fn handle_editor_key(app: &mut AppState, editor_handler: &mut EditorEventHandler, key: KeyEvent) {
    let in_normal_mode = app
        .editor_state
        .as_ref()
        .is_some_and(|es| es.mode == EditorMode::Normal);

    match key.code {
        KeyCode::Char(':') if in_normal_mode => app.begin_command(""),
        KeyCode::Esc if in_normal_mode => app.focus = Pane::Tree,
        _ => {
            if let Some(ref mut editor_state) = app.editor_state {
                editor_handler.on_key_event(key, editor_state);
            }
            app.sync_editor();
        }
    }
}
