use std::io;
use std::mem;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::backend::CrosstermBackend;
use ratatui::{Frame, Terminal};

use crate::graph::filter::FilterSpec;
use crate::graph::model::Graph;
use crate::parser::config::Config;
use crate::tui::input::{self, Action};
use crate::tui::loader::{PendingLoad, Source};
use crate::tui::render::{self, ScreenData};
use crate::tui::state::{Derived, ViewState};
use crate::tui::view::{ConfirmAction, ViewMode};

const POLL_INTERVAL: Duration = Duration::from_millis(200);

#[derive(Debug)]
struct AppState {
    source: Source,
    snapshot: Graph,
    derived: Derived,
    view: ViewState,
    config: Config,
    pending: Option<PendingLoad>,
    load_error: Option<String>,
    status_message: Option<String>,
    viewport_height: usize,
}

impl AppState {
    fn new(source: Source, snapshot: Graph, config: Config) -> Self {
        let filter = FilterSpec {
            kind: config.type_filter,
            status: config.status_filter,
            search: String::new(),
        };
        let view = ViewState::new(config.start_view, filter);
        let derived = Derived::compute(&snapshot, &view.filter);
        let view = if config.start_collapsed {
            view.all_collapsed(&derived)
        } else {
            view.reconciled(&derived)
        };
        Self {
            source,
            snapshot,
            derived,
            view,
            config,
            pending: None,
            load_error: None,
            status_message: None,
            viewport_height: 0,
        }
    }

    fn draw(&mut self, frame: &mut Frame) {
        let height = render::main_pane(frame.area()).height as usize;
        if height != self.viewport_height {
            self.viewport_height = height;
            self.follow();
        }
        let data = ScreenData {
            mode: self.view.mode(),
            base_mode: self.view.base_mode(),
            forest: &self.derived.forest,
            filtered: &self.derived.graph,
            collapse: &self.view.collapse,
            focus: self.view.focus.as_deref(),
            scroll: self.view.scroll,
            relation_index: self.view.relation_index,
            status: status_line(&self.view, &self.derived, self.snapshot.nodes.len()),
            search: self.view.search_input.as_deref(),
            hints: self.config.show_hints.then(|| self.hints()),
            message: self.status_message.as_deref(),
            load_error: self.load_error.as_deref(),
            show_help: self.view.show_help,
        };
        render::draw(frame, &data);
    }

    fn hints(&self) -> &'static str {
        if self.view.show_help {
            return "[any key] close help";
        }
        if self.view.is_searching() {
            return "type to filter titles, [Backspace] delete, [Enter] keep, [Esc] clear";
        }
        match self.view.mode() {
            ViewMode::Graph => {
                "[hjkl/arrows] move  [Enter] fold/open  [Tab] view  [f] type  [s] status  [/] search  [r] reload  [q] quit"
            }
            ViewMode::Details if self.view.modes.depth() > 0 => {
                "[j/k] move  [Tab] view  [Esc] back  [q] quit"
            }
            ViewMode::Details => "[j/k] move  [Tab] view  [q] quit",
            ViewMode::Relationships => "[j/k] select  [Enter] jump  [Tab] view  [Esc] back",
            ViewMode::Confirm(_) => "[y/Enter] confirm  [n/Esc] cancel",
        }
    }

    /// Apply one transition to the view state.
    fn update(&mut self, f: impl FnOnce(ViewState, &Derived) -> ViewState) {
        let before = self.view.mode();
        self.view = f(mem::take(&mut self.view), &self.derived);
        let after = self.view.mode();
        if before != after {
            tracing::debug!(from = before.label(), to = after.label(), "view mode changed");
        }
    }

    /// Rebuild the filtered snapshot after the snapshot or filter changed.
    fn refilter(&mut self) {
        self.derived = Derived::compute(&self.snapshot, &self.view.filter);
        self.update(|view, derived| view.reconciled(derived));
        tracing::debug!(
            kind = self.view.filter.kind.label(),
            status = self.view.filter.status.label(),
            search = %self.view.filter.search,
            matches = self.derived.graph.nodes.len(),
            "filter applied"
        );
    }

    fn follow(&mut self) {
        let height = self.viewport_height;
        self.update(|view, derived| view.followed(derived, height));
    }

    // -----------------------------------------------------------------------
    // Snapshot loading
    // -----------------------------------------------------------------------

    fn start_reload(&mut self) {
        tracing::info!(source = %self.source.describe(), "reloading snapshot");
        self.pending = Some(PendingLoad::spawn(self.source.clone()));
        self.status_message = Some("reloading snapshot...".to_string());
    }

    /// Install a finished load, if any. Returns true when something changed.
    fn poll_load(&mut self) -> bool {
        let Some(result) = self.pending.as_ref().and_then(PendingLoad::poll) else {
            return false;
        };
        self.pending = None;
        match result {
            Ok(graph) => {
                self.install(graph);
                self.load_error = None;
                self.status_message = Some("snapshot reloaded".to_string());
            }
            Err(err) => {
                tracing::warn!(error = %format!("{err:#}"), "snapshot reload failed");
                self.load_error = Some(format!("{err:#}"));
                self.status_message = None;
            }
        }
        self.follow();
        true
    }

    fn install(&mut self, graph: Graph) {
        tracing::info!(
            nodes = graph.nodes.len(),
            edges = graph.edges.len(),
            dangling = graph.dangling_edges().count(),
            "snapshot installed"
        );
        self.snapshot = graph;
        self.refilter();
    }

    // -----------------------------------------------------------------------
    // Keys
    // -----------------------------------------------------------------------

    /// Handle one key press; returns true when the app should exit.
    fn handle_key(&mut self, key: KeyEvent) -> Result<bool> {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return Ok(true);
        }
        self.status_message = None;

        if self.view.show_help {
            self.update(|view, _| view.help_toggled());
            return Ok(false);
        }

        let quit = if let ViewMode::Confirm(confirm) = self.view.mode() {
            self.handle_confirm(confirm, input::action_for_key(key, false))
        } else if self.view.is_searching() {
            self.handle_search(input::action_for_key(key, true));
            false
        } else {
            self.handle_action(input::action_for_key(key, false));
            false
        };
        self.follow();
        Ok(quit)
    }

    fn handle_confirm(&mut self, confirm: ConfirmAction, action: Action) -> bool {
        match action {
            Action::Accept | Action::Activate => {
                self.update(|view, _| view.back());
                match confirm {
                    ConfirmAction::Quit => return true,
                    ConfirmAction::Reload => self.start_reload(),
                }
            }
            Action::Quit if confirm == ConfirmAction::Quit => return true,
            Action::Quit
            | Action::Decline | Action::Back | Action::Cancel => {
                self.update(|view, _| view.back());
            }
            _ => {}
        }
        false
    }

    fn handle_search(&mut self, action: Action) {
        match action {
            Action::InputChar(c) => {
                self.update(|view, _| view.search_typed(c));
                self.refilter();
            }
            Action::Backspace => {
                self.update(|view, _| view.search_erased());
                self.refilter();
            }
            Action::SubmitText => {
                self.update(|view, derived| view.search_committed(derived));
            }
            Action::Cancel => {
                self.update(|view, _| view.search_cancelled());
                self.refilter();
            }
            _ => {}
        }
    }

    fn handle_action(&mut self, action: Action) {
        match action {
            Action::Quit => self.update(|view, _| view.confirming(ConfirmAction::Quit)),
            Action::Refresh => self.update(|view, _| view.confirming(ConfirmAction::Reload)),
            Action::ToggleHelp => self.update(|view, _| view.help_toggled()),
            Action::Move(direction) => self.update(|view, derived| view.moved(direction, derived)),
            Action::Activate => self.update(|view, derived| view.activated(derived)),
            Action::Back => self.update(|view, _| view.back()),
            Action::NextView => self.update(|view, _| view.cycled(true)),
            Action::PrevView => self.update(|view, _| view.cycled(false)),
            Action::CycleTypeFilter => {
                let filter = FilterSpec {
                    kind: self.view.filter.kind.next(),
                    ..self.view.filter.clone()
                };
                self.update(|view, _| view.with_filter(filter));
                self.refilter();
            }
            Action::CycleStatusFilter => {
                let filter = FilterSpec {
                    status: self.view.filter.status.next(),
                    ..self.view.filter.clone()
                };
                self.update(|view, _| view.with_filter(filter));
                self.refilter();
            }
            Action::StartSearch => {
                self.update(|view, _| view.search_started());
                self.refilter();
            }
            Action::Accept
            | Action::Decline
            | Action::SubmitText
            | Action::Cancel
            | Action::Backspace
            | Action::InputChar(_)
            | Action::Noop => {}
        }
    }
}

/// One-line summary: view, filters, focus and match count.
fn status_line(view: &ViewState, derived: &Derived, total: usize) -> String {
    let search = if view.filter.search.is_empty() {
        "-".to_string()
    } else {
        format!("\"{}\"", view.filter.search)
    };
    let focus = view
        .focus
        .as_deref()
        .and_then(|id| derived.graph.get(id))
        .map(|n| n.title.as_str())
        .unwrap_or("(nothing)");
    format!(
        "{}  type:{}  status:{}  search:{}  │  {}  │  {}/{} nodes",
        view.base_mode().label().to_uppercase(),
        view.filter.kind.label(),
        view.filter.status.label(),
        search,
        focus,
        derived.graph.nodes.len(),
        total
    )
}

pub fn run(source: Source, config: Config) -> Result<()> {
    let snapshot = source
        .load()
        .with_context(|| format!("failed to load snapshot from {}", source.describe()))?;
    tracing::info!(
        source = %source.describe(),
        nodes = snapshot.nodes.len(),
        edges = snapshot.edges.len(),
        dangling = snapshot.dangling_edges().count(),
        "starting navigator"
    );
    let mut app = AppState::new(source, snapshot, config);

    let mut stdout = io::stdout();
    enable_raw_mode()?;
    execute!(stdout, EnterAlternateScreen)?;
    let _guard = TerminalGuard;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    loop {
        terminal.draw(|f| app.draw(f))?;
        if !event::poll(POLL_INTERVAL)? {
            app.poll_load();
            continue;
        }
        match event::read()? {
            Event::Key(key) => {
                if matches!(key.kind, KeyEventKind::Release | KeyEventKind::Repeat) {
                    continue;
                }
                if app.handle_key(key)? {
                    break;
                }
            }
            Event::Resize(_, _) => terminal.autoresize()?,
            _ => {}
        }
        app.poll_load();
    }
    tracing::info!("navigator closed");
    Ok(())
}

struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let mut stdout = io::stdout();
        let _ = execute!(stdout, LeaveAlternateScreen);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::demo::demo_graph;
    use crate::graph::filter::{StatusFilter, TypeFilter};
    use ratatui::backend::TestBackend;
    use std::fs;
    use std::thread;
    use tempfile::TempDir;

    fn press(app: &mut AppState, code: KeyCode) -> bool {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE)).unwrap()
    }

    fn demo_app() -> AppState {
        AppState::new(Source::Demo, demo_graph(), Config::default())
    }

    fn wait_for_load(app: &mut AppState) {
        for _ in 0..500 {
            if app.poll_load() {
                return;
            }
            thread::sleep(Duration::from_millis(5));
        }
        panic!("reload never finished");
    }

    #[test]
    fn starts_focused_on_first_root() {
        let app = demo_app();
        assert_eq!(app.view.focus.as_deref(), Some("proj-mobile"));
        assert_eq!(app.view.mode(), ViewMode::Graph);
    }

    #[test]
    fn quit_needs_confirmation() {
        let mut app = demo_app();
        assert!(!press(&mut app, KeyCode::Char('q')));
        assert_eq!(app.view.mode(), ViewMode::Confirm(ConfirmAction::Quit));
        assert!(!press(&mut app, KeyCode::Char('n')));
        assert_eq!(app.view.mode(), ViewMode::Graph);
        press(&mut app, KeyCode::Char('q'));
        assert!(press(&mut app, KeyCode::Char('y')));
    }

    #[test]
    fn q_on_reload_prompt_declines() {
        let mut app = demo_app();
        press(&mut app, KeyCode::Char('r'));
        assert_eq!(app.view.mode(), ViewMode::Confirm(ConfirmAction::Reload));
        assert!(!press(&mut app, KeyCode::Char('q')));
        assert_eq!(app.view.mode(), ViewMode::Graph);
        assert!(app.pending.is_none());

        press(&mut app, KeyCode::Char('q'));
        assert!(press(&mut app, KeyCode::Char('q')));
    }

    #[test]
    fn ctrl_c_quits_immediately() {
        let mut app = demo_app();
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert!(app.handle_key(ctrl_c).unwrap());
    }

    #[test]
    fn filter_keys_cycle_and_refilter() {
        let mut app = demo_app();
        let total = app.derived.graph.nodes.len();
        press(&mut app, KeyCode::Char('f'));
        assert_eq!(app.view.filter.kind, TypeFilter::ProjectsAndWork);
        press(&mut app, KeyCode::Char('s'));
        assert_eq!(app.view.filter.status, StatusFilter::Active);
        assert!(app.derived.graph.nodes.len() < total);
        assert!(status_line(&app.view, &app.derived, total).contains("type:work  status:active"));
    }

    #[test]
    fn search_typing_filters_live() {
        let mut app = demo_app();
        press(&mut app, KeyCode::Char('/'));
        assert!(app.view.is_searching());
        for c in "login".chars() {
            press(&mut app, KeyCode::Char(c));
        }
        assert!(app.derived.graph.nodes.iter().all(|n| n.title.to_lowercase().contains("login")));
        press(&mut app, KeyCode::Enter);
        assert!(!app.view.is_searching());
        assert_eq!(app.view.filter.search, "login");
        press(&mut app, KeyCode::Char('/'));
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.view.filter.search, "");
    }

    #[test]
    fn failed_reload_keeps_last_snapshot() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("graph.json");
        fs::write(&path, r#"{"nodes":[{"id":"a","type":"project","title":"Alpha"}]}"#).unwrap();
        let source = Source::File(path.clone());
        let graph = source.load().unwrap();
        let mut app = AppState::new(source, graph, Config::default());

        fs::write(&path, "{ broken").unwrap();
        press(&mut app, KeyCode::Char('r'));
        assert_eq!(app.view.mode(), ViewMode::Confirm(ConfirmAction::Reload));
        press(&mut app, KeyCode::Enter);
        wait_for_load(&mut app);
        assert!(app.load_error.is_some());
        assert_eq!(app.snapshot.nodes.len(), 1);
        assert_eq!(app.view.focus.as_deref(), Some("a"));

        fs::write(
            &path,
            r#"{"nodes":[{"id":"a","type":"project","title":"Alpha"},{"id":"b","type":"issue","title":"Bug"}],
                "edges":[{"from":"a","to":"b","relation":"owns"}]}"#,
        )
        .unwrap();
        press(&mut app, KeyCode::Char('r'));
        press(&mut app, KeyCode::Char('y'));
        wait_for_load(&mut app);
        assert!(app.load_error.is_none());
        assert_eq!(app.snapshot.nodes.len(), 2);
        assert_eq!(app.view.focus.as_deref(), Some("a"));
    }

    #[test]
    fn config_sets_start_view_and_collapse() {
        let config = Config {
            start_view: ViewMode::Details,
            start_collapsed: true,
            ..Config::default()
        };
        let app = AppState::new(Source::Demo, demo_graph(), config);
        assert_eq!(app.view.mode(), ViewMode::Details);
        assert!(app.view.collapse.is_collapsed("proj-mobile"));
    }

    #[test]
    fn draw_tracks_viewport_height() {
        let mut app = demo_app();
        let mut terminal = Terminal::new(TestBackend::new(80, 16)).unwrap();
        terminal.draw(|f| app.draw(f)).unwrap();
        assert!(app.viewport_height > 0);
        for _ in 0..15 {
            press(&mut app, KeyCode::Char('j'));
        }
        let line = app.view.focus_line(&app.derived).unwrap();
        assert!(line >= app.view.scroll);
        assert!(line < app.view.scroll + app.viewport_height);
    }
}
