use ratatui::Frame;
use ratatui::layout::{Constraint, Flex, Layout, Margin, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Clear, Padding, Paragraph, Wrap};

use crate::graph::forest::{CollapseState, Forest};
use crate::graph::model::{Graph, Node, NodeId, NodeType, Status};
use crate::tui::navigation::{self, RelationEntry};
use crate::tui::view::{ConfirmAction, ViewMode};
use crate::tui::viewport;

/// Titles keep at least this many characters, however narrow the pane.
pub const MIN_TITLE_WIDTH: usize = 10;

/// Columns reserved for the indicator, icons and status suffix.
const DECORATION_RESERVE: usize = 20;

const EMPTY_TREE: &str = "No nodes match the current filter.";

/// Rendered tree lines plus the node each line shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedTree {
    pub lines: Vec<Line<'static>>,
    pub ids: Vec<Option<NodeId>>,
}

impl RenderedTree {
    pub fn line_of(&self, id: &str) -> Option<usize> {
        self.ids.iter().position(|line| line.as_deref() == Some(id))
    }

    pub fn plain(&self) -> Vec<String> {
        self.lines.iter().map(line_text).collect()
    }
}

/// Everything `draw` needs for one frame.
#[derive(Debug)]
pub struct ScreenData<'a> {
    pub mode: ViewMode,
    /// Mode drawn underneath a confirmation overlay.
    pub base_mode: ViewMode,
    pub forest: &'a Forest,
    pub filtered: &'a Graph,
    pub collapse: &'a CollapseState,
    pub focus: Option<&'a str>,
    pub scroll: usize,
    pub relation_index: usize,
    pub status: String,
    pub search: Option<&'a str>,
    pub hints: Option<&'a str>,
    pub message: Option<&'a str>,
    pub load_error: Option<&'a str>,
    pub show_help: bool,
}

// ---------------------------------------------------------------------------
// Tree lines
// ---------------------------------------------------------------------------

/// Render the visible part of `forest` as decorated lines no wider than
/// `max_width` (titles never shrink below `MIN_TITLE_WIDTH`).
pub fn render_tree(
    forest: &Forest,
    nodes: &Graph,
    collapse: &CollapseState,
    focus: Option<&str>,
    max_width: usize,
) -> RenderedTree {
    let mut lines = Vec::new();
    let mut ids = Vec::new();

    for row in forest.rows(collapse) {
        let Some(node) = nodes.get(&row.id) else {
            continue;
        };
        let mut scaffold = String::with_capacity((row.depth + 2) * 4);
        for &guide in &row.guides {
            scaffold.push_str(if guide { "│  " } else { "   " });
        }
        scaffold.push_str(if row.last_sibling { "└─ " } else { "├─ " });
        if row.has_children {
            scaffold.push_str(if row.collapsed { "▸ " } else { "▾ " });
        }

        let budget = max_width
            .saturating_sub(scaffold.chars().count() + DECORATION_RESERVE)
            .max(MIN_TITLE_WIDTH);
        let title = truncate_title(&node.title, budget);
        let suffix = format!(" [{}]", node.status_display());

        let focused = focus == Some(node.id.as_str());
        let mut spans = if focused {
            let style = focus_style();
            vec![
                Span::styled(scaffold, style),
                Span::styled(format!("{} ", type_icon(node.kind)), style),
                Span::styled(format!("{} ", status_icon(node.status)), style),
                Span::styled(title, style),
                Span::styled(suffix, style),
            ]
        } else {
            let type_style = Style::default().fg(type_color(node.kind));
            let status_style = Style::default().fg(status_color(node.status));
            let title_style = if node.kind.is_anchor() {
                type_style.add_modifier(Modifier::BOLD)
            } else {
                type_style
            };
            vec![
                Span::styled(scaffold, Style::default().fg(Color::DarkGray)),
                Span::styled(format!("{} ", type_icon(node.kind)), type_style),
                Span::styled(format!("{} ", status_icon(node.status)), status_style),
                Span::styled(title, title_style),
                Span::styled(suffix, status_style),
            ]
        };
        if focused {
            let used = spans.iter().map(|s| s.content.chars().count()).sum::<usize>();
            if used < max_width {
                spans.push(Span::styled(" ".repeat(max_width - used), focus_style()));
            }
        }
        lines.push(Line::from(spans));
        ids.push(Some(node.id.clone()));
    }

    if lines.is_empty() {
        lines.push(Line::from(Span::styled(
            EMPTY_TREE,
            Style::default().fg(Color::DarkGray),
        )));
        ids.push(None);
    }
    RenderedTree { lines, ids }
}

/// Cut `title` to `max_chars` characters, appending `…` when anything was cut.
pub fn truncate_title(title: &str, max_chars: usize) -> String {
    if title.chars().count() <= max_chars {
        return title.to_string();
    }
    let mut out = title.chars().take(max_chars).collect::<String>();
    out.push('…');
    out
}

pub fn line_text(line: &Line<'_>) -> String {
    line.spans.iter().map(|s| s.content.as_ref()).collect()
}

pub fn type_icon(kind: NodeType) -> &'static str {
    match kind {
        NodeType::Project => "◆",
        NodeType::Service => "◇",
        NodeType::Issue => "●",
        NodeType::PullRequest => "▲",
        NodeType::Commit => "•",
        NodeType::File => "▪",
        NodeType::Unknown => "?",
    }
}

pub fn status_icon(status: Status) -> &'static str {
    match status {
        Status::Active => "▶",
        Status::Backlog => "○",
        Status::Done => "✓",
        Status::Blocked => "✗",
        Status::Cancelled => "⊘",
        Status::Unknown => "·",
    }
}

fn type_color(kind: NodeType) -> Color {
    match kind {
        NodeType::Project => Color::Cyan,
        NodeType::Service => Color::LightBlue,
        NodeType::Issue => Color::White,
        NodeType::PullRequest => Color::Magenta,
        NodeType::Commit => Color::Yellow,
        NodeType::File => Color::Gray,
        NodeType::Unknown => Color::DarkGray,
    }
}

fn status_color(status: Status) -> Color {
    match status {
        Status::Active => Color::Green,
        Status::Backlog => Color::Gray,
        Status::Done => Color::Blue,
        Status::Blocked => Color::LightRed,
        Status::Cancelled | Status::Unknown => Color::DarkGray,
    }
}

fn focus_style() -> Style {
    Style::default()
        .fg(Color::Black)
        .bg(Color::Yellow)
        .add_modifier(Modifier::BOLD)
}

// ---------------------------------------------------------------------------
// Details and relationships panels
// ---------------------------------------------------------------------------

pub fn details_lines(node: Option<&Node>, forest: &Forest, filtered: &Graph) -> Vec<Line<'static>> {
    let Some(node) = node else {
        return vec![
            Line::from(Span::styled(
                "No Node Selected",
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from("Nothing matches the current filter."),
        ];
    };

    let heading = Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD);
    let dim = Style::default().fg(Color::DarkGray);
    let reference = if node.identifier.is_empty() {
        node.id.clone()
    } else {
        format!("{}  ({})", node.identifier, node.id)
    };

    let mut lines = vec![
        Line::from(vec![
            Span::styled(
                format!("{} ", type_icon(node.kind)),
                Style::default().fg(type_color(node.kind)),
            ),
            Span::styled(node.title.clone(), Style::default().add_modifier(Modifier::BOLD)),
        ]),
        Line::from(Span::styled(reference, dim)),
        Line::from(""),
        Line::from(vec![
            Span::raw(format!("type: {}   status: ", node.kind.label())),
            Span::styled(
                format!("{} {}", status_icon(node.status), node.status_display()),
                Style::default().fg(status_color(node.status)),
            ),
            Span::styled(format!(" ({})", node.status.label()), dim),
            Span::raw(format!("   priority: {}", node.priority)),
        ]),
    ];
    if !node.project.is_empty() {
        lines.push(Line::from(format!("project: {}", node.project)));
    }
    if !node.labels.is_empty() {
        lines.push(Line::from(format!("labels: {}", node.labels.join(", "))));
    }
    if !node.url.is_empty() {
        lines.push(Line::from(Span::styled(
            format!("url: {}", node.url),
            Style::default().fg(Color::LightBlue),
        )));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled("Description", heading)));
    if node.description.trim().is_empty() {
        lines.push(Line::from(Span::styled("  (none)", dim)));
    } else {
        for text in node.description.lines() {
            lines.push(Line::from(format!("  {text}")));
        }
    }

    let relations = navigation::relations(&node.id, filtered);
    let outgoing = relations.iter().filter(|r| r.outgoing).count();
    let parent = forest
        .parent_of(&node.id)
        .and_then(|id| filtered.get(id))
        .map(|p| p.title.clone())
        .unwrap_or_else(|| "(root)".to_string());
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled("Structure", heading)));
    lines.push(Line::from(format!("  parent: {parent}")));
    lines.push(Line::from(format!(
        "  children: {}   outgoing: {}   incoming: {}",
        forest.children_of(&node.id).len(),
        outgoing,
        relations.len() - outgoing
    )));
    lines
}

/// One line per relationship; line `i` is entry `i` so the selection index
/// doubles as the line index.
pub fn relationship_lines(
    entries: &[RelationEntry],
    selected: usize,
    filtered: &Graph,
    max_width: usize,
) -> Vec<Line<'static>> {
    if entries.is_empty() {
        return vec![Line::from(Span::styled(
            "  (no relationships)",
            Style::default().fg(Color::DarkGray),
        ))];
    }
    let width = entries
        .iter()
        .map(|e| e.relation.label().chars().count())
        .max()
        .unwrap_or(0);
    entries
        .iter()
        .enumerate()
        .map(|(idx, entry)| {
            let arrow = if entry.outgoing { "→" } else { "←" };
            let (icon, title, status, kind, state) = match filtered.get(&entry.other) {
                Some(n) => (
                    type_icon(n.kind),
                    n.title.as_str(),
                    n.status_display().to_string(),
                    n.kind,
                    n.status,
                ),
                None => ("?", entry.other.as_str(), String::new(), NodeType::Unknown, Status::Unknown),
            };
            let head = format!(
                "{} {} {:<width$}  {} ",
                if idx == selected { ">" } else { " " },
                arrow,
                entry.relation.label(),
                icon,
            );
            let budget = max_width
                .saturating_sub(head.chars().count() + status.chars().count() + 3)
                .max(MIN_TITLE_WIDTH);
            let title = truncate_title(title, budget);
            let suffix = if status.is_empty() {
                String::new()
            } else {
                format!(" [{status}]")
            };
            if idx == selected {
                let style = focus_style();
                Line::from(vec![
                    Span::styled(head, style),
                    Span::styled(title, style),
                    Span::styled(suffix, style),
                ])
            } else {
                let relation_color = if entry.relation.is_hierarchical() {
                    Color::White
                } else {
                    Color::Gray
                };
                Line::from(vec![
                    Span::styled(head, Style::default().fg(relation_color)),
                    Span::styled(title, Style::default().fg(type_color(kind))),
                    Span::styled(suffix, Style::default().fg(status_color(state))),
                ])
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Frame
// ---------------------------------------------------------------------------

/// The inner rectangle of the main pane for a frame of size `area`.
pub fn main_pane(area: Rect) -> Rect {
    let [main_outer, _status] = frame_layout(area);
    Block::default().borders(Borders::ALL).inner(main_outer)
}

fn frame_layout(area: Rect) -> [Rect; 2] {
    let area = area.inner(Margin {
        horizontal: 1,
        vertical: 0,
    });
    let canvas_inner = Block::default()
        .borders(Borders::ALL)
        .padding(Padding::new(1, 1, 0, 0))
        .inner(area);
    Layout::vertical([Constraint::Min(3), Constraint::Length(4)]).areas(canvas_inner)
}

pub fn draw(frame: &mut Frame, data: &ScreenData<'_>) {
    let area = frame.area().inner(Margin {
        horizontal: 1,
        vertical: 0,
    });
    let canvas_block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Double)
        .border_style(Style::default().fg(Color::DarkGray))
        .padding(Padding::new(1, 1, 0, 0))
        .title(Line::from(vec![
            Span::styled("kgnav", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw("  "),
            Span::styled("[?] help", Style::default().fg(Color::DarkGray)),
            Span::raw("  "),
            Span::styled("[q] quit", Style::default().fg(Color::DarkGray)),
        ]));
    frame.render_widget(canvas_block, area);
    let [main_area, status_area] = frame_layout(frame.area());

    draw_mode(frame, main_area, data.mode, data);
    draw_status(frame, status_area, data);

    if data.show_help {
        render_help_overlay(frame);
    }
}

fn draw_mode(frame: &mut Frame, area: Rect, mode: ViewMode, data: &ScreenData<'_>) {
    match mode {
        ViewMode::Graph => draw_graph(frame, area, data),
        ViewMode::Details => draw_details(frame, area, data),
        ViewMode::Relationships => draw_relationships(frame, area, data),
        ViewMode::Confirm(action) => {
            let base = match data.base_mode {
                ViewMode::Confirm(_) => ViewMode::Graph,
                other => other,
            };
            draw_mode(frame, area, base, data);
            draw_confirm(frame, action);
        }
    }
}

fn pane_block(title: &str, detail: String) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::White))
        .title(Line::from(vec![
            Span::styled(
                title.to_string(),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
            ),
            Span::raw("  "),
            Span::styled(detail, Style::default().fg(Color::DarkGray)),
        ]))
}

fn draw_graph(frame: &mut Frame, area: Rect, data: &ScreenData<'_>) {
    let block = pane_block(
        "GRAPH",
        format!(
            "{} nodes  {} folded",
            data.filtered.nodes.len(),
            data.collapse.len()
        ),
    );
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let tree = render_tree(
        data.forest,
        data.filtered,
        data.collapse,
        data.focus,
        inner.width as usize,
    );
    let height = inner.height as usize;
    // Frames drawn before the first follow still show the focus.
    let scroll = match data.focus.and_then(|id| tree.line_of(id)) {
        Some(line) => viewport::follow(tree.lines.len(), height, data.scroll, line),
        None => data.scroll,
    };
    let range = viewport::window(tree.lines.len(), height, scroll);
    frame.render_widget(Paragraph::new(tree.lines[range].to_vec()), inner);
}

fn draw_details(frame: &mut Frame, area: Rect, data: &ScreenData<'_>) {
    let block = pane_block("DETAILS", String::new());
    let inner = block.inner(area);
    frame.render_widget(block, area);
    let node = data.focus.and_then(|id| data.filtered.get(id));
    let lines = details_lines(node, data.forest, data.filtered);
    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
}

fn draw_relationships(frame: &mut Frame, area: Rect, data: &ScreenData<'_>) {
    let node = data.focus.and_then(|id| data.filtered.get(id));
    let entries = node
        .map(|n| navigation::relations(&n.id, data.filtered))
        .unwrap_or_default();
    let block = pane_block(
        "RELATIONSHIPS",
        format!(
            "{} ({})",
            node.map(|n| n.title.as_str()).unwrap_or("(none)"),
            entries.len()
        ),
    );
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let selected = data.relation_index.min(entries.len().saturating_sub(1));
    let lines = relationship_lines(&entries, selected, data.filtered, inner.width as usize);
    let height = inner.height as usize;
    let scroll = viewport::follow(lines.len(), height, 0, selected);
    let range = viewport::window(lines.len(), height, scroll);
    frame.render_widget(Paragraph::new(lines[range].to_vec()), inner);
}

fn draw_status(frame: &mut Frame, area: Rect, data: &ScreenData<'_>) {
    let first = match data.search {
        Some(query) => Line::from(vec![
            Span::styled(
                "/",
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(query.to_string(), Style::default().fg(Color::White)),
            Span::styled("▌", Style::default().fg(Color::Yellow)),
            Span::styled(
                format!("   {}", data.status),
                Style::default().fg(Color::DarkGray),
            ),
        ]),
        None => Line::from(Span::styled(
            data.status.clone(),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )),
    };
    let second = if let Some(err) = data.load_error {
        Line::from(Span::styled(
            format!("load failed: {err}"),
            Style::default().fg(Color::LightRed),
        ))
    } else {
        let mut text = data.hints.unwrap_or_default().to_string();
        if let Some(msg) = data.message {
            if !text.is_empty() {
                text.push_str("   ");
            }
            text.push_str(msg);
        }
        Line::from(Span::styled(text, Style::default().fg(Color::DarkGray)))
    };
    let status = Paragraph::new(vec![first, second]).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(if data.load_error.is_some() {
                Color::LightRed
            } else {
                Color::DarkGray
            }))
            .padding(Padding::new(1, 1, 0, 0)),
    );
    frame.render_widget(status, area);
}

fn draw_confirm(frame: &mut Frame, action: ConfirmAction) {
    let area = centered_rect(frame.area(), 50, 24);
    frame.render_widget(Clear, area);
    let panel = Paragraph::new(vec![
        Line::from(Span::styled(
            action.prompt(),
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "[y/Enter] confirm  [n/Esc] cancel",
            Style::default().fg(Color::DarkGray),
        )),
    ])
    .block(
        Block::default()
            .title("Confirm")
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::Yellow))
            .padding(Padding::new(1, 1, 1, 0)),
    );
    frame.render_widget(panel, area);
}

fn render_help_overlay(frame: &mut Frame) {
    let area = centered_rect(frame.area(), 70, 70);
    frame.render_widget(Clear, area);
    let help = Paragraph::new(vec![
        Line::from("MOVE"),
        Line::from("  j/↓ next in tree   k/↑ previous in tree"),
        Line::from("  h/← parent         l/→ first child"),
        Line::from(""),
        Line::from("VIEW"),
        Line::from("  Enter  fold/unfold, or open details for a leaf"),
        Line::from("  Tab / Shift+Tab  graph → details → relationships"),
        Line::from("  Esc    back to the previous view"),
        Line::from("  In relationships: j/k pick, Enter jumps to node"),
        Line::from(""),
        Line::from("FILTER"),
        Line::from("  f type   s status   / search title (Enter keep, Esc clear)"),
        Line::from(""),
        Line::from("  ◆ project  ◇ service  ● issue  ▲ pr  • commit  ▪ file"),
        Line::from("  ▶ active  ○ backlog  ✓ done  ✗ blocked  ⊘ cancelled"),
        Line::from(""),
        Line::from("r reload snapshot   q quit   ? close help"),
    ])
    .block(
        Block::default()
            .title("Help")
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded),
    );
    frame.render_widget(help, area);
}

fn centered_rect(area: Rect, width_percent: u16, height_percent: u16) -> Rect {
    let vertical = Layout::vertical([
        Constraint::Percentage((100 - height_percent) / 2),
        Constraint::Percentage(height_percent),
        Constraint::Percentage((100 - height_percent) / 2),
    ])
    .flex(Flex::Center)
    .split(area);
    Layout::horizontal([
        Constraint::Percentage((100 - width_percent) / 2),
        Constraint::Percentage(width_percent),
        Constraint::Percentage((100 - width_percent) / 2),
    ])
    .flex(Flex::Center)
    .split(vertical[1])[1]
}
