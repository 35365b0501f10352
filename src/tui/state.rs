//! The navigator's view state as an immutable value.
//!
//! Every transition consumes the state and returns the next one. Anything
//! computed from the snapshot (filtered graph, forest) lives in `Derived` and
//! is rebuilt by the caller whenever the snapshot or the filter changes.

use crate::graph::filter::{self, FilterSpec};
use crate::graph::forest::{CollapseState, Forest};
use crate::graph::model::{Graph, NodeId};
use crate::tui::input::Direction;
use crate::tui::navigation;
use crate::tui::view::{ConfirmAction, ModeStack, ViewMode};
use crate::tui::viewport;

/// The filtered snapshot and its forest.
#[derive(Debug, Default, Clone)]
pub struct Derived {
    pub graph: Graph,
    pub forest: Forest,
}

impl Derived {
    pub fn compute(snapshot: &Graph, spec: &FilterSpec) -> Self {
        let graph = filter::apply(snapshot, spec);
        let forest = Forest::build(&graph);
        Self { graph, forest }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ViewState {
    pub focus: Option<NodeId>,
    pub collapse: CollapseState,
    pub scroll: usize,
    pub modes: ModeStack,
    /// Selected row of the relationships list.
    pub relation_index: usize,
    pub filter: FilterSpec,
    /// Query being typed; `Some` while the search prompt is open.
    pub search_input: Option<String>,
    pub show_help: bool,
}

impl ViewState {
    pub fn new(start: ViewMode, filter: FilterSpec) -> Self {
        Self {
            modes: ModeStack::new(start),
            filter,
            ..Self::default()
        }
    }

    pub fn mode(&self) -> ViewMode {
        self.modes.current()
    }

    /// The mode to draw beneath a confirmation overlay.
    pub fn base_mode(&self) -> ViewMode {
        match self.mode() {
            ViewMode::Confirm(_) => self.modes.beneath().unwrap_or_default(),
            other => other,
        }
    }

    pub fn is_searching(&self) -> bool {
        self.search_input.is_some()
    }

    // -----------------------------------------------------------------------
    // Snapshot and filter changes
    // -----------------------------------------------------------------------

    /// Replace the filter. Scroll restarts at the top; the caller rebuilds
    /// `Derived` and then calls `reconciled`.
    pub fn with_filter(mut self, filter: FilterSpec) -> Self {
        if filter != self.filter {
            self.scroll = 0;
        }
        self.filter = filter;
        self
    }

    /// Repair focus and selection after the filtered snapshot changed. A
    /// focus that survived the filter stays and its ancestors unfold; one
    /// that was filtered out moves to the first node in tree order.
    pub fn reconciled(mut self, derived: &Derived) -> Self {
        let survived = self
            .focus
            .as_deref()
            .is_some_and(|id| derived.graph.contains(id));
        if survived {
            self = self.revealed(derived);
        } else {
            self = self.refocused_on_first(derived);
        }
        let relations = self.relations(derived).len();
        self.relation_index = self.relation_index.min(relations.saturating_sub(1));
        self
    }

    /// Fold every node that has children. A focus left hidden moves to the
    /// first root.
    pub fn all_collapsed(mut self, derived: &Derived) -> Self {
        let mut collapse = self.collapse;
        for id in derived.forest.children.keys() {
            collapse = collapse.collapsed(id);
        }
        self.collapse = collapse;
        if self.focus_line(derived).is_none() {
            self = self.refocused_on_first(derived);
        }
        let relations = self.relations(derived).len();
        self.relation_index = self.relation_index.min(relations.saturating_sub(1));
        self
    }

    fn refocused_on_first(mut self, derived: &Derived) -> Self {
        let first = navigation::visible_order(&derived.forest, &self.collapse)
            .into_iter()
            .next();
        if first != self.focus {
            self.relation_index = 0;
        }
        self.focus = first;
        self
    }

    // -----------------------------------------------------------------------
    // Movement
    // -----------------------------------------------------------------------

    pub fn moved(self, direction: Direction, derived: &Derived) -> Self {
        match self.mode() {
            ViewMode::Graph | ViewMode::Details => self.focus_moved(direction, derived),
            ViewMode::Relationships => self.relation_moved(direction, derived),
            ViewMode::Confirm(_) => self,
        }
    }

    fn focus_moved(mut self, direction: Direction, derived: &Derived) -> Self {
        let next = navigation::navigate(
            self.focus.as_deref(),
            direction,
            &derived.forest,
            &derived.graph,
            &self.collapse,
        );
        let horizontal = matches!(direction, Direction::Left | Direction::Right);
        if next != self.focus {
            self.relation_index = 0;
        }
        self.focus = next;
        if horizontal {
            self = self.revealed(derived);
        }
        self
    }

    fn relation_moved(mut self, direction: Direction, derived: &Derived) -> Self {
        let delta = match direction {
            Direction::Down => 1,
            Direction::Up => -1,
            Direction::Left | Direction::Right => return self,
        };
        let len = self.relations(derived).len();
        self.relation_index = navigation::step_index(self.relation_index, len, delta);
        self
    }

    /// Expand every collapsed ancestor of the focused node.
    fn revealed(mut self, derived: &Derived) -> Self {
        if let Some(focus) = self.focus.as_deref() {
            let mut collapse = self.collapse;
            for ancestor in derived.forest.ancestors(focus) {
                collapse = collapse.expanded(&ancestor);
            }
            self.collapse = collapse;
        }
        self
    }

    pub fn relations(&self, derived: &Derived) -> Vec<navigation::RelationEntry> {
        self.focus
            .as_deref()
            .map(|id| navigation::relations(id, &derived.graph))
            .unwrap_or_default()
    }

    // -----------------------------------------------------------------------
    // Modes
    // -----------------------------------------------------------------------

    /// Enter: fold/unfold or drill in Graph, jump to the selected node in
    /// Relationships, nothing in Details.
    pub fn activated(self, derived: &Derived) -> Self {
        match self.mode() {
            ViewMode::Graph => self.drilled(derived),
            ViewMode::Relationships => self.relation_committed(derived),
            ViewMode::Details | ViewMode::Confirm(_) => self,
        }
    }

    fn drilled(mut self, derived: &Derived) -> Self {
        let Some(focus) = self.focus.clone() else {
            return self;
        };
        if derived.forest.has_children(&focus) {
            self.collapse = self.collapse.toggled(&focus);
        } else {
            self.modes = self.modes.pushed(ViewMode::Details);
        }
        self
    }

    fn relation_committed(mut self, derived: &Derived) -> Self {
        let relations = self.relations(derived);
        let Some(entry) = relations.get(self.relation_index.min(relations.len().saturating_sub(1)))
        else {
            return self;
        };
        self.focus = Some(entry.other.clone());
        self.relation_index = 0;
        self.modes = self.modes.switched(ViewMode::Graph);
        self.revealed(derived)
    }

    pub fn back(mut self) -> Self {
        self.modes = self.modes.popped();
        self
    }

    pub fn cycled(mut self, forward: bool) -> Self {
        self.modes = if forward {
            self.modes.cycled_forward()
        } else {
            self.modes.cycled_back()
        };
        self
    }

    pub fn confirming(mut self, action: ConfirmAction) -> Self {
        if !matches!(self.mode(), ViewMode::Confirm(_)) {
            self.modes = self.modes.pushed(ViewMode::Confirm(action));
        }
        self
    }

    pub fn help_toggled(mut self) -> Self {
        self.show_help = !self.show_help;
        self
    }

    // -----------------------------------------------------------------------
    // Search
    // -----------------------------------------------------------------------

    pub fn search_started(mut self) -> Self {
        self.search_input = Some(String::new());
        self.with_search(String::new())
    }

    pub fn search_typed(mut self, c: char) -> Self {
        let Some(mut query) = self.search_input.take() else {
            return self;
        };
        query.push(c);
        self.search_input = Some(query.clone());
        self.with_search(query)
    }

    pub fn search_erased(mut self) -> Self {
        let Some(mut query) = self.search_input.take() else {
            return self;
        };
        query.pop();
        self.search_input = Some(query.clone());
        self.with_search(query)
    }

    fn with_search(self, search: String) -> Self {
        let filter = FilterSpec {
            search,
            ..self.filter.clone()
        };
        self.with_filter(filter)
    }

    /// Keep the query and focus its first match in tree order.
    pub fn search_committed(mut self, derived: &Derived) -> Self {
        self.search_input = None;
        self.refocused_on_first(derived)
    }

    pub fn search_cancelled(mut self) -> Self {
        self.search_input = None;
        self.with_search(String::new())
    }

    // -----------------------------------------------------------------------
    // Viewport
    // -----------------------------------------------------------------------

    /// Line of the focused node in the rendered tree.
    pub fn focus_line(&self, derived: &Derived) -> Option<usize> {
        let focus = self.focus.as_deref()?;
        navigation::visible_order(&derived.forest, &self.collapse)
            .iter()
            .position(|id| id == focus)
    }

    /// Scroll the tree so the focus line sits inside a window of `height`.
    pub fn followed(mut self, derived: &Derived, height: usize) -> Self {
        let total = navigation::visible_order(&derived.forest, &self.collapse)
            .len()
            .max(1);
        let focus = self.focus_line(derived).unwrap_or(0);
        self.scroll = viewport::follow(total, height, self.scroll, focus);
        self
    }
}
