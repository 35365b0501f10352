//! Full-screen view modes and the back-stack that sits on top of them.

/// What a confirmation overlay will do when accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmAction {
    Quit,
    Reload,
}

impl ConfirmAction {
    pub fn prompt(self) -> &'static str {
        match self {
            Self::Quit => "Quit kgnav?",
            Self::Reload => "Reload the snapshot from its source?",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    #[default]
    Graph,
    Details,
    Relationships,
    /// Transient overlay; the mode underneath is on the back-stack.
    Confirm(ConfirmAction),
}

impl ViewMode {
    /// Graph → Details → Relationships → Graph. A confirmation stays put.
    pub fn next(self) -> Self {
        match self {
            Self::Graph => Self::Details,
            Self::Details => Self::Relationships,
            Self::Relationships => Self::Graph,
            Self::Confirm(action) => Self::Confirm(action),
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Self::Graph => Self::Relationships,
            Self::Details => Self::Graph,
            Self::Relationships => Self::Details,
            Self::Confirm(action) => Self::Confirm(action),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Graph => "graph",
            Self::Details => "details",
            Self::Relationships => "relationships",
            Self::Confirm(_) => "confirm",
        }
    }

    /// Parse a startable mode; confirmations cannot be configured.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "graph" | "tree" => Some(Self::Graph),
            "details" => Some(Self::Details),
            "relationships" | "relations" => Some(Self::Relationships),
            _ => None,
        }
    }
}

/// Current mode plus the modes it was entered from.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ModeStack {
    current: ViewMode,
    back: Vec<ViewMode>,
}

impl ModeStack {
    pub fn new(start: ViewMode) -> Self {
        Self {
            current: start,
            back: Vec::new(),
        }
    }

    pub fn current(&self) -> ViewMode {
        self.current
    }

    pub fn depth(&self) -> usize {
        self.back.len()
    }

    /// The mode `popped` would return to.
    pub fn beneath(&self) -> Option<ViewMode> {
        self.back.last().copied()
    }

    pub fn cycled_forward(mut self) -> Self {
        self.current = self.current.next();
        self
    }

    pub fn cycled_back(mut self) -> Self {
        self.current = self.current.prev();
        self
    }

    /// Record the current mode and switch to `mode`.
    pub fn pushed(mut self, mode: ViewMode) -> Self {
        self.back.push(self.current);
        self.current = mode;
        self
    }

    /// Return to the most recently pushed mode; no-op when nothing was pushed.
    pub fn popped(mut self) -> Self {
        if let Some(previous) = self.back.pop() {
            self.current = previous;
        }
        self
    }

    /// Switch without touching the back-stack.
    pub fn switched(mut self, mode: ViewMode) -> Self {
        self.current = mode;
        self
    }
}
