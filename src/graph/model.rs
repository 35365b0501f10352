use std::collections::HashMap;

/// Stable identifier of a node within one snapshot.
pub type NodeId = String;

/// Entity kind, normalized once at ingestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeType {
    Project,
    Service,
    Issue,
    PullRequest,
    Commit,
    File,
    Unknown,
}

impl NodeType {
    pub fn parse(raw: &str) -> Self {
        match normalize_word(raw).as_str() {
            "project" => Self::Project,
            "service" => Self::Service,
            "issue" => Self::Issue,
            "pr" | "pull request" | "pullrequest" => Self::PullRequest,
            "commit" => Self::Commit,
            "file" => Self::File,
            _ => Self::Unknown,
        }
    }

    /// Rank used by the tree ordering: structural anchors first, leaves last.
    pub fn priority(self) -> u8 {
        match self {
            Self::Project => 0,
            Self::Service => 1,
            Self::Issue => 2,
            Self::PullRequest => 3,
            Self::Commit => 4,
            Self::File => 5,
            Self::Unknown => 6,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Project => "project",
            Self::Service => "service",
            Self::Issue => "issue",
            Self::PullRequest => "pr",
            Self::Commit => "commit",
            Self::File => "file",
            Self::Unknown => "unknown",
        }
    }

    /// Projects and services are kept regardless of the status filter.
    pub fn is_anchor(self) -> bool {
        matches!(self, Self::Project | Self::Service)
    }
}

/// Workflow status family. The raw text is kept on the node for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    Active,
    Backlog,
    Done,
    Blocked,
    Cancelled,
    Unknown,
}

impl Status {
    pub fn parse(raw: &str) -> Self {
        match normalize_word(raw).as_str() {
            "in progress" | "inprogress" | "started" | "active" | "doing" | "in review"
            | "review" | "wip" => Self::Active,
            "todo" | "to do" | "backlog" | "open" | "triage" | "planned" | "unstarted" | "new" => {
                Self::Backlog
            }
            "done" | "merged" | "closed" | "completed" | "complete" | "resolved" | "fixed"
            | "shipped" => Self::Done,
            "blocked" | "on hold" => Self::Blocked,
            "cancelled" | "canceled" | "wontfix" | "won't fix" | "duplicate" | "abandoned" => {
                Self::Cancelled
            }
            _ => Self::Unknown,
        }
    }

    /// Sibling ordering: live work first, dead work last.
    pub fn priority(self) -> u8 {
        match self {
            Self::Active => 0,
            Self::Backlog | Self::Unknown => 1,
            Self::Done => 2,
            Self::Blocked | Self::Cancelled => 3,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Backlog => "backlog",
            Self::Done => "done",
            Self::Blocked => "blocked",
            Self::Cancelled => "cancelled",
            Self::Unknown => "unknown",
        }
    }

    pub fn is_done(self) -> bool {
        self == Self::Done
    }
}

/// Relationship kind between two nodes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Relation {
    Owns,
    Implements,
    Modifies,
    Blocks,
    Related,
    Calls,
    Mentions,
    ParentOf,
    DependsOn,
    References,
    /// Relation name not in the known set; kept verbatim for display.
    Other(String),
}

impl Relation {
    pub fn parse(raw: &str) -> Self {
        let key = raw
            .trim()
            .chars()
            .filter(|c| !matches!(c, '_' | '-' | ' '))
            .collect::<String>()
            .to_lowercase();
        match key.as_str() {
            "owns" => Self::Owns,
            "implements" => Self::Implements,
            "modifies" => Self::Modifies,
            "blocks" => Self::Blocks,
            "related" | "relatedto" => Self::Related,
            "calls" => Self::Calls,
            "mentions" => Self::Mentions,
            "parentof" => Self::ParentOf,
            "dependson" => Self::DependsOn,
            "references" => Self::References,
            _ => Self::Other(raw.trim().to_string()),
        }
    }

    /// Only these relations shape the tree; the rest are associative.
    pub fn is_hierarchical(&self) -> bool {
        matches!(self, Self::Owns | Self::Implements | Self::Modifies)
    }

    pub fn label(&self) -> &str {
        match self {
            Self::Owns => "owns",
            Self::Implements => "implements",
            Self::Modifies => "modifies",
            Self::Blocks => "blocks",
            Self::Related => "related",
            Self::Calls => "calls",
            Self::Mentions => "mentions",
            Self::ParentOf => "parentOf",
            Self::DependsOn => "dependsOn",
            Self::References => "references",
            Self::Other(name) => name.as_str(),
        }
    }
}

/// A single entity of the knowledge graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub id: NodeId,
    pub kind: NodeType,
    pub title: String,
    pub description: String,
    pub status: Status,
    /// Status text as delivered by the source, shown in annotations.
    pub status_text: String,
    pub priority: u8,
    pub labels: Vec<String>,
    /// Owning project name, display-only.
    pub project: String,
    pub url: String,
    pub identifier: String,
}

impl Node {
    pub fn new(id: impl Into<String>, kind: NodeType, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind,
            title: title.into(),
            description: String::new(),
            status: Status::Unknown,
            status_text: String::new(),
            priority: 0,
            labels: Vec::new(),
            project: String::new(),
            url: String::new(),
            identifier: String::new(),
        }
    }

    pub fn with_status(mut self, raw: &str) -> Self {
        self.status = Status::parse(raw);
        self.status_text = raw.trim().to_string();
        self
    }

    /// Text for the bracketed status suffix.
    pub fn status_display(&self) -> &str {
        if self.status_text.is_empty() {
            self.status.label()
        } else {
            &self.status_text
        }
    }
}

/// A directed, typed relationship.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge {
    pub from: NodeId,
    pub to: NodeId,
    pub relation: Relation,
}

impl Edge {
    pub fn new(from: impl Into<String>, to: impl Into<String>, relation: Relation) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            relation,
        }
    }

    pub fn is_hierarchical(&self) -> bool {
        self.relation.is_hierarchical()
    }
}

/// One immutable snapshot: nodes in delivery order plus edges in delivery order.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Graph {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
    index: HashMap<NodeId, usize>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &str) -> Option<&Node> {
        self.index.get(id).map(|&idx| &self.nodes[idx])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Add a node. Panics if the id is already present.
    pub fn add_node(&mut self, node: Node) {
        assert!(!self.contains(&node.id), "duplicate node: {}", node.id);
        self.index.insert(node.id.clone(), self.nodes.len());
        self.nodes.push(node);
    }

    pub fn add_edge(&mut self, edge: Edge) {
        self.edges.push(edge);
    }

    /// Edges with at least one endpoint missing from the snapshot.
    pub fn dangling_edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges
            .iter()
            .filter(|e| !self.contains(&e.from) || !self.contains(&e.to))
    }
}

fn normalize_word(raw: &str) -> String {
    raw.trim()
        .to_lowercase()
        .replace(['_', '-'], " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
