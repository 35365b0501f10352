//! Type/status/search filtering over a snapshot.

use crate::graph::model::{Graph, Node, NodeType, Status};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TypeFilter {
    #[default]
    All,
    ProjectsAndWork,
    Issues,
    PullRequests,
    Files,
    Commits,
}

impl TypeFilter {
    pub fn next(self) -> Self {
        match self {
            Self::All => Self::ProjectsAndWork,
            Self::ProjectsAndWork => Self::Issues,
            Self::Issues => Self::PullRequests,
            Self::PullRequests => Self::Files,
            Self::Files => Self::Commits,
            Self::Commits => Self::All,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::ProjectsAndWork => "work",
            Self::Issues => "issues",
            Self::PullRequests => "prs",
            Self::Files => "files",
            Self::Commits => "commits",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "all" => Some(Self::All),
            "work" | "projects" => Some(Self::ProjectsAndWork),
            "issues" => Some(Self::Issues),
            "prs" => Some(Self::PullRequests),
            "files" => Some(Self::Files),
            "commits" => Some(Self::Commits),
            _ => None,
        }
    }

    pub fn matches(self, kind: NodeType) -> bool {
        match self {
            Self::All => true,
            Self::ProjectsAndWork => matches!(
                kind,
                NodeType::Project | NodeType::Service | NodeType::Issue | NodeType::PullRequest
            ),
            Self::Issues => kind == NodeType::Issue,
            Self::PullRequests => kind == NodeType::PullRequest,
            Self::Files => kind == NodeType::File,
            Self::Commits => kind == NodeType::Commit,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Active,
    NotDone,
    Done,
}

impl StatusFilter {
    pub fn next(self) -> Self {
        match self {
            Self::All => Self::Active,
            Self::Active => Self::NotDone,
            Self::NotDone => Self::Done,
            Self::Done => Self::All,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Active => "active",
            Self::NotDone => "not_done",
            Self::Done => "done",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().replace('-', "_").as_str() {
            "all" => Some(Self::All),
            "active" => Some(Self::Active),
            "not_done" | "notdone" | "open" => Some(Self::NotDone),
            "done" => Some(Self::Done),
            _ => None,
        }
    }

    /// Unknown statuses fall into the not-done bucket.
    pub fn matches(self, status: Status) -> bool {
        match self {
            Self::All => true,
            Self::Active => status == Status::Active,
            Self::NotDone => !status.is_done(),
            Self::Done => status.is_done(),
        }
    }
}

/// The three predicates applied conjunctively to every node.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterSpec {
    pub kind: TypeFilter,
    pub status: StatusFilter,
    pub search: String,
}

impl FilterSpec {
    pub fn matches(&self, node: &Node) -> bool {
        if !self.kind.matches(node.kind) {
            return false;
        }
        if !node.kind.is_anchor() && !self.status.matches(node.status) {
            return false;
        }
        self.search.is_empty()
            || node
                .title
                .to_lowercase()
                .contains(&self.search.to_lowercase())
    }
}

/// Apply `spec` to `graph`, returning a new snapshot that keeps node and edge
/// order. Edges survive only when both endpoints survive.
pub fn apply(graph: &Graph, spec: &FilterSpec) -> Graph {
    let mut out = Graph::new();
    for node in graph.nodes.iter().filter(|n| spec.matches(n)) {
        out.add_node(node.clone());
    }
    for edge in &graph.edges {
        if out.contains(&edge.from) && out.contains(&edge.to) {
            out.add_edge(edge.clone());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::model::{Edge, Relation};

    fn sample() -> Graph {
        let mut g = Graph::new();
        g.add_node(Node::new("p", NodeType::Project, "Platform").with_status("done"));
        g.add_node(Node::new("svc", NodeType::Service, "Billing API").with_status(""));
        g.add_node(Node::new("i1", NodeType::Issue, "Fix login").with_status("In Progress"));
        g.add_node(Node::new("i2", NodeType::Issue, "Old bug").with_status("Closed"));
        g.add_node(Node::new("i3", NodeType::Issue, "Odd one").with_status("Pondering"));
        g.add_node(Node::new("pr", NodeType::PullRequest, "Login fix").with_status("merged"));
        g.add_node(Node::new("c", NodeType::Commit, "abc123 login").with_status(""));
        g.add_node(Node::new("f", NodeType::File, "src/login.rs"));
        g.add_edge(Edge::new("p", "i1", Relation::Owns));
        g.add_edge(Edge::new("p", "i2", Relation::Owns));
        g.add_edge(Edge::new("i1", "pr", Relation::Implements));
        g.add_edge(Edge::new("pr", "f", Relation::Modifies));
        g.add_edge(Edge::new("i2", "i1", Relation::Blocks));
        g.add_edge(Edge::new("p", "nowhere", Relation::Owns));
        g
    }

    fn ids(g: &Graph) -> Vec<&str> {
        g.nodes.iter().map(|n| n.id.as_str()).collect()
    }

    #[test]
    fn unfiltered_keeps_everything_but_dangling_edges() {
        let g = sample();
        let out = apply(&g, &FilterSpec::default());
        assert_eq!(out.nodes.len(), g.nodes.len());
        assert_eq!(out.edges.len(), g.edges.len() - 1);
        assert!(out.edges.iter().all(|e| e.to != "nowhere"));
    }

    #[test]
    fn status_active_keeps_anchors_and_active_only() {
        let spec = FilterSpec {
            status: StatusFilter::Active,
            ..FilterSpec::default()
        };
        let out = apply(&sample(), &spec);
        assert_eq!(ids(&out), vec!["p", "svc", "i1"]);
        assert_eq!(out.edges.len(), 1);
    }

    #[test]
    fn status_not_done_keeps_unknown_statuses() {
        let spec = FilterSpec {
            status: StatusFilter::NotDone,
            ..FilterSpec::default()
        };
        let out = apply(&sample(), &spec);
        assert_eq!(ids(&out), vec!["p", "svc", "i1", "i3", "c", "f"]);
    }

    #[test]
    fn status_done_keeps_done_family() {
        let spec = FilterSpec {
            status: StatusFilter::Done,
            ..FilterSpec::default()
        };
        let out = apply(&sample(), &spec);
        assert_eq!(ids(&out), vec!["p", "svc", "i2", "pr"]);
    }

    #[test]
    fn type_filter_buckets() {
        let g = sample();
        let by = |kind| {
            let spec = FilterSpec {
                kind,
                ..FilterSpec::default()
            };
            apply(&g, &spec)
                .nodes
                .iter()
                .map(|n| n.id.clone())
                .collect::<Vec<_>>()
        };
        assert_eq!(by(TypeFilter::ProjectsAndWork), vec!["p", "svc", "i1", "i2", "i3", "pr"]);
        assert_eq!(by(TypeFilter::Issues), vec!["i1", "i2", "i3"]);
        assert_eq!(by(TypeFilter::PullRequests), vec!["pr"]);
        assert_eq!(by(TypeFilter::Files), vec!["f"]);
        assert_eq!(by(TypeFilter::Commits), vec!["c"]);
    }

    #[test]
    fn search_is_case_insensitive_title_substring() {
        let spec = FilterSpec {
            search: "LOGIN".to_string(),
            ..FilterSpec::default()
        };
        let out = apply(&sample(), &spec);
        assert_eq!(ids(&out), vec!["i1", "pr", "c", "f"]);
        assert_eq!(out.edges.len(), 2);
    }

    #[test]
    fn search_whitespace_is_part_of_the_query() {
        let spec = FilterSpec {
            search: "fix ".to_string(),
            ..FilterSpec::default()
        };
        assert_eq!(ids(&apply(&sample(), &spec)), vec!["i1"]);

        let spec = FilterSpec {
            search: "   ".to_string(),
            ..FilterSpec::default()
        };
        assert!(apply(&sample(), &spec).nodes.is_empty());
    }

    #[test]
    fn filtered_output_is_closed_under_predicates() {
        let g = sample();
        let mut spec = FilterSpec::default();
        for _ in 0..6 {
            for _ in 0..4 {
                for search in ["", "o", "zzz"] {
                    spec.search = search.to_string();
                    let out = apply(&g, &spec);
                    for node in &out.nodes {
                        assert!(spec.matches(node));
                        assert!(g.contains(&node.id));
                    }
                    for edge in &out.edges {
                        assert!(out.contains(&edge.from) && out.contains(&edge.to));
                    }
                }
                spec.status = spec.status.next();
            }
            spec.kind = spec.kind.next();
        }
    }

    #[test]
    fn empty_result_is_valid() {
        let spec = FilterSpec {
            search: "no such title".to_string(),
            ..FilterSpec::default()
        };
        let out = apply(&sample(), &spec);
        assert!(out.nodes.is_empty());
        assert!(out.edges.is_empty());
    }

    #[test]
    fn filters_cycle_back_to_all() {
        let mut t = TypeFilter::All;
        for _ in 0..6 {
            t = t.next();
        }
        assert_eq!(t, TypeFilter::All);
        let mut s = StatusFilter::All;
        for _ in 0..4 {
            s = s.next();
        }
        assert_eq!(s, StatusFilter::All);
        assert_eq!(StatusFilter::parse("not-done"), Some(StatusFilter::NotDone));
        assert_eq!(TypeFilter::parse("PRs"), Some(TypeFilter::PullRequests));
    }
}
