//! Built-in sample snapshot for `--demo` and `kgnav init`.

use crate::graph::model::{Edge, Graph, Node, NodeType, Relation};

pub fn demo_graph() -> Graph {
    let mut g = Graph::new();

    let mut platform = Node::new("proj-platform", NodeType::Project, "Platform");
    platform.description = "Core services and the web frontend.".to_string();
    platform.url = "https://tracker.example.com/projects/platform".to_string();
    g.add_node(platform);

    let mut mobile = Node::new("proj-mobile", NodeType::Project, "Mobile App");
    mobile.description = "iOS and Android clients.".to_string();
    g.add_node(mobile);

    let mut billing = Node::new("svc-billing", NodeType::Service, "billing-api");
    billing.project = "Platform".to_string();
    g.add_node(billing);

    let mut auth = Node::new("svc-auth", NodeType::Service, "auth-gateway");
    auth.project = "Platform".to_string();
    g.add_node(auth);

    let issues = [
        ("PLT-101", "Session tokens expire too early", "In Progress", 1, vec!["auth", "bug"]),
        ("PLT-102", "Invoice PDF renders blank totals", "Todo", 2, vec!["billing"]),
        ("PLT-103", "Migrate billing to event sourcing", "Blocked", 2, vec!["billing", "epic"]),
        ("PLT-104", "Rate limit login endpoint", "Done", 3, vec!["auth", "security"]),
        ("MOB-7", "Offline mode for order history", "Backlog", 3, vec!["mobile"]),
        ("MOB-8", "Crash when rotating on checkout", "In Review", 1, vec!["mobile", "bug"]),
        ("PLT-105", "Drop legacy SOAP adapter", "Cancelled", 4, vec![]),
    ];
    for (identifier, title, status, priority, labels) in issues {
        let mut node = Node::new(identifier.to_lowercase(), NodeType::Issue, title).with_status(status);
        node.identifier = identifier.to_string();
        node.priority = priority;
        node.labels = labels.into_iter().map(str::to_string).collect();
        node.project = if identifier.starts_with("MOB") {
            "Mobile App".to_string()
        } else {
            "Platform".to_string()
        };
        node.url = format!("https://tracker.example.com/issues/{identifier}");
        g.add_node(node);
    }

    let prs = [
        ("pr-412", "#412", "Refresh tokens before expiry", "Open"),
        ("pr-398", "#398", "Add login rate limiter", "Merged"),
        ("pr-420", "#420", "Fix totals in invoice template", "In Review"),
        ("pr-77", "#77", "Guard checkout against config changes", "Closed"),
    ];
    for (id, identifier, title, status) in prs {
        let mut node = Node::new(id, NodeType::PullRequest, title).with_status(status);
        node.identifier = identifier.to_string();
        g.add_node(node);
    }

    for (id, title) in [
        ("c-9f1e2a", "9f1e2a refresh token on 401"),
        ("c-41bd07", "41bd07 token bucket limiter"),
        ("c-d00d11", "d00d11 invoice totals rounding"),
    ] {
        g.add_node(Node::new(id, NodeType::Commit, title).with_status("merged"));
    }

    for (id, title) in [
        ("f-session", "auth/session.rs"),
        ("f-limiter", "auth/limiter.rs"),
        ("f-invoice", "billing/invoice.html"),
        ("f-readme", "README.md"),
    ] {
        g.add_node(Node::new(id, NodeType::File, title));
    }

    let mut odd = Node::new("misc-1", NodeType::parse("epic"), "Q3 reliability theme").with_status("someday");
    odd.description = "Imported from an unknown source type.".to_string();
    g.add_node(odd);

    let edges = [
        ("proj-platform", "svc-billing", Relation::Owns),
        ("proj-platform", "svc-auth", Relation::Owns),
        ("svc-auth", "plt-101", Relation::Owns),
        ("svc-auth", "plt-104", Relation::Owns),
        ("svc-billing", "plt-102", Relation::Owns),
        ("svc-billing", "plt-103", Relation::Owns),
        ("proj-platform", "plt-105", Relation::Owns),
        ("proj-mobile", "mob-7", Relation::Owns),
        ("proj-mobile", "mob-8", Relation::Owns),
        ("plt-101", "pr-412", Relation::Owns),
        ("plt-104", "pr-398", Relation::Owns),
        ("plt-102", "pr-420", Relation::Owns),
        ("mob-8", "pr-77", Relation::Owns),
        ("pr-77", "mob-8", Relation::Implements),
        ("pr-412", "c-9f1e2a", Relation::Owns),
        ("pr-398", "c-41bd07", Relation::Owns),
        ("pr-420", "c-d00d11", Relation::Owns),
        ("c-9f1e2a", "f-session", Relation::Modifies),
        ("c-41bd07", "f-limiter", Relation::Modifies),
        ("c-41bd07", "f-session", Relation::Modifies),
        ("c-d00d11", "f-invoice", Relation::Modifies),
        ("plt-103", "plt-102", Relation::Blocks),
        ("plt-101", "mob-8", Relation::Related),
        ("svc-billing", "svc-auth", Relation::Calls),
        ("pr-420", "plt-103", Relation::Mentions),
        ("proj-mobile", "svc-auth", Relation::DependsOn),
        ("f-readme", "proj-platform", Relation::References),
        ("plt-105", "svc-billing", Relation::parse("supersedes")),
        ("mob-7", "ticket-gone", Relation::Related),
    ];
    for (from, to, relation) in edges {
        g.add_edge(Edge::new(from, to, relation));
    }
    g
}
