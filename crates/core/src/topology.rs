//! Network topology graph.
//!
//! Builds a directed graph (switches as nodes, connected ports as edges)
//! from plain row data, and renders it as Graphviz DOT for any layout
//! backend. The graph is derived data; the database stays the source of
//! truth.

use std::collections::HashSet;

use serde::Serialize;

use crate::inventory::SwitchRole;
use crate::types::DbId;

/// Fill colour for Grandmaster nodes.
pub const GRANDMASTER_COLOR: &str = "#2ca02c";

/// Fill colour for every other node.
pub const SWITCH_COLOR: &str = "#1f77b4";

/// Switch data consumed by [`build_topology`].
#[derive(Debug, Clone, PartialEq)]
pub struct SwitchNode {
    pub id: DbId,
    pub name: String,
    pub role: String,
    pub ip_address: Option<String>,
    pub mac: Option<String>,
}

/// A port row that points at a remote switch.
#[derive(Debug, Clone, PartialEq)]
pub struct LinkEnd {
    pub port_id: DbId,
    pub switch_id: DbId,
    pub port_num: i32,
    pub connected_to_id: DbId,
    pub connected_port_num: Option<i32>,
    pub vlan: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopologyNode {
    pub id: DbId,
    pub name: String,
    pub role: String,
    pub is_grandmaster: bool,
    pub ip_address: Option<String>,
    pub mac: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopologyEdge {
    pub port_id: DbId,
    pub source: DbId,
    pub target: DbId,
    /// `"<local port>:<remote port>"`, remote shown as `?` when unknown,
    /// plus `" (VLAN n)"` for tagged links.
    pub label: String,
    pub vlan: Option<i32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TopologyGraph {
    pub nodes: Vec<TopologyNode>,
    pub edges: Vec<TopologyEdge>,
}

/// Map switch and link rows to a graph.
///
/// Nodes keep input order. Edges are ordered by (source, local port, port id)
/// so the output is stable. Links whose source or target switch is not in
/// `switches` are dropped.
pub fn build_topology(switches: &[SwitchNode], links: &[LinkEnd]) -> TopologyGraph {
    let known: HashSet<DbId> = switches.iter().map(|s| s.id).collect();

    let nodes = switches
        .iter()
        .map(|s| TopologyNode {
            id: s.id,
            name: s.name.clone(),
            role: s.role.clone(),
            is_grandmaster: s
                .role
                .parse::<SwitchRole>()
                .is_ok_and(SwitchRole::is_grandmaster),
            ip_address: s.ip_address.clone(),
            mac: s.mac.clone(),
        })
        .collect();

    let mut connected: Vec<&LinkEnd> = links
        .iter()
        .filter(|l| known.contains(&l.switch_id) && known.contains(&l.connected_to_id))
        .collect();
    connected.sort_by_key(|l| (l.switch_id, l.port_num, l.port_id));

    let edges = connected
        .into_iter()
        .map(|l| TopologyEdge {
            port_id: l.port_id,
            source: l.switch_id,
            target: l.connected_to_id,
            label: edge_label(l),
            vlan: l.vlan.filter(|v| *v != 0),
        })
        .collect();

    TopologyGraph { nodes, edges }
}

fn edge_label(link: &LinkEnd) -> String {
    let remote = link
        .connected_port_num
        .map_or_else(|| "?".to_string(), |n| n.to_string());
    match link.vlan.filter(|v| *v != 0) {
        Some(vlan) => format!("{}:{remote} (VLAN {vlan})", link.port_num),
        None => format!("{}:{remote}", link.port_num),
    }
}

/// Render the graph as a Graphviz `digraph`.
pub fn render_dot(graph: &TopologyGraph) -> String {
    let mut out = String::from("digraph topology {\n");
    out.push_str("  rankdir=TB;\n");
    out.push_str("  node [shape=record, style=filled, fontcolor=white];\n");

    for node in &graph.nodes {
        let color = if node.is_grandmaster {
            GRANDMASTER_COLOR
        } else {
            SWITCH_COLOR
        };
        out.push_str(&format!(
            "  n{} [label=\"{{ {} | {} }}\", fillcolor=\"{color}\"];\n",
            node.id,
            escape_record(&node.name),
            escape_record(&node.role),
        ));
    }

    for edge in &graph.edges {
        out.push_str(&format!(
            "  n{} -> n{} [label=\"{}\"];\n",
            edge.source,
            edge.target,
            escape_quoted(&edge.label),
        ));
    }

    out.push_str("}\n");
    out
}

fn escape_quoted(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Record labels additionally treat `{ } | < >` as structure.
fn escape_record(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in escape_quoted(text).chars() {
        if matches!(c, '{' | '}' | '|' | '<' | '>') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn switch(id: DbId, name: &str, role: &str) -> SwitchNode {
        SwitchNode {
            id,
            name: name.to_string(),
            role: role.to_string(),
            ip_address: None,
            mac: None,
        }
    }

    fn link(port_id: DbId, from: DbId, port: i32, to: DbId, remote: Option<i32>) -> LinkEnd {
        LinkEnd {
            port_id,
            switch_id: from,
            port_num: port,
            connected_to_id: to,
            connected_port_num: remote,
            vlan: None,
        }
    }

    #[test]
    fn nodes_mirror_switches() {
        let graph = build_topology(
            &[switch(1, "GM", "Grandmaster"), switch(2, "BC", "Boundary Clock")],
            &[],
        );
        assert_eq!(graph.nodes.len(), 2);
        assert!(graph.nodes[0].is_grandmaster);
        assert!(!graph.nodes[1].is_grandmaster);
        assert!(graph.edges.is_empty());
    }

    #[test]
    fn edge_labels_encode_ports_and_vlan() {
        let mut tagged = link(11, 1, 2, 2, Some(5));
        tagged.vlan = Some(100);
        let graph = build_topology(
            &[switch(1, "GM", "Grandmaster"), switch(2, "BC", "Slave")],
            &[link(10, 1, 1, 2, Some(1)), tagged, link(12, 2, 3, 1, None)],
        );
        let labels: Vec<&str> = graph.edges.iter().map(|e| e.label.as_str()).collect();
        assert_eq!(labels, ["1:1", "2:5 (VLAN 100)", "3:?"]);
        assert_eq!(graph.edges[1].vlan, Some(100));
    }

    #[test]
    fn vlan_zero_is_untagged() {
        let mut l = link(10, 1, 1, 2, Some(1));
        l.vlan = Some(0);
        let graph = build_topology(&[switch(1, "A", "Slave"), switch(2, "B", "Slave")], &[l]);
        assert_eq!(graph.edges[0].label, "1:1");
        assert_eq!(graph.edges[0].vlan, None);
    }

    #[test]
    fn links_to_unknown_switches_dropped() {
        let graph = build_topology(
            &[switch(1, "A", "Slave")],
            &[link(10, 1, 1, 99, Some(1)), link(11, 98, 1, 1, None)],
        );
        assert!(graph.edges.is_empty());
    }

    #[test]
    fn edges_sorted_by_source_then_port() {
        let graph = build_topology(
            &[switch(1, "A", "Slave"), switch(2, "B", "Slave")],
            &[
                link(30, 2, 1, 1, None),
                link(20, 1, 10, 2, None),
                link(21, 1, 2, 2, None),
            ],
        );
        let ids: Vec<DbId> = graph.edges.iter().map(|e| e.port_id).collect();
        assert_eq!(ids, [21, 20, 30]);
    }

    #[test]
    fn dot_output() {
        let graph = build_topology(
            &[switch(1, "GM", "Grandmaster"), switch(2, "BC|1", "Slave")],
            &[link(10, 1, 1, 2, Some(3))],
        );
        let dot = render_dot(&graph);
        assert!(dot.starts_with("digraph topology {\n"));
        assert!(dot.contains("n1 [label=\"{ GM | Grandmaster }\", fillcolor=\"#2ca02c\"];"));
        assert!(dot.contains("n2 [label=\"{ BC\\|1 | Slave }\", fillcolor=\"#1f77b4\"];"));
        assert!(dot.contains("n1 -> n2 [label=\"1:3\"];"));
        assert!(dot.ends_with("}\n"));
    }
}
