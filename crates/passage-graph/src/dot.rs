//! DOT export for character graphs
//!
//! Emits a Graphviz description so the graph can be laid out and drawn
//! by external tooling. Anti-edges are drawn dashed.

use petgraph::dot::{Config, Dot};

use crate::{CharacterGraph, EdgeKind};

/// Render the graph as Graphviz DOT
pub fn to_dot(graph: &CharacterGraph) -> String {
    let view = graph.to_petgraph();
    let dot = Dot::with_attr_getters(
        &view,
        &[Config::EdgeNoLabel],
        &|_, (_, _, kind)| match kind {
            EdgeKind::Exclusion => "style = dashed".to_string(),
            EdgeKind::Cooccurrence => String::new(),
        },
        &|_, _| String::new(),
    );
    dot.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dot_output_shape() {
        let mut graph = CharacterGraph::default();
        graph.add_node("Elizabeth");
        graph.add_node("Darcy");
        graph.add_node("Collins");
        graph.add_edge("Elizabeth", "Darcy").unwrap();
        graph.add_antiedge("Elizabeth", "Collins").unwrap();

        let dot = to_dot(&graph);
        assert!(dot.starts_with("graph {"));
        assert!(dot.contains("Elizabeth"));
        assert!(dot.contains("Darcy"));
        // Exactly the anti-edge is dashed.
        assert_eq!(dot.matches("style = dashed").count(), 1);
    }

    #[test]
    fn test_dot_deterministic() {
        let mut graph = CharacterGraph::default();
        graph.add_node("Jane");
        graph.add_node("Bingley");
        graph.add_edge("Jane", "Bingley").unwrap();

        assert_eq!(to_dot(&graph), to_dot(&graph));
    }
}
