use crate::color::ColorScale;
use crate::document::{DocumentError, GraphDocument};

/// Convert a graph document to DOT format for rendering with graphviz.
pub fn render_dot(doc: &GraphDocument) -> Result<String, DocumentError> {
    let links = doc.resolved_links()?;
    let mut color = ColorScale::new(&doc.colors);

    let mut lines = Vec::new();
    lines.push("digraph sitegraph {".to_string());
    lines.push("    rankdir=LR;".to_string());
    lines.push("    node [shape=circle, style=filled];".to_string());

    for (i, node) in doc.nodes.iter().enumerate() {
        lines.push(format!(
            "    n{} [label=\"{}\", fillcolor=\"{}\"];",
            i,
            escape_dot(&node.name),
            color.color_for(&node.kind)
        ));
    }

    for &(source, target) in &links {
        lines.push(format!("    n{} -> n{};", source, target));
    }

    lines.push("}".to_string());
    Ok(lines.join("\n"))
}

fn escape_dot(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "\\\"")
}
