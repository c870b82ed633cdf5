use force_graph::{DefaultNodeIdx, EdgeData, ForceGraph, NodeData};
use sitegraph_core::layout::{SEED_RADIUS, node_mass};
use sitegraph_core::{ColorScale, DocumentError, GraphDocument, LayoutOptions};
use std::f32::consts::PI;

/// Hovered nodes grow by the same factor the SVG hover transition uses.
pub const HOVER_SCALE: f32 = 1.3;

// Minimum pick distance so thin terminal cells still land on small nodes
const HIT_RADIUS: f32 = 12.0;

/// What the viewer knows about a node besides its position.
#[derive(Debug, Clone)]
pub struct NodeInfo {
    pub name: String,
    pub path: String,
    pub color: String,
    pub radius: f32,
}

/// Live force-directed view of a graph document. Pointer interaction follows
/// the rendered SVG: hovering pins a node in place and shows its path,
/// dragging moves the node and hides the tooltip until release.
pub struct GraphView {
    graph: ForceGraph<usize, ()>,
    handles: Vec<DefaultNodeIdx>,
    infos: Vec<NodeInfo>,
    edges: Vec<(usize, usize)>,
    hovered: Option<usize>,
    dragging: Option<usize>,
    tooltip: Option<usize>,
    paused: bool,
    width: f32,
    height: f32,
}

impl GraphView {
    pub fn new(doc: &GraphDocument, width: f32, height: f32) -> Result<Self, DocumentError> {
        let links = doc.resolved_links()?;
        let mut colors = ColorScale::new(&doc.colors);

        let mut graph: ForceGraph<usize, ()> =
            ForceGraph::new(LayoutOptions::with_viewport(width, height).simulation_parameters());
        let mut handles = Vec::with_capacity(doc.nodes.len());
        let mut infos = Vec::with_capacity(doc.nodes.len());

        for (i, node) in doc.nodes.iter().enumerate() {
            let angle = (i as f32) * 2.0 * PI / doc.nodes.len().max(1) as f32;
            let idx = graph.add_node(NodeData {
                x: width / 2.0 + SEED_RADIUS * angle.cos(),
                y: height / 2.0 + SEED_RADIUS * angle.sin(),
                mass: node_mass(node.value),
                is_anchor: false,
                user_data: i,
            });
            handles.push(idx);
            infos.push(NodeInfo {
                name: node.name.clone(),
                path: node.path.clone(),
                color: colors.color_for(&node.kind),
                radius: (node.value * 20.0).max(4.0) as f32,
            });
        }

        for &(source, target) in &links {
            graph.add_edge(handles[source], handles[target], EdgeData::default());
        }

        Ok(Self {
            graph,
            handles,
            infos,
            edges: links,
            hovered: None,
            dragging: None,
            tooltip: None,
            paused: false,
            width,
            height,
        })
    }

    pub fn node_count(&self) -> usize {
        self.infos.len()
    }

    pub fn infos(&self) -> &[NodeInfo] {
        &self.infos
    }

    pub fn edges(&self) -> &[(usize, usize)] {
        &self.edges
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn hovered(&self) -> Option<usize> {
        self.hovered
    }

    pub fn tooltip(&self) -> Option<usize> {
        self.tooltip
    }

    pub fn tooltip_text(&self) -> Option<&str> {
        self.tooltip.map(|index| self.infos[index].path.as_str())
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging.is_some()
    }

    /// Current position of every node, in node order.
    pub fn positions(&self) -> Vec<(f32, f32)> {
        let mut positions = vec![(0.0, 0.0); self.infos.len()];
        self.graph.visit_nodes(|node| {
            positions[node.data.user_data] = (node.x(), node.y());
        });
        positions
    }

    pub fn display_radius(&self, index: usize) -> f32 {
        let scale = if self.hovered == Some(index) {
            HOVER_SCALE
        } else {
            1.0
        };
        self.infos[index].radius * scale
    }

    /// Advance the simulation unless paused.
    pub fn tick(&mut self, dt: f32) {
        if !self.paused {
            self.graph.update(dt);
        }
    }

    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
    }

    /// Put every node back on the seed circle and unpin everything.
    pub fn reheat(&mut self) {
        self.dragging = None;
        self.hovered = None;
        self.tooltip = None;

        let (width, height) = (self.width, self.height);
        let count = self.infos.len().max(1) as f32;
        self.graph.visit_nodes_mut(|node| {
            let angle = node.data.user_data as f32 * 2.0 * PI / count;
            node.data.x = width / 2.0 + SEED_RADIUS * angle.cos();
            node.data.y = height / 2.0 + SEED_RADIUS * angle.sin();
            node.data.is_anchor = false;
        });
    }

    /// Closest node whose radius (or the pick floor) covers the point.
    pub fn node_at(&self, x: f32, y: f32) -> Option<usize> {
        let mut best: Option<(usize, f32)> = None;
        for (index, &(nx, ny)) in self.positions().iter().enumerate() {
            let reach = self.infos[index].radius.max(HIT_RADIUS);
            let distance = ((nx - x).powi(2) + (ny - y).powi(2)).sqrt();
            if distance <= reach && best.is_none_or(|(_, d)| distance < d) {
                best = Some((index, distance));
            }
        }
        best.map(|(index, _)| index)
    }

    /// Hover a node (pinning it and showing its tooltip) or clear the hover.
    /// Ignored while a drag is active.
    pub fn set_hover(&mut self, index: Option<usize>) {
        if self.dragging.is_some() || self.hovered == index {
            return;
        }
        if let Some(old) = self.hovered {
            self.set_anchor(old, false);
        }
        if let Some(new) = index {
            self.set_anchor(new, true);
        }
        self.hovered = index;
        self.tooltip = index;
    }

    pub fn pointer_down(&mut self, x: f32, y: f32) {
        let Some(index) = self.node_at(x, y) else {
            return;
        };
        self.set_hover(Some(index));
        self.dragging = Some(index);
        // Tooltip stays hidden for the whole drag
        self.tooltip = None;
    }

    pub fn pointer_moved(&mut self, x: f32, y: f32) {
        if let Some(index) = self.dragging {
            self.move_node(index, x, y);
            return;
        }
        let hit = self.node_at(x, y);
        self.set_hover(hit);
    }

    pub fn pointer_up(&mut self) {
        if let Some(index) = self.dragging.take() {
            self.tooltip = Some(index);
        }
    }

    fn set_anchor(&mut self, index: usize, anchored: bool) {
        self.graph.visit_nodes_mut(|node| {
            if node.data.user_data == index {
                node.data.is_anchor = anchored;
            }
        });
    }

    fn move_node(&mut self, index: usize, x: f32, y: f32) {
        self.graph.visit_nodes_mut(|node| {
            if node.data.user_data == index {
                node.data.x = x;
                node.data.y = y;
                node.data.is_anchor = true;
            }
        });
    }
}
