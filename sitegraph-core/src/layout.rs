use crate::document::{DocumentError, GraphDocument};
use force_graph::{DefaultNodeIdx, EdgeData, ForceGraph, NodeData, SimulationParameters};
use std::collections::HashMap;
use std::f32::consts::PI;
use thiserror::Error;
use tracing::debug;

// Nodes start evenly spaced on a circle of this radius around the viewport
// centre, so identical documents always settle identically.
pub const SEED_RADIUS: f32 = 100.0;
const BASE_MASS: f32 = 10.0;
const MASS_PER_VALUE: f32 = 5.0;
const TICK_SECONDS: f32 = 1.0 / 60.0;

/// Heavier nodes for larger assets, same weighting everywhere a simulation
/// runs over a document.
pub fn node_mass(value: f64) -> f32 {
    BASE_MASS + value as f32 * MASS_PER_VALUE
}

#[derive(Error, Debug)]
pub enum LayoutError {
    #[error(transparent)]
    Document(#[from] DocumentError),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Clone)]
pub struct LayoutOptions {
    pub width: f32,
    pub height: f32,
    /// Simulation steps to run before reading positions back.
    pub iterations: usize,
    pub margin: f32,
    pub charge: f32,
    pub spring: f32,
    pub max_force: f32,
    pub node_speed: f32,
    pub damping: f32,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            width: 960.0,
            height: 600.0,
            iterations: 300,
            margin: 40.0,
            charge: 150.0,
            spring: 0.05,
            max_force: 100.0,
            node_speed: 3000.0,
            damping: 0.9,
        }
    }
}

impl LayoutOptions {
    pub fn with_viewport(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    pub fn simulation_parameters(&self) -> SimulationParameters {
        SimulationParameters {
            force_charge: self.charge,
            force_spring: self.spring,
            force_max: self.max_force,
            node_speed: self.node_speed,
            damping_factor: self.damping,
        }
    }
}

/// Run the force simulation for a document and return one settled position
/// per node, in node order, rescaled to fit the viewport.
pub fn layout(doc: &GraphDocument, opts: &LayoutOptions) -> Result<Vec<Point>, LayoutError> {
    if doc.nodes.is_empty() {
        return Ok(Vec::new());
    }

    let links = doc.resolved_links()?;

    let mut graph: ForceGraph<usize, ()> = ForceGraph::new(opts.simulation_parameters());
    let mut handles: Vec<DefaultNodeIdx> = Vec::with_capacity(doc.nodes.len());

    for (i, node) in doc.nodes.iter().enumerate() {
        let angle = (i as f32) * 2.0 * PI / doc.nodes.len() as f32;
        let idx = graph.add_node(NodeData {
            x: opts.width / 2.0 + SEED_RADIUS * angle.cos(),
            y: opts.height / 2.0 + SEED_RADIUS * angle.sin(),
            mass: node_mass(node.value),
            is_anchor: false,
            user_data: i,
        });
        handles.push(idx);
    }

    for &(source, target) in &links {
        graph.add_edge(handles[source], handles[target], EdgeData::default());
    }

    for _ in 0..opts.iterations {
        graph.update(TICK_SECONDS);
    }
    debug!(
        "layout settled after {} iterations for {} nodes",
        opts.iterations,
        doc.nodes.len()
    );

    let mut settled: HashMap<DefaultNodeIdx, Point> = HashMap::with_capacity(handles.len());
    graph.visit_nodes(|node| {
        settled.insert(
            node.index(),
            Point {
                x: node.x(),
                y: node.y(),
            },
        );
    });

    let mut positions: Vec<Point> = handles
        .iter()
        .map(|idx| settled.get(idx).copied().unwrap_or(Point {
            x: opts.width / 2.0,
            y: opts.height / 2.0,
        }))
        .collect();

    fit_to_viewport(&mut positions, opts);
    Ok(positions)
}

// Uniformly rescale positions so the whole graph sits inside the viewport
// with the configured margin. A degenerate span collapses to the centre.
fn fit_to_viewport(positions: &mut [Point], opts: &LayoutOptions) {
    if positions.is_empty() {
        return;
    }

    let mut min_x = f32::MAX;
    let mut max_x = f32::MIN;
    let mut min_y = f32::MAX;
    let mut max_y = f32::MIN;
    for p in positions.iter() {
        min_x = min_x.min(p.x);
        max_x = max_x.max(p.x);
        min_y = min_y.min(p.y);
        max_y = max_y.max(p.y);
    }

    let span_x = max_x - min_x;
    let span_y = max_y - min_y;
    let usable_x = (opts.width - 2.0 * opts.margin).max(1.0);
    let usable_y = (opts.height - 2.0 * opts.margin).max(1.0);

    let scale_x = if span_x > f32::EPSILON {
        usable_x / span_x
    } else {
        f32::MAX
    };
    let scale_y = if span_y > f32::EPSILON {
        usable_y / span_y
    } else {
        f32::MAX
    };
    let scale = match scale_x.min(scale_y) {
        s if s == f32::MAX => 1.0,
        s => s,
    };

    let centre_x = (min_x + max_x) / 2.0;
    let centre_y = (min_y + max_y) / 2.0;
    for p in positions.iter_mut() {
        p.x = (p.x - centre_x) * scale + opts.width / 2.0;
        p.y = (p.y - centre_y) * scale + opts.height / 2.0;
    }
}
