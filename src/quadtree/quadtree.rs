//! Barnes-Hut quadtree over graph nodes.
//!
//! Cells live in a flat arena (`Vec<QuadCell>`) and refer to their children by
//! index. The tree is meant to be rebuilt from scratch whenever positions
//! change; there is no removal or incremental update.
//!
//! # Example
//!
//! ```
//! use rs_forceatlas::quadtree::{Body, QuadTree};
//!
//! let bodies = [
//!     Body { index: 0, x: -1.0, y: 0.0, mass: 1.0 },
//!     Body { index: 1, x: 1.0, y: 0.0, mass: 1.0 },
//!     Body { index: 2, x: 0.0, y: 2.0, mass: 2.0 },
//! ];
//! let tree = QuadTree::build(&bodies);
//! assert_eq!(tree.root().mass, 4.0);
//!
//! // Repulsion felt by node 0 from nodes 1 (distance 2) and 2 (distance sqrt 5).
//! let repulsion = tree.apply_force(&bodies[0], 0.0, 1.0);
//! let expected = 2.0 * (1.0 / 2.0 + 2.0 / 5f64.sqrt());
//! assert!((repulsion - expected).abs() < 1e-12);
//! ```
use log::warn;
use crate::quadtree::{Body, Quad};
use crate::utils::{MAX_TREE_DEPTH, MIN_DISTANCE};

const ROOT: usize = 0;

/// One square cell of the tree.
///
/// A leaf holds at most one node (`body`), except at `MAX_TREE_DEPTH` where
/// every further node routed to it is aggregated into its mass and center of
/// mass. An internal cell has four children and its mass and center of mass
/// are the aggregate of theirs.
#[derive(Clone, Debug)]
pub struct QuadCell {
    pub quad: Quad,
    pub mass: f64,
    pub com_x: f64, // center of mass x
    pub com_y: f64, // center of mass y
    /// Number of nodes inside the cell.
    pub count: usize,
    /// First node stored in a leaf.
    pub body: Option<usize>,
    /// Arena indices of the NW, NE, SW and SE children.
    pub children: Option<[usize; 4]>,
    pub depth: usize,
}

impl QuadCell {
    fn empty(quad: Quad, depth: usize) -> Self {
        QuadCell {
            quad,
            mass: 0.0,
            com_x: quad.cx,
            com_y: quad.cy,
            count: 0,
            body: None,
            children: None,
            depth,
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_none()
    }

    // Running weighted mean of the center of mass.
    fn absorb(&mut self, body: &Body) {
        let total_mass = self.mass + body.mass;
        if self.count > 0 && total_mass != 0.0 {
            self.com_x = (self.com_x * self.mass + body.x * body.mass) / total_mass;
            self.com_y = (self.com_y * self.mass + body.y * body.mass) / total_mass;
        } else {
            self.com_x = body.x;
            self.com_y = body.y;
        }
        self.mass = total_mass;
        self.count += 1;
    }

    // Mass and center of mass of the cell once `body` is taken out of it.
    fn without(&self, body: &Body) -> (f64, f64, f64) {
        let mass = self.mass - body.mass;
        if mass == 0.0 {
            return (0.0, self.com_x, self.com_y);
        }
        (
            mass,
            (self.com_x * self.mass - body.x * body.mass) / mass,
            (self.com_y * self.mass - body.y * body.mass) / mass,
        )
    }
}

/// Quadtree with arena-allocated cells.
pub struct QuadTree {
    cells: Vec<QuadCell>,
    members: Vec<bool>,
    saturated: bool,
}

impl QuadTree {
    /// Creates an empty tree covering `quad`.
    pub fn new(quad: Quad) -> Self {
        QuadTree {
            cells: vec![QuadCell::empty(quad, 0)],
            members: Vec::new(),
            saturated: false,
        }
    }

    /// Builds a tree over `bodies`, with the root covering their bounding
    /// square.
    pub fn build(bodies: &[Body]) -> Self {
        let quad = Quad::bounding(bodies.iter().map(|b| (b.x, b.y)));
        let mut tree = QuadTree::new(quad);
        tree.cells.reserve(2 * bodies.len());
        for body in bodies {
            tree.insert(*body);
        }
        tree
    }

    /// Inserts a node.
    ///
    /// Descending from the root, every internal cell on the way absorbs the
    /// node's mass. An empty leaf stores the node; an occupied leaf is split
    /// into four quadrants, its node pushed down one level, and the descent
    /// continues. Nodes that still share a leaf at `MAX_TREE_DEPTH` are
    /// aggregated there.
    pub fn insert(&mut self, body: Body) {
        if self.members.len() <= body.index {
            self.members.resize(body.index + 1, false);
        }
        self.members[body.index] = true;

        let mut cell = ROOT;
        loop {
            if let Some(children) = self.cells[cell].children {
                self.cells[cell].absorb(&body);
                cell = children[self.cells[cell].quad.quadrant_of(body.x, body.y)];
                continue;
            }
            if self.cells[cell].count == 0 {
                let leaf = &mut self.cells[cell];
                leaf.body = Some(body.index);
                leaf.absorb(&body);
                return;
            }
            if self.cells[cell].depth >= MAX_TREE_DEPTH {
                if !self.saturated {
                    warn!(
                        "Quadtree reached depth {}; aggregating coincident nodes into one leaf",
                        MAX_TREE_DEPTH
                    );
                    self.saturated = true;
                }
                self.cells[cell].absorb(&body);
                return;
            }
            self.split(cell);
        }
    }

    // Turns an occupied leaf into an internal cell, moving its node into the
    // matching child. Mass and center of mass of the cell are unchanged.
    fn split(&mut self, cell: usize) {
        let parent = &self.cells[cell];
        let depth = parent.depth + 1;
        let quads = parent.quad.subdivide();
        let existing = parent.body.map(|index| Body {
            index,
            x: parent.com_x,
            y: parent.com_y,
            mass: parent.mass,
        });
        let slot = parent.quad.quadrant_of(parent.com_x, parent.com_y);

        let first_child = self.cells.len();
        for quad in quads {
            self.cells.push(QuadCell::empty(quad, depth));
        }
        let children = [first_child, first_child + 1, first_child + 2, first_child + 3];

        if let Some(existing) = existing {
            let child = &mut self.cells[children[slot]];
            child.body = Some(existing.index);
            child.absorb(&existing);
        }
        let parent = &mut self.cells[cell];
        parent.body = None;
        parent.children = Some(children);
    }

    /// Total repulsion felt by `query` from every other node in the tree.
    ///
    /// Walks the tree from the root. A leaf, or a cell whose side over the
    /// distance to its center of mass is below `theta`, is treated as a single
    /// body contributing `repulsive_factor * (query.mass + 1) * mass / d`;
    /// other cells are opened. Distances are clamped to `MIN_DISTANCE`.
    ///
    /// If `query.index` was inserted, its own mass is removed from every cell
    /// on its insertion path, so a node never repels itself. The query must
    /// then carry the position it was inserted with.
    pub fn apply_force(&self, query: &Body, theta: f64, repulsive_factor: f64) -> f64 {
        let scale = repulsive_factor * (query.mass + 1.0);
        let is_member = self.members.get(query.index).copied().unwrap_or(false);

        let mut repulsion = 0.0;
        let mut stack = vec![(ROOT, is_member)];
        while let Some((id, on_path)) = stack.pop() {
            let cell = &self.cells[id];
            if cell.count == 0 || (on_path && cell.count == 1) {
                continue;
            }
            let (mass, com_x, com_y) = if on_path {
                cell.without(query)
            } else {
                (cell.mass, cell.com_x, cell.com_y)
            };
            let dx = query.x - com_x;
            let dy = query.y - com_y;
            let distance = (dx * dx + dy * dy).sqrt().max(MIN_DISTANCE);

            match cell.children {
                Some(children) if cell.quad.side() / distance >= theta => {
                    let path_slot = cell.quad.quadrant_of(query.x, query.y);
                    for (slot, &child) in children.iter().enumerate() {
                        stack.push((child, on_path && slot == path_slot));
                    }
                }
                _ => repulsion += scale * mass / distance,
            }
        }
        repulsion
    }

    pub fn root(&self) -> &QuadCell {
        &self.cells[ROOT]
    }

    pub fn cell(&self, id: usize) -> &QuadCell {
        &self.cells[id]
    }

    /// All cells, root first.
    pub fn cells(&self) -> &[QuadCell] {
        &self.cells
    }

    /// Number of levels below and including the root.
    pub fn depth(&self) -> usize {
        self.cells.iter().map(|c| c.depth + 1).max().unwrap_or(0)
    }

    /// True once some leaf had to aggregate nodes at `MAX_TREE_DEPTH`.
    pub fn is_saturated(&self) -> bool {
        self.saturated
    }
}
