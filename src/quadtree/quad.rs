use crate::utils::MIN_DISTANCE;

/// Represents a square region of the plane.
///
/// Each `Quad` has a center position (cx, cy) and a half-size, which is half
/// the length of one side of the square.
///
/// # Examples
///
/// ```
/// use rs_forceatlas::quadtree::Quad;
///
/// let quad = Quad { cx: 0.0, cy: 0.0, half_size: 1.0 };
/// assert_eq!(quad.side(), 2.0);
/// assert_eq!(quad.x_min(), -1.0);
/// assert_eq!(quad.y_max(), 1.0);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Quad {
    pub cx: f64,        // center x-coordinate
    pub cy: f64,        // center y-coordinate
    pub half_size: f64, // half the length of one side
}

/// Child slots, in the order returned by [`Quad::subdivide`].
pub const NW: usize = 0;
pub const NE: usize = 1;
pub const SW: usize = 2;
pub const SE: usize = 3;

impl Quad {
    /// Smallest square covering every point, centred on the bounding box of
    /// the per-axis minima and maxima.
    ///
    /// A single point (or a set of coincident points) gets a square of side
    /// `2 * MIN_DISTANCE` so the region is never empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use rs_forceatlas::quadtree::Quad;
    ///
    /// let quad = Quad::bounding([(0.0, 0.0), (4.0, 1.0), (2.0, -1.0)]);
    /// assert_eq!(quad.cx, 2.0);
    /// assert_eq!(quad.cy, 0.0);
    /// assert_eq!(quad.half_size, 2.0);
    /// ```
    pub fn bounding<I>(points: I) -> Quad
    where
        I: IntoIterator<Item = (f64, f64)>,
    {
        let mut x_min = f64::INFINITY;
        let mut x_max = f64::NEG_INFINITY;
        let mut y_min = f64::INFINITY;
        let mut y_max = f64::NEG_INFINITY;
        for (x, y) in points {
            x_min = x_min.min(x);
            x_max = x_max.max(x);
            y_min = y_min.min(y);
            y_max = y_max.max(y);
        }
        if x_min > x_max {
            return Quad { cx: 0.0, cy: 0.0, half_size: MIN_DISTANCE };
        }
        let half_size = ((x_max - x_min).max(y_max - y_min) / 2.0).max(MIN_DISTANCE);
        Quad {
            cx: (x_min + x_max) / 2.0,
            cy: (y_min + y_max) / 2.0,
            half_size,
        }
    }

    pub fn side(&self) -> f64 {
        2.0 * self.half_size
    }

    pub fn x_min(&self) -> f64 {
        self.cx - self.half_size
    }

    pub fn x_max(&self) -> f64 {
        self.cx + self.half_size
    }

    pub fn y_min(&self) -> f64 {
        self.cy - self.half_size
    }

    pub fn y_max(&self) -> f64 {
        self.cy + self.half_size
    }

    /// Child slot (`NW`, `NE`, `SW` or `SE`) the point (x, y) is routed to.
    ///
    /// Points on the vertical midline go east and points on the horizontal
    /// midline go north. Points outside the quad are routed to the nearest
    /// quadrant, so insertion never drops a node.
    pub fn quadrant_of(&self, x: f64, y: f64) -> usize {
        match (x >= self.cx, y >= self.cy) {
            (false, true) => NW,
            (true, true) => NE,
            (false, false) => SW,
            (true, false) => SE,
        }
    }

    /// Subdivides the quad into four smaller quads, indexed by `NW`, `NE`,
    /// `SW` and `SE`.
    ///
    /// # Examples
    ///
    /// ```
    /// use rs_forceatlas::quadtree::{Quad, NW, SE};
    ///
    /// let quad = Quad { cx: 0.0, cy: 0.0, half_size: 1.0 };
    /// let children = quad.subdivide();
    ///
    /// assert_eq!(children[NW], Quad { cx: -0.5, cy: 0.5, half_size: 0.5 });
    /// assert_eq!(children[SE], Quad { cx: 0.5, cy: -0.5, half_size: 0.5 });
    /// assert_eq!(quad.quadrant_of(0.25, -0.25), SE);
    /// ```
    pub fn subdivide(&self) -> [Quad; 4] {
        let hs = self.half_size / 2.0;
        [
            Quad { cx: self.cx - hs, cy: self.cy + hs, half_size: hs }, // NW
            Quad { cx: self.cx + hs, cy: self.cy + hs, half_size: hs }, // NE
            Quad { cx: self.cx - hs, cy: self.cy - hs, half_size: hs }, // SW
            Quad { cx: self.cx + hs, cy: self.cy - hs, half_size: hs }, // SE
        ]
    }
}

/// A graph node as seen by the quadtree: its index, planar position and mass.
///
/// In a layout the mass is the node's degree.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Body {
    pub index: usize,
    pub x: f64,
    pub y: f64,
    pub mass: f64,
}
