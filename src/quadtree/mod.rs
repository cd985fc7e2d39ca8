mod quad;
mod quadtree;

pub use quad::*;
pub use quadtree::*;
