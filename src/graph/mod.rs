mod csr;
pub mod datasets;

pub use csr::*;

#[cfg(test)]
mod csr_tests;
