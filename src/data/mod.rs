//! Input boundary and output artefacts.

pub mod export;
pub mod load;
pub mod measures;
pub mod rows;
