//! Picking protocol: requests in, resolved hits out

pub mod hit;
pub mod region;

pub use hit::{Hit, HitRecord, HitResolver};
pub use region::Pick;
