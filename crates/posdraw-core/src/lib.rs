//! posdraw Core Types and Definitions
//!
//! This crate provides the foundational types shared by the posdraw loader
//! and converter. It includes:
//!
//! - **Elements**: Decoded pos element records ([`element::ElementRecord`])
//! - **Collections**: Ordered id to record mappings ([`collection::ElementCollection`])
//! - **Colors**: The color normalizer used by every style computation ([`color`] module)
//! - **Geometry**: Basic geometric types ([`geometry`] module)
//! - **Skips**: Per-element diagnostics for records left out of the output ([`skip`] module)

pub mod collection;
pub mod color;
pub mod element;
pub mod geometry;
pub mod skip;
