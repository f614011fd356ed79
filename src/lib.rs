//! Hyperbolic tessellation renderer.
//!
//! Maps every output pixel into the Poincare disk, folds the point into the
//! canonical fundamental domain of the {p,q} tiling, and colors it from the
//! folding parity or a source texture. The binary in `main.rs` is a thin
//! clap wrapper over [`render::run`].

pub mod color;
pub mod config;
pub mod geometry;
pub mod render;
pub mod texture;
