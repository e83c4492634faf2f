//! wgpu rendering module
//!
//! The scene is rebuilt from the game state every frame as a flat-colored
//! triangle list and drawn with a single pipeline.

pub mod pipeline;
pub mod scene;
pub mod shapes;
pub mod vertex;

pub use pipeline::{RenderError, RenderState};
pub use scene::{Effects, build_scene, surface_to_playfield, title};
pub use vertex::Vertex;
