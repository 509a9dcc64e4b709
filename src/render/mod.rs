//! WebGPU rendering module
//!
//! One fullscreen-triangle fragment shader draws the whole scene: an analytic
//! road and sky, with the car and obstacles raymarched as SDFs on top.

pub mod scene;

pub use scene::SceneRenderState;
