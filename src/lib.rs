//! Interactive image viewer and polygon annotator for the browser.
//!
//! This crate is compiled to WebAssembly and drives a single `<canvas>`. It
//! shows an image under a pan/zoom camera, draws a solution polygon, colored
//! annotation polygons and an answer marker on top, and lets the user edit
//! them depending on the configured mode. The host page only supplies the
//! canvas, the image URL and an options object; edits come back through the
//! change callbacks it registers.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`web`] | wasm-bindgen `Viewer`: canvas surface, DOM listeners, frame loop |
//! | [`engine`] | Testable [`engine::EngineCore`]: input dispatch and change actions |
//! | [`camera`] | Pan/zoom camera, image fitting and coordinate conversions |
//! | [`polygon`] | Vertex and polygon ring model |
//! | [`doc`] | Solution, annotations, answer and their import/export records |
//! | [`options`] | Modes, visibility matrix and host options parsing |
//! | [`hit`] | Hit-testing in priority order |
//! | [`overlay`] | Zoom and color buttons, tooltip |
//! | [`input`] | Mouse buttons, wheel deltas and pointer state |
//! | [`scheduler`] | Dirty-flag render gate and loop state |
//! | [`render`] | Scene rendering onto a 2D [`render::Surface`] |
//! | [`error`] | Crate error type |
//! | [`consts`] | Tuning values: zoom step, sizes, colors |

pub mod camera;
pub mod consts;
pub mod doc;
pub mod engine;
pub mod error;
pub mod hit;
pub mod input;
pub mod options;
pub mod overlay;
pub mod polygon;
pub mod render;
pub mod scheduler;
pub mod web;
