//! # dashgen-renderer
//!
//! Tera-based template engine that renders the dashboard manifest from a
//! sorted entry list.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use dashgen_core::NormalizedEntry;
//! use dashgen_renderer::Renderer;
//!
//! fn render(entries: Vec<NormalizedEntry>) {
//!     if let Ok(renderer) = Renderer::new(None) {
//!         if let Ok(text) = renderer.render_manifest("gen.libsonnet.tera", entries) {
//!             println!("{} bytes", text.len());
//!         }
//!     }
//! }
//! ```

pub mod context;
pub mod engine;
pub mod error;

pub use context::ManifestContext;
pub use engine::{Renderer, TemplateEngine};
pub use error::RenderError;
