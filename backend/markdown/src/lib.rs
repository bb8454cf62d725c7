//! Markdown rendering for analysis results.
//!
//! Model replies arrive as Markdown prose. The web page shows them as
//! sanitized HTML; the terminal gets plain text.

pub mod renderer;

pub use renderer::Renderer;
