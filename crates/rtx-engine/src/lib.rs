//! rendertext
//!
//! Renders one line of Unicode text, mixing a text font with a color
//! emoji font, into a fixed-size RGBA image file.
//!
//! # Example
//! ```rust,ignore
//! use rtx_engine::{RenderRequest, render};
//!
//! let request = RenderRequest::new(
//!     "Hi 😀", 32,
//!     "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
//!     "/usr/share/fonts/truetype/noto/NotoColorEmoji.ttf",
//!     200, 50, "hi.png",
//! );
//! let summary = render(&request)?;
//! println!("{} glyphs", summary.glyphs);
//! ```

mod config;
mod error;
mod pipeline;

pub use config::{RenderConfig, RenderRequest, TextInput};
pub use error::{Error, ErrorKind, Result};
pub use pipeline::{Pipeline, PipelineState, RenderSummary};

// Re-export sub-crates for advanced usage
pub use rtx_render as render;
pub use rtx_text as text;

pub use rtx_render::{OutputFormat, PenPosition};
pub use rtx_text::{SpanClassification, TextExtent};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Renders requests with a fixed configuration
///
/// Holds no fonts or buffers between calls; each call loads what it
/// needs and releases it before returning.
#[derive(Debug, Clone, Default)]
pub struct Renderer {
    config: RenderConfig,
}

impl Renderer {
    /// Create a renderer with the given configuration
    pub fn new(config: RenderConfig) -> Self {
        Self { config }
    }

    /// Get renderer configuration
    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Render a request to its output file
    ///
    /// Control characters such as tab or newline form a run of their own
    /// that no font has a glyph for, so the render fails with
    /// [`ErrorKind::Shaping`]. Strip or replace them before rendering.
    pub fn render(&self, request: &RenderRequest) -> Result<RenderSummary> {
        tracing::info!(
            "Rendering into {}x{} at {}px -> {}",
            request.width,
            request.height,
            request.font_size,
            request.output.display()
        );
        let summary = Pipeline::new(&self.config).run(request)?;
        tracing::info!(
            "Rendered {} runs, {} glyphs ({} missing) to {}",
            summary.runs,
            summary.glyphs,
            summary.missing_glyphs,
            summary.output.display()
        );
        Ok(summary)
    }

    /// Measure the request text without drawing or writing anything
    ///
    /// The canvas size in the request is ignored.
    pub fn measure(&self, request: &RenderRequest) -> Result<TextExtent> {
        pipeline::measure(request, &self.config)
    }
}

/// Render with the default configuration
///
/// Input must be free of control characters; see [`Renderer::render`].
pub fn render(request: &RenderRequest) -> Result<RenderSummary> {
    Renderer::default().render(request)
}
