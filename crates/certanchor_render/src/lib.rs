//! Certanchor Artifact Renderer
//!
//! Produces the durable certificate document for an issuance. The renderer
//! writes into a staging directory through a temp file and renames into
//! place only on success, so later pipeline stages never observe a
//! partially written artifact.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod pdf;
pub mod renderer;

pub use renderer::{CertificateRenderer, RenderError, RenderRequest, RenderedArtifact};
