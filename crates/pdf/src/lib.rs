//! Text-to-PDF rendering for proposal documents.
//!
//! Lays a multi-line string out as a single-column, fixed-font PDF and
//! returns the finished byte stream. Layout constants match the proposal
//! pipeline: US-letter pages, Helvetica 12, text origin at (10, 730),
//! one 14pt line advance per input line. Input that would run past the
//! bottom margin continues on a fresh page with the same origin.

mod renderer;

pub use renderer::{PageLayout, PdfRenderer, RenderError};
