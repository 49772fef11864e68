//! Certificate document rendering for LAUREA.
//!
//! Two pieces: the QR encoder, turning a verification reference into a
//! decodable raster image, and the document renderer, laying out a
//! single-page landscape PDF from a populated certificate plus that QR
//! image. The renderer refuses incomplete input; the output is treated
//! as an authoritative legal artifact, never rendered with placeholders.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod layout;
pub mod qr;
pub mod renderer;

pub use layout::{Layout, PageMetrics};
pub use qr::{ErrorCorrection, QrConfig, QrEncoder, QrError, QrImage};
pub use renderer::{CertificateRenderer, RenderConfig, RenderError, Theme, Tint};
