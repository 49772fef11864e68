//! QR encoding of verification references.
//!
//! Encoding is deterministic: the same reference always produces the same
//! module matrix, so identical input yields a decode-equivalent image and
//! callers may cache the result keyed on the reference.

use qrcode::{Color, EcLevel, QrCode};
use serde::{Deserialize, Serialize};

/// Error correction strength for generated codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCorrection {
    /// Recovers ~7% damage
    Low,
    /// Recovers ~15% damage
    Medium,
    /// Recovers ~25% damage
    Quartile,
    /// Recovers ~30% damage
    High,
}

impl From<ErrorCorrection> for EcLevel {
    fn from(level: ErrorCorrection) -> Self {
        match level {
            ErrorCorrection::Low => EcLevel::L,
            ErrorCorrection::Medium => EcLevel::M,
            ErrorCorrection::Quartile => EcLevel::Q,
            ErrorCorrection::High => EcLevel::H,
        }
    }
}

/// Configuration for the QR encoder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QrConfig {
    /// Pixels per module
    pub module_pixels: u32,
    /// Quiet zone width in modules on each side
    pub quiet_zone: u32,
    /// Error correction strength
    pub error_correction: ErrorCorrection,
}

impl Default for QrConfig {
    fn default() -> Self {
        Self {
            module_pixels: 8,
            quiet_zone: 4,
            error_correction: ErrorCorrection::High,
        }
    }
}

/// QR-encoding errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QrError {
    /// The reference to encode was empty
    #[error("empty verification reference")]
    EmptyReference,
    /// The reference could not be encoded
    #[error("QR encoding failed: {reason}")]
    Encode {
        /// Underlying cause
        reason: String,
    },
    /// The raster could not be serialized to PNG
    #[error("PNG encoding failed: {reason}")]
    Png {
        /// Underlying cause
        reason: String,
    },
}

/// A rendered QR raster: square, 8-bit grayscale, dark modules at 0x00
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QrImage {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl QrImage {
    /// Image width in pixels
    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Image height in pixels
    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Row-major grayscale pixels, one byte each
    #[must_use]
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Encode as PNG bytes
    ///
    /// # Errors
    ///
    /// Returns error if PNG serialization fails
    pub fn to_png(&self) -> Result<Vec<u8>, QrError> {
        let buffer: image::ImageBuffer<image::Luma<u8>, Vec<u8>> =
            image::ImageBuffer::from_raw(self.width, self.height, self.pixels.clone()).ok_or(
                QrError::Png {
                    reason: "pixel buffer does not match dimensions".to_string(),
                },
            )?;
        let mut bytes = Vec::new();
        buffer
            .write_to(
                &mut std::io::Cursor::new(&mut bytes),
                image::ImageFormat::Png,
            )
            .map_err(|err| QrError::Png {
                reason: err.to_string(),
            })?;
        Ok(bytes)
    }
}

/// Encoder from verification references to QR rasters
#[derive(Debug, Clone, Copy, Default)]
pub struct QrEncoder {
    config: QrConfig,
}

impl QrEncoder {
    /// Create an encoder with the default configuration
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an encoder with a custom configuration
    #[must_use]
    pub fn with_config(config: QrConfig) -> Self {
        Self { config }
    }

    /// Encode a verification reference into a QR raster
    ///
    /// # Errors
    ///
    /// Returns error if the reference is empty or too long to encode
    pub fn encode(&self, reference: &str) -> Result<QrImage, QrError> {
        if reference.trim().is_empty() {
            return Err(QrError::EmptyReference);
        }

        let code = QrCode::with_error_correction_level(
            reference.as_bytes(),
            self.config.error_correction.into(),
        )
        .map_err(|err| QrError::Encode {
            reason: err.to_string(),
        })?;

        let modules = code.to_colors();
        let side = code.width();
        let scale = self.config.module_pixels.max(1);
        let quiet = self.config.quiet_zone;
        let size = (side as u32 + 2 * quiet) * scale;

        let mut pixels = vec![0xFFu8; (size * size) as usize];
        for (index, module) in modules.iter().enumerate() {
            if *module != Color::Dark {
                continue;
            }
            let module_x = (index % side) as u32 + quiet;
            let module_y = (index / side) as u32 + quiet;
            for dy in 0..scale {
                let row = (module_y * scale + dy) * size;
                for dx in 0..scale {
                    pixels[(row + module_x * scale + dx) as usize] = 0x00;
                }
            }
        }

        Ok(QrImage {
            width: size,
            height: size,
            pixels,
        })
    }

    /// Encode a verification reference straight to PNG bytes
    ///
    /// # Errors
    ///
    /// Returns error if encoding or PNG serialization fails
    pub fn encode_png(&self, reference: &str) -> Result<Vec<u8>, QrError> {
        self.encode(reference)?.to_png()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_dimensions() {
        let encoder = QrEncoder::new();
        let image = encoder.encode("https://verify.example/abc123").unwrap();
        assert_eq!(image.width(), image.height());
        assert_eq!(
            image.pixels().len(),
            (image.width() * image.height()) as usize
        );
        // Quiet zone corner is light
        assert_eq!(image.pixels()[0], 0xFF);
        // Some dark modules exist
        assert!(image.pixels().iter().any(|p| *p == 0x00));
    }

    #[test]
    fn test_encode_empty_reference() {
        let encoder = QrEncoder::new();
        assert_eq!(encoder.encode("   "), Err(QrError::EmptyReference));
    }

    #[test]
    fn test_encode_deterministic() {
        let encoder = QrEncoder::new();
        let a = encoder.encode("feedface").unwrap();
        let b = encoder.encode("feedface").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_encode_distinct_references_differ() {
        let encoder = QrEncoder::new();
        let a = encoder.encode("reference-a").unwrap();
        let b = encoder.encode("reference-b").unwrap();
        assert_ne!(a.pixels(), b.pixels());
    }

    #[test]
    fn test_to_png_magic() {
        let encoder = QrEncoder::new();
        let png = encoder.encode_png("feedface").unwrap();
        assert!(png.starts_with(&[0x89, b'P', b'N', b'G']));
    }

    #[test]
    fn test_custom_scale() {
        let config = QrConfig {
            module_pixels: 2,
            quiet_zone: 1,
            error_correction: ErrorCorrection::Medium,
        };
        let image = QrEncoder::with_config(config).encode("feedface").unwrap();
        let default = QrEncoder::new().encode("feedface").unwrap();
        assert!(image.width() < default.width());
    }

    #[test]
    fn test_encode_too_long() {
        let encoder = QrEncoder::new();
        let reference = "x".repeat(8000);
        assert!(matches!(
            encoder.encode(&reference),
            Err(QrError::Encode { .. })
        ));
    }
}
