//! The certificate document renderer.
//!
//! A bounded, synchronous pipeline: validate the certificate, compute the
//! layout for the configured page, then draw background, frame, header,
//! body, details, QR block and footer into a single-page landscape PDF.

use crate::layout::{
    self, Layout, PageMetrics, CERTIFY_SIZE, COMPLETED_SIZE, COURSE_SIZE, FOOTER_SIZE, GRADE_SIZE,
    HOLDER_SIZE, LABEL_SIZE, QR_CAPTION_SIZE, QR_CODE_SIZE, SUBTITLE_SIZE, TITLE_SIZE, TYPE_SIZE,
    VALUE_SIZE,
};
use crate::qr::{QrEncoder, QrError, QrImage};
use laurea_core::Certificate;
use printpdf::image_crate::{DynamicImage, GrayImage};
use printpdf::path::{PaintMode, WindingOrder};
use printpdf::{
    BuiltinFont, Color, Image, ImageTransform, IndirectFontRef, Line, Mm, PdfDocument,
    PdfLayerReference, Point, Polygon, Rgb,
};
use serde::{Deserialize, Serialize};

/// Fixed subtitle printed beneath the institution name
const SUBTITLE: &str = "Certificate of Completion";
/// Caption printed above the verification code
const QR_CAPTION: &str = "Scan to verify";
/// First disclaimer line
const DISCLAIMER_LINE1: &str =
    "This certificate confirms completion of the named course at the issuing institution.";
/// Second disclaimer line
const DISCLAIMER_LINE2: &str =
    "Authenticity can be checked at any time by entering the verification code or scanning the QR code.";

/// Average glyph width as a fraction of the font size, for the built-in
/// Helvetica faces. Good enough for centring; exact metrics would need
/// an embedded font.
const AVG_GLYPH_FRAC: f64 = 0.5;

/// An RGB colour with components in `0.0..=1.0`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tint {
    /// Red component
    pub r: f64,
    /// Green component
    pub g: f64,
    /// Blue component
    pub b: f64,
}

impl Tint {
    /// Create a colour from components
    #[must_use]
    pub const fn new(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }

    fn color(&self) -> Color {
        Color::Rgb(Rgb::new(self.r as f32, self.g as f32, self.b as f32, None))
    }
}

/// Colour scheme for the rendered document
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Theme {
    /// Page background fill
    pub background: Tint,
    /// Frame border
    pub frame: Tint,
    /// Primary text
    pub ink: Tint,
    /// Secondary text (subtitle, captions, disclaimer)
    pub muted: Tint,
    /// Course title and decorative rule
    pub accent: Tint,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            background: Tint::new(0.985, 0.968, 0.925),
            frame: Tint::new(0.130, 0.180, 0.290),
            ink: Tint::new(0.150, 0.150, 0.170),
            muted: Tint::new(0.450, 0.450, 0.480),
            accent: Tint::new(0.050, 0.380, 0.440),
        }
    }
}

/// Configuration for the renderer
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Target page dimensions
    pub page: PageMetrics,
    /// Colour scheme
    pub theme: Theme,
}

/// Rendering errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RenderError {
    /// A required text field was blank; no document is emitted
    #[error("refusing to render: required field {field} is blank")]
    MissingField {
        /// The blank field
        field: String,
    },
    /// QR encoding failed
    #[error(transparent)]
    Qr(#[from] QrError),
    /// PDF assembly failed
    #[error("document assembly failed: {reason}")]
    Document {
        /// Underlying cause
        reason: String,
    },
}

struct Faces {
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    oblique: IndirectFontRef,
}

/// Renderer from populated certificates to single-page PDF documents
#[derive(Debug, Clone, Copy, Default)]
pub struct CertificateRenderer {
    config: RenderConfig,
}

impl CertificateRenderer {
    /// Create a renderer with the default configuration
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a renderer with a custom configuration
    #[must_use]
    pub fn with_config(config: RenderConfig) -> Self {
        Self { config }
    }

    /// Render a certificate with a pre-encoded QR image
    ///
    /// # Errors
    ///
    /// Returns error if a required field is blank or PDF assembly fails
    pub fn render(&self, certificate: &Certificate, qr: &QrImage) -> Result<Vec<u8>, RenderError> {
        validate(certificate)?;
        let layout = Layout::compute(self.config.page);

        let (doc, page, layer) = PdfDocument::new(
            format!("Certificate {}", certificate.certificate_number),
            Mm(layout.page.width_mm as f32),
            Mm(layout.page.height_mm as f32),
            "certificate",
        );
        let layer = doc.get_page(page).get_layer(layer);
        let faces = Faces {
            regular: add_font(&doc, BuiltinFont::Helvetica)?,
            bold: add_font(&doc, BuiltinFont::HelveticaBold)?,
            oblique: add_font(&doc, BuiltinFont::HelveticaOblique)?,
        };

        self.draw_background(&layer, &layout);
        self.draw_frame(&layer, &layout);
        self.draw_header(&layer, &layout, &faces, certificate);
        self.draw_body(&layer, &layout, &faces, certificate);
        self.draw_details(&layer, &layout, &faces, certificate);
        self.draw_qr_block(&layer, &layout, &faces, certificate, qr)?;
        self.draw_footer(&layer, &layout, &faces);

        doc.save_to_bytes().map_err(|err| RenderError::Document {
            reason: err.to_string(),
        })
    }

    /// Render a certificate, encoding its verification code as the QR
    /// reference. Exactly one QR encode per document.
    ///
    /// # Errors
    ///
    /// Returns error if QR encoding fails, a required field is blank or
    /// PDF assembly fails
    pub fn render_document(
        &self,
        certificate: &Certificate,
        encoder: &QrEncoder,
    ) -> Result<Vec<u8>, RenderError> {
        validate(certificate)?;
        let qr = encoder.encode(&certificate.verification_code)?;
        self.render(certificate, &qr)
    }

    fn draw_background(&self, layer: &PdfLayerReference, layout: &Layout) {
        let w = layout.page.width_mm;
        let h = layout.page.height_mm;
        layer.set_fill_color(self.config.theme.background.color());
        layer.add_polygon(Polygon {
            rings: vec![vec![
                (Point::new(Mm(0.0), Mm(0.0)), false),
                (Point::new(Mm(w as f32), Mm(0.0)), false),
                (Point::new(Mm(w as f32), Mm(h as f32)), false),
                (Point::new(Mm(0.0), Mm(h as f32)), false),
            ]],
            mode: PaintMode::Fill,
            winding_order: WindingOrder::NonZero,
        });
    }

    fn draw_frame(&self, layer: &PdfLayerReference, layout: &Layout) {
        layer.set_outline_color(self.config.theme.frame.color());
        layer.set_outline_thickness(1.2);
        self.stroke_inset_rect(layer, layout, layout.frame_outer_inset);
        layer.set_outline_thickness(0.4);
        self.stroke_inset_rect(layer, layout, layout.frame_inner_inset);
    }

    fn stroke_inset_rect(&self, layer: &PdfLayerReference, layout: &Layout, inset: f64) {
        let w = layout.page.width_mm;
        let h = layout.page.height_mm;
        layer.add_line(Line {
            points: vec![
                (Point::new(Mm(inset as f32), Mm(inset as f32)), false),
                (Point::new(Mm((w - inset) as f32), Mm(inset as f32)), false),
                (Point::new(Mm((w - inset) as f32), Mm((h - inset) as f32)), false),
                (Point::new(Mm(inset as f32), Mm((h - inset) as f32)), false),
            ],
            is_closed: true,
        });
    }

    fn draw_header(
        &self,
        layer: &PdfLayerReference,
        layout: &Layout,
        faces: &Faces,
        certificate: &Certificate,
    ) {
        let theme = &self.config.theme;
        self.centered_text(
            layer,
            layout,
            &certificate.issued_by,
            TITLE_SIZE,
            layout.title_y,
            &faces.bold,
            theme.ink,
        );
        self.centered_text(
            layer,
            layout,
            SUBTITLE,
            SUBTITLE_SIZE,
            layout.subtitle_y,
            &faces.regular,
            theme.muted,
        );

        layer.set_outline_color(theme.accent.color());
        layer.set_outline_thickness(0.8);
        layer.add_line(Line {
            points: vec![
                (Point::new(Mm(layout.rule_x0 as f32), Mm(layout.rule_y as f32)), false),
                (Point::new(Mm(layout.rule_x1 as f32), Mm(layout.rule_y as f32)), false),
            ],
            is_closed: false,
        });
    }

    fn draw_body(
        &self,
        layer: &PdfLayerReference,
        layout: &Layout,
        faces: &Faces,
        certificate: &Certificate,
    ) {
        let theme = &self.config.theme;
        self.centered_text(
            layer,
            layout,
            "This is to certify that,",
            CERTIFY_SIZE,
            layout.certify_y,
            &faces.regular,
            theme.muted,
        );
        self.centered_text(
            layer,
            layout,
            &certificate.holder.name,
            HOLDER_SIZE,
            layout.holder_y,
            &faces.bold,
            theme.ink,
        );
        self.centered_text(
            layer,
            layout,
            "has successfully completed the course",
            COMPLETED_SIZE,
            layout.completed_y,
            &faces.regular,
            theme.muted,
        );
        self.centered_text(
            layer,
            layout,
            &certificate.course.title,
            COURSE_SIZE,
            layout.course_y,
            &faces.bold,
            theme.accent,
        );
        let grade_line = format!(
            "Grade: {} | Level: {}",
            certificate.grade,
            certificate.certificate_level.display_name()
        );
        self.centered_text(
            layer,
            layout,
            &grade_line,
            GRADE_SIZE,
            layout.grade_y,
            &faces.regular,
            theme.ink,
        );
        let type_line = format!(
            "{} Certificate",
            certificate.certificate_type.display_name()
        );
        self.centered_text(
            layer,
            layout,
            &type_line,
            TYPE_SIZE,
            layout.type_y,
            &faces.oblique,
            theme.muted,
        );
    }

    fn draw_details(
        &self,
        layer: &PdfLayerReference,
        layout: &Layout,
        faces: &Faces,
        certificate: &Certificate,
    ) {
        let score_text = certificate
            .score
            .as_ref()
            .map_or_else(|| "N/A".to_string(), laurea_core::Score::display);

        let left = [
            ("Certificate No.", certificate.certificate_number.clone()),
            (
                "Issue Date",
                certificate.issue_date.format("%B %-d, %Y").to_string(),
            ),
            (
                "Expiry Date",
                certificate.expiry_date.format("%B %-d, %Y").to_string(),
            ),
        ];
        let right = [
            ("Score", score_text),
            ("Instructor", certificate.instructor.name.clone()),
        ];

        for (index, (label, value)) in left.iter().enumerate() {
            self.detail_entry(layer, layout, faces, layout.details_left_x, index, label, value);
        }
        for (index, (label, value)) in right.iter().enumerate() {
            self.detail_entry(layer, layout, faces, layout.details_right_x, index, label, value);
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn detail_entry(
        &self,
        layer: &PdfLayerReference,
        layout: &Layout,
        faces: &Faces,
        x: f64,
        index: usize,
        label: &str,
        value: &str,
    ) {
        let theme = &self.config.theme;
        let label_y = layout.details_top_y - index as f64 * layout.details_entry_gap;
        let value_y = label_y - layout.details_value_gap;
        layer.set_fill_color(theme.ink.color());
        layer.use_text(label, LABEL_SIZE as f32, Mm(x as f32), Mm(label_y as f32), &faces.bold);
        layer.set_fill_color(theme.muted.color());
        layer.use_text(value, VALUE_SIZE as f32, Mm(x as f32), Mm(value_y as f32), &faces.regular);
    }

    fn draw_qr_block(
        &self,
        layer: &PdfLayerReference,
        layout: &Layout,
        faces: &Faces,
        certificate: &Certificate,
        qr: &QrImage,
    ) -> Result<(), RenderError> {
        let gray = GrayImage::from_raw(qr.width(), qr.height(), qr.pixels().to_vec()).ok_or(
            RenderError::Document {
                reason: "QR pixel buffer does not match its dimensions".to_string(),
            },
        )?;
        let pdf_image = Image::from_dynamic_image(&DynamicImage::ImageLuma8(gray));

        // Scale the raster so it covers qr_side millimetres on the page
        let dpi = f64::from(qr.width()) * 25.4 / layout.qr_side;
        pdf_image.add_to_layer(
            layer.clone(),
            ImageTransform {
                translate_x: Some(Mm(layout.qr_x as f32)),
                translate_y: Some(Mm(layout.qr_y as f32)),
                dpi: Some(dpi as f32),
                ..ImageTransform::default()
            },
        );

        let theme = &self.config.theme;
        let block_center = layout.qr_x + layout.qr_side / 2.0;
        layer.set_fill_color(theme.ink.color());
        layer.use_text(
            QR_CAPTION,
            QR_CAPTION_SIZE as f32,
            Mm((block_center - text_width_mm(QR_CAPTION, QR_CAPTION_SIZE) / 2.0) as f32),
            Mm(layout.qr_caption_y as f32),
            &faces.bold,
        );
        layer.set_fill_color(theme.muted.color());
        layer.use_text(
            &certificate.verification_code,
            QR_CODE_SIZE as f32,
            Mm((block_center - text_width_mm(&certificate.verification_code, QR_CODE_SIZE) / 2.0) as f32),
            Mm(layout.qr_code_y as f32),
            &faces.regular,
        );
        Ok(())
    }

    fn draw_footer(&self, layer: &PdfLayerReference, layout: &Layout, faces: &Faces) {
        let theme = &self.config.theme;
        let w = layout.page.width_mm;
        layer.set_outline_color(theme.muted.color());
        layer.set_outline_thickness(0.3);
        layer.add_line(Line {
            points: vec![
                (Point::new(Mm((w * 0.25) as f32), Mm(layout.footer_rule_y as f32)), false),
                (Point::new(Mm((w * 0.75) as f32), Mm(layout.footer_rule_y as f32)), false),
            ],
            is_closed: false,
        });
        self.centered_text(
            layer,
            layout,
            DISCLAIMER_LINE1,
            FOOTER_SIZE,
            layout.footer_line1_y,
            &faces.regular,
            theme.muted,
        );
        self.centered_text(
            layer,
            layout,
            DISCLAIMER_LINE2,
            FOOTER_SIZE,
            layout.footer_line2_y,
            &faces.regular,
            theme.muted,
        );
    }

    #[allow(clippy::too_many_arguments)]
    fn centered_text(
        &self,
        layer: &PdfLayerReference,
        layout: &Layout,
        text: &str,
        size: f64,
        y: f64,
        font: &IndirectFontRef,
        tint: Tint,
    ) {
        let x = (layout.page.width_mm - text_width_mm(text, size)) / 2.0;
        layer.set_fill_color(tint.color());
        layer.use_text(text, size as f32, Mm(x.max(0.0) as f32), Mm(y as f32), font);
    }
}

fn add_font(
    doc: &printpdf::PdfDocumentReference,
    font: BuiltinFont,
) -> Result<IndirectFontRef, RenderError> {
    doc.add_builtin_font(font).map_err(|err| RenderError::Document {
        reason: err.to_string(),
    })
}

fn text_width_mm(text: &str, size_pt: f64) -> f64 {
    text.chars().count() as f64 * size_pt * AVG_GLYPH_FRAC * layout::PT_TO_MM
}

fn validate(certificate: &Certificate) -> Result<(), RenderError> {
    let required = [
        ("holder.name", certificate.holder.name.as_str()),
        ("course.title", certificate.course.title.as_str()),
        ("instructor.name", certificate.instructor.name.as_str()),
        ("grade", certificate.grade.as_str()),
        (
            "certificate_number",
            certificate.certificate_number.as_str(),
        ),
        (
            "verification_code",
            certificate.verification_code.as_str(),
        ),
        ("issued_by", certificate.issued_by.as_str()),
    ];
    for (field, value) in required {
        if value.trim().is_empty() {
            tracing::error!(field, "refusing to render certificate with a blank field");
            return Err(RenderError::MissingField {
                field: field.to_string(),
            });
        }
    }
    Ok(())
}
