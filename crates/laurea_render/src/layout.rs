//! Page geometry for the certificate document.
//!
//! Every position is derived from the configured page dimensions as a
//! cumulative top-down offset, so the layout survives a change of page
//! size. Nothing here touches PDF primitives; the renderer consumes the
//! computed coordinates.

use serde::{Deserialize, Serialize};

/// Points to millimetres
pub const PT_TO_MM: f64 = 0.352_778;

/// Title (institution name) size in points
pub const TITLE_SIZE: f64 = 28.0;
/// Subtitle size in points
pub const SUBTITLE_SIZE: f64 = 13.0;
/// "This is to certify that," size in points
pub const CERTIFY_SIZE: f64 = 12.0;
/// Holder name size in points
pub const HOLDER_SIZE: f64 = 26.0;
/// "has successfully completed the course" size in points
pub const COMPLETED_SIZE: f64 = 12.0;
/// Course title size in points
pub const COURSE_SIZE: f64 = 20.0;
/// Grade/level line size in points
pub const GRADE_SIZE: f64 = 13.0;
/// Certificate type line size in points
pub const TYPE_SIZE: f64 = 11.0;
/// Details label size in points
pub const LABEL_SIZE: f64 = 10.0;
/// Details value size in points
pub const VALUE_SIZE: f64 = 10.0;
/// QR caption size in points
pub const QR_CAPTION_SIZE: f64 = 9.0;
/// Verification code size in points
pub const QR_CODE_SIZE: f64 = 8.0;
/// Footer disclaimer size in points
pub const FOOTER_SIZE: f64 = 8.0;

/// Target page dimensions in millimetres
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageMetrics {
    /// Page width
    pub width_mm: f64,
    /// Page height
    pub height_mm: f64,
}

impl PageMetrics {
    /// A4 landscape, the reference page
    #[must_use]
    pub const fn a4_landscape() -> Self {
        Self {
            width_mm: 297.0,
            height_mm: 210.0,
        }
    }
}

impl Default for PageMetrics {
    fn default() -> Self {
        Self::a4_landscape()
    }
}

/// Computed block positions, in millimetres from the bottom-left page
/// corner (PDF coordinate convention). Vertical positions come from one
/// running top-down offset; horizontal anchors are page-width fractions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Layout {
    /// The page these positions were computed for
    pub page: PageMetrics,
    /// Outer frame inset from the page edges
    pub frame_outer_inset: f64,
    /// Inner frame inset from the page edges
    pub frame_inner_inset: f64,
    /// Baseline of the institution name
    pub title_y: f64,
    /// Baseline of the subtitle
    pub subtitle_y: f64,
    /// Decorative rule beneath the header
    pub rule_y: f64,
    /// Rule start x
    pub rule_x0: f64,
    /// Rule end x
    pub rule_x1: f64,
    /// Baseline of "This is to certify that,"
    pub certify_y: f64,
    /// Baseline of the holder name
    pub holder_y: f64,
    /// Baseline of "has successfully completed the course"
    pub completed_y: f64,
    /// Baseline of the course title
    pub course_y: f64,
    /// Baseline of the grade/level line
    pub grade_y: f64,
    /// Baseline of the certificate type line
    pub type_y: f64,
    /// Baseline of the first details label row
    pub details_top_y: f64,
    /// Vertical distance between detail entries
    pub details_entry_gap: f64,
    /// Vertical distance from a label to its value
    pub details_value_gap: f64,
    /// Left details column x
    pub details_left_x: f64,
    /// Right details column x
    pub details_right_x: f64,
    /// QR image side length
    pub qr_side: f64,
    /// QR image left edge
    pub qr_x: f64,
    /// QR image bottom edge
    pub qr_y: f64,
    /// Baseline of the "Scan to verify" caption
    pub qr_caption_y: f64,
    /// Baseline of the printed verification code
    pub qr_code_y: f64,
    /// Footer divider y
    pub footer_rule_y: f64,
    /// Baseline of the first disclaimer line
    pub footer_line1_y: f64,
    /// Baseline of the second disclaimer line
    pub footer_line2_y: f64,
}

impl Layout {
    /// Compute block positions for a page
    #[must_use]
    pub fn compute(page: PageMetrics) -> Self {
        let w = page.width_mm;
        let h = page.height_mm;
        let inset_base = w.min(h);

        // One running offset from the top edge; each block advances it.
        let mut drop = h * 0.14;
        let title_y = h - drop;
        drop += h * 0.055;
        let subtitle_y = h - drop;
        drop += h * 0.03;
        let rule_y = h - drop;
        drop += h * 0.075;
        let certify_y = h - drop;
        drop += h * 0.075;
        let holder_y = h - drop;
        drop += h * 0.06;
        let completed_y = h - drop;
        drop += h * 0.07;
        let course_y = h - drop;
        drop += h * 0.06;
        let grade_y = h - drop;
        drop += h * 0.045;
        let type_y = h - drop;
        drop += h * 0.09;
        let details_top_y = h - drop;

        let qr_side = h * 0.17;
        let frame_inner_inset = inset_base * 0.055;
        let qr_x = w - frame_inner_inset - qr_side - w * 0.02;
        let qr_top = details_top_y + h * 0.02;
        let qr_y = qr_top - qr_side;
        let qr_caption_y = qr_y - h * 0.028;
        let qr_code_y = qr_caption_y - h * 0.022;

        let footer_rule_y = h * 0.080;
        let footer_line1_y = h * 0.055;
        let footer_line2_y = h * 0.028;

        Self {
            page,
            frame_outer_inset: inset_base * 0.040,
            frame_inner_inset,
            title_y,
            subtitle_y,
            rule_y,
            rule_x0: w * 0.35,
            rule_x1: w * 0.65,
            certify_y,
            holder_y,
            completed_y,
            course_y,
            grade_y,
            type_y,
            details_top_y,
            details_entry_gap: h * 0.065,
            details_value_gap: h * 0.030,
            details_left_x: w * 0.10,
            details_right_x: w * 0.52,
            qr_side,
            qr_x,
            qr_y,
            qr_caption_y,
            qr_code_y,
            footer_rule_y,
            footer_line1_y,
            footer_line2_y,
        }
    }

    /// Horizontal page centre
    #[must_use]
    pub fn center_x(&self) -> f64 {
        self.page.width_mm / 2.0
    }
}
