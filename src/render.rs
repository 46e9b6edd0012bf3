//! Fit text lines to the panel width and draw them.
//!
//! Every line starts at [`START_FONT_SIZE`] and shrinks in steps of
//! [`FONT_SIZE_STEP`] until it fits the panel width. Lines are sized
//! independently and never grow back. A line that still overflows when the
//! size reaches zero is logged and drawn anyway with its last measurement.
//!
//! # Example
//!
//! ```
//! use inky_amsat::display::{Frame, Ink};
//! use inky_amsat::render::{draw_layout, layout_lines, MonoFaces};
//!
//! let layout = layout_lines(&MonoFaces, &["SO-50", "Pass: 0:10:00"], 212);
//! let mut frame = Frame::new(212, 104, Ink::Black);
//! draw_layout(&layout, &mut frame);
//!
//! assert_eq!(layout.lines[0].font_size, 20);
//! assert_eq!(layout.lines[1].top, 21);
//! ```

use embedded_graphics::mono_font::iso_8859_1::{
    FONT_10X20, FONT_4X6, FONT_5X8, FONT_6X10, FONT_6X12, FONT_7X14_BOLD, FONT_9X15_BOLD,
    FONT_9X18_BOLD,
};
use embedded_graphics::mono_font::{MonoFont, MonoTextStyle};
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::text::renderer::TextRenderer;
use embedded_graphics::text::{Baseline, Text};

use crate::display::Frame;

/// Font size every line starts at.
pub const START_FONT_SIZE: u32 = 20;

/// Amount the font size shrinks per fitting step.
pub const FONT_SIZE_STEP: u32 = 2;

/// Vertical gap between lines in pixels.
pub const LINE_GAP: u32 = 1;

/// Text measurement at a given font size.
pub trait TextMetrics {
    /// Rendered width and height of `text` at `size`.
    fn measure(&self, text: &str, size: u32) -> Size;
}

/// Bitmap faces standing in for a scalable font.
///
/// Each even size maps to the largest ISO-8859-1 face no taller than it;
/// sizes below 8 all use the 4x6 face.
#[derive(Debug, Clone, Copy, Default)]
pub struct MonoFaces;

impl MonoFaces {
    /// Face used for `size`.
    pub fn face(size: u32) -> &'static MonoFont<'static> {
        match size {
            20.. => &FONT_10X20,
            18..=19 => &FONT_9X18_BOLD,
            16..=17 => &FONT_9X15_BOLD,
            14..=15 => &FONT_7X14_BOLD,
            12..=13 => &FONT_6X12,
            10..=11 => &FONT_6X10,
            8..=9 => &FONT_5X8,
            _ => &FONT_4X6,
        }
    }

    fn style(size: u32) -> MonoTextStyle<'static, BinaryColor> {
        MonoTextStyle::new(Self::face(size), BinaryColor::On)
    }
}

impl TextMetrics for MonoFaces {
    fn measure(&self, text: &str, size: u32) -> Size {
        let style = Self::style(size);
        let metrics = style.measure_string(text, Point::zero(), Baseline::Top);
        Size::new(
            metrics.bounding_box.size.width,
            style.line_height().max(metrics.bounding_box.size.height),
        )
    }
}

/// One line of text with its chosen size and position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayLine {
    /// Text as drawn
    pub text: String,
    /// Chosen font size (0 when nothing fit)
    pub font_size: u32,
    /// Measured width in pixels
    pub width: u32,
    /// Measured height in pixels
    pub height: u32,
    /// Vertical offset of the line's top edge
    pub top: u32,
}

impl DisplayLine {
    /// Whether the line is wider than `max_width`.
    pub fn overflows(&self, max_width: u32) -> bool {
        self.width > max_width
    }
}

/// Lines stacked top to bottom.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Layout {
    /// Lines in display order
    pub lines: Vec<DisplayLine>,
    /// Widest horizontal extent of any line (informational only)
    pub extent: u32,
}

impl Layout {
    /// Total height including gaps.
    pub fn height(&self) -> u32 {
        self.lines
            .last()
            .map(|l| l.top + l.height + LINE_GAP)
            .unwrap_or(0)
    }
}

/// Pick the font size for one line.
///
/// Returns `(size, measured)`. Shrinks from [`START_FONT_SIZE`] while the
/// text is wider than `max_width`; at size 0 it gives up and keeps the last
/// measurement.
pub fn fit_font_size<M: TextMetrics>(metrics: &M, text: &str, max_width: u32) -> (u32, Size) {
    let mut size = START_FONT_SIZE;
    let mut measured = metrics.measure(text, size);

    while measured.width > max_width {
        tracing::debug!("{:?} is {}px wide at size {}", text, measured.width, size);
        size = size.saturating_sub(FONT_SIZE_STEP);
        measured = metrics.measure(text, size);
        if size == 0 {
            tracing::warn!("line too long: {:?}", text);
            break;
        }
    }

    (size, measured)
}

/// Size and stack lines for a panel `max_width` pixels wide.
pub fn layout_lines<M, S>(metrics: &M, lines: &[S], max_width: u32) -> Layout
where
    M: TextMetrics,
    S: AsRef<str>,
{
    let mut layout = Layout::default();
    let mut top = 0;

    for text in lines {
        let text = text.as_ref();
        let (font_size, measured) = fit_font_size(metrics, text, max_width);
        tracing::debug!(
            "Line {:?}: size {} ({}x{}) at y={}",
            text,
            font_size,
            measured.width,
            measured.height,
            top
        );

        layout.extent = layout.extent.max(measured.width);
        layout.lines.push(DisplayLine {
            text: text.to_string(),
            font_size,
            width: measured.width,
            height: measured.height,
            top,
        });
        top += measured.height + LINE_GAP;
    }

    layout
}

/// Draw every line of `layout` at the left edge of `frame` using [`MonoFaces`].
pub fn draw_layout(layout: &Layout, frame: &mut Frame) {
    for line in &layout.lines {
        let style = MonoFaces::style(line.font_size);
        let position = Point::new(0, line.top as i32);
        // Frame drawing is infallible
        Text::with_baseline(&line.text, position, style, Baseline::Top)
            .draw(frame)
            .ok();
    }
}
