//! Bitmap frame and the panels that show it.
//!
//! The Inky pHAT is a two-color panel: every pixel is either background
//! (white) or ink. [`Frame`] is an embedded-graphics draw target holding
//! that 1-bit image; a [`Panel`] takes a finished frame and refreshes the
//! physical (or emulated) display.

use std::convert::Infallible;
use std::path::{Path, PathBuf};

use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use serde::Deserialize;

use crate::Error;

/// Ink color of a bi-color panel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ink {
    /// Black on white
    #[default]
    Black,
    /// Red on white
    Red,
}

impl Ink {
    /// RGB value used when exporting the frame.
    pub fn rgb(self) -> [u8; 3] {
        match self {
            Ink::Black => [0, 0, 0],
            Ink::Red => [200, 30, 30],
        }
    }
}

impl std::str::FromStr for Ink {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "black" => Ok(Ink::Black),
            "red" => Ok(Ink::Red),
            other => Err(Error::Config(format!("Unknown ink color '{}'", other))),
        }
    }
}

/// Fixed-size 1-bit image on a white background.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    width: u32,
    height: u32,
    ink: Ink,
    pixels: Vec<bool>,
}

impl Frame {
    /// Blank (all white) frame.
    pub fn new(width: u32, height: u32, ink: Ink) -> Self {
        Self {
            width,
            height,
            ink,
            pixels: vec![false; (width as usize) * (height as usize)],
        }
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Ink color used on export.
    pub fn ink(&self) -> Ink {
        self.ink
    }

    /// Whether the pixel at (x, y) is inked. Out-of-bounds pixels are not.
    pub fn is_inked(&self, x: u32, y: u32) -> bool {
        x < self.width && y < self.height && self.pixels[(y * self.width + x) as usize]
    }

    /// Number of inked pixels.
    pub fn inked_count(&self) -> usize {
        self.pixels.iter().filter(|p| **p).count()
    }

    /// Whether any pixel in rows `top..bottom` is inked.
    pub fn rows_inked(&self, top: u32, bottom: u32) -> bool {
        (top..bottom.min(self.height))
            .any(|y| (0..self.width).any(|x| self.is_inked(x, y)))
    }

    /// Render as an RGB image with the frame's ink color.
    pub fn to_rgb_image(&self) -> image::RgbImage {
        let ink = image::Rgb(self.ink.rgb());
        let white = image::Rgb([255, 255, 255]);
        image::RgbImage::from_fn(self.width, self.height, |x, y| {
            if self.is_inked(x, y) {
                ink
            } else {
                white
            }
        })
    }
}

impl DrawTarget for Frame {
    type Color = BinaryColor;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            if point.x >= 0 && point.y >= 0 {
                let (x, y) = (point.x as u32, point.y as u32);
                if x < self.width && y < self.height {
                    self.pixels[(y * self.width + x) as usize] = color.is_on();
                }
            }
        }
        Ok(())
    }
}

impl OriginDimensions for Frame {
    fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

/// A display that can show a finished frame.
pub trait Panel {
    /// Panel resolution in pixels.
    fn size(&self) -> Size;

    /// Push `frame` to the panel and refresh it.
    fn show(&mut self, frame: &Frame) -> Result<(), Error>;
}

/// Panel emulator that writes each frame to a PNG file.
#[derive(Debug, Clone)]
pub struct PngPanel {
    path: PathBuf,
    size: Size,
}

impl PngPanel {
    /// Emulated panel of `width` x `height` writing to `path`.
    pub fn new(path: impl Into<PathBuf>, width: u32, height: u32) -> Self {
        Self {
            path: path.into(),
            size: Size::new(width, height),
        }
    }

    /// Output file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Panel for PngPanel {
    fn size(&self) -> Size {
        self.size
    }

    fn show(&mut self, frame: &Frame) -> Result<(), Error> {
        frame
            .to_rgb_image()
            .save_with_format(&self.path, image::ImageFormat::Png)
            .map_err(|e| Error::Display(format!("Failed to write {}: {}", self.path.display(), e)))?;
        tracing::info!("Wrote frame to {}", self.path.display());
        Ok(())
    }
}
