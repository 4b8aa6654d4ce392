//! Rasterizing one card to a PNG bitmap.

use std::sync::Arc;

use log::debug;
use resvg::tiny_skia::{Pixmap, Transform};
use resvg::usvg;

use crate::design::{Background, CardDesign, Participant};
use crate::error::CardError;
use crate::export::surface::surface_svg;
use crate::image_data::decode_image;
use crate::render::{render_card, CardFace, SURFACE_HEIGHT_PX, SURFACE_WIDTH_PX};

/// Oversampling factor for print-quality bitmaps.
pub const DEFAULT_RASTER_SCALE: f32 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RasterOptions {
    /// Bitmap pixels per surface pixel.
    pub scale: f32,
}

impl Default for RasterOptions {
    fn default() -> Self {
        Self {
            scale: DEFAULT_RASTER_SCALE,
        }
    }
}

/// An encoded card bitmap.
#[derive(Debug, Clone, PartialEq)]
pub struct RasterImage {
    pub width: u32,
    pub height: u32,
    pub png: Vec<u8>,
}

/// Renders one participant's card to a bitmap.
pub trait CardRasterizer {
    fn rasterize(&self, design: &CardDesign, participant: &Participant) -> Result<RasterImage, CardError>;
}

/// Rasterizes the interactive surface SVG with resvg.
pub struct SvgRasterizer {
    options: RasterOptions,
    fontdb: Arc<usvg::fontdb::Database>,
}

impl SvgRasterizer {
    /// Loads the system fonts once; reuse the rasterizer across a batch.
    pub fn new(options: RasterOptions) -> Self {
        let mut fontdb = usvg::fontdb::Database::new();
        fontdb.load_system_fonts();
        debug!(faces = fontdb.len(); "Loaded system fonts for rasterization");
        Self {
            options,
            fontdb: Arc::new(fontdb),
        }
    }

    pub fn options(&self) -> RasterOptions {
        self.options
    }

    fn render_face(&self, face: &CardFace) -> Result<RasterImage, CardError> {
        let fail = |reason: String| CardError::Raster {
            name: face.display_name.clone(),
            reason,
        };

        // resvg skips images it cannot decode; a card missing its logo must
        // not be exported silently.
        for src in embedded_images(face) {
            decode_image(src).map_err(|e| fail(e.to_string()))?;
        }

        let svg = surface_svg(face);
        let options = usvg::Options {
            font_family: face.font.generic().to_string(),
            fontdb: Arc::clone(&self.fontdb),
            ..usvg::Options::default()
        };
        let tree = usvg::Tree::from_str(&svg, &options).map_err(|e| fail(e.to_string()))?;

        let scale = self.options.scale;
        let width = (SURFACE_WIDTH_PX * scale).round() as u32;
        let height = (SURFACE_HEIGHT_PX * scale).round() as u32;
        let mut pixmap = Pixmap::new(width, height)
            .ok_or_else(|| fail(format!("cannot allocate a {}x{} bitmap", width, height)))?;

        resvg::render(&tree, Transform::from_scale(scale, scale), &mut pixmap.as_mut());

        let png = pixmap.encode_png().map_err(|e| fail(e.to_string()))?;
        Ok(RasterImage { width, height, png })
    }
}

impl Default for SvgRasterizer {
    fn default() -> Self {
        Self::new(RasterOptions::default())
    }
}

impl CardRasterizer for SvgRasterizer {
    fn rasterize(&self, design: &CardDesign, participant: &Participant) -> Result<RasterImage, CardError> {
        self.render_face(&render_card(design, participant))
    }
}

/// Every `data:` image the card would draw.
fn embedded_images(face: &CardFace) -> Vec<&str> {
    let mut images: Vec<&str> = face
        .halves()
        .iter()
        .filter_map(|half| half.logo.as_ref())
        .map(|logo| logo.src.as_str())
        .collect();
    if let Background::Image { src } = &face.background {
        images.push(src.as_str());
    }
    images
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::design::Position;
    use crate::image_data::tests::png_data_url;

    #[test]
    fn card_is_oversampled() {
        let mut design = CardDesign::new();
        design.set_logo_image(Some(png_data_url()));
        design.add_line(Position::new(50.0, 90.0));

        let rasterizer = SvgRasterizer::new(RasterOptions { scale: 0.5 });
        let image = rasterizer.rasterize(&design, &Participant::new("Ada", "Math")).unwrap();
        assert_eq!((image.width, image.height), (400, 550));

        let decoded = ::image::load_from_memory(&image.png).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (400, 550));
    }

    #[test]
    fn unreadable_logo_fails_the_card() {
        let mut design = CardDesign::new();
        design.set_logo_image(Some("data:image/png;base64,aGVsbG8=".to_string()));
        let err = SvgRasterizer::new(RasterOptions { scale: 0.25 })
            .rasterize(&design, &Participant::new("Ada", "Math"))
            .unwrap_err();
        assert!(matches!(err, CardError::Raster { ref name, .. } if name == "Ada"));
    }

    #[test]
    fn default_scale_is_twice_the_surface() {
        assert_eq!(SvgRasterizer::default().options().scale, 2.0);
    }
}
