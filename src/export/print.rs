//! Print targets: paginated HTML for the browser print dialog, and an A4
//! PDF sheet built from rasterized cards.

use std::io::BufWriter;

use ::image::{DynamicImage, Rgb, RgbImage, Rgba};
use log::{debug, info};
use printpdf::{
    ColorBits, ColorSpace, Image, ImageTransform, ImageXObject, Mm, PdfDocument,
    PdfLayerReference, Px,
};

use crate::design::{CardDesign, Participant};
use crate::error::CardError;
use crate::export::markup::{
    background_css, fitted_logo_box, logo_dimensions, write_card, CardMarkup,
};
use crate::export::raster::CardRasterizer;
use crate::export::{escape_xml, topic_file_name};
use crate::render::{render_card, HalfView};

// ============================================================================
// Constants
// ============================================================================

/// A4 dimensions in mm
const PAGE_WIDTH_MM: f32 = 210.0;
const PAGE_HEIGHT_MM: f32 = 297.0;

const PRINT_CSS: &str = "@page{size:A4;margin:0}\
html,body{margin:0;padding:0;background:#ffffff}\
.card-page{position:relative;width:210mm;height:297mm;overflow:hidden;page-break-after:always;break-after:page}\
.card-page .card{margin:0 auto;zoom:0.99}\
.half,.card{-webkit-print-color-adjust:exact;print-color-adjust:exact}";

const PRINT_ROTATION: &str = "transform:rotate(180deg);transform-origin:50% 50%;";

// ============================================================================
// Markup
// ============================================================================

/// `<topic>.html`
pub fn print_file_name(topic: &str) -> String {
    topic_file_name(topic, ".html")
}

/// `<topic>.pdf`
pub fn print_pdf_file_name(topic: &str) -> String {
    topic_file_name(topic, ".pdf")
}

/// One HTML document with every participant's card on its own A4 page.
pub fn print_markup(design: &CardDesign, participants: &[Participant]) -> String {
    info!(cards = participants.len(); "Building print markup");

    let mut out = String::from("<!DOCTYPE html>\n<html><head><meta charset=\"utf-8\">");
    out.push_str("<title>Name cards</title><style>");
    out.push_str(PRINT_CSS);
    out.push_str("</style></head><body>\n");

    let logo_dimensions = logo_dimensions(design);
    for participant in participants {
        let face = render_card(design, participant);
        let logo_box = |half: &HalfView| {
            logo_dimensions.and_then(|dimensions| fitted_logo_box(half, dimensions))
        };
        let card = CardMarkup {
            font_css: face.font.css_stack(),
            rotation_css: PRINT_ROTATION,
            background_css: Some(background_css(&face.background)),
            logos: [logo_box(&face.top), logo_box(&face.bottom)],
        };

        out.push_str("<section class=\"card-page\" data-name=\"");
        out.push_str(&escape_xml(&face.display_name));
        out.push_str("\">");
        write_card(&mut out, &face, &card);
        out.push_str("</section>\n");
    }

    out.push_str("</body></html>\n");
    out
}

// ============================================================================
// PDF
// ============================================================================

/// One A4 page per participant, each carrying the rasterized card.
pub fn print_pdf(
    design: &CardDesign,
    participants: &[Participant],
    rasterizer: &dyn CardRasterizer,
) -> Result<Vec<u8>, CardError> {
    info!(cards = participants.len(); "Building print PDF");

    let (doc, page1, layer1) =
        PdfDocument::new("Name Cards", Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Card");

    for (index, participant) in participants.iter().enumerate() {
        let layer = if index == 0 {
            doc.get_page(page1).get_layer(layer1)
        } else {
            let (page, layer) = doc.add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Card");
            doc.get_page(page).get_layer(layer)
        };

        let raster = rasterizer.rasterize(design, participant)?;
        let bitmap = ::image::load_from_memory(&raster.png)
            .map_err(|e| CardError::Pdf(format!("Failed to decode card bitmap: {}", e)))?;
        debug!(index, width = raster.width, height = raster.height; "Placing card on page");
        embed_card(&layer, &bitmap);
    }

    let mut writer = BufWriter::new(Vec::new());
    doc.save(&mut writer)
        .map_err(|e| CardError::Pdf(e.to_string()))?;
    writer
        .into_inner()
        .map_err(|e| CardError::Pdf(e.to_string()))
}

/// Fit the card onto the page, centered, preserving its aspect ratio.
fn embed_card(layer: &PdfLayerReference, card: &DynamicImage) {
    let rgb_image = flatten_onto_white(card);
    let (width_px, height_px) = rgb_image.dimensions();

    let aspect_ratio = width_px as f32 / height_px as f32;
    let (width_mm, height_mm) = if PAGE_WIDTH_MM / PAGE_HEIGHT_MM > aspect_ratio {
        (PAGE_HEIGHT_MM * aspect_ratio, PAGE_HEIGHT_MM)
    } else {
        (PAGE_WIDTH_MM, PAGE_WIDTH_MM / aspect_ratio)
    };
    let x = (PAGE_WIDTH_MM - width_mm) / 2.0;
    let y = (PAGE_HEIGHT_MM - height_mm) / 2.0;

    let image = Image::from(ImageXObject {
        width: Px(width_px as usize),
        height: Px(height_px as usize),
        color_space: ColorSpace::Rgb,
        bits_per_component: ColorBits::Bit8,
        interpolate: true,
        image_data: rgb_image.into_raw(),
        image_filter: None,
        clipping_bbox: None,
        smask: None,
    });

    // DPI that yields the fitted physical width
    let dpi = (width_px as f32) / (width_mm / 25.4);

    image.add_to_layer(
        layer.clone(),
        ImageTransform {
            translate_x: Some(Mm(x)),
            translate_y: Some(Mm(y)),
            dpi: Some(dpi),
            ..Default::default()
        },
    );
}

/// PDF images carry no alpha here; transparent pixels print as paper.
fn flatten_onto_white(image: &DynamicImage) -> RgbImage {
    let rgba_image = image.to_rgba8();
    let (width, height) = rgba_image.dimensions();
    let mut rgb_image = RgbImage::new(width, height);
    for (x, y, pixel) in rgba_image.enumerate_pixels() {
        let Rgba([r, g, b, a]) = *pixel;
        let alpha = a as f32 / 255.0;
        let blend = |c: u8| (c as f32 * alpha + 255.0 * (1.0 - alpha)) as u8;
        rgb_image.put_pixel(x, y, Rgb([blend(r), blend(g), blend(b)]));
    }
    rgb_image
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::raster::RasterImage;
    use ::image::ImageFormat;
    use std::io::Cursor;

    struct SolidRasterizer {
        fail: bool,
    }

    impl CardRasterizer for SolidRasterizer {
        fn rasterize(&self, _design: &CardDesign, participant: &Participant) -> Result<RasterImage, CardError> {
            if self.fail {
                return Err(CardError::Raster {
                    name: participant.display_name().to_string(),
                    reason: "no surface".to_string(),
                });
            }
            let img = RgbImage::from_pixel(8, 11, Rgb([240, 240, 255]));
            let mut png = Vec::new();
            DynamicImage::ImageRgb8(img)
                .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
                .unwrap();
            Ok(RasterImage {
                width: 8,
                height: 11,
                png,
            })
        }
    }

    fn roster() -> Vec<Participant> {
        vec![
            Participant::new("张三", "法学院"),
            Participant::new("李四", "医学院"),
            Participant::new("Ada Lovelace", "Analytical Society"),
        ]
    }

    #[test]
    fn every_participant_gets_a_page() {
        let html = print_markup(&CardDesign::new(), &roster());
        assert_eq!(html.matches("<section class=\"card-page\"").count(), 3);
        assert!(html.contains("@page{size:A4;margin:0}"));
        assert!(html.contains("page-break-after:always"));
        assert_eq!(html.matches(PRINT_ROTATION).count(), 3);
    }

    #[test]
    fn print_markup_escapes_names() {
        let html = print_markup(&CardDesign::new(), &[Participant::new("<b>", "R&D")]);
        assert!(html.contains("&lt;b&gt;"));
        assert!(html.contains("R&amp;D"));
        assert!(!html.contains("<b>"));
    }

    #[test]
    fn wide_logo_keeps_its_aspect_ratio() {
        let img = ::image::RgbaImage::from_pixel(40, 10, Rgba([20, 60, 160, 255]));
        let mut png = Vec::new();
        DynamicImage::ImageRgba8(img)
            .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
            .unwrap();
        let mut design = CardDesign::new();
        design.set_logo_image(Some(crate::image_data::image_bytes_to_data_url(&png).unwrap()));

        let html = print_markup(&design, &roster()[..1]);
        // 80px logo square at (50%, 15%): 80 x 20 centered on (400, 82.5).
        assert!(html.contains("width=\"80\" height=\"20\""));
        assert!(html.contains("left:360px;top:72.5px;width:80px;height:20px;"));
        assert!(!html.contains("height=\"80\""));
    }

    #[test]
    fn pdf_is_produced_from_card_bitmaps() {
        let bytes = print_pdf(&CardDesign::new(), &roster(), &SolidRasterizer { fail: false }).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn pdf_aborts_when_a_card_cannot_be_rasterized() {
        let result = print_pdf(&CardDesign::new(), &roster(), &SolidRasterizer { fail: true });
        assert!(matches!(result, Err(CardError::Raster { .. })));
    }

    #[test]
    fn transparent_pixels_become_white() {
        let img = DynamicImage::ImageRgba8(::image::RgbaImage::from_pixel(1, 1, Rgba([0, 0, 0, 0])));
        assert_eq!(*flatten_onto_white(&img).get_pixel(0, 0), Rgb([255, 255, 255]));
    }

    #[test]
    fn file_names_follow_the_topic() {
        assert_eq!(print_file_name("Law Forum"), "Law-Forum.html");
        assert_eq!(print_pdf_file_name(""), "name-cards.pdf");
    }
}
