//! HTML fragments shared by the print and document targets.
//!
//! Everything is absolutely positioned in surface pixels and centered
//! without CSS transforms, which legacy document viewers ignore. The only
//! transform-like style is the rotation of the top-half container, and the
//! caller decides how that is expressed.

use std::fmt::Write as _;

use log::debug;

use crate::design::{Background, CardDesign, ElementKind};
use crate::export::surface::{percent_x, percent_y};
use crate::export::{escape_xml, fmt_num};
use crate::image_data::decode_image;
use crate::render::{
    CardFace, Divider, Half, HalfView, PlacedElement, TextBlock, HALF_HEIGHT_PX,
    SURFACE_HEIGHT_PX, SURFACE_WIDTH_PX,
};

/// Line height relative to the font size.
const LINE_HEIGHT: f32 = 1.2;

/// Horizontal inset of the fold divider.
const DIVIDER_INSET_PX: f32 = 40.0;

/// Where and how large the logo image is drawn inside a half.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct LogoBox {
    pub src: String,
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

/// Target-specific choices for one card.
pub(crate) struct CardMarkup<'a> {
    pub font_css: &'a str,
    /// Appended to the top-half container style.
    pub rotation_css: &'a str,
    /// `None` leaves the card background blank.
    pub background_css: Option<String>,
    /// Top first, like [`CardFace::halves`].
    pub logos: [Option<LogoBox>; 2],
}

/// Write the whole card: both halves, the divider and the template frame.
pub(crate) fn write_card(out: &mut String, face: &CardFace, card: &CardMarkup) {
    let shading = if face.style.inset_shading {
        "box-shadow:inset 0 0 24px rgba(0,0,0,0.06);"
    } else {
        ""
    };
    let _ = write!(
        out,
        "<div class=\"card\" style=\"position:relative;width:{}px;height:{}px;overflow:hidden;{}{shading}\">",
        fmt_num(SURFACE_WIDTH_PX),
        fmt_num(SURFACE_HEIGHT_PX),
        card.background_css.as_deref().map(escape_xml).unwrap_or_default(),
    );

    for (half, logo) in face.halves().into_iter().zip(&card.logos) {
        write_half(out, face, half, card.font_css, card.rotation_css, logo.as_ref());
    }
    if let Some(divider) = &face.divider {
        write_divider(out, divider);
    }
    if let Some(border) = face.style.border {
        let _ = write!(
            out,
            "<div class=\"frame\" style=\"position:absolute;left:0;top:0;width:{}px;height:{}px;border:{}px {} {};\"></div>",
            fmt_num(SURFACE_WIDTH_PX - 2.0 * border.width),
            fmt_num(SURFACE_HEIGHT_PX - 2.0 * border.width),
            fmt_num(border.width),
            border.style.css_keyword(),
            escape_xml(&face.text_color),
        );
    }

    out.push_str("</div>");
}

/// CSS declarations painting the card background.
pub(crate) fn background_css(background: &Background) -> String {
    match background {
        Background::Color { color } => format!("background-color:{};", color),
        Background::Gradient {
            from,
            to,
            direction,
        } => format!(
            "background-color:{from};background-image:linear-gradient({}, {from}, {to});",
            direction.css_keyword()
        ),
        Background::Image { src } => format!(
            "background-image:url('{}');background-size:cover;background-position:center;",
            src
        ),
    }
}

/// Write one half container. `rotation_css` is appended to the style of
/// the top-half container only.
pub(crate) fn write_half(
    out: &mut String,
    face: &CardFace,
    half: &HalfView,
    font_css: &str,
    rotation_css: &str,
    logo: Option<&LogoBox>,
) {
    let (class, top, rotation) = match half.half {
        Half::Top => ("half half-top", 0.0, rotation_css),
        Half::Bottom => ("half half-bottom", HALF_HEIGHT_PX, ""),
    };
    let _ = write!(
        out,
        "<div class=\"{class}\" style=\"position:absolute;left:0;top:{}px;width:{}px;height:{}px;overflow:hidden;{rotation}\">",
        fmt_num(top),
        fmt_num(SURFACE_WIDTH_PX),
        fmt_num(HALF_HEIGHT_PX),
    );

    for text in &half.texts {
        write_text_line(out, face, text, font_css);
    }
    if let Some(logo) = logo {
        let _ = write!(
            out,
            "<img class=\"logo\" src=\"{}\" width=\"{w}\" height=\"{h}\" style=\"position:absolute;left:{}px;top:{}px;width:{w}px;height:{h}px;\">",
            escape_xml(&logo.src),
            fmt_num(logo.left),
            fmt_num(logo.top),
            w = fmt_num(logo.width),
            h = fmt_num(logo.height),
        );
    }
    for element in &half.elements {
        write_element(out, element, font_css);
    }

    out.push_str("</div>");
}

fn write_text_line(out: &mut String, face: &CardFace, text: &TextBlock, font_css: &str) {
    let line_height = text.font_size * LINE_HEIGHT;
    let _ = write!(
        out,
        "<div class=\"line\" style=\"position:absolute;left:{}px;top:{}px;width:{}px;height:{lh}px;line-height:{lh}px;text-align:center;white-space:nowrap;font-family:{};font-size:{}px;font-weight:{};letter-spacing:{}em;color:{};opacity:{};\">{}</div>",
        fmt_num(percent_x(text.x) - SURFACE_WIDTH_PX / 2.0),
        fmt_num(text.y_px - line_height / 2.0),
        fmt_num(SURFACE_WIDTH_PX),
        escape_xml(font_css),
        fmt_num(text.font_size),
        text.weight,
        fmt_num(face.style.tracking),
        escape_xml(&face.text_color),
        fmt_num(text.opacity),
        escape_xml(&text.content),
        lh = fmt_num(line_height),
    );
}

fn write_element(out: &mut String, element: &PlacedElement, font_css: &str) {
    let (x, y) = (
        percent_x(element.position.x),
        percent_y(element.position.y),
    );
    match &element.kind {
        ElementKind::Text {
            content,
            color,
            font_size,
            bold,
        } => {
            let line_height = font_size * LINE_HEIGHT;
            let _ = write!(
                out,
                "<div class=\"element\" style=\"position:absolute;left:{}px;top:{}px;width:{}px;line-height:{}px;text-align:center;white-space:nowrap;font-family:{};font-size:{}px;font-weight:{};color:{};\">{}</div>",
                fmt_num(x - SURFACE_WIDTH_PX / 2.0),
                fmt_num(y - line_height / 2.0),
                fmt_num(SURFACE_WIDTH_PX),
                fmt_num(line_height),
                escape_xml(font_css),
                fmt_num(*font_size),
                if *bold { "bold" } else { "normal" },
                escape_xml(color),
                escape_xml(content),
            );
        }
        ElementKind::Line {
            color,
            thickness,
            length,
        } => {
            let _ = write!(
                out,
                "<div class=\"element\" style=\"position:absolute;left:{}px;top:{}px;width:{}px;height:0;font-size:0;border-top:{}px solid {};\"></div>",
                fmt_num(x - length / 2.0),
                fmt_num(y - thickness / 2.0),
                fmt_num(*length),
                fmt_num(*thickness),
                escape_xml(color),
            );
        }
    }
}

/// The fold divider, drawn once at the seam.
pub(crate) fn write_divider(out: &mut String, divider: &Divider) {
    let _ = write!(
        out,
        "<div class=\"divider\" style=\"position:absolute;left:{}px;top:{}px;width:{}px;height:0;font-size:0;border-top:1px dashed {};\"></div>",
        fmt_num(DIVIDER_INSET_PX),
        fmt_num(HALF_HEIGHT_PX),
        fmt_num(SURFACE_WIDTH_PX - 2.0 * DIVIDER_INSET_PX),
        escape_xml(&divider.color),
    );
}

/// Pixel size of the design's logo image; `None` without a logo or when
/// the image cannot be decoded, in which case the logo is left out.
pub(crate) fn logo_dimensions(design: &CardDesign) -> Option<(u32, u32)> {
    let src = design.logo.image.as_deref()?;
    decode_image(src)
        .inspect_err(|err| debug!(err:% = err; "Leaving undecodable logo out of the markup"))
        .ok()
        .map(|img| (img.width(), img.height()))
        .filter(|(width, height)| *width > 0 && *height > 0)
}

/// The logo box keeps the image's aspect ratio inside the logo's square,
/// centered on its position. Word does not honor `object-fit`.
pub(crate) fn fitted_logo_box(half: &HalfView, (width, height): (u32, u32)) -> Option<LogoBox> {
    let logo = half.logo.as_ref()?;
    let aspect_ratio = width as f32 / height as f32;
    let (box_width, box_height) = if aspect_ratio >= 1.0 {
        (logo.size, logo.size / aspect_ratio)
    } else {
        (logo.size * aspect_ratio, logo.size)
    };
    Some(LogoBox {
        src: logo.src.clone(),
        left: percent_x(logo.position.x) - box_width / 2.0,
        top: percent_y(logo.position.y) - box_height / 2.0,
        width: box_width,
        height: box_height,
    })
}
