//! The interactive card surface as an SVG document.
//!
//! The surface is the full card in surface pixels: the top half inside a
//! group rotated by 180° about its own center, the bottom half translated
//! below the fold. Draggable nodes carry a `data-target` attribute whose
//! value parses as a [`DragTarget`](crate::drag::DragTarget).
//!
//! The raster exporter rasterizes exactly this document.

use svg::node::element::{
    Definitions, Group, Image, Line, LinearGradient, Rectangle, Stop, Text,
};
use svg::{Document, Node};

use crate::design::{Background, ElementKind};
use crate::drag::DragTarget;
use crate::render::{
    CardFace, Half, HalfView, PlacedElement, PlacedLogo, TextBlock, HALF_HEIGHT_PX,
    SURFACE_HEIGHT_PX, SURFACE_WIDTH_PX,
};
use crate::template::BorderStyle;

const BACKGROUND_GRADIENT_ID: &str = "card-background";

/// Horizontal inset of the fold divider.
const DIVIDER_INSET_PX: f32 = 40.0;

/// Width of the soft edge used for the inset shading hint.
const INSET_SHADE_PX: f32 = 24.0;

/// Build the surface SVG for one rendered card.
pub fn surface_svg(face: &CardFace) -> String {
    let mut document = Document::new()
        .set("width", SURFACE_WIDTH_PX)
        .set("height", SURFACE_HEIGHT_PX)
        .set(
            "viewBox",
            format!("0 0 {} {}", SURFACE_WIDTH_PX, SURFACE_HEIGHT_PX),
        );

    match &face.background {
        Background::Color { color } => {
            document = document.add(full_rect().set("fill", color.as_str()));
        }
        Background::Gradient {
            from,
            to,
            direction,
        } => {
            let (x1, y1, x2, y2) = direction.vector();
            let gradient = LinearGradient::new()
                .set("id", BACKGROUND_GRADIENT_ID)
                .set("x1", x1)
                .set("y1", y1)
                .set("x2", x2)
                .set("y2", y2)
                .add(Stop::new().set("offset", 0).set("stop-color", from.as_str()))
                .add(Stop::new().set("offset", 1).set("stop-color", to.as_str()));
            document = document
                .add(Definitions::new().add(gradient))
                .add(full_rect().set("fill", format!("url(#{BACKGROUND_GRADIENT_ID})")));
        }
        Background::Image { src } => {
            document = document.add(
                Image::new()
                    .set("x", 0)
                    .set("y", 0)
                    .set("width", SURFACE_WIDTH_PX)
                    .set("height", SURFACE_HEIGHT_PX)
                    .set("preserveAspectRatio", "xMidYMid slice")
                    .set("href", src.as_str()),
            );
        }
    }

    if face.style.inset_shading {
        document = document.add(inset_shade());
    }

    for half in face.halves() {
        document = document.add(half_group(face, half));
    }

    if let Some(divider) = &face.divider {
        document = document.add(
            Line::new()
                .set("data-role", "divider")
                .set("x1", DIVIDER_INSET_PX)
                .set("y1", HALF_HEIGHT_PX)
                .set("x2", SURFACE_WIDTH_PX - DIVIDER_INSET_PX)
                .set("y2", HALF_HEIGHT_PX)
                .set("stroke", divider.color.as_str())
                .set("stroke-width", 1)
                .set("stroke-dasharray", "6 4"),
        );
    }

    if let Some(border) = face.style.border {
        let stroke = face.text_color.as_str();
        match border.style {
            BorderStyle::Solid => {
                document = document.add(border_rect(border.width / 2.0, border.width, stroke));
            }
            BorderStyle::Double => {
                // Two strokes of a third of the width each, a third apart.
                let line = border.width / 3.0;
                document = document
                    .add(border_rect(line / 2.0, line, stroke))
                    .add(border_rect(border.width - line / 2.0, line, stroke));
            }
        }
    }

    document.to_string()
}

fn full_rect() -> Rectangle {
    Rectangle::new()
        .set("x", 0)
        .set("y", 0)
        .set("width", SURFACE_WIDTH_PX)
        .set("height", SURFACE_HEIGHT_PX)
}

fn border_rect(inset: f32, width: f32, stroke: &str) -> Rectangle {
    Rectangle::new()
        .set("x", inset)
        .set("y", inset)
        .set("width", SURFACE_WIDTH_PX - 2.0 * inset)
        .set("height", SURFACE_HEIGHT_PX - 2.0 * inset)
        .set("fill", "none")
        .set("stroke", stroke)
        .set("stroke-width", width)
}

fn inset_shade() -> Rectangle {
    let inset = INSET_SHADE_PX / 2.0;
    Rectangle::new()
        .set("x", inset)
        .set("y", inset)
        .set("width", SURFACE_WIDTH_PX - INSET_SHADE_PX)
        .set("height", SURFACE_HEIGHT_PX - INSET_SHADE_PX)
        .set("fill", "none")
        .set("stroke", "black")
        .set("stroke-opacity", 0.06)
        .set("stroke-width", INSET_SHADE_PX)
}

fn half_group(face: &CardFace, half: &HalfView) -> Group {
    let (name, transform) = match half.half {
        Half::Top => (
            "top",
            format!(
                "rotate(180 {} {})",
                SURFACE_WIDTH_PX / 2.0,
                HALF_HEIGHT_PX / 2.0
            ),
        ),
        Half::Bottom => ("bottom", format!("translate(0 {})", HALF_HEIGHT_PX)),
    };

    let mut group = Group::new()
        .set("data-half", name)
        .set("transform", transform)
        .set("font-family", face.font.css_stack());

    for text in &half.texts {
        group = group.add(native_text(face, text));
    }
    if let Some(logo) = &half.logo {
        group = group.add(logo_image(logo));
    }
    for element in &half.elements {
        group = group.add(element_node(element));
    }
    group
}

fn native_text(face: &CardFace, text: &TextBlock) -> Text {
    let mut node = Text::new(text.content.as_str())
        .set("x", percent_x(text.x))
        .set("y", text.y_px)
        .set("text-anchor", "middle")
        .set("dominant-baseline", "central")
        .set("font-size", text.font_size)
        .set("font-weight", text.weight)
        .set("letter-spacing", face.style.tracking * text.font_size)
        .set("fill", face.text_color.as_str())
        .set("fill-opacity", text.opacity);
    if let Some(target) = text.role.drag_attribute() {
        node = node.set("data-target", target);
    }
    node
}

fn logo_image(logo: &PlacedLogo) -> Image {
    let (x, y) = (percent_x(logo.position.x), percent_y(logo.position.y));
    Image::new()
        .set("data-target", DragTarget::Logo.to_string())
        .set("x", x - logo.size / 2.0)
        .set("y", y - logo.size / 2.0)
        .set("width", logo.size)
        .set("height", logo.size)
        .set("preserveAspectRatio", "xMidYMid meet")
        .set("href", logo.src.as_str())
}

fn element_node(element: &PlacedElement) -> Box<dyn Node> {
    let target = DragTarget::Element(element.id).to_string();
    let (x, y) = (percent_x(element.position.x), percent_y(element.position.y));

    match &element.kind {
        ElementKind::Text {
            content,
            color,
            font_size,
            bold,
        } => Box::new(
            Text::new(content.as_str())
                .set("data-target", target)
                .set("x", x)
                .set("y", y)
                .set("text-anchor", "middle")
                .set("dominant-baseline", "central")
                .set("font-size", *font_size)
                .set("font-weight", if *bold { "bold" } else { "normal" })
                .set("fill", color.as_str()),
        ),
        ElementKind::Line {
            color,
            thickness,
            length,
        } => Box::new(
            Line::new()
                .set("data-target", target)
                .set("x1", x - length / 2.0)
                .set("y1", y)
                .set("x2", x + length / 2.0)
                .set("y2", y)
                .set("stroke", color.as_str())
                .set("stroke-width", *thickness),
        ),
    }
}

pub(crate) fn percent_x(pct: f32) -> f32 {
    pct * SURFACE_WIDTH_PX / 100.0
}

pub(crate) fn percent_y(pct: f32) -> f32 {
    pct * HALF_HEIGHT_PX / 100.0
}
