//! Mirror/fold rendering: one design and one participant in, two half-views
//! out.
//!
//! The physical card is folded along its horizontal midline. The bottom half
//! is rendered as designed. The top half carries the same content inside a
//! container that every target rotates by 180°, so inside that container
//! free elements and the logo only need a horizontal flip:
//! `(x, y) -> (100 - x, y)`.
//!
//! Every exporter consumes the [`CardFace`] produced here. There is no other
//! mirroring code in the crate.

use crate::design::{
    Background, CardDesign, ContentMode, ElementId, ElementKind, FontFamily, Participant, Position,
    MAX_PERCENT,
};
use crate::template::TemplateStyle;
use crate::typography::{
    name_font_size, unit_font_size, FOREIGN_NAME_RATIO, FOREIGN_UNIT_RATIO,
};

// ============================================================================
// Constants
// ============================================================================

/// Card surface in surface pixels; each half is `SURFACE_WIDTH_PX` by
/// `HALF_HEIGHT_PX`.
pub const SURFACE_WIDTH_PX: f32 = 800.0;
pub const SURFACE_HEIGHT_PX: f32 = 1100.0;
pub const HALF_HEIGHT_PX: f32 = SURFACE_HEIGHT_PX / 2.0;

/// Vertical anchors of the native lines, in percent of the half height.
const NAME_ANCHOR_PCT: f32 = 42.0;
const NAME_ONLY_ANCHOR_PCT: f32 = 50.0;
const UNIT_ANCHOR_PCT: f32 = 72.0;

/// Gap between a line and its foreign-language companion, in line heights.
const FOREIGN_GAP: f32 = 0.75;

/// Opacity of the native text in the mirrored half.
pub const MIRROR_TEXT_OPACITY: f32 = 0.85;

/// Logos at or beyond this vertical percentage belong to the top half.
const LOGO_SPLIT_PCT: f32 = 50.0;

// ============================================================================
// Output Description
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Half {
    Top,
    Bottom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextRole {
    Name,
    NameForeign,
    Unit,
    UnitForeign,
}

impl TextRole {
    /// Lines that can be dragged carry the identifier of their drag target.
    pub fn drag_attribute(self) -> Option<&'static str> {
        match self {
            TextRole::Name => Some("name"),
            TextRole::Unit => Some("unit"),
            TextRole::NameForeign | TextRole::UnitForeign => None,
        }
    }
}

/// A native text line, horizontally centered on `x` percent.
#[derive(Debug, Clone, PartialEq)]
pub struct TextBlock {
    pub role: TextRole,
    pub content: String,
    pub x: f32,
    /// Vertical center in half-panel pixels, offsets included.
    pub y_px: f32,
    pub font_size: f32,
    pub weight: u16,
    pub opacity: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlacedLogo {
    pub src: String,
    pub position: Position,
    pub size: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlacedElement {
    pub id: ElementId,
    pub position: Position,
    pub kind: ElementKind,
}

/// Everything drawn inside one half of the card.
#[derive(Debug, Clone, PartialEq)]
pub struct HalfView {
    pub half: Half,
    pub texts: Vec<TextBlock>,
    pub logo: Option<PlacedLogo>,
    /// In z-order.
    pub elements: Vec<PlacedElement>,
}

impl HalfView {
    /// The whole container is turned upside down by the target.
    pub fn is_rotated(&self) -> bool {
        self.half == Half::Top
    }
}

/// The fold-line divider, drawn once at the seam.
#[derive(Debug, Clone, PartialEq)]
pub struct Divider {
    pub color: String,
}

/// Render-ready description of one participant's card.
#[derive(Debug, Clone, PartialEq)]
pub struct CardFace {
    pub display_name: String,
    pub background: Background,
    pub text_color: String,
    pub font: FontFamily,
    pub style: TemplateStyle,
    pub top: HalfView,
    pub bottom: HalfView,
    pub divider: Option<Divider>,
}

impl CardFace {
    /// Halves in paint order, top first.
    pub fn halves(&self) -> [&HalfView; 2] {
        [&self.top, &self.bottom]
    }
}

// ============================================================================
// Rendering
// ============================================================================

/// Position of a free element or the logo inside the rotated top half.
pub fn mirror_position(position: Position) -> Position {
    Position::new(MAX_PERCENT - position.x, position.y)
}

/// The half a logo at vertical position `y` is drawn in.
pub fn logo_half(y: f32) -> Half {
    if y < LOGO_SPLIT_PCT {
        Half::Bottom
    } else {
        Half::Top
    }
}

pub fn render_card(design: &CardDesign, participant: &Participant) -> CardFace {
    let style = TemplateStyle::for_template(design.template);
    let texts = native_text(design, participant, &style);

    CardFace {
        display_name: participant.display_name().to_string(),
        background: design.background.clone(),
        text_color: design.text_color.clone(),
        font: design.font_family,
        style,
        top: render_half(design, &texts, Half::Top),
        bottom: render_half(design, &texts, Half::Bottom),
        divider: design.show_divider.then(|| Divider {
            color: design.divider_color.clone(),
        }),
    }
}

fn render_half(design: &CardDesign, texts: &[TextBlock], half: Half) -> HalfView {
    let place = |position: Position| match half {
        Half::Bottom => position,
        Half::Top => mirror_position(position),
    };

    let texts = texts
        .iter()
        .map(|text| match half {
            Half::Bottom => text.clone(),
            Half::Top => TextBlock {
                opacity: text.opacity * MIRROR_TEXT_OPACITY,
                ..text.clone()
            },
        })
        .collect();

    let logo = design
        .logo
        .image
        .as_ref()
        .filter(|_| logo_half(design.logo.y) == half)
        .map(|src| PlacedLogo {
            src: src.clone(),
            position: place(design.logo_position()),
            size: design.logo.size,
        });

    let elements = design
        .elements
        .iter()
        .map(|element| PlacedElement {
            id: element.id,
            position: place(element.position()),
            kind: element.kind.clone(),
        })
        .collect();

    HalfView {
        half,
        texts,
        logo,
        elements,
    }
}

/// Name and unit lines in half-panel pixels, shared by both halves.
fn native_text(design: &CardDesign, participant: &Participant, style: &TemplateStyle) -> Vec<TextBlock> {
    let mut texts = Vec::new();
    let show_unit = design.content_mode == ContentMode::NameAndUnit;

    let name = participant.display_name();
    let name_size = name_font_size(name, design.name_multiplier());
    let name_anchor = if show_unit {
        NAME_ANCHOR_PCT
    } else {
        NAME_ONLY_ANCHOR_PCT
    };
    let name_y = percent_to_px(name_anchor) + design.name_offset;

    if !name.is_empty() {
        texts.push(line(TextRole::Name, name, name_y, name_size, style.name_weight));
    }
    // Skipped when it already stands in for a blank local name.
    if let Some(foreign) = companion(&participant.name_foreign).filter(|f| *f != name) {
        let size = name_size * FOREIGN_NAME_RATIO;
        let y = name_y + name_size / 2.0 + size * FOREIGN_GAP;
        texts.push(line(TextRole::NameForeign, foreign, y, size, 400));
    }

    if show_unit {
        let unit_size = unit_font_size(design.unit_multiplier());
        let unit_y = percent_to_px(UNIT_ANCHOR_PCT) + design.unit_offset;
        let unit = participant.unit_local.trim();
        if !unit.is_empty() {
            texts.push(line(TextRole::Unit, unit, unit_y, unit_size, 400));
        }
        if let Some(foreign) = companion(&participant.unit_foreign) {
            let size = unit_size * FOREIGN_UNIT_RATIO;
            let y = unit_y + unit_size / 2.0 + size * FOREIGN_GAP;
            texts.push(line(TextRole::UnitForeign, foreign, y, size, 400));
        }
    }

    texts
}

fn companion(text: &Option<String>) -> Option<&str> {
    text.as_deref().map(str::trim).filter(|t| !t.is_empty())
}

fn line(role: TextRole, content: &str, y_px: f32, font_size: f32, weight: u16) -> TextBlock {
    TextBlock {
        role,
        content: content.to_string(),
        x: 50.0,
        y_px,
        font_size,
        weight,
        opacity: 1.0,
    }
}

fn percent_to_px(pct: f32) -> f32 {
    pct * HALF_HEIGHT_PX / 100.0
}
