//! The card design record and the participant input it is rendered for.
//!
//! A [`CardDesign`] describes one reusable layout. It is created with
//! defaults when a session starts and mutated in place through the setters
//! below; positions written through any setter are clamped into the
//! percentage space `[0, 100]`.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use log::warn;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ============================================================================
// Constants
// ============================================================================

/// Bounds of the percentage coordinate space
pub const MIN_PERCENT: f32 = 0.0;
pub const MAX_PERCENT: f32 = 100.0;

/// Allowed range for every scale multiplier
const MIN_SCALE: f32 = 0.1;
const MAX_SCALE: f32 = 5.0;

const DEFAULT_TEXT_COLOR: &str = "#1f2937";
const DEFAULT_BACKGROUND: &str = "#ffffff";
const DEFAULT_DIVIDER_COLOR: &str = "#d1d5db";
const DEFAULT_LINE_COLOR: &str = "#9ca3af";

const DEFAULT_LOGO_X: f32 = 50.0;
const DEFAULT_LOGO_Y: f32 = 15.0;
const DEFAULT_LOGO_SIZE: f32 = 80.0;

const DEFAULT_ELEMENT_FONT_SIZE: f32 = 24.0;
const DEFAULT_LINE_THICKNESS: f32 = 2.0;
const DEFAULT_LINE_LENGTH: f32 = 200.0;

/// Clamp a percentage coordinate into `[0, 100]`. NaN collapses to 0.
pub fn clamp_percent(value: f32) -> f32 {
    if value.is_nan() {
        return MIN_PERCENT;
    }
    value.clamp(MIN_PERCENT, MAX_PERCENT)
}

fn clamp_scale(value: f32) -> f32 {
    if value.is_nan() {
        return 1.0;
    }
    value.clamp(MIN_SCALE, MAX_SCALE)
}

// ============================================================================
// Enumerations
// ============================================================================

/// Cosmetic preset; never affects positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Template {
    #[default]
    Classic,
    Modern,
    Bordered,
    Minimal,
}

/// Whether the secondary (unit) text block is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentMode {
    #[default]
    NameAndUnit,
    NameOnly,
}

/// Direction of a two-color background gradient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GradientDirection {
    #[default]
    ToBottom,
    ToRight,
    ToBottomRight,
    ToTopRight,
}

impl GradientDirection {
    /// CSS `linear-gradient` direction keyword.
    pub fn css_keyword(self) -> &'static str {
        match self {
            GradientDirection::ToBottom => "to bottom",
            GradientDirection::ToRight => "to right",
            GradientDirection::ToBottomRight => "to bottom right",
            GradientDirection::ToTopRight => "to top right",
        }
    }

    /// Gradient vector as `(x1, y1, x2, y2)` fractions of the bounding box.
    pub fn vector(self) -> (f32, f32, f32, f32) {
        match self {
            GradientDirection::ToBottom => (0.0, 0.0, 0.0, 1.0),
            GradientDirection::ToRight => (0.0, 0.0, 1.0, 0.0),
            GradientDirection::ToBottomRight => (0.0, 0.0, 1.0, 1.0),
            GradientDirection::ToTopRight => (0.0, 1.0, 1.0, 0.0),
        }
    }
}

/// Abstract font choice, mapped to concrete fonts by each render target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontFamily {
    #[default]
    Hei,
    Song,
    Kai,
    Sans,
    Serif,
}

impl FontFamily {
    /// Font stack for CSS and SVG targets.
    pub fn css_stack(self) -> &'static str {
        match self {
            FontFamily::Hei => "'SimHei', 'Heiti SC', 'Noto Sans CJK SC', sans-serif",
            FontFamily::Song => "'SimSun', 'Songti SC', 'Noto Serif CJK SC', serif",
            FontFamily::Kai => "'KaiTi', 'Kaiti SC', 'STKaiti', serif",
            FontFamily::Sans => "'Helvetica Neue', 'Arial', sans-serif",
            FontFamily::Serif => "'Georgia', 'Times New Roman', serif",
        }
    }

    /// A single font name that legacy document viewers ship with.
    pub fn document_font(self) -> &'static str {
        match self {
            FontFamily::Hei => "SimHei",
            FontFamily::Song => "SimSun",
            FontFamily::Kai => "KaiTi",
            FontFamily::Sans => "Arial",
            FontFamily::Serif => "Times New Roman",
        }
    }

    /// Generic family used when the rasterizer cannot find the named font.
    pub fn generic(self) -> &'static str {
        match self {
            FontFamily::Hei | FontFamily::Sans => "sans-serif",
            FontFamily::Song | FontFamily::Kai | FontFamily::Serif => "serif",
        }
    }
}

impl FromStr for FontFamily {
    type Err = String;

    /// Accepts the abstract names as well as common concrete font names.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s
            .trim()
            .trim_matches(|c| c == '"' || c == '\'')
            .to_lowercase()
            .replace([' ', '-', '_'], "");
        match normalized.as_str() {
            "hei" | "simhei" | "heiti" | "heitisc" | "黑体" | "microsoftyahei" | "微软雅黑" => {
                Ok(FontFamily::Hei)
            }
            "song" | "simsun" | "songti" | "songtisc" | "宋体" => Ok(FontFamily::Song),
            "kai" | "kaiti" | "kaitisc" | "stkaiti" | "楷体" => Ok(FontFamily::Kai),
            "sans" | "sansserif" | "arial" | "helvetica" | "helveticaneue" => Ok(FontFamily::Sans),
            "serif" | "georgia" | "timesnewroman" | "times" => Ok(FontFamily::Serif),
            _ => Err(format!("unknown font family `{s}`")),
        }
    }
}

// ============================================================================
// Background & Logo
// ============================================================================

/// The active card background. Exactly one variant is active.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Background {
    Color {
        color: String,
    },
    Gradient {
        from: String,
        to: String,
        #[serde(default)]
        direction: GradientDirection,
    },
    /// Uploaded image as a `data:` URL.
    Image {
        src: String,
    },
}

impl Default for Background {
    fn default() -> Self {
        Background::Color {
            color: DEFAULT_BACKGROUND.to_string(),
        }
    }
}

/// Optional logo image with its placement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Logo {
    /// Image as a `data:` URL; no logo is drawn while this is `None`.
    pub image: Option<String>,
    pub x: f32,
    pub y: f32,
    /// Width in surface pixels.
    pub size: f32,
}

impl Default for Logo {
    fn default() -> Self {
        Self {
            image: None,
            x: DEFAULT_LOGO_X,
            y: DEFAULT_LOGO_Y,
            size: DEFAULT_LOGO_SIZE,
        }
    }
}

// ============================================================================
// Custom Elements
// ============================================================================

/// Stable identifier of a custom element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementId(Uuid);

impl ElementId {
    fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ElementId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// A percentage-space position.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// The same position with both axes clamped into `[0, 100]`.
    pub fn clamped(self) -> Self {
        Self {
            x: clamp_percent(self.x),
            y: clamp_percent(self.y),
        }
    }
}

/// Free-form element content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ElementKind {
    #[serde(rename_all = "camelCase")]
    Text {
        content: String,
        color: String,
        font_size: f32,
        #[serde(default)]
        bold: bool,
    },
    /// Horizontal segment centered on the element position.
    Line {
        color: String,
        thickness: f32,
        length: f32,
    },
}

/// A free-form element anchored at its own center.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomElement {
    pub id: ElementId,
    pub x: f32,
    pub y: f32,
    #[serde(flatten)]
    pub kind: ElementKind,
}

impl CustomElement {
    pub fn position(&self) -> Position {
        Position::new(self.x, self.y)
    }
}

// ============================================================================
// Card Design
// ============================================================================

/// One reusable card layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CardDesign {
    pub template: Template,
    pub background: Background,
    pub text_color: String,
    pub font_family: FontFamily,
    pub font_scale: f32,
    pub logo: Logo,
    pub name_offset: f32,
    pub unit_offset: f32,
    pub name_scale: f32,
    pub unit_scale: f32,
    pub show_divider: bool,
    pub divider_color: String,
    pub content_mode: ContentMode,
    pub elements: Vec<CustomElement>,
}

impl Default for CardDesign {
    fn default() -> Self {
        Self {
            template: Template::default(),
            background: Background::default(),
            text_color: DEFAULT_TEXT_COLOR.to_string(),
            font_family: FontFamily::default(),
            font_scale: 1.0,
            logo: Logo::default(),
            name_offset: 0.0,
            unit_offset: 0.0,
            name_scale: 1.0,
            unit_scale: 1.0,
            show_divider: true,
            divider_color: DEFAULT_DIVIDER_COLOR.to_string(),
            content_mode: ContentMode::default(),
            elements: Vec::new(),
        }
    }
}

impl CardDesign {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a design from JSON, defaulting missing fields and clamping
    /// every stored position.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let mut design: CardDesign = serde_json::from_str(json)?;
        design.normalize();
        Ok(design)
    }

    /// Re-establish the model invariants after bulk edits. Offsets that are
    /// not finite fall back to 0; of several elements sharing an id only the
    /// first is kept.
    pub fn normalize(&mut self) {
        if !self.name_offset.is_finite() {
            self.name_offset = 0.0;
        }
        if !self.unit_offset.is_finite() {
            self.unit_offset = 0.0;
        }
        let mut seen = HashSet::new();
        self.elements.retain(|element| {
            let first = seen.insert(element.id);
            if !first {
                warn!(element_id:% = element.id; "Dropping element with a duplicate id");
            }
            first
        });

        self.logo.x = clamp_percent(self.logo.x);
        self.logo.y = clamp_percent(self.logo.y);
        self.font_scale = clamp_scale(self.font_scale);
        self.name_scale = clamp_scale(self.name_scale);
        self.unit_scale = clamp_scale(self.unit_scale);
        for element in &mut self.elements {
            element.x = clamp_percent(element.x);
            element.y = clamp_percent(element.y);
        }
    }

    pub fn set_template(&mut self, template: Template) {
        self.template = template;
    }

    pub fn set_background_color(&mut self, color: impl Into<String>) {
        self.background = Background::Color {
            color: color.into(),
        };
    }

    pub fn set_background_gradient(
        &mut self,
        from: impl Into<String>,
        to: impl Into<String>,
        direction: GradientDirection,
    ) {
        self.background = Background::Gradient {
            from: from.into(),
            to: to.into(),
            direction,
        };
    }

    pub fn set_background_image(&mut self, src: impl Into<String>) {
        self.background = Background::Image { src: src.into() };
    }

    pub fn set_text_color(&mut self, color: impl Into<String>) {
        self.text_color = color.into();
    }

    pub fn set_font_family(&mut self, font: FontFamily) {
        self.font_family = font;
    }

    pub fn set_font_scale(&mut self, scale: f32) {
        self.font_scale = clamp_scale(scale);
    }

    pub fn set_name_scale(&mut self, scale: f32) {
        self.name_scale = clamp_scale(scale);
    }

    pub fn set_unit_scale(&mut self, scale: f32) {
        self.unit_scale = clamp_scale(scale);
    }

    pub fn set_name_offset(&mut self, offset: f32) {
        if offset.is_finite() {
            self.name_offset = offset;
        }
    }

    pub fn set_unit_offset(&mut self, offset: f32) {
        if offset.is_finite() {
            self.unit_offset = offset;
        }
    }

    pub fn set_logo_image(&mut self, image: Option<String>) {
        self.logo.image = image;
    }

    pub fn set_logo_position(&mut self, position: Position) {
        let position = position.clamped();
        self.logo.x = position.x;
        self.logo.y = position.y;
    }

    pub fn logo_position(&self) -> Position {
        Position::new(self.logo.x, self.logo.y)
    }

    pub fn set_logo_size(&mut self, size: f32) {
        if size.is_finite() && size > 0.0 {
            self.logo.size = size;
        }
    }

    pub fn set_divider(&mut self, show: bool, color: impl Into<String>) {
        self.show_divider = show;
        self.divider_color = color.into();
    }

    pub fn set_content_mode(&mut self, mode: ContentMode) {
        self.content_mode = mode;
    }

    /// Combined multiplier for the name line.
    pub fn name_multiplier(&self) -> f32 {
        self.font_scale * self.name_scale
    }

    /// Combined multiplier for the unit line.
    pub fn unit_multiplier(&self) -> f32 {
        self.font_scale * self.unit_scale
    }

    // ------------------------------------------------------------------------
    // Custom elements
    // ------------------------------------------------------------------------

    /// Append a text element on top of the stack and return its id.
    pub fn add_text(&mut self, content: impl Into<String>, position: Position) -> ElementId {
        let kind = ElementKind::Text {
            content: content.into(),
            color: self.text_color.clone(),
            font_size: DEFAULT_ELEMENT_FONT_SIZE,
            bold: false,
        };
        self.push_element(kind, position)
    }

    /// Append a horizontal line element on top of the stack and return its id.
    pub fn add_line(&mut self, position: Position) -> ElementId {
        let kind = ElementKind::Line {
            color: DEFAULT_LINE_COLOR.to_string(),
            thickness: DEFAULT_LINE_THICKNESS,
            length: DEFAULT_LINE_LENGTH,
        };
        self.push_element(kind, position)
    }

    fn push_element(&mut self, kind: ElementKind, position: Position) -> ElementId {
        let id = ElementId::generate();
        let position = position.clamped();
        self.elements.push(CustomElement {
            id,
            x: position.x,
            y: position.y,
            kind,
        });
        id
    }

    pub fn element(&self, id: ElementId) -> Option<&CustomElement> {
        self.elements.iter().find(|e| e.id == id)
    }

    /// Edit an element's content in place. The id is never touched.
    /// Returns `false` when no element has this id.
    pub fn update_element(&mut self, id: ElementId, edit: impl FnOnce(&mut ElementKind)) -> bool {
        match self.elements.iter_mut().find(|e| e.id == id) {
            Some(element) => {
                edit(&mut element.kind);
                true
            }
            None => false,
        }
    }

    /// Move an element, clamping into the percentage space.
    pub fn set_element_position(&mut self, id: ElementId, position: Position) -> bool {
        let position = position.clamped();
        match self.elements.iter_mut().find(|e| e.id == id) {
            Some(element) => {
                element.x = position.x;
                element.y = position.y;
                true
            }
            None => false,
        }
    }

    pub fn remove_element(&mut self, id: ElementId) -> bool {
        let before = self.elements.len();
        self.elements.retain(|e| e.id != id);
        self.elements.len() != before
    }
}

// ============================================================================
// Participant
// ============================================================================

/// One person a card is printed for. Read-only to this crate.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    pub name_local: String,
    #[serde(default)]
    pub name_foreign: Option<String>,
    #[serde(default)]
    pub unit_local: String,
    #[serde(default)]
    pub unit_foreign: Option<String>,
}

impl Participant {
    pub fn new(name_local: impl Into<String>, unit_local: impl Into<String>) -> Self {
        Self {
            name_local: name_local.into(),
            unit_local: unit_local.into(),
            ..Default::default()
        }
    }

    /// The trimmed local name, or the foreign name when the local one is blank.
    pub fn display_name(&self) -> &str {
        let local = self.name_local.trim();
        if !local.is_empty() {
            return local;
        }
        self.name_foreign.as_deref().map(str::trim).unwrap_or("")
    }
}
