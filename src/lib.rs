//! namecard: dual-sided name-card layout and export.
//!
//! A [`CardDesign`] describes one layout. [`render_card`] combines it with a
//! [`Participant`] into a [`CardFace`] holding both halves of the folded
//! card, and the [`export`] targets serialize that face: an SVG surface,
//! paginated print markup and PDF, a `.doc` document and a zip of PNGs.
//! [`DragEngine`] turns pointer gestures on the surface back into design
//! edits.

pub mod design;
pub mod drag;
pub mod error;
pub mod export;
pub mod image_data;
pub mod render;
pub mod suggest;
pub mod template;
pub mod typography;

pub use design::{
    Background, CardDesign, ContentMode, CustomElement, ElementId, ElementKind, FontFamily,
    GradientDirection, Logo, Participant, Position, Template,
};
pub use drag::{DragEngine, DragState, DragTarget, EditMode, PointerPos};
pub use error::CardError;
pub use render::{render_card, CardFace, Half, HalfView};
pub use suggest::{apply_suggestion, suggest_and_apply, StyleSuggester, StyleSuggestion};
pub use template::TemplateStyle;
