//! Cosmetic presets layered on top of the rendered card.
//!
//! A [`TemplateStyle`] only changes how emitters paint borders, tracking
//! and shading. It never feeds back into positions.

use crate::design::Template;

/// Stroke pattern of the card border.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BorderStyle {
    Solid,
    Double,
}

impl BorderStyle {
    pub fn css_keyword(self) -> &'static str {
        match self {
            BorderStyle::Solid => "solid",
            BorderStyle::Double => "double",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Border {
    /// Stroke width in surface pixels.
    pub width: f32,
    pub style: BorderStyle,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TemplateStyle {
    pub border: Option<Border>,
    /// Letter spacing of the native text lines, in em.
    pub tracking: f32,
    /// Paint a soft inner shadow along the card edges.
    pub inset_shading: bool,
    /// CSS font weight of the name line.
    pub name_weight: u16,
}

impl TemplateStyle {
    pub fn for_template(template: Template) -> Self {
        match template {
            Template::Classic => Self {
                border: Some(Border {
                    width: 2.0,
                    style: BorderStyle::Solid,
                }),
                tracking: 0.05,
                inset_shading: false,
                name_weight: 700,
            },
            Template::Modern => Self {
                border: None,
                tracking: 0.15,
                inset_shading: true,
                name_weight: 600,
            },
            Template::Bordered => Self {
                border: Some(Border {
                    width: 8.0,
                    style: BorderStyle::Double,
                }),
                tracking: 0.08,
                inset_shading: false,
                name_weight: 700,
            },
            Template::Minimal => Self {
                border: None,
                tracking: 0.0,
                inset_shading: false,
                name_weight: 400,
            },
        }
    }
}
