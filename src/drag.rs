//! Pointer-drag handling for the editable surface.
//!
//! The engine is a two-state machine: [`DragState::Idle`] and
//! [`DragState::Dragging`]. A gesture is entered with [`DragEngine::begin`],
//! fed with [`DragEngine::update`] for every pointer move and left with
//! [`DragEngine::end`]. Updated values are written straight into the
//! [`CardDesign`]; nothing is kept once the gesture ends.

use std::fmt;
use std::str::FromStr;

use log::debug;

use crate::design::{CardDesign, ElementId, Position};

/// Surface pixels per percent of the half-panel width.
pub const PX_PER_PERCENT_X: f32 = 8.0;
/// Surface pixels per percent of the half-panel height.
pub const PX_PER_PERCENT_Y: f32 = 11.0;

/// Editor mode supplied by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditMode {
    /// Cosmetic editing; text is edited in place and nothing can be dragged.
    #[default]
    Style,
    /// Layout editing; every positionable item can be dragged.
    Layout,
}

/// Something that can be dragged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DragTarget {
    Name,
    Unit,
    Logo,
    Element(ElementId),
}

impl fmt::Display for DragTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DragTarget::Name => write!(f, "name"),
            DragTarget::Unit => write!(f, "unit"),
            DragTarget::Logo => write!(f, "logo"),
            DragTarget::Element(id) => write!(f, "element:{id}"),
        }
    }
}

impl FromStr for DragTarget {
    type Err = String;

    /// Parses the `data-target` values written on the surface.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "name" => Ok(DragTarget::Name),
            "unit" => Ok(DragTarget::Unit),
            "logo" => Ok(DragTarget::Logo),
            other => other
                .strip_prefix("element:")
                .and_then(|id| id.parse().ok())
                .map(DragTarget::Element)
                .ok_or_else(|| format!("unknown drag target `{other}`")),
        }
    }
}

/// Pointer location in surface pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointerPos {
    pub x: f32,
    pub y: f32,
}

impl PointerPos {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Value of the target captured when the gesture started.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Snapshot {
    /// Vertical pixel offset of the name or unit line.
    Offset(f32),
    /// Percentage position of the logo or an element.
    Position(Position),
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging {
        target: DragTarget,
        origin: PointerPos,
        snapshot: Snapshot,
    },
}

#[derive(Debug, Default)]
pub struct DragEngine {
    state: DragState,
}

impl DragEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &DragState {
        &self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. })
    }

    /// The item being dragged, if any.
    pub fn target(&self) -> Option<DragTarget> {
        match self.state {
            DragState::Dragging { target, .. } => Some(target),
            DragState::Idle => None,
        }
    }

    /// Start dragging `target`. Refused in style mode and for element ids
    /// the design does not contain; returns whether a gesture started.
    pub fn begin(
        &mut self,
        mode: EditMode,
        target: DragTarget,
        pointer: PointerPos,
        design: &CardDesign,
    ) -> bool {
        if mode != EditMode::Layout {
            debug!(drag_target:% = target; "Drag refused outside layout mode");
            return false;
        }

        let snapshot = match target {
            DragTarget::Name => Snapshot::Offset(design.name_offset),
            DragTarget::Unit => Snapshot::Offset(design.unit_offset),
            DragTarget::Logo => Snapshot::Position(design.logo_position()),
            DragTarget::Element(id) => match design.element(id) {
                Some(element) => Snapshot::Position(element.position()),
                None => {
                    debug!(drag_target:% = target; "Drag refused for unknown element");
                    return false;
                }
            },
        };

        self.state = DragState::Dragging {
            target,
            origin: pointer,
            snapshot,
        };
        true
    }

    /// Apply the pointer delta since [`begin`](Self::begin) to the design.
    /// Returns `false` while idle or when the dragged element has vanished.
    pub fn update(&mut self, pointer: PointerPos, design: &mut CardDesign) -> bool {
        let DragState::Dragging {
            target,
            origin,
            snapshot,
        } = self.state
        else {
            return false;
        };

        let dx = pointer.x - origin.x;
        let dy = pointer.y - origin.y;

        match (target, snapshot) {
            (DragTarget::Name, Snapshot::Offset(start)) => {
                design.set_name_offset(start + dy);
                true
            }
            (DragTarget::Unit, Snapshot::Offset(start)) => {
                design.set_unit_offset(start + dy);
                true
            }
            (DragTarget::Logo, Snapshot::Position(start)) => {
                design.set_logo_position(shift(start, dx, dy));
                true
            }
            (DragTarget::Element(id), Snapshot::Position(start)) => {
                design.set_element_position(id, shift(start, dx, dy))
            }
            _ => false,
        }
    }

    /// Finish the gesture and return what was being dragged.
    pub fn end(&mut self) -> Option<DragTarget> {
        let target = self.target();
        self.state = DragState::Idle;
        target
    }
}

/// Convert a pixel delta to percentages and clamp the result.
fn shift(start: Position, dx: f32, dy: f32) -> Position {
    Position::new(
        start.x + dx / PX_PER_PERCENT_X,
        start.y + dy / PX_PER_PERCENT_Y,
    )
    .clamped()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn style_mode_refuses_to_drag() {
        let design = CardDesign::new();
        let mut engine = DragEngine::new();
        assert!(!engine.begin(EditMode::Style, DragTarget::Name, PointerPos::default(), &design));
        assert!(!engine.is_dragging());
    }

    #[test]
    fn name_offset_follows_vertical_delta_without_clamping() {
        let mut design = CardDesign::new();
        design.set_name_offset(12.0);
        let mut engine = DragEngine::new();

        assert!(engine.begin(EditMode::Layout, DragTarget::Name, PointerPos::new(100.0, 100.0), &design));
        assert!(engine.update(PointerPos::new(400.0, -900.0), &mut design));
        assert_eq!(design.name_offset, -988.0);

        // Deltas are always measured from the gesture origin.
        assert!(engine.update(PointerPos::new(0.0, 110.0), &mut design));
        assert_eq!(design.name_offset, 22.0);
        assert_eq!(engine.end(), Some(DragTarget::Name));
        assert!(!engine.update(PointerPos::new(0.0, 500.0), &mut design));
        assert_eq!(design.name_offset, 22.0);
    }

    #[test]
    fn logo_moves_in_percent_space() {
        let mut design = CardDesign::new();
        design.set_logo_position(Position::new(50.0, 50.0));
        let mut engine = DragEngine::new();

        engine.begin(EditMode::Layout, DragTarget::Logo, PointerPos::new(0.0, 0.0), &design);
        engine.update(PointerPos::new(80.0, -110.0), &mut design);
        assert_eq!(design.logo_position(), Position::new(60.0, 40.0));

        engine.update(PointerPos::new(8000.0, 11000.0), &mut design);
        assert_eq!(design.logo_position(), Position::new(100.0, 100.0));
    }

    #[test]
    fn element_drag_clamps_and_keeps_the_id() {
        let mut design = CardDesign::new();
        let id = design.add_text("VIP", Position::new(10.0, 90.0));
        let mut engine = DragEngine::new();

        assert!(engine.begin(EditMode::Layout, DragTarget::Element(id), PointerPos::new(5.0, 5.0), &design));
        assert!(engine.update(PointerPos::new(-500.0, 500.0), &mut design));
        let element = design.element(id).unwrap();
        assert_eq!(element.position(), Position::new(0.0, 100.0));
        assert_eq!(element.id, id);
    }

    #[test]
    fn unknown_or_removed_elements_are_ignored() {
        let mut design = CardDesign::new();
        let id = design.add_line(Position::new(50.0, 50.0));
        let mut engine = DragEngine::new();
        assert!(engine.begin(EditMode::Layout, DragTarget::Element(id), PointerPos::default(), &design));

        design.remove_element(id);
        assert!(!engine.update(PointerPos::new(10.0, 10.0), &mut design));
        engine.end();
        assert!(!engine.begin(EditMode::Layout, DragTarget::Element(id), PointerPos::default(), &design));
    }

    #[test]
    fn targets_round_trip_through_attributes() {
        let mut design = CardDesign::new();
        let id = design.add_line(Position::new(1.0, 1.0));
        for target in [DragTarget::Name, DragTarget::Unit, DragTarget::Logo, DragTarget::Element(id)] {
            assert_eq!(target.to_string().parse::<DragTarget>().unwrap(), target);
        }
        assert!("element:nope".parse::<DragTarget>().is_err());
    }
}
