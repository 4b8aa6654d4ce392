use namecard::drag::{PX_PER_PERCENT_X, PX_PER_PERCENT_Y};
use namecard::render::{logo_half, mirror_position};
use namecard::typography::name_font_size;
use namecard::{
    render_card, CardDesign, DragEngine, DragTarget, EditMode, Half, HalfView, Participant,
    PointerPos, Position, Template,
};
use proptest::prelude::*;

fn percent() -> impl Strategy<Value = f32> {
    0.0f32..=100.0
}

/// Where things sit in a half, leaving out how they are styled.
fn geometry(half: &HalfView) -> (Vec<(f32, f32, f32)>, Option<(Position, f32)>, Vec<Position>) {
    (
        half.texts.iter().map(|t| (t.x, t.y_px, t.font_size)).collect(),
        half.logo.as_ref().map(|logo| (logo.position, logo.size)),
        half.elements.iter().map(|e| e.position).collect(),
    )
}

proptest! {
    #[test]
    fn dragged_positions_stay_in_range(
        x in percent(),
        y in percent(),
        dx in -5000.0f32..5000.0,
        dy in -5000.0f32..5000.0,
    ) {
        let mut design = CardDesign::new();
        let id = design.add_text("Guest", Position::new(x, y));
        let mut engine = DragEngine::new();
        let start = PointerPos::new(100.0, 100.0);
        prop_assert!(engine.begin(EditMode::Layout, DragTarget::Element(id), start, &design));
        engine.update(PointerPos::new(100.0 + dx, 100.0 + dy), &mut design);

        let position = design.element(id).unwrap().position();
        prop_assert!((0.0..=100.0).contains(&position.x));
        prop_assert!((0.0..=100.0).contains(&position.y));
    }

    #[test]
    fn logo_drag_follows_the_pixel_ratio(
        x in 20.0f32..80.0,
        y in 20.0f32..80.0,
        dx in -80.0f32..80.0,
        dy in -110.0f32..110.0,
    ) {
        let mut design = CardDesign::new();
        design.set_logo_position(Position::new(x, y));
        let mut engine = DragEngine::new();
        engine.begin(EditMode::Layout, DragTarget::Logo, PointerPos::new(0.0, 0.0), &design);
        engine.update(PointerPos::new(dx, dy), &mut design);

        let moved = design.logo_position();
        prop_assert!((moved.x - (x + dx / PX_PER_PERCENT_X)).abs() < 1e-3);
        prop_assert!((moved.y - (y + dy / PX_PER_PERCENT_Y)).abs() < 1e-3);
    }

    #[test]
    fn mirroring_twice_is_the_identity(x in percent(), y in percent()) {
        let position = Position::new(x, y);
        let twice = mirror_position(mirror_position(position));
        prop_assert!((twice.x - x).abs() < 1e-4);
        prop_assert_eq!(twice.y, y);
    }

    #[test]
    fn top_half_mirrors_every_element(x in percent(), y in percent()) {
        let mut design = CardDesign::new();
        design.add_line(Position::new(x, y));
        let face = render_card(&design, &Participant::new("Ada", "Math"));
        prop_assert_eq!(face.bottom.elements[0].position, Position::new(x, y));
        prop_assert_eq!(face.top.elements[0].position, Position::new(100.0 - x, y));
    }

    #[test]
    fn logo_is_drawn_in_exactly_one_half(y in percent()) {
        let mut design = CardDesign::new();
        design.set_logo_image(Some("data:image/png;base64,AAAA".to_string()));
        design.set_logo_position(Position::new(30.0, y));
        let face = render_card(&design, &Participant::default());

        let drawn = face.halves().iter().filter(|half| half.logo.is_some()).count();
        prop_assert_eq!(drawn, 1);
        let expected = if y >= 50.0 { Half::Top } else { Half::Bottom };
        prop_assert_eq!(logo_half(y), expected);
        prop_assert_eq!(face.top.logo.is_some(), expected == Half::Top);
    }

    #[test]
    fn templates_never_move_anything(
        logo in (percent(), percent()),
        text in (percent(), percent()),
        line in (percent(), percent()),
        name_offset in -40.0f32..40.0,
    ) {
        let mut design = CardDesign::new();
        design.set_logo_image(Some("data:image/png;base64,AAAA".to_string()));
        design.set_logo_position(Position::new(logo.0, logo.1));
        design.add_text("Welcome", Position::new(text.0, text.1));
        design.add_line(Position::new(line.0, line.1));
        design.set_name_offset(name_offset);
        let participant = Participant::new("Ada Lovelace", "Analytical Society");

        design.set_template(Template::Classic);
        let classic = render_card(&design, &participant);
        for template in [Template::Modern, Template::Bordered, Template::Minimal] {
            design.set_template(template);
            let face = render_card(&design, &participant);
            prop_assert_eq!(geometry(&face.top), geometry(&classic.top));
            prop_assert_eq!(geometry(&face.bottom), geometry(&classic.bottom));
        }
    }

    #[test]
    fn longer_names_never_get_larger(name in "[a-z]{1,12}", extra in "[a-z]{1,4}") {
        let longer = format!("{name}{extra}");
        prop_assert!(name_font_size(&longer, 1.0) <= name_font_size(&name, 1.0));
    }

    #[test]
    fn style_mode_never_starts_a_drag(x in -500.0f32..500.0, y in -500.0f32..500.0) {
        let design = CardDesign::new();
        let mut engine = DragEngine::new();
        prop_assert!(!engine.begin(EditMode::Style, DragTarget::Name, PointerPos::new(x, y), &design));
        prop_assert!(!engine.is_dragging());
    }
}
