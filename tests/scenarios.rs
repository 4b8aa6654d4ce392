use std::cell::RefCell;
use std::io::Cursor;
use std::time::Duration;

use namecard::export::{
    document_markup, export_archive, print_markup, surface_svg, ArchiveOptions, CardRasterizer,
    RasterImage,
};
use namecard::typography::{name_font_size, NAME_SIZE_TIERS};
use namecard::{
    render_card, CardDesign, CardError, DragEngine, DragTarget, EditMode, Participant, PointerPos,
    Position,
};

fn law_school() -> Participant {
    Participant::new("张三", "法学院")
}

/// Hands out a fixed PNG and fails on one chosen participant.
struct ScriptedRasterizer {
    fail_on: Option<usize>,
    calls: RefCell<usize>,
}

impl CardRasterizer for ScriptedRasterizer {
    fn rasterize(&self, _design: &CardDesign, participant: &Participant) -> Result<RasterImage, CardError> {
        let call = *self.calls.borrow() + 1;
        *self.calls.borrow_mut() = call;
        if self.fail_on == Some(call) {
            return Err(CardError::Raster {
                name: participant.display_name().to_string(),
                reason: "surface not ready".to_string(),
            });
        }
        Ok(RasterImage {
            width: 1,
            height: 1,
            png: vec![0x89, b'P', b'N', b'G'],
        })
    }
}

#[test]
fn two_character_name_uses_the_largest_tier() {
    let design = CardDesign::new();
    let face = render_card(&design, &law_school());

    assert_eq!(name_font_size("张三", design.name_multiplier()), NAME_SIZE_TIERS[0]);
    assert_eq!(face.bottom.texts[0].font_size, NAME_SIZE_TIERS[0]);
    assert_eq!(face.bottom.texts[0].content, "张三");
}

#[test]
fn centered_element_is_unchanged_by_mirroring() {
    let mut design = CardDesign::new();
    let id = design.add_text("Welcome", Position::new(50.0, 20.0));
    let face = render_card(&design, &law_school());

    let top = face.top.elements.iter().find(|e| e.id == id).unwrap();
    assert_eq!(top.position, Position::new(50.0, 20.0));
}

#[test]
fn off_center_element_is_flipped_in_the_top_half() {
    let mut design = CardDesign::new();
    let id = design.add_line(Position::new(10.0, 30.0));
    let face = render_card(&design, &law_school());

    let top = face.top.elements.iter().find(|e| e.id == id).unwrap();
    let bottom = face.bottom.elements.iter().find(|e| e.id == id).unwrap();
    assert_eq!(top.position, Position::new(90.0, 30.0));
    assert_eq!(bottom.position, Position::new(10.0, 30.0));
}

#[test]
fn failing_second_card_produces_no_archive() {
    let participants = vec![
        Participant::new("一", "甲"),
        Participant::new("二", "乙"),
        Participant::new("三", "丙"),
    ];
    let rasterizer = ScriptedRasterizer {
        fail_on: Some(2),
        calls: RefCell::new(0),
    };
    let options = ArchiveOptions {
        delay: Duration::ZERO,
    };

    let result = export_archive(&CardDesign::new(), &participants, &rasterizer, options);
    assert!(matches!(result, Err(CardError::Raster { ref name, .. }) if name == "二"));
    assert_eq!(*rasterizer.calls.borrow(), 2);
}

#[test]
fn successful_batch_holds_every_card() {
    let participants = vec![law_school(), Participant::new("李四", "医学院")];
    let rasterizer = ScriptedRasterizer {
        fail_on: None,
        calls: RefCell::new(0),
    };
    let options = ArchiveOptions {
        delay: Duration::ZERO,
    };

    let bytes = export_archive(&CardDesign::new(), &participants, &rasterizer, options).unwrap();
    let archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
    assert_eq!(archive.len(), 2);
}

#[test]
fn repeated_exports_are_byte_identical() {
    let mut design = CardDesign::new();
    design.add_text("2025 年会", Position::new(50.0, 10.0));
    design.add_line(Position::new(25.0, 85.0));
    let participants = vec![law_school(), Participant::new("Ada", "Analytical Society")];

    assert_eq!(
        document_markup("年会", &design, &participants),
        document_markup("年会", &design, &participants)
    );
    assert_eq!(print_markup(&design, &participants), print_markup(&design, &participants));
    assert_eq!(
        surface_svg(&render_card(&design, &participants[0])),
        surface_svg(&render_card(&design, &participants[0]))
    );
}

#[test]
fn dragging_on_the_surface_moves_the_marked_element() {
    let mut design = CardDesign::new();
    let id = design.add_text("Guest", Position::new(40.0, 40.0));
    let svg = surface_svg(&render_card(&design, &law_school()));

    // The host reads the target back from the surface markup.
    let marker = format!("data-target=\"element:{id}\"");
    assert!(svg.contains(&marker));
    let target: DragTarget = format!("element:{id}").parse().unwrap();

    let mut engine = DragEngine::new();
    assert!(engine.begin(EditMode::Layout, target, PointerPos::new(320.0, 220.0), &design));
    assert!(engine.update(PointerPos::new(400.0, 330.0), &mut design));
    assert_eq!(engine.end(), Some(target));

    assert_eq!(design.element(id).unwrap().position(), Position::new(50.0, 50.0));
    let face = render_card(&design, &law_school());
    assert_eq!(face.top.elements[0].position, Position::new(50.0, 50.0));
}

#[test]
fn design_edits_show_up_in_every_target() {
    let mut design = CardDesign::new();
    design.set_text_color("#0b3d91");
    let participants = [law_school()];

    let svg = surface_svg(&render_card(&design, &participants[0]));
    let print = print_markup(&design, &participants);
    let doc = document_markup("t", &design, &participants);
    for output in [&svg, &print, &doc] {
        assert!(output.contains("#0b3d91"));
    }
}
