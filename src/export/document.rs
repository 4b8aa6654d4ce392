//! Static `.doc` export.
//!
//! Word opens HTML saved with a `.doc` extension but ignores CSS transforms.
//! The top half therefore uses the legacy `BasicImage` rotation filter on
//! its container. The filter only turns the container visually, so the
//! children keep the coordinates already mirrored by the renderer. Do not
//! route this target through the print rotation: the children would end up
//! mirrored twice.

use log::{debug, info};

use crate::design::{Background, CardDesign, Participant};
use crate::export::markup::{
    background_css, fitted_logo_box, logo_dimensions, write_card, CardMarkup,
};
use crate::export::{escape_xml, topic_file_name};
use crate::image_data::decode_image;
use crate::render::{render_card, HalfView};

const LEGACY_ROTATION: &str =
    "filter:progid:DXImageTransform.Microsoft.BasicImage(rotation=2);mso-rotate:180;";

const DOCUMENT_CSS: &str = "@page WordSection1{size:210mm 297mm;margin:0}\
div.WordSection1{page:WordSection1}\
.card-page{position:relative;width:800px;height:1100px;margin:0;page-break-after:always}";

/// `<topic>.doc`
pub fn document_file_name(topic: &str) -> String {
    topic_file_name(topic, ".doc")
}

/// One Word-compatible document holding every participant's card.
///
/// A logo or background image that cannot be decoded is left out; the rest
/// of the document is still produced. The output depends only on the
/// arguments.
pub fn document_markup(topic: &str, design: &CardDesign, participants: &[Participant]) -> String {
    info!(topic, cards = participants.len(); "Building document export");

    let logo_dimensions = logo_dimensions(design);
    let background = match &design.background {
        Background::Image { src } => decode_image(src)
            .inspect_err(|err| debug!(err:% = err; "Leaving undecodable background out of the document"))
            .ok()
            .map(|_| background_css(&design.background)),
        other => Some(background_css(other)),
    };
    let font_css = format!("'{}'", design.font_family.document_font());

    let mut out = String::new();
    out.push_str(
        "<html xmlns:o=\"urn:schemas-microsoft-com:office:office\" \
         xmlns:w=\"urn:schemas-microsoft-com:office:word\" \
         xmlns=\"http://www.w3.org/TR/REC-html40\">\n",
    );
    out.push_str("<head><meta charset=\"utf-8\"><title>");
    out.push_str(&escape_xml(topic));
    out.push_str("</title>");
    out.push_str(
        "<!--[if gte mso 9]><xml><w:WordDocument><w:View>Print</w:View>\
         <w:Zoom>100</w:Zoom></w:WordDocument></xml><![endif]-->",
    );
    out.push_str("<style>");
    out.push_str(DOCUMENT_CSS);
    out.push_str("</style></head>\n<body><div class=\"WordSection1\">\n");

    for participant in participants {
        let face = render_card(design, participant);
        let logo_box = |half: &HalfView| {
            logo_dimensions.and_then(|dimensions| fitted_logo_box(half, dimensions))
        };
        let card = CardMarkup {
            font_css: &font_css,
            rotation_css: LEGACY_ROTATION,
            background_css: background.clone(),
            logos: [logo_box(&face.top), logo_box(&face.bottom)],
        };

        out.push_str("<div class=\"card-page\">");
        write_card(&mut out, &face, &card);
        out.push_str("</div>\n");
    }

    out.push_str("</div></body></html>\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::design::{FontFamily, Position};
    use crate::image_data::tests::png_data_url;

    fn roster() -> Vec<Participant> {
        vec![
            Participant::new("张三", "法学院"),
            Participant::new("李四", "医学院"),
        ]
    }

    #[test]
    fn top_half_uses_the_legacy_filter_once_per_card() {
        let doc = document_markup("Law Forum", &CardDesign::new(), &roster());
        assert_eq!(doc.matches("BasicImage(rotation=2)").count(), 2);
        assert_eq!(doc.matches("class=\"card-page\"").count(), 2);
        assert!(!doc.contains("transform:"));
        assert!(!doc.contains("rotate("));
    }

    #[test]
    fn fonts_are_mapped_to_document_fonts() {
        let mut design = CardDesign::new();
        design.set_font_family(FontFamily::Kai);
        let doc = document_markup("t", &design, &roster());
        assert!(doc.contains("font-family:&#39;KaiTi&#39;"));
        assert!(!doc.contains("STKaiti"));
    }

    #[test]
    fn coordinates_arrive_pre_mirrored() {
        let mut design = CardDesign::new();
        design.add_line(Position::new(10.0, 30.0));
        let doc = document_markup("t", &design, &roster()[..1]);
        // Bottom half at 80px, mirrored top half at 720px; 200px long.
        assert!(doc.contains("left:-20px;top:164px;width:200px"));
        assert!(doc.contains("left:620px;top:164px;width:200px"));
    }

    #[test]
    fn undecodable_logo_is_silently_omitted() {
        let mut design = CardDesign::new();
        design.set_logo_image(Some("data:image/png;base64,aGVsbG8=".to_string()));
        let doc = document_markup("t", &design, &roster());
        assert!(!doc.contains("class=\"logo\""));
        assert_eq!(doc.matches("class=\"card-page\"").count(), 2);
    }

    #[test]
    fn valid_logo_is_embedded_in_one_half() {
        let mut design = CardDesign::new();
        design.set_logo_image(Some(png_data_url()));
        let doc = document_markup("t", &design, &roster()[..1]);
        assert_eq!(doc.matches("class=\"logo\"").count(), 1);
    }

    #[test]
    fn undecodable_background_image_is_omitted() {
        let mut design = CardDesign::new();
        design.set_background_image("data:image/png;base64,aGVsbG8=");
        let doc = document_markup("t", &design, &roster());
        assert!(!doc.contains("background-image"));
    }

    #[test]
    fn output_is_deterministic() {
        let mut design = CardDesign::new();
        design.add_text("Welcome", Position::new(50.0, 10.0));
        design.set_logo_image(Some(png_data_url()));
        assert_eq!(
            document_markup("t", &design, &roster()),
            document_markup("t", &design, &roster())
        );
    }

    #[test]
    fn file_name_uses_the_topic() {
        assert_eq!(document_file_name("年会 2025"), "年会-2025.doc");
        assert_eq!(document_file_name("   "), "name-cards.doc");
    }
}
