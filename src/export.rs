//! Render targets for a design and a participant list.
//!
//! - [`surface`]: the interactive SVG surface, also the raster source
//! - [`print`]: paginated print markup and a PDF print sheet
//! - [`document`]: the static `.doc` markup export
//! - [`raster`] and [`archive`]: per-card images bundled into one zip
//!
//! The exporters share no mutable state and each borrows the design for
//! the whole run, so a design cannot change under an export in flight.

pub mod archive;
pub mod document;
mod markup;
pub mod print;
pub mod raster;
pub mod surface;

pub use archive::{archive_file_name, export_archive, ArchiveOptions};
pub use document::{document_file_name, document_markup};
pub use print::{print_file_name, print_markup, print_pdf, print_pdf_file_name};
pub use raster::{CardRasterizer, RasterImage, RasterOptions, SvgRasterizer};
pub use surface::surface_svg;

/// Make `name` safe as a file name stem. Letters of any script, digits,
/// `-` and `_` survive; whitespace runs become a single `-`.
pub fn sanitize_file_stem(name: &str) -> String {
    let mut stem = String::with_capacity(name.len());
    for c in name.trim().chars() {
        if c.is_alphanumeric() || c == '-' || c == '_' {
            stem.push(c);
        } else if c.is_whitespace() && !stem.ends_with('-') {
            stem.push('-');
        }
    }
    stem.trim_matches('-').to_string()
}

/// `<topic><suffix>`, falling back to `name-cards<suffix>` when the topic
/// has no usable characters.
pub fn topic_file_name(topic: &str, suffix: &str) -> String {
    match sanitize_file_stem(topic) {
        stem if stem.is_empty() => format!("name-cards{}", suffix),
        stem => format!("{}{}", stem, suffix),
    }
}

/// Stable, compact number formatting for emitted markup.
pub(crate) fn fmt_num(value: f32) -> String {
    let text = format!("{:.2}", value);
    let text = text.trim_end_matches('0').trim_end_matches('.');
    if text == "-0" {
        "0".to_string()
    } else {
        text.to_string()
    }
}

/// Escape text and attribute values for XML and HTML output.
pub(crate) fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
