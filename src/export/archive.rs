//! Batch export: one bitmap per participant, bundled into a single zip.
//!
//! Cards are rasterized strictly one after another with a fixed pause in
//! between so a long batch never monopolizes the render thread. The batch is
//! all-or-nothing: the first failing card aborts it and no archive is
//! produced.

use std::collections::HashSet;
use std::io::{Cursor, Write};
use std::thread;
use std::time::Duration;

use log::{debug, info, warn};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::design::{CardDesign, Participant};
use crate::error::CardError;
use crate::export::raster::CardRasterizer;
use crate::export::{sanitize_file_stem, topic_file_name};

/// Pause between two captures.
pub const DEFAULT_CAPTURE_DELAY: Duration = Duration::from_millis(150);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArchiveOptions {
    pub delay: Duration,
}

impl Default for ArchiveOptions {
    fn default() -> Self {
        Self {
            delay: DEFAULT_CAPTURE_DELAY,
        }
    }
}

/// `<topic>-export.zip`
pub fn archive_file_name(topic: &str) -> String {
    topic_file_name(topic, "-export.zip")
}

/// Rasterize every participant in order and return the zip bytes.
pub fn export_archive(
    design: &CardDesign,
    participants: &[Participant],
    rasterizer: &dyn CardRasterizer,
    options: ArchiveOptions,
) -> Result<Vec<u8>, CardError> {
    info!(cards = participants.len(); "Starting image batch export");

    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let mut names = EntryNames::default();

    for (index, participant) in participants.iter().enumerate() {
        if index > 0 && !options.delay.is_zero() {
            thread::sleep(options.delay);
        }

        let image = rasterizer.rasterize(design, participant).inspect_err(|err| {
            warn!(index, err:% = err; "Card rasterization failed, aborting batch");
        })?;

        let entry = names.next(participant, index);
        debug!(entry = entry.as_str(), bytes = image.png.len(); "Adding card to archive");
        // PNG data is already compressed.
        writer.start_file(entry, SimpleFileOptions::default().compression_method(CompressionMethod::Stored))?;
        writer.write_all(&image.png)?;
    }

    let bytes = writer.finish()?.into_inner();
    info!(bytes = bytes.len(); "Image batch export finished");
    Ok(bytes)
}

/// Unique `.png` entry names derived from display names.
#[derive(Debug, Default)]
struct EntryNames {
    used: HashSet<String>,
}

impl EntryNames {
    fn next(&mut self, participant: &Participant, index: usize) -> String {
        let stem = match sanitize_file_stem(participant.display_name()) {
            stem if stem.is_empty() => format!("card-{}", index + 1),
            stem => stem,
        };

        let mut candidate = format!("{}.png", stem);
        let mut suffix = 2;
        while self.used.contains(&candidate) {
            candidate = format!("{}-{}.png", stem, suffix);
            suffix += 1;
        }
        self.used.insert(candidate.clone());
        candidate
    }
}
