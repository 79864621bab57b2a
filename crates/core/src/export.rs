//! Document export.
//!
//! An [`Exporter`] turns the deck into bytes; [`export_to_dir`] writes them
//! under a filename derived from the deck's subject. Any failure surfaces as
//! [`Error::ExportFailure`] and leaves no partial file behind.

use crate::deck::{Deck, Slide};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Paper size of the exported document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PageSize {
    A4,
    Letter,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Orientation {
    Portrait,
    Landscape,
}

/// Page and image settings handed to the exporter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportOptions {
    pub page_size: PageSize,
    pub orientation: Orientation,

    /// Top, right, bottom, left margins in inches.
    pub margins_in: [f64; 4],

    /// JPEG quality for rasterized slides, in `0..=1`.
    pub image_quality: f64,

    /// Rasterization scale factor.
    pub scale: u32,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            page_size: PageSize::A4,
            orientation: Orientation::Landscape,
            margins_in: [0.5; 4],
            image_quality: 0.98,
            scale: 2,
        }
    }
}

impl ExportOptions {
    /// Reject settings no renderer could honour.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.image_quality) {
            return Err(Error::InvalidConfig(format!(
                "image quality must be in [0, 1], got {}",
                self.image_quality
            )));
        }
        if self.margins_in.iter().any(|m| !m.is_finite() || *m < 0.0) {
            return Err(Error::InvalidConfig("margins must be non-negative".to_string()));
        }
        if self.scale == 0 {
            return Err(Error::InvalidConfig("scale must be at least 1".to_string()));
        }
        Ok(())
    }
}

/// Renders a deck into a downloadable document.
pub trait Exporter {
    /// File extension without the dot, e.g. `txt`.
    fn extension(&self) -> &str;

    /// Produce the document bytes.
    fn render(&self, deck: &Deck, options: &ExportOptions) -> Result<Vec<u8>>;
}

/// Build a filename from the subject matter and year.
///
/// German umlauts are transliterated, other diacritics dropped, and runs of
/// anything that is not an ASCII letter or digit collapse to `_`:
/// `SD WORX Kammerbeiträge Bremen vs Saarland` + 2025 + `pdf` ->
/// `SD_WORX_Kammerbeitraege_Bremen_vs_Saarland_2025.pdf`.
pub fn export_filename(subject: &str, year: u16, extension: &str) -> String {
    let mut folded = String::with_capacity(subject.len());
    for c in subject.chars() {
        match c {
            'ä' => folded.push_str("ae"),
            'ö' => folded.push_str("oe"),
            'ü' => folded.push_str("ue"),
            'Ä' => folded.push_str("Ae"),
            'Ö' => folded.push_str("Oe"),
            'Ü' => folded.push_str("Ue"),
            'ß' => folded.push_str("ss"),
            _ => folded.push(c),
        }
    }

    let mut stem = String::with_capacity(folded.len());
    for c in folded.nfkd().filter(|c| !is_combining_mark(*c)) {
        if c.is_ascii_alphanumeric() {
            stem.push(c);
        } else if !stem.is_empty() && !stem.ends_with('_') {
            stem.push('_');
        }
    }
    let stem = stem.trim_end_matches('_');

    if stem.is_empty() {
        format!("{}.{}", year, extension)
    } else {
        format!("{}_{}.{}", stem, year, extension)
    }
}

/// Plain-text export: one paragraph per slide, slides separated by blank lines.
///
/// # Example output
/// ```text
/// 1 / 5 Kammerbeiträge Bremen vs. Saarland 2025
/// Rechtsvergleichende Systemanalyse für SD WORX
/// [Aufgabenstellung]
/// ...
///
/// 2 / 5 Das Ergebnis auf einen Blick
/// ...
/// ```
#[derive(Debug, Clone)]
pub struct TextExporter {
    /// Prefix slide titles with an `n / total` counter.
    show_counter: bool,
}

impl Default for TextExporter {
    fn default() -> Self {
        Self { show_counter: true }
    }
}

impl TextExporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_counter(mut self, show: bool) -> Self {
        self.show_counter = show;
        self
    }

    /// Format a single slide.
    pub fn format_slide(&self, slide: &Slide, total: usize) -> String {
        let mut lines = Vec::new();
        if self.show_counter {
            lines.push(format!("{} / {} {}", slide.number, total, slide.title));
        } else {
            lines.push(slide.title.clone());
        }
        if !slide.subtitle.trim().is_empty() {
            lines.push(slide.subtitle.clone());
        }
        for block in &slide.blocks {
            if let Some(heading) = &block.heading {
                lines.push(format!("[{}]", heading));
            }
            lines.extend(block.lines.iter().filter(|l| !l.trim().is_empty()).cloned());
        }
        lines.join("\n")
    }

    /// Format the whole deck.
    pub fn format(&self, deck: &Deck) -> String {
        let total = deck.slides.len();
        deck.slides
            .iter()
            .map(|slide| self.format_slide(slide, total))
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// Format the deck, adding a trailing newline.
    pub fn format_with_newline(&self, deck: &Deck) -> String {
        let formatted = self.format(deck);
        if formatted.is_empty() {
            formatted
        } else {
            format!("{}\n", formatted)
        }
    }
}

impl Exporter for TextExporter {
    fn extension(&self) -> &str {
        "txt"
    }

    fn render(&self, deck: &Deck, _options: &ExportOptions) -> Result<Vec<u8>> {
        Ok(self.format_with_newline(deck).into_bytes())
    }
}

/// JSON export of the deck together with its page settings.
#[derive(Debug, Clone)]
pub struct JsonExporter {
    pretty: bool,
}

impl Default for JsonExporter {
    fn default() -> Self {
        Self { pretty: true }
    }
}

#[derive(Serialize)]
struct JsonDocument<'a> {
    options: &'a ExportOptions,
    deck: &'a Deck,
}

impl JsonExporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }
}

impl Exporter for JsonExporter {
    fn extension(&self) -> &str {
        "json"
    }

    fn render(&self, deck: &Deck, options: &ExportOptions) -> Result<Vec<u8>> {
        let document = JsonDocument { options, deck };
        let bytes = if self.pretty {
            serde_json::to_vec_pretty(&document)?
        } else {
            serde_json::to_vec(&document)?
        };
        Ok(bytes)
    }
}

fn export_failure(error: Error) -> Error {
    match error {
        Error::ExportFailure(_) => error,
        other => Error::ExportFailure(other.to_string()),
    }
}

/// Render `deck` and write it into `dir`. Returns the written path.
///
/// The document is written to a hidden sibling file first and renamed into
/// place, so a failed export never leaves a partial file.
pub fn export_to_dir(
    exporter: &dyn Exporter,
    deck: &Deck,
    options: &ExportOptions,
    dir: &Path,
) -> Result<PathBuf> {
    options.validate().map_err(export_failure)?;
    let bytes = exporter.render(deck, options).map_err(export_failure)?;

    std::fs::create_dir_all(dir).map_err(|e| {
        Error::ExportFailure(format!(
            "Failed to create output directory {}: {}",
            dir.display(),
            e
        ))
    })?;

    let filename = export_filename(&deck.subject, deck.year, exporter.extension());
    let path = dir.join(&filename);
    let partial = dir.join(format!(".{}.part", filename));

    if let Err(e) = write_output(&partial, &bytes).and_then(|_| std::fs::rename(&partial, &path)) {
        let _ = std::fs::remove_file(&partial);
        return Err(Error::ExportFailure(format!(
            "Failed to write {}: {}",
            path.display(),
            e
        )));
    }

    log::info!("Exported {} bytes to {}", bytes.len(), path.display());
    Ok(path)
}

fn write_output(path: &Path, content: &[u8]) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(content)?;
    file.sync_all()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ContributionConfig;

    struct FailingExporter;

    impl Exporter for FailingExporter {
        fn extension(&self) -> &str {
            "pdf"
        }

        fn render(&self, _deck: &Deck, _options: &ExportOptions) -> Result<Vec<u8>> {
            Err(Error::Io(std::io::Error::new(
                std::io::ErrorKind::Other,
                "renderer crashed",
            )))
        }
    }

    fn deck() -> Deck {
        Deck::build(&ContributionConfig::default())
    }

    #[test]
    fn test_export_filename() {
        assert_eq!(
            export_filename("SD WORX Kammerbeiträge Bremen vs Saarland", 2025, "pdf"),
            "SD_WORX_Kammerbeitraege_Bremen_vs_Saarland_2025.pdf"
        );
    }

    #[test]
    fn test_export_filename_strips_punctuation_and_diacritics() {
        assert_eq!(
            export_filename("  Größe & Café -- Übersicht! ", 2024, "txt"),
            "Groesse_Cafe_Uebersicht_2024.txt"
        );
        assert_eq!(export_filename("!!!", 2025, "json"), "2025.json");
    }

    #[test]
    fn test_default_options() {
        let options = ExportOptions::default();
        assert_eq!(options.page_size, PageSize::A4);
        assert_eq!(options.orientation, Orientation::Landscape);
        assert_eq!(options.margins_in, [0.5; 4]);
        assert_eq!(options.image_quality, 0.98);
        assert!(options.validate().is_ok());
    }

    #[test]
    fn test_invalid_options() {
        let options = ExportOptions {
            image_quality: 1.5,
            ..ExportOptions::default()
        };
        assert!(options.validate().is_err());

        let options = ExportOptions {
            margins_in: [0.5, -1.0, 0.5, 0.5],
            ..ExportOptions::default()
        };
        assert!(options.validate().is_err());
    }

    #[test]
    fn test_text_format_separates_slides() {
        let text = TextExporter::new().format(&deck());
        let slides: Vec<&str> = text.split("\n\n").collect();
        assert_eq!(slides.len(), 5);
        assert!(slides[0].starts_with("1 / 5 Kammerbeiträge Bremen vs. Saarland 2025"));
        assert!(slides[2].contains("[Saarland-Pfad]"));
        assert!(slides[2].contains("Ergebnis: €12,08"));
    }

    #[test]
    fn test_text_format_without_counter() {
        let deck = deck();
        let text = TextExporter::new().with_counter(false).format_slide(&deck.slides[1], 5);
        assert!(text.starts_with("Das Ergebnis auf einen Blick\n"));
    }

    #[test]
    fn test_text_format_trailing_newline() {
        let text = TextExporter::new().format_with_newline(&deck());
        assert!(text.ends_with('\n'));
        assert!(!text.ends_with("\n\n"));
    }

    #[test]
    fn test_json_export_contains_options() {
        let bytes = JsonExporter::new()
            .with_pretty(false)
            .render(&deck(), &ExportOptions::default())
            .unwrap();
        let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(value["options"]["page_size"], "A4");
        assert_eq!(value["deck"]["slides"].as_array().map(Vec::len), Some(5));
    }

    #[test]
    fn test_export_to_dir_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = export_to_dir(&TextExporter::new(), &deck(), &ExportOptions::default(), dir.path()).unwrap();

        assert_eq!(
            path.file_name().and_then(|n| n.to_str()),
            Some("SD_WORX_Kammerbeitraege_Bremen_vs_Saarland_2025.txt")
        );
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("Systemunterschiede & Fazit"));

        let entries = std::fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(entries, 1);
    }

    #[test]
    fn test_export_failure_leaves_no_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = export_to_dir(&FailingExporter, &deck(), &ExportOptions::default(), dir.path());

        match result {
            Err(Error::ExportFailure(message)) => assert!(message.contains("renderer crashed")),
            other => panic!("expected export failure, got {:?}", other),
        }
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_export_rejects_invalid_options() {
        let dir = tempfile::tempdir().unwrap();
        let options = ExportOptions {
            scale: 0,
            ..ExportOptions::default()
        };
        let result = export_to_dir(&TextExporter::new(), &deck(), &options, dir.path());
        assert!(matches!(result, Err(Error::ExportFailure(_))));
    }
}
