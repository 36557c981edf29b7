//! Writing figure images and the per-document JSON file.
//!
//! Layout: `{output_root}/{paper_id}/{paper_id}.json` with images named
//! `{paper_id}_p{page}_{label}.png` beside it.

use std::collections::HashSet;
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use image::codecs::png::PngEncoder;
use image::{ImageEncoder, RgbaImage};
use tracing::debug;

use crate::error::{ProcessingError, ProcessingResult};

use super::labels::sanitize_for_filename;
use super::records::FigureDocument;

/// Output folder of one document
pub struct FigureWriter {
    dir: PathBuf,
    paper_id: String,
    used_names: HashSet<String>,
}

impl FigureWriter {
    /// Create (or reuse) the document's output folder.
    pub fn create(output_root: &Path, paper_id: &str) -> ProcessingResult<Self> {
        let dir = output_root.join(paper_id);
        fs::create_dir_all(&dir).map_err(ProcessingError::Io)?;
        Ok(Self {
            dir,
            paper_id: paper_id.to_string(),
            used_names: HashSet::new(),
        })
    }

    /// Pick a filename for a figure and reserve it.
    ///
    /// A label already used on the same page gets the candidate index
    /// appended instead of overwriting the earlier image.
    pub fn image_name(&mut self, page: usize, label: &str, index: usize) -> String {
        let tail = sanitize_for_filename(label);
        let mut name = format!("{}_p{}_{}.png", self.paper_id, page, tail);
        if self.used_names.contains(&name) {
            name = format!("{}_p{}_{}_{}.png", self.paper_id, page, tail, index);
        }
        self.used_names.insert(name.clone());
        name
    }

    /// Encode `image` as PNG under `name`; returns the written path.
    pub fn save_png(&self, image: &RgbaImage, name: &str) -> ProcessingResult<PathBuf> {
        let path = self.dir.join(name);
        let file = File::create(&path).map_err(ProcessingError::Io)?;

        let encoder = PngEncoder::new(BufWriter::new(file));
        encoder
            .write_image(
                image.as_raw(),
                image.width(),
                image.height(),
                image::ExtendedColorType::Rgba8,
            )
            .map_err(|e| ProcessingError::ImageEncode {
                path: path.display().to_string(),
                source: e,
            })?;

        debug!(
            path = %path.display(),
            width = image.width(),
            height = image.height(),
            "Saved figure image"
        );

        Ok(path)
    }

    /// Write the document's records as pretty JSON.
    pub fn write_document(&self, document: &FigureDocument) -> ProcessingResult<PathBuf> {
        let path = self.dir.join(format!("{}.json", self.paper_id));
        let json = serde_json::to_string_pretty(document).map_err(ProcessingError::Serialization)?;
        fs::write(&path, json).map_err(ProcessingError::Io)?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;
    use tempfile::TempDir;

    #[test]
    fn test_image_names_and_collisions() {
        let temp = TempDir::new().unwrap();
        let mut writer = FigureWriter::create(temp.path(), "paper").unwrap();
        assert!(temp.path().join("paper").is_dir());

        assert_eq!(writer.image_name(2, "FIGURE 1", 1), "paper_p2_FIGURE 1.png");
        assert_eq!(writer.image_name(2, "FIGURE 1", 3), "paper_p2_FIGURE 1_3.png");
        assert_eq!(writer.image_name(3, "FIGURE 1", 1), "paper_p3_FIGURE 1.png");
        assert_eq!(writer.image_name(1, "FIG 1/2", 1), "paper_p1_FIG 1_2.png");
    }

    #[test]
    fn test_save_png_and_document() {
        let temp = TempDir::new().unwrap();
        let writer = FigureWriter::create(temp.path(), "paper").unwrap();

        let image = RgbaImage::from_pixel(20, 10, Rgba([10, 20, 30, 255]));
        let path = writer.save_png(&image, "paper_p1_FIGURE 1.png").unwrap();
        let reloaded = image::open(&path).unwrap().to_rgba8();
        assert_eq!(reloaded.dimensions(), (20, 10));
        assert_eq!(reloaded.get_pixel(5, 5), &Rgba([10, 20, 30, 255]));

        let document = FigureDocument {
            paper_id: "paper".to_string(),
            source_sha256: None,
            figures: Vec::new(),
        };
        let json_path = writer.write_document(&document).unwrap();
        assert_eq!(json_path, temp.path().join("paper").join("paper.json"));
        let written: FigureDocument =
            serde_json::from_str(&fs::read_to_string(&json_path).unwrap()).unwrap();
        assert_eq!(written, document);
    }
}
