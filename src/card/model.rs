use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::foundation::core::{CanvasSize, Rgba8};
use crate::foundation::error::{CardError, CardResult};
use crate::foundation::math::Fnv1a64;
use crate::render::encode::OutputFormat;

/// JSON-facing card options, keyed the way template files spell them.
///
/// Paths are kept as written; [`CardOptions::resolve`] turns them into a [`RenderOptions`]
/// against an asset root.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CardOptions {
    /// Label text.
    #[serde(default)]
    pub label: String,
    /// Label color (`#RRGGBB`, `#RRGGBBAA`, `{r,g,b[,a]}` or `[r,g,b[,a]]`).
    #[serde(default = "default_label_color")]
    pub label_color: Rgba8,
    /// Optional background image; an empty string counts as absent.
    #[serde(default)]
    pub background_image: Option<String>,
    /// Logo images, drawn left to right.
    #[serde(default)]
    pub logos: Vec<String>,
    /// TTF/OTF font used for the label.
    pub font_path: String,
    /// Label size in pixels.
    pub font_size: u32,
    /// Output file, or an existing directory to write a generated file name into.
    pub save_path: String,
    /// Canvas size; defaults to 1000x1000.
    #[serde(default)]
    pub canvas: CanvasSize,
}

fn default_label_color() -> Rgba8 {
    Rgba8::opaque(255, 255, 255)
}

/// Fully resolved render inputs. The pipeline reads these and never mutates them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderOptions {
    /// Label text.
    pub label: String,
    /// Label color.
    pub label_color: Rgba8,
    /// Background image, if any.
    pub background: Option<PathBuf>,
    /// Logo images in strip order.
    pub logos: Vec<PathBuf>,
    /// Font file.
    pub font_path: PathBuf,
    /// Label size in pixels.
    pub font_size: u32,
    /// Output file; its extension selects the encoder.
    pub output: PathBuf,
    /// Canvas size.
    pub canvas: CanvasSize,
}

impl CardOptions {
    /// Parse options from a JSON reader.
    pub fn from_reader<R: std::io::Read>(r: R) -> CardResult<Self> {
        serde_json::from_reader(r)
            .map_err(|e| CardError::validation(format!("parse card options JSON: {e}")))
    }

    /// Parse options from a JSON string.
    pub fn from_json_str(s: &str) -> CardResult<Self> {
        serde_json::from_str(s)
            .map_err(|e| CardError::validation(format!("parse card options JSON: {e}")))
    }

    /// Parse options from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> CardResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            CardError::validation(format!("open card options '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Check value ranges that the JSON schema cannot express.
    pub fn validate(&self) -> CardResult<()> {
        if self.font_size == 0 {
            return Err(CardError::validation("font_size must be > 0"));
        }
        CanvasSize::new(self.canvas.width, self.canvas.height)?;
        if self.font_path.trim().is_empty() {
            return Err(CardError::validation("font_path must be non-empty"));
        }
        if self.save_path.trim().is_empty() {
            return Err(CardError::validation("save_path must be non-empty"));
        }
        if let Some(i) = self.logos.iter().position(|l| l.trim().is_empty()) {
            return Err(CardError::validation(format!("logos[{i}] must be non-empty")));
        }
        Ok(())
    }

    /// Validate and resolve relative paths against `root`.
    ///
    /// When `save_path` names an existing directory, or ends with a path separator, the output
    /// becomes `<dir>/card-<hash>.png`, where the hash is derived from the options so identical
    /// inputs map to the same file. A missing directory is created when the card is written.
    pub fn resolve(&self, root: impl AsRef<Path>) -> CardResult<RenderOptions> {
        self.validate()?;
        let root = root.as_ref();

        let background = self
            .background_image
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| root.join(s));
        let logos = self.logos.iter().map(|l| root.join(l.trim())).collect();

        let save_path = self.save_path.trim();
        let mut output = root.join(save_path);
        if ends_with_separator(save_path) || output.is_dir() {
            output = output.join(format!(
                "card-{:016x}.{}",
                self.fingerprint(),
                OutputFormat::Png.extension()
            ));
        }

        Ok(RenderOptions {
            label: self.label.clone(),
            label_color: self.label_color,
            background,
            logos,
            font_path: root.join(self.font_path.trim()),
            font_size: self.font_size,
            output,
            canvas: self.canvas,
        })
    }

    fn fingerprint(&self) -> u64 {
        let mut h = Fnv1a64::new_default();
        h.write_str(&self.label);
        h.write_bytes(&[
            self.label_color.r,
            self.label_color.g,
            self.label_color.b,
            self.label_color.a,
        ]);
        h.write_str(self.background_image.as_deref().unwrap_or(""));
        h.write_u32(self.logos.len() as u32);
        for logo in &self.logos {
            h.write_str(logo);
        }
        h.write_str(&self.font_path);
        h.write_u32(self.font_size);
        h.write_u32(self.canvas.width);
        h.write_u32(self.canvas.height);
        h.finish()
    }
}

fn ends_with_separator(path: &str) -> bool {
    path.ends_with('/') || path.ends_with(std::path::MAIN_SEPARATOR)
}

#[cfg(test)]
#[path = "../../tests/unit/card/model.rs"]
mod tests;
