use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::foundation::error::{CardError, CardResult};

/// Coverage mask for one rasterized line of text.
///
/// `coverage` is row-major, one byte per pixel (0 = empty, 255 = fully covered). The pen
/// origin of the line sits at column `origin_x` and row `baseline` inside the mask.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GlyphMask {
    /// Mask width in pixels.
    pub width: u32,
    /// Mask height in pixels.
    pub height: u32,
    /// Per-pixel coverage.
    pub coverage: Vec<u8>,
    /// Column of the pen origin.
    pub origin_x: i32,
    /// Row of the text baseline.
    pub baseline: i32,
}

impl GlyphMask {
    /// A mask that draws nothing.
    pub fn empty() -> Self {
        Self {
            width: 0,
            height: 0,
            coverage: Vec::new(),
            origin_x: 0,
            baseline: 0,
        }
    }

    /// Coverage at `(x, y)`; zero outside the mask.
    pub fn coverage_at(&self, x: u32, y: u32) -> u8 {
        if x >= self.width || y >= self.height {
            return 0;
        }
        self.coverage[(y as usize) * (self.width as usize) + (x as usize)]
    }

    /// True when no pixel has any coverage.
    pub fn is_blank(&self) -> bool {
        self.coverage.iter().all(|&c| c == 0)
    }
}

/// Font provider seam: turns a line of text into a coverage mask at a pixel size.
///
/// Glyph advances and vertical metrics are entirely up to the implementation; the layout math
/// only decides where each line's pen origin goes.
pub trait GlyphRasterizer {
    /// Rasterize `text` as a single unbroken line at `size_px`.
    fn rasterize_line(&mut self, text: &str, size_px: u32) -> CardResult<GlyphMask>;
}

/// Raw font file bytes plus the path they were loaded from.
#[derive(Clone)]
pub struct FontFace {
    path: PathBuf,
    bytes: Arc<Vec<u8>>,
}

impl std::fmt::Debug for FontFace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontFace")
            .field("path", &self.path)
            .field("bytes_len", &self.bytes.len())
            .finish()
    }
}

impl FontFace {
    /// Read a TTF/OTF/TTC file. IO failures become [`CardError::FontLoad`].
    pub fn load(path: impl AsRef<Path>) -> CardResult<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)
            .map_err(|e| CardError::font_load(path, format!("read font bytes: {e}")))?;
        Self::from_bytes(path, bytes)
    }

    /// Wrap in-memory font bytes; `path` is only used in error messages.
    pub fn from_bytes(path: impl Into<PathBuf>, bytes: Vec<u8>) -> CardResult<Self> {
        let path = path.into();
        if bytes.is_empty() {
            return Err(CardError::font_load(path, "font file is empty"));
        }
        Ok(Self {
            path,
            bytes: Arc::new(bytes),
        })
    }

    /// Path the face was loaded from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Raw font bytes.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

/// Default [`GlyphRasterizer`]: `parley` shaping plus `vello_cpu` glyph filling.
pub struct ParleyRasterizer {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<()>,
    family_name: String,
    font: vello_cpu::peniko::FontData,
}

impl std::fmt::Debug for ParleyRasterizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParleyRasterizer")
            .field("family_name", &self.family_name)
            .finish_non_exhaustive()
    }
}

impl ParleyRasterizer {
    /// Register `face` with a fresh font context.
    ///
    /// Fails with [`CardError::FontLoad`] when the bytes contain no usable font family.
    pub fn new(face: &FontFace) -> CardResult<Self> {
        let mut font_ctx = parley::FontContext::default();
        let families = font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(face.bytes().to_vec()), None);
        let family_id = families
            .first()
            .map(|(id, _)| *id)
            .ok_or_else(|| CardError::font_load(face.path(), "no font families in font data"))?;
        let family_name = font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| CardError::font_load(face.path(), "registered font family has no name"))?
            .to_string();

        let font = vello_cpu::peniko::FontData::new(
            vello_cpu::peniko::Blob::from(face.bytes().to_vec()),
            0,
        );

        tracing::debug!(family = %family_name, path = %face.path().display(), "font registered");
        Ok(Self {
            font_ctx,
            layout_ctx: parley::LayoutContext::new(),
            family_name,
            font,
        })
    }

    /// Family name resolved from the font data.
    pub fn family_name(&self) -> &str {
        &self.family_name
    }

    fn layout_line(&mut self, text: &str, size_px: f32) -> parley::Layout<()> {
        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(self.family_name.clone())),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));

        let mut layout: parley::Layout<()> = builder.build(text);
        layout.break_all_lines(None);
        layout
    }
}

impl GlyphRasterizer for ParleyRasterizer {
    fn rasterize_line(&mut self, text: &str, size_px: u32) -> CardResult<GlyphMask> {
        if size_px == 0 {
            return Err(CardError::validation("font size must be > 0"));
        }
        if text.trim().is_empty() {
            return Ok(GlyphMask::empty());
        }

        let size = size_px as f32;
        let layout = self.layout_line(text, size);
        let baseline = layout
            .lines()
            .next()
            .map(|line| line.metrics().baseline)
            .unwrap_or(size);

        // Room for glyph overhang past the advance box.
        let pad = (size / 4.0).ceil() + 1.0;
        let width = mask_dim(layout.width() + 2.0 * pad)?;
        let height = mask_dim(layout.height() + 2.0 * pad)?;

        let mut ctx = vello_cpu::RenderContext::new(width, height);
        ctx.set_transform(vello_cpu::kurbo::Affine::translate((
            f64::from(pad),
            f64::from(pad),
        )));
        ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(255, 255, 255, 255));
        for line in layout.lines() {
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };
                let glyphs = run.positioned_glyphs().map(|g| vello_cpu::Glyph {
                    id: g.id,
                    x: g.x,
                    y: g.y,
                });
                ctx.glyph_run(&self.font)
                    .font_size(run.run().font_size())
                    .fill_glyphs(glyphs);
            }
        }
        ctx.flush();

        let mut pixmap = vello_cpu::Pixmap::new(width, height);
        ctx.render_to_pixmap(&mut pixmap);
        let coverage = pixmap
            .data_as_u8_slice()
            .chunks_exact(4)
            .map(|px| px[3])
            .collect();

        Ok(GlyphMask {
            width: u32::from(width),
            height: u32::from(height),
            coverage,
            origin_x: pad as i32,
            baseline: (pad + baseline).round() as i32,
        })
    }
}

fn mask_dim(v: f32) -> CardResult<u16> {
    let px = v.ceil().max(1.0);
    if !px.is_finite() || px > f32::from(u16::MAX) {
        return Err(CardError::validation(format!(
            "text line too large to rasterize ({px} px)"
        )));
    }
    Ok(px as u16)
}

#[cfg(test)]
#[path = "../../tests/unit/assets/font.rs"]
mod tests;
