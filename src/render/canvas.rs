use crate::assets::font::GlyphMask;
use crate::assets::source::SourceImage;
use crate::foundation::core::{CanvasSize, Rgba8, Rgba8Premul};
use crate::foundation::error::CardResult;
use crate::render::composite::over;
use crate::render::encode::{OutputFormat, encode_premul_rgba8, premul_to_straight_rgba8};

/// Mutable premultiplied RGBA8 render target of a fixed size.
///
/// Every drawing operation clips to the canvas bounds; pixels that land outside are dropped
/// without error.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Canvas {
    size: CanvasSize,
    data: Vec<u8>,
}

impl Canvas {
    /// Allocate a fully transparent canvas.
    pub fn new(width: u32, height: u32) -> CardResult<Self> {
        let size = CanvasSize::new(width, height)?;
        Ok(Self::with_size(size))
    }

    /// Allocate a fully transparent canvas of `size`.
    pub fn with_size(size: CanvasSize) -> Self {
        let len = (size.width as usize) * (size.height as usize) * 4;
        Self {
            size,
            data: vec![0; len],
        }
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.size.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.size.height
    }

    /// Canvas dimensions.
    pub fn size(&self) -> CanvasSize {
        self.size
    }

    /// Premultiplied pixel at `(x, y)`, or `None` outside the canvas.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba8Premul> {
        let i = self.index(i64::from(x), i64::from(y))?;
        let px = &self.data[i..i + 4];
        Some(Rgba8Premul {
            r: px[0],
            g: px[1],
            b: px[2],
            a: px[3],
        })
    }

    /// Row-major premultiplied RGBA8 bytes.
    pub fn as_premul_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Straight-alpha copy of the pixels, as written to PNG.
    pub fn to_rgba8(&self) -> Vec<u8> {
        premul_to_straight_rgba8(&self.data)
    }

    /// Blend `source` over the canvas with its top-left corner at `(origin_x, origin_y)`.
    pub fn composite_over(&mut self, source: &SourceImage, origin_x: i64, origin_y: i64) {
        let Some((cols, rows)) = self.clip(origin_x, origin_y, source.width(), source.height())
        else {
            return;
        };

        let src = source.as_premul_bytes();
        let src_stride = source.width() as usize * 4;
        for sy in rows {
            let dst_x = origin_x + i64::from(cols.start);
            let dst_y = origin_y + i64::from(sy);
            let Some(row_start) = self.index(dst_x, dst_y) else {
                continue;
            };
            let src_row = (sy as usize) * src_stride;
            let span = (cols.end - cols.start) as usize * 4;
            let src_px = &src[src_row + cols.start as usize * 4..][..span];
            let dst_px = &mut self.data[row_start..row_start + span];
            for (d, s) in dst_px.chunks_exact_mut(4).zip(src_px.chunks_exact(4)) {
                let out = over([d[0], d[1], d[2], d[3]], [s[0], s[1], s[2], s[3]], 255);
                d.copy_from_slice(&out);
            }
        }
    }

    /// Paint `color` through a coverage mask whose top-left corner is at `(origin_x, origin_y)`.
    pub fn draw_glyph_mask(
        &mut self,
        mask: &GlyphMask,
        origin_x: i64,
        origin_y: i64,
        color: Rgba8,
    ) {
        let Some((cols, rows)) = self.clip(origin_x, origin_y, mask.width, mask.height) else {
            return;
        };

        let src = color.to_premul().to_array();
        for my in rows {
            for mx in cols.clone() {
                let coverage = mask.coverage_at(mx, my);
                if coverage == 0 {
                    continue;
                }
                let Some(i) = self.index(origin_x + i64::from(mx), origin_y + i64::from(my)) else {
                    continue;
                };
                let d = &mut self.data[i..i + 4];
                let out = over([d[0], d[1], d[2], d[3]], src, coverage);
                d.copy_from_slice(&out);
            }
        }
    }

    /// Encode the canvas as `format`.
    pub fn encode(&self, format: OutputFormat) -> CardResult<Vec<u8>> {
        encode_premul_rgba8(&self.data, self.size.width, self.size.height, format)
    }

    fn index(&self, x: i64, y: i64) -> Option<usize> {
        if x < 0 || y < 0 || x >= i64::from(self.size.width) || y >= i64::from(self.size.height) {
            return None;
        }
        Some(((y as usize) * (self.size.width as usize) + (x as usize)) * 4)
    }

    /// Source-space column and row ranges of a `w x h` block at the origin that land on the
    /// canvas, or `None` when nothing overlaps.
    fn clip(
        &self,
        origin_x: i64,
        origin_y: i64,
        w: u32,
        h: u32,
    ) -> Option<(std::ops::Range<u32>, std::ops::Range<u32>)> {
        fn axis(origin: i64, len: u32, limit: u32) -> Option<std::ops::Range<u32>> {
            let start = (-origin).clamp(0, i64::from(len));
            let end = (i64::from(limit) - origin).clamp(0, i64::from(len));
            (start < end).then(|| start as u32..end as u32)
        }

        Some((
            axis(origin_x, w, self.size.width)?,
            axis(origin_y, h, self.size.height)?,
        ))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/canvas.rs"]
mod tests;
