use std::path::Path;

use anyhow::Context;

use crate::assets::source::SourceImage;
use crate::foundation::error::{AssetStage, CardError, CardResult};

/// Largest raster edge produced when rasterizing an SVG asset.
const MAX_SVG_DIM: u32 = 16_384;

/// Decode a raster image (any format supported by the `image` crate) into a [`SourceImage`].
pub fn decode_image(bytes: &[u8]) -> CardResult<SourceImage> {
    let dyn_img = image::load_from_memory(bytes).context("decode image from memory")?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();
    SourceImage::from_straight_rgba8(width, height, rgba.into_raw())
}

/// Parse SVG bytes into a `usvg` tree.
pub fn parse_svg(bytes: &[u8]) -> CardResult<usvg::Tree> {
    let opts = usvg::Options::default();
    let tree = usvg::Tree::from_data(bytes, &opts).context("parse svg tree")?;
    Ok(tree)
}

/// Rasterize an SVG tree so that the raster covers at least `min_width` x `min_height`.
///
/// The intrinsic aspect ratio is kept; the tree is only ever scaled up.
pub fn rasterize_svg(tree: &usvg::Tree, min_width: u32, min_height: u32) -> CardResult<SourceImage> {
    let size = tree.size();
    let (sw, sh) = (size.width(), size.height());
    if !sw.is_finite() || !sh.is_finite() || sw <= 0.0 || sh <= 0.0 {
        return Err(CardError::InvalidSourceDimensions {
            width: sw.max(0.0) as u32,
            height: sh.max(0.0) as u32,
        });
    }

    let scale = (min_width as f32 / sw).max(min_height as f32 / sh).max(1.0);
    let width = (sw * scale).ceil() as u32;
    let height = (sh * scale).ceil() as u32;
    if width > MAX_SVG_DIM || height > MAX_SVG_DIM {
        return Err(CardError::validation(format!(
            "svg raster size too large: {width}x{height} (max {MAX_SVG_DIM}x{MAX_SVG_DIM})"
        )));
    }

    let mut pixmap = resvg::tiny_skia::Pixmap::new(width.max(1), height.max(1))
        .ok_or_else(|| anyhow::anyhow!("failed to allocate svg pixmap {width}x{height}"))?;
    let xform =
        resvg::tiny_skia::Transform::from_scale(width as f32 / sw, height as f32 / sh);
    resvg::render(tree, xform, &mut pixmap.as_mut());

    let (w, h) = (pixmap.width(), pixmap.height());
    SourceImage::from_premul_rgba8(w, h, pixmap.take())
}

/// Read and decode an asset from disk.
///
/// Files with an `.svg` extension are rasterized to cover `min_size`; everything else goes
/// through [`decode_image`]. Every failure, including oversized or degenerate SVGs, is reported
/// as [`CardError::AssetLoad`] naming `path`.
pub fn load_image_file(
    path: &Path,
    stage: AssetStage,
    min_size: (u32, u32),
) -> CardResult<SourceImage> {
    let bytes = std::fs::read(path)
        .with_context(|| format!("read asset bytes from '{}'", path.display()))
        .map_err(|e| CardError::asset_load(path, stage, e))?;

    let decoded = if has_svg_extension(path) {
        parse_svg(&bytes).and_then(|tree| rasterize_svg(&tree, min_size.0, min_size.1))
    } else {
        decode_image(&bytes)
    };
    decoded.map_err(|e| CardError::asset_load(path, stage, e))
}

fn has_svg_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("svg"))
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
