//! "Fill" fitting: scale a source to cover a target box, then crop the target out of it.
//!
//! The crop is always anchored at the top-left corner of the scaled image, so any overflow to
//! the right or bottom is discarded. Rendered cards depend on this anchoring; a centered crop
//! would shift every background and logo.

use image::imageops::{self, FilterType};

use crate::assets::source::SourceImage;
use crate::foundation::error::{CardError, CardResult};

/// Resampling filter for every fill scale, up or down.
pub const FILL_FILTER: FilterType = FilterType::Lanczos3;

/// Scale and crop decisions for one fill operation.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct FillPlan {
    /// Uniform scale factor `max(tw/sw, th/sh)`.
    pub scale: f64,
    /// Width after scaling; never below the target width.
    pub scaled_width: u32,
    /// Height after scaling; never below the target height.
    pub scaled_height: u32,
    /// Crop origin x; always 0.
    pub crop_x: u32,
    /// Crop origin y; always 0.
    pub crop_y: u32,
    /// Crop width, equal to the target width.
    pub crop_width: u32,
    /// Crop height, equal to the target height.
    pub crop_height: u32,
}

/// Compute the cover scale and crop rectangle for a `sw x sh` source into `tw x th`.
pub fn fill_plan(sw: u32, sh: u32, tw: u32, th: u32) -> CardResult<FillPlan> {
    if sw == 0 || sh == 0 {
        return Err(CardError::InvalidSourceDimensions {
            width: sw,
            height: sh,
        });
    }
    if tw == 0 || th == 0 {
        return Err(CardError::validation(format!(
            "fill target must be > 0 in both dimensions, got {tw}x{th}"
        )));
    }

    let scale = (f64::from(tw) / f64::from(sw)).max(f64::from(th) / f64::from(sh));
    Ok(FillPlan {
        scale,
        scaled_width: scaled_edge(sw, scale, tw),
        scaled_height: scaled_edge(sh, scale, th),
        crop_x: 0,
        crop_y: 0,
        crop_width: tw,
        crop_height: th,
    })
}

// The epsilon keeps `ceil` from bumping an exact edge (e.g. 3 * (1000/3)) one pixel past the
// target through float error.
fn scaled_edge(src: u32, scale: f64, target: u32) -> u32 {
    let v = (f64::from(src) * scale - 1e-9).ceil();
    (v.min(f64::from(u32::MAX)) as u32).max(target)
}

/// Scale `source` to cover `tw x th` with [`FILL_FILTER`], then crop at the origin.
///
/// Only the part of the source that lands in the crop (plus the filter support) is resampled,
/// so thin sources with huge scaled sizes stay cheap. Returns a new image of exactly
/// `tw x th`; `source` is untouched.
#[tracing::instrument(skip(source), fields(sw = source.width(), sh = source.height()))]
pub fn fit_fill(source: &SourceImage, tw: u32, th: u32) -> CardResult<SourceImage> {
    let plan = fill_plan(source.width(), source.height(), tw, th)?;
    let (sub_w, sub_h) = visible_source_region(&plan, source.width(), source.height());
    let resize_w = if sub_w == source.width() {
        plan.scaled_width
    } else {
        scaled_edge(sub_w, plan.scale, tw)
    };
    let resize_h = if sub_h == source.height() {
        plan.scaled_height
    } else {
        scaled_edge(sub_h, plan.scale, th)
    };
    tracing::debug!(
        scale = plan.scale,
        scaled_width = plan.scaled_width,
        scaled_height = plan.scaled_height,
        sub_w,
        sub_h,
        "fill plan"
    );

    let mut src = source.to_rgba_image()?;
    if (sub_w, sub_h) != src.dimensions() {
        src = imageops::crop_imm(&src, 0, 0, sub_w, sub_h).to_image();
    }
    let mut scaled = if (resize_w, resize_h) == src.dimensions() {
        src
    } else {
        imageops::resize(&src, resize_w, resize_h, FILL_FILTER)
    };
    clamp_premul_in_place(&mut scaled);

    let cropped = imageops::crop_imm(
        &scaled,
        plan.crop_x,
        plan.crop_y,
        plan.crop_width,
        plan.crop_height,
    )
    .to_image();
    SourceImage::from_rgba_image(cropped)
}

/// Source-space size of the top-left region that feeds the crop, including the Lanczos3
/// support (3 taps, widened by the scale factor when downsampling).
fn visible_source_region(plan: &FillPlan, sw: u32, sh: u32) -> (u32, u32) {
    let support = (3.0 / plan.scale.min(1.0)).ceil() + 1.0;
    let edge = |target: u32, src: u32| {
        let need = (f64::from(target) / plan.scale).ceil() + support;
        (need.min(f64::from(src)) as u32).max(1)
    };
    (edge(plan.crop_width, sw), edge(plan.crop_height, sh))
}

// Lanczos ringing can push a color channel above its alpha, which is not a valid
// premultiplied pixel.
fn clamp_premul_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3];
        px[0] = px[0].min(a);
        px[1] = px[1].min(a);
        px[2] = px[2].min(a);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layout/fit.rs"]
mod tests;
