use std::path::{Path, PathBuf};

use anyhow::Context;
use rayon::prelude::*;

use crate::assets::decode::load_image_file;
use crate::assets::font::{FontFace, GlyphRasterizer, ParleyRasterizer};
use crate::card::model::RenderOptions;
use crate::foundation::core::Rgba8;
use crate::foundation::error::{AssetStage, CardError, CardResult};
use crate::layout::fit::fit_fill;
use crate::layout::logos::layout_logos;
use crate::layout::text::{TextLayout, layout_label};
use crate::render::canvas::Canvas;
use crate::render::encode::OutputFormat;

/// Build the card pixels: background, then logos left to right, then the label.
///
/// Stages run strictly in that order and the first error aborts the render. A missing
/// background path leaves the canvas transparent.
#[tracing::instrument(skip_all, fields(width = opts.canvas.width, height = opts.canvas.height))]
pub fn compose(opts: &RenderOptions, rasterizer: &mut dyn GlyphRasterizer) -> CardResult<Canvas> {
    let mut canvas = Canvas::with_size(opts.canvas);
    if let Some(path) = &opts.background {
        draw_background(&mut canvas, path)?;
    }
    draw_logos(&mut canvas, &opts.logos)?;
    draw_label(
        &mut canvas,
        &opts.label,
        opts.font_size,
        opts.label_color,
        rasterizer,
    )?;
    Ok(canvas)
}

/// Fill the whole canvas with the image at `path`.
pub fn draw_background(canvas: &mut Canvas, path: &Path) -> CardResult<()> {
    let (w, h) = (canvas.width(), canvas.height());
    let source = load_image_file(path, AssetStage::Background, (w, h))?;
    let fitted =
        fit_fill(&source, w, h).map_err(|e| e.into_asset_load(path, AssetStage::Background))?;
    canvas.composite_over(&fitted, 0, 0);
    tracing::debug!(path = %path.display(), "background composited");
    Ok(())
}

/// Place `logos` in equal square slots along the bottom edge.
///
/// Every logo is loaded and fitted before any is drawn, so one bad file leaves the canvas as
/// it was.
pub fn draw_logos(canvas: &mut Canvas, logos: &[PathBuf]) -> CardResult<()> {
    let slots = layout_logos(logos.len(), canvas.size());
    let mut fitted = Vec::with_capacity(slots.len());
    for (slot, path) in slots.iter().zip(logos) {
        let source = load_image_file(path, AssetStage::Logo, (slot.size, slot.size))?;
        if slot.size == 0 {
            continue;
        }
        let logo = fit_fill(&source, slot.size, slot.size)
            .map_err(|e| e.into_asset_load(path, AssetStage::Logo))?;
        fitted.push((slot, logo));
    }

    for (slot, logo) in &fitted {
        canvas.composite_over(logo, i64::from(slot.x), slot.y);
    }
    if let Some(first) = slots.first() {
        tracing::debug!(count = slots.len(), size = first.size, "logos composited");
    }
    Ok(())
}

/// Lay out `label` and draw each line at its pen origin.
pub fn draw_label(
    canvas: &mut Canvas,
    label: &str,
    font_size: u32,
    color: Rgba8,
    rasterizer: &mut dyn GlyphRasterizer,
) -> CardResult<TextLayout> {
    let layout = layout_label(label, canvas.size(), font_size);
    for line in &layout.lines {
        let mask = rasterizer.rasterize_line(&line.text, font_size)?;
        canvas.draw_glyph_mask(
            &mask,
            line.x - i64::from(mask.origin_x),
            line.y - i64::from(mask.baseline),
            color,
        );
    }
    Ok(layout)
}

/// Render a card to encoded bytes using the font named in `opts`.
///
/// The output format comes from the extension of `opts.output`.
#[tracing::instrument(skip_all, fields(output = %opts.output.display()))]
pub fn render_card(opts: &RenderOptions) -> CardResult<Vec<u8>> {
    let format = OutputFormat::from_path(&opts.output)?;
    let face = FontFace::load(&opts.font_path)?;
    let mut rasterizer = ParleyRasterizer::new(&face)?;
    render_card_with(opts, format, &mut rasterizer)
}

/// Render with a caller-supplied rasterizer and explicit format.
pub fn render_card_with(
    opts: &RenderOptions,
    format: OutputFormat,
    rasterizer: &mut dyn GlyphRasterizer,
) -> CardResult<Vec<u8>> {
    let canvas = compose(opts, rasterizer)?;
    canvas.encode(format)
}

/// Render a card and write it to `opts.output`, creating parent directories.
///
/// Nothing is written unless the whole render succeeds.
pub fn render_card_to_file(opts: &RenderOptions) -> CardResult<PathBuf> {
    let bytes = render_card(opts)?;
    write_output(&opts.output, &bytes)?;
    Ok(opts.output.clone())
}

/// Write encoded bytes to `path`, creating its parent directory first.
pub fn write_output(path: &Path, bytes: &[u8]) -> CardResult<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    std::fs::write(path, bytes).with_context(|| format!("write '{}'", path.display()))?;
    Ok(())
}

/// Worker pool controls for [`render_batch`].
#[derive(Clone, Debug, Default)]
pub struct BatchThreading {
    /// Explicit worker count; `None` lets rayon decide.
    pub threads: Option<usize>,
}

/// Render independent cards on a worker pool.
///
/// Results come back in input order, one per job; a failed job does not affect the others.
/// The outer error only reports a bad pool configuration.
pub fn render_batch(
    jobs: &[RenderOptions],
    threading: &BatchThreading,
) -> CardResult<Vec<CardResult<PathBuf>>> {
    let pool = build_thread_pool(threading.threads)?;
    Ok(pool.install(|| jobs.par_iter().map(render_card_to_file).collect()))
}

fn build_thread_pool(threads: Option<usize>) -> CardResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(CardError::validation("batch 'threads' must be >= 1 when set"));
    }
    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| CardError::validation(format!("failed to build rayon thread pool: {e}")))
}

#[cfg(test)]
#[path = "../../tests/unit/render/pipeline.rs"]
mod tests;
