//! brandcard renders uniform branded images (social cards) from a small JSON template.
//!
//! A card is a fixed-size canvas built in three strictly ordered stages:
//!
//! 1. **Background**: the image is scaled to cover the canvas (Lanczos3) and cropped at the
//!    top-left corner ([`fit_fill`]).
//! 2. **Logos**: `N` logos share the bottom edge in equal square slots of `width / N`
//!    ([`layout_logos`]), each fitted the same way.
//! 3. **Label**: text is wrapped and centered with a character-count approximation
//!    ([`layout_label`]) and rasterized through a [`GlyphRasterizer`].
//!
//! The resulting [`Canvas`] encodes to PNG or JPEG depending on the output extension.
//!
//! The key design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **No shared state**: each render owns its canvas and intermediates, so independent renders
//!   can run in parallel ([`render_batch`]).
//! - **In-memory transforms**: scaled and cropped images are immutable [`SourceImage`] values,
//!   never temporary files.
//! - **Premultiplied RGBA8** internally; PNG output carries straight alpha.
//! - **No reporting from the core**: failures come back as [`CardError`] with the offending path
//!   and stage; logging is limited to `tracing` spans and debug events.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod assets;
mod card;
mod foundation;
mod layout;
mod render;

pub use assets::color::parse_hex_color;
pub use assets::decode::{decode_image, load_image_file, parse_svg, rasterize_svg};
pub use assets::font::{FontFace, GlyphMask, GlyphRasterizer, ParleyRasterizer};
pub use assets::source::SourceImage;
pub use card::model::{CardOptions, RenderOptions};
pub use foundation::core::{CanvasSize, Rgba8, Rgba8Premul};
pub use foundation::error::{AssetStage, CardError, CardResult};
pub use layout::fit::{FILL_FILTER, FillPlan, fill_plan, fit_fill};
pub use layout::logos::{LogoSlot, layout_logos};
pub use layout::text::{
    LayoutLine, TextLayout, WRAPPED_LINE_NUDGE, layout_label, layout_single, layout_wrapped,
    measure_fits, wrap,
};
pub use render::canvas::Canvas;
pub use render::composite::over;
pub use render::encode::{JPEG_QUALITY, OutputFormat, encode_premul_rgba8, premul_to_straight_rgba8};
pub use render::pipeline::{
    BatchThreading, compose, draw_background, draw_label, draw_logos, render_batch, render_card,
    render_card_to_file, render_card_with, write_output,
};
