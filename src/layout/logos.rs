use crate::foundation::core::CanvasSize;

/// Placement of one logo in the bottom strip.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub struct LogoSlot {
    /// Position of the logo in the input list.
    pub index: usize,
    /// Left edge in canvas pixels.
    pub x: u32,
    /// Top edge in canvas pixels; negative when the slot is taller than the canvas.
    pub y: i64,
    /// Edge length of the square slot.
    pub size: u32,
}

impl LogoSlot {
    /// Exclusive right edge.
    pub fn right(&self) -> u32 {
        self.x + self.size
    }
}

/// Split the canvas width into `count` equal square slots along the bottom edge.
///
/// `size = width / count` with truncating division; the `width % count` pixels left over on the
/// right stay unassigned. Zero logos give an empty strip. When `count > width` every slot has
/// size 0.
pub fn layout_logos(count: usize, canvas: CanvasSize) -> Vec<LogoSlot> {
    if count == 0 {
        return Vec::new();
    }

    let size = u32::try_from(count)
        .map(|n| canvas.width / n)
        .unwrap_or(0);
    let y = i64::from(canvas.height) - i64::from(size);
    (0..count)
        .map(|index| LogoSlot {
            index,
            x: (index as u32).saturating_mul(size),
            y,
            size,
        })
        .collect()
}
