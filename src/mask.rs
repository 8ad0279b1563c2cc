use log::warn;
use ndarray::{s, Array2, Zip};

/// Value of light-transmitting mask samples; the transform chain carries
/// this raw, non-normalised scale through to the PSF and MTF.
pub const TRANSMITTANCE: f64 = 255.0;

/// Aperture geometry rasterised onto the support grid.
///
/// All lengths are in pixels of the support grid. Radii and vane thickness
/// are truncated to whole pixels; there is no sub-pixel edge treatment.
#[derive(Clone, Debug)]
pub enum Aperture {
    /// Unobstructed filled disk.
    Circular { diameter_px: f64 },
    /// Filled disk with a concentric secondary-mirror obstruction.
    Obstructed {
        diameter_px: f64,
        obstruction_px: f64,
    },
    /// Obstructed disk crossed by four full-length support vanes, one
    /// horizontal and one vertical strip through the grid center.
    ObstructedWithVanes {
        diameter_px: f64,
        obstruction_px: f64,
        vane_thickness_px: f64,
    },
    /// User-supplied transmission bitmap, pasted centered into the support.
    Bitmap(Array2<f64>),
}

impl Aperture {
    /// Rasterise the aperture onto a `shape` support grid.
    ///
    /// Inputs are not validated: degenerate geometry (obstruction at least as
    /// large as the aperture, vanes wider than the grid) produces a valid but
    /// physically meaningless mask and logs a warning. The vane cut is
    /// applied last so it blanks the disk and the obstruction rim uniformly.
    pub fn rasterize(&self, shape: [usize; 2]) -> Array2<f64> {
        match *self {
            Aperture::Circular { diameter_px } => {
                disk_mask(shape, diameter_px, 0.0, 0.0)
            }
            Aperture::Obstructed {
                diameter_px,
                obstruction_px,
            } => {
                warn_degenerate(shape, diameter_px, obstruction_px, 0.0);
                disk_mask(shape, diameter_px, obstruction_px, 0.0)
            }
            Aperture::ObstructedWithVanes {
                diameter_px,
                obstruction_px,
                vane_thickness_px,
            } => {
                warn_degenerate(shape, diameter_px, obstruction_px, vane_thickness_px);
                disk_mask(shape, diameter_px, obstruction_px, vane_thickness_px)
            }
            Aperture::Bitmap(ref bitmap) => paste_centered(bitmap, shape),
        }
    }
}

fn warn_degenerate(shape: [usize; 2], diameter: f64, obstruction: f64, thickness: f64) {
    if obstruction >= diameter && obstruction > 0.0 {
        warn!(
            "central obstruction ({} px) is not smaller than the aperture ({} px); the mask will be fully blanked",
            obstruction, diameter
        );
    }
    if thickness as i64 >= shape[0].min(shape[1]) as i64 {
        warn!(
            "vane thickness ({} px) covers the whole {}x{} support grid",
            thickness, shape[0], shape[1]
        );
    }
}

// Single pass over the grid; the per-pixel predicate is equivalent to
// drawing disk, then obstruction, then vanes, in that order.
fn disk_mask(shape: [usize; 2], diameter: f64, obstruction: f64, thickness: f64) -> Array2<f64> {
    let cy = (shape[0] / 2) as i64;
    let cx = (shape[1] / 2) as i64;
    let r_outer = (diameter / 2.0) as i64;
    let r_inner = (obstruction / 2.0) as i64;
    let t = thickness as i64;

    let mut mask = Array2::zeros(shape);

    Zip::indexed(&mut mask).par_for_each(|(y, x), e| {
        let dy = y as i64 - cy;
        let dx = x as i64 - cx;
        let d2 = dx * dx + dy * dy;

        let in_disk = d2 <= r_outer * r_outer && r_outer > 0;
        let in_obstruction = d2 <= r_inner * r_inner && r_inner > 0;
        let in_vane = strip_covers(dx, t) || strip_covers(dy, t);

        *e = if in_disk && !in_obstruction && !in_vane {
            TRANSMITTANCE
        } else {
            0.0
        };
    });

    mask
}

// A strip of width t centered on the grid axis covers offsets
// -(t/2) .. t - t/2, so even widths sit one pixel heavy on the low side.
fn strip_covers(offset: i64, t: i64) -> bool {
    offset >= -(t / 2) && offset < t - t / 2
}

fn paste_centered(bitmap: &Array2<f64>, shape: [usize; 2]) -> Array2<f64> {
    let h = bitmap.shape()[0].min(shape[0]);
    let w = bitmap.shape()[1].min(shape[1]);
    if h < bitmap.shape()[0] || w < bitmap.shape()[1] {
        warn!(
            "bitmap aperture ({}x{}) is larger than the {}x{} support grid and will be cropped",
            bitmap.shape()[0],
            bitmap.shape()[1],
            shape[0],
            shape[1]
        );
    }

    let oy = shape[0] / 2 - h / 2;
    let ox = shape[1] / 2 - w / 2;
    let by = bitmap.shape()[0] / 2 - h / 2;
    let bx = bitmap.shape()[1] / 2 - w / 2;

    let mut mask = Array2::zeros(shape);
    mask.slice_mut(s![oy..oy + h, ox..ox + w])
        .assign(&bitmap.slice(s![by..by + h, bx..bx + w]));
    mask
}
