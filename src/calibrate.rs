//! Conversion of pixel offsets in the transformed grids to physical units.
//!
//! The focal-plane (PSF) scale and frequency-plane (MTF) scale are pure
//! scalar derivations from the wavelength, focal ratio and sampling density;
//! they never touch the arrays themselves.

/// Pixel-to-physical conversion factors for one run.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlateScale {
    /// Microns per pixel in the focal-plane (PSF) grid.
    pub psf_um_per_px: f64,
    /// Line pairs per millimetre per pixel in the frequency-plane (MTF) grid.
    pub mtf_lpmm_per_px: f64,
    /// First dark ring of an unobstructed circular aperture, 1.22 λ N, in
    /// microns. Closed-form cross-check for the numerically computed PSF.
    pub airy_radius_um: f64,
}

/// Derive the plate scales from wavelength (nm), focal ratio and sampling
/// density Q (px/mm).
///
/// λ is converted from nanometres to microns and Q from px/mm to px/micron;
/// the focal-plane scale multiplies by the focal ratio and the frequency-plane
/// scale divides by it, scaled back to per-millimetre spatial frequency.
pub fn plate_scale(wavelength_nm: f64, focal_ratio: f64, sampling_px_per_mm: f64) -> PlateScale {
    let lambda_um = wavelength_nm / 1000.0;
    let q_px_per_um = sampling_px_per_mm / 1000.0;

    PlateScale {
        psf_um_per_px: lambda_um * focal_ratio * q_px_per_um,
        mtf_lpmm_per_px: 1000.0 * lambda_um * q_px_per_um / focal_ratio,
        airy_radius_um: 1.22 * lambda_um * focal_ratio,
    }
}

/// Physical half-width of a centered window of `len_px` pixels, for axis
/// extents: `[-half_extent, +half_extent]`.
pub fn half_extent(len_px: usize, scale: f64) -> f64 {
    len_px as f64 * scale / 2.0
}

/// Physical coordinate of pixel `index` on an axis of `len` pixels whose
/// center pixel (`len / 2`) sits at zero.
pub fn pixel_coord(index: usize, len: usize, scale: f64) -> f64 {
    (index as f64 - (len / 2) as f64) * scale
}

#[cfg(test)]
mod tests {
    use super::{half_extent, pixel_coord, plate_scale};
    use approx::assert_relative_eq;

    // H-alpha at f/20 sampled at 4 px/mm, the reference configuration.
    const LAMBDA_NM: f64 = 656.28;
    const FOCAL_RATIO: f64 = 20.0;
    const Q: f64 = 4.0;

    #[test]
    fn reference_configuration_constants() {
        let scale = plate_scale(LAMBDA_NM, FOCAL_RATIO, Q);
        assert_relative_eq!(
            scale.psf_um_per_px,
            0.65628 * 20.0 * 0.004,
            max_relative = 1e-12
        );
        assert_relative_eq!(
            scale.mtf_lpmm_per_px,
            1000.0 * 0.65628 * 0.004 / 20.0,
            max_relative = 1e-12
        );
        assert_relative_eq!(scale.airy_radius_um, 16.013232, max_relative = 1e-12);
    }

    #[test]
    fn scales_are_reciprocal_up_to_the_focal_ratio() {
        let scale = plate_scale(LAMBDA_NM, FOCAL_RATIO, Q);

        // one scale is the inverse-scaled form of the other: their ratio
        // depends only on the focal ratio, their product only on λ·Q
        assert_relative_eq!(
            scale.psf_um_per_px / scale.mtf_lpmm_per_px,
            FOCAL_RATIO * FOCAL_RATIO / 1000.0,
            max_relative = 1e-12
        );
        let lambda_um = LAMBDA_NM / 1000.0;
        let q_px_per_um = Q / 1000.0;
        assert_relative_eq!(
            scale.psf_um_per_px * scale.mtf_lpmm_per_px,
            1000.0 * (lambda_um * q_px_per_um) * (lambda_um * q_px_per_um),
            max_relative = 1e-12
        );
    }

    #[test]
    fn extents_and_coords() {
        assert_relative_eq!(half_extent(70, 0.5), 17.5);
        assert_relative_eq!(pixel_coord(32, 64, 2.0), 0.0);
        assert_relative_eq!(pixel_coord(0, 64, 2.0), -64.0);
        assert_relative_eq!(pixel_coord(63, 64, 2.0), 62.0);
    }
}
