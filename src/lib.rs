//! Diffraction-limited imaging model of a telescope aperture.
//!
//! The far-field (Fraunhofer) coherent amplitude is the Fourier transform of
//! the aperture transmission function; its squared modulus is the focal-plane
//! irradiance, the point-spread function. Transforming the PSF once more
//! yields the modulation-transfer function of the incoherent system, which is
//! numerically equivalent to the autocorrelation of the aperture up to the
//! same shift conventions.
//!
//! The pipeline is a straight sequence over value-typed grids:
//! aperture mask -> complex field -> PSF -> MTF, with scalar plate scales
//! mapping pixel offsets to microns (focal plane) and lp/mm (frequency
//! plane). Each run is stateless and synchronous; element-wise passes are
//! parallelised internally with rayon.
//!
//! The support grid must be several times larger than the aperture in pixels,
//! otherwise circular-convolution wrap-around contaminates the diffraction
//! pattern. Sizing note: the mask, complex field, PSF and MTF coexist in
//! memory, so the default 10000x10000 run peaks at roughly 6 GB.

use log::warn;
use ndarray::{s, Array2, ArrayView2};
use num_complex::Complex;

pub mod calibrate;
pub mod fft2;
pub mod mask;

use crate::fft2::{fft2, fft2_shift_inplace};
pub use crate::calibrate::{plate_scale, PlateScale};
pub use crate::mask::{Aperture, TRANSMITTANCE};

/// Immutable per-run configuration; physical lengths in millimetres are
/// converted to pixels through the sampling density Q.
///
/// Inputs are trusted: out-of-range values degrade the output silently
/// (possibly to NaN/Inf samples) rather than failing.
#[derive(Clone, Debug)]
pub struct SimulationConfig {
    /// Support grid dimensions in pixels; must comfortably exceed the
    /// aperture diameter in pixels.
    pub grid_shape: [usize; 2],
    /// Primary aperture diameter, mm.
    pub aperture_diameter_mm: f64,
    /// Central (secondary mirror) obstruction diameter, mm.
    pub obstruction_diameter_mm: f64,
    /// Support-vane width, mm.
    pub vane_thickness_mm: f64,
    /// Focal length over aperture diameter, dimensionless.
    pub focal_ratio: f64,
    /// Monochromatic source wavelength, nm.
    pub wavelength_nm: f64,
    /// Sampling density Q, pixels per physical millimetre of aperture.
    pub sampling_px_per_mm: f64,
}

impl Default for SimulationConfig {
    /// A 250 mm f/20 telescope with an 80 mm obstruction and 2 mm vanes,
    /// observed in H-alpha at 4 px/mm on a 10000x10000 support.
    fn default() -> Self {
        SimulationConfig {
            grid_shape: [10000, 10000],
            aperture_diameter_mm: 250.0,
            obstruction_diameter_mm: 80.0,
            vane_thickness_mm: 2.0,
            focal_ratio: 20.0,
            wavelength_nm: 656.28,
            sampling_px_per_mm: 4.0,
        }
    }
}

impl SimulationConfig {
    /// The narrowest aperture template matching the configuration: plain
    /// circular when obstruction and vanes are absent, and so on.
    pub fn aperture(&self) -> Aperture {
        let q = self.sampling_px_per_mm;
        let diameter_px = self.aperture_diameter_mm * q;
        let obstruction_px = self.obstruction_diameter_mm * q;
        let vane_thickness_px = self.vane_thickness_mm * q;

        if obstruction_px <= 0.0 && vane_thickness_px <= 0.0 {
            Aperture::Circular { diameter_px }
        } else if vane_thickness_px <= 0.0 {
            Aperture::Obstructed {
                diameter_px,
                obstruction_px,
            }
        } else {
            Aperture::ObstructedWithVanes {
                diameter_px,
                obstruction_px,
                vane_thickness_px,
            }
        }
    }

    pub fn plate_scale(&self) -> PlateScale {
        plate_scale(self.wavelength_nm, self.focal_ratio, self.sampling_px_per_mm)
    }
}

/// Products of one pipeline run.
#[derive(Clone, Debug)]
pub struct Simulation {
    /// Binary transmission mask on the support grid, values 0 or
    /// [`TRANSMITTANCE`].
    pub mask: Array2<f64>,
    /// Coherent focal-plane field, zero frequency at grid center.
    pub field: Array2<Complex<f64>>,
    /// Focal-plane irradiance |field|^2, the unnormalised PSF.
    pub psf: Array2<f64>,
    /// Spatial-frequency response |fftshift(fft2(psf))|.
    pub mtf: Array2<f64>,
    pub scale: PlateScale,
}

/// Run the full pipeline: rasterise the aperture, propagate to the focal
/// plane, square to the PSF, transform once more to the MTF.
pub fn simulate(config: &SimulationConfig) -> Simulation {
    let aperture_px = config.aperture_diameter_mm * config.sampling_px_per_mm;
    let support = config.grid_shape[0].min(config.grid_shape[1]) as f64;
    if aperture_px * 2.0 > support {
        warn!(
            "support grid ({} px) is less than twice the aperture diameter ({} px); \
             expect wrap-around artefacts in the diffraction pattern",
            support, aperture_px
        );
    }

    let mask = config.aperture().rasterize(config.grid_shape);
    let field = focal_field(mask.view());
    let psf = intensity(field.view());
    let mtf = modulation_transfer(psf.view());

    Simulation {
        mask,
        field,
        psf,
        mtf,
        scale: config.plate_scale(),
    }
}

/// Coherent far-field amplitude of a transmission mask: the 2-D transform
/// with the zero-frequency sample moved to the grid center.
pub fn focal_field(mask: ArrayView2<f64>) -> Array2<Complex<f64>> {
    let mut field = fft2(mask.map(|&v| Complex::new(v, 0.0)));
    fft2_shift_inplace(field.view_mut());
    field
}

/// Element-wise complex modulus of the field.
pub fn amplitude(field: ArrayView2<Complex<f64>>) -> Array2<f64> {
    field.map(|e| e.norm())
}

/// Element-wise squared modulus of the field: the PSF. Non-negative
/// everywhere, unnormalised (the peak is not forced to 1).
pub fn intensity(field: ArrayView2<Complex<f64>>) -> Array2<f64> {
    field.map(|e| e.norm_sqr())
}

/// Modulation-transfer function: magnitude of the centered transform of the
/// PSF. The zero-frequency sample holds the total PSF energy and is the
/// global maximum.
pub fn modulation_transfer(psf: ArrayView2<f64>) -> Array2<f64> {
    let mut spectrum = fft2(psf.map(|&v| Complex::new(v, 0.0)));
    fft2_shift_inplace(spectrum.view_mut());
    spectrum.map(|e| e.norm())
}

/// Log-magnitude display product, 20 ln|field|. -inf where the field
/// vanishes; left to the consumer to clamp.
pub fn log_magnitude(field: ArrayView2<Complex<f64>>) -> Array2<f64> {
    field.map(|e| 20.0 * e.norm().ln())
}

/// Phase display product in degrees, in (-180, 180].
pub fn phase_degrees(field: ArrayView2<Complex<f64>>) -> Array2<f64> {
    field.map(|e| e.arg().to_degrees())
}

/// Centered square window of half-width `half_width` pixels, clamped to the
/// grid. The interesting part of the PSF and MTF occupies a tiny fraction of
/// the oversized support.
pub fn crop_centered<T: Copy>(arr: ArrayView2<T>, half_width: usize) -> Array2<T> {
    let cy = arr.shape()[0] / 2;
    let cx = arr.shape()[1] / 2;
    let h = half_width.min(cy).min(cx);
    arr.slice(s![cy - h..cy + h, cx - h..cx + h]).to_owned()
}

/// Center-row profile as (physical coordinate, value) pairs; `scale` is the
/// per-pixel plate scale of the grid, with zero at the center pixel.
pub fn center_profile(arr: ArrayView2<f64>, scale: f64) -> Vec<(f64, f64)> {
    let mid = arr.shape()[0] / 2;
    let row = arr.index_axis(ndarray::Axis(0), mid);
    let len = row.len();
    row.iter()
        .enumerate()
        .map(|(i, &v)| (calibrate::pixel_coord(i, len, scale), v))
        .collect()
}

/// Center-to-edge half profile, for one-sided frequency-response plots.
pub fn half_profile(arr: ArrayView2<f64>, scale: f64) -> Vec<(f64, f64)> {
    let mid = arr.shape()[0] / 2;
    let row = arr.index_axis(ndarray::Axis(0), mid);
    row.iter()
        .skip(arr.shape()[1] / 2)
        .enumerate()
        .map(|(i, &v)| (i as f64 * scale, v))
        .collect()
}
