use fraunhofer_psf::{calibrate, crop_centered, half_profile, simulate, SimulationConfig};
use image::{Rgb, RgbImage};
use ndarray::ArrayView2;
use palette::{Lch, Srgb};

pub fn main() {
    env_logger::init();

    // 250 mm f/20 Newtonian with an 80 mm secondary and 2 mm vanes, H-alpha.
    // 4096 px support keeps a 4x margin over the 1000 px pupil.
    let config = SimulationConfig {
        grid_shape: [4096, 4096],
        aperture_diameter_mm: 250.0,
        obstruction_diameter_mm: 80.0,
        vane_thickness_mm: 2.0,
        focal_ratio: 20.0,
        wavelength_nm: 656.28,
        sampling_px_per_mm: 4.0,
    };
    let sim = simulate(&config);

    let aperture_px = config.aperture_diameter_mm * config.sampling_px_per_mm;
    let margin = (aperture_px / 2.0) as usize + 100;
    let aperture_zoom = crop_centered(sim.mask.view(), margin);
    save_grayscale_image("aperture.png", aperture_zoom.view(), 1.0).unwrap();

    let psf_zoom = crop_centered(sim.psf.view(), 35);
    let ext_psf = calibrate::half_extent(psf_zoom.shape()[0], sim.scale.psf_um_per_px);
    save_grayscale_image("psf.png", psf_zoom.view(), 0.5).unwrap();
    save_false_colour_image("psf_colour.png", psf_zoom.view()).unwrap();
    println!("PSF window: +/-{:.3} um", ext_psf);

    let mtf_zoom = crop_centered(sim.mtf.view(), 600);
    let ext_mtf = calibrate::half_extent(mtf_zoom.shape()[0], sim.scale.mtf_lpmm_per_px);
    save_grayscale_image("mtf.png", mtf_zoom.view(), 1.0).unwrap();
    println!("MTF window: +/-{:.1} lp/mm", ext_mtf);

    for (freq, response) in half_profile(mtf_zoom.view(), sim.scale.mtf_lpmm_per_px)
        .iter()
        .step_by(100)
    {
        println!("MTF at {:>6.1} lp/mm: {:e}", freq, response);
    }

    println!(
        "Airy disk radius calculated through 1.22 lambda f/ = {} microns",
        sim.scale.airy_radius_um
    );
}

/// Min/max normalised grayscale export with gamma correction. Arrays must be
/// normalised before saving, otherwise the image comes out all black even
/// when the raw values look fine.
pub fn save_grayscale_image<T: AsRef<std::path::Path> + std::fmt::Debug>(
    file_name: T,
    arr: ArrayView2<f64>,
    gamma: f64,
) -> Result<(), Box<dyn std::error::Error>> {
    if let &[h, w, ..] = arr.shape() {
        let max: f64 = arr.iter().fold(f64::MIN, |max, &val| val.max(max));
        let min: f64 = arr.iter().fold(f64::MAX, |min, &val| val.min(min));
        let range = if max > min { max - min } else { 1.0 };
        println!("h:{} w:{} min:{} max:{} - {:?}", h, w, min, max, file_name);

        let mut img = RgbImage::new(w as u32, h as u32);
        for (x, y, p) in img.enumerate_pixels_mut() {
            let value = (arr[[y as usize, x as usize]] - min) / range;
            let value = (value.powf(gamma) * 255.0) as u8;
            *p = Rgb([value, value, value]);
        }

        img.save(file_name)?;
    }
    Ok(())
}

/// Peak-normalised false-colour export on a perceptual lightness/chroma ramp.
pub fn save_false_colour_image<T: AsRef<std::path::Path> + std::fmt::Debug>(
    file_name: T,
    arr: ArrayView2<f64>,
) -> Result<(), Box<dyn std::error::Error>> {
    if let &[h, w, ..] = arr.shape() {
        let max: f64 = arr.iter().fold(0.0, |max, &val| val.max(max));
        println!("h:{} w:{} max:{} - {:?}", h, w, max, file_name);

        let mut img = RgbImage::new(w as u32, h as u32);
        for (x, y, p) in img.enumerate_pixels_mut() {
            let value = arr[[y as usize, x as usize]] / max;

            let colour = Srgb::from(Lch::new(value * 70.0, value * 128.0, 280.0 - 245.0 * value));
            *p = Rgb([
                (colour.red * 255.0) as u8,
                (colour.green * 255.0) as u8,
                (colour.blue * 255.0) as u8,
            ]);
        }

        img.save(file_name)?;
    }
    Ok(())
}
