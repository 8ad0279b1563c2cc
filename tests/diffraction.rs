use fraunhofer_psf::{simulate, SimulationConfig};

/// 512x512 support with a plain 100 px circular aperture.
fn unobstructed_config() -> SimulationConfig {
    SimulationConfig {
        grid_shape: [512, 512],
        aperture_diameter_mm: 25.0,
        obstruction_diameter_mm: 0.0,
        vane_thickness_mm: 0.0,
        focal_ratio: 20.0,
        wavelength_nm: 656.28,
        sampling_px_per_mm: 4.0,
    }
}

#[test]
fn unobstructed_psf_is_physical() {
    let sim = simulate(&unobstructed_config());
    let psf = &sim.psf;
    let peak = psf.iter().fold(0.0_f64, |m, &v| v.max(m));
    assert!(peak > 0.0);

    // real and non-negative everywhere
    for &v in psf.iter() {
        assert!(v.is_finite());
        assert!(v >= 0.0);
    }

    // symmetric under 180 degree rotation about the grid center, as the
    // transform of any real, origin-symmetric aperture must be
    let mid = 256_usize;
    for dy in 0..40_i64 {
        for dx in 0..40_i64 {
            let a = psf[[(mid as i64 + dy) as usize, (mid as i64 + dx) as usize]];
            let b = psf[[(mid as i64 - dy) as usize, (mid as i64 - dx) as usize]];
            assert!(
                (a - b).abs() <= 1e-9 * peak,
                "asymmetry at offset ({}, {}): {} vs {}",
                dy,
                dx,
                a,
                b
            );
        }
    }

    // energy concentrated near the center: the first dark ring of a 100 px
    // aperture on a 512 px support sits at 1.22 * 512 / 100 = 6.25 px, so a
    // 25 px radius spans four rings and should hold well over 85% of the
    // total energy
    let total: f64 = psf.sum();
    let mut near = 0.0;
    for dy in -25_i64..=25 {
        for dx in -25_i64..=25 {
            if dy * dy + dx * dx <= 25 * 25 {
                near += psf[[(mid as i64 + dy) as usize, (mid as i64 + dx) as usize]];
            }
        }
    }
    assert!(
        near / total > 0.85,
        "only {} of the PSF energy within 25 px of center",
        near / total
    );
}

#[test]
fn mtf_is_non_negative_with_central_peak() {
    let sim = simulate(&unobstructed_config());
    let center = sim.mtf[[256, 256]];
    for &v in sim.mtf.iter() {
        assert!(v.is_finite());
        assert!(v >= 0.0);
        assert!(v <= center * (1.0 + 1e-12));
    }
}

/// The primary physical-correctness regression: the first dark ring of the
/// numerically computed PSF, converted through the focal-plane plate scale,
/// must land on the closed-form Airy radius 1.22 λ N.
///
/// The plate-scale formulas assume a sampling convention that ties the
/// support width to the aperture, grid pixels = 1000 x diameter in mm; this
/// geometry satisfies it with a 100 px pupil on a 512 px support.
#[test]
fn first_dark_ring_matches_airy_radius() {
    let config = SimulationConfig {
        grid_shape: [512, 512],
        aperture_diameter_mm: 0.512,
        obstruction_diameter_mm: 0.0,
        vane_thickness_mm: 0.0,
        focal_ratio: 20.0,
        wavelength_nm: 656.28,
        sampling_px_per_mm: 195.3125,
    };
    let sim = simulate(&config);

    // radial cut from the center along +x
    let mid = 256_usize;
    let cut: Vec<f64> = (0..40).map(|r| sim.psf[[mid, mid + r]]).collect();

    // first local minimum of the cut, refined to sub-pixel by fitting a
    // parabola through the three samples around it
    let m = (1..cut.len() - 1)
        .find(|&r| cut[r] < cut[r - 1] && cut[r] <= cut[r + 1])
        .expect("no dark ring found in the first 40 px");
    let denom = cut[m - 1] - 2.0 * cut[m] + cut[m + 1];
    let r_min = m as f64 + 0.5 * (cut[m - 1] - cut[m + 1]) / denom;

    let measured_um = r_min * sim.scale.psf_um_per_px;
    let expected_um = sim.scale.airy_radius_um;
    let relative_error = (measured_um - expected_um).abs() / expected_um;
    assert!(
        relative_error < 0.05,
        "first dark ring at {:.3} um, Airy radius {:.3} um ({:.1}% off)",
        measured_um,
        expected_um,
        relative_error * 100.0
    );
}
