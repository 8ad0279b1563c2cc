use ndarray::parallel::prelude::{IntoParallelIterator, ParallelIterator};
use ndarray::{s, Array2, ArrayViewMut1, ArrayViewMut2, Axis, Zip};
use rustfft::num_complex::Complex;
use rustfft::num_traits::Zero;
use rustfft::FftPlanner;

/// Forward 2-D DFT, row pass followed by column pass.
///
/// Unnormalised: no scaling is applied on the forward transform, so the
/// zero-frequency sample equals the plain sum of the input. Rows are
/// transformed in place; columns go through a per-thread contiguous buffer.
pub fn fft2(mut input: Array2<Complex<f64>>) -> Array2<Complex<f64>> {
    let mut planner = FftPlanner::new();
    let fft_row = planner.plan_fft_forward(input.shape()[1]);
    let fft_col = planner.plan_fft_forward(input.shape()[0]);

    Zip::from(input.rows_mut()).into_par_iter().for_each_init(
        || vec![Zero::zero(); fft_row.get_inplace_scratch_len()],
        |scratch, mut row| {
            fft_row.process_with_scratch(row.0.as_slice_mut().unwrap(), scratch);
        },
    );

    Zip::from(input.columns_mut())
        .into_par_iter()
        .for_each_init(
            || {
                (
                    vec![Zero::zero(); fft_col.len()],
                    vec![Zero::zero(); fft_col.get_inplace_scratch_len()],
                )
            },
            |(buffer, scratch), mut col| {
                for (b, &c) in buffer.iter_mut().zip(col.0.iter()) {
                    *b = c;
                }
                fft_col.process_with_scratch(buffer, scratch);
                for (c, &b) in col.0.iter_mut().zip(buffer.iter()) {
                    *c = b;
                }
            },
        );

    input
}

/// Moves the origin (0, 0) to the "center" of the array (H/2, W/2) on both axes.
///
/// Self-inverse for even axis lengths; for odd lengths [`ifft2_shift_inplace`]
/// is the exact inverse.
pub fn fft2_shift_inplace<T: Copy + Send + Sync>(mut input: ArrayViewMut2<T>) {
    Zip::from(input.lanes_mut(Axis(1))).par_for_each(|row| {
        fft_shift_inplace(row);
    });

    Zip::from(input.lanes_mut(Axis(0))).par_for_each(|col| {
        fft_shift_inplace(col);
    });
}

/// Moves the "center" of the array (H/2, W/2) back to the origin (0, 0),
/// inverting [`fft2_shift_inplace`] exactly, including odd axis lengths.
pub fn ifft2_shift_inplace<T: Copy + Send + Sync>(mut input: ArrayViewMut2<T>) {
    Zip::from(input.lanes_mut(Axis(1))).par_for_each(|row| {
        ifft_shift_inplace(row);
    });

    Zip::from(input.lanes_mut(Axis(0))).par_for_each(|col| {
        ifft_shift_inplace(col);
    });
}

/// Moves the origin (0) to the "center" of the lane (N/2).
///
/// A cyclic rotation left by `(N + 1) / 2`; for even lengths, which have no
/// center value, the value lands on the sample just after the center.
pub fn fft_shift_inplace<T: Copy>(lane: ArrayViewMut1<T>) {
    let mid = (lane.len() + 1) / 2;
    rotate_lane_left(lane, mid);
}

/// Moves the "center" of the lane (N/2) to the origin (0).
///
/// A cyclic rotation left by `N / 2`; inverts [`fft_shift_inplace`] exactly,
/// accounting for the asymmetry of odd lengths.
pub fn ifft_shift_inplace<T: Copy>(lane: ArrayViewMut1<T>) {
    let mid = lane.len() / 2;
    rotate_lane_left(lane, mid);
}

// Three-reversal rotation; works on non-contiguous column lanes.
fn rotate_lane_left<T: Copy>(mut lane: ArrayViewMut1<T>, mid: usize) {
    reverse_lane(lane.slice_mut(s![..mid]));
    reverse_lane(lane.slice_mut(s![mid..]));
    reverse_lane(lane.view_mut());
}

fn reverse_lane<T: Copy>(mut lane: ArrayViewMut1<T>) {
    let n = lane.len();
    for i in 0..n / 2 {
        lane.swap(i, n - 1 - i);
    }
}
