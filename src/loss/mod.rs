//! Regression loss for Q-learning updates.
//!
//! Only the value of the action actually taken in each row is regressed
//! toward its target: predictions are gathered at `actions[i]` before the
//! squared error is taken, so untaken actions receive zero gradient.

use ndarray::{Array2, ArrayView1, ArrayView2};

/// Mean squared error between `predictions[[i, actions[i]]]` and `targets[i]`.
pub fn masked_mse(predictions: ArrayView2<f32>, actions: &[usize], targets: ArrayView1<f32>) -> f32 {
    let batch_size = actions.len();
    if batch_size == 0 {
        return 0.0;
    }
    let sum: f32 = actions
        .iter()
        .zip(targets.iter())
        .enumerate()
        .map(|(i, (&a, &t))| {
            let diff = predictions[[i, a]] - t;
            diff * diff
        })
        .sum();
    sum / batch_size as f32
}

/// Gradient of [`masked_mse`] with respect to the full prediction matrix.
pub fn masked_mse_gradient(predictions: ArrayView2<f32>, actions: &[usize], targets: ArrayView1<f32>) -> Array2<f32> {
    let mut gradient = Array2::zeros(predictions.dim());
    let batch_size = actions.len().max(1) as f32;
    for (i, (&a, &t)) in actions.iter().zip(targets.iter()).enumerate() {
        gradient[[i, a]] = 2.0 * (predictions[[i, a]] - t) / batch_size;
    }
    gradient
}
