use super::Backend;
use ndarray::{Array1, Array2, ArrayView1, Axis};

/// Backend storing tensors as `ndarray` arrays.
#[derive(Clone, Copy, Debug, Default)]
pub struct NdarrayBackend;

fn argmax(values: ArrayView1<'_, f64>) -> usize {
    let mut best = 0;
    for (i, &v) in values.iter().enumerate().skip(1) {
        if v > values[best] {
            best = i;
        }
    }
    best
}

impl Backend for NdarrayBackend {
    type Scalar = f64;
    type Tensor1D = Array1<f64>;
    type Tensor2D = Array2<f64>;

    fn zeros_1d(len: usize) -> Self::Tensor1D {
        Array1::zeros(len)
    }

    fn zeros_2d(rows: usize, cols: usize) -> Self::Tensor2D {
        Array2::zeros((rows, cols))
    }

    fn from_vec_1d(data: Vec<f64>) -> Self::Tensor1D {
        Array1::from(data)
    }

    fn from_vec_2d(data: Vec<f64>, rows: usize, cols: usize) -> Self::Tensor2D {
        assert_eq!(data.len(), rows * cols, "Inconsistent shape");
        Array2::from_shape_vec((rows, cols), data).expect("shape checked above")
    }

    fn to_vec_1d(t: &Self::Tensor1D) -> Vec<f64> {
        t.to_vec()
    }

    fn to_vec_2d(t: &Self::Tensor2D) -> Vec<f64> {
        t.iter().copied().collect()
    }

    fn len_1d(t: &Self::Tensor1D) -> usize {
        t.len()
    }

    fn shape_2d(t: &Self::Tensor2D) -> (usize, usize) {
        t.dim()
    }

    fn add_1d(a: &Self::Tensor1D, b: &Self::Tensor1D) -> Self::Tensor1D {
        a + b
    }

    fn sub_1d(a: &Self::Tensor1D, b: &Self::Tensor1D) -> Self::Tensor1D {
        a - b
    }

    fn mul_1d(a: &Self::Tensor1D, b: &Self::Tensor1D) -> Self::Tensor1D {
        a * b
    }

    fn div_1d(a: &Self::Tensor1D, b: &Self::Tensor1D) -> Self::Tensor1D {
        a / b
    }

    fn mul_scalar_1d(t: &Self::Tensor1D, s: &Self::Scalar) -> Self::Tensor1D {
        t * *s
    }

    fn dot_1d(a: &Self::Tensor1D, b: &Self::Tensor1D) -> Self::Scalar {
        a.dot(b)
    }

    fn sum_1d(t: &Self::Tensor1D) -> Self::Scalar {
        t.sum()
    }

    fn add_2d(a: &Self::Tensor2D, b: &Self::Tensor2D) -> Self::Tensor2D {
        a + b
    }

    fn sub_2d(a: &Self::Tensor2D, b: &Self::Tensor2D) -> Self::Tensor2D {
        a - b
    }

    fn mul_2d(a: &Self::Tensor2D, b: &Self::Tensor2D) -> Self::Tensor2D {
        a * b
    }

    fn mul_scalar_2d(t: &Self::Tensor2D, s: &Self::Scalar) -> Self::Tensor2D {
        t * *s
    }

    fn sum_2d(t: &Self::Tensor2D) -> Self::Scalar {
        t.sum()
    }

    fn matmul(a: &Self::Tensor2D, b: &Self::Tensor2D) -> Self::Tensor2D {
        a.dot(b)
    }

    fn tmatmul(a: &Self::Tensor2D, b: &Self::Tensor2D) -> Self::Tensor2D {
        a.t().dot(b)
    }

    fn vecmat(v: &Self::Tensor1D, m: &Self::Tensor2D) -> Self::Tensor1D {
        v.dot(m)
    }

    fn col_sum_2d(t: &Self::Tensor2D) -> Self::Tensor1D {
        t.sum_axis(Axis(0))
    }

    fn col_mean_2d(t: &Self::Tensor2D) -> Self::Tensor1D {
        t.mean_axis(Axis(0))
            .unwrap_or_else(|| Array1::zeros(t.ncols()))
    }

    fn col_std_2d(t: &Self::Tensor2D, ddof: usize) -> Self::Tensor1D {
        if t.nrows() <= ddof {
            return Array1::zeros(t.ncols());
        }
        t.std_axis(Axis(0), ddof as f64)
    }

    fn broadcast_add_1d_to_2d_rows(t: &Self::Tensor2D, v: &Self::Tensor1D) -> Self::Tensor2D {
        t + v
    }

    fn broadcast_sub_1d_to_2d_rows(t: &Self::Tensor2D, v: &Self::Tensor1D) -> Self::Tensor2D {
        t - v
    }

    fn broadcast_mul_1d_to_2d_rows(t: &Self::Tensor2D, v: &Self::Tensor1D) -> Self::Tensor2D {
        t * v
    }

    fn broadcast_div_1d_to_2d_rows(t: &Self::Tensor2D, v: &Self::Tensor1D) -> Self::Tensor2D {
        t / v
    }

    fn log_softmax_rows_2d(t: &Self::Tensor2D) -> Self::Tensor2D {
        let mut out = t.clone();
        for mut row in out.rows_mut() {
            let max = row.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            let log_sum = row.iter().map(|&z| (z - max).exp()).sum::<f64>().ln();
            row.mapv_inplace(|z| z - max - log_sum);
        }
        out
    }

    fn argmax_rows_2d(t: &Self::Tensor2D) -> Vec<usize> {
        t.rows().into_iter().map(argmax).collect()
    }

    fn argmax_1d(t: &Self::Tensor1D) -> usize {
        argmax(t.view())
    }

    fn exp_2d(t: &Self::Tensor2D) -> Self::Tensor2D {
        t.mapv(f64::exp)
    }
}
