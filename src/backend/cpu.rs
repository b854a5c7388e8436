use super::Backend;

/// Pure-Rust CPU backend over `Vec<f64>` storage.
#[derive(Clone, Debug, Copy)]
pub struct CpuBackend;

/// Row-major CPU matrix: `(data, rows, cols)`.
#[derive(Debug, Clone, PartialEq)]
pub struct CpuTensor2D(pub Vec<f64>, pub usize, pub usize);

impl CpuTensor2D {
    pub fn new(data: Vec<f64>, rows: usize, cols: usize) -> Self {
        assert_eq!(data.len(), rows * cols, "Inconsistent shape");
        Self(data, rows, cols)
    }

    fn row(&self, i: usize) -> &[f64] {
        &self.0[i * self.2..(i + 1) * self.2]
    }

    fn rows(&self) -> impl Iterator<Item = &[f64]> {
        // chunks(0) panics, and a zero-column matrix has no data anyway
        self.0.chunks(self.2.max(1)).take(self.1)
    }

    fn zip_with(&self, other: &Self, f: impl Fn(f64, f64) -> f64) -> Self {
        assert_eq!((self.1, self.2), (other.1, other.2), "Shape mismatch");
        let data = self.0.iter().zip(&other.0).map(|(&a, &b)| f(a, b)).collect();
        Self(data, self.1, self.2)
    }

    fn broadcast_rows(&self, v: &[f64], f: impl Fn(f64, f64) -> f64) -> Self {
        assert_eq!(self.2, v.len(), "Row vector length must match columns");
        let data = self
            .rows()
            .flat_map(|row| row.iter().zip(v).map(|(&a, &b)| f(a, b)).collect::<Vec<_>>())
            .collect();
        Self(data, self.1, self.2)
    }
}

fn argmax(values: &[f64]) -> usize {
    let mut best = 0;
    for (i, &v) in values.iter().enumerate().skip(1) {
        if v > values[best] {
            best = i;
        }
    }
    best
}

impl Backend for CpuBackend {
    type Scalar = f64;
    type Tensor1D = Vec<f64>;
    type Tensor2D = CpuTensor2D;

    // --- Constructors ---
    fn zeros_1d(len: usize) -> Self::Tensor1D {
        vec![0.; len]
    }

    fn zeros_2d(rows: usize, cols: usize) -> Self::Tensor2D {
        CpuTensor2D::new(vec![0.; rows * cols], rows, cols)
    }

    fn from_vec_1d(data: Vec<f64>) -> Self::Tensor1D {
        data
    }

    fn from_vec_2d(data: Vec<f64>, rows: usize, cols: usize) -> Self::Tensor2D {
        CpuTensor2D::new(data, rows, cols)
    }

    // --- Host conversion and shape ---
    fn to_vec_1d(t: &Self::Tensor1D) -> Vec<f64> {
        t.clone()
    }

    fn to_vec_2d(t: &Self::Tensor2D) -> Vec<f64> {
        t.0.clone()
    }

    fn len_1d(t: &Self::Tensor1D) -> usize {
        t.len()
    }

    fn shape_2d(t: &Self::Tensor2D) -> (usize, usize) {
        (t.1, t.2)
    }

    // --- 1D ops ---
    fn add_1d(a: &Self::Tensor1D, b: &Self::Tensor1D) -> Self::Tensor1D {
        assert_eq!(a.len(), b.len(), "Length mismatch");
        a.iter().zip(b.iter()).map(|(a, b)| a + b).collect()
    }

    fn sub_1d(a: &Self::Tensor1D, b: &Self::Tensor1D) -> Self::Tensor1D {
        assert_eq!(a.len(), b.len(), "Length mismatch");
        a.iter().zip(b.iter()).map(|(a, b)| a - b).collect()
    }

    fn mul_1d(a: &Self::Tensor1D, b: &Self::Tensor1D) -> Self::Tensor1D {
        assert_eq!(a.len(), b.len(), "Length mismatch");
        a.iter().zip(b.iter()).map(|(a, b)| a * b).collect()
    }

    fn div_1d(a: &Self::Tensor1D, b: &Self::Tensor1D) -> Self::Tensor1D {
        assert_eq!(a.len(), b.len(), "Length mismatch");
        a.iter().zip(b.iter()).map(|(a, b)| a / b).collect()
    }

    fn mul_scalar_1d(t: &Self::Tensor1D, s: &Self::Scalar) -> Self::Tensor1D {
        t.iter().map(|x| x * s).collect()
    }

    fn dot_1d(a: &Self::Tensor1D, b: &Self::Tensor1D) -> Self::Scalar {
        assert_eq!(a.len(), b.len(), "Length mismatch");
        a.iter().zip(b.iter()).map(|(a, b)| a * b).sum()
    }

    fn sum_1d(t: &Self::Tensor1D) -> Self::Scalar {
        t.iter().sum()
    }

    // --- 2D element-wise ops ---
    fn add_2d(a: &Self::Tensor2D, b: &Self::Tensor2D) -> Self::Tensor2D {
        a.zip_with(b, |x, y| x + y)
    }

    fn sub_2d(a: &Self::Tensor2D, b: &Self::Tensor2D) -> Self::Tensor2D {
        a.zip_with(b, |x, y| x - y)
    }

    fn mul_2d(a: &Self::Tensor2D, b: &Self::Tensor2D) -> Self::Tensor2D {
        a.zip_with(b, |x, y| x * y)
    }

    fn mul_scalar_2d(t: &Self::Tensor2D, s: &Self::Scalar) -> Self::Tensor2D {
        CpuTensor2D(t.0.iter().map(|x| x * s).collect(), t.1, t.2)
    }

    fn sum_2d(t: &Self::Tensor2D) -> Self::Scalar {
        t.0.iter().sum()
    }

    // --- Linear algebra ---
    fn matmul(a: &Self::Tensor2D, b: &Self::Tensor2D) -> Self::Tensor2D {
        let (n, k) = (a.1, a.2);
        assert_eq!(k, b.1, "Inner dimensions must match");
        let m = b.2;
        let mut out = vec![0.0; n * m];
        for i in 0..n {
            let a_row = a.row(i);
            let out_row = &mut out[i * m..(i + 1) * m];
            for (p, &a_ip) in a_row.iter().enumerate() {
                for (o, &b_pj) in out_row.iter_mut().zip(b.row(p)) {
                    *o += a_ip * b_pj;
                }
            }
        }
        CpuTensor2D(out, n, m)
    }

    fn tmatmul(a: &Self::Tensor2D, b: &Self::Tensor2D) -> Self::Tensor2D {
        assert_eq!(a.1, b.1, "Row counts must match");
        let (k, m) = (a.2, b.2);
        let mut out = vec![0.0; k * m];
        for (a_row, b_row) in a.rows().zip(b.rows()) {
            for (p, &a_ip) in a_row.iter().enumerate() {
                let out_row = &mut out[p * m..(p + 1) * m];
                for (o, &b_ij) in out_row.iter_mut().zip(b_row) {
                    *o += a_ip * b_ij;
                }
            }
        }
        CpuTensor2D(out, k, m)
    }

    fn vecmat(v: &Self::Tensor1D, m: &Self::Tensor2D) -> Self::Tensor1D {
        assert_eq!(v.len(), m.1, "Vector length must match rows");
        let mut out = vec![0.0; m.2];
        for (&v_p, row) in v.iter().zip(m.rows()) {
            for (o, &m_pj) in out.iter_mut().zip(row) {
                *o += v_p * m_pj;
            }
        }
        out
    }

    // --- Column statistics ---
    fn col_sum_2d(t: &Self::Tensor2D) -> Self::Tensor1D {
        let mut out = vec![0.0; t.2];
        for row in t.rows() {
            for (o, &x) in out.iter_mut().zip(row) {
                *o += x;
            }
        }
        out
    }

    fn col_mean_2d(t: &Self::Tensor2D) -> Self::Tensor1D {
        if t.1 == 0 {
            return vec![0.0; t.2];
        }
        let n = t.1 as f64;
        Self::col_sum_2d(t).into_iter().map(|s| s / n).collect()
    }

    fn col_std_2d(t: &Self::Tensor2D, ddof: usize) -> Self::Tensor1D {
        if t.1 <= ddof {
            return vec![0.0; t.2];
        }
        let mean = Self::col_mean_2d(t);
        let mut acc = vec![0.0; t.2];
        for row in t.rows() {
            for ((a, &x), &m) in acc.iter_mut().zip(row).zip(&mean) {
                *a += (x - m) * (x - m);
            }
        }
        let denom = (t.1 - ddof) as f64;
        acc.into_iter().map(|s| (s / denom).sqrt()).collect()
    }

    // --- Row broadcasting ---
    fn broadcast_add_1d_to_2d_rows(t: &Self::Tensor2D, v: &Self::Tensor1D) -> Self::Tensor2D {
        t.broadcast_rows(v, |a, b| a + b)
    }

    fn broadcast_sub_1d_to_2d_rows(t: &Self::Tensor2D, v: &Self::Tensor1D) -> Self::Tensor2D {
        t.broadcast_rows(v, |a, b| a - b)
    }

    fn broadcast_mul_1d_to_2d_rows(t: &Self::Tensor2D, v: &Self::Tensor1D) -> Self::Tensor2D {
        t.broadcast_rows(v, |a, b| a * b)
    }

    fn broadcast_div_1d_to_2d_rows(t: &Self::Tensor2D, v: &Self::Tensor1D) -> Self::Tensor2D {
        t.broadcast_rows(v, |a, b| a / b)
    }

    // --- Row-wise reductions ---
    fn log_softmax_rows_2d(t: &Self::Tensor2D) -> Self::Tensor2D {
        let mut out = Vec::with_capacity(t.0.len());
        for row in t.rows() {
            let max = row.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            let log_sum = row.iter().map(|&z| (z - max).exp()).sum::<f64>().ln();
            out.extend(row.iter().map(|&z| z - max - log_sum));
        }
        CpuTensor2D(out, t.1, t.2)
    }

    fn argmax_rows_2d(t: &Self::Tensor2D) -> Vec<usize> {
        t.rows().map(argmax).collect()
    }

    fn argmax_1d(t: &Self::Tensor1D) -> usize {
        argmax(t)
    }

    fn exp_2d(t: &Self::Tensor2D) -> Self::Tensor2D {
        CpuTensor2D(t.0.iter().map(|x| x.exp()).collect(), t.1, t.2)
    }
}
