use rand::Rng;
use std::f64::consts::PI;
use std::fmt;

use crate::error::{Error, Result};

/// Largest number of rows/columns printed by the `Display` impl.
const DISPLAY_LIMIT: usize = 5;

/// Dense row-major matrix of `f64`.
///
/// The buffer length is always `rows * cols`; the fields are private so the
/// invariant cannot be broken from outside. Operations that combine matrices
/// borrow their operands and either write into `self` or into an explicit
/// `result` matrix, which must already have the right shape.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl Matrix {
    pub fn zeros(rows: usize, cols: usize) -> Matrix {
        Matrix::filled(rows, cols, 0.0)
    }

    pub fn filled(rows: usize, cols: usize, value: f64) -> Matrix {
        Matrix { rows, cols, data: vec![value; rows * cols] }
    }

    /// Builds a matrix whose element `(i, j)` is `f(i, j)`.
    pub fn from_fn<F>(rows: usize, cols: usize, mut f: F) -> Matrix
    where
        F: FnMut(usize, usize) -> f64,
    {
        let mut data = Vec::with_capacity(rows * cols);
        for i in 0..rows {
            for j in 0..cols {
                data.push(f(i, j));
            }
        }
        Matrix { rows, cols, data }
    }

    /// Wraps a row-major buffer. Fails if `data.len() != rows * cols`.
    pub fn from_vec(rows: usize, cols: usize, data: Vec<f64>) -> Result<Matrix> {
        if data.len() != rows * cols {
            return Err(Error::mismatch("from_vec", (rows, cols), (data.len(), 1)));
        }
        Ok(Matrix { rows, cols, data })
    }

    /// Builds a matrix from nested rows; every row must have the same length.
    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Matrix> {
        let cols = rows.first().map_or(0, |r| r.len());
        let mut data = Vec::with_capacity(rows.len() * cols);
        for row in rows {
            if row.len() != cols {
                return Err(Error::mismatch("from_rows", (1, cols), (1, row.len())));
            }
            data.extend_from_slice(row);
        }
        Ok(Matrix { rows: rows.len(), cols, data })
    }

    /// Column vector `(values.len() × 1)`.
    pub fn column(values: &[f64]) -> Matrix {
        Matrix { rows: values.len(), cols: 1, data: values.to_vec() }
    }

    pub fn identity(n: usize) -> Matrix {
        Matrix::from_fn(n, n, |i, j| if i == j { 1.0 } else { 0.0 })
    }

    /// Uniform samples in `[-1, 1)`.
    pub fn random_uniform<R: Rng>(rows: usize, cols: usize, rng: &mut R) -> Matrix {
        Matrix::from_fn(rows, cols, |_, _| rng.gen::<f64>() * 2.0 - 1.0)
    }

    /// Samples a single value from N(0, 1) using the Box-Muller transform.
    fn sample_standard_normal<R: Rng>(rng: &mut R) -> f64 {
        // Both uniforms are drawn from (0, 1] to avoid ln(0).
        let u1: f64 = 1.0 - rng.gen::<f64>();
        let u2: f64 = 1.0 - rng.gen::<f64>();
        (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos()
    }

    /// Xavier (Glorot) initialization: N(0, sqrt(1 / cols)).
    ///
    /// Suited to Sigmoid/Identity layers. `cols` is the fan-in.
    pub fn xavier<R: Rng>(rows: usize, cols: usize, rng: &mut R) -> Matrix {
        let std_dev = (1.0 / cols.max(1) as f64).sqrt();
        Matrix::from_fn(rows, cols, |_, _| Matrix::sample_standard_normal(rng) * std_dev)
    }

    /// He initialization: N(0, sqrt(2 / cols)).
    ///
    /// Suited to ReLU layers, which zero half their inputs on average.
    pub fn he<R: Rng>(rows: usize, cols: usize, rng: &mut R) -> Matrix {
        let std_dev = (2.0 / cols.max(1) as f64).sqrt();
        Matrix::from_fn(rows, cols, |_, _| Matrix::sample_standard_normal(rng) * std_dev)
    }

    pub fn zeros_like(&self) -> Matrix {
        Matrix::zeros(self.rows, self.cols)
    }

    pub fn filled_like(&self, value: f64) -> Matrix {
        Matrix::filled(self.rows, self.cols, value)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Row-major view of the buffer.
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.data
    }

    pub fn to_vec(&self) -> Vec<f64> {
        self.data.clone()
    }

    fn check_index(&self, row: usize, col: usize) -> Result<usize> {
        if row >= self.rows || col >= self.cols {
            return Err(Error::IndexOutOfRange { row, col, rows: self.rows, cols: self.cols });
        }
        Ok(row * self.cols + col)
    }

    pub fn get(&self, row: usize, col: usize) -> Result<f64> {
        let k = self.check_index(row, col)?;
        Ok(self.data[k])
    }

    pub fn set(&mut self, row: usize, col: usize, value: f64) -> Result<()> {
        let k = self.check_index(row, col)?;
        self.data[k] = value;
        Ok(())
    }

    fn expect_shape(op: &'static str, m: &Matrix, expected: (usize, usize)) -> Result<()> {
        if m.shape() != expected {
            return Err(Error::mismatch(op, expected, m.shape()));
        }
        Ok(())
    }

    /// `result = self * b`.
    pub fn multiply_into(&self, b: &Matrix, result: &mut Matrix) -> Result<()> {
        const OP: &str = "multiply_into";
        Matrix::expect_shape(OP, b, (self.cols, b.cols))?;
        Matrix::expect_shape(OP, result, (self.rows, b.cols))?;

        for i in 0..self.rows {
            let lhs = &self.data[i * self.cols..(i + 1) * self.cols];
            for j in 0..b.cols {
                let mut sum = 0.0;
                for (k, &x) in lhs.iter().enumerate() {
                    sum += x * b.data[k * b.cols + j];
                }
                result.data[i * result.cols + j] = sum;
            }
        }
        Ok(())
    }

    /// `result = self * bᵗ` without materializing the transpose.
    pub fn multiply_transpose_right_into(&self, b: &Matrix, result: &mut Matrix) -> Result<()> {
        const OP: &str = "multiply_transpose_right_into";
        Matrix::expect_shape(OP, b, (b.rows, self.cols))?;
        Matrix::expect_shape(OP, result, (self.rows, b.rows))?;

        for i in 0..self.rows {
            let lhs = &self.data[i * self.cols..(i + 1) * self.cols];
            for j in 0..b.rows {
                let rhs = &b.data[j * b.cols..(j + 1) * b.cols];
                let sum: f64 = lhs.iter().zip(rhs).map(|(x, y)| x * y).sum();
                result.data[i * result.cols + j] = sum;
            }
        }
        Ok(())
    }

    /// `result = selfᵗ * b` without materializing the transpose.
    pub fn transpose_multiply_into(&self, b: &Matrix, result: &mut Matrix) -> Result<()> {
        const OP: &str = "transpose_multiply_into";
        Matrix::expect_shape(OP, b, (self.rows, b.cols))?;
        Matrix::expect_shape(OP, result, (self.cols, b.cols))?;

        for i in 0..self.cols {
            for j in 0..b.cols {
                let mut sum = 0.0;
                for k in 0..self.rows {
                    sum += self.data[k * self.cols + i] * b.data[k * b.cols + j];
                }
                result.data[i * result.cols + j] = sum;
            }
        }
        Ok(())
    }

    /// `result[k] = f(self[k], b[k])`; all three must share a shape.
    pub fn elementwise_into<F>(&self, b: &Matrix, result: &mut Matrix, f: F) -> Result<()>
    where
        F: Fn(f64, f64) -> f64,
    {
        const OP: &str = "elementwise_into";
        Matrix::expect_shape(OP, b, self.shape())?;
        Matrix::expect_shape(OP, result, self.shape())?;

        for ((out, &x), &y) in result.data.iter_mut().zip(&self.data).zip(&b.data) {
            *out = f(x, y);
        }
        Ok(())
    }

    /// Element-wise (Hadamard) product.
    pub fn hadamard_into(&self, b: &Matrix, result: &mut Matrix) -> Result<()> {
        self.elementwise_into(b, result, |x, y| x * y)
    }

    /// In-place binary map: `self[k] = f(self[k], b[k])`.
    pub fn zip_apply<F>(&mut self, b: &Matrix, f: F) -> Result<()>
    where
        F: Fn(f64, f64) -> f64,
    {
        Matrix::expect_shape("zip_apply", b, self.shape())?;
        for (x, &y) in self.data.iter_mut().zip(&b.data) {
            *x = f(*x, y);
        }
        Ok(())
    }

    /// In-place unary map over every element.
    pub fn apply<F>(&mut self, f: F)
    where
        F: Fn(f64) -> f64,
    {
        for x in &mut self.data {
            *x = f(*x);
        }
    }

    pub fn map<F>(&self, f: F) -> Matrix
    where
        F: Fn(f64) -> f64,
    {
        Matrix {
            rows: self.rows,
            cols: self.cols,
            data: self.data.iter().map(|&x| f(x)).collect(),
        }
    }

    /// `self[k] += b[k]`.
    pub fn accumulate_into(&mut self, b: &Matrix) -> Result<()> {
        Matrix::expect_shape("accumulate_into", b, self.shape())?;
        for (x, &y) in self.data.iter_mut().zip(&b.data) {
            *x += y;
        }
        Ok(())
    }

    /// `self[k] += alpha * b[k]`.
    pub fn scaled_add(&mut self, b: &Matrix, alpha: f64) -> Result<()> {
        Matrix::expect_shape("scaled_add", b, self.shape())?;
        for (x, &y) in self.data.iter_mut().zip(&b.data) {
            *x += alpha * y;
        }
        Ok(())
    }

    pub fn scale(&mut self, c: f64) {
        self.apply(|x| x * c);
    }

    pub fn fill(&mut self, value: f64) {
        self.data.iter_mut().for_each(|x| *x = value);
    }

    /// Overwrites `self` with the contents of a same-shape matrix.
    pub fn copy_from(&mut self, b: &Matrix) -> Result<()> {
        Matrix::expect_shape("copy_from", b, self.shape())?;
        self.data.copy_from_slice(&b.data);
        Ok(())
    }

    pub fn transpose(&self) -> Matrix {
        let mut res = Matrix::zeros(self.cols, self.rows);
        for i in 0..self.rows {
            for j in 0..self.cols {
                res.data[j * res.cols + i] = self.data[i * self.cols + j];
            }
        }
        res
    }

    pub fn sum(&self) -> f64 {
        self.data.iter().sum()
    }

    /// Largest element, or `None` for an empty matrix.
    pub fn max(&self) -> Option<f64> {
        self.data.iter().copied().reduce(f64::max)
    }

    /// Row-major index of the first maximum element.
    pub fn argmax(&self) -> Option<usize> {
        let mut best: Option<(usize, f64)> = None;
        for (k, &x) in self.data.iter().enumerate() {
            match best {
                Some((_, b)) if x <= b => {}
                _ => best = Some((k, x)),
            }
        }
        best.map(|(k, _)| k)
    }
}

impl Default for Matrix {
    fn default() -> Self {
        Matrix { rows: 0, cols: 0, data: vec![] }
    }
}

impl fmt::Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Matrix {}x{}:", self.rows, self.cols)?;

        let shown_rows = self.rows.min(DISPLAY_LIMIT);
        let shown_cols = self.cols.min(DISPLAY_LIMIT);

        for i in 0..shown_rows {
            for j in 0..shown_cols {
                write!(f, "{:.3e} ", self.data[i * self.cols + j])?;
            }
            if self.cols > DISPLAY_LIMIT {
                write!(f, "... ")?;
            }
            writeln!(f)?;
        }

        if self.rows > DISPLAY_LIMIT {
            for _ in 0..shown_cols {
                write!(f, "... ")?;
            }
            if self.cols > DISPLAY_LIMIT {
                write!(f, "... ")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn m(rows: &[&[f64]]) -> Matrix {
        Matrix::from_rows(&rows.iter().map(|r| r.to_vec()).collect::<Vec<_>>()).unwrap()
    }

    #[test]
    fn from_vec_rejects_wrong_length() {
        assert!(matches!(
            Matrix::from_vec(2, 3, vec![0.0; 5]),
            Err(Error::DimensionMismatch { .. })
        ));
        assert!(Matrix::from_vec(2, 3, vec![0.0; 6]).is_ok());
    }

    #[test]
    fn from_rows_rejects_ragged_input() {
        let ragged = vec![vec![1.0, 2.0], vec![3.0]];
        assert!(Matrix::from_rows(&ragged).is_err());
    }

    #[test]
    fn from_fn_fills_row_major() {
        let a = Matrix::from_fn(2, 3, |i, j| (i * 10 + j) as f64);
        assert_eq!(a.as_slice(), &[0.0, 1.0, 2.0, 10.0, 11.0, 12.0]);
    }

    #[test]
    fn transpose_swaps_shape_and_elements() {
        let a = m(&[&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0]]);
        let t = a.transpose();
        assert_eq!(t.shape(), (3, 2));
        assert_eq!(t.get(2, 1).unwrap(), 6.0);
        assert_eq!(t.get(0, 1).unwrap(), 4.0);
    }

    #[test]
    fn seeded_initializers_are_reproducible() {
        let a = Matrix::xavier(4, 3, &mut StdRng::seed_from_u64(7));
        let b = Matrix::xavier(4, 3, &mut StdRng::seed_from_u64(7));
        assert_eq!(a, b);

        let u = Matrix::random_uniform(10, 10, &mut StdRng::seed_from_u64(1));
        assert!(u.as_slice().iter().all(|&x| (-1.0..1.0).contains(&x)));
    }

    #[test]
    fn argmax_returns_first_maximum() {
        let a = Matrix::column(&[0.1, 0.7, 0.7, 0.2]);
        assert_eq!(a.argmax(), Some(1));
        assert_eq!(a.max(), Some(0.7));
        assert_eq!(Matrix::default().argmax(), None);
    }

    #[test]
    fn scaled_add_and_scale() {
        let mut a = Matrix::filled(2, 2, 1.0);
        let b = Matrix::filled(2, 2, 2.0);
        a.scaled_add(&b, -0.5).unwrap();
        assert!(a.as_slice().iter().all(|&x| x == 0.0));

        let mut c = Matrix::filled(1, 3, 2.0);
        c.scale(1.5);
        assert_eq!(c.as_slice(), &[3.0, 3.0, 3.0]);

        assert!(a.scaled_add(&Matrix::zeros(2, 1), 1.0).is_err());
    }

    #[test]
    fn display_truncates_large_matrices() {
        let small = format!("{}", Matrix::filled(1, 2, 1.0));
        assert_eq!(small, "Matrix 1x2:\n1.000e0 1.000e0 \n");

        let big = format!("{}", Matrix::zeros(7, 8));
        let lines: Vec<&str> = big.lines().collect();
        assert_eq!(lines[0], "Matrix 7x8:");
        // Header, five rows, one elision row.
        assert_eq!(lines.len(), 7);
        assert!(lines[1].ends_with("... "));
        assert_eq!(lines[6], "... ... ... ... ... ... ");
    }
}
