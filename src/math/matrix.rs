use serde::{Serialize, Deserialize};

/// Dense row-major matrix. A layer's weights are stored as
/// (inputs × outputs), so row `i` holds every weight leaving input `i`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Matrix{
    pub rows: usize,
    pub cols: usize,
    pub data: Vec<Vec<f64>>
}

impl Matrix{
    pub fn zeros(rows: usize, cols: usize) -> Matrix {
        Matrix{
            rows,
            cols,
            data: vec![vec![0.0; cols]; rows]
        }
    }

    pub fn from_fn<F>(rows: usize, cols: usize, mut functor: F) -> Matrix
    where
        F: FnMut(usize, usize) -> f64,
    {
        let data = (0..rows)
            .map(|i| (0..cols).map(|j| functor(i, j)).collect())
            .collect();
        Matrix { rows, cols, data }
    }

    /// Builds a matrix from nested rows. Returns `None` for ragged input.
    pub fn from_data(data: Vec<Vec<f64>>) -> Option<Matrix> {
        let cols = data.first().map_or(0, Vec::len);
        if data.iter().any(|row| row.len() != cols) {
            return None;
        }
        Some(Matrix {
            rows: data.len(),
            cols,
            data
        })
    }

    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.data[row][col]
    }

    pub fn set(&mut self, row: usize, col: usize, value: f64) {
        self.data[row][col] = value;
    }

    /// Row vector times matrix: `out[j] = Σ_i v[i] * self[i][j]`.
    /// The caller guarantees `v.len() == self.rows`.
    pub fn vec_mul(&self, v: &[f64]) -> Vec<f64> {
        debug_assert_eq!(v.len(), self.rows);
        let mut out = vec![0.0; self.cols];
        for (x, row) in v.iter().zip(self.data.iter()) {
            for (acc, w) in out.iter_mut().zip(row.iter()) {
                *acc += x * w;
            }
        }
        out
    }

    /// Matrix times column vector: `out[i] = Σ_j self[i][j] * v[j]`.
    /// The caller guarantees `v.len() == self.cols`.
    pub fn mul_vec(&self, v: &[f64]) -> Vec<f64> {
        debug_assert_eq!(v.len(), self.cols);
        self.data
            .iter()
            .map(|row| row.iter().zip(v.iter()).map(|(w, x)| w * x).sum::<f64>())
            .collect()
    }

    /// Outer product `a ⊗ b`, shape (a.len() × b.len()).
    pub fn outer(a: &[f64], b: &[f64]) -> Matrix {
        Matrix::from_fn(a.len(), b.len(), |i, j| a[i] * b[j])
    }

    /// Applies `functor(self[i][j], other[i][j])` in place.
    /// Both matrices must have the same shape.
    pub fn zip_apply<F>(&mut self, other: &Matrix, mut functor: F)
    where
        F: FnMut(&mut f64, f64),
    {
        debug_assert_eq!((self.rows, self.cols), (other.rows, other.cols));
        for (row, other_row) in self.data.iter_mut().zip(other.data.iter()) {
            for (x, &y) in row.iter_mut().zip(other_row.iter()) {
                functor(x, y);
            }
        }
    }

    /// Flattens column by column, the order used when reporting a layer's
    /// weights one output neuron at a time.
    pub fn to_column_major(&self) -> Vec<f64> {
        (0..self.cols)
            .flat_map(|j| self.data.iter().map(move |row| row[j]))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.rows * self.cols
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
