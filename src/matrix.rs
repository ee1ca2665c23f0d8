use std::ops::{Index, IndexMut};

use crate::error::ConfigurationError;
use crate::weights::WeightSource;

/// A dense matrix of `f64` values, stored in row-major order.
///
/// Dimensions are fixed at construction; the connection math relies on them
/// never changing.
#[derive(Clone, Debug, PartialEq)]
pub struct Mat {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl Mat {
    /// Creates a `rows` by `cols` matrix of zeros.
    pub fn zeros(rows: usize, cols: usize) -> Mat {
        Mat {
            rows,
            cols,
            data: vec![0.0; rows * cols],
        }
    }

    /// Creates a `rows` by `cols` matrix filled from `source`, drawing each
    /// entry in row-major order with the given `fan_in`.
    pub fn random(
        rows: usize,
        cols: usize,
        fan_in: usize,
        source: &mut WeightSource,
    ) -> Result<Mat, ConfigurationError> {
        let mut data = Vec::with_capacity(rows * cols);
        for _ in 0..(rows * cols) {
            data.push(source.next_weight(fan_in)?);
        }
        Ok(Mat { rows, cols, data })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Iterates over the rows of the matrix as mutable slices.
    pub fn row_iter_mut(&mut self) -> impl Iterator<Item = &mut [f64]> {
        self.data.chunks_mut(self.cols)
    }

    /// Returns a new matrix that is the transpose of this one.
    pub fn transposed(&self) -> Mat {
        let mut result = Mat::zeros(self.cols, self.rows);
        for (row, values) in self.data.chunks(self.cols).enumerate() {
            for (col, value) in values.iter().enumerate() {
                result[(col, row)] = *value;
            }
        }
        result
    }
}

impl Index<(usize, usize)> for Mat {
    type Output = f64;

    fn index(&self, (row, col): (usize, usize)) -> &f64 {
        &self.data[row * self.cols + col]
    }
}

impl IndexMut<(usize, usize)> for Mat {
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut f64 {
        &mut self.data[row * self.cols + col]
    }
}
