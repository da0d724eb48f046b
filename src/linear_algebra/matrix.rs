use std::fmt;
use std::ops::{Index, IndexMut};

use serde::{Deserialize, Serialize};

use crate::error::NetworkError;

use super::{Value, Vector};

/// A dense row-major runtime-shaped matrix.
#[derive(Clone, Deserialize, PartialEq, Serialize)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    values: Vec<Value>,
}

impl Matrix {
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            values: vec![0.0; rows * cols],
        }
    }

    /// Fills a matrix row by row from successive calls to `f`.
    pub fn from_fn(rows: usize, cols: usize, mut f: impl FnMut() -> Value) -> Self {
        Self {
            rows,
            cols,
            values: (0..rows * cols).map(|_| f()).collect(),
        }
    }

    pub fn from_rows(rows: Vec<Vec<Value>>) -> Result<Self, NetworkError> {
        let row_count = rows.len();
        let col_count = rows.first().map(Vec::len).unwrap_or(0);

        let mut values = Vec::with_capacity(row_count * col_count);
        for row in rows {
            if row.len() != col_count {
                return Err(NetworkError::ShapeMismatch {
                    expected: col_count,
                    actual: row.len(),
                });
            }
            values.extend(row);
        }

        Ok(Self {
            rows: row_count,
            cols: col_count,
            values,
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.values.iter()
    }

    pub fn values_mut(&mut self) -> impl Iterator<Item = &mut Value> {
        self.values.iter_mut()
    }

    /// Matrix-vector product; `rhs` must have length `cols`.
    pub fn mul_vector(&self, rhs: &Vector) -> Result<Vector, NetworkError> {
        if rhs.len() != self.cols {
            return Err(NetworkError::ShapeMismatch {
                expected: self.cols,
                actual: rhs.len(),
            });
        }

        let values = self
            .values
            .chunks_exact(self.cols)
            .map(|row| row.iter().zip(rhs.iter()).map(|(w, x)| w * x).sum())
            .collect();

        Ok(Vector::from_values(values))
    }

    pub fn transpose(&self) -> Self {
        let mut transposed = Self::zeros(self.cols, self.rows);
        for row in 0..self.rows {
            for col in 0..self.cols {
                transposed.values[col * self.rows + row] = self.values[row * self.cols + col];
            }
        }
        transposed
    }

    /// The outer product `column · rowᵀ`, shaped `column.len() × row.len()`.
    pub fn outer(column: &Vector, row: &Vector) -> Self {
        let values = column
            .iter()
            .flat_map(|a| row.iter().map(move |b| a * b))
            .collect();

        Self {
            rows: column.len(),
            cols: row.len(),
            values,
        }
    }

    pub fn add_assign(&mut self, rhs: &Self) -> Result<(), NetworkError> {
        self.check_shape(rhs)?;
        for (a, b) in self.values.iter_mut().zip(&rhs.values) {
            *a += b;
        }
        Ok(())
    }

    pub fn scaled_sub_assign(&mut self, rhs: &Self, scale: Value) -> Result<(), NetworkError> {
        self.check_shape(rhs)?;
        for (a, b) in self.values.iter_mut().zip(&rhs.values) {
            *a -= b * scale;
        }
        Ok(())
    }

    fn check_shape(&self, rhs: &Self) -> Result<(), NetworkError> {
        if self.rows != rhs.rows {
            return Err(NetworkError::ShapeMismatch {
                expected: self.rows,
                actual: rhs.rows,
            });
        }
        if self.cols != rhs.cols {
            return Err(NetworkError::ShapeMismatch {
                expected: self.cols,
                actual: rhs.cols,
            });
        }
        Ok(())
    }
}

impl Index<usize> for Matrix {
    type Output = [Value];

    fn index(&self, row: usize) -> &Self::Output {
        &self.values[row * self.cols..(row + 1) * self.cols]
    }
}

impl IndexMut<usize> for Matrix {
    fn index_mut(&mut self, row: usize) -> &mut Self::Output {
        &mut self.values[row * self.cols..(row + 1) * self.cols]
    }
}

impl fmt::Debug for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..self.rows {
            write!(f, "{}", if row == 0 { "[" } else { " " })?;
            for col in 0..self.cols {
                self[row][col].fmt(f)?;
                if col < self.cols - 1 {
                    write!(f, " ")?;
                }
            }
            write!(f, "{}", if row < self.rows - 1 { "\n" } else { "]" })?;
        }
        Ok(())
    }
}
