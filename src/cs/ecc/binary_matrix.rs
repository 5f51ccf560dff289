//! Dense binary matrices over GF(2).
//!
//! GF(2) is the two-element field {0, 1}, where addition is XOR and
//! multiplication is AND. Every linear block code is defined by matrices over
//! this field: a source row vector times the generator matrix gives a
//! codeword, and a received row vector times the transposed parity-check
//! matrix gives its syndrome.
//!
//! Elements are stored one per byte in an `ndarray::Array2<u8>`, always
//! holding 0 or 1. The shape is fixed at construction.

use crate::cs::ecc::Result;
use crate::error::Error;
use ndarray::Array2;
use std::fmt;

/// A rectangular matrix whose elements are in GF(2).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BinaryMatrix {
    /// Row-major elements, each 0 or 1
    elements: Array2<u8>,
}

impl BinaryMatrix {
    /// Creates a matrix from its rows.
    ///
    /// # Arguments
    ///
    /// * `rows` - The rows of the matrix, each holding one element per column
    ///
    /// # Returns
    ///
    /// The matrix, or `InvalidShape` if there are no rows, a row is empty or
    /// the rows differ in length, and `InvalidValue` if an element is not a bit
    pub fn from_rows<R: AsRef<[u8]>>(rows: &[R]) -> Result<Self> {
        let first = rows.first().ok_or_else(|| {
            Error::InvalidShape("A matrix must have at least one row".to_string())
        })?;

        let cols = first.as_ref().len();
        if cols == 0 {
            return Err(Error::InvalidShape(
                "A matrix must have at least one column".to_string(),
            ));
        }

        for (i, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.len() != cols {
                return Err(Error::InvalidShape(format!(
                    "Row {} has {} columns, expected {}",
                    i,
                    row.len(),
                    cols
                )));
            }

            if let Some(&value) = row.iter().find(|&&v| v > 1) {
                return Err(Error::InvalidValue(value));
            }
        }

        let elements = Array2::from_shape_fn((rows.len(), cols), |(r, c)| rows[r].as_ref()[c]);
        Ok(Self { elements })
    }

    /// Creates a 1xN row vector from a sequence of bits
    pub fn row_vector(bits: &[u8]) -> Result<Self> {
        Self::from_rows(&[bits])
    }

    /// Creates an all-zero matrix of the given dimensions
    pub fn zeros(rows: usize, cols: usize) -> Result<Self> {
        if rows == 0 || cols == 0 {
            return Err(Error::InvalidShape(format!(
                "Cannot create a {}x{} matrix",
                rows, cols
            )));
        }

        Ok(Self {
            elements: Array2::zeros((rows, cols)),
        })
    }

    /// Builds a matrix from a fixed-size table known to be valid.
    ///
    /// Both dimensions of `table` must be non-zero. Elements are reduced to
    /// their lowest bit.
    pub(crate) fn from_table<const R: usize, const C: usize>(table: &[[u8; C]; R]) -> Self {
        Self {
            elements: Array2::from_shape_fn((R, C), |(r, c)| table[r][c] & 1),
        }
    }

    /// Number of rows
    pub fn rows(&self) -> usize {
        self.elements.nrows()
    }

    /// Number of columns
    pub fn cols(&self) -> usize {
        self.elements.ncols()
    }

    fn check_index(&self, row: usize, col: usize) -> Result<()> {
        if row >= self.rows() || col >= self.cols() {
            return Err(Error::IndexOutOfRange {
                row,
                col,
                rows: self.rows(),
                cols: self.cols(),
            });
        }

        Ok(())
    }

    /// Gets the element at (`row`, `col`), both 0-based
    pub fn get(&self, row: usize, col: usize) -> Result<u8> {
        self.check_index(row, col)?;
        Ok(self.elements[[row, col]])
    }

    /// Sets the element at (`row`, `col`), both 0-based, to `value` (0 or 1)
    pub fn set(&mut self, row: usize, col: usize, value: u8) -> Result<()> {
        self.check_index(row, col)?;

        if value > 1 {
            return Err(Error::InvalidValue(value));
        }

        self.elements[[row, col]] = value;
        Ok(())
    }

    /// Returns a copy of the given row.
    ///
    /// The returned vector does not alias the matrix: changing it leaves the
    /// matrix untouched.
    pub fn row(&self, row: usize) -> Result<Vec<u8>> {
        self.check_index(row, 0)?;
        Ok(self.elements.row(row).to_vec())
    }

    /// Computes the product `self * other` over GF(2).
    ///
    /// Each element of the result is the XOR, over k, of
    /// `self[i][k] AND other[k][j]`.
    ///
    /// # Returns
    ///
    /// A new `rows() x other.cols()` matrix, or `DimensionMismatch` if the
    /// number of columns of `self` differs from the number of rows of `other`
    pub fn multiply(&self, other: &BinaryMatrix) -> Result<BinaryMatrix> {
        if self.cols() != other.rows() {
            return Err(Error::DimensionMismatch(format!(
                "Cannot multiply a {}x{} matrix by a {}x{} matrix",
                self.rows(),
                self.cols(),
                other.rows(),
                other.cols()
            )));
        }

        let elements = Array2::from_shape_fn((self.rows(), other.cols()), |(i, j)| {
            self.elements
                .row(i)
                .iter()
                .zip(other.elements.column(j).iter())
                .fold(0u8, |acc, (&a, &b)| acc ^ (a & b))
        });

        Ok(BinaryMatrix { elements })
    }

    /// Computes the element-wise sum `self + other` over GF(2).
    ///
    /// Addition and subtraction coincide in GF(2), so this is also the
    /// difference of both matrices.
    ///
    /// # Returns
    ///
    /// A new matrix, or `DimensionMismatch` if the row counts or the column
    /// counts differ
    #[allow(clippy::should_implement_trait)]
    pub fn add(&self, other: &BinaryMatrix) -> Result<BinaryMatrix> {
        if self.elements.dim() != other.elements.dim() {
            return Err(Error::DimensionMismatch(format!(
                "Cannot add a {}x{} matrix to a {}x{} matrix",
                self.rows(),
                self.cols(),
                other.rows(),
                other.cols()
            )));
        }

        Ok(BinaryMatrix {
            elements: &self.elements ^ &other.elements,
        })
    }

    /// Whether every element is 0
    pub fn is_zero(&self) -> bool {
        self.elements.iter().all(|&v| v == 0)
    }

    /// Hamming weight: the number of elements set to 1
    pub fn weight(&self) -> usize {
        self.elements.iter().filter(|&&v| v == 1).count()
    }
}

impl fmt::Display for BinaryMatrix {
    /// Formats the matrix as nested rows, e.g. `[[1, 0], [0, 1]]`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, row) in self.elements.rows().into_iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }

            write!(f, "[")?;
            for (j, value) in row.iter().enumerate() {
                if j > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{}", value)?;
            }
            write!(f, "]")?;
        }
        write!(f, "]")
    }
}
