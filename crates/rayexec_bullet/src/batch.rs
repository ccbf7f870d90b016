use crate::array::Array;
use rayexec_error::{RayexecError, Result};

/// A batch of same-length arrays.
#[derive(Debug, PartialEq)]
pub struct Batch {
    /// Columns that make up this batch.
    cols: Vec<Array>,

    /// Number of rows in this batch.
    num_rows: usize,
}

impl Batch {
    pub const fn empty() -> Self {
        Batch {
            cols: Vec::new(),
            num_rows: 0,
        }
    }

    /// Create a new batch from some number of arrays.
    ///
    /// All arrays should have the same length.
    pub fn try_new(cols: impl IntoIterator<Item = Array>) -> Result<Self> {
        let cols: Vec<_> = cols.into_iter().collect();
        let len = match cols.first() {
            Some(arr) => arr.len(),
            None => return Ok(Self::empty()),
        };

        for (idx, col) in cols.iter().enumerate() {
            if col.len() != len {
                return Err(RayexecError::new(format!(
                    "Expected column length to be {len}, got {}. Column idx: {idx}",
                    col.len()
                )));
            }
        }

        Ok(Batch {
            cols,
            num_rows: len,
        })
    }

    pub fn column(&self, idx: usize) -> Option<&Array> {
        self.cols.get(idx)
    }

    pub fn num_rows(&self) -> usize {
        self.num_rows
    }
}
