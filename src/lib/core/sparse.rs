//! Sparse matrix helpers backing the count matrix assembly path.

use itertools::Itertools;
use nalgebra_sparse::{CooMatrix, CsrMatrix};

use crate::core::error::{ChromcatError, Result};

/// Create a CSR matrix from (row, col, value) triplets.
///
/// The COO to CSR conversion sums duplicate coordinates. Callers that need
/// exact per-entry counts pre-accumulate their triplets so the summation
/// rule stays explicit at the call site.
pub fn from_triplets_f32(
    nrows: usize,
    ncols: usize,
    triplets: Vec<(usize, usize, f32)>,
) -> Result<CsrMatrix<f32>> {
    if triplets.is_empty() {
        return Ok(CsrMatrix::zeros(nrows, ncols));
    }

    for &(row, col, _) in &triplets {
        if row >= nrows || col >= ncols {
            return Err(ChromcatError::InvalidInput(format!(
                "Index ({}, {}) exceeds matrix dimensions ({}, {})",
                row, col, nrows, ncols
            )));
        }
    }

    let (row_indices, col_indices, values): (Vec<_>, Vec<_>, Vec<_>) =
        triplets.into_iter().multiunzip();

    let coo = CooMatrix::try_from_triplets(nrows, ncols, row_indices, col_indices, values)
        .map_err(|e| ChromcatError::SparseMatrix(format!("COO creation failed: {:?}", e)))?;

    Ok(CsrMatrix::from(&coo))
}

/// Density, nonzero count, and total element count for a matrix.
pub fn density_stats(matrix: &CsrMatrix<f32>) -> (f64, usize, usize) {
    let total_elements = matrix.nrows() * matrix.ncols();
    let nnz = matrix.nnz();
    let density = if total_elements > 0 {
        nnz as f64 / total_elements as f64
    } else {
        0.0
    };
    (density, nnz, total_elements)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_triplets_yield_zero_matrix() {
        let matrix = from_triplets_f32(0, 0, Vec::new()).unwrap();
        assert_eq!(matrix.nrows(), 0);
        assert_eq!(matrix.ncols(), 0);
        assert_eq!(matrix.nnz(), 0);
    }

    #[test]
    fn duplicate_coordinates_are_summed() {
        let triplets = vec![(0, 1, 1.0), (0, 1, 1.0), (1, 0, 1.0)];
        let matrix = from_triplets_f32(2, 2, triplets).unwrap();
        assert_eq!(matrix.nnz(), 2);
        let entry = matrix.get_entry(0, 1).unwrap().into_value();
        assert_eq!(entry, 2.0);
    }

    #[test]
    fn out_of_bounds_indices_are_rejected() {
        let triplets = vec![(2, 0, 1.0)];
        assert!(from_triplets_f32(2, 2, triplets).is_err());
    }
}
