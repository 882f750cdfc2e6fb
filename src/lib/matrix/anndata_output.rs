//! AnnData (H5AD) output for assembled count matrices.

use anndata::data::array::dataframe::DataFrameIndex;
use anndata::{AnnData, AnnDataOp};
use anndata_hdf5::H5;
use anyhow::Result;
use log::info;
use polars::prelude::*;
use std::path::Path;

use crate::matrix::assembler::CountMatrix;

/// Write a [`CountMatrix`] to `output_path` as an `.h5ad` container.
///
/// The compressed matrix lands in `X`; barcodes become the obs index with a
/// `barcode` column, peaks become the var index with `chrom`/`start`/`end`
/// columns. Row i and obs entry i refer to the same cell, column j and var
/// entry j to the same peak.
pub fn write_count_matrix(matrix: &CountMatrix, output_path: &Path) -> Result<AnnData<H5>> {
    let (n_cells, n_peaks) = matrix.shape();
    info!(
        "Writing {} cells × {} peaks ({} stored counts) to {:?}",
        n_cells,
        n_peaks,
        matrix.nnz(),
        output_path
    );

    let adata = AnnData::<H5>::new(output_path)?;

    adata.set_x(matrix.counts().clone())?;

    let obs_names: DataFrameIndex = matrix.barcodes().iter().cloned().collect();
    let var_names: DataFrameIndex = matrix.peaks().iter().map(|peak| peak.to_string()).collect();
    adata.set_obs_names(obs_names)?;
    adata.set_var_names(var_names)?;

    let obs = DataFrame::new(vec![Series::new(
        "barcode".into(),
        matrix.barcodes().to_vec(),
    )
    .into()])?;

    let chroms: Vec<String> = matrix.peaks().iter().map(|p| p.chrom.clone()).collect();
    let starts: Vec<u64> = matrix.peaks().iter().map(|p| p.start).collect();
    let ends: Vec<u64> = matrix.peaks().iter().map(|p| p.end).collect();
    let var = DataFrame::new(vec![
        Series::new("chrom".into(), chroms).into(),
        Series::new("start".into(), starts).into(),
        Series::new("end".into(), ends).into(),
    ])?;

    adata.set_obs(obs)?;
    adata.set_var(var)?;

    Ok(adata)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::assembler::CountMatrixBuilder;
    use csv::StringRecord;

    #[test]
    fn writes_matrix_with_aligned_tables() {
        let mut builder = CountMatrixBuilder::new();
        builder
            .observe(&StringRecord::from(vec![
                "chr1", "1004", "1195", "CELL1", "chr1", "1000", "1200",
            ]))
            .unwrap();
        let matrix = builder.finalize().unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("counts.h5ad");
        let adata = write_count_matrix(&matrix, &path).unwrap();

        assert_eq!(adata.n_obs(), 1);
        assert_eq!(adata.n_vars(), 1);
        assert!(path.exists());
    }
}
