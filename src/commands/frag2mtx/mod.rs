mod args;

use anyhow::{Context, Result};
use chromcat_lib::core::concurrency::configure_global_thread_pool;
use chromcat_lib::core::io::{fragment_reader, make_parent_dirs};
use chromcat_lib::core::sparse::density_stats;
use chromcat_lib::matrix::anndata_output::write_count_matrix;
use chromcat_lib::matrix::CountMatrixBuilder;
use log::info;

pub use args::Frag2MtxArgs;

/// Entry point for the `frag2mtx` command.
///
/// Consumes the annotated fragment stream exactly once, jointly interning
/// barcode/peak ids and accumulating counts, then materializes the sparse
/// matrix and writes the H5AD artifact.
pub fn run_frag2mtx(args: Frag2MtxArgs) -> Result<()> {
    configure_global_thread_pool(args.threads)?;
    make_parent_dirs(&args.output)?;

    match &args.fragments {
        Some(path) => info!("Reading peak-annotated fragments from {:?}", path),
        None => info!("Reading peak-annotated fragments from stdin"),
    }
    let mut reader = fragment_reader(&args.fragments)?;

    let mut builder = CountMatrixBuilder::new();
    for result in reader.records() {
        let record = result.context("Failed to read fragment line")?;
        builder.observe(&record)?;
    }
    let accepted = builder.accepted();

    let matrix = builder.finalize()?;
    let (n_cells, n_peaks) = matrix.shape();
    let (density, nnz, _) = density_stats(matrix.counts());
    info!(
        "Created count matrix: {} cells × {} peaks from {} accepted fragments ({} stored counts, density {:.4})",
        n_cells, n_peaks, accepted, nnz, density
    );

    write_count_matrix(&matrix, &args.output)?;
    info!("Wrote matrix to {:?}", args.output);

    Ok(())
}
