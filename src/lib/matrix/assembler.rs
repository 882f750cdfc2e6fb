//! Single-pass assembly of the sparse cell-by-peak count matrix.
//!
//! The builder consumes peak-annotated fragment lines exactly once,
//! interning barcodes and peaks into dense ids as they appear and
//! accumulating counts in a map keyed by `(row, col)`. Accumulating before
//! materialization keeps the duplicate rule explicit: a barcode/peak pair
//! seen across N accepted lines yields a matrix entry of N, never a
//! last-write-wins value.

use csv::StringRecord;
use nalgebra_sparse::CsrMatrix;
use rayon::prelude::*;
use rustc_hash::FxHashMap;

use crate::core::error::{ChromcatError, Result};
use crate::core::sparse::from_triplets_f32;
use crate::matrix::index::{BarcodeIndex, PeakIndex, PeakKey};

/// Marker emitted by the upstream peak intersection for fragments that
/// overlap no peak.
pub const NO_PEAK_SENTINEL: &str = ".";

/// Minimum fields in a peak-annotated fragment line: fragment chrom, start,
/// end, barcode, then peak chrom, start, end.
const ANNOTATED_FIELDS: usize = 7;

const BARCODE_FIELD: usize = 3;
const PEAK_CHROM_FIELD: usize = 4;
const PEAK_START_FIELD: usize = 5;
const PEAK_END_FIELD: usize = 6;

/// A fragment line carrying its intersected peak.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotatedFragment {
    pub barcode: String,
    pub peak: PeakKey,
}

impl AnnotatedFragment {
    /// Parse one peak-annotated line.
    ///
    /// Returns `Ok(None)` for sentinel lines (no peak overlap); those
    /// register nothing downstream, not even the barcode. Missing fields
    /// or unparseable peak coordinates are fatal.
    pub fn parse(record: &StringRecord) -> Result<Option<Self>> {
        let peak_chrom = record
            .get(PEAK_CHROM_FIELD)
            .ok_or_else(|| too_few_fields(record))?;
        if peak_chrom == NO_PEAK_SENTINEL {
            return Ok(None);
        }
        if record.len() < ANNOTATED_FIELDS {
            return Err(too_few_fields(record));
        }

        let barcode = record
            .get(BARCODE_FIELD)
            .ok_or_else(|| too_few_fields(record))?
            .to_string();
        let peak = PeakKey {
            chrom: peak_chrom.to_string(),
            start: parse_coordinate(record, PEAK_START_FIELD)?,
            end: parse_coordinate(record, PEAK_END_FIELD)?,
        };

        Ok(Some(Self { barcode, peak }))
    }
}

fn too_few_fields(record: &StringRecord) -> ChromcatError {
    ChromcatError::MalformedRecord(format!(
        "expected at least {} tab-delimited fields, got {}",
        ANNOTATED_FIELDS,
        record.len()
    ))
}

fn parse_coordinate(record: &StringRecord, field: usize) -> Result<u64> {
    let raw = record.get(field).ok_or_else(|| too_few_fields(record))?;
    raw.trim().parse::<u64>().map_err(|_| {
        ChromcatError::MalformedRecord(format!("unparseable peak coordinate {:?}", raw))
    })
}

/// Accumulates barcode/peak observations across a single pass over the
/// annotated fragment stream.
#[derive(Debug, Default)]
pub struct CountMatrixBuilder {
    barcodes: BarcodeIndex,
    peaks: PeakIndex,
    counts: FxHashMap<(u32, u32), u32>,
    accepted: u64,
}

impl CountMatrixBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Consume one line from the annotated fragment stream.
    ///
    /// Sentinel lines are discarded whole before any indexing occurs.
    pub fn observe(&mut self, record: &StringRecord) -> Result<()> {
        if let Some(fragment) = AnnotatedFragment::parse(record)? {
            self.observe_fragment(&fragment);
        }
        Ok(())
    }

    /// Register one accepted fragment against its barcode and peak.
    pub fn observe_fragment(&mut self, fragment: &AnnotatedFragment) {
        let row = self.barcodes.intern(&fragment.barcode);
        let col = self.peaks.intern(&fragment.peak);
        *self.counts.entry((row, col)).or_insert(0) += 1;
        self.accepted += 1;
    }

    /// Number of accepted (non-sentinel) lines so far.
    pub fn accepted(&self) -> u64 {
        self.accepted
    }

    /// Materialize the compressed matrix and its aligned metadata tables.
    ///
    /// Zero accepted lines yield a (0, 0) matrix with empty tables.
    pub fn finalize(self) -> Result<CountMatrix> {
        let nrows = self.barcodes.len();
        let ncols = self.peaks.len();

        let mut triplets: Vec<(usize, usize, f32)> = self
            .counts
            .into_iter()
            .map(|((row, col), count)| (row as usize, col as usize, count as f32))
            .collect();
        triplets.par_sort_unstable_by(|a, b| a.0.cmp(&b.0).then(a.1.cmp(&b.1)));

        let counts = from_triplets_f32(nrows, ncols, triplets)?;
        CountMatrix::new(counts, self.barcodes.into_keys(), self.peaks.into_keys())
    }
}

/// A compressed cell-by-peak accessibility matrix with aligned metadata.
///
/// Row i of the matrix and entry i of the barcode table refer to the same
/// cell; likewise for columns and peaks.
#[derive(Debug, Clone)]
pub struct CountMatrix {
    counts: CsrMatrix<f32>,
    barcodes: Vec<String>,
    peaks: Vec<PeakKey>,
}

impl CountMatrix {
    /// Bundle a matrix with its row/column tables, enforcing alignment.
    pub fn new(counts: CsrMatrix<f32>, barcodes: Vec<String>, peaks: Vec<PeakKey>) -> Result<Self> {
        if counts.nrows() != barcodes.len() || counts.ncols() != peaks.len() {
            return Err(ChromcatError::DimensionMismatch {
                expected: format!("{}×{}", barcodes.len(), peaks.len()),
                actual: format!("{}×{}", counts.nrows(), counts.ncols()),
            });
        }
        Ok(Self {
            counts,
            barcodes,
            peaks,
        })
    }

    pub fn counts(&self) -> &CsrMatrix<f32> {
        &self.counts
    }

    /// Observation table: row id to barcode, in row order.
    pub fn barcodes(&self) -> &[String] {
        &self.barcodes
    }

    /// Variable table: column id to peak region, in column order.
    pub fn peaks(&self) -> &[PeakKey] {
        &self.peaks
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.counts.nrows(), self.counts.ncols())
    }

    pub fn nnz(&self) -> usize {
        self.counts.nnz()
    }

    /// Stored count at (row, col), zero when the entry is not present.
    pub fn get(&self, row: usize, col: usize) -> f32 {
        self.counts
            .get_entry(row, col)
            .map(|entry| entry.into_value())
            .unwrap_or(0.0)
    }
}
