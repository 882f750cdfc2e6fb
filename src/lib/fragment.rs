//! Fragment extraction from paired-end chromatin accessibility alignments.
//!
//! This module exposes the [`ReadFilter`] trait with its default
//! flag/quality/insert-size implementation, and the [`FragmentExtractor`]
//! that turns qualifying alignments into Tn5-corrected per-cell fragments.
//!
//! Each qualifying read emits one fragment independently of its mate: when
//! both mates of a pair carry the barcode tag and pass the filter, two
//! fragment lines result. Downstream consumers are expected to tolerate
//! this double counting.

use rust_htslib::bam::record::{Aux, Record};
use serde::Serialize;

/// Canonical human contigs eligible for fragment extraction.
///
/// UCSC-named autosomes plus the sex chromosomes. Reads aligned anywhere
/// else (chrM, decoys, alternates, spike-ins) are dropped silently.
pub const STANDARD_CONTIGS: &[&str] = &[
    "chr1", "chr2", "chr3", "chr4", "chr5", "chr6", "chr7", "chr8", "chr9", "chr10", "chr11",
    "chr12", "chr13", "chr14", "chr15", "chr16", "chr17", "chr18", "chr19", "chr20", "chr21",
    "chr22", "chrX", "chrY",
];

/// Returns `true` when a contig name matches one of the canonical autosomes
/// or sex chromosomes listed in [`STANDARD_CONTIGS`].
#[inline]
pub fn is_standard_contig(name: &str) -> bool {
    STANDARD_CONTIGS.iter().any(|contig| *contig == name)
}

/// Tn5 transposase insertion offsets applied to fragment coordinates.
const TN5_FORWARD_OFFSET: i64 = 4;
const TN5_REVERSE_OFFSET: i64 = 5;

/// A per-cell chromatin accessibility fragment.
///
/// Serialized as a tab-delimited `chrom  start  end  barcode` line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FragmentRecord {
    pub chrom: String,
    pub start: i64,
    pub end: i64,
    pub barcode: String,
}

/// A trait for filtering reads based on various criteria.
///
/// Implementations should return `true` if the read passes the filter and
/// `false` otherwise.
pub trait ReadFilter {
    /// Filter a read based on various criteria.
    fn filter_read(&self, read: &Record) -> bool;
}

/// The fragment acceptance predicate for paired-end accessibility reads.
///
/// A read passes when it is part of a proper pair, neither it nor its mate
/// is unmapped, it is a primary alignment, its mapping quality exceeds
/// `min_mapq`, and its template length lies strictly between the insert
/// size bounds.
#[derive(Debug, Clone)]
pub struct FragmentFilter {
    /// Mapping quality a read must exceed to pass.
    min_mapq: u8,
    /// Exclusive lower bound on template length.
    min_insert_size: i64,
    /// Exclusive upper bound on template length.
    max_insert_size: i64,
}

impl FragmentFilter {
    /// Create a new [`FragmentFilter`] with the specified thresholds.
    pub fn new(min_mapq: u8, min_insert_size: i64, max_insert_size: i64) -> Self {
        Self {
            min_mapq,
            min_insert_size,
            max_insert_size,
        }
    }
}

impl Default for FragmentFilter {
    fn default() -> Self {
        Self::new(30, 10, 1000)
    }
}

impl ReadFilter for FragmentFilter {
    #[inline(always)]
    fn filter_read(&self, read: &Record) -> bool {
        read.is_proper_pair()
            && !read.is_unmapped()
            && !read.is_mate_unmapped()
            && !read.is_secondary()
            && !read.is_supplementary()
            && read.mapq() > self.min_mapq
            && read.insert_size() > self.min_insert_size
            && read.insert_size() < self.max_insert_size
    }
}

/// Turns qualifying alignments into [`FragmentRecord`]s.
///
/// The extractor owns the read filter and the barcode tag key. Records on
/// non-canonical contigs, records failing the filter, and records without
/// the barcode tag are skipped silently; only structural faults abort a
/// run, and those surface from the BAM reader before extraction.
pub struct FragmentExtractor<F> {
    filter: F,
    barcode_tag: Vec<u8>,
}

impl<F: ReadFilter> FragmentExtractor<F> {
    /// Create a new extractor from a read filter and a barcode tag key.
    pub fn new(filter: F, barcode_tag: &str) -> Self {
        Self {
            filter,
            barcode_tag: barcode_tag.as_bytes().to_vec(),
        }
    }

    /// Emit the fragment for one qualifying read, or `None` when the read
    /// is skipped.
    ///
    /// Coordinates are shifted for the Tn5 insertion offset:
    /// `start = pos + 4`, `end = pos + template_length - 5`. The filter's
    /// exclusive lower insert-size bound guarantees `end > start`.
    pub fn extract(&self, contig: &str, read: &Record) -> Option<FragmentRecord> {
        if !is_standard_contig(contig) {
            return None;
        }
        if !self.filter.filter_read(read) {
            return None;
        }
        let barcode = self.barcode(read)?;

        Some(FragmentRecord {
            chrom: contig.to_string(),
            start: read.pos() + TN5_FORWARD_OFFSET,
            end: read.pos() + read.insert_size() - TN5_REVERSE_OFFSET,
            barcode,
        })
    }

    /// Cell barcode from the configured tag, `None` when absent.
    fn barcode(&self, read: &Record) -> Option<String> {
        match read.aux(&self.barcode_tag) {
            Ok(Aux::String(s)) => Some(s.to_string()),
            Ok(Aux::ArrayU8(array)) => {
                let bytes: Vec<u8> = array.iter().collect();
                std::str::from_utf8(&bytes).ok().map(str::to_string)
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PROPER_PAIR: u16 = 0x2;

    fn record(flags: u16, mapq: u8, pos: i64, insert_size: i64, barcode: Option<&str>) -> Record {
        let mut record = Record::new();
        record.set(b"read1", None, b"ACGT", &[30, 30, 30, 30]);
        record.set_flags(flags);
        record.set_mapq(mapq);
        record.set_pos(pos);
        record.set_insert_size(insert_size);
        if let Some(barcode) = barcode {
            record.push_aux(b"CB", Aux::String(barcode)).unwrap();
        }
        record
    }

    fn extractor() -> FragmentExtractor<FragmentFilter> {
        FragmentExtractor::new(FragmentFilter::default(), "CB")
    }

    #[test]
    fn emits_tn5_corrected_fragment() {
        let read = record(PROPER_PAIR, 40, 1000, 200, Some("CELL1"));
        let fragment = extractor().extract("chr1", &read).unwrap();
        assert_eq!(
            fragment,
            FragmentRecord {
                chrom: "chr1".to_string(),
                start: 1004,
                end: 1195,
                barcode: "CELL1".to_string(),
            }
        );
    }

    #[test]
    fn mapping_quality_bound_is_exclusive() {
        let filter = FragmentFilter::default();
        assert!(!filter.filter_read(&record(PROPER_PAIR, 30, 1000, 200, None)));
        assert!(filter.filter_read(&record(PROPER_PAIR, 31, 1000, 200, None)));
    }

    #[test]
    fn insert_size_bounds_are_exclusive() {
        let filter = FragmentFilter::default();
        assert!(!filter.filter_read(&record(PROPER_PAIR, 40, 1000, 10, None)));
        assert!(filter.filter_read(&record(PROPER_PAIR, 40, 1000, 11, None)));
        assert!(filter.filter_read(&record(PROPER_PAIR, 40, 1000, 999, None)));
        assert!(!filter.filter_read(&record(PROPER_PAIR, 40, 1000, 1000, None)));
    }

    #[test]
    fn rejects_disqualifying_flags() {
        let filter = FragmentFilter::default();
        // Not a proper pair.
        assert!(!filter.filter_read(&record(0, 40, 1000, 200, None)));
        // Mate unmapped.
        assert!(!filter.filter_read(&record(PROPER_PAIR | 0x8, 40, 1000, 200, None)));
        // Secondary alignment.
        assert!(!filter.filter_read(&record(PROPER_PAIR | 0x100, 40, 1000, 200, None)));
        // Supplementary alignment.
        assert!(!filter.filter_read(&record(PROPER_PAIR | 0x800, 40, 1000, 200, None)));
    }

    #[test]
    fn missing_barcode_tag_skips_silently() {
        let read = record(PROPER_PAIR, 40, 1000, 200, None);
        assert!(extractor().extract("chr1", &read).is_none());
    }

    #[test]
    fn non_canonical_contigs_are_dropped() {
        let read = record(PROPER_PAIR, 40, 1000, 200, Some("CELL1"));
        let extractor = extractor();
        assert!(extractor.extract("chrM", &read).is_none());
        assert!(extractor.extract("GL000194.1", &read).is_none());
        assert!(extractor.extract("chr1", &read).is_some());
    }

    #[test]
    fn end_exceeds_start_at_minimal_insert_size() {
        let read = record(PROPER_PAIR, 40, 0, 11, Some("CELL1"));
        let fragment = extractor().extract("chr1", &read).unwrap();
        assert_eq!(fragment.start, 4);
        assert_eq!(fragment.end, 6);
        assert!(fragment.end > fragment.start);
    }
}
