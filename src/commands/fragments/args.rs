use std::path::PathBuf;
use structopt::StructOpt;

/// Arguments for the `fragments` command.
#[derive(Debug, Clone, StructOpt)]
#[structopt(
    name = "fragments",
    about = "Extract per-cell fragments from a paired-end BAM"
)]
pub struct FragmentsArgs {
    /// Path to the input BAM file.
    #[structopt(short, long, parse(from_os_str))]
    pub bam: PathBuf,

    /// Output path for fragment lines. Defaults to stdout; a .gz/.bgzf
    /// extension enables gzip compression.
    #[structopt(short, long, parse(from_os_str))]
    pub output: Option<PathBuf>,

    /// BAM tag holding the cell barcode.
    #[structopt(long = "barcode-tag", default_value = "CB")]
    pub barcode_tag: String,

    /// Mapping quality a read must exceed to be kept.
    #[structopt(long, default_value = "30", short = "q")]
    pub min_mapq: u8,

    /// Exclusive lower bound on template length.
    #[structopt(long = "min-insert", default_value = "10")]
    pub min_insert_size: i64,

    /// Exclusive upper bound on template length.
    #[structopt(long = "max-insert", default_value = "1000")]
    pub max_insert_size: i64,

    /// Number of BAM decompression threads.
    #[structopt(short, long, default_value = "4")]
    pub threads: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn parses_minimal_arguments() {
        let args =
            FragmentsArgs::from_iter_safe(&["fragments", "--bam", "test.bam"]).unwrap();

        assert_eq!(args.bam, PathBuf::from("test.bam"));
        assert_eq!(args.output, None);
        assert_eq!(args.barcode_tag, "CB");
        assert_eq!(args.min_mapq, 30);
        assert_eq!(args.min_insert_size, 10);
        assert_eq!(args.max_insert_size, 1000);
    }

    #[test]
    fn parses_custom_tag_and_output() {
        let args = FragmentsArgs::from_iter_safe(&[
            "fragments",
            "--bam",
            "test.bam",
            "--barcode-tag",
            "XC",
            "--output",
            "fragments.tsv.gz",
        ])
        .unwrap();

        assert_eq!(args.barcode_tag, "XC");
        assert_eq!(args.output, Some(PathBuf::from("fragments.tsv.gz")));
    }
}
