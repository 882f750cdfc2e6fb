use std::path::PathBuf;
use structopt::StructOpt;

/// Arguments for the `frag2mtx` command.
#[derive(Debug, Clone, StructOpt)]
#[structopt(
    name = "frag2mtx",
    about = "Aggregate peak-annotated fragments into a cell-by-peak matrix"
)]
pub struct Frag2MtxArgs {
    /// Peak-annotated fragment file. Omitted or "-" reads stdin;
    /// .gz/.bgzf files are decompressed transparently.
    #[structopt(short, long, parse(from_os_str))]
    pub fragments: Option<PathBuf>,

    /// Output path for the .h5ad matrix artifact.
    #[structopt(short, long, parse(from_os_str))]
    pub output: PathBuf,

    /// Number of worker threads.
    #[structopt(short, long, default_value = "4")]
    pub threads: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn parses_minimal_arguments() {
        let args = Frag2MtxArgs::from_iter_safe(&[
            "frag2mtx",
            "--fragments",
            "annotated.tsv",
            "--output",
            "matrix.h5ad",
        ])
        .unwrap();

        assert_eq!(args.fragments, Some(PathBuf::from("annotated.tsv")));
        assert_eq!(args.output, PathBuf::from("matrix.h5ad"));
        assert_eq!(args.threads, 4);
    }

    #[test]
    fn fragments_default_to_stdin() {
        let args =
            Frag2MtxArgs::from_iter_safe(&["frag2mtx", "--output", "matrix.h5ad"]).unwrap();
        assert_eq!(args.fragments, None);
    }
}
