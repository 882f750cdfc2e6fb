mod args;

use anyhow::{Context, Result};
use chromcat_lib::core::io::{fragment_writer, make_parent_dirs};
use chromcat_lib::fragment::{FragmentExtractor, FragmentFilter};
use log::info;
use rust_htslib::bam::{self, Read};

pub use args::FragmentsArgs;

/// Entry point for the `fragments` command.
///
/// Streams the BAM once, writing one tab-delimited fragment line per
/// qualifying read. Filter rejections are silent; read and parse faults
/// abort the run.
pub fn run_fragments(args: FragmentsArgs) -> Result<()> {
    info!("Extracting fragments from {:?}", args.bam);

    let mut reader = bam::Reader::from_path(&args.bam)
        .with_context(|| format!("Failed to open {:?}", args.bam))?;
    if args.threads > 1 {
        reader.set_threads(args.threads)?;
    }

    let contig_names: Vec<String> = {
        let header = reader.header();
        (0..header.target_count())
            .map(|tid| {
                std::str::from_utf8(header.tid2name(tid))
                    .map(str::to_string)
                    .with_context(|| format!("Invalid contig name at TID {}", tid))
            })
            .collect::<Result<_>>()?
    };

    if let Some(path) = &args.output {
        make_parent_dirs(path)?;
    }
    let mut writer = fragment_writer(&args.output, args.threads)?;

    let filter = FragmentFilter::new(args.min_mapq, args.min_insert_size, args.max_insert_size);
    let extractor = FragmentExtractor::new(filter, &args.barcode_tag);

    let mut scanned: u64 = 0;
    let mut written: u64 = 0;
    let mut record = bam::Record::new();
    while let Some(result) = reader.read(&mut record) {
        result?;
        scanned += 1;

        let tid = record.tid();
        if tid < 0 {
            continue;
        }
        let Some(contig) = contig_names.get(tid as usize) else {
            continue;
        };

        if let Some(fragment) = extractor.extract(contig, &record) {
            writer.serialize(&fragment)?;
            written += 1;
        }
    }
    writer.flush()?;

    info!("Scanned {} alignments, wrote {} fragments", scanned, written);
    Ok(())
}
