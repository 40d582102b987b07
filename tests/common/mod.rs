use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use rust_htslib::bam;

pub const CONTIG_LEN: usize = 3000;
const LINE_WIDTH: usize = 60;

pub fn contig_seq(seed: usize) -> Vec<u8> {
    (0..CONTIG_LEN)
        .map(|i| b"ACGTTGCAAGCT"[(i * 7 + i / 13 + seed) % 12])
        .collect()
}

pub fn contigs() -> Vec<(&'static str, Vec<u8>)> {
    vec![("chr1", contig_seq(0)), ("chr2", contig_seq(5))]
}

/// 1-based inclusive region of the test reference.
pub fn region(contig: &str, start: usize, end: usize) -> Vec<u8> {
    let (_, seq) = contigs()
        .into_iter()
        .find(|(name, _)| *name == contig)
        .unwrap();
    seq[start - 1..end].to_vec()
}

/// Write the test reference as FASTA with a samtools faidx index.
pub fn write_reference(dir: &Path) -> PathBuf {
    let path = dir.join("reference.fa");
    let mut fasta = Vec::new();
    let mut fai = String::new();
    for (name, seq) in contigs() {
        fasta.extend(format!(">{}\n", name).into_bytes());
        let offset = fasta.len();
        for line in seq.chunks(LINE_WIDTH) {
            fasta.extend(line.to_ascii_lowercase());
            fasta.push(b'\n');
        }
        fai.push_str(&format!(
            "{}\t{}\t{}\t{}\t{}\n",
            name,
            seq.len(),
            offset,
            LINE_WIDTH,
            LINE_WIDTH + 1
        ));
    }
    fs::File::create(&path).unwrap().write_all(&fasta).unwrap();
    fs::write(dir.join("reference.fa.fai"), fai).unwrap();
    path
}

/// Write the given coordinate sorted SAM records as an indexed BAM file.
pub fn write_bam(dir: &Path, records: &[&str]) -> PathBuf {
    let path = dir.join("reads.bam");
    let header_text = contigs()
        .iter()
        .map(|(name, seq)| format!("@SQ\tSN:{}\tLN:{}\n", name, seq.len()))
        .collect::<String>();
    let header_view = bam::HeaderView::from_bytes(header_text.as_bytes());
    let header = bam::Header::from_template(&header_view);
    {
        let mut writer = bam::Writer::from_path(&path, &header, bam::Format::Bam).unwrap();
        for sam in records {
            let record = bam::Record::from_sam(&header_view, sam.as_bytes()).unwrap();
            writer.write(&record).unwrap();
        }
    }
    bam::index::build(&path, None, bam::index::Type::Bai, 1).unwrap();
    path
}
