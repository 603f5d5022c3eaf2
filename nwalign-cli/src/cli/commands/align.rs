use crate::cli::output::*;
use crate::cli::{OutputFormat, Settings};
use anyhow::{Context, Result};
use clap::Args;
use colored::*;
use nwalign_bio::{Alignment, FastaSource, NeedlemanWunsch, SequenceSource};
use serde::Serialize;
use std::path::PathBuf;

#[derive(Args)]
pub struct AlignArgs {
    /// First sequence (FASTA, first record is used)
    #[arg(value_name = "A.fa")]
    pub first: PathBuf,

    /// Second sequence (FASTA, first record is used)
    #[arg(value_name = "B.fa")]
    pub second: PathBuf,

    /// Residues per line when printing the alignment
    #[arg(long, default_value = "60")]
    pub width: usize,
}

#[derive(Serialize)]
struct AlignReport<'a> {
    first: &'a str,
    second: &'a str,
    matrix: &'a str,
    gap_open: f64,
    gap_extend: f64,
    score: f64,
    identity: f64,
    gaps: usize,
    aligned_first: &'a str,
    aligned_second: &'a str,
}

pub fn run(args: AlignArgs, settings: &Settings) -> Result<()> {
    let source = FastaSource::new();
    let (seq_a, label_a) = source
        .load(&args.first.to_string_lossy())
        .with_context(|| format!("Failed to read {}", args.first.display()))?;
    let (seq_b, label_b) = source
        .load(&args.second.to_string_lossy())
        .with_context(|| format!("Failed to read {}", args.second.display()))?;

    let aligner = NeedlemanWunsch::with_penalty(&settings.matrix, settings.gaps);
    let alignment = aligner
        .align_sequences(&seq_a, &seq_b)
        .with_context(|| format!("Failed to align {} against {}", label_a, label_b))?;

    match settings.format {
        OutputFormat::Json => {
            let report = AlignReport {
                first: &label_a,
                second: &label_b,
                matrix: &settings.matrix_name,
                gap_open: settings.gaps.open,
                gap_extend: settings.gaps.extend,
                score: alignment.score,
                identity: alignment.identity(),
                gaps: alignment.gap_count(),
                aligned_first: &alignment.aligned_a,
                aligned_second: &alignment.aligned_b,
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        OutputFormat::Text => print_alignment(&label_a, &label_b, &alignment, settings, args.width),
    }

    Ok(())
}

fn print_alignment(
    label_a: &str,
    label_b: &str,
    alignment: &Alignment,
    settings: &Settings,
    width: usize,
) {
    section_header(&format!("{} vs {}", label_a, label_b));
    tree_item(false, "Matrix", Some(&settings.matrix_name));
    tree_item(
        false,
        "Gap penalties",
        Some(&format!(
            "open {} / extend {}",
            format_score(settings.gaps.open),
            format_score(settings.gaps.extend)
        )),
    );
    tree_item(false, "Score", Some(&format_score(alignment.score)));
    tree_item(false, "Identity", Some(&format_percent(alignment.identity())));
    tree_item(true, "Gaps", Some(&alignment.gap_count().to_string()));
    println!();

    let midline = alignment.midline();
    let label_width = label_a.len().max(label_b.len()).min(20);
    for [top, middle, bottom] in wrap_alignment(
        [
            alignment.aligned_a.as_str(),
            midline.as_str(),
            alignment.aligned_b.as_str(),
        ],
        width,
    ) {
        let name_a = format!("{:<w$}", truncate(label_a, label_width), w = label_width);
        let name_b = format!("{:<w$}", truncate(label_b, label_width), w = label_width);
        println!("{} {}", name_a.bold(), top);
        println!("{:<w$} {}", "", middle.dimmed(), w = label_width);
        println!("{} {}", name_b.bold(), bottom);
        println!();
    }
}

fn truncate(label: &str, width: usize) -> &str {
    match label.char_indices().nth(width) {
        Some((idx, _)) => &label[..idx],
        None => label,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_label() {
        assert_eq!(truncate("Homo_sapiens_BRD2", 4), "Homo");
        assert_eq!(truncate("seq", 10), "seq");
    }
}
