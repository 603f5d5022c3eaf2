use crate::cli::output::*;
use crate::cli::{OutputFormat, Settings};
use anyhow::{Context, Result};
use clap::Args;
use colored::*;
use comfy_table::Cell;
use nwalign_bio::{FastaSource, NeedlemanWunsch, SequenceSource};
use serde::Serialize;
use std::path::PathBuf;

#[derive(Args)]
pub struct RankArgs {
    /// Reference sequence every target is aligned against
    #[arg(value_name = "REFERENCE.fa")]
    pub reference: PathBuf,

    /// Comparison targets (FASTA, first record of each is used)
    #[arg(value_name = "TARGET.fa", required = true)]
    pub targets: Vec<PathBuf>,

    /// Directory that relative paths are resolved against
    #[arg(long, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedTarget {
    pub label: String,
    pub path: String,
    pub score: f64,
    pub identity: f64,
    pub gaps: usize,
}

/// Order targets by descending score. The sort is stable, so equal scores
/// keep their input order.
pub fn rank_by_score(mut targets: Vec<RankedTarget>) -> Vec<RankedTarget> {
    targets.sort_by(|a, b| b.score.total_cmp(&a.score));
    targets
}

pub fn run(args: RankArgs, settings: &Settings) -> Result<()> {
    let source = match &args.data_dir {
        Some(dir) => FastaSource::new().with_base_dir(dir),
        None => FastaSource::new(),
    };

    let reference_id = args.reference.to_string_lossy();
    let (reference, reference_label) = source
        .load(&reference_id)
        .with_context(|| format!("Failed to read reference {}", reference_id))?;

    let aligner = NeedlemanWunsch::with_penalty(&settings.matrix, settings.gaps);
    let mut results = Vec::with_capacity(args.targets.len());

    for target_path in &args.targets {
        let target_id = target_path.to_string_lossy();
        let (target, label) = source
            .load(&target_id)
            .with_context(|| format!("Failed to read target {}", target_id))?;

        let alignment = aligner
            .align_sequences(&reference, &target)
            .with_context(|| format!("Failed to align {} against {}", label, reference_label))?;
        tracing::info!("{} vs {}: score {}", reference_label, label, alignment.score);

        results.push(RankedTarget {
            label,
            path: target_id.into_owned(),
            score: alignment.score,
            identity: alignment.identity(),
            gaps: alignment.gap_count(),
        });
    }

    let original_order: Vec<String> = results.iter().map(|r| r.label.clone()).collect();
    let ranked = rank_by_score(results);

    match settings.format {
        OutputFormat::Json => {
            #[derive(Serialize)]
            struct RankReport<'a> {
                reference: &'a str,
                matrix: &'a str,
                gap_open: f64,
                gap_extend: f64,
                ranking: &'a [RankedTarget],
            }

            let report = RankReport {
                reference: &reference_label,
                matrix: &settings.matrix_name,
                gap_open: settings.gaps.open,
                gap_extend: settings.gaps.extend,
                ranking: &ranked,
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        OutputFormat::Text => print_ranking(&reference_label, &original_order, &ranked, settings),
    }

    Ok(())
}

fn print_ranking(
    reference: &str,
    original_order: &[String],
    ranked: &[RankedTarget],
    settings: &Settings,
) {
    section_header(&format!("Similarity to {}", reference));
    info(&format!(
        "{} with gap open {} / extend {}",
        settings.matrix_name,
        format_score(settings.gaps.open),
        format_score(settings.gaps.extend)
    ));

    let mut table = create_standard_table();
    table.set_header(vec![
        header_cell("Rank"),
        header_cell("Target"),
        header_cell("Score"),
        header_cell("Identity"),
        header_cell("Gaps"),
    ]);

    for (rank, target) in ranked.iter().enumerate() {
        table.add_row(vec![
            number_cell((rank + 1).to_string()),
            Cell::new(&target.label),
            number_cell(format_score(target.score)),
            number_cell(format_percent(target.identity)),
            number_cell(target.gaps.to_string()),
        ]);
    }
    println!("{}", table);

    let has_ties = ranked.windows(2).any(|w| w[0].score == w[1].score);
    if has_ties {
        warning("Some targets share a score; they are listed in input order");
    }

    let ranked_order: Vec<&str> = ranked.iter().map(|r| r.label.as_str()).collect();
    println!("{} {:?}", "Original order:".dimmed(), original_order);
    println!("{} {:?}", "Ranked order:  ".dimmed(), ranked_order);
}
