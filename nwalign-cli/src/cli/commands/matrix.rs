use crate::cli::output::*;
use crate::cli::{OutputFormat, Settings};
use anyhow::{Context, Result};
use clap::Args;
use nwalign_bio::{ScoringModel, SubstitutionMatrix};
use serde::Serialize;

#[derive(Args)]
pub struct MatrixArgs {
    /// Matrix name or path (defaults to the configured matrix)
    #[arg(value_name = "NAME|FILE")]
    pub name: Option<String>,

    /// Print the full score table
    #[arg(long)]
    pub show: bool,
}

#[derive(Serialize)]
struct MatrixReport {
    name: String,
    alphabet: String,
    size: usize,
    symmetric: bool,
    scores: Option<Vec<Vec<f64>>>,
}

pub fn run(args: MatrixArgs, settings: &Settings) -> Result<()> {
    let loaded;
    let (name, matrix) = match &args.name {
        Some(name) => {
            loaded = SubstitutionMatrix::resolve(name)
                .with_context(|| format!("Failed to load substitution matrix '{}'", name))?;
            (name.as_str(), &loaded)
        }
        None => (settings.matrix_name.as_str(), &settings.matrix),
    };

    let alphabet = matrix.alphabet();
    let scores = if args.show {
        let mut rows = Vec::with_capacity(alphabet.len());
        for &a in alphabet {
            let row = alphabet
                .iter()
                .map(|&b| matrix.score(a, b))
                .collect::<Result<Vec<f64>, _>>()?;
            rows.push(row);
        }
        Some(rows)
    } else {
        None
    };

    match settings.format {
        OutputFormat::Json => {
            let report = MatrixReport {
                name: name.to_string(),
                alphabet: alphabet.iter().map(|&c| char::from(c)).collect(),
                size: matrix.len(),
                symmetric: matrix.is_symmetric(),
                scores,
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        OutputFormat::Text => {
            section_header(&format!("Substitution matrix {}", name));
            let symbols: String = alphabet.iter().map(|&c| char::from(c)).collect();
            tree_item(false, "Alphabet", Some(&symbols));
            tree_item(false, "Symbols", Some(&matrix.len().to_string()));
            tree_item(
                true,
                "Symmetric",
                Some(if matrix.is_symmetric() { "yes" } else { "no" }),
            );
            if !matrix.is_symmetric() {
                warning("Asymmetric matrices make alignment scores order-dependent");
            }

            if let Some(rows) = scores {
                let mut table = create_standard_table();
                let mut header = vec![header_cell("")];
                header.extend(alphabet.iter().map(|&c| header_cell(&char::from(c).to_string())));
                table.set_header(header);

                for (&symbol, row) in alphabet.iter().zip(rows) {
                    let mut cells = vec![header_cell(&char::from(symbol).to_string())];
                    cells.extend(row.into_iter().map(|s| number_cell(format_score(s))));
                    table.add_row(cells);
                }
                println!("{}", table);
            }
        }
    }

    Ok(())
}
