/// Substitution scoring for sequence alignment
use crate::alignment::nw_aligner::GAP;
use nwalign_core::{NwError, NwResult};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

const BLOSUM62_TABLE: &str = include_str!("matrices/BLOSUM62.mat");

/// Resolves a pair of symbols to a substitution score.
///
/// Implementations are expected to be symmetric and total over their
/// alphabet. Pairs outside the alphabet must fail with
/// [`NwError::UnknownSymbol`] rather than fall back to a default score.
pub trait ScoringModel {
    fn score(&self, a: u8, b: u8) -> NwResult<f64>;

    fn contains(&self, symbol: u8) -> bool;

    /// Check that every symbol of `sequence` can be scored.
    fn validate(&self, sequence: &[u8]) -> NwResult<()> {
        match sequence.iter().find(|&&s| !self.contains(s)) {
            Some(&symbol) => Err(NwError::unknown_symbol(symbol)),
            None => Ok(()),
        }
    }
}

impl<S: ScoringModel + ?Sized> ScoringModel for &S {
    fn score(&self, a: u8, b: u8) -> NwResult<f64> {
        (**self).score(a, b)
    }

    fn contains(&self, symbol: u8) -> bool {
        (**self).contains(symbol)
    }
}

/// A square substitution table keyed by alphabet symbols.
#[derive(Debug, Clone, PartialEq)]
pub struct SubstitutionMatrix {
    alphabet: Vec<u8>,
    index_map: HashMap<u8, usize>,
    scores: Vec<f64>,
}

impl SubstitutionMatrix {
    /// The bundled BLOSUM62 table.
    pub fn blosum62() -> NwResult<Self> {
        Self::parse_str(BLOSUM62_TABLE)
    }

    /// Look up a bundled matrix by name (case-insensitive).
    pub fn named(name: &str) -> NwResult<Self> {
        match name.to_ascii_uppercase().as_str() {
            "BLOSUM62" => Self::blosum62(),
            _ => Err(NwError::InvalidInput(format!(
                "Unknown substitution matrix '{}'",
                name
            ))),
        }
    }

    /// Resolve a bundled matrix name, falling back to reading `name` as a path.
    pub fn resolve(name: &str) -> NwResult<Self> {
        match Self::named(name) {
            Ok(matrix) => Ok(matrix),
            Err(_) if Path::new(name).exists() => Self::from_path(name),
            Err(e) => Err(e),
        }
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> NwResult<Self> {
        let path = path.as_ref();
        let matrix = Self::from_reader(BufReader::new(File::open(path)?))?;
        tracing::debug!(
            "Loaded {}x{} substitution matrix from {}",
            matrix.alphabet.len(),
            matrix.alphabet.len(),
            path.display()
        );
        Ok(matrix)
    }

    pub fn parse_str(table: &str) -> NwResult<Self> {
        Self::from_reader(table.as_bytes())
    }

    /// Read a whitespace-separated table: a header line of symbols, then one
    /// row of scores per symbol in header order. Lines starting with `#` are
    /// comments. Reading stops once every row has been seen.
    pub fn from_reader<R: BufRead>(reader: R) -> NwResult<Self> {
        let mut alphabet: Vec<u8> = Vec::new();
        let mut index_map = HashMap::new();
        let mut scores = Vec::new();
        let mut rows_read = 0;

        for (line_idx, line) in reader.lines().enumerate() {
            let line = line?;
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            if alphabet.is_empty() {
                for token in trimmed.split_whitespace() {
                    let symbol = parse_symbol(token, line_idx + 1)?;
                    if index_map.insert(symbol, alphabet.len()).is_some() {
                        return Err(NwError::Parse(format!(
                            "line {}: duplicate symbol '{}' in matrix header",
                            line_idx + 1,
                            token
                        )));
                    }
                    alphabet.push(symbol);
                }
                continue;
            }

            let width = alphabet.len();
            let mut tokens: Vec<&str> = trimmed.split_whitespace().collect();

            // NCBI-style tables prefix each row with its symbol
            if tokens.len() == width + 1
                && tokens[0].len() == 1
                && tokens[0].as_bytes()[0].to_ascii_uppercase() == alphabet[rows_read]
            {
                tokens.remove(0);
            }

            if tokens.len() != width {
                return Err(NwError::Parse(format!(
                    "line {}: expected {} scores, found {}",
                    line_idx + 1,
                    width,
                    tokens.len()
                )));
            }

            for token in tokens {
                let value: f64 = token.parse().map_err(|_| {
                    NwError::Parse(format!("line {}: invalid score '{}'", line_idx + 1, token))
                })?;
                if !value.is_finite() {
                    return Err(NwError::Parse(format!(
                        "line {}: score '{}' is not finite",
                        line_idx + 1,
                        token
                    )));
                }
                scores.push(value);
            }

            rows_read += 1;
            if rows_read == width {
                break;
            }
        }

        if alphabet.is_empty() {
            return Err(NwError::Parse(
                "substitution matrix has no header line".to_string(),
            ));
        }
        if rows_read != alphabet.len() {
            return Err(NwError::Parse(format!(
                "substitution matrix declares {} symbols but has {} rows",
                alphabet.len(),
                rows_read
            )));
        }

        let matrix = Self {
            alphabet,
            index_map,
            scores,
        };
        if !matrix.is_symmetric() {
            tracing::warn!("Substitution matrix is not symmetric; score(a, b) reads row a");
        }
        Ok(matrix)
    }

    pub fn alphabet(&self) -> &[u8] {
        &self.alphabet
    }

    pub fn len(&self) -> usize {
        self.alphabet.len()
    }

    pub fn is_empty(&self) -> bool {
        self.alphabet.is_empty()
    }

    pub fn is_symmetric(&self) -> bool {
        let n = self.alphabet.len();
        (0..n).all(|i| (0..i).all(|j| self.scores[i * n + j] == self.scores[j * n + i]))
    }

    fn index_of(&self, symbol: u8) -> Option<usize> {
        self.index_map.get(&symbol.to_ascii_uppercase()).copied()
    }
}

fn parse_symbol(token: &str, line: usize) -> NwResult<u8> {
    match token.as_bytes() {
        [GAP] => Err(NwError::Parse(format!(
            "line {}: the gap marker '{}' cannot be a matrix symbol",
            line,
            char::from(GAP)
        ))),
        [symbol] => Ok(symbol.to_ascii_uppercase()),
        _ => Err(NwError::Parse(format!(
            "line {}: matrix header symbol '{}' must be a single character",
            line, token
        ))),
    }
}

impl ScoringModel for SubstitutionMatrix {
    fn score(&self, a: u8, b: u8) -> NwResult<f64> {
        match (self.index_of(a), self.index_of(b)) {
            (Some(i), Some(j)) => Ok(self.scores[i * self.alphabet.len() + j]),
            _ => Err(NwError::unknown_pair(a, b)),
        }
    }

    fn contains(&self, symbol: u8) -> bool {
        self.index_of(symbol).is_some()
    }
}
