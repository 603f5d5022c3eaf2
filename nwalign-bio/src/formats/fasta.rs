use crate::sequence::{Sequence, SequenceSource};
use flate2::read::GzDecoder;
use nom::{
    branch::alt,
    bytes::complete::{tag, take_till},
    character::complete::line_ending,
    combinator::{map, opt},
    sequence::preceded,
    IResult,
};
use nwalign_core::{NwError, NwResult};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

/// Parse a FASTA header line
fn parse_header(input: &[u8]) -> IResult<&[u8], (&str, Option<&str>)> {
    let (input, _) = tag(b">")(input)?;
    let (input, id) = map(
        take_till(|c: u8| c == b' ' || c == b'\t' || c == b'\n' || c == b'\r'),
        |s| std::str::from_utf8(s).unwrap_or(""),
    )(input)?;
    let (input, description) = preceded(
        take_till(|c: u8| c != b' ' && c != b'\t'),
        map(take_till(|c: u8| c == b'\n' || c == b'\r'), |s| {
            std::str::from_utf8(s).unwrap_or("")
        }),
    )(input)?;
    // "\r\n", "\n" or a lone "\r"
    let (input, _) = opt(alt((line_ending, tag(b"\r"))))(input)?;
    Ok((input, (id, Some(description).filter(|d| !d.trim().is_empty()))))
}

/// Parse sequence lines until the next header or EOF
fn parse_sequence(input: &[u8]) -> IResult<&[u8], Vec<u8>> {
    let mut sequence = Vec::new();
    let mut remaining = input;

    while !remaining.is_empty() && remaining[0] != b'>' {
        let (rest, line) =
            take_till::<_, _, nom::error::Error<_>>(|c: u8| c == b'\n' || c == b'\r')(remaining)?;
        let (rest, _) = opt(line_ending)(rest)?;

        // Lone '\r' without '\n'
        let rest = if rest.len() == remaining.len() - line.len() && rest.first() == Some(&b'\r') {
            &rest[1..]
        } else {
            rest
        };

        sequence.extend(
            line.iter()
                .filter(|c| !c.is_ascii_whitespace())
                .map(|c| c.to_ascii_uppercase()),
        );
        remaining = rest;
    }

    Ok((remaining, sequence))
}

/// Parse the first record of a FASTA buffer. Later records are ignored.
pub fn parse_first_record(data: &[u8]) -> NwResult<Sequence> {
    let start = data
        .iter()
        .position(|c| !c.is_ascii_whitespace())
        .ok_or_else(|| NwError::InvalidInput("FASTA input contains no records".to_string()))?;
    let input = &data[start..];

    if input[0] != b'>' {
        return Err(NwError::Parse(
            "FASTA input must start with a '>' header line".to_string(),
        ));
    }

    let (rest, (id, description)) = parse_header(input)
        .map_err(|_| NwError::Parse("Failed to parse FASTA header".to_string()))?;
    let (_, residues) = parse_sequence(rest)
        .map_err(|_| NwError::Parse("Failed to parse FASTA sequence".to_string()))?;

    let mut seq = Sequence::new(id.to_string(), residues);
    if let Some(desc) = description {
        seq = seq.with_description(desc.trim().to_string());
    }

    tracing::trace!("Parsed FASTA record '{}' ({} residues)", seq.id, seq.len());
    Ok(seq)
}

/// Read the first record of a FASTA file (supports .gz compression)
pub fn read_fasta<P: AsRef<Path>>(path: P) -> NwResult<Sequence> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let mut buffer = Vec::new();

    if path.extension().and_then(|s| s.to_str()) == Some("gz") {
        let mut decoder = GzDecoder::new(BufReader::new(file));
        decoder.read_to_end(&mut buffer)?;
    } else {
        BufReader::new(file).read_to_end(&mut buffer)?;
    }

    parse_first_record(&buffer)
}

/// Loads sequences from FASTA files, resolving relative identifiers
/// against an optional base directory.
#[derive(Debug, Clone, Default)]
pub struct FastaSource {
    base_dir: Option<PathBuf>,
}

impl FastaSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_base_dir<P: Into<PathBuf>>(mut self, dir: P) -> Self {
        self.base_dir = Some(dir.into());
        self
    }

    fn resolve(&self, identifier: &str) -> PathBuf {
        let path = Path::new(identifier);
        match &self.base_dir {
            Some(base) if path.is_relative() => base.join(path),
            _ => path.to_path_buf(),
        }
    }
}

impl SequenceSource for FastaSource {
    fn load(&self, identifier: &str) -> NwResult<(Sequence, String)> {
        let path = self.resolve(identifier);
        let seq = read_fasta(&path)?;

        if seq.is_empty() {
            return Err(NwError::InvalidInput(format!(
                "{}: record '{}' has no residues",
                path.display(),
                seq.id
            )));
        }

        let label = seq.id.clone();
        Ok((seq, label))
    }
}
