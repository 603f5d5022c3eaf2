//! Bioinformatics building blocks for nwalign

pub mod alignment;
pub mod formats;
pub mod sequence;

// Re-export commonly used types
pub use alignment::{
    Alignment, AlignmentTable, Direction, GapPenalty, NeedlemanWunsch, ScoringModel,
    SubstitutionMatrix,
};
pub use formats::fasta::{parse_first_record, read_fasta, FastaSource};
pub use sequence::{Sequence, SequenceSource};
