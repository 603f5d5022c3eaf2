pub mod fasta;

pub use fasta::{parse_first_record, read_fasta, FastaSource};
