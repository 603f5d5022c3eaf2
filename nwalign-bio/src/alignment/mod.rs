pub mod grid;
pub mod nw_aligner;
pub mod scoring;

pub use grid::Grid;
pub use nw_aligner::{Alignment, AlignmentTable, Direction, GapPenalty, NeedlemanWunsch, GAP};
pub use scoring::{ScoringModel, SubstitutionMatrix};
