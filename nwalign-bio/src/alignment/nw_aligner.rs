/// Needleman-Wunsch global alignment with affine gap penalties
use crate::alignment::grid::Grid;
use crate::alignment::scoring::ScoringModel;
use crate::sequence::Sequence;
use nwalign_core::{check_penalty, NwError, NwResult};
use serde::{Deserialize, Serialize};

pub const GAP: u8 = b'-';

/// Which recurrence candidate produced a score: a diagonal match, a gap in
/// the second sequence (moving up) or a gap in the first (moving left).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Unset,
    Diagonal,
    Up,
    Left,
}

/// Affine gap model. Opening a gap costs `open + extend`, every further
/// position costs `extend`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GapPenalty {
    pub open: f64,
    pub extend: f64,
}

impl GapPenalty {
    pub fn new(open: f64, extend: f64) -> NwResult<Self> {
        check_penalty("gap_open", open)?;
        check_penalty("gap_extend", extend)?;
        Ok(Self { open, extend })
    }

    /// Cost of the first position of a new gap.
    pub fn open_cost(&self) -> f64 {
        self.open + self.extend
    }

    /// Total cost of a gap of `len` positions.
    pub fn cost(&self, len: usize) -> f64 {
        self.open + len as f64 * self.extend
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alignment {
    pub score: f64,
    pub aligned_a: String,
    pub aligned_b: String,
}

impl Alignment {
    pub fn len(&self) -> usize {
        self.aligned_a.len()
    }

    pub fn is_empty(&self) -> bool {
        self.aligned_a.is_empty()
    }

    /// '|' for identity, 'X' for substitution, ' ' for gap
    pub fn midline(&self) -> String {
        self.columns()
            .map(|(a, b)| {
                if a == GAP || b == GAP {
                    ' '
                } else if a == b {
                    '|'
                } else {
                    'X'
                }
            })
            .collect()
    }

    /// Fraction of alignment columns holding identical residues.
    pub fn identity(&self) -> f64 {
        let matches = self
            .columns()
            .filter(|&(a, b)| a != GAP && a == b)
            .count();
        matches as f64 / self.len().max(1) as f64
    }

    pub fn gap_count(&self) -> usize {
        self.columns().filter(|&(a, b)| a == GAP || b == GAP).count()
    }

    fn columns(&self) -> impl Iterator<Item = (u8, u8)> + '_ {
        self.aligned_a
            .bytes()
            .zip(self.aligned_b.bytes())
    }
}

/// Best score reaching a cell within one track, and the track it came from.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Step {
    score: f64,
    from: Direction,
}

const UNREACHABLE: Step = Step {
    score: f64::NEG_INFINITY,
    from: Direction::Unset,
};

/// The three tracks of one DP cell, kept apart so gap-open and gap-extend
/// accounting never depends on which track happened to win a neighbour.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Cell {
    diagonal: Step,
    up: Step,
    left: Step,
}

impl Cell {
    const EMPTY: Cell = Cell {
        diagonal: UNREACHABLE,
        up: UNREACHABLE,
        left: UNREACHABLE,
    };

    /// Best track at this cell; `from` names the winning track.
    fn best(&self) -> Step {
        pick([
            (self.diagonal.score, Direction::Diagonal),
            (self.up.score, Direction::Up),
            (self.left.score, Direction::Left),
        ])
    }

    fn track(&self, direction: Direction) -> Step {
        match direction {
            Direction::Diagonal => self.diagonal,
            Direction::Up => self.up,
            Direction::Left => self.left,
            Direction::Unset => UNREACHABLE,
        }
    }
}

/// Maximum of the candidates; ties go to the earliest, so callers list them
/// in Diagonal, Up, Left order.
fn pick(candidates: [(f64, Direction); 3]) -> Step {
    let mut best = Step {
        score: candidates[0].0,
        from: candidates[0].1,
    };
    for &(score, from) in &candidates[1..] {
        if score > best.score {
            best = Step { score, from };
        }
    }
    best
}

pub struct NeedlemanWunsch<S: ScoringModel> {
    scoring: S,
    gaps: GapPenalty,
}

impl<S: ScoringModel> NeedlemanWunsch<S> {
    pub fn new(scoring: S, gap_open: f64, gap_extend: f64) -> NwResult<Self> {
        Ok(Self::with_penalty(
            scoring,
            GapPenalty::new(gap_open, gap_extend)?,
        ))
    }

    pub fn with_penalty(scoring: S, gaps: GapPenalty) -> Self {
        Self { scoring, gaps }
    }

    pub fn scoring(&self) -> &S {
        &self.scoring
    }

    pub fn gap_penalty(&self) -> GapPenalty {
        self.gaps
    }

    /// Globally align `seq_a` against `seq_b`.
    pub fn align(&self, seq_a: &[u8], seq_b: &[u8]) -> NwResult<Alignment> {
        Ok(self.fill(seq_a, seq_b)?.traceback())
    }

    pub fn align_sequences(&self, seq_a: &Sequence, seq_b: &Sequence) -> NwResult<Alignment> {
        self.align(&seq_a.sequence, &seq_b.sequence)
    }

    /// Run the forward pass only and hand back the populated tables.
    pub fn fill<'s>(&self, seq_a: &'s [u8], seq_b: &'s [u8]) -> NwResult<AlignmentTable<'s>> {
        if seq_a.is_empty() && seq_b.is_empty() {
            return Err(NwError::InvalidInput(
                "both sequences are empty, nothing to align".to_string(),
            ));
        }
        if seq_a.contains(&GAP) || seq_b.contains(&GAP) {
            return Err(NwError::InvalidInput(format!(
                "input sequences may not contain the gap marker '{}'",
                char::from(GAP)
            )));
        }
        self.scoring.validate(seq_a)?;
        self.scoring.validate(seq_b)?;

        let rows = seq_a.len() + 1;
        let cols = seq_b.len() + 1;
        tracing::debug!("Filling {}x{} alignment matrix", rows, cols);

        let mut grid = Grid::new(rows, cols, Cell::EMPTY);
        self.initialize(&mut grid);
        self.fill_tracks(&mut grid, seq_a, seq_b)?;

        let table = AlignmentTable {
            seq_a,
            seq_b,
            grid,
        };
        tracing::debug!("Alignment score: {}", table.score());
        Ok(table)
    }

    fn initialize(&self, grid: &mut Grid<Cell>) {
        grid[(0, 0)].diagonal = Step {
            score: 0.0,
            from: Direction::Unset,
        };

        for i in 1..grid.rows() {
            grid[(i, 0)].up = Step {
                score: self.gaps.cost(i),
                from: if i == 1 { Direction::Diagonal } else { Direction::Up },
            };
        }

        for j in 1..grid.cols() {
            grid[(0, j)].left = Step {
                score: self.gaps.cost(j),
                from: if j == 1 { Direction::Diagonal } else { Direction::Left },
            };
        }
    }

    fn fill_tracks(&self, grid: &mut Grid<Cell>, seq_a: &[u8], seq_b: &[u8]) -> NwResult<()> {
        let open = self.gaps.open_cost();
        let extend = self.gaps.extend;

        for i in 1..grid.rows() {
            for j in 1..grid.cols() {
                let substitution = self.scoring.score(seq_a[i - 1], seq_b[j - 1])?;

                let mut diagonal = grid[(i - 1, j - 1)].best();
                diagonal.score += substitution;

                let above = grid[(i - 1, j)];
                let up = pick([
                    (above.diagonal.score + open, Direction::Diagonal),
                    (above.up.score + extend, Direction::Up),
                    (above.left.score + open, Direction::Left),
                ]);

                let before = grid[(i, j - 1)];
                let left = pick([
                    (before.diagonal.score + open, Direction::Diagonal),
                    (before.up.score + open, Direction::Up),
                    (before.left.score + extend, Direction::Left),
                ]);

                grid[(i, j)] = Cell { diagonal, up, left };
            }
        }

        Ok(())
    }
}

/// Populated forward-pass tables for one pair of sequences.
pub struct AlignmentTable<'s> {
    seq_a: &'s [u8],
    seq_b: &'s [u8],
    grid: Grid<Cell>,
}

impl<'s> AlignmentTable<'s> {
    pub fn rows(&self) -> usize {
        self.grid.rows()
    }

    pub fn cols(&self) -> usize {
        self.grid.cols()
    }

    /// Optimal global score, the best track in the bottom-right cell.
    pub fn score(&self) -> f64 {
        self.grid[(self.rows() - 1, self.cols() - 1)].best().score
    }

    /// Best score over the three tracks for every cell.
    pub fn score_matrix(&self) -> Grid<f64> {
        self.grid.map(|_, _, cell| cell.best().score)
    }

    /// Track holding the best score for every cell; `Unset` at the origin.
    pub fn directions(&self) -> Grid<Direction> {
        self.grid.map(|i, j, cell| {
            if i == 0 && j == 0 {
                Direction::Unset
            } else {
                cell.best().from
            }
        })
    }

    /// Scores of a single track; unreachable states are negative infinity.
    pub fn track_matrix(&self, track: Direction) -> Grid<f64> {
        self.grid.map(|_, _, cell| cell.track(track).score)
    }

    /// Walk back from the bottom-right cell to the origin.
    pub fn traceback(&self) -> Alignment {
        let mut aligned_a = Vec::with_capacity(self.rows() + self.cols());
        let mut aligned_b = Vec::with_capacity(self.rows() + self.cols());

        let mut i = self.rows() - 1;
        let mut j = self.cols() - 1;
        let mut track = self.grid[(i, j)].best().from;

        while i > 0 || j > 0 {
            // Boundary row and column can only be consumed as gaps
            let current = match (i, j) {
                (0, _) => Direction::Left,
                (_, 0) => Direction::Up,
                _ => track,
            };
            let cell = &self.grid[(i, j)];

            match current {
                Direction::Diagonal => {
                    aligned_a.push(self.seq_a[i - 1]);
                    aligned_b.push(self.seq_b[j - 1]);
                    track = cell.diagonal.from;
                    i -= 1;
                    j -= 1;
                }
                Direction::Up => {
                    aligned_a.push(self.seq_a[i - 1]);
                    aligned_b.push(GAP);
                    track = cell.up.from;
                    i -= 1;
                }
                Direction::Left | Direction::Unset => {
                    aligned_a.push(GAP);
                    aligned_b.push(self.seq_b[j - 1]);
                    track = cell.left.from;
                    j -= 1;
                }
            }
        }

        aligned_a.reverse();
        aligned_b.reverse();
        tracing::trace!("Traceback produced {} columns", aligned_a.len());

        Alignment {
            score: self.score(),
            aligned_a: aligned_a.into_iter().map(char::from).collect(),
            aligned_b: aligned_b.into_iter().map(char::from).collect(),
        }
    }
}
