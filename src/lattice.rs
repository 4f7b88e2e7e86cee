use crate::error::{DlaError, Result};

/// Von Neumann neighbor offsets as (row, col)
const NEIGHBOR_OFFSETS: [(i64, i64); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

/// Label stored on the seed cell at construction
pub const SEED_LABEL: u32 = 1;

/// Integer lattice coordinate. Signed so that walkers can be tracked
/// (and rejected) even when they step off the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cell {
    pub row: i64,
    pub col: i64,
}

impl Cell {
    pub fn new(row: i64, col: i64) -> Self {
        Self { row, col }
    }

    /// Euclidean distance to another cell
    pub fn distance_to(&self, other: Cell) -> f64 {
        let dr = (self.row - other.row) as f64;
        let dc = (self.col - other.col) as f64;
        (dr * dr + dc * dc).sqrt()
    }

    pub fn offset(&self, drow: i64, dcol: i64) -> Cell {
        Cell::new(self.row + drow, self.col + dcol)
    }
}

/// Square L x L occupancy grid with a single seed at the center.
///
/// Each cell holds a generation label: 0 is empty, anything else is part of
/// the cluster. Cells are never cleared once set.
#[derive(Debug, Clone, PartialEq)]
pub struct Lattice {
    size: usize,
    cells: Vec<u32>,
    seed: Cell,
}

impl Lattice {
    pub fn new(size: usize) -> Self {
        let half = (size / 2) as i64;
        let seed = Cell::new(half, half);
        let mut lattice = Self {
            size,
            cells: vec![0; size * size],
            seed,
        };
        if let Some(idx) = lattice.index(seed) {
            lattice.cells[idx] = SEED_LABEL;
        }
        lattice
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn seed(&self) -> Cell {
        self.seed
    }

    fn index(&self, cell: Cell) -> Option<usize> {
        let size = self.size as i64;
        if cell.row < 0 || cell.col < 0 || cell.row >= size || cell.col >= size {
            None
        } else {
            Some(cell.row as usize * self.size + cell.col as usize)
        }
    }

    fn checked_index(&self, cell: Cell) -> Result<usize> {
        self.index(cell).ok_or(DlaError::OutOfBounds {
            row: cell.row,
            col: cell.col,
            size: self.size,
        })
    }

    /// Generation label at `cell` (0 when empty)
    pub fn label(&self, cell: Cell) -> Result<u32> {
        self.checked_index(cell).map(|idx| self.cells[idx])
    }

    pub fn is_occupied(&self, cell: Cell) -> Result<bool> {
        Ok(self.label(cell)? != 0)
    }

    /// The stick test: true if any of the four orthogonal neighbors is occupied.
    /// All four neighbors must lie inside the lattice.
    pub fn has_occupied_neighbor(&self, cell: Cell) -> Result<bool> {
        for (drow, dcol) in NEIGHBOR_OFFSETS {
            if self.is_occupied(cell.offset(drow, dcol))? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Mark `cell` as part of the cluster with the given generation label
    pub fn deposit(&mut self, cell: Cell, label: u32) -> Result<()> {
        if label == 0 {
            return Err(DlaError::ZeroLabel);
        }
        let idx = self.checked_index(cell)?;
        if self.cells[idx] != 0 {
            return Err(DlaError::AlreadyOccupied {
                row: cell.row,
                col: cell.col,
            });
        }
        self.cells[idx] = label;
        Ok(())
    }

    /// Row-major labels, `size * size` entries
    pub fn cells(&self) -> &[u32] {
        &self.cells
    }

    /// Number of occupied cells, seed included
    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|&&label| label != 0).count()
    }

    pub fn max_label(&self) -> u32 {
        self.cells.iter().copied().max().unwrap_or(0)
    }
}
