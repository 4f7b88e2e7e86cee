use crate::error::Result;
use crate::lattice::{Cell, Lattice};
use crate::rng::UniformSource;
use std::f64::consts::TAU;

/// One lattice step of the random walk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Left,
    Up,
    Right,
    Down,
}

impl Direction {
    /// Map a uniform draw in [0, 1) onto the four directions with equal weight
    pub fn from_draw(draw: f64) -> Self {
        match (draw * 4.0) as u32 {
            0 => Direction::Left,
            1 => Direction::Up,
            2 => Direction::Right,
            _ => Direction::Down,
        }
    }

    /// (row, col) offset
    pub fn offset(&self) -> (i64, i64) {
        match self {
            Direction::Left => (0, -1),
            Direction::Up => (-1, 0),
            Direction::Right => (0, 1),
            Direction::Down => (1, 0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkState {
    Spawned,
    Walking,
    Stuck,
    Escaped,
}

impl WalkState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, WalkState::Stuck | WalkState::Escaped)
    }
}

/// How a walk ended, with the final position and the number of moves made
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WalkOutcome {
    Stuck { cell: Cell, steps: u64 },
    Escaped { cell: Cell, steps: u64 },
}

impl WalkOutcome {
    pub fn cell(&self) -> Cell {
        match self {
            WalkOutcome::Stuck { cell, .. } | WalkOutcome::Escaped { cell, .. } => *cell,
        }
    }

    pub fn is_stuck(&self) -> bool {
        matches!(self, WalkOutcome::Stuck { .. })
    }

    pub fn steps(&self) -> u64 {
        match self {
            WalkOutcome::Stuck { steps, .. } | WalkOutcome::Escaped { steps, .. } => *steps,
        }
    }
}

/// A single particle walking on a read-only view of the lattice.
///
/// The walker never mutates the lattice; on `Stuck` the caller deposits
/// the final position.
pub struct Walker<'a> {
    lattice: &'a Lattice,
    origin: Cell,
    position: Cell,
    outer_radius: f64,
    state: WalkState,
    steps: u64,
}

impl<'a> Walker<'a> {
    /// Launch a walker on the spawn ring at a uniformly drawn angle.
    ///
    /// The ring point is truncated to integer coordinates, not rounded.
    /// Fails if the spawn point falls off the lattice.
    pub fn spawn(
        lattice: &'a Lattice,
        inner_radius: f64,
        outer_radius: f64,
        source: &mut impl UniformSource,
    ) -> Result<Self> {
        let origin = lattice.seed();
        let theta = source.uniform() * TAU;
        let position = Cell::new(
            (origin.row as f64 + inner_radius * theta.sin()) as i64,
            (origin.col as f64 + inner_radius * theta.cos()) as i64,
        );
        Self::at(lattice, position, outer_radius)
    }

    /// Place a walker at an explicit position.
    ///
    /// An occupied start cell with an occupied neighbor would stick onto
    /// itself, so it is reported as escaped without moving. An occupied cell
    /// with no occupied neighbor (the bare seed) walks off it normally.
    pub fn at(lattice: &'a Lattice, position: Cell, outer_radius: f64) -> Result<Self> {
        let state = if lattice.is_occupied(position)? && lattice.has_occupied_neighbor(position)? {
            WalkState::Escaped
        } else {
            WalkState::Spawned
        };
        Ok(Self {
            lattice,
            origin: lattice.seed(),
            position,
            outer_radius,
            state,
            steps: 0,
        })
    }

    pub fn position(&self) -> Cell {
        self.position
    }

    pub fn state(&self) -> WalkState {
        self.state
    }

    /// Advance one step: stick if next to the cluster, otherwise move one
    /// cell and check the kill ring. Adjacency at the new cell is only tested
    /// on the following step. Terminal walkers don't move.
    pub fn step(&mut self, source: &mut impl UniformSource) -> Result<WalkState> {
        if self.state.is_terminal() {
            return Ok(self.state);
        }

        if self.lattice.has_occupied_neighbor(self.position)? {
            self.state = WalkState::Stuck;
            return Ok(self.state);
        }

        let (drow, dcol) = Direction::from_draw(source.uniform()).offset();
        self.position = self.position.offset(drow, dcol);
        self.steps += 1;

        self.state = if self.position.distance_to(self.origin) > self.outer_radius {
            WalkState::Escaped
        } else {
            WalkState::Walking
        };
        Ok(self.state)
    }

    /// Walk until the particle sticks or escapes
    pub fn run(mut self, source: &mut impl UniformSource) -> Result<WalkOutcome> {
        while !self.state.is_terminal() {
            self.step(source)?;
        }
        Ok(match self.state {
            WalkState::Stuck => WalkOutcome::Stuck {
                cell: self.position,
                steps: self.steps,
            },
            _ => WalkOutcome::Escaped {
                cell: self.position,
                steps: self.steps,
            },
        })
    }
}
