use crate::error::{DlaError, Result};
use crate::lattice::Lattice;
use crate::rng::UniformSource;
use crate::walker::{WalkOutcome, Walker};
use log::{debug, info, trace};
use std::time::{Duration, Instant};

/// Lattice length must be strictly greater than this
pub const MIN_LATTICE_LENGTH: usize = 10;

/// Spawn ring starts at this fraction of the half-length
const SPAWN_RADIUS_FRACTION: f64 = 0.2;
/// Kill ring starts at this multiple of the spawn ring
const KILL_RADIUS_FACTOR: f64 = 1.2;
/// Rings move out once the cluster reaches this fraction of the spawn ring
const GROWTH_THRESHOLD: f64 = 0.75;
const RADIUS_INCREMENT: f64 = 2.0;
/// Cells kept between the kill ring and the lattice edge
const EDGE_MARGIN: f64 = 2.0;

/// Spawn ring (inner) and kill ring (outer) radii
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RadiusSchedule {
    pub inner: f64,
    pub outer: f64,
}

impl RadiusSchedule {
    pub fn for_length(length: usize) -> Self {
        let inner = SPAWN_RADIUS_FRACTION * (length / 2) as f64;
        Self {
            inner,
            outer: KILL_RADIUS_FACTOR * inner,
        }
    }

    /// Push both rings out if the cluster has grown close to the spawn ring.
    /// Returns whether the rings moved.
    fn grow_for(&mut self, max_radius: f64) -> bool {
        if max_radius > GROWTH_THRESHOLD * self.inner {
            self.inner += RADIUS_INCREMENT;
            self.outer += RADIUS_INCREMENT;
            true
        } else {
            false
        }
    }
}

/// Running cluster statistics; every field only ever increases
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ClusterStats {
    /// Deposited particles, seed excluded
    pub size: usize,
    /// Distance from the seed to the farthest deposited particle
    pub max_radius: f64,
    pub walkers_spawned: u64,
    pub walkers_escaped: u64,
    /// Lattice moves made by all walkers
    pub total_steps: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Growing,
    Done,
}

/// Final numbers of a finished (or interrupted) run
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunSummary {
    pub length: usize,
    pub stats: ClusterStats,
    pub radii: RadiusSchedule,
    pub elapsed: Duration,
}

/// Drives the growth loop: spawns one walker per iteration, deposits it if
/// it sticks, and moves the spawn/kill rings out as the cluster grows.
pub struct AggregationEngine<R> {
    lattice: Lattice,
    source: R,
    stats: ClusterStats,
    radii: RadiusSchedule,
    generation_label: u32,
    generation_bucket: usize,
    radius_limit: f64,
    elapsed: Duration,
}

impl<R: UniformSource> AggregationEngine<R> {
    pub fn new(length: usize, source: R) -> Result<Self> {
        if length <= MIN_LATTICE_LENGTH {
            return Err(DlaError::LatticeTooSmall {
                length,
                min: MIN_LATTICE_LENGTH,
            });
        }

        Ok(Self {
            lattice: Lattice::new(length),
            source,
            stats: ClusterStats::default(),
            radii: RadiusSchedule::for_length(length),
            generation_label: 1,
            generation_bucket: 2 * length,
            radius_limit: (length / 2) as f64 - EDGE_MARGIN,
            elapsed: Duration::ZERO,
        })
    }

    pub fn lattice(&self) -> &Lattice {
        &self.lattice
    }

    pub fn into_lattice(self) -> Lattice {
        self.lattice
    }

    pub fn stats(&self) -> ClusterStats {
        self.stats
    }

    pub fn radii(&self) -> RadiusSchedule {
        self.radii
    }

    pub fn generation_label(&self) -> u32 {
        self.generation_label
    }

    pub fn phase(&self) -> Phase {
        if self.radii.outer < self.radius_limit {
            Phase::Growing
        } else {
            Phase::Done
        }
    }

    /// Run one growth iteration. Returns `None` once the kill ring has
    /// reached the lattice bound.
    pub fn step(&mut self) -> Result<Option<WalkOutcome>> {
        if self.phase() == Phase::Done {
            return Ok(None);
        }
        let started = Instant::now();

        // Cosmetic time bucket for the colormap
        if self.stats.size % self.generation_bucket == 0 {
            self.generation_label += 1;
        }

        let outcome = Walker::spawn(
            &self.lattice,
            self.radii.inner,
            self.radii.outer,
            &mut self.source,
        )?
        .run(&mut self.source)?;

        self.stats.walkers_spawned += 1;
        self.stats.total_steps += outcome.steps();

        match outcome {
            WalkOutcome::Stuck { cell, steps } => {
                self.lattice.deposit(cell, self.generation_label)?;
                self.stats.size += 1;
                self.stats.max_radius = self
                    .stats
                    .max_radius
                    .max(cell.distance_to(self.lattice.seed()));
                trace!(
                    "walker stuck at ({}, {}) after {} steps",
                    cell.row,
                    cell.col,
                    steps
                );
            }
            WalkOutcome::Escaped { cell, steps } => {
                self.stats.walkers_escaped += 1;
                trace!(
                    "walker escaped at ({}, {}) after {} steps",
                    cell.row,
                    cell.col,
                    steps
                );
            }
        }

        if self.radii.grow_for(self.stats.max_radius) {
            debug!(
                "cluster radius {:.2} at size {}: spawn ring {:.1}, kill ring {:.1}",
                self.stats.max_radius, self.stats.size, self.radii.inner, self.radii.outer
            );
        }

        self.elapsed += started.elapsed();
        Ok(Some(outcome))
    }

    /// Grow until done
    pub fn run(&mut self) -> Result<RunSummary> {
        info!(
            "growing cluster on {0}x{0} lattice: spawn ring {1:.1}, kill ring {2:.1}, limit {3:.1}",
            self.lattice.size(),
            self.radii.inner,
            self.radii.outer,
            self.radius_limit
        );

        while self.step()?.is_some() {}

        let summary = self.summary();
        info!(
            "cluster finished: {} particles, radius {:.3}, {} walkers ({} escaped) in {:.3}s",
            summary.stats.size,
            summary.stats.max_radius,
            summary.stats.walkers_spawned,
            summary.stats.walkers_escaped,
            summary.elapsed.as_secs_f64()
        );
        Ok(summary)
    }

    pub fn summary(&self) -> RunSummary {
        RunSummary {
            length: self.lattice.size(),
            stats: self.stats,
            radii: self.radii,
            elapsed: self.elapsed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lattice::Cell;
    use crate::rng::{ScriptedSource, SeededSource};

    fn run_to_completion<R: UniformSource>(engine: &mut AggregationEngine<R>) -> Vec<WalkOutcome> {
        let mut outcomes = Vec::new();
        while let Some(outcome) = engine.step().unwrap() {
            outcomes.push(outcome);
        }
        outcomes
    }

    #[test]
    fn test_initial_state() {
        let engine = AggregationEngine::new(21, ScriptedSource::new(vec![0.0])).unwrap();
        assert_eq!(engine.radii(), RadiusSchedule { inner: 2.0, outer: 2.4 });
        assert_eq!(engine.stats(), ClusterStats::default());
        assert_eq!(engine.generation_label(), 1);
        assert_eq!(engine.phase(), Phase::Growing);
        assert_eq!(engine.lattice().occupied_count(), 1);
    }

    #[test]
    fn test_rejects_small_lattice() {
        for length in [0, 5, 10] {
            let err = AggregationEngine::new(length, SeededSource::new(1)).err();
            assert_eq!(err, Some(DlaError::LatticeTooSmall { length, min: 10 }));
        }
        assert!(AggregationEngine::new(11, SeededSource::new(1)).is_ok());
    }

    #[test]
    fn test_single_walker_sticks_next_to_seed() {
        // Spawn at (10, 12), step left, stick beside the seed
        let mut engine = AggregationEngine::new(21, ScriptedSource::new(vec![0.0, 0.0])).unwrap();
        let outcome = engine.step().unwrap().unwrap();
        assert_eq!(
            outcome,
            WalkOutcome::Stuck {
                cell: Cell::new(10, 11),
                steps: 1
            }
        );

        let stats = engine.stats();
        assert_eq!(stats.size, 1);
        assert_eq!(stats.max_radius, Cell::new(10, 10).distance_to(Cell::new(10, 11)));
        assert_eq!(stats.walkers_spawned, 1);
        assert_eq!(stats.walkers_escaped, 0);

        let lattice = engine.lattice();
        assert_eq!(lattice.occupied_count(), 2);
        assert!(lattice.is_occupied(Cell::new(10, 11)).unwrap());
        assert_eq!(lattice.label(Cell::new(10, 11)).unwrap(), 2);
        // 1.0 is below 0.75 * 2.0, rings stay put
        assert_eq!(engine.radii(), RadiusSchedule { inner: 2.0, outer: 2.4 });
    }

    #[test]
    fn test_escaped_walker_changes_nothing() {
        // Spawn at (10, 12), step right to (10, 13), beyond the 2.4 kill ring
        let mut engine = AggregationEngine::new(21, ScriptedSource::new(vec![0.0, 0.5])).unwrap();
        let before = engine.lattice().clone();
        let outcome = engine.step().unwrap().unwrap();
        assert!(matches!(outcome, WalkOutcome::Escaped { .. }));

        let stats = engine.stats();
        assert_eq!(stats.size, 0);
        assert_eq!(stats.max_radius, 0.0);
        assert_eq!(stats.walkers_escaped, 1);
        assert_eq!(engine.lattice(), &before);
        assert_eq!(engine.radii(), RadiusSchedule { inner: 2.0, outer: 2.4 });
    }

    #[test]
    fn test_walker_spawned_on_bare_seed_walks_off() {
        // L = 11: spawn ring 1.0, theta = 0.2 pi truncates onto the seed (5, 5).
        // The seed has no occupied neighbor, so the walker steps left and sticks.
        let mut engine = AggregationEngine::new(11, ScriptedSource::new(vec![0.1, 0.0])).unwrap();
        let outcome = engine.step().unwrap().unwrap();
        assert_eq!(
            outcome,
            WalkOutcome::Stuck {
                cell: Cell::new(5, 4),
                steps: 1
            }
        );
        assert_eq!(engine.stats().size, 1);
        assert_eq!(engine.stats().walkers_escaped, 0);
        assert!(engine.lattice().is_occupied(Cell::new(5, 4)).unwrap());
        let lattice = engine.lattice();
        assert_eq!(lattice.label(lattice.seed()).unwrap(), 1);
        assert_eq!(lattice.occupied_count(), 2);
    }

    #[test]
    fn test_smallest_lattice_terminates() {
        for seed in 0..20 {
            let mut engine = AggregationEngine::new(11, SeededSource::new(seed)).unwrap();
            let summary = engine.run().unwrap();
            assert_eq!(engine.phase(), Phase::Done);
            assert!(summary.radii.outer >= 3.0);
            assert_eq!(engine.lattice().seed(), Cell::new(5, 5));
            assert_eq!(engine.lattice().occupied_count(), summary.stats.size + 1);
        }
    }

    #[test]
    fn test_small_lattices_terminate() {
        for length in 11..=40 {
            let source = SeededSource::new(length as u64);
            let mut engine = AggregationEngine::new(length, source).unwrap();
            let summary = engine.run().unwrap();
            assert_eq!(engine.phase(), Phase::Done);
            assert!(summary.radii.outer >= (length / 2) as f64 - 2.0);
            assert!(engine.step().unwrap().is_none());
        }
    }

    #[test]
    fn test_counters_only_increase() {
        let mut engine = AggregationEngine::new(41, SeededSource::new(3)).unwrap();
        let initial = engine.radii();
        let ring_gap = initial.outer - initial.inner;
        let mut prev_stats = engine.stats();
        let mut prev_radii = initial;
        let mut prev_label = engine.generation_label();

        while engine.step().unwrap().is_some() {
            let stats = engine.stats();
            let radii = engine.radii();
            assert!(stats.size >= prev_stats.size);
            assert!(stats.size <= prev_stats.size + 1);
            assert!(stats.max_radius >= prev_stats.max_radius);
            assert_eq!(stats.walkers_spawned, prev_stats.walkers_spawned + 1);
            assert!(radii.inner >= prev_radii.inner);
            assert!(radii.outer >= prev_radii.outer);
            assert!((radii.outer - radii.inner - ring_gap).abs() < 1e-9);
            assert!(radii.outer > radii.inner);
            assert!(engine.generation_label() >= prev_label);
            prev_stats = stats;
            prev_radii = radii;
            prev_label = engine.generation_label();
        }
        assert!(prev_stats.size > 0);
    }

    #[test]
    fn test_occupied_cells_never_change() {
        let mut engine = AggregationEngine::new(41, SeededSource::new(5)).unwrap();
        let mut before = engine.lattice().cells().to_vec();
        while engine.step().unwrap().is_some() {
            let after = engine.lattice().cells();
            for (old, new) in before.iter().zip(after) {
                if *old != 0 {
                    assert_eq!(old, new);
                }
            }
            before = after.to_vec();
        }
    }

    #[test]
    fn test_every_deposit_touches_cluster() {
        let mut engine = AggregationEngine::new(41, SeededSource::new(9)).unwrap();
        while let Some(outcome) = engine.step().unwrap() {
            if let WalkOutcome::Stuck { cell, .. } = outcome {
                // The deposit only adds `cell` itself, so its neighborhood is
                // exactly what the walker saw when it stuck.
                let lattice = engine.lattice();
                assert!(lattice.is_occupied(cell).unwrap());
                assert!(lattice.has_occupied_neighbor(cell).unwrap());
            }
        }
        let stats = engine.stats();
        assert_eq!(engine.lattice().occupied_count(), stats.size + 1);
    }

    #[test]
    fn test_escapes_are_counted() {
        let mut engine = AggregationEngine::new(31, SeededSource::new(4)).unwrap();
        let outcomes = run_to_completion(&mut engine);
        let escaped = outcomes.iter().filter(|o| !o.is_stuck()).count();
        let stats = engine.stats();
        assert_eq!(stats.walkers_spawned as usize, outcomes.len());
        assert_eq!(stats.walkers_escaped as usize, escaped);
        assert_eq!(stats.size, outcomes.len() - escaped);
        assert_eq!(
            stats.total_steps,
            outcomes.iter().map(|o| o.steps()).sum::<u64>()
        );
    }

    #[test]
    fn test_same_seed_same_cluster() {
        let mut a = AggregationEngine::new(41, SeededSource::new(2024)).unwrap();
        let mut b = AggregationEngine::new(41, SeededSource::new(2024)).unwrap();
        let summary_a = a.run().unwrap();
        let summary_b = b.run().unwrap();

        assert_eq!(summary_a.stats, summary_b.stats);
        assert_eq!(summary_a.radii, summary_b.radii);
        assert_eq!(a.into_lattice(), b.into_lattice());
    }

    #[test]
    fn test_generation_labels_follow_buckets() {
        let mut engine = AggregationEngine::new(41, SeededSource::new(17)).unwrap();
        engine.run().unwrap();
        let lattice = engine.lattice();
        let size = engine.stats().size;
        // Every deposit is labelled after the seed, and never beyond the last label
        let labels: Vec<u32> = lattice
            .cells()
            .iter()
            .copied()
            .filter(|&label| label > 1)
            .collect();
        assert_eq!(labels.len(), size);
        assert!(labels.iter().all(|&label| label <= engine.generation_label()));
    }
}
