use crate::color::ColorLut;
use crate::lattice::Lattice;
use crate::simulation::RunSummary;

/// State of the terminal preview of a finished cluster
pub struct App {
    pub run_name: String,
    pub summary: RunSummary,
    pub lattice: Lattice,
    pub color_lut: ColorLut,
    pub fullscreen_mode: bool,
    pub should_quit: bool,
}

impl App {
    pub fn new(run_name: impl Into<String>, summary: RunSummary, lattice: Lattice) -> Self {
        Self {
            run_name: run_name.into(),
            summary,
            lattice,
            color_lut: ColorLut::default(),
            fullscreen_mode: false,
            should_quit: false,
        }
    }

    pub fn toggle_fullscreen(&mut self) {
        self.fullscreen_mode = !self.fullscreen_mode;
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    /// Fraction of the lattice area covered by the cluster
    pub fn fill_ratio(&self) -> f64 {
        let points = self.lattice.size() * self.lattice.size();
        if points == 0 {
            0.0
        } else {
            self.lattice.occupied_count() as f64 / points as f64
        }
    }

    /// Share of spawned walkers that escaped the kill ring
    pub fn escape_ratio(&self) -> f64 {
        let stats = self.summary.stats;
        if stats.walkers_spawned == 0 {
            0.0
        } else {
            stats.walkers_escaped as f64 / stats.walkers_spawned as f64
        }
    }
}
