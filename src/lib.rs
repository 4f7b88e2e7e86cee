//! On-lattice diffusion-limited aggregation.
//!
//! [`simulation::AggregationEngine`] grows a cluster on a [`lattice::Lattice`]
//! one [`walker::Walker`] at a time. Everything that touches the filesystem or
//! the terminal lives in [`report`], [`export`] and the viewer modules.

pub mod app;
pub mod braille;
pub mod color;
pub mod config;
pub mod error;
pub mod export;
pub mod lattice;
pub mod report;
pub mod rng;
pub mod settings;
pub mod simulation;
pub mod ui;
pub mod walker;
