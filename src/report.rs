use crate::color::ColorLut;
use crate::export;
use crate::lattice::Lattice;
use crate::simulation::RunSummary;
use chrono::NaiveDateTime;
use log::{info, warn};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("run directory {path} already exists")]
    DirectoryExists { path: PathBuf },
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to write colormap: {0}")]
    Image(#[from] image::ImageError),
    #[error("failed to write growth animation: {0}")]
    Animation(#[from] gif::EncodingError),
    #[error("lattice of length {length} is too large for an animation")]
    TooLarge { length: usize },
}

/// Everything a finished run hands to its persistence layer
#[derive(Debug, Clone, Copy)]
pub struct RunRecord<'a> {
    pub run_name: &'a str,
    pub summary: &'a RunSummary,
    pub lattice: &'a Lattice,
}

/// Receives the results of a finished run
pub trait RunSink {
    /// Persist the run; returns the paths that were written
    fn save(&mut self, record: &RunRecord<'_>) -> Result<Vec<PathBuf>, ReportError>;
}

/// Build the plain-text run report
pub fn render_report(
    record: &RunRecord<'_>,
    timestamp: NaiveDateTime,
    colormap: Option<&str>,
) -> String {
    let summary = record.summary;
    let stats = &summary.stats;
    let length = summary.length;
    let field = |label: &str, value: String| format!("{:>18}: {}\n", label, value);

    let mut out = format!(
        "Run Name: {}        Date: {}        Time: {}\n",
        record.run_name,
        timestamp.format("%d-%m-%y"),
        timestamp.format("%H:%M")
    );
    out.push_str(&"-".repeat(80));
    out.push_str("\nPARAMETERS\n");
    out.push_str(&field("Lattice length", length.to_string()));
    out.push_str(&field("Lattice points", (length * length).to_string()));
    out.push_str("OUTPUT\n");
    out.push_str(&field("Cluster size", stats.size.to_string()));
    // Debug formatting keeps the decimal point on whole floats
    out.push_str(&field("Cluster radius", format!("{:?}", stats.max_radius)));
    out.push_str(&field(
        "Execution time",
        format!("{:?} sec", summary.elapsed.as_secs_f64()),
    ));
    out.push_str(&field("Walkers spawned", stats.walkers_spawned.to_string()));
    out.push_str(&field("Walkers escaped", stats.walkers_escaped.to_string()));
    out.push_str("FIGURES\n");
    out.push_str(&field("Colormap", colormap.unwrap_or("none").to_string()));
    out
}

/// A per-run output directory under a base directory
#[derive(Debug)]
pub struct RunDirectory {
    path: PathBuf,
    lut: ColorLut,
    write_image: bool,
    write_animation: bool,
}

impl RunDirectory {
    /// Create `<base>/<run_name>`. An existing directory is an error unless
    /// `replace` is set, in which case it is removed first.
    pub fn create(base: &Path, run_name: &str, replace: bool) -> Result<Self, ReportError> {
        let path = base.join(run_name);
        if path.exists() {
            if !replace {
                return Err(ReportError::DirectoryExists { path });
            }
            warn!("replacing existing run directory {}", path.display());
            fs::remove_dir_all(&path).map_err(|source| ReportError::Io {
                path: path.clone(),
                source,
            })?;
        }
        fs::create_dir_all(&path).map_err(|source| ReportError::Io {
            path: path.clone(),
            source,
        })?;

        Ok(Self {
            path,
            lut: ColorLut::default(),
            write_image: true,
            write_animation: false,
        })
    }

    pub fn with_image(mut self, enabled: bool) -> Self {
        self.write_image = enabled;
        self
    }

    pub fn with_animation(mut self, enabled: bool) -> Self {
        self.write_animation = enabled;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Path of a run artifact, e.g. `file_for("snow", "data.txt")` -> `<dir>/snow-data.txt`
    pub fn file_for(&self, run_name: &str, suffix: &str) -> PathBuf {
        self.path.join(format!("{}-{}", run_name, suffix))
    }
}

impl RunSink for RunDirectory {
    fn save(&mut self, record: &RunRecord<'_>) -> Result<Vec<PathBuf>, ReportError> {
        let mut written = Vec::new();

        let cmap_name = format!("{}-cmap.png", record.run_name);
        if self.write_image {
            let path = self.path.join(&cmap_name);
            export::save_colormap(record.lattice, &self.lut, &path)?;
            written.push(path);
        }

        if self.write_animation {
            let path = self.file_for(record.run_name, "growth.gif");
            export::save_growth_animation(record.lattice, &self.lut, &path)?;
            written.push(path);
        }

        let now = chrono::Local::now().naive_local();
        let colormap = self.write_image.then_some(cmap_name.as_str());
        let report = render_report(record, now, colormap);
        let path = self.file_for(record.run_name, "data.txt");
        fs::write(&path, report).map_err(|source| ReportError::Io {
            path: path.clone(),
            source,
        })?;
        written.push(path);

        for path in &written {
            info!("wrote {}", path.display());
        }
        Ok(written)
    }
}
