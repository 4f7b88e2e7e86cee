use crate::color::ColorLut;
use crate::lattice::Lattice;
use crate::report::ReportError;
use image::{Rgb, RgbImage};
use std::borrow::Cow;
use std::collections::BTreeSet;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// Upper bound on frames in the growth animation
pub const MAX_ANIMATION_FRAMES: usize = 60;
/// Delay between animation frames, in hundredths of a second
const FRAME_DELAY: u16 = 8;

/// Render the lattice one pixel per cell, colored by generation label.
/// Pixel (x, y) is lattice cell (row = y, col = x).
pub fn colormap_image(lattice: &Lattice, lut: &ColorLut) -> RgbImage {
    let side = lattice.size();
    let max_label = lattice.max_label();
    let cells = lattice.cells();
    RgbImage::from_fn(side as u32, side as u32, |x, y| {
        let label = cells[y as usize * side + x as usize];
        Rgb(lut.color_for(label, max_label))
    })
}

pub fn save_colormap(lattice: &Lattice, lut: &ColorLut, path: &Path) -> Result<(), ReportError> {
    colormap_image(lattice, lut).save(path)?;
    Ok(())
}

/// Label cut-offs for each animation frame: frame `i` shows every cell whose
/// label is at most `thresholds[i]`. The last frame always shows the full cluster.
pub fn frame_thresholds(lattice: &Lattice, max_frames: usize) -> Vec<u32> {
    let labels: Vec<u32> = lattice
        .cells()
        .iter()
        .copied()
        .filter(|&label| label != 0)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    if labels.len() <= max_frames.max(1) {
        return labels;
    }

    let stride = labels.len() as f64 / max_frames.max(1) as f64;
    let mut thresholds: Vec<u32> = (1..=max_frames)
        .map(|i| labels[((i as f64 * stride) as usize).min(labels.len()) - 1])
        .collect();
    thresholds.dedup();
    thresholds
}

/// Write an animated GIF that reveals the cluster in deposition order
pub fn save_growth_animation(
    lattice: &Lattice,
    lut: &ColorLut,
    path: &Path,
) -> Result<(), ReportError> {
    let side = u16::try_from(lattice.size()).map_err(|_| ReportError::TooLarge {
        length: lattice.size(),
    })?;
    let max_label = lattice.max_label();

    let file = File::create(path).map_err(|source| ReportError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut encoder = gif::Encoder::new(BufWriter::new(file), side, side, &lut.palette())?;
    encoder.set_repeat(gif::Repeat::Infinite)?;

    for threshold in frame_thresholds(lattice, MAX_ANIMATION_FRAMES) {
        let buffer: Vec<u8> = lattice
            .cells()
            .iter()
            .map(|&label| {
                if label != 0 && label <= threshold {
                    lut.level_for(label, max_label) as u8
                } else {
                    0
                }
            })
            .collect();

        let mut frame = gif::Frame::default();
        frame.width = side;
        frame.height = side;
        frame.delay = FRAME_DELAY;
        frame.buffer = Cow::Owned(buffer);
        encoder.write_frame(&frame)?;
    }

    Ok(())
}
