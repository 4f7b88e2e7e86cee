/// Number of discrete colors in the cluster colormap
pub const COLORMAP_LEVELS: usize = 10;

/// The gnuplot2 colormap (black → blue → magenta → yellow → white)
fn gnuplot2(x: f64) -> [f64; 3] {
    let r = x / 0.32 - 0.78125;
    let g = 2.0 * x - 0.84;
    let b = if x < 0.25 {
        4.0 * x
    } else if x < 0.92 {
        -2.0 * x + 1.84
    } else {
        x / 0.08 - 11.5
    };
    [r.clamp(0.0, 1.0), g.clamp(0.0, 1.0), b.clamp(0.0, 1.0)]
}

/// Pre-computed, quantized colormap for generation labels.
///
/// Labels are normalized against the largest label on the lattice, so empty
/// cells (label 0) always map to the first level.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorLut {
    levels: Vec<[u8; 3]>,
}

impl Default for ColorLut {
    fn default() -> Self {
        Self::gnuplot2(COLORMAP_LEVELS)
    }
}

impl ColorLut {
    pub fn gnuplot2(levels: usize) -> Self {
        let levels = levels.max(2);
        let levels = (0..levels)
            .map(|i| {
                let [r, g, b] = gnuplot2(i as f64 / (levels - 1) as f64);
                [
                    (r * 255.0).round() as u8,
                    (g * 255.0).round() as u8,
                    (b * 255.0).round() as u8,
                ]
            })
            .collect();
        Self { levels }
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    /// Quantized level for `label` on a lattice whose largest label is `max_label`
    pub fn level_for(&self, label: u32, max_label: u32) -> usize {
        if max_label == 0 {
            return 0;
        }
        let t = label.min(max_label) as f64 / max_label as f64;
        ((t * self.len() as f64) as usize).min(self.len() - 1)
    }

    pub fn rgb(&self, level: usize) -> [u8; 3] {
        self.levels[level.min(self.levels.len() - 1)]
    }

    pub fn color_for(&self, label: u32, max_label: u32) -> [u8; 3] {
        self.rgb(self.level_for(label, max_label))
    }

    /// Flat RGB triples, one per level
    pub fn palette(&self) -> Vec<u8> {
        self.levels.iter().flatten().copied().collect()
    }
}
