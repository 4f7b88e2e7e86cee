use crate::color::ColorLut;
use crate::lattice::Lattice;
use ratatui::style::Color;

/// First codepoint of the Unicode Braille block. A character packs a 2x4 dot
/// grid into the low byte:
/// ```text
/// col 0: rows 0..3 -> 0x01 0x02 0x04 0x40
/// col 1: rows 0..3 -> 0x08 0x10 0x20 0x80
/// ```
const BRAILLE_BASE: u32 = 0x2800;

/// Bit for dot (column, row)
const BRAILLE_DOTS: [[u8; 4]; 2] = [[0x01, 0x02, 0x04, 0x40], [0x08, 0x10, 0x20, 0x80]];

/// One terminal character of the canvas
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BrailleCell {
    pub x: u16,
    pub y: u16,
    pub char: char,
    pub color: Color,
}

/// Lattice cells per Braille dot so the whole (square) lattice fits the canvas
pub fn cells_per_dot(lattice_size: usize, canvas_width: u16, canvas_height: u16) -> f32 {
    let dots_wide = (canvas_width as usize * 2).max(1);
    let dots_high = (canvas_height as usize * 4).max(1);
    let size = lattice_size as f32;
    (size / dots_wide as f32).max(size / dots_high as f32).max(1.0)
}

/// Render the lattice to Braille characters, colored by the mean generation
/// label of the dots in each character
pub fn render_to_braille(
    lattice: &Lattice,
    canvas_width: u16,
    canvas_height: u16,
    color_lut: &ColorLut,
) -> Vec<BrailleCell> {
    let size = lattice.size();
    let cells = lattice.cells();
    let max_label = lattice.max_label();
    let scale = cells_per_dot(size, canvas_width, canvas_height);

    let mut out = Vec::new();

    for cy in 0..canvas_height {
        for cx in 0..canvas_width {
            let mut pattern: u8 = 0;
            let mut label_sum: u64 = 0;
            let mut dot_count: u64 = 0;

            let base_bx = cx as usize * 2;
            let base_by = cy as usize * 4;

            for dx in 0..2 {
                for dy in 0..4 {
                    let col = ((base_bx + dx) as f32 * scale) as usize;
                    let row = ((base_by + dy) as f32 * scale) as usize;
                    if row >= size || col >= size {
                        continue;
                    }

                    let label = cells[row * size + col];
                    if label != 0 {
                        pattern |= BRAILLE_DOTS[dx][dy];
                        label_sum += label as u64;
                        dot_count += 1;
                    }
                }
            }

            // Only emit cells that have at least one dot
            if pattern != 0 {
                let braille_char = char::from_u32(BRAILLE_BASE + pattern as u32).unwrap_or(' ');
                let mean_label = (label_sum / dot_count) as u32;
                // Level 0 is black, keep occupied dots visible on dark terminals
                let level = color_lut.level_for(mean_label, max_label).max(1);
                let [r, g, b] = color_lut.rgb(level);

                out.push(BrailleCell {
                    x: cx,
                    y: cy,
                    char: braille_char,
                    color: Color::Rgb(r, g, b),
                });
            }
        }
    }

    out
}
