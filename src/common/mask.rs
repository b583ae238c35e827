use std::ops::Deref;

use super::{
    error::{QRError, QRResult},
    metadata::Color,
};
use crate::builder::QR;

#[derive(Debug, PartialEq, Eq, Copy, Clone, PartialOrd, Ord, Hash)]
pub struct MaskPattern(u8);

impl MaskPattern {
    pub const COUNT: u8 = 8;

    pub fn new(pattern: u8) -> QRResult<Self> {
        if pattern >= Self::COUNT {
            return Err(QRError::InvalidMaskPattern(pattern));
        }
        Ok(Self(pattern))
    }
}

impl Deref for MaskPattern {
    type Target = u8;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

mod mask_functions {
    pub fn checkerboard(r: i16, c: i16) -> bool {
        (r + c) & 1 == 0
    }

    pub fn horizontal_lines(r: i16, _: i16) -> bool {
        r & 1 == 0
    }

    pub fn vertical_lines(_: i16, c: i16) -> bool {
        c % 3 == 0
    }

    pub fn diagonal_lines(r: i16, c: i16) -> bool {
        (r + c) % 3 == 0
    }

    pub fn large_checkerboard(r: i16, c: i16) -> bool {
        ((r >> 1) + (c / 3)) & 1 == 0
    }

    // Products reach 176², beyond i16
    pub fn fields(r: i16, c: i16) -> bool {
        let p = r as i32 * c as i32;
        (p & 1) + (p % 3) == 0
    }

    pub fn diamonds(r: i16, c: i16) -> bool {
        let p = r as i32 * c as i32;
        ((p & 1) + (p % 3)) & 1 == 0
    }

    pub fn meadow(r: i16, c: i16) -> bool {
        let p = r as i32 * c as i32;
        ((((r + c) & 1) as i32) + (p % 3)) & 1 == 0
    }
}

impl MaskPattern {
    /// Condition under which a data module at (row, col) gets inverted.
    pub fn mask_function(self) -> fn(i16, i16) -> bool {
        match *self {
            0b000 => mask_functions::checkerboard,
            0b001 => mask_functions::horizontal_lines,
            0b010 => mask_functions::vertical_lines,
            0b011 => mask_functions::diagonal_lines,
            0b100 => mask_functions::large_checkerboard,
            0b101 => mask_functions::fields,
            0b110 => mask_functions::diamonds,
            0b111 => mask_functions::meadow,
            _ => unreachable!("Invalid mask pattern {}", self.0),
        }
    }
}


// Penalty
//------------------------------------------------------------------------------

static RUN_BASE: u32 = 3;
static BLOCK_PENALTY: u32 = 3;
static FINDER_LIKE_PENALTY: u32 = 40;
static BALANCE_FACTOR: u32 = 2;

const D: Color = Color::Dark;
const L: Color = Color::Light;

static FINDER_LIKE: [Color; 11] = [D, L, D, D, D, L, D, L, L, L, L];
static FINDER_LIKE_REV: [Color; 11] = [L, L, L, L, D, L, D, D, D, L, D];

pub fn compute_total_penalty(qr: &QR) -> u32 {
    let w = qr.width();
    let rows: Vec<Vec<Color>> =
        (0..w).map(|r| (0..w).map(|c| *qr.get(r as i16, c as i16)).collect()).collect();
    let cols: Vec<Vec<Color>> = (0..w).map(|c| rows.iter().map(|row| row[c]).collect()).collect();

    let run_pen: u32 = rows.iter().chain(cols.iter()).map(|l| compute_run_penalty(l)).sum();
    let blk_pen = compute_block_penalty(&rows);
    let fp_pen: u32 =
        rows.iter().chain(cols.iter()).map(|l| compute_finder_pattern_penalty(l)).sum();
    let bal_pen = compute_balance_penalty(qr.count_dark_modules(), w * w);
    run_pen + blk_pen + fp_pen + bal_pen
}

// Runs of 5 same colored modules score 3, every extra module 1 more
fn compute_run_penalty(line: &[Color]) -> u32 {
    line.chunk_by(|a, b| a == b)
        .map(|run| run.len() as u32)
        .filter(|&n| n >= 5)
        .map(|n| RUN_BASE + n - 5)
        .sum()
}

fn compute_block_penalty(rows: &[Vec<Color>]) -> u32 {
    rows.windows(2)
        .map(|pair| {
            let (top, bot) = (&pair[0], &pair[1]);
            (0..top.len() - 1)
                .filter(|&c| {
                    let clr = top[c];
                    clr == top[c + 1] && clr == bot[c] && clr == bot[c + 1]
                })
                .count() as u32
        })
        .sum::<u32>()
        * BLOCK_PENALTY
}

fn compute_finder_pattern_penalty(line: &[Color]) -> u32 {
    line.windows(FINDER_LIKE.len())
        .filter(|win| *win == FINDER_LIKE || *win == FINDER_LIKE_REV)
        .count() as u32
        * FINDER_LIKE_PENALTY
}

// Deviation of dark percentage from 50, rounded down, times the balance factor
fn compute_balance_penalty(dark_cnt: usize, total: usize) -> u32 {
    let dev = (dark_cnt * 100).abs_diff(total * 50) / total;
    dev as u32 * BALANCE_FACTOR
}

#[cfg(test)]
mod penalty_tests {
    use super::{
        compute_balance_penalty, compute_block_penalty, compute_finder_pattern_penalty,
        compute_run_penalty,
    };
    use crate::common::metadata::Color;

    fn line(s: &str) -> Vec<Color> {
        s.chars().map(|ch| if ch == '#' { Color::Dark } else { Color::Light }).collect()
    }

    #[test]
    fn test_run_penalty() {
        assert_eq!(compute_run_penalty(&line("#.#.#.#.#")), 0);
        assert_eq!(compute_run_penalty(&line("####.")), 0);
        assert_eq!(compute_run_penalty(&line("#####.")), 3);
        assert_eq!(compute_run_penalty(&line(".#######")), 5);
        assert_eq!(compute_run_penalty(&line("#####.....#")), 6);
        assert_eq!(compute_run_penalty(&line(".....................")), 19);
    }

    #[test]
    fn test_block_penalty() {
        let rows = vec![line("##."), line("##."), line("#..")];
        assert_eq!(compute_block_penalty(&rows), 3);
        let rows = vec![line("###"), line("###"), line("###")];
        assert_eq!(compute_block_penalty(&rows), 12);
        let rows = vec![line("#.#"), line(".#."), line("#.#")];
        assert_eq!(compute_block_penalty(&rows), 0);
    }

    #[test]
    fn test_finder_pattern_penalty() {
        assert_eq!(compute_finder_pattern_penalty(&line("#.###.#....")), 40);
        assert_eq!(compute_finder_pattern_penalty(&line("....#.###.#")), 40);
        assert_eq!(compute_finder_pattern_penalty(&line("....#.###.#....")), 80);
        assert_eq!(compute_finder_pattern_penalty(&line("#.###.#...")), 0);
        assert_eq!(compute_finder_pattern_penalty(&line("##.###.#....#")), 40);
    }

    #[test]
    fn test_balance_penalty() {
        assert_eq!(compute_balance_penalty(50, 100), 0);
        assert_eq!(compute_balance_penalty(54, 100), 8);
        assert_eq!(compute_balance_penalty(46, 100), 8);
        assert_eq!(compute_balance_penalty(0, 441), 100);
        assert_eq!(compute_balance_penalty(221, 441), 0);
    }
}
