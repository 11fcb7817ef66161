use std::ops::Deref;

use tracing::debug;

use super::error::{QRError, QRResult};
use super::metadata::Color;
use crate::builder::QR;

#[derive(Debug, PartialEq, Eq, Copy, Clone, PartialOrd, Ord, Hash)]
pub struct MaskPattern(u8);

impl MaskPattern {
    pub fn new(pattern: u8) -> Self {
        debug_assert!(pattern < 8, "Invalid masking pattern: {pattern}");
        Self(pattern)
    }

    pub fn try_new(pattern: u8) -> QRResult<Self> {
        if pattern >= 8 {
            return Err(QRError::InvalidInput("mask pattern must be within 0..=7"));
        }
        Ok(Self(pattern))
    }

    pub fn all() -> impl Iterator<Item = Self> {
        (0..8).map(Self)
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

    pub fn fields(r: i16, c: i16) -> bool {
        ((r * c) & 1) + ((r * c) % 3) == 0
    }

    pub fn diamonds(r: i16, c: i16) -> bool {
        (((r * c) & 1) + ((r * c) % 3)) & 1 == 0
    }

    pub fn meadow(r: i16, c: i16) -> bool {
        (((r + c) & 1) + ((r * c) % 3)) & 1 == 0
    }
}

impl MaskPattern {
    pub fn mask_functions(self) -> fn(i16, i16) -> bool {
        match *self {
            0b000 => mask_functions::checkerboard,
            0b001 => mask_functions::horizontal_lines,
            0b010 => mask_functions::vertical_lines,
            0b011 => mask_functions::diagonal_lines,
            0b100 => mask_functions::large_checkerboard,
            0b101 => mask_functions::fields,
            0b110 => mask_functions::diamonds,
            0b111 => mask_functions::meadow,
            _ => unreachable!("Invalid pattern"),
        }
    }
}

// Mask selection
//------------------------------------------------------------------------------

// Tries every pattern on a copy of the matrix and keeps the first one with the lowest penalty
pub fn apply_best_mask(qr: &mut QR) -> (MaskPattern, u32) {
    let scores = MaskPattern::all()
        .map(|m| {
            let mut candidate = qr.clone();
            candidate.apply_mask(m);
            let penalty = compute_total_penalty(&candidate);
            debug!(mask = *m, penalty, "Scored mask pattern");
            (m, penalty)
        })
        .collect::<Vec<_>>();

    // min_by_key returns the first minimum, so ties resolve to the lowest id
    let (best_mask, penalty) =
        scores.into_iter().min_by_key(|&(_, p)| p).unwrap_or((MaskPattern(0), u32::MAX));
    qr.apply_mask(best_mask);
    (best_mask, penalty)
}

pub fn compute_total_penalty(qr: &QR) -> u32 {
    let w = qr.width() as i16;
    let row_pen = compute_line_penalty(w, |i, j| *qr.get(i, j));
    let col_pen = compute_line_penalty(w, |i, j| *qr.get(j, i));
    let blk_pen = compute_block_penalty(qr);
    let bal_pen = compute_balance_penalty(qr);
    row_pen + col_pen + blk_pen + bal_pen
}

// Adjacent runs and finder-like patterns along every line returned by `get(line, index)`
fn compute_line_penalty(w: i16, get: impl Fn(i16, i16) -> Color) -> u32 {
    let mut pen = 0;
    for i in 0..w {
        let mut run_clr = Color::Light;
        let mut run_len = 0;
        let mut history = FinderPenalty::new(w);
        for j in 0..w {
            let clr = get(i, j);
            if clr == run_clr {
                run_len += 1;
                if run_len == 5 {
                    pen += PENALTY_N1;
                } else if run_len > 5 {
                    pen += 1;
                }
            } else {
                history.add_history(run_len);
                if run_clr == Color::Light {
                    pen += history.count_patterns() * PENALTY_N3;
                }
                run_clr = clr;
                run_len = 1;
            }
        }
        pen += history.terminate_and_count(run_clr, run_len) * PENALTY_N3;
    }
    pen
}

fn compute_block_penalty(qr: &QR) -> u32 {
    let mut pen = 0;
    let w = qr.width() as i16;
    for r in 0..w - 1 {
        for c in 0..w - 1 {
            let clr = *qr.get(r, c);
            if clr == *qr.get(r + 1, c) && clr == *qr.get(r, c + 1) && clr == *qr.get(r + 1, c + 1)
            {
                pen += PENALTY_N2;
            }
        }
    }
    pen
}

// 10 points for every full 5% step the dark ratio sits away from 50%
fn compute_balance_penalty(qr: &QR) -> u32 {
    let dark = qr.count_dark_modules();
    let total = qr.width() * qr.width();
    let k = (((dark * 20).abs_diff(total * 10) + total - 1) / total).saturating_sub(1);
    k as u32 * PENALTY_N4
}

// Run lengths of the last seven runs, newest first, with the light border
// outside the symbol folded into the first and last runs
struct FinderPenalty {
    width: u32,
    history: [u32; 7],
}

impl FinderPenalty {
    fn new(width: i16) -> Self {
        Self { width: width as u32, history: [0; 7] }
    }

    fn add_history(&mut self, mut run_len: u32) {
        if self.history[0] == 0 {
            run_len += self.width;
        }
        self.history.copy_within(0..6, 1);
        self.history[0] = run_len;
    }

    // Dark-light-dark-light-dark runs in 1:1:3:1:1 with 4 light modules on either side
    fn count_patterns(&self) -> u32 {
        let h = &self.history;
        let n = h[1];
        let core = n > 0 && h[2] == n && h[3] == n * 3 && h[4] == n && h[5] == n;
        u32::from(core && (h[0] >= n * 4 || h[6] >= n * 4))
    }

    fn terminate_and_count(mut self, run_clr: Color, mut run_len: u32) -> u32 {
        if run_clr == Color::Dark {
            self.add_history(run_len);
            run_len = 0;
        }
        run_len += self.width;
        self.add_history(run_len);
        self.count_patterns()
    }
}

#[cfg(test)]
mod mask_tests {

    use test_case::test_case;

    use super::{apply_best_mask, compute_line_penalty, compute_total_penalty, MaskPattern};
    use crate::builder::{Module, QR};
    use crate::common::error::QRError;
    use crate::common::metadata::{Color, ECLevel, Version};

    fn qr_from_rows(rows: &[&str]) -> QR {
        let ver = Version(1);
        let mut qr = QR::new(ver, ECLevel::L);
        let w = ver.width() as i16;
        for r in 0..w {
            for c in 0..w {
                let clr = rows
                    .get(r as usize)
                    .and_then(|row| row.as_bytes().get(c as usize))
                    .map_or(Color::Light, |&b| Color::from(b == b'#'));
                qr.set(r, c, Module::Func(clr));
            }
        }
        qr
    }

    #[test_case(0, 0, 0, true)]
    #[test_case(0, 1, 0, false)]
    #[test_case(1, 3, 5, false)]
    #[test_case(2, 4, 3, true)]
    #[test_case(3, 2, 1, true)]
    #[test_case(4, 2, 3, true)]
    #[test_case(4, 0, 3, false)]
    #[test_case(5, 2, 3, true)]
    #[test_case(6, 4, 5, true)]
    #[test_case(7, 1, 3, true)]
    #[test_case(7, 1, 1, false)]
    fn test_mask_functions(pattern: u8, r: i16, c: i16, exp: bool) {
        let mask_fn = MaskPattern::new(pattern).mask_functions();
        assert_eq!(mask_fn(r, c), exp);
    }

    #[test]
    fn test_try_new() {
        assert_eq!(MaskPattern::try_new(7), Ok(MaskPattern::new(7)));
        assert!(matches!(MaskPattern::try_new(8), Err(QRError::InvalidInput(_))));
    }

    #[test]
    fn test_all_light_penalty() {
        let qr = qr_from_rows(&[]);
        // Every line is one light run of 21, every 2x2 block matches, 0% dark is 9 steps out
        assert_eq!(compute_total_penalty(&qr), 42 * 19 + 400 * 3 + 90);
    }

    #[test_case("#.###.#.............." => 432; "finder at start")]
    #[test_case("..............#.###.#" => 432; "finder at end")]
    #[test_case("#.##.##.............." => 392; "wrong ratio")]
    #[test_case("#...#.###.#...#......" => 384; "narrow light border")]
    fn test_line_penalty(line: &str) -> u32 {
        let line = line.as_bytes();
        compute_line_penalty(21, |i, j| {
            if i == 0 {
                Color::from(line[j as usize] == b'#')
            } else {
                Color::Light
            }
        })
    }

    #[test]
    fn test_best_mask_has_min_penalty() {
        let mut qr = QR::new(Version(2), ECLevel::M);
        qr.draw_all_function_patterns();
        qr.reserve_format_area();
        let w = qr.width() as i16;
        for r in 0..w {
            for c in 0..w {
                if qr.get(r, c) == Module::Empty {
                    qr.set(r, c, Module::Data(Color::from((r * 7 + c * 3) % 5 == 0)));
                }
            }
        }
        let (best, penalty) = apply_best_mask(&mut qr);
        assert_eq!(qr.mask(), Some(best));
        assert_eq!(compute_total_penalty(&qr), penalty);
        for m in MaskPattern::all() {
            let mut candidate = qr.clone();
            candidate.apply_mask(best);
            candidate.apply_mask(m);
            let p = compute_total_penalty(&candidate);
            assert!(penalty <= p, "Mask {} scores {p}, lower than best {penalty}", *m);
            if p == penalty {
                assert!(best <= m);
            }
        }
    }
}

// Global constants
//------------------------------------------------------------------------------

static PENALTY_N1: u32 = 3;

static PENALTY_N2: u32 = 3;

static PENALTY_N3: u32 = 40;

static PENALTY_N4: u32 = 10;
