use std::ops::Deref;

use tracing::debug;

use crate::common::{
    format_info, BitStream, Color, ECLevel, EncRegionIter, MaskPattern, QRError, QRResult,
    Version, FORMAT_INFO_BIT_LEN, VERSION_INFO_BIT_LEN,
};
use crate::symbol::Symbol;

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Module {
    Empty,
    Func(Color),
    Version(Color),
    Format(Color),
    Data(Color),
}

impl Deref for Module {
    type Target = Color;
    fn deref(&self) -> &Self::Target {
        match self {
            Module::Empty => &Color::Light,
            Module::Func(c) => c,
            Module::Version(c) => c,
            Module::Format(c) => c,
            Module::Data(c) => c,
        }
    }
}

#[derive(Debug, Clone)]
pub struct QR {
    grid: Vec<Module>,
    w: usize,
    ver: Version,
    ecl: ECLevel,
    mask: Option<MaskPattern>,
}

// QR type for builder
//------------------------------------------------------------------------------

impl QR {
    pub fn new(ver: Version, ecl: ECLevel) -> Self {
        let w = ver.width();
        Self { grid: vec![Module::Empty; w * w], w, ver, ecl, mask: None }
    }

    pub fn width(&self) -> usize {
        self.w
    }

    #[cfg(test)]
    pub fn mask(&self) -> Option<MaskPattern> {
        self.mask
    }

    pub fn count_dark_modules(&self) -> usize {
        self.grid.iter().filter(|&m| matches!(**m, Color::Dark)).count()
    }

    #[cfg(test)]
    pub fn to_debug_str(&self) -> String {
        let w = self.w as i16;
        let mut res = String::with_capacity((w * (w + 1)) as usize);
        res.push('\n');
        for i in 0..w {
            for j in 0..w {
                let c = match self.get(i, j) {
                    Module::Empty => '.',
                    Module::Func(Color::Dark) => 'f',
                    Module::Func(Color::Light) => 'F',
                    Module::Version(Color::Dark) => 'v',
                    Module::Version(Color::Light) => 'V',
                    Module::Format(Color::Dark) => 'm',
                    Module::Format(Color::Light) => 'M',
                    Module::Data(Color::Dark) => 'd',
                    Module::Data(Color::Light) => 'D',
                };
                res.push(c);
            }
            res.push('\n');
        }
        res
    }

    // Negative indices count back from the far edge
    fn coord_to_index(&self, r: i16, c: i16) -> usize {
        let w = self.w as i16;
        debug_assert!(-w <= r && r < w, "Row {r} out of bounds for width {w}");
        debug_assert!(-w <= c && c < w, "Column {c} out of bounds for width {w}");

        let r = if r < 0 { r + w } else { r };
        let c = if c < 0 { c + w } else { c };
        (r * w + c) as _
    }

    pub fn get(&self, r: i16, c: i16) -> Module {
        self.grid[self.coord_to_index(r, c)]
    }

    pub fn get_mut(&mut self, r: i16, c: i16) -> &mut Module {
        let index = self.coord_to_index(r, c);
        &mut self.grid[index]
    }

    pub fn set(&mut self, r: i16, c: i16, module: Module) {
        *self.get_mut(r, c) = module;
    }

    pub fn into_symbol(self, quiet_zone: usize) -> QRResult<Symbol> {
        let mask = self.mask.ok_or(QRError::Internal("mask pattern was never applied"))?;
        if self.grid.contains(&Module::Empty) {
            return Err(QRError::Internal("empty module left after data placement"));
        }
        let modules = self.grid.iter().map(|m| **m).collect();
        Ok(Symbol::new(self.ver, self.ecl, mask, self.w, quiet_zone, modules))
    }
}


// Finder pattern
//------------------------------------------------------------------------------

impl QR {
    fn draw_finder_patterns(&mut self) {
        self.draw_finder_pattern_at(3, 3);
        self.draw_finder_pattern_at(3, -4);
        self.draw_finder_pattern_at(-4, 3);
    }

    // Draws the 7x7 pattern centred at (r, c) with its separator on the inner sides
    fn draw_finder_pattern_at(&mut self, r: i16, c: i16) {
        let (dr_top, dr_bottom) = if r > 0 { (-3, 4) } else { (-4, 3) };
        let (dc_left, dc_right) = if c > 0 { (-3, 4) } else { (-4, 3) };
        for i in dr_top..=dr_bottom {
            for j in dc_left..=dc_right {
                let clr = match (i, j) {
                    (4 | -4, _) | (_, 4 | -4) => Color::Light,
                    (3 | -3, _) | (_, 3 | -3) => Color::Dark,
                    (2 | -2, _) | (_, 2 | -2) => Color::Light,
                    _ => Color::Dark,
                };
                self.set(r + i, c + j, Module::Func(clr));
            }
        }
    }
}


// Timing pattern
//------------------------------------------------------------------------------

impl QR {
    // Row 6 and column 6 between the separators, dark on even indices
    fn draw_timing_pattern(&mut self) {
        let last = self.w as i16 - 9;
        for i in 8..=last {
            let clr = Color::from(i & 1 == 0);
            self.set(6, i, Module::Func(clr));
            self.set(i, 6, Module::Func(clr));
        }
    }
}


// Alignment pattern
//------------------------------------------------------------------------------

impl QR {
    fn draw_alignment_patterns(&mut self) {
        let poses = self.ver.alignment_pattern();
        for &r in poses {
            for &c in poses {
                self.draw_alignment_pattern_at(r, c)
            }
        }
    }

    fn draw_alignment_pattern_at(&mut self, r: i16, c: i16) {
        let w = self.w as i16;
        // Skip the three centres that overlap finder patterns
        if (r == 6 && (c == 6 || c == w - 7)) || (r == w - 7 && c == 6) {
            return;
        }
        for i in -2..=2 {
            for j in -2..=2 {
                let clr = match (i, j) {
                    (-2 | 2, _) | (_, -2 | 2) | (0, 0) => Color::Dark,
                    _ => Color::Light,
                };
                self.set(r + i, c + j, Module::Func(clr));
            }
        }
    }
}


// All function patterns
//------------------------------------------------------------------------------

impl QR {
    pub fn draw_all_function_patterns(&mut self) {
        self.draw_finder_patterns();
        self.draw_timing_pattern();
        self.draw_alignment_patterns();
    }
}

// Format & version info
//------------------------------------------------------------------------------

impl QR {
    pub fn reserve_format_area(&mut self) {
        self.draw_format_info((1 << FORMAT_INFO_BIT_LEN) - 1);
    }

    fn draw_format_info(&mut self, format_info: u16) {
        let light = Module::Format(Color::Light);
        let dark = Module::Format(Color::Dark);
        let info = u32::from(format_info);
        self.draw_number(info, FORMAT_INFO_BIT_LEN, light, dark, &FORMAT_INFO_COORDS_MAIN);
        self.draw_number(info, FORMAT_INFO_BIT_LEN, light, dark, &FORMAT_INFO_COORDS_SIDE);
        // Always dark, next to the bottom-left finder
        self.set(-8, 8, dark);
    }

    pub fn draw_version_info(&mut self) {
        if *self.ver < 7 {
            return;
        }
        let light = Module::Version(Color::Light);
        let dark = Module::Version(Color::Dark);
        let info = self.ver.info();
        self.draw_number(info, VERSION_INFO_BIT_LEN, light, dark, &VERSION_INFO_COORDS_TR);
        self.draw_number(info, VERSION_INFO_BIT_LEN, light, dark, &VERSION_INFO_COORDS_BL);
    }

    // Coordinates are listed from the most significant bit down
    fn draw_number(
        &mut self,
        number: u32,
        bit_len: usize,
        off_clr: Module,
        on_clr: Module,
        coords: &[(i16, i16)],
    ) {
        let mut mask = 1 << (bit_len - 1);
        for &(r, c) in coords {
            let module = if number & mask == 0 { off_clr } else { on_clr };
            self.set(r, c, module);
            mask >>= 1;
        }
    }
}


// Encoding region
//------------------------------------------------------------------------------

impl QR {
    pub fn draw_encoding_region(&mut self, payload: BitStream) -> QRResult<()> {
        self.reserve_format_area();
        self.draw_version_info();

        let mut coords = EncRegionIter::new(self.ver);
        for bit in payload {
            let (r, c) = coords
                .by_ref()
                .find(|&(r, c)| self.get(r, c) == Module::Empty)
                .ok_or(QRError::Internal("payload overflows encoding region"))?;
            self.set(r, c, Module::Data(Color::from(bit)));
        }

        // Remainder bits are light data modules and get masked with the rest
        let mut remainder = 0;
        for (r, c) in coords {
            if self.get(r, c) == Module::Empty {
                self.set(r, c, Module::Data(Color::Light));
                remainder += 1;
            }
        }
        debug!(remainder, "Placed payload in encoding region");

        if remainder != self.ver.remainder_bits() {
            return Err(QRError::Internal("payload doesn't fill encoding region"));
        }
        Ok(())
    }

    pub fn apply_mask(&mut self, pattern: MaskPattern) {
        self.mask = Some(pattern);
        let mask_fn = pattern.mask_functions();
        let w = self.w as i16;
        for r in 0..w {
            for c in 0..w {
                if let Module::Data(clr) = self.get(r, c) {
                    if mask_fn(r, c) {
                        self.set(r, c, Module::Data(!clr))
                    }
                }
            }
        }
        self.draw_format_info(format_info(self.ecl, pattern));
    }
}

#[cfg(test)]
mod encoding_region_tests {
    use crate::builder::{Module, QR};
    use crate::common::metadata::{Color, ECLevel, Version};
    use crate::common::{BitStream, MaskPattern, QRError};

    fn prepared(ver: Version) -> QR {
        let mut qr = QR::new(ver, ECLevel::M);
        qr.draw_all_function_patterns();
        qr
    }

    #[test]
    fn test_fills_every_module() {
        for v in [1, 2, 7, 21] {
            let ver = Version(v);
            let mut qr = prepared(ver);
            let payload = BitStream::from(&vec![0b1010_0110; ver.total_codewords()]);
            qr.draw_encoding_region(payload).unwrap();
            let s = qr.to_debug_str();
            assert!(!s.contains('.'));
            assert_eq!(s.matches(['d', 'D']).count(), ver.raw_data_modules());
        }
    }

    #[test]
    fn test_first_bits_in_bottom_right() {
        let mut qr = prepared(Version(1));
        let mut codewords = vec![0; 26];
        codewords[0] = 0b1100_0000;
        qr.draw_encoding_region(BitStream::from(&codewords)).unwrap();
        assert_eq!(qr.get(20, 20), Module::Data(Color::Dark));
        assert_eq!(qr.get(20, 19), Module::Data(Color::Dark));
        assert_eq!(qr.get(19, 20), Module::Data(Color::Light));
    }

    #[test]
    fn test_payload_overflow() {
        let mut qr = prepared(Version(1));
        let res = qr.draw_encoding_region(BitStream::from(&[0; 27]));
        assert!(matches!(res, Err(QRError::Internal(_))));
    }

    #[test]
    fn test_short_payload() {
        let mut qr = prepared(Version(1));
        let res = qr.draw_encoding_region(BitStream::from(&[0; 25]));
        assert!(matches!(res, Err(QRError::Internal(_))));
    }

    #[test]
    fn test_mask_leaves_function_modules() {
        let mut qr = prepared(Version(2));
        qr.draw_encoding_region(BitStream::from(&[0; 44])).unwrap();
        let before = qr.clone();
        qr.apply_mask(MaskPattern::new(1));
        let w = qr.width() as i16;
        for r in 0..w {
            for c in 0..w {
                match before.get(r, c) {
                    Module::Data(_) => {
                        assert_eq!(*qr.get(r, c), Color::from(r & 1 == 0));
                    }
                    Module::Format(_) => {}
                    m => assert_eq!(qr.get(r, c), m),
                }
            }
        }
    }
}

// Global constants
//------------------------------------------------------------------------------

static FORMAT_INFO_COORDS_MAIN: [(i16, i16); 15] = [
    (8, 0),
    (8, 1),
    (8, 2),
    (8, 3),
    (8, 4),
    (8, 5),
    (8, 7),
    (8, 8),
    (7, 8),
    (5, 8),
    (4, 8),
    (3, 8),
    (2, 8),
    (1, 8),
    (0, 8),
];

static FORMAT_INFO_COORDS_SIDE: [(i16, i16); 15] = [
    (-1, 8),
    (-2, 8),
    (-3, 8),
    (-4, 8),
    (-5, 8),
    (-6, 8),
    (-7, 8),
    (8, -8),
    (8, -7),
    (8, -6),
    (8, -5),
    (8, -4),
    (8, -3),
    (8, -2),
    (8, -1),
];

static VERSION_INFO_COORDS_TR: [(i16, i16); 18] = [
    (5, -9),
    (5, -10),
    (5, -11),
    (4, -9),
    (4, -10),
    (4, -11),
    (3, -9),
    (3, -10),
    (3, -11),
    (2, -9),
    (2, -10),
    (2, -11),
    (1, -9),
    (1, -10),
    (1, -11),
    (0, -9),
    (0, -10),
    (0, -11),
];

static VERSION_INFO_COORDS_BL: [(i16, i16); 18] = [
    (-9, 5),
    (-10, 5),
    (-11, 5),
    (-9, 4),
    (-10, 4),
    (-11, 4),
    (-9, 3),
    (-10, 3),
    (-11, 3),
    (-9, 2),
    (-10, 2),
    (-11, 2),
    (-9, 1),
    (-10, 1),
    (-11, 1),
    (-9, 0),
    (-10, 0),
    (-11, 0),
];
