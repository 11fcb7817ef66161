use std::fmt::{Display, Error, Formatter};
use std::ops::{Deref, Not};
use std::str::FromStr;

use super::codec::Mode;
use super::error::{QRError, QRResult};
use super::mask::MaskPattern;

// Color
//------------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq, Copy, Clone, Hash)]
pub enum Color {
    Light,
    Dark,
}

impl Color {
    pub fn select<T>(self, light: T, dark: T) -> T {
        match self {
            Self::Light => light,
            Self::Dark => dark,
        }
    }
}

impl From<bool> for Color {
    fn from(is_dark: bool) -> Self {
        if is_dark {
            Self::Dark
        } else {
            Self::Light
        }
    }
}

impl Not for Color {
    type Output = Self;
    fn not(self) -> Self::Output {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }
}

// Version
//------------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq, Copy, Clone, PartialOrd, Ord, Hash)]
pub struct Version(pub(crate) u8);

impl Version {
    pub const MIN: Self = Self(1);
    pub const MAX: Self = Self(40);

    pub fn new(version: u8) -> QRResult<Self> {
        if !(1..=40).contains(&version) {
            return Err(QRError::InvalidInput("version must be within 1..=40"));
        }
        Ok(Self(version))
    }

    pub const fn width(self) -> usize {
        self.0 as usize * 4 + 17
    }

    pub fn alignment_pattern(self) -> &'static [i16] {
        ALIGNMENT_PATTERN_POSITIONS[self.0 as usize - 1]
    }

    // Modules left for data & ecc once function patterns, format and version info are drawn
    pub fn raw_data_modules(self) -> usize {
        let v = self.0 as usize;
        let mut res = (16 * v + 128) * v + 64;
        if v >= 2 {
            let align_count = v / 7 + 2;
            res -= (25 * align_count - 10) * align_count - 55;
            if v >= 7 {
                res -= 36;
            }
        }
        res
    }

    pub fn total_codewords(self) -> usize {
        self.raw_data_modules() >> 3
    }

    pub fn remainder_bits(self) -> usize {
        self.raw_data_modules() & 7
    }

    pub fn ecc_per_block(self, ecl: ECLevel) -> usize {
        ECC_PER_BLOCK[ecl as usize][self.0 as usize - 1] as usize
    }

    pub fn block_count(self, ecl: ECLevel) -> usize {
        BLOCK_COUNT[ecl as usize][self.0 as usize - 1] as usize
    }

    // Returns (block1_size, block1_count, block2_size, block2_count). Group 2 blocks carry one
    // more data codeword than group 1 blocks, and block2_count is zero when all blocks are equal.
    pub fn data_codewords_per_block(self, ecl: ECLevel) -> (usize, usize, usize, usize) {
        let total = self.total_codewords();
        let blocks = self.block_count(ecl);
        let ecc = self.ecc_per_block(ecl);

        let block2_count = total % blocks;
        let block1_count = blocks - block2_count;
        let block1_size = total / blocks - ecc;
        let block2_size = if block2_count > 0 { block1_size + 1 } else { 0 };
        (block1_size, block1_count, block2_size, block2_count)
    }

    pub fn data_codewords(self, ecl: ECLevel) -> usize {
        self.total_codewords() - self.ecc_per_block(ecl) * self.block_count(ecl)
    }

    pub fn data_bit_capacity(self, ecl: ECLevel) -> usize {
        self.data_codewords(ecl) << 3
    }

    pub fn char_count_bits(self, mode: Mode) -> usize {
        let range = match self.0 {
            1..=9 => 0,
            10..=26 => 1,
            _ => 2,
        };
        match mode {
            Mode::Numeric => [10, 12, 14][range],
            Mode::Alphanumeric => [9, 11, 13][range],
            Mode::Byte => [8, 16, 16][range],
        }
    }

    // 18 bit BCH(18, 6) version word, only drawn for versions 7 and up
    pub fn info(self) -> u32 {
        debug_assert!(self.0 >= 7, "Version info is only defined from version 7: {}", self.0);
        VERSION_INFOS[self.0 as usize - 7]
    }
}

impl Deref for Version {
    type Target = u8;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Display for Version {
    fn fmt(&self, f: &mut Formatter) -> Result<(), Error> {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod version_tests {
    use test_case::test_case;

    use super::{ECLevel, Version};
    use crate::common::codec::Mode;

    #[test]
    fn test_new() {
        assert!(Version::new(0).is_err());
        assert!(Version::new(41).is_err());
        assert_eq!(Version::new(7), Ok(Version(7)));
    }

    #[test]
    fn test_width() {
        assert_eq!(Version::MIN.width(), 21);
        assert_eq!(Version(7).width(), 45);
        assert_eq!(Version::MAX.width(), 177);
    }

    #[test_case(1, 26, 0)]
    #[test_case(2, 44, 7)]
    #[test_case(7, 196, 0)]
    #[test_case(14, 581, 3)]
    #[test_case(21, 1156, 4)]
    #[test_case(40, 3706, 0)]
    fn test_codewords(v: u8, total: usize, remainder: usize) {
        let ver = Version(v);
        assert_eq!(ver.total_codewords(), total);
        assert_eq!(ver.remainder_bits(), remainder);
    }

    #[test_case(1, ECLevel::L, 19)]
    #[test_case(1, ECLevel::M, 16)]
    #[test_case(1, ECLevel::Q, 13)]
    #[test_case(1, ECLevel::H, 9)]
    #[test_case(5, ECLevel::Q, 62)]
    #[test_case(10, ECLevel::M, 216)]
    #[test_case(40, ECLevel::L, 2956)]
    #[test_case(40, ECLevel::M, 2334)]
    #[test_case(40, ECLevel::Q, 1666)]
    #[test_case(40, ECLevel::H, 1276)]
    fn test_data_codewords(v: u8, ecl: ECLevel, exp: usize) {
        assert_eq!(Version(v).data_codewords(ecl), exp);
    }

    #[test]
    fn test_data_codewords_per_block() {
        assert_eq!(Version(1).data_codewords_per_block(ECLevel::M), (16, 1, 0, 0));
        assert_eq!(Version(5).data_codewords_per_block(ECLevel::Q), (15, 2, 16, 2));
        assert_eq!(Version(40).data_codewords_per_block(ECLevel::H), (15, 20, 16, 61));
        for v in 1..=40 {
            let ver = Version(v);
            for ecl in [ECLevel::L, ECLevel::M, ECLevel::Q, ECLevel::H] {
                let (s1, c1, s2, c2) = ver.data_codewords_per_block(ecl);
                assert_eq!(s1 * c1 + s2 * c2, ver.data_codewords(ecl), "Version {v} {ecl:?}");
            }
        }
    }

    #[test]
    fn test_alignment_pattern_table() {
        for v in 2..=40u8 {
            let ver = Version(v);
            let w = ver.width() as i16;
            let count = v as i16 / 7 + 2;
            let step = if v == 32 { 26 } else { (v as i16 * 4 + count * 2 + 1) / (count * 2 - 2) * 2 };
            let mut exp = (0..count - 1).map(|i| w - 7 - i * step).collect::<Vec<_>>();
            exp.push(6);
            exp.reverse();
            assert_eq!(ver.alignment_pattern(), &exp[..], "Version {v}");
        }
        assert!(Version(1).alignment_pattern().is_empty());
    }

    #[test]
    fn test_char_count_bits() {
        assert_eq!(Version(9).char_count_bits(Mode::Numeric), 10);
        assert_eq!(Version(10).char_count_bits(Mode::Numeric), 12);
        assert_eq!(Version(27).char_count_bits(Mode::Numeric), 14);
        assert_eq!(Version(1).char_count_bits(Mode::Alphanumeric), 9);
        assert_eq!(Version(26).char_count_bits(Mode::Alphanumeric), 11);
        assert_eq!(Version(40).char_count_bits(Mode::Alphanumeric), 13);
        assert_eq!(Version(9).char_count_bits(Mode::Byte), 8);
        assert_eq!(Version(10).char_count_bits(Mode::Byte), 16);
    }

    #[test]
    fn test_version_info() {
        assert_eq!(Version(7).info(), 0b000111_110010_010100);
        assert_eq!(Version(8).info(), 0b001000_010110_111100);
        assert_eq!(Version(40).info(), 0b101000_110001_101001);
    }
}

// Error correction level
//------------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq, Copy, Clone, PartialOrd, Ord, Hash, Default)]
pub enum ECLevel {
    L = 0,
    #[default]
    M = 1,
    Q = 2,
    H = 3,
}

impl ECLevel {
    // Two bit indicator used in format info. Not in ordinal order.
    pub fn format_bits(self) -> u16 {
        match self {
            Self::L => 0b01,
            Self::M => 0b00,
            Self::Q => 0b11,
            Self::H => 0b10,
        }
    }
}

impl Display for ECLevel {
    fn fmt(&self, f: &mut Formatter) -> Result<(), Error> {
        let s = match self {
            Self::L => "L",
            Self::M => "M",
            Self::Q => "Q",
            Self::H => "H",
        };
        f.write_str(s)
    }
}

impl FromStr for ECLevel {
    type Err = QRError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "L" | "LOW" => Ok(Self::L),
            "M" | "MEDIUM" => Ok(Self::M),
            "Q" | "QUARTILE" => Ok(Self::Q),
            "H" | "HIGH" => Ok(Self::H),
            _ => Err(QRError::InvalidInput("error correction level must be one of L, M, Q, H")),
        }
    }
}

// Format information
//------------------------------------------------------------------------------

// 15 bit BCH(15, 5) format word for the given level and mask, already xor-ed with 0x5412
pub fn format_info(ecl: ECLevel, mask: MaskPattern) -> u16 {
    let data = ecl.format_bits() << 3 | *mask as u16;
    FORMAT_INFOS[data as usize]
}


// Global constants
//------------------------------------------------------------------------------

const FORMAT_INFO_GENERATOR: u32 = 0b101_0011_0111;
const FORMAT_INFO_MASK: u32 = 0b101_0100_0001_0010;
const VERSION_INFO_GENERATOR: u32 = 0b1_1111_0010_0101;

// Remainder of data * x^shift divided by generator over GF(2)
const fn bch_remainder(data: u32, shift: u32, generator: u32) -> u32 {
    let gen_len = 32 - generator.leading_zeros();
    let mut rem = data << shift;
    while rem != 0 && 32 - rem.leading_zeros() >= gen_len {
        rem ^= generator << (32 - rem.leading_zeros() - gen_len);
    }
    rem
}

const fn build_format_infos() -> [u16; 32] {
    let mut res = [0; 32];
    let mut i = 0;
    while i < 32 {
        let word = (i as u32) << 10 | bch_remainder(i as u32, 10, FORMAT_INFO_GENERATOR);
        res[i] = (word ^ FORMAT_INFO_MASK) as u16;
        i += 1;
    }
    res
}

const fn build_version_infos() -> [u32; 34] {
    let mut res = [0; 34];
    let mut i = 0;
    while i < 34 {
        let v = i as u32 + 7;
        res[i] = v << 12 | bch_remainder(v, 12, VERSION_INFO_GENERATOR);
        i += 1;
    }
    res
}

pub static FORMAT_INFOS: [u16; 32] = build_format_infos();

pub static VERSION_INFOS: [u32; 34] = build_version_infos();

pub static FORMAT_INFO_BIT_LEN: usize = 15;

pub static VERSION_INFO_BIT_LEN: usize = 18;

// Indexed by [ECLevel][version - 1]
static ECC_PER_BLOCK: [[u8; 40]; 4] = [
    [
        7, 10, 15, 20, 26, 18, 20, 24, 30, 18, 20, 24, 26, 30, 22, 24, 28, 30, 28, 28, 28, 28, 30,
        30, 26, 28, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30,
    ],
    [
        10, 16, 26, 18, 24, 16, 18, 22, 22, 26, 30, 22, 22, 24, 24, 28, 28, 26, 26, 26, 26, 28, 28,
        28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28,
    ],
    [
        13, 22, 18, 26, 18, 24, 18, 22, 20, 24, 28, 26, 24, 20, 30, 24, 28, 28, 26, 30, 28, 30, 30,
        30, 30, 28, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30,
    ],
    [
        17, 28, 22, 16, 22, 28, 26, 26, 24, 28, 24, 28, 22, 24, 24, 30, 28, 28, 26, 28, 30, 24, 30,
        30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30,
    ],
];

// Indexed by [ECLevel][version - 1]
static BLOCK_COUNT: [[u8; 40]; 4] = [
    [
        1, 1, 1, 1, 1, 2, 2, 2, 2, 4, 4, 4, 4, 4, 6, 6, 6, 6, 7, 8, 8, 9, 9, 10, 12, 12, 12, 13,
        14, 15, 16, 17, 18, 19, 19, 20, 21, 22, 24, 25,
    ],
    [
        1, 1, 1, 2, 2, 4, 4, 4, 5, 5, 5, 8, 9, 9, 10, 10, 11, 13, 14, 16, 17, 17, 18, 20, 21, 23,
        25, 26, 28, 29, 31, 33, 35, 37, 38, 40, 43, 45, 47, 49,
    ],
    [
        1, 1, 2, 2, 4, 4, 6, 6, 8, 8, 8, 10, 12, 16, 12, 17, 16, 18, 21, 20, 23, 23, 25, 27, 29,
        34, 34, 35, 38, 40, 43, 45, 48, 51, 53, 56, 59, 62, 65, 68,
    ],
    [
        1, 1, 2, 4, 4, 4, 5, 6, 8, 8, 11, 11, 16, 16, 18, 16, 19, 21, 25, 25, 25, 34, 30, 32, 35,
        37, 40, 42, 45, 48, 51, 54, 57, 60, 63, 66, 70, 74, 77, 81,
    ],
];

// Indexed by version - 1
static ALIGNMENT_PATTERN_POSITIONS: [&[i16]; 40] = [
    &[],
    &[6, 18],
    &[6, 22],
    &[6, 26],
    &[6, 30],
    &[6, 34],
    &[6, 22, 38],
    &[6, 24, 42],
    &[6, 26, 46],
    &[6, 28, 50],
    &[6, 30, 54],
    &[6, 32, 58],
    &[6, 34, 62],
    &[6, 26, 46, 66],
    &[6, 26, 48, 70],
    &[6, 26, 50, 74],
    &[6, 30, 54, 78],
    &[6, 30, 56, 82],
    &[6, 30, 58, 86],
    &[6, 34, 62, 90],
    &[6, 28, 50, 72, 94],
    &[6, 26, 50, 74, 98],
    &[6, 30, 54, 78, 102],
    &[6, 28, 54, 80, 106],
    &[6, 32, 58, 84, 110],
    &[6, 30, 58, 86, 114],
    &[6, 34, 62, 90, 118],
    &[6, 26, 50, 74, 98, 122],
    &[6, 30, 54, 78, 102, 126],
    &[6, 26, 52, 78, 104, 130],
    &[6, 30, 56, 82, 108, 134],
    &[6, 34, 60, 86, 112, 138],
    &[6, 30, 58, 86, 114, 142],
    &[6, 34, 62, 90, 118, 146],
    &[6, 30, 54, 78, 102, 126, 150],
    &[6, 24, 50, 76, 102, 128, 154],
    &[6, 28, 54, 80, 106, 132, 158],
    &[6, 32, 58, 84, 110, 136, 162],
    &[6, 26, 54, 82, 110, 138, 166],
    &[6, 30, 58, 86, 114, 142, 170],
];
