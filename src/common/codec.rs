use tracing::debug;

use super::bit_utils::BitStream;
use super::error::{QRError, QRResult};
use super::metadata::{ECLevel, Version};

// Mode
//------------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq, Copy, Clone, PartialOrd, Ord, Hash)]
pub enum Mode {
    Numeric = 0b0001,
    Alphanumeric = 0b0010,
    Byte = 0b0100,
}

impl Mode {
    #[inline]
    fn numeric_digit(char: u8) -> u16 {
        debug_assert!(Mode::Numeric.contains(char), "Invalid numeric data: {char}");
        (char - b'0') as u16
    }

    #[inline]
    fn alphanumeric_digit(char: u8) -> u16 {
        debug_assert!(Mode::Alphanumeric.contains(char), "Invalid alphanumeric data: {char}");
        match char {
            b'0'..=b'9' => (char - b'0') as u16,
            b'A'..=b'Z' => (char - b'A' + 10) as u16,
            b' ' => 36,
            b'$' => 37,
            b'%' => 38,
            b'*' => 39,
            b'+' => 40,
            b'-' => 41,
            b'.' => 42,
            b'/' => 43,
            b':' => 44,
            _ => unreachable!("Invalid alphanumeric {char}"),
        }
    }

    pub fn indicator(self) -> u8 {
        self as u8
    }

    // Number of input units packed together
    pub fn chunk_size(self) -> usize {
        match self {
            Self::Numeric => 3,
            Self::Alphanumeric => 2,
            Self::Byte => 1,
        }
    }

    pub fn encode_chunk(self, data: &[u8]) -> u16 {
        let len = data.len();
        match self {
            Self::Numeric => {
                debug_assert!(len <= 3, "Data is too long for numeric conversion: {len}");
                data.iter().fold(0_u16, |n, b| n * 10 + Self::numeric_digit(*b))
            }
            Self::Alphanumeric => {
                debug_assert!(len <= 2, "Data is too long for alphanumeric conversion: {len}");
                data.iter().fold(0_u16, |n, b| n * 45 + Self::alphanumeric_digit(*b))
            }
            Self::Byte => {
                debug_assert!(len == 1, "Data is too long for byte conversion: {len}");
                data[0] as u16
            }
        }
    }

    pub fn contains(self, byte: u8) -> bool {
        match self {
            Self::Numeric => byte.is_ascii_digit(),
            Self::Alphanumeric => {
                matches!(byte, b'0'..=b'9' | b'A'..=b'Z' | b' ' | b'$' | b'%' | b'*' | b'+' | b'-' | b'.' | b'/' | b':')
            }
            Self::Byte => true,
        }
    }

    // Payload bits for `len` units, excluding mode indicator & char count
    pub fn encoded_len(self, len: usize) -> usize {
        match self {
            Self::Numeric => (len * 10).div_ceil(3),
            Self::Alphanumeric => (len * 11).div_ceil(2),
            Self::Byte => len * 8,
        }
    }

    // Cheapest mode that holds every byte
    pub fn analyze(data: &[u8]) -> Self {
        MODES.into_iter().find(|m| data.iter().all(|&b| m.contains(b))).unwrap_or(Self::Byte)
    }
}


// Segment
//------------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub struct Segment<'a> {
    mode: Mode,
    data: &'a [u8],
}

impl<'a> Segment<'a> {
    // Classifies the whole input into a single segment of the cheapest mode
    pub fn analyze(data: &'a [u8]) -> QRResult<Self> {
        if data.is_empty() {
            return Err(QRError::InvalidInput("empty data"));
        }
        let mode = Mode::analyze(data);
        debug!(?mode, len = data.len(), "Analyzed input");
        Ok(Self { mode, data })
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn data(&self) -> &'a [u8] {
        self.data
    }

    // Characters for numeric & alphanumeric, bytes for byte mode. Both are the byte length
    // since the first two modes are pure ascii.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn bit_len(&self, ver: Version) -> usize {
        4 + ver.char_count_bits(self.mode) + self.mode.encoded_len(self.len())
    }
}

// Capacity
//------------------------------------------------------------------------------

// Smallest version from `min_ver` whose data capacity holds the segment
pub fn find_version(seg: &Segment, ecl: ECLevel, min_ver: Version) -> QRResult<Version> {
    (*min_ver..=*Version::MAX)
        .map(Version)
        .find(|&v| seg.bit_len(v) <= v.data_bit_capacity(ecl))
        .ok_or(QRError::DataTooLarge {
            mode: seg.mode(),
            len: seg.len(),
            bits: seg.bit_len(Version::MAX),
            ec_level: ecl,
            min_version: *min_ver,
            max_version: *Version::MAX,
        })
}

pub fn check_version(seg: &Segment, ecl: ECLevel, ver: Version) -> QRResult<Version> {
    let bits = seg.bit_len(ver);
    if bits > ver.data_bit_capacity(ecl) {
        return Err(QRError::DataTooLarge {
            mode: seg.mode(),
            len: seg.len(),
            bits,
            ec_level: ecl,
            min_version: *ver,
            max_version: *ver,
        });
    }
    Ok(ver)
}


// Writer
//------------------------------------------------------------------------------

// Packs mode indicator, char count, payload, terminator & padding into exactly the data
// capacity of `ver` at `ecl`
pub fn encode_segment(seg: &Segment, ver: Version, ecl: ECLevel) -> QRResult<BitStream> {
    let capacity = ver.data_bit_capacity(ecl);
    let len = seg.bit_len(ver);
    if len > capacity {
        return Err(QRError::Encoding { len, capacity });
    }

    let mut bs = BitStream::new(capacity);
    push_segment(seg, ver, &mut bs);
    push_terminator(&mut bs);
    pad_remaining_capacity(&mut bs);

    if bs.len() != capacity {
        return Err(QRError::Internal("padded bit stream doesn't match data capacity"));
    }
    Ok(bs)
}

pub fn push_segment(seg: &Segment, ver: Version, bs: &mut BitStream) {
    let mode = seg.mode();
    bs.push_bits(mode.indicator(), 4);
    bs.push_bits(seg.len() as u16, ver.char_count_bits(mode));
    for chunk in seg.data().chunks(mode.chunk_size()) {
        let bit_len = mode.encoded_len(chunk.len());
        bs.push_bits(mode.encode_chunk(chunk), bit_len);
    }
}

pub fn push_terminator(bs: &mut BitStream) {
    let n = bs.remaining().min(4);
    bs.push_bits(0u8, n);
}

pub fn pad_remaining_capacity(bs: &mut BitStream) {
    let offset = bs.len() & 7;
    if offset > 0 {
        bs.push_bits(0u8, 8 - offset);
    }

    let remaining_bytes = bs.remaining() >> 3;
    let padding = PADDING_CODEWORDS.iter().copied().cycle().take(remaining_bytes).collect::<Vec<_>>();
    bs.extend(&padding);
}


// Global constants
//------------------------------------------------------------------------------

static PADDING_CODEWORDS: [u8; 2] = [0b1110_1100, 0b0001_0001];

static MODES: [Mode; 3] = [Mode::Numeric, Mode::Alphanumeric, Mode::Byte];
