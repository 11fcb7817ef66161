use std::ops::Deref;

use tracing::debug;

use super::error::{QRError, QRResult};
use super::metadata::{ECLevel, Version};

// Block
//------------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Block {
    data: Vec<u8>,
    ecc: Vec<u8>,
}

impl Block {
    pub fn new(data: &[u8], ecc_len: usize) -> Self {
        let ecc = ecc_per_block(data, ecc_len);
        Self { data: data.to_vec(), ecc }
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn ecc(&self) -> &[u8] {
        &self.ecc
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.data.len() + self.ecc.len()
    }
}

// Error correction
//------------------------------------------------------------------------------

// Splits the padded data codewords into blocks and computes ecc for each
pub fn compute_ecc(data: &[u8], ver: Version, ecl: ECLevel) -> QRResult<Vec<Block>> {
    let data_blocks = blockify(data, ver, ecl)?;
    let ecc_len = ver.ecc_per_block(ecl);
    debug!(blocks = data_blocks.len(), ecc_len, "Computing error correction codewords");
    Ok(data_blocks.into_iter().map(|b| Block::new(b, ecc_len)).collect())
}

pub fn blockify(data: &[u8], ver: Version, ecl: ECLevel) -> QRResult<Vec<&[u8]>> {
    let (block1_size, block1_count, block2_size, block2_count) = ver.data_codewords_per_block(ecl);

    let total_blocks = block1_count + block2_count;
    let total_block1_size = block1_size * block1_count;
    let total_size = total_block1_size + block2_size * block2_count;

    if total_size != data.len() {
        return Err(QRError::Internal("data length doesn't match total size of blocks"));
    }

    let mut data_blocks = Vec::with_capacity(total_blocks);
    data_blocks.extend(data[..total_block1_size].chunks(block1_size));
    if block2_size > 0 {
        data_blocks.extend(data[total_block1_size..].chunks(block2_size));
    }
    Ok(data_blocks)
}

// Takes the i-th codeword of every block in turn, skipping blocks that have run out
pub fn interleave<T: Copy, V: Deref<Target = [T]>>(blocks: &[V]) -> Vec<T> {
    let max_block_size = blocks.iter().map(|b| b.len()).max().unwrap_or(0);
    let total_size = blocks.iter().map(|b| b.len()).sum::<usize>();
    let mut res = Vec::with_capacity(total_size);
    for i in 0..max_block_size {
        for b in blocks {
            if i < b.len() {
                res.push(b[i]);
            }
        }
    }
    res
}

// Data codewords of every block interleaved, followed by ecc codewords of every block interleaved
pub fn interleave_blocks(blocks: &[Block]) -> Vec<u8> {
    let data = blocks.iter().map(Block::data).collect::<Vec<_>>();
    let ecc = blocks.iter().map(Block::ecc).collect::<Vec<_>>();
    let mut res = interleave(&data);
    res.extend(interleave(&ecc));
    res
}

// Performs polynomial long division with data polynomial(num)
// and generator polynomial(den) to compute remainder polynomial,
// the coefficients of which are the ecc
fn ecc_per_block(block: &[u8], ecc_count: usize) -> Vec<u8> {
    debug_assert!(
        (1..=MAX_EC_SIZE).contains(&ecc_count),
        "Ecc count should be within 1..={MAX_EC_SIZE}: {ecc_count}"
    );

    let len = block.len();
    let gen_poly = &GENERATOR_POLYNOMIALS[ecc_count][..ecc_count];

    let mut res = block.to_vec();
    res.resize(len + ecc_count, 0);

    for i in 0..len {
        let lead_coeff = res[i] as usize;
        if lead_coeff == 0 {
            continue;
        }

        let log_lead_coeff = LOG_TABLE[lead_coeff] as usize;
        for (u, &v) in res[i + 1..].iter_mut().zip(gen_poly.iter()) {
            if v == 0 {
                continue;
            }
            let log_sum = (LOG_TABLE[v as usize] as usize + log_lead_coeff) % 255;
            *u ^= EXP_TABLE[log_sum];
        }
    }

    res.split_off(len)
}

#[cfg(test)]
mod ec_tests {

    use super::{compute_ecc, ecc_per_block, gf_mul, interleave, interleave_blocks, Block};
    use super::{EXP_TABLE, GENERATOR_POLYNOMIALS, LOG_TABLE};
    use crate::common::error::QRError;
    use crate::common::metadata::{ECLevel, Version};

    #[test]
    fn test_tables() {
        assert_eq!(EXP_TABLE[0], 1);
        assert_eq!(EXP_TABLE[8], 0x1d);
        assert_eq!(EXP_TABLE[255], 1);
        for i in 1..256 {
            assert_eq!(EXP_TABLE[LOG_TABLE[i] as usize] as usize, i);
        }
        assert_eq!(gf_mul(0x53, 0), 0);
        assert_eq!(gf_mul(2, 0x80), 0x1d);
    }

    #[test]
    fn test_generator_polynomial() {
        // g(x) = (x - a^0)(x - a^1) = x^2 + 3x + 2
        assert_eq!(GENERATOR_POLYNOMIALS[2][..2], [3, 2]);
        // Exponents for degree 7: 87, 229, 146, 149, 238, 102, 21
        let logs = GENERATOR_POLYNOMIALS[7][..7].iter().map(|&c| LOG_TABLE[c as usize]).collect::<Vec<_>>();
        assert_eq!(logs, [87, 229, 146, 149, 238, 102, 21]);
    }

    #[test]
    fn test_poly_mod_1() {
        let res = ecc_per_block(b" [\x0bx\xd1r\xdcMC@\xec\x11\xec\x11\xec\x11", 10);
        assert_eq!(&*res, b"\xc4#'w\xeb\xd7\xe7\xe2]\x17");
    }

    #[test]
    fn test_poly_mod_2() {
        let res = ecc_per_block(b" [\x0bx\xd1r\xdcMC@\xec\x11\xec", 13);
        assert_eq!(&*res, b"\xa8H\x16R\xd96\x9c\x00.\x0f\xb4z\x10");
    }

    #[test]
    fn test_poly_mod_3() {
        let res = ecc_per_block(b"CUF\x86W&U\xc2w2\x06\x12\x06g&", 18);
        assert_eq!(&*res, b"\xd5\xc7\x0b-s\xf7\xf1\xdf\xe5\xf8\x9au\x9aoV\xa1o'");
    }

    #[test]
    fn test_numeric_1m() {
        let msg = b"\x10\x20\x0c\x56\x61\x80\xec\x11\xec\x11\xec\x11\xec\x11\xec\x11";
        let res = ecc_per_block(msg, 10);
        assert_eq!(res, [0xa5, 0x24, 0xd4, 0xc1, 0xed, 0x36, 0xc7, 0x87, 0x2c, 0x55]);
    }

    #[test]
    fn test_add_ec_complex() {
        let msg = b"CUF\x86W&U\xc2w2\x06\x12\x06g&\xf6\xf6B\x07v\x86\xf2\x07&V\x16\xc6\xc7\x92\x06\
                    \xb6\xe6\xf7w2\x07v\x86W&R\x06\x86\x972\x07F\xf7vV\xc2\x06\x972\x10\xec\x11\xec\
                    \x11\xec\x11\xec";
        let expected_ec = [
            b"\xd5\xc7\x0b\x2d\x73\xf7\xf1\xdf\xe5\xf8\x9a\x75\x9a\x6f\x56\xa1\x6f\x27",
            b"\x57\xcc\x60\x3c\xca\xb6\x7c\x9d\xc8\x86\x1b\x81\xd1\x11\xa3\xa3\x78\x85",
            b"\x94\x74\xb1\xd4\x4c\x85\x4b\xf2\xee\x4c\xc3\xe6\xbd\x0a\x6c\xf0\xc0\x8d",
            b"\xeb\x9f\x05\xad\x18\x93\x3b\x21\x6a\x28\xff\xac\x52\x02\x83\x20\xb2\xec",
        ];
        let blocks = compute_ecc(msg, Version(5), ECLevel::Q).unwrap();
        let block_lens = blocks.iter().map(|b| b.data().len()).collect::<Vec<_>>();
        assert_eq!(block_lens, [15, 15, 16, 16]);
        assert_eq!(blocks.iter().map(Block::ecc).collect::<Vec<_>>(), expected_ec);
        assert_eq!(blocks.iter().map(Block::len).sum::<usize>(), Version(5).total_codewords());
    }

    #[test]
    fn test_blockify_length_mismatch() {
        let err = compute_ecc(&[0; 15], Version(1), ECLevel::M).unwrap_err();
        assert!(matches!(err, QRError::Internal(_)));
    }

    #[test]
    fn test_interleave() {
        let blocks = vec![vec![1, 2, 3], vec![4, 5, 6], vec![7, 8, 9, 0]];
        let interleaved = interleave(&blocks);
        let exp_interleaved = vec![1, 4, 7, 2, 5, 8, 3, 6, 9, 0];
        assert_eq!(interleaved, exp_interleaved);
    }

    #[test]
    fn test_interleave_blocks() {
        let blocks = vec![Block::new(&[1, 2], 2), Block::new(&[3, 4, 5], 2)];
        let res = interleave_blocks(&blocks);
        assert_eq!(res[..5], [1, 3, 2, 4, 5]);
        assert_eq!(res[5], blocks[0].ecc()[0]);
        assert_eq!(res[6], blocks[1].ecc()[0]);
        assert_eq!(res.len(), 9);
    }
}

// Galois field
//------------------------------------------------------------------------------

// GF(256) with primitive polynomial x^8 + x^4 + x^3 + x^2 + 1
const PRIMITIVE_POLYNOMIAL: u16 = 0b1_0001_1101;

const fn build_exp_table() -> [u8; 256] {
    let mut res = [0; 256];
    let mut x: u16 = 1;
    let mut i = 0;
    while i < 255 {
        res[i] = x as u8;
        x <<= 1;
        if x & 0x100 != 0 {
            x ^= PRIMITIVE_POLYNOMIAL;
        }
        i += 1;
    }
    res[255] = res[0];
    res
}

const fn build_log_table() -> [u8; 256] {
    let mut res = [0; 256];
    let mut i = 0;
    while i < 255 {
        res[EXP_TABLE[i] as usize] = i as u8;
        i += 1;
    }
    res
}

const fn gf_mul(a: u8, b: u8) -> u8 {
    if a == 0 || b == 0 {
        return 0;
    }
    EXP_TABLE[(LOG_TABLE[a as usize] as usize + LOG_TABLE[b as usize] as usize) % 255]
}

// Coefficients of prod(x - a^i) for i in 0..degree, highest first, leading 1 omitted
const fn build_generator_polynomials() -> [[u8; MAX_EC_SIZE]; MAX_EC_SIZE + 1] {
    let mut res = [[0; MAX_EC_SIZE]; MAX_EC_SIZE + 1];
    let mut degree = 1;
    while degree <= MAX_EC_SIZE {
        let mut poly = [0; MAX_EC_SIZE];
        poly[degree - 1] = 1;
        let mut root = 1;
        let mut i = 0;
        while i < degree {
            let mut j = 0;
            while j < degree {
                poly[j] = gf_mul(poly[j], root);
                if j + 1 < degree {
                    poly[j] ^= poly[j + 1];
                }
                j += 1;
            }
            root = gf_mul(root, 2);
            i += 1;
        }
        res[degree] = poly;
        degree += 1;
    }
    res
}

// Global constants
//------------------------------------------------------------------------------

pub const MAX_EC_SIZE: usize = 30;

const EXP_TABLE: [u8; 256] = build_exp_table();

const LOG_TABLE: [u8; 256] = build_log_table();

static GENERATOR_POLYNOMIALS: [[u8; MAX_EC_SIZE]; MAX_EC_SIZE + 1] = build_generator_polynomials();
