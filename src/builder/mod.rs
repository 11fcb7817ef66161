mod qr;

#[cfg(test)]
pub(crate) use qr::Module;
pub(crate) use qr::QR;

use tracing::debug;

use crate::common::{
    apply_best_mask, check_version, compute_ecc, compute_total_penalty, encode_segment,
    find_version, interleave_blocks, BitStream, ECLevel, MaskPattern, QRResult, Segment, Version,
};
use crate::symbol::Symbol;

/// Configures and runs a single encode.
///
/// Defaults: level M, smallest version from 1 that fits, best mask by penalty score,
/// quiet zone of 4 modules.
#[derive(Debug, Clone)]
pub struct QRBuilder<'a> {
    data: &'a [u8],
    version: Option<Version>,
    min_version: Version,
    ec_level: ECLevel,
    mask: Option<MaskPattern>,
    quiet_zone: usize,
}

impl<'a> QRBuilder<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            version: None,
            min_version: Version::MIN,
            ec_level: ECLevel::M,
            mask: None,
            quiet_zone: 4,
        }
    }

    pub fn data(&mut self, data: &'a [u8]) -> &mut Self {
        self.data = data;
        self
    }

    /// Fixes the version. Data that doesn't fit fails instead of growing the symbol.
    pub fn version(&mut self, version: Version) -> &mut Self {
        self.version = Some(version);
        self
    }

    pub fn unset_version(&mut self) -> &mut Self {
        self.version = None;
        self
    }

    /// Lower bound for the version search. Ignored when a version is fixed.
    pub fn min_version(&mut self, min_version: Version) -> &mut Self {
        self.min_version = min_version;
        self
    }

    pub fn ec_level(&mut self, ec_level: ECLevel) -> &mut Self {
        self.ec_level = ec_level;
        self
    }

    /// Skips the penalty search and applies this mask.
    pub fn mask(&mut self, mask: MaskPattern) -> &mut Self {
        self.mask = Some(mask);
        self
    }

    pub fn quiet_zone(&mut self, quiet_zone: usize) -> &mut Self {
        self.quiet_zone = quiet_zone;
        self
    }

    pub fn metadata(&self) -> String {
        let version = self.version.map_or("None".to_string(), |v| v.to_string());
        let mask = self.mask.map_or("None".to_string(), |m| (*m).to_string());
        format!("{{ Version: {version}, Ec level: {}, Mask: {mask} }}", self.ec_level)
    }
}


impl QRBuilder<'_> {
    pub fn build(&self) -> QRResult<Symbol> {
        debug!("Generating QR {}", self.metadata());

        let seg = Segment::analyze(self.data)?;

        let version = match self.version {
            Some(v) => check_version(&seg, self.ec_level, v)?,
            None => find_version(&seg, self.ec_level, self.min_version)?,
        };
        debug!(version = *version, bits = seg.bit_len(version), "Selected version");

        // Encode data & pad to capacity
        let encoded_data = encode_segment(&seg, version, self.ec_level)?;

        // Compute error correction codewords & interleave
        let blocks = compute_ecc(encoded_data.data(), version, self.ec_level)?;
        let payload = interleave_blocks(&blocks);
        debug!(
            data_codewords = encoded_data.len() >> 3,
            total_codewords = payload.len(),
            blocks = blocks.len(),
            ec_capacity = Self::ec_capacity(version, self.ec_level),
            "Constructed payload"
        );

        let mut qr = QR::new(version, self.ec_level);
        qr.draw_all_function_patterns();
        qr.draw_encoding_region(BitStream::from(&payload))?;

        let (mask, penalty) = match self.mask {
            Some(m) => {
                qr.apply_mask(m);
                (m, compute_total_penalty(&qr))
            }
            None => apply_best_mask(&mut qr),
        };
        debug!(mask = *mask, penalty, "Applied mask");

        let total_modules = qr.width() * qr.width();
        let dark_modules = qr.count_dark_modules();
        debug!(
            dark = dark_modules,
            light = total_modules - dark_modules,
            balance = dark_modules * 100 / total_modules,
            "QR generated"
        );

        qr.into_symbol(self.quiet_zone)
    }

    // Number of codeword errors the symbol can correct, after misdecode protection
    // codewords are set aside for the smallest symbols
    pub fn ec_capacity(version: Version, ec_level: ECLevel) -> usize {
        let p = match (*version, ec_level) {
            (1, ECLevel::L) => 3,
            (2, ECLevel::L) | (1, ECLevel::M) => 2,
            (1, _) | (3, ECLevel::L) => 1,
            _ => 0,
        };

        let ec_bytes = version.block_count(ec_level) * version.ecc_per_block(ec_level);
        (ec_bytes - p) / 2
    }
}
