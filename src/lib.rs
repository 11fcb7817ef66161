//! # qrsmith
//!
//! A from-scratch QR code encoder. Text goes in, a finished [`Symbol`] comes out: a
//! square grid of dark and light modules that any conformant reader can scan.
//!
//! ## Pipeline
//!
//! 1. **Data analysis**: the whole input is classified as numeric, alphanumeric or byte mode
//! 2. **Version selection**: the smallest version from the configured minimum that holds the data
//! 3. **Bit stream encoding**: mode indicator, character count, payload, terminator and padding
//! 4. **Error correction**: Reed-Solomon codewords per block over GF(256), then interleaving
//! 5. **Matrix construction**: function patterns, format and version areas, zigzag data placement
//! 6. **Mask selection**: all eight masks are scored with the four penalty rules and the lowest wins
//!
//! ## Quick Start
//!
//! ```rust
//! use qrsmith::{encode, ECLevel};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let symbol = encode("HELLO WORLD", ECLevel::Q, 1)?;
//! assert_eq!(*symbol.version(), 1);
//! assert_eq!(symbol.width(), 21);
//!
//! let img = symbol.to_image(10); // 10 pixels per module
//! # let _ = img;
//! # Ok(())
//! # }
//! ```
//!
//! ### Full Configuration
//!
//! ```rust
//! use qrsmith::{ECLevel, MaskPattern, QRBuilder, Theme, Version};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let symbol = QRBuilder::new(b"https://example.com")
//!     .ec_level(ECLevel::H)               // Defaults to M
//!     .min_version(Version::new(3)?)      // Version search starts here, defaults to 1
//!     .mask(MaskPattern::try_new(2)?)     // Skips the penalty search
//!     .quiet_zone(4)                      // Light border in modules, defaults to 4
//!     .build()?;
//!
//! let img = symbol.render(8, &Theme::CYBER);
//! # let _ = img;
//! println!("{}", symbol.metadata());
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Correction Levels
//! - **L (Low)**: ~7% of codewords can be restored
//! - **M (Medium)**: ~15%
//! - **Q (Quartile)**: ~25%
//! - **H (High)**: ~30%
//!
//! ## Logging
//!
//! Every pipeline stage emits `tracing` events at debug level. The library never
//! installs a subscriber or prints on its own.

#![allow(clippy::items_after_test_module)]

pub mod builder;
pub(crate) mod common;
pub mod render;
pub mod symbol;

pub use builder::QRBuilder;
pub use common::codec::Mode;
pub use common::error::{ErrorKind, QRError, QRResult};
pub use common::mask::MaskPattern;
pub use common::metadata::{Color, ECLevel, Version};
pub use render::Theme;
pub use symbol::Symbol;

/// Encodes `text` at `ec_level`, searching versions from `min_version` upwards.
///
/// Fails with [`QRError::InvalidInput`] for empty text or a `min_version` outside 1..=40,
/// and with [`QRError::DataTooLarge`] when no version up to 40 holds the text.
pub fn encode(text: &str, ec_level: ECLevel, min_version: u8) -> QRResult<Symbol> {
    let min_version = Version::new(min_version)?;
    QRBuilder::new(text.as_bytes()).ec_level(ec_level).min_version(min_version).build()
}

#[cfg(test)]
mod encode_tests {
    use super::{encode, ECLevel, ErrorKind, Mode, QRError, Version};

    #[test]
    fn test_encode_hello_world() {
        let symbol = encode("HELLO WORLD", ECLevel::Q, 1).unwrap();
        assert_eq!(symbol.version(), Version::new(1).unwrap());
        assert_eq!(symbol.ec_level(), ECLevel::Q);
        assert_eq!(symbol.quiet_zone(), 4);
    }

    #[test]
    fn test_encode_invalid_min_version() {
        for v in [0, 41] {
            let err = encode("HELLO", ECLevel::M, v).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidInput);
        }
    }

    #[test]
    fn test_encode_empty() {
        assert_eq!(encode("", ECLevel::M, 1).unwrap_err().kind(), ErrorKind::InvalidInput);
    }

    #[test]
    fn test_encode_too_large() {
        let text = "\u{e9}".repeat(1500);
        match encode(&text, ECLevel::H, 1) {
            Err(QRError::DataTooLarge { mode, len, .. }) => {
                assert_eq!(mode, Mode::Byte);
                assert_eq!(len, 3000);
            }
            res => panic!("Expected data too large error, got {res:?}"),
        }
    }
}
