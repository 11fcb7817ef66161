use std::fmt::{Display, Error, Formatter};
use std::str::FromStr;

use image::{GrayImage, Luma, Rgb, RgbImage};

use crate::common::{Color, QRError, QRResult};
use crate::symbol::Symbol;

// Theme
//------------------------------------------------------------------------------

/// Foreground (dark module) and background (light module and quiet zone) colours.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct Theme {
    pub fg: Rgb<u8>,
    pub bg: Rgb<u8>,
}

impl Theme {
    pub const MONO: Self = Self { fg: Rgb([0, 0, 0]), bg: Rgb([255, 255, 255]) };
    pub const CYBER: Self = Self { fg: Rgb([0x00, 0xff, 0xff]), bg: Rgb([0x1a, 0x1a, 0x1a]) };
    pub const MINIMAL: Self = Self { fg: Rgb([0xff, 0x99, 0x99]), bg: Rgb([0xff, 0xff, 0xff]) };

    pub fn new(fg: Rgb<u8>, bg: Rgb<u8>) -> Self {
        Self { fg, bg }
    }

    /// Builds a theme from `#rrggbb` strings.
    pub fn from_hex(fg: &str, bg: &str) -> QRResult<Self> {
        Ok(Self { fg: parse_hex(fg)?, bg: parse_hex(bg)? })
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::MONO
    }
}

impl FromStr for Theme {
    type Err = QRError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mono" => Ok(Self::MONO),
            "cyber" => Ok(Self::CYBER),
            "minimal" => Ok(Self::MINIMAL),
            _ => Err(QRError::InvalidInput("theme must be one of mono, cyber, minimal")),
        }
    }
}

impl Display for Theme {
    fn fmt(&self, f: &mut Formatter) -> Result<(), Error> {
        let name = [(Self::MONO, "mono"), (Self::CYBER, "cyber"), (Self::MINIMAL, "minimal")]
            .into_iter()
            .find_map(|(t, name)| (t == *self).then_some(name));
        match name {
            Some(name) => f.write_str(name),
            None => {
                let [fr, fg, fb] = self.fg.0;
                let [br, bg, bb] = self.bg.0;
                write!(f, "#{fr:02x}{fg:02x}{fb:02x} on #{br:02x}{bg:02x}{bb:02x}")
            }
        }
    }
}

fn parse_hex(s: &str) -> QRResult<Rgb<u8>> {
    let hex = s.strip_prefix('#').unwrap_or(s);
    if hex.len() != 6 || !hex.is_ascii() {
        return Err(QRError::InvalidInput("colour must be a #rrggbb hex string"));
    }
    let channel = |i: usize| {
        u8::from_str_radix(&hex[i..i + 2], 16)
            .map_err(|_| QRError::InvalidInput("colour must be a #rrggbb hex string"))
    };
    Ok(Rgb([channel(0)?, channel(2)?, channel(4)?]))
}

// Render
//------------------------------------------------------------------------------

impl Symbol {
    // Side length in pixels including the quiet zone on both sides
    fn canvas_size(&self, module_sz: u32) -> u32 {
        self.quiet_zone()
            .checked_mul(2)
            .and_then(|qz| qz.checked_add(self.width()))
            .and_then(|modules| u32::try_from(modules).ok())
            .and_then(|modules| modules.checked_mul(module_sz))
            .unwrap_or_else(|| {
                panic!(
                    "Canvas size overflows u32: Width {}, Quiet zone {}, Module size {module_sz}",
                    self.width(),
                    self.quiet_zone()
                )
            })
    }

    fn color_at_pixel(&self, x: u32, y: u32, module_sz: u32) -> Color {
        let qz_sz = self.quiet_zone() as u32 * module_sz;
        let qr_sz = self.width() as u32 * module_sz;
        if x < qz_sz || x >= qz_sz + qr_sz || y < qz_sz || y >= qz_sz + qr_sz {
            return Color::Light;
        }
        let r = ((y - qz_sz) / module_sz) as usize;
        let c = ((x - qz_sz) / module_sz) as usize;
        self.get(r, c)
    }

    /// Black on white, `module_sz` pixels per module.
    ///
    /// # Panics
    ///
    /// Panics if the side length in pixels doesn't fit in a `u32`.
    pub fn to_image(&self, module_sz: u32) -> GrayImage {
        debug_assert!(module_sz > 0, "Module size must be positive");
        let sz = self.canvas_size(module_sz);
        GrayImage::from_fn(sz, sz, |x, y| {
            Luma([self.color_at_pixel(x, y, module_sz).select(255, 0)])
        })
    }

    /// Same canvas as [`Symbol::to_image`], coloured with `theme`.
    pub fn render(&self, module_sz: u32, theme: &Theme) -> RgbImage {
        debug_assert!(module_sz > 0, "Module size must be positive");
        let sz = self.canvas_size(module_sz);
        RgbImage::from_fn(sz, sz, |x, y| {
            self.color_at_pixel(x, y, module_sz).select(theme.bg, theme.fg)
        })
    }

    // Light modules are drawn as full blocks so the preview reads on a dark terminal
    pub fn to_str(&self, module_sz: usize) -> String {
        let qz_sz = self.quiet_zone() * module_sz;
        let qr_sz = self.width() * module_sz;
        let total_sz = qz_sz + qr_sz + qz_sz;

        let mut canvas = String::with_capacity(total_sz * (total_sz * 3 + 1));
        for i in 0..total_sz {
            for j in 0..total_sz {
                if i < qz_sz || i >= qz_sz + qr_sz || j < qz_sz || j >= qz_sz + qr_sz {
                    canvas.push('█');
                    continue;
                }
                let r = (i - qz_sz) / module_sz;
                let c = (j - qz_sz) / module_sz;
                canvas.push(self.get(r, c).select('█', ' '));
            }
            canvas.push('\n');
        }

        canvas
    }
}
