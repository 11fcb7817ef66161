use crate::common::{Color, ECLevel, MaskPattern, Version};

/// A finished QR symbol: every module has its final colour and the mask is applied.
///
/// Rows and columns are indexed from the top-left corner, excluding the quiet zone.
/// The quiet zone width is a rendering recommendation and is never part of
/// [`Symbol::modules`].
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Symbol {
    version: Version,
    ec_level: ECLevel,
    mask: MaskPattern,
    width: usize,
    quiet_zone: usize,
    modules: Vec<Color>,
}

impl Symbol {
    pub(crate) fn new(
        version: Version,
        ec_level: ECLevel,
        mask: MaskPattern,
        width: usize,
        quiet_zone: usize,
        modules: Vec<Color>,
    ) -> Self {
        debug_assert_eq!(modules.len(), width * width, "Module count doesn't match width {width}");
        Self { version, ec_level, mask, width, quiet_zone, modules }
    }

    pub fn version(&self) -> Version {
        self.version
    }

    pub fn ec_level(&self) -> ECLevel {
        self.ec_level
    }

    pub fn mask(&self) -> MaskPattern {
        self.mask
    }

    /// Side length in modules, `4 * version + 17`.
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn quiet_zone(&self) -> usize {
        self.quiet_zone
    }

    /// Row-major module colours.
    pub fn modules(&self) -> &[Color] {
        &self.modules
    }

    /// # Panics
    ///
    /// Panics if `r` or `c` is not less than [`Symbol::width`].
    pub fn get(&self, r: usize, c: usize) -> Color {
        assert!(r < self.width && c < self.width, "Module ({r}, {c}) outside width {}", self.width);
        self.modules[r * self.width + c]
    }

    pub fn is_dark(&self, r: usize, c: usize) -> bool {
        self.get(r, c) == Color::Dark
    }

    pub fn count_dark_modules(&self) -> usize {
        self.modules.iter().filter(|&&m| m == Color::Dark).count()
    }

    pub fn metadata(&self) -> String {
        format!(
            "{{ Version: {}, Ec level: {}, Mask: {}, Width: {} }}",
            self.version, self.ec_level, *self.mask, self.width
        )
    }
}
