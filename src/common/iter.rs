use super::metadata::Version;

// Iterator for placing data in encoding region of QR
//------------------------------------------------------------------------------

// Walks column pairs from the right edge, alternating upward and downward,
// visiting the right module of each row before the left. Column 6 holds the
// vertical timing pattern and is skipped entirely. Function modules are
// yielded too; the caller skips whatever is already drawn.
pub struct EncRegionIter {
    w: i16,
    // Right column of the current pair
    right: i16,
    // Rows visited so far in the current pair
    step: i16,
    // 0 for the right column, 1 for the left
    side: i16,
}

impl EncRegionIter {
    pub const fn new(ver: Version) -> Self {
        let w = ver.width() as i16;
        Self { w, right: w - 1, step: 0, side: 0 }
    }
}

impl Iterator for EncRegionIter {
    type Item = (i16, i16);

    fn next(&mut self) -> Option<Self::Item> {
        if self.right < 1 {
            return None;
        }

        let upward = (self.right + 1) & 2 == 0;
        let r = if upward { self.w - 1 - self.step } else { self.step };
        let res = (r, self.right - self.side);

        self.side += 1;
        if self.side == 2 {
            self.side = 0;
            self.step += 1;
            if self.step == self.w {
                self.step = 0;
                self.right -= 2;
                if self.right == 6 {
                    self.right = 5;
                }
            }
        }

        Some(res)
    }
}
