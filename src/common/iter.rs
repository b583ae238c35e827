use super::metadata::Version;

// Iterator for placing data in encoding region of QR
//------------------------------------------------------------------------------

/// Walks every module of the symbol in data placement order: two column strips
/// from the right edge leftwards, alternating upwards and downwards sweeps, right
/// column of the strip first. The vertical timing column is skipped. Callers skip
/// modules that are already assigned.
pub struct EncRegionIter {
    // Right column of the current strip
    col: i16,
    // Position inside the current strip
    step: i16,
    width: i16,
}

const VERT_TIMING_COL: i16 = 6;

impl EncRegionIter {
    pub const fn new(version: Version) -> Self {
        let w = version.width() as i16;
        Self { col: w - 1, step: 0, width: w }
    }
}

impl Iterator for EncRegionIter {
    type Item = (i16, i16);
    fn next(&mut self) -> Option<Self::Item> {
        if self.col < 1 {
            return None;
        }

        let vert = self.step >> 1;
        let c = self.col - (self.step & 1);
        let upwards = (self.col + 1) & 2 == 0;
        let r = if upwards { self.width - 1 - vert } else { vert };

        self.step += 1;
        if self.step == self.width << 1 {
            self.step = 0;
            self.col -= 2;
            if self.col == VERT_TIMING_COL {
                self.col -= 1;
            }
        }

        Some((r, c))
    }
}
