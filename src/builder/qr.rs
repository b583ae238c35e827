use std::ops::Deref;

use tracing::trace;

use crate::common::{
    bitstream::BitStream,
    error::{QRError, QRResult},
    iter::EncRegionIter,
    mask::{compute_total_penalty, MaskPattern},
    metadata::{format_info, Color, ECLevel, Version},
};

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

/// A finished QR symbol for one mask pattern, together with its penalty score.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QR {
    grid: Vec<Module>,
    w: usize,
    ver: Version,
    ecl: ECLevel,
    mask: MaskPattern,
    score: u32,
}

// QR type for builder
//------------------------------------------------------------------------------

impl QR {
    fn new(ver: Version, ecl: ECLevel, mask: MaskPattern) -> Self {
        let w = ver.width();
        Self { grid: vec![Module::Empty; w * w], w, ver, ecl, mask, score: 0 }
    }

    /// Lays out a complete symbol for `mask`. `codewords` are the interleaved data
    /// and ecc codewords and must fill the encoding region exactly.
    pub fn build(
        ver: Version,
        ecl: ECLevel,
        mask: MaskPattern,
        codewords: &[u8],
    ) -> QRResult<Self> {
        let mut qr = Self::new(ver, ecl, mask);
        qr.draw_finder_patterns();
        qr.draw_alignment_patterns();
        qr.draw_timing_patterns();
        qr.draw_version_info();
        qr.draw_format_info();
        qr.draw_payload(BitStream::from(codewords))?;
        qr.score = compute_total_penalty(&qr);
        trace!("Mask {} scored {}", *mask, qr.score);
        Ok(qr)
    }

    pub fn version(&self) -> Version {
        self.ver
    }

    pub fn width(&self) -> usize {
        self.w
    }

    pub fn ec_level(&self) -> ECLevel {
        self.ecl
    }

    pub fn mask(&self) -> MaskPattern {
        self.mask
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn metadata(&self) -> String {
        format!(
            "Version: {}, Width: {}, EC level: {:?}, Mask: {}",
            self.ver, self.w, self.ecl, *self.mask
        )
    }

    pub fn count_dark_modules(&self) -> usize {
        self.grid.iter().filter(|&m| matches!(**m, Color::Dark)).count()
    }

    pub fn is_dark(&self, r: i16, c: i16) -> bool {
        *self.get(r, c) == Color::Dark
    }

    // Row major grid, true for dark modules
    pub fn to_bool_grid(&self) -> Vec<Vec<bool>> {
        self.grid
            .chunks(self.w)
            .map(|row| row.iter().map(|m| **m == Color::Dark).collect())
            .collect()
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

    fn coord_to_index(&self, r: i16, c: i16) -> usize {
        let w = self.w as i16;
        debug_assert!(-w <= r && r < w, "row should be greater than or equal to w");
        debug_assert!(-w <= c && c < w, "column should be greater than or equal to w");

        let r = if r < 0 { r + w } else { r };
        let c = if c < 0 { c + w } else { c };
        (r * w + c) as _
    }

    pub fn get(&self, r: i16, c: i16) -> Module {
        self.grid[self.coord_to_index(r, c)]
    }

    // Only writer of the grid. Assigned modules are never overwritten
    fn assign(&mut self, r: i16, c: i16, module: Module) -> bool {
        let index = self.coord_to_index(r, c);
        if self.grid[index] != Module::Empty {
            return false;
        }
        self.grid[index] = module;
        true
    }

    fn is_region_empty(&self, r: i16, c: i16, h: i16, w: i16) -> bool {
        (r..r + h).all(|i| (c..c + w).all(|j| self.get(i, j) == Module::Empty))
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

    // Centre at (r, c), including the light separator on the inner sides
    fn draw_finder_pattern_at(&mut self, r: i16, c: i16) {
        let (dr_top, dr_bottom) = if r > 0 { (-3, 4) } else { (-4, 3) };
        let (dc_left, dc_right) = if c > 0 { (-3, 4) } else { (-4, 3) };
        for i in dr_top..=dr_bottom {
            for j in dc_left..=dc_right {
                let m = match (i, j) {
                    (4 | -4, _) | (_, 4 | -4) => Module::Func(Color::Light),
                    (3 | -3, _) | (_, 3 | -3) => Module::Func(Color::Dark),
                    (2 | -2, _) | (_, 2 | -2) => Module::Func(Color::Light),
                    _ => Module::Func(Color::Dark),
                };
                let ok = self.assign(r + i, c + j, m);
                debug_assert!(ok, "Finder pattern overlaps at ({}, {})", r + i, c + j);
            }
        }
    }
}

#[cfg(test)]
mod finder_pattern_tests {
    use super::QR;
    use crate::common::{
        mask::MaskPattern,
        metadata::{ECLevel, Version},
    };

    #[test]
    fn test_finder_pattern_qr() {
        let mut qr =
            QR::new(Version::new(1).unwrap(), ECLevel::L, MaskPattern::new(0).unwrap());
        qr.draw_finder_patterns();
        assert_eq!(
            qr.to_debug_str(),
            "\n\
             fffffffF.....Ffffffff\n\
             fFFFFFfF.....FfFFFFFf\n\
             fFfffFfF.....FfFfffFf\n\
             fFfffFfF.....FfFfffFf\n\
             fFfffFfF.....FfFfffFf\n\
             fFFFFFfF.....FfFFFFFf\n\
             fffffffF.....Ffffffff\n\
             FFFFFFFF.....FFFFFFFF\n\
             .....................\n\
             .....................\n\
             .....................\n\
             .....................\n\
             .....................\n\
             FFFFFFFF.............\n\
             fffffffF.............\n\
             fFFFFFfF.............\n\
             fFfffFfF.............\n\
             fFfffFfF.............\n\
             fFfffFfF.............\n\
             fFFFFFfF.............\n\
             fffffffF.............\n"
        );
    }
}

// Timing pattern
//------------------------------------------------------------------------------

impl QR {
    fn draw_timing_patterns(&mut self) {
        let w = self.w as i16;
        self.draw_line(6, 8, 6, w - 9);
        self.draw_line(8, 6, w - 9, 6);
    }

    // Dark on even indices; cells already taken by alignment patterns are left alone
    fn draw_line(&mut self, r1: i16, c1: i16, r2: i16, c2: i16) {
        debug_assert!(r1 == r2 || c1 == c2, "Line is neither vertical nor horizontal");

        let clr = |i: i16| Module::Func(Color::from(i & 1 == 0));
        if r1 == r2 {
            for j in c1..=c2 {
                self.assign(r1, j, clr(j));
            }
        } else {
            for i in r1..=r2 {
                self.assign(i, c1, clr(i));
            }
        }
    }
}

#[cfg(test)]
mod timing_pattern_tests {
    use super::QR;
    use crate::common::{
        mask::MaskPattern,
        metadata::{ECLevel, Version},
    };

    #[test]
    fn test_timing_pattern_1() {
        let mut qr =
            QR::new(Version::new(1).unwrap(), ECLevel::L, MaskPattern::new(0).unwrap());
        qr.draw_timing_patterns();
        assert_eq!(
            qr.to_debug_str(),
            "\n\
             .....................\n\
             .....................\n\
             .....................\n\
             .....................\n\
             .....................\n\
             .....................\n\
             ........fFfFf........\n\
             .....................\n\
             ......f..............\n\
             ......F..............\n\
             ......f..............\n\
             ......F..............\n\
             ......f..............\n\
             .....................\n\
             .....................\n\
             .....................\n\
             .....................\n\
             .....................\n\
             .....................\n\
             .....................\n\
             .....................\n"
        );
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

    // Skipped entirely when any module of the 5x5 region is taken
    fn draw_alignment_pattern_at(&mut self, r: i16, c: i16) {
        if !self.is_region_empty(r - 2, c - 2, 5, 5) {
            return;
        }
        for i in -2..=2 {
            for j in -2..=2 {
                let m = match (i, j) {
                    (-2 | 2, _) | (_, -2 | 2) | (0, 0) => Module::Func(Color::Dark),
                    _ => Module::Func(Color::Light),
                };
                self.assign(r + i, c + j, m);
            }
        }
    }
}


// Format & version info
//------------------------------------------------------------------------------

impl QR {
    fn draw_format_info(&mut self) {
        let info = format_info(self.ecl, *self.mask) as u32;
        self.draw_number(info, FORMAT_INFO_BIT_LEN, Module::Format, &FORMAT_INFO_COORDS_MAIN);
        self.draw_number(info, FORMAT_INFO_BIT_LEN, Module::Format, &FORMAT_INFO_COORDS_SIDE);
        let ok = self.assign(-8, 8, Module::Format(Color::Dark));
        debug_assert!(ok, "Dark module already assigned");
    }

    fn draw_version_info(&mut self) {
        if !self.ver.has_version_info() {
            return;
        }
        let info = self.ver.info();
        self.draw_number(info, VERSION_INFO_BIT_LEN, Module::Version, &VERSION_INFO_COORDS_TR);
        self.draw_number(info, VERSION_INFO_BIT_LEN, Module::Version, &VERSION_INFO_COORDS_BL);
    }

    // Most significant bit first
    fn draw_number(
        &mut self,
        number: u32,
        bit_len: usize,
        module: fn(Color) -> Module,
        coords: &[(i16, i16)],
    ) {
        debug_assert_eq!(coords.len(), bit_len, "Coordinate count doesn't match bit length");

        let mut mask = 1 << (bit_len - 1);
        for &(r, c) in coords {
            let ok = self.assign(r, c, module(Color::from(number & mask != 0)));
            debug_assert!(ok, "Info module already assigned at ({r}, {c})");
            mask >>= 1;
        }
    }
}

#[cfg(test)]
mod qr_information_tests {
    use super::{Module, QR, FORMAT_INFO_COORDS_MAIN, FORMAT_INFO_COORDS_SIDE};
    use super::{VERSION_INFO_COORDS_BL, VERSION_INFO_COORDS_TR};
    use crate::common::{
        mask::MaskPattern,
        metadata::{Color, ECLevel, Version},
    };

    #[test]
    fn test_version_info_1() {
        let mut qr =
            QR::new(Version::new(1).unwrap(), ECLevel::L, MaskPattern::new(0).unwrap());
        qr.draw_version_info();
        assert!(qr.grid.iter().all(|&m| m == Module::Empty));
    }

    #[test]
    fn test_version_info_7() {
        let mut qr =
            QR::new(Version::new(7).unwrap(), ECLevel::L, MaskPattern::new(0).unwrap());
        qr.draw_version_info();
        let s = qr.to_debug_str();
        let rows: Vec<&str> = s.lines().skip(1).collect();
        assert_eq!(&rows[0][34..37], "VVv");
        assert_eq!(&rows[1][34..37], "VvV");
        assert_eq!(&rows[2][34..37], "VvV");
        assert_eq!(&rows[3][34..37], "Vvv");
        assert_eq!(&rows[4][34..37], "vvv");
        assert_eq!(&rows[5][34..37], "VVV");
        assert_eq!(&rows[34][..6], "VVVVvV");
        assert_eq!(&rows[35][..6], "VvvvvV");
        assert_eq!(&rows[36][..6], "vVVvvV");
        assert_eq!(qr.grid.iter().filter(|&&m| m != Module::Empty).count(), 36);
    }

    #[test]
    fn test_format_info_qr() {
        // L, mask 0: 111011111000100
        let mut qr =
            QR::new(Version::new(1).unwrap(), ECLevel::L, MaskPattern::new(0).unwrap());
        qr.draw_format_info();
        assert_eq!(
            qr.to_debug_str(),
            "\n\
             ........M............\n\
             ........M............\n\
             ........m............\n\
             ........M............\n\
             ........M............\n\
             ........M............\n\
             .....................\n\
             ........m............\n\
             mmmMmm.mm....mmMMMmMM\n\
             .....................\n\
             .....................\n\
             .....................\n\
             .....................\n\
             ........m............\n\
             ........m............\n\
             ........m............\n\
             ........m............\n\
             ........M............\n\
             ........m............\n\
             ........m............\n\
             ........m............\n"
        );
    }

    #[test_case::test_case(ECLevel::M, 5)]
    #[test_case::test_case(ECLevel::H, 2)]
    fn test_format_info_mirrored(ecl: ECLevel, mask: u8) {
        let mut qr = QR::new(Version::new(2).unwrap(), ecl, MaskPattern::new(mask).unwrap());
        qr.draw_format_info();
        for (&(r1, c1), &(r2, c2)) in FORMAT_INFO_COORDS_MAIN.iter().zip(&FORMAT_INFO_COORDS_SIDE) {
            assert_eq!(qr.get(r1, c1), qr.get(r2, c2));
        }
        assert_eq!(qr.get(-8, 8), Module::Format(Color::Dark));
    }

    #[test]
    fn test_version_info_mirrored() {
        for v in 7..=40 {
            let mut qr =
                QR::new(Version::new(v).unwrap(), ECLevel::Q, MaskPattern::new(0).unwrap());
            qr.draw_version_info();
            for (&(r1, c1), &(r2, c2)) in VERSION_INFO_COORDS_TR.iter().zip(&VERSION_INFO_COORDS_BL) {
                assert_eq!((r1, c1), (c2, r2));
                assert_eq!(qr.get(r1, c1), qr.get(r2, c2));
            }
        }
    }
}

// Encoding region
//------------------------------------------------------------------------------

impl QR {
    // Writes codeword bits with the mask applied, then the light remainder bits
    fn draw_payload(&mut self, payload: BitStream) -> QRResult<()> {
        let mask_fn = self.mask.mask_function();
        let mut coords = EncRegionIter::new(self.ver);
        for bit in payload {
            let (r, c) = coords
                .by_ref()
                .find(|&(r, c)| self.get(r, c) == Module::Empty)
                .ok_or(QRError::PlacementConsistency)?;
            self.assign(r, c, Module::Data(Color::from(bit ^ mask_fn(r, c))));
        }

        let remainder: Vec<_> = coords.filter(|&(r, c)| self.get(r, c) == Module::Empty).collect();
        if remainder.len() != self.ver.remainder_bits() {
            return Err(QRError::PlacementConsistency);
        }
        for (r, c) in remainder {
            self.assign(r, c, Module::Data(Color::from(mask_fn(r, c))));
        }
        Ok(())
    }
}


// Global constants
//------------------------------------------------------------------------------

static FORMAT_INFO_BIT_LEN: usize = 15;

static VERSION_INFO_BIT_LEN: usize = 18;

// Around the top left finder, most significant bit first
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

// Split between the bottom left and top right finders
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
