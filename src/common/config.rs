use std::ops::Range;

use super::{
    error::{QRError, QRResult},
    mask::MaskPattern,
    metadata::{ECLevel, Version},
};

// Encoder configuration
//------------------------------------------------------------------------------

/// Search space of an encode call. Ranges are half open and can only narrow the
/// standard bounds: versions within `1..41`, mask patterns within `0..8`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncoderConfig {
    pub ec_level: ECLevel,
    pub versions: Range<usize>,
    pub masks: Range<u8>,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            ec_level: ECLevel::M,
            versions: Version::MIN..Version::MAX + 1,
            masks: 0..MaskPattern::COUNT,
        }
    }
}

impl EncoderConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ec_level(mut self, ec_level: ECLevel) -> Self {
        self.ec_level = ec_level;
        self
    }

    pub fn versions(mut self, versions: Range<usize>) -> Self {
        self.versions = versions;
        self
    }

    pub fn masks(mut self, masks: Range<u8>) -> Self {
        self.masks = masks;
        self
    }

    // Pins a single version
    pub fn version(self, version: usize) -> Self {
        self.versions(version..version.saturating_add(1))
    }

    // Pins a single mask pattern
    pub fn mask(self, mask: u8) -> Self {
        self.masks(mask..mask.saturating_add(1))
    }

    pub fn validate(&self) -> QRResult<()> {
        let Range { start, end } = self.versions;
        if start < Version::MIN || end > Version::MAX + 1 || start >= end {
            return Err(QRError::InvalidVersionRange { min: start, max: end });
        }
        let Range { start, end } = self.masks;
        if end > MaskPattern::COUNT || start >= end {
            return Err(QRError::InvalidMaskRange { min: start, max: end });
        }
        Ok(())
    }

    pub fn metadata(&self) -> String {
        format!(
            "EC level: {:?}, Versions: {}..{}, Masks: {}..{}",
            self.ec_level, self.versions.start, self.versions.end, self.masks.start, self.masks.end
        )
    }
}

#[cfg(test)]
mod config_tests {
    use test_case::test_case;

    use super::EncoderConfig;
    use crate::common::{error::QRError, metadata::ECLevel};

    #[test]
    fn test_default() {
        let cfg = EncoderConfig::default();
        assert_eq!(cfg.ec_level, ECLevel::M);
        assert_eq!(cfg.versions, 1..41);
        assert_eq!(cfg.masks, 0..8);
        assert_eq!(cfg.validate(), Ok(()));
    }

    #[test]
    fn test_setters() {
        let cfg = EncoderConfig::new().ec_level(ECLevel::H).version(7).mask(3);
        assert_eq!(cfg.ec_level, ECLevel::H);
        assert_eq!(cfg.versions, 7..8);
        assert_eq!(cfg.masks, 3..4);
        assert_eq!(cfg.metadata(), "EC level: H, Versions: 7..8, Masks: 3..4");
    }

    #[test_case(0, 41)]
    #[test_case(1, 42)]
    #[test_case(5, 5)]
    #[test_case(9, 4)]
    fn test_invalid_versions(min: usize, max: usize) {
        let cfg = EncoderConfig::new().versions(min..max);
        assert_eq!(cfg.validate(), Err(QRError::InvalidVersionRange { min, max }));
    }

    #[test]
    fn test_pinned_version_at_usize_max() {
        let cfg = EncoderConfig::new().version(usize::MAX);
        let max = usize::MAX;
        assert_eq!(cfg.validate(), Err(QRError::InvalidVersionRange { min: max, max }));
    }

    #[test_case(0, 9)]
    #[test_case(3, 3)]
    #[test_case(6, 2)]
    fn test_invalid_masks(min: u8, max: u8) {
        let cfg = EncoderConfig::new().masks(min..max);
        assert_eq!(cfg.validate(), Err(QRError::InvalidMaskRange { min, max }));
    }

    #[test]
    fn test_mask_out_of_range() {
        let cfg = EncoderConfig::new().mask(8);
        assert_eq!(cfg.validate(), Err(QRError::InvalidMaskRange { min: 8, max: 9 }));
    }
}
