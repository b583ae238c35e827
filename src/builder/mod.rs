mod qr;

pub use qr::{Module, QR};

use rayon::prelude::*;
use tracing::{debug, debug_span};

use crate::common::{
    codec::encode_data,
    config::EncoderConfig,
    ec::{merge, split, Block},
    error::{QRError, QRResult},
    mask::MaskPattern,
    metadata::{ECLevel, Version},
};

/// Validated encoder. Every `encode` call searches the configured version and
/// mask ranges and returns the lowest penalty symbol.
#[derive(Debug, Clone, Default)]
pub struct Encoder {
    config: EncoderConfig,
}

impl Encoder {
    pub fn new(config: EncoderConfig) -> QRResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &EncoderConfig {
        &self.config
    }
}


impl Encoder {
    pub fn encode(&self, data: &[u8]) -> QRResult<QR> {
        let ecl = self.config.ec_level;
        let span = debug_span!("encode", len = data.len(), ec_level = ?ecl);
        let _enter = span.enter();
        debug!("Encoding with {}", self.config.metadata());

        let (encoded, ver) = encode_data(data, ecl, &self.config.versions)?;
        debug!(version = *ver, bits = encoded.len(), "Data encoded");

        let codewords = Self::compute_codewords(encoded.data(), ver, ecl);
        debug!(codewords = codewords.len(), "Error correction added & interleaved");

        // One independent symbol per mask, scored in parallel
        let candidates = self
            .config
            .masks
            .clone()
            .into_par_iter()
            .map(|m| QR::build(ver, ecl, MaskPattern::new(m)?, &codewords))
            .collect::<QRResult<Vec<_>>>()?;
        for qr in candidates.iter() {
            debug!(mask = *qr.mask(), score = qr.score(), "Mask candidate");
        }

        // Candidates are in mask order, min_by_key keeps the first of equal scores
        let best = candidates.into_iter().min_by_key(|qr| qr.score());
        let qr = best.ok_or(QRError::InvalidMaskRange {
            min: self.config.masks.start,
            max: self.config.masks.end,
        })?;
        debug!("Generated QR {}", qr.metadata());
        Ok(qr)
    }

    fn compute_codewords(data: &[u8], ver: Version, ecl: ECLevel) -> Vec<u8> {
        let ecc_per_block = ver.ecc_per_block(ecl);
        let blocks = split(data, ver.block_count(ecl))
            .into_iter()
            .map(|b| Block::new(b, ecc_per_block))
            .collect::<Vec<_>>();
        debug!(blocks = blocks.len(), ecc_per_block, "Data split into blocks");

        let data_blocks = blocks.iter().map(Block::data).collect::<Vec<_>>();
        let ecc_blocks = blocks.iter().map(Block::ecc).collect::<Vec<_>>();
        let res = merge(&data_blocks, &ecc_blocks);
        debug_assert!(res.len() == ver.total_codewords(), "Codeword count mismatch: {}", res.len());
        res
    }
}

/// Encodes `data` with the default version and mask ranges.
pub fn encode(data: &[u8], ec_level: ECLevel) -> QRResult<QR> {
    Encoder::new(EncoderConfig::default().ec_level(ec_level))?.encode(data)
}
