use std::ops::Range;

use tracing::trace;

use super::{
    bitstream::BitStream,
    error::{QRError, QRResult},
    metadata::{ECLevel, Version, DATA_BIT_CAPACITY},
};

// Byte mode indicator
pub const MODE_INDICATOR: u8 = 0b0100;

pub const MODE_BITS: usize = 4;

pub static PADDING_CODEWORDS: [u8; 2] = [0b11101100, 0b00010001];

// Version selection
//------------------------------------------------------------------------------

/// Finds the smallest version in `versions` that can hold `len` bytes in byte mode.
///
/// The lower bound search only accounts for the mode indicator. Once a candidate
/// is found the character count field is added and, if it no longer fits, the next
/// version is tried. `VersionNotFound` means no version in range reaches the lower
/// bound, `TooLargeInput` means the one step advance fell off the range.
pub fn select_version(len: usize, ecl: ECLevel, versions: &Range<usize>) -> QRResult<Version> {
    debug_assert!(
        Version::MIN <= versions.start && versions.start < versions.end,
        "Invalid version range: {versions:?}"
    );

    let caps = &DATA_BIT_CAPACITY[ecl as usize][versions.start - 1..versions.end - 1];
    let bits = (len << 3) + MODE_BITS;
    let idx = caps.partition_point(|&c| c < bits);
    if idx == caps.len() {
        return Err(QRError::VersionNotFound);
    }

    let ver = Version::new(versions.start + idx)?;
    if bits + ver.length_bits() <= ver.data_bit_capacity(ecl) {
        return Ok(ver);
    }

    trace!("Length field overflows version {ver}, advancing");
    let next = *ver + 1;
    if next >= versions.end || next > Version::MAX {
        return Err(QRError::TooLargeInput);
    }
    let ver = Version::new(next)?;
    if bits + ver.length_bits() > ver.data_bit_capacity(ecl) {
        return Err(QRError::TooLargeInput);
    }
    Ok(ver)
}


// Writer for encoded data
//------------------------------------------------------------------------------

mod writer {
    use super::{MODE_BITS, MODE_INDICATOR, PADDING_CODEWORDS};
    use crate::common::{bitstream::BitStream, metadata::Version};

    pub fn push_header(len: usize, ver: Version, out: &mut BitStream) {
        out.push_bits(MODE_INDICATOR, MODE_BITS);
        let len_bits = ver.length_bits();
        debug_assert!(
            len < (1 << len_bits),
            "Char count exceeds bit length: Char count {len}, Char count bits {len_bits}"
        );
        out.push_bits(len as u16, len_bits);
    }

    pub fn push_byte_data(data: &[u8], out: &mut BitStream) {
        for &b in data {
            out.push_bits(b, 8);
        }
    }

    pub fn push_terminator(out: &mut BitStream) {
        let bit_len = out.len();
        let bit_capacity = out.capacity();
        if bit_len < bit_capacity {
            let term_len = std::cmp::min(4, bit_capacity - bit_len);
            out.push_bits(0u8, term_len);
        }
    }

    pub fn pad_remaining_capacity(out: &mut BitStream) {
        push_padding_bits(out);
        push_padding_codewords(out);
    }

    fn push_padding_bits(out: &mut BitStream) {
        let offset = out.len() & 7;
        if offset > 0 {
            (offset..8).for_each(|_| out.push(false));
        }
    }

    fn push_padding_codewords(out: &mut BitStream) {
        debug_assert!(
            out.len() & 7 == 0,
            "Bit offset should be zero before padding codewords: {}",
            out.len() & 7
        );

        let remain_byte_capacity = (out.capacity() - out.len()) >> 3;
        let padding: Vec<u8> =
            PADDING_CODEWORDS.iter().copied().cycle().take(remain_byte_capacity).collect();
        out.extend(&padding);
    }

}

// Encoder
//------------------------------------------------------------------------------

/// Packs `data` into a byte mode bit stream that fills the data capacity of `ver`
/// at `ecl` exactly: mode indicator, character count, data, terminator, then the
/// alternating pad codewords.
pub fn fill_buffer(ver: Version, ecl: ECLevel, data: &[u8]) -> BitStream {
    let mut bs = BitStream::new(ver.data_bit_capacity(ecl));
    writer::push_header(data.len(), ver, &mut bs);
    writer::push_byte_data(data, &mut bs);
    writer::push_terminator(&mut bs);
    writer::pad_remaining_capacity(&mut bs);
    debug_assert!(bs.is_full(), "Buffer not filled: Len {}, Capacity {}", bs.len(), bs.capacity());
    bs
}

pub fn encode_data(
    data: &[u8],
    ecl: ECLevel,
    versions: &Range<usize>,
) -> QRResult<(BitStream, Version)> {
    let ver = select_version(data.len(), ecl, versions)?;
    Ok((fill_buffer(ver, ecl, data), ver))
}

#[cfg(test)]
mod encode_tests {
    use test_case::test_case;

    use super::{encode_data, fill_buffer, MODE_INDICATOR, PADDING_CODEWORDS};
    use crate::common::{
        error::QRError,
        metadata::{ECLevel, Version},
    };

    #[test]
    fn test_fill_buffer_hello() {
        let ver = Version::new(1).unwrap();
        let mut bs = fill_buffer(ver, ECLevel::L, b"HELLO");
        assert_eq!(bs.len(), 152);
        assert_eq!(bs.take_bits(4), Some(0b0100));
        assert_eq!(bs.take_bits(8), Some(0b00000101));
        for &b in b"HELLO" {
            assert_eq!(bs.take_bits(8), Some(b as u16));
        }
        assert_eq!(bs.take_bits(4), Some(0));
        let pads: Vec<u8> = (0..12).map(|_| bs.take_bits(8).unwrap() as u8).collect();
        let exp: Vec<u8> = PADDING_CODEWORDS.iter().copied().cycle().take(12).collect();
        assert_eq!(pads, exp);
        assert_eq!(bs.take_bit(), None);
    }

    #[test]
    fn test_fill_buffer_header() {
        let data = [13, 14, 28, 42, 56, 88, 123, 233, 255];
        let (bs, ver) = encode_data(&data, ECLevel::L, &(1..41)).unwrap();
        assert_eq!(bs.len(), ver.data_bit_capacity(ECLevel::L));
        let b = bs.data();
        assert_eq!(b[0] >> 4, MODE_INDICATOR);
        let len = ((b[0] & 0x0F) << 4) | (b[1] >> 4);
        assert_eq!(len as usize, data.len());
    }

    #[test]
    fn test_fill_buffer_no_room_for_padding() {
        let ver = Version::new(1).unwrap();
        let data = [0xFF; 17];
        let bs = fill_buffer(ver, ECLevel::L, &data);
        assert_eq!(bs.len(), 152);
        assert_eq!(bs.data()[18], 0b11110000);
    }

    #[test_case(ECLevel::L)]
    #[test_case(ECLevel::M)]
    #[test_case(ECLevel::Q)]
    #[test_case(ECLevel::H)]
    fn test_fill_buffer_fills_capacity(ecl: ECLevel) {
        for v in 1..=40 {
            let ver = Version::new(v).unwrap();
            let max_len = (ver.data_bit_capacity(ecl) - 4 - ver.length_bits()) >> 3;
            for len in [0, max_len / 2, max_len] {
                let data = vec![0xA5; len];
                let bs = fill_buffer(ver, ecl, &data);
                assert_eq!(bs.len(), ver.data_bit_capacity(ecl), "version {v} len {len}");
            }
        }
    }

    #[test]
    fn test_encode_data_too_large() {
        let data = vec![0; 2954];
        assert_eq!(encode_data(&data, ECLevel::L, &(1..41)), Err(QRError::TooLargeInput));
    }
}
