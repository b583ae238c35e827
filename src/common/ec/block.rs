use std::ops::Deref;

use super::{ecc, MAX_BLOCK_SIZE};

// Block
//------------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct Block {
    data: [u8; MAX_BLOCK_SIZE],
    // Block length
    len: usize,
    // Data length
    dlen: usize,
}

impl Block {
    pub fn new(raw: &[u8], ecc_count: usize) -> Self {
        let dlen = raw.len();
        let len = dlen + ecc_count;
        debug_assert!(len <= MAX_BLOCK_SIZE, "Block too large: Len {len}");

        let mut data = [0u8; MAX_BLOCK_SIZE];
        data[..dlen].copy_from_slice(raw);
        data[dlen..len].copy_from_slice(&ecc(raw, ecc_count));
        Self { data, len, dlen }
    }

    pub fn data(&self) -> &[u8] {
        &self.data[..self.dlen]
    }

    pub fn ecc(&self) -> &[u8] {
        &self.data[self.dlen..self.len]
    }
}

// Split, interleave & merge
//------------------------------------------------------------------------------

/// Splits the data codewords into `block_count` blocks. The last `len % block_count`
/// blocks hold one codeword more than the others.
pub fn split(data: &[u8], block_count: usize) -> Vec<&[u8]> {
    debug_assert!(block_count > 0, "Block count must be positive");

    let len = data.len();
    let short_size = len / block_count;
    let short_count = block_count - len % block_count;
    let total_short_size = short_size * short_count;

    let mut blocks = Vec::with_capacity(block_count);
    if short_size > 0 {
        blocks.extend(data[..total_short_size].chunks(short_size));
    } else {
        blocks.extend(std::iter::repeat(&data[..0]).take(short_count));
    }
    blocks.extend(data[total_short_size..].chunks(short_size + 1));
    blocks
}

// Column major walk over the blocks, skipping blocks that are already exhausted
pub fn interleave<T: Copy, V: Deref<Target = [T]>>(blocks: &[V]) -> Vec<T> {
    let max_block_size = blocks.iter().map(|b| b.len()).max().unwrap_or(0);
    let total_size = blocks.iter().map(|b| b.len()).sum::<usize>();
    let mut res = Vec::with_capacity(total_size);
    for i in 0..max_block_size {
        for b in blocks {
            if i < b.len() {
                res.push(b[i]);
            }
        }
    }
    res
}

/// Final codeword sequence: interleaved data codewords followed by interleaved ecc.
pub fn merge<D, E>(data_blocks: &[D], ecc_blocks: &[E]) -> Vec<u8>
where
    D: Deref<Target = [u8]>,
    E: Deref<Target = [u8]>,
{
    let mut res = interleave(data_blocks);
    res.extend(interleave(ecc_blocks));
    res
}

#[cfg(test)]
mod block_tests {
    use test_case::test_case;

    use super::{interleave, merge, split, Block, MAX_BLOCK_SIZE};
    use crate::common::metadata::{ECLevel, Version};

    // Inverse of merge. `data_lens` holds the data length of each block in order
    fn deinterleave(codewords: &[u8], data_lens: &[usize], ecc_len: usize) -> Vec<Block> {
        let block_count = data_lens.len();
        let mut encoded = vec![Vec::with_capacity(MAX_BLOCK_SIZE); block_count];

        let mut it = codewords.iter().copied();
        let max_dlen = data_lens.iter().copied().max().unwrap_or(0);
        for i in 0..max_dlen {
            for (b, &dlen) in encoded.iter_mut().zip(data_lens) {
                if i < dlen {
                    b.extend(it.next());
                }
            }
        }
        for _ in 0..ecc_len {
            for b in encoded.iter_mut() {
                b.extend(it.next());
            }
        }
        debug_assert!(it.next().is_none(), "Codewords left over after deinterleaving");

        encoded
            .iter()
            .zip(data_lens)
            .map(|(b, &dlen)| {
                let mut data = [0u8; MAX_BLOCK_SIZE];
                data[..b.len()].copy_from_slice(b);
                Block { data, len: b.len(), dlen }
            })
            .collect()
    }

    #[test]
    fn test_merge() {
        let data: [&[u8]; 2] = [&[1, 2, 3], &[4, 5, 6]];
        let ecc: [Vec<u8>; 2] = [vec![7, 8, 9], vec![10, 11, 12]];
        assert_eq!(merge(&data, &ecc), vec![1, 4, 2, 5, 3, 6, 7, 10, 8, 11, 9, 12]);
    }

    #[test]
    fn test_interleave_uneven() {
        let blocks: [&[u8]; 3] = [&[1, 2], &[3, 4, 5], &[6, 7, 8]];
        assert_eq!(interleave(&blocks), vec![1, 3, 6, 2, 4, 7, 5, 8]);
    }

    #[test]
    fn test_split() {
        let data: Vec<u8> = (0..11).collect();
        let blocks = split(&data, 3);
        assert_eq!(blocks, vec![&[0, 1, 2][..], &[3, 4, 5, 6][..], &[7, 8, 9, 10][..]]);
        let blocks = split(&data, 1);
        assert_eq!(blocks, vec![&data[..]]);
    }

    #[test]
    fn test_split_version_5_q() {
        let ver = Version::new(5).unwrap();
        let ecl = ECLevel::Q;
        let data = vec![0; ver.data_codewords(ecl)];
        let blocks = split(&data, ver.block_count(ecl));
        let lens: Vec<usize> = blocks.iter().map(|b| b.len()).collect();
        assert_eq!(lens, vec![15, 15, 16, 16]);
    }

    #[test]
    fn test_block() {
        let data = b" [\x0bx\xd1r\xdcMC@\xec\x11\xec\x11\xec\x11";
        let block = Block::new(data, 10);
        assert_eq!(block.data(), data);
        assert_eq!(block.ecc(), b"\xc4#'w\xeb\xd7\xe7\xe2]\x17");
    }

    #[test_case(1, ECLevel::L)]
    #[test_case(5, ECLevel::Q)]
    #[test_case(10, ECLevel::M)]
    #[test_case(27, ECLevel::H)]
    #[test_case(40, ECLevel::L)]
    fn test_deinterleave(v: usize, ecl: ECLevel) {
        let ver = Version::new(v).unwrap();
        let data: Vec<u8> = (0..ver.data_codewords(ecl)).map(|i| (i * 7) as u8).collect();
        let data_blocks = split(&data, ver.block_count(ecl));
        let blocks: Vec<Block> =
            data_blocks.iter().map(|b| Block::new(b, ver.ecc_per_block(ecl))).collect();
        let ecc_blocks: Vec<&[u8]> = blocks.iter().map(|b| b.ecc()).collect();
        let merged = merge(&data_blocks, &ecc_blocks);
        assert_eq!(merged.len(), ver.total_codewords());

        let data_lens: Vec<usize> = data_blocks.iter().map(|b| b.len()).collect();
        let restored = deinterleave(&merged, &data_lens, ver.ecc_per_block(ecl));
        assert_eq!(restored, blocks);
    }
}
