mod block;
mod galois;

pub use block::*;
pub use galois::G;
pub(crate) use galois::GENERATOR_POLYNOMIALS;

// Largest block in any version is 123 data + 30 ecc codewords
pub const MAX_BLOCK_SIZE: usize = 256;

pub const MAX_EC_SIZE: usize = 30;

// Reed-Solomon encoder
//------------------------------------------------------------------------------

// Performs polynomial long division with data polynomial(num)
// and generator polynomial(den) to compute remainder polynomial,
// the coefficients of which are the ecc
pub fn ecc(block: &[u8], ecc_count: usize) -> Vec<u8> {
    debug_assert!(
        ecc_count <= MAX_EC_SIZE && !GENERATOR_POLYNOMIALS[ecc_count].is_empty(),
        "No generator polynomial for ecc count {ecc_count}"
    );

    let len = block.len();
    let gen_poly = GENERATOR_POLYNOMIALS[ecc_count];

    let mut res = block.to_vec();
    res.resize(len + ecc_count, 0);

    for i in 0..len {
        let lead_coeff = G(res[i]);
        if lead_coeff == G(0) {
            continue;
        }

        // Generator coefficients are stored as logs, so each product is one lookup
        let log_lead_coeff = lead_coeff.log();
        for (u, &v) in res[i + 1..].iter_mut().zip(gen_poly.iter()) {
            *u ^= u8::from(G::gen_pow(v as usize + log_lead_coeff));
        }
    }

    res.split_off(len)
}
