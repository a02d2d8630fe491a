//! Human-readable reference numbers: a record-type prefix plus a short
//! random uppercase alphanumeric suffix. Uniqueness is left to the store's
//! UNIQUE constraint, not to the generator.

use rand::Rng;

const SUFFIX_LEN: usize = 6;
const ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

pub const MARKET_PREFIX: &str = "MKT";
pub const VENDOR_PREFIX: &str = "VND";

pub fn market_reference() -> String {
    with_prefix(MARKET_PREFIX)
}

pub fn vendor_reference() -> String {
    with_prefix(VENDOR_PREFIX)
}

fn with_prefix(prefix: &str) -> String {
    let mut rng = rand::thread_rng();
    let mut out = String::with_capacity(prefix.len() + 1 + SUFFIX_LEN);
    out.push_str(prefix);
    out.push('-');
    for _ in 0..SUFFIX_LEN {
        let idx = rng.gen_range(0..ALPHABET.len());
        out.push(ALPHABET[idx] as char);
    }
    out
}
