//! ABI encoding for the minting contract's `mintToken(address,string)`.

use super::EvmAddress;

/// First four bytes of `keccak256("mintToken(address,string)")`.
pub const MINT_TOKEN_SELECTOR: &str = "3d02d0c9";

const WORD: usize = 32;

/// Hex calldata (with `0x`) for `mintToken(to, token_uri)`.
///
/// Layout: selector, the address left-padded to one word, the offset of the
/// dynamic string (two head words), its byte length, then the UTF-8 bytes
/// right-padded to a word boundary.
pub fn encode_mint_token(to: &EvmAddress, token_uri: &str) -> String {
    let bytes = token_uri.as_bytes();
    let padded_len = (bytes.len() + WORD - 1) / WORD * WORD;

    let mut out = String::with_capacity(2 + 8 + (3 * WORD + padded_len) * 2);
    out.push_str("0x");
    out.push_str(MINT_TOKEN_SELECTOR);
    out.push_str(&"0".repeat(24));
    out.push_str(to.hex_digits());
    out.push_str(&uint_word(2 * WORD));
    out.push_str(&uint_word(bytes.len()));
    for byte in bytes {
        out.push_str(&format!("{:02x}", byte));
    }
    out.push_str(&"00".repeat(padded_len - bytes.len()));
    out
}

fn uint_word(value: usize) -> String {
    format!("{:064x}", value)
}
