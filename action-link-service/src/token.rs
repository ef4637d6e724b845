use action_link_db::utils::hash_token;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use heapless::String as HeaplessString;
use rand::rngs::OsRng;
use rand::RngCore;

/// Entropy of a raw action token.
pub const TOKEN_BYTES: usize = 32;

/// A freshly generated token. `raw` leaves the process exactly once, inside the link.
pub struct GeneratedToken {
    pub raw: String,
    pub hash: HeaplessString<64>,
}

// No Debug impl: the raw token must never reach a log line.

/// Draws a new token from the OS CSPRNG.
///
/// The raw form is 43 characters of unpadded URL-safe base64.
pub fn generate_token() -> GeneratedToken {
    let mut bytes = [0u8; TOKEN_BYTES];
    OsRng.fill_bytes(&mut bytes);
    let raw = URL_SAFE_NO_PAD.encode(bytes);
    let hash = hash_token(&raw);
    GeneratedToken { raw, hash }
}

/// Public URL a token holder opens to act on a link.
pub fn action_url(public_base_url: &str, raw_token: &str) -> String {
    format!("{}/action/{}", public_base_url.trim_end_matches('/'), raw_token)
}
