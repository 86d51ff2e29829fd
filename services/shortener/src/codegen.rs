//! Short code generation

use rand::Rng;

use crate::{error::AppResult, repositories::LinkRepository};

/// Length of every generated short code
pub const CODE_LENGTH: usize = 6;

/// The 62 symbols a short code is drawn from
const ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Path segments served by fixed routes; a code equal to one would be shadowed
const RESERVED_CODES: &[&str] = &["healthz", "login", "logout", "register", "shorten"];

/// Whether `code` collides with a fixed route
pub fn is_reserved(code: &str) -> bool {
    RESERVED_CODES.contains(&code)
}

/// Draw `length` symbols uniformly at random from `[A-Za-z0-9]`
pub fn generate_code(length: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..length)
        .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
        .collect()
}

/// Draw random codes until one is neither reserved nor present in the store
///
/// Nothing is written here; the caller inserts the code and must still cope
/// with another request claiming it first.
pub async fn generate_unique_code(links: &LinkRepository) -> AppResult<String> {
    generate_unique_code_with(links, || generate_code(CODE_LENGTH)).await
}

/// Same as [`generate_unique_code`] with an arbitrary code source.
///
/// The loop has no upper bound; with 62^6 codes it terminates quickly at any
/// realistic table size.
pub async fn generate_unique_code_with<F>(links: &LinkRepository, mut next: F) -> AppResult<String>
where
    F: FnMut() -> String,
{
    loop {
        let code = next();
        if is_reserved(&code) {
            continue;
        }
        if !links.code_exists(&code).await? {
            return Ok(code);
        }
    }
}
