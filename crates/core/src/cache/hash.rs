//! Cache key generation.

use sha2::{Digest, Sha256};

/// Build the file-safe slug for a (city, category) pair.
///
/// The readable part is the lowercased pair with runs of other characters
/// collapsed to `_`; the 8-hex suffix hashes the exact input so that
/// "New York" and "new-york" never share an entry.
pub fn query_slug(city: &str, category: &str) -> String {
    let mut readable = String::new();
    let mut pending_sep = false;
    for c in format!("{city}_{category}").chars() {
        if c.is_ascii_alphanumeric() {
            if pending_sep && !readable.is_empty() {
                readable.push('_');
            }
            pending_sep = false;
            readable.push(c.to_ascii_lowercase());
        } else {
            pending_sep = true;
        }
    }
    readable.truncate(80);

    let mut hasher = Sha256::new();
    hasher.update(city.as_bytes());
    hasher.update(b"\n");
    hasher.update(category.as_bytes());
    let digest = hex::encode(hasher.finalize());

    if readable.is_empty() { digest[..8].to_string() } else { format!("{readable}-{}", &digest[..8]) }
}
