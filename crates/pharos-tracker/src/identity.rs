//! Durable visitor identity.
//!
//! The visitor id is an opaque string minted once per storage location and
//! reused forever after; nothing in this system rotates or deletes it. When
//! durable storage is unavailable the tracker falls back to an ephemeral id
//! so event capture keeps working for the life of the process.

use std::fs;
use std::io;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

const VISITOR_ID_FILE: &str = "visitor_id";
const BASE36: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Returns the visitor id for `storage_dir`, minting and persisting one on
/// first use.
///
/// Storage faults never propagate: an unreadable or unwritable location is
/// logged and yields a fresh ephemeral id instead. The result is always
/// non-empty.
pub fn resolve_visitor_id(storage_dir: &Path) -> String {
    match load_or_create(storage_dir) {
        Ok(id) => id,
        Err(e) => {
            tracing::warn!(
                dir = %storage_dir.display(),
                error = %e,
                "visitor id storage unavailable, using ephemeral id"
            );
            generate_visitor_id()
        }
    }
}

fn load_or_create(storage_dir: &Path) -> io::Result<String> {
    let id_path = storage_dir.join(VISITOR_ID_FILE);
    match fs::read_to_string(&id_path) {
        Ok(raw) => {
            let id = raw.trim().to_string();
            // An empty file is treated as absent and re-minted below.
            if !id.is_empty() {
                return Ok(id);
            }
        }
        Err(e) if e.kind() != io::ErrorKind::NotFound => return Err(e),
        Err(_) => {}
    }

    fs::create_dir_all(storage_dir)?;
    let id = generate_visitor_id();
    fs::write(&id_path, &id)?;
    Ok(id)
}

/// Mints an id of the form `v_<9 random base-36 chars><unix millis in base 36>`.
///
/// The random prefix keeps ids minted in the same millisecond distinct; the
/// timestamp suffix makes collisions across machines vanishingly unlikely.
pub(crate) fn generate_visitor_id() -> String {
    let mut id = String::with_capacity(24);
    id.push_str("v_");
    for _ in 0..9 {
        id.push(BASE36[rand::random_range(0..BASE36.len())] as char);
    }
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0);
    id.push_str(&to_base36(millis));
    id
}

fn to_base36(mut n: u128) -> String {
    if n == 0 {
        return "0".to_string();
    }
    let mut digits = Vec::new();
    while n > 0 {
        digits.push(BASE36[(n % 36) as usize]);
        n /= 36;
    }
    digits.reverse();
    String::from_utf8(digits).unwrap_or_default()
}

#[cfg(test)]
#[path = "identity_test.rs"]
mod tests;
