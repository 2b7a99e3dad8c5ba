//! Session-signing secret generation
//!
//! Secrets are written into a dotenv-style file so the bookmarks service picks
//! them up together with the rest of its environment.

use std::path::Path;

use rand::RngCore;
use rand::rngs::OsRng;
use tracing::info;

use crate::Result;

/// Key the bookmarks service reads its signing secret from
pub const SECRET_KEY_NAME: &str = "SECRET_KEY";

/// Number of random bytes in a secret (hex doubles the length)
pub const SECRET_BYTES: usize = 32;

/// 32 random bytes from the OS generator, lowercase hex
pub fn generate_secret() -> String {
    let mut bytes = [0u8; SECRET_BYTES];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Set `key=value` in the env file at `path`
///
/// The first line assigning `key` is replaced in place; every other line is
/// kept as-is. If no line assigns `key` it is appended. The file is created if
/// it does not exist.
pub fn store_secret(path: &Path, key: &str, value: &str) -> Result<()> {
    let existing = if path.exists() {
        std::fs::read_to_string(path)?
    } else {
        String::new()
    };

    let assignment = format!("{}={}", key, value);
    let mut replaced = false;
    let mut lines: Vec<String> = existing
        .lines()
        .map(|line| {
            if !replaced && assigns_key(line, key) {
                replaced = true;
                assignment.clone()
            } else {
                line.to_string()
            }
        })
        .collect();

    if !replaced {
        lines.push(assignment);
    }

    let mut content = lines.join("\n");
    content.push('\n');
    std::fs::write(path, content)?;

    info!("Stored {} in {}", key, path.display());
    Ok(())
}

/// Generate a fresh secret and store it under `key`, returning the secret
pub fn rotate_secret(path: &Path, key: &str) -> Result<String> {
    let secret = generate_secret();
    store_secret(path, key, &secret)?;
    Ok(secret)
}

fn assigns_key(line: &str, key: &str) -> bool {
    let line = line.trim_start();
    let line = line.strip_prefix("export ").unwrap_or(line).trim_start();
    line.strip_prefix(key)
        .is_some_and(|rest| rest.trim_start().starts_with('='))
}
