use anyhow::{bail, Result};

/// Longest key or value accepted by `set`, in characters.
pub const MAX_ENTRY_CHARS: usize = 63;

pub fn validate_entry(key: &str, value: &str) -> Result<()> {
    if key.is_empty() {
        bail!("Key must not be empty");
    }

    let key_len = key.chars().count();
    if key_len > MAX_ENTRY_CHARS {
        bail!("Key is {key_len} characters, the limit is {MAX_ENTRY_CHARS}");
    }

    let value_len = value.chars().count();
    if value_len > MAX_ENTRY_CHARS {
        bail!("Value is {value_len} characters, the limit is {MAX_ENTRY_CHARS}");
    }

    Ok(())
}
