use serde::{Deserialize, Serialize};

/// Maximum number of records a remote collection accepts (M).
pub const DEFAULT_MAX_RECORDS: usize = 500;

/// Maximum length of the text field of a single record (L).
pub const DEFAULT_MAX_FIELD_CHARS: usize = 255;

/// Hard limits of the remote medium
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Budget {
    /// Maximum number of records in one collection (M)
    pub max_records: usize,

    /// Maximum characters in one record's text field (L)
    pub max_field_chars: usize,
}

impl Default for Budget {
    fn default() -> Self {
        Self {
            max_records: DEFAULT_MAX_RECORDS,
            max_field_chars: DEFAULT_MAX_FIELD_CHARS,
        }
    }
}

impl Budget {
    /// Total characters the collection can hold (M * L)
    #[must_use]
    pub const fn total_chars(&self) -> usize {
        self.max_records.saturating_mul(self.max_field_chars)
    }

    /// Number of records needed to hold `len` characters
    #[must_use]
    pub const fn records_needed(&self, len: usize) -> usize {
        if self.max_field_chars == 0 {
            return 0;
        }
        len.div_ceil(self.max_field_chars)
    }

    /// Whether `len` characters fit inside the record budget
    #[must_use]
    pub const fn fits(&self, len: usize) -> bool {
        self.records_needed(len) <= self.max_records
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.max_field_chars == 0 {
            return Err("max_field_chars must be > 0".to_string());
        }

        if self.max_records == 0 {
            return Err("max_records must be > 0".to_string());
        }

        Ok(())
    }
}
