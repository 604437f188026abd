//! `Entry` — the two process-wide entry singletons.

use serde::{Deserialize, Serialize};

/// Market-on-open entry direction. Two global singletons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Entry {
    LongOnOpen,
    ShortOnOpen,
}

const LONG_ENTRY_HASH: u64 = 53;
const SHORT_ENTRY_HASH: u64 = 59;

impl Entry {
    pub fn hash_code(self) -> u64 {
        match self {
            Entry::LongOnOpen => LONG_ENTRY_HASH,
            Entry::ShortOnOpen => SHORT_ENTRY_HASH,
        }
    }

    pub fn is_long(self) -> bool {
        matches!(self, Entry::LongOnOpen)
    }
}
