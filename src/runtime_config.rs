//! # Runtime Configuration
//!
//! Coroutine runtime tuning read from the environment at startup.
//!
//! ### `ACCOUNT_BOOK_STACK_SIZE`
//!
//! Stack size for every coroutine (connections and handlers). Accepts
//! decimal (`32768`) or hex (`0x8000`). Unparseable values fall back to the
//! default of `0x8000` (32 KB); SQLite calls run on handler stacks, so this
//! is larger than the bare minimum.
//!
//! ```rust
//! use account_book::runtime_config::RuntimeConfig;
//!
//! let config = RuntimeConfig::from_env();
//! assert!(config.stack_size > 0);
//! ```

use std::env;

pub const STACK_SIZE_ENV: &str = "ACCOUNT_BOOK_STACK_SIZE";
pub const DEFAULT_STACK_SIZE: usize = 0x8000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// Coroutine stack size in bytes
    pub stack_size: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            stack_size: DEFAULT_STACK_SIZE,
        }
    }
}

impl RuntimeConfig {
    /// Load configuration from environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        let stack_size = env::var(STACK_SIZE_ENV)
            .ok()
            .and_then(|v| parse_stack_size(&v))
            .unwrap_or(DEFAULT_STACK_SIZE);
        Self { stack_size }
    }

    /// Push the settings into the global `may` runtime. Call before the
    /// first coroutine is spawned.
    pub fn apply(&self) {
        may::config().set_stack_size(self.stack_size);
    }
}

/// Parse a decimal or `0x`-prefixed hex byte count. Zero is rejected.
#[must_use]
pub fn parse_stack_size(value: &str) -> Option<usize> {
    let value = value.trim();
    let parsed = match value.strip_prefix("0x").or_else(|| value.strip_prefix("0X")) {
        Some(hex) => usize::from_str_radix(hex, 16).ok(),
        None => value.parse().ok(),
    };
    parsed.filter(|n| *n > 0)
}
