//! Decode-time configuration.
//!
//! Every decode routine takes a [`DecodeConfig`] explicitly. The process-wide
//! default symbol target is only consulted by [`DecodeConfig::from_global`],
//! which the convenience entry point [`crate::protocol::decode`] uses.

use std::sync::atomic::{AtomicU8, Ordering};

use super::DEFAULT_MAX_DEPTH;

/// What a decoded `S` argument becomes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[repr(u8)]
pub enum SymbolTarget {
    /// `Argument::Symbol`
    #[default]
    Symbol = 0,
    /// `Argument::String`
    String = 1,
}

impl SymbolTarget {
    const fn from_u8(value: u8) -> Self {
        if value == Self::String as u8 {
            Self::String
        } else {
            Self::Symbol
        }
    }
}

/// Handling of type tags this codec does not know.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UnknownTagPolicy {
    /// Fail with `Error::UnknownTypeTag`.
    #[default]
    Reject,
    /// Drop the tag from the argument list, consuming no payload bytes.
    /// Trailing bytes left after the last argument are ignored.
    Skip,
}

/// Options threaded through every decode call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeConfig {
    /// Target type for decoded symbols
    pub symbol_target: SymbolTarget,
    /// Unknown tag handling
    pub unknown_tags: UnknownTagPolicy,
    /// Maximum bundle nesting and array nesting depth
    pub max_depth: usize,
}

impl Default for DecodeConfig {
    fn default() -> Self {
        Self {
            symbol_target: SymbolTarget::default(),
            unknown_tags: UnknownTagPolicy::default(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl DecodeConfig {
    /// Strict defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults, with the symbol target taken from the process-wide setting.
    #[must_use]
    pub fn from_global() -> Self {
        Self {
            symbol_target: default_symbol_target(),
            ..Self::default()
        }
    }

    /// Set the symbol target.
    #[must_use]
    pub const fn with_symbol_target(mut self, target: SymbolTarget) -> Self {
        self.symbol_target = target;
        self
    }

    /// Set the unknown tag policy.
    #[must_use]
    pub const fn with_unknown_tags(mut self, policy: UnknownTagPolicy) -> Self {
        self.unknown_tags = policy;
        self
    }

    /// Set the nesting limit.
    #[must_use]
    pub const fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

static DEFAULT_SYMBOL_TARGET: AtomicU8 = AtomicU8::new(SymbolTarget::Symbol as u8);

/// Set the process-wide symbol target used by [`DecodeConfig::from_global`].
pub fn set_default_symbol_target(target: SymbolTarget) {
    DEFAULT_SYMBOL_TARGET.store(target as u8, Ordering::Relaxed);
}

/// Current process-wide symbol target.
#[must_use]
pub fn default_symbol_target() -> SymbolTarget {
    SymbolTarget::from_u8(DEFAULT_SYMBOL_TARGET.load(Ordering::Relaxed))
}
