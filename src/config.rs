//! Decode limits.
//!
//! XDR carries attacker-controlled lengths and counts, so callers that decode
//! untrusted input bound both the nesting depth and the largest single
//! length/count a decode will accept. [`Limits`] is `Deserialize` so a host can
//! load it from its own configuration file.

use serde::{Deserialize, Serialize};

/// Bounds enforced by a [`ByteCursor`](crate::ByteCursor) during one decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Limits {
    /// Maximum nesting of optional values, arrays and unions.
    pub depth: u32,
    /// Maximum variable-length opaque/string length or array count.
    pub len: u32,
}

impl Limits {
    /// No bounds beyond the size of the input itself.
    pub const fn none() -> Self {
        Limits {
            depth: u32::MAX,
            len: u32::MAX,
        }
    }

    pub const fn new(depth: u32, len: u32) -> Self {
        Limits { depth, len }
    }

    pub const fn depth(depth: u32) -> Self {
        Limits {
            depth,
            len: u32::MAX,
        }
    }

    pub const fn len(len: u32) -> Self {
        Limits {
            depth: u32::MAX,
            len,
        }
    }
}

impl Default for Limits {
    fn default() -> Self {
        Limits::none()
    }
}
