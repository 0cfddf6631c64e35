use std::fmt;
use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Length of a handle in hex characters (128 random bits).
pub const HANDLE_LEN: usize = 32;

/// Opaque reference to a stored heatmap.
///
/// Carries no storage location; stores map it to wherever the bytes live.
/// Only lowercase hex strings of `HANDLE_LEN` characters parse, which keeps
/// handles safe to embed in URLs and file names.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct HeatmapHandle(String);

impl HeatmapHandle {
    /// Fresh handle from the thread-local RNG.
    pub fn generate() -> HeatmapHandle {
        let bits: u128 = rand::thread_rng().gen();
        HeatmapHandle(format!("{:032x}", bits))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("malformed heatmap handle {0:?}")]
pub struct InvalidHandle(pub String);

impl FromStr for HeatmapHandle {
    type Err = InvalidHandle;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let well_formed = s.len() == HANDLE_LEN
            && s.bytes().all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b));
        if well_formed {
            Ok(HeatmapHandle(s.to_owned()))
        } else {
            Err(InvalidHandle(s.to_owned()))
        }
    }
}

impl TryFrom<String> for HeatmapHandle {
    type Error = InvalidHandle;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<HeatmapHandle> for String {
    fn from(h: HeatmapHandle) -> String {
        h.0
    }
}

impl fmt::Display for HeatmapHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
