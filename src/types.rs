use crate::error::{Result, TrellisError};
use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Oid(pub [u8; 20]);

impl Oid {
    pub fn from_bytes(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    /// Parses a 40-character lowercase/uppercase hex digest.
    pub fn from_hex(sha: &str) -> Result<Self> {
        if sha.len() != 40 {
            return Err(TrellisError::Provider(format!(
                "invalid SHA length {}: expected 40",
                sha.len()
            )));
        }
        let mut bytes = [0u8; 20];
        for (i, chunk) in sha.as_bytes().chunks(2).take(20).enumerate() {
            let s = std::str::from_utf8(chunk)
                .map_err(|e| TrellisError::Provider(format!("invalid SHA UTF-8: {e}")))?;
            bytes[i] = u8::from_str_radix(s, 16)
                .map_err(|e| TrellisError::Provider(format!("invalid SHA hex: {e}")))?;
        }
        Ok(Self(bytes))
    }

    pub fn short(&self) -> String {
        self.0[..4].iter().map(|b| format!("{b:02x}")).collect()
    }
}

impl fmt::Display for Oid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for b in &self.0 {
            write!(f, "{b:02x}")?;
        }
        Ok(())
    }
}

impl Serialize for Oid {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

/// One commit as the remote provider reports it.
#[derive(Clone, Debug)]
pub struct CommitRecord {
    pub id: Oid,
    pub parents: Vec<Oid>,
    pub message: String,
    pub author: String,
    pub date: Option<DateTime<Utc>>,
}

#[derive(Clone, Debug)]
pub struct BranchRef {
    pub name: String,
}
