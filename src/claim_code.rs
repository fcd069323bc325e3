//! Customer-facing claim codes.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const CLAIM_CODE_LEN: usize = 8;

/// An 8-character uppercase token handed to the customer for pickup.
///
/// Codes are cut from a random v4 UUID and are not checked against codes
/// already issued.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClaimCode(String);

impl ClaimCode {
    pub fn generate() -> Self {
        let mut code = Uuid::new_v4().simple().to_string();
        code.truncate(CLAIM_CODE_LEN);
        code.make_ascii_uppercase();
        Self(code)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for ClaimCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
