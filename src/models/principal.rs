// src/models/principal.rs

use serde::{Deserialize, Serialize};

/// An authenticated caller. `email` is the stable identity used for ownership.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub principal_id: String,
    pub email: String,
    /// Human readable name from the identity token, if any.
    #[serde(default)]
    pub display_name: Option<String>,
}

impl Principal {
    pub fn is(&self, email: &str) -> bool {
        self.email == email
    }
}
