//! User defaults that pre-fill the generation form.

use serde::{Deserialize, Serialize};

/// Saved defaults. Consulted only when building a generate request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    pub default_interface: String,
    pub default_author: String,
    pub default_deps: String,
}
