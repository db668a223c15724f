//! Identity token claims

use serde::{Deserialize, Serialize};

/// Claims carried by the identity provider's token
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Claims {
    pub sub: String,
    pub exp: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}
