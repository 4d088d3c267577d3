use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::id::PhotoId;

/// An event photo. Only gallery metadata is stored; the image bytes live
/// in an external blob store behind `url`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Photo {
    #[serde(default)]
    pub id: PhotoId,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    #[serde(default)]
    pub uploaded_at: DateTime<Utc>,
}
