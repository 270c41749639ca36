//! Blog user model
//!
//! Users are read-only from the data-access layer's perspective; they are
//! only joined in to supply author display names.

use serde::{Deserialize, Serialize};

/// A registered blog author.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlogUser {
    /// Unique identifier
    pub id: i64,
    /// Display name
    pub name: String,
}
