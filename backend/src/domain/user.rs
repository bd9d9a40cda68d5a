//! Registered user profile as exposed to other users.

use serde::{Deserialize, Serialize};

use super::UserId;

/// Public profile of a user.
///
/// Users are provisioned outside this service; the backend only reads them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Primary key.
    pub id: UserId,
    /// Contact address, unique per user.
    pub email: String,
    /// Login handle, unique per user.
    pub username: String,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
}
