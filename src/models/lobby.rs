use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserAccount {
    pub id: String,
    pub email: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// The signed-in account together with the token that restores it.
#[derive(Clone, Debug, PartialEq)]
pub struct AuthSession {
    pub user: UserAccount,
    pub token: String,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Registration {
    Created(AuthSession),
    EmailTaken,
}
