mod jwt;
mod password;
mod repository;
mod root;
mod subscription;

pub use jwt::{Claims, generate_jwt, validate_jwt};
pub use password::{hash_password, verify_password};
pub use repository::{FindType, UserRow};
pub use root::{Command, LoginInput, RegisterInput, SetPasswordInput};
pub use subscription::Command as SubscriptionCommand;

use serde::Serialize;
use strum::{AsRefStr, Display, EnumString};

#[derive(EnumString, Display, AsRefStr, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Role {
    #[default]
    User,
    Admin,
    Blocked,
}

impl Role {
    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }

    pub fn is_blocked(&self) -> bool {
        matches!(self, Role::Blocked)
    }
}

/// Public user shape returned by the API. Never carries the password hash.
#[derive(Debug, Clone, Serialize)]
pub struct Profile {
    pub id: String,
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub is_subscribed: bool,
}
