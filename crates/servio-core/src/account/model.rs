//! Account form models.

use serde::{Deserialize, Serialize};

/// Credentials entered on the sign-in form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

/// Sign-up form for clients (people booking servicemen).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientRegistrationForm {
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub phone_number: String,
    pub password: String,
    pub confirm_password: String,
    pub accept_terms: bool,
}

/// Sign-up form for servicemen; shares the account fields with clients.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerRegistrationForm {
    #[serde(flatten)]
    pub account: ClientRegistrationForm,
    pub category_id: Option<u64>,
    #[serde(default)]
    pub years_of_experience: u32,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub skills: Vec<String>,
}

/// Authenticated session returned by a successful login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthSession {
    pub token: String,
    pub user_id: Option<u64>,
    pub username: Option<String>,
}
