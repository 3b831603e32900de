use lazy_static::lazy_static;
use regex::Regex;
use tracing::{info, warn};

use super::dto::{LoginRequest, RegisterRequest};
use super::password::{hash_password, verify_password};
use crate::errors::AppError;
use crate::store::Store;
use crate::users::repo_types::{NewUser, User};

pub const MIN_PASSWORD_LEN: usize = 8;

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex =
            Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email regex compiles");
    }
    EMAIL_RE.is_match(email)
}

fn normalize_email(raw: &str) -> Result<String, AppError> {
    let email = raw.trim().to_lowercase();
    if !is_valid_email(&email) {
        warn!(email = %email, "invalid email");
        return Err(AppError::validation("Invalid email"));
    }
    Ok(email)
}

pub async fn register_user(store: &dyn Store, req: RegisterRequest) -> Result<User, AppError> {
    let email = normalize_email(&req.email)?;

    if req.password.len() < MIN_PASSWORD_LEN {
        warn!("password too short");
        return Err(AppError::validation("Password too short"));
    }

    let password_hash = hash_password(&req.password)?;
    let full_name = req
        .full_name
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty());

    // the unique index decides, so two concurrent sign-ups cannot both win
    let Some(user) = store
        .create_user(&NewUser {
            email: email.clone(),
            password_hash,
            full_name,
        })
        .await?
    else {
        warn!(email = %email, "email already registered");
        return Err(AppError::Conflict("Email already registered".into()));
    };
    info!(user_id = %user.id, email = %user.email, "user registered");
    Ok(user)
}

pub async fn authenticate(store: &dyn Store, req: LoginRequest) -> Result<User, AppError> {
    let email = normalize_email(&req.email)?;
    let invalid = || AppError::Unauthorized("Invalid credentials".into());

    let Some(user) = store.find_user_by_email(&email).await? else {
        warn!(email = %email, "login unknown email");
        return Err(invalid());
    };

    if !verify_password(&req.password, &user.password_hash)? {
        warn!(email = %email, user_id = %user.id, "login invalid password");
        return Err(invalid());
    }

    if !user.is_active {
        warn!(user_id = %user.id, "login on inactive account");
        return Err(invalid());
    }

    info!(user_id = %user.id, "user logged in");
    Ok(user)
}
