use crate::error::AppError;
use bcrypt::{hash, verify};

/// Hashes and verifies passwords with bcrypt.
///
/// The cost factor comes from configuration; every hash embeds its own random salt.
#[derive(Clone)]
pub struct CredentialStore {
    cost: u32,
    // Verified against when the email is unknown, so signin timing does not reveal it.
    dummy_hash: String,
}

impl CredentialStore {
    pub fn new(cost: u32) -> Result<Self, AppError> {
        let dummy_hash = hash("not-a-real-password", cost)?;
        Ok(Self { cost, dummy_hash })
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }

    pub fn hash_password(&self, password: &str) -> Result<String, AppError> {
        hash(password, self.cost)
            .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))
    }

    /// Returns `true` iff `password` matches `hashed_password`. A malformed hash is a mismatch.
    pub fn verify_password(&self, password: &str, hashed_password: &str) -> bool {
        match verify(password, hashed_password) {
            Ok(matches) => matches,
            Err(e) => {
                log::warn!("stored password hash could not be parsed: {}", e);
                false
            }
        }
    }

    /// Hashes on the blocking pool so request workers keep serving.
    pub async fn hash_blocking(&self, password: String) -> Result<String, AppError> {
        let store = self.clone();
        tokio::task::spawn_blocking(move || store.hash_password(&password)).await?
    }

    /// Verifies on the blocking pool. `None` burns the same work against the dummy hash.
    pub async fn verify_blocking(
        &self,
        password: String,
        hashed_password: Option<String>,
    ) -> Result<bool, AppError> {
        let store = self.clone();
        let matched = tokio::task::spawn_blocking(move || match hashed_password {
            Some(hashed) => store.verify_password(&password, &hashed),
            None => {
                store.verify_password(&password, &store.dummy_hash);
                false
            }
        })
        .await?;
        Ok(matched)
    }
}
