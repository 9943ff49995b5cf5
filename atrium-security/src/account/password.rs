//! Argon2id password hashing.

use crate::error::{Result, SecurityError};
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};
use rand_core::OsRng;
use serde::{Deserialize, Serialize};

/// Argon2id cost parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PasswordHasherConfig {
    /// Memory cost in KiB.
    #[serde(default = "default_memory_cost")]
    pub memory_cost: u32,
    /// Number of iterations.
    #[serde(default = "default_time_cost")]
    pub time_cost: u32,
    /// Degree of parallelism.
    #[serde(default = "default_parallelism")]
    pub parallelism: u32,
}

fn default_memory_cost() -> u32 {
    19_456
}

fn default_time_cost() -> u32 {
    2
}

fn default_parallelism() -> u32 {
    1
}

impl Default for PasswordHasherConfig {
    fn default() -> Self {
        Self {
            memory_cost: default_memory_cost(),
            time_cost: default_time_cost(),
            parallelism: default_parallelism(),
        }
    }
}

impl PasswordHasherConfig {
    /// Cheap parameters for tests and local bootstrap.
    #[must_use]
    pub const fn fast() -> Self {
        Self {
            memory_cost: 256,
            time_cost: 1,
            parallelism: 1,
        }
    }

    fn argon2(&self) -> Result<Argon2<'static>> {
        let params = Params::new(self.memory_cost, self.time_cost, self.parallelism, None)
            .map_err(|e| SecurityError::password_hash(format!("Invalid Argon2 params: {e}")))?;
        Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
    }
}

/// Hashes a password into a PHC string.
pub fn hash_password(password: &str, config: &PasswordHasherConfig) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = config
        .argon2()?
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| SecurityError::password_hash(e.to_string()))?;
    Ok(hash.to_string())
}

/// Verifies a password against a PHC string.
///
/// The parameters embedded in the hash are used, so hashes created with
/// older settings keep verifying.
pub fn verify_password(password: &str, phc: &str) -> Result<bool> {
    let parsed = PasswordHash::new(phc).map_err(|e| SecurityError::password_hash(e.to_string()))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}
