use crate::core::errors::TodoError;

/// bcrypt with a configurable work factor; tests run at the minimum cost of 4.
#[derive(Clone, Copy, Debug)]
pub struct PasswordHasher {
    cost: u32,
}

impl PasswordHasher {
    pub fn new(cost: u32) -> Self {
        PasswordHasher { cost }
    }

    pub fn hash(&self, password: &str) -> Result<String, TodoError> {
        bcrypt::hash(password, self.cost)
            .map_err(|e| TodoError::InternalServerError(format!("Password hashing error: {}", e)))
    }

    pub fn verify(&self, password: &str, hashed: &str) -> Result<bool, TodoError> {
        bcrypt::verify(password, hashed)
            .map_err(|e| TodoError::InternalServerError(format!("Password verification error: {}", e)))
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        PasswordHasher::new(bcrypt::DEFAULT_COST)
    }
}
