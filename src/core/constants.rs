/// Tokens are valid for a fixed window after issuance.
pub const TOKEN_TTL_HOURS: i64 = 24;

/// Maximum number of todos a `COMMON` user may hold at once.
pub const COMMON_TODO_LIMIT: usize = 5;

pub const PASSWORD_MIN_LENGTH: usize = 8;
pub const PASSWORD_MAX_LENGTH: usize = 20;
pub const USER_NAME_MIN_LENGTH: usize = 2;
pub const USER_NAME_MAX_LENGTH: usize = 8;
pub const EMAIL_MAX_LENGTH: usize = 254;
pub const TITLE_MAX_LENGTH: usize = 50;

/// HS512 wants a key at least as long as its output.
pub const RECOMMENDED_SECRET_BYTES: usize = 64;
