use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub mongodb_uri: String,
    pub jwt_secret: String,
    pub admin_name: String,
    pub admin_email: String,
    pub admin_password: String,
}

impl Config {
    /// Reads configuration from the environment. Missing required variables
    /// abort startup; there is deliberately no fallback for `JWT_SECRET`.
    pub fn from_env() -> Self {
        Config {
            mongodb_uri: env::var("MONGODB_URI").expect("MONGODB_URI must be set"),
            jwt_secret: env::var("JWT_SECRET").expect("JWT_SECRET must be set"),
            admin_name: env::var("ADMIN_NAME").unwrap_or_else(|_| "Administrator".to_string()),
            admin_email: env::var("ADMIN_EMAIL").expect("ADMIN_EMAIL must be set"),
            admin_password: env::var("ADMIN_PASSWORD").expect("ADMIN_PASSWORD must be set"),
        }
    }
}
