//! Server configuration.

/// Server configuration.
pub struct Config {
    /// HTTP server bind address.
    pub bind_addr: String,

    /// Display name for the seeded admin account.
    pub admin_name: String,

    /// Email for the seeded admin account.
    pub admin_email: String,

    /// Password for the seeded admin account.
    pub admin_password: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:5000".to_string(),
            admin_name: "Admin".to_string(),
            admin_email: "admin@taskdist.local".to_string(),
            admin_password: "change-me".to_string(),
        }
    }
}

impl Config {
    /// Load configuration, letting environment variables override defaults.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(addr) = std::env::var("TASKDIST_BIND_ADDR") {
            config.bind_addr = addr;
        }
        if let Ok(name) = std::env::var("TASKDIST_ADMIN_NAME") {
            config.admin_name = name;
        }
        if let Ok(email) = std::env::var("TASKDIST_ADMIN_EMAIL") {
            config.admin_email = email;
        }
        if let Ok(password) = std::env::var("TASKDIST_ADMIN_PASSWORD") {
            config.admin_password = password;
        }
        config
    }
}
