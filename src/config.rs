use std::path::PathBuf;

/// Runtime configuration, read once at startup and carried in the shared
/// state. Every knob has a default, so the service starts with an empty
/// environment.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub mongodb_url: String,
    pub mongodb_db: String,
    pub upload_dir: PathBuf,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            host: std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port: std::env::var("PORT")
                .ok()
                .and_then(|v| v.parse::<u16>().ok())
                .unwrap_or(5000),
            mongodb_url: std::env::var("MONGODB_URL")
                .unwrap_or_else(|_| "mongodb://127.0.0.1:27017".into()),
            mongodb_db: std::env::var("MONGODB_DB").unwrap_or_else(|_| "register".into()),
            upload_dir: std::env::var("UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("profile-pictures")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn clear_env() {
        for key in ["HOST", "PORT", "MONGODB_URL", "MONGODB_DB", "UPLOAD_DIR"] {
            std::env::remove_var(key);
        }
    }

    #[test]
    #[serial]
    fn every_knob_has_a_default() {
        clear_env();
        let config = AppConfig::from_env();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 5000);
        assert_eq!(config.mongodb_url, "mongodb://127.0.0.1:27017");
        assert_eq!(config.mongodb_db, "register");
        assert_eq!(config.upload_dir, PathBuf::from("profile-pictures"));
    }

    #[test]
    #[serial]
    fn environment_overrides_are_honored() {
        clear_env();
        std::env::set_var("PORT", "8081");
        std::env::set_var("MONGODB_DB", "signups");
        std::env::set_var("UPLOAD_DIR", "/tmp/pictures");

        let config = AppConfig::from_env();
        assert_eq!(config.port, 8081);
        assert_eq!(config.mongodb_db, "signups");
        assert_eq!(config.upload_dir, PathBuf::from("/tmp/pictures"));
        clear_env();
    }

    #[test]
    #[serial]
    fn unparseable_port_falls_back_to_the_default() {
        clear_env();
        std::env::set_var("PORT", "not-a-port");
        assert_eq!(AppConfig::from_env().port, 5000);
        clear_env();
    }
}
