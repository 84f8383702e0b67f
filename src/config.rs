use std::path::PathBuf;

/// Application-level constants
pub const APP_NAME: &str = "FARB365";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Environment variable overriding the review profile location
pub const PROFILE_ENV_VAR: &str = "FARB365_PROFILE";

/// Log filter used when `RUST_LOG` is not set
pub fn default_log_filter() -> &'static str {
    "farb365=info,warn"
}

/// Get the application configuration directory
/// (`<platform config dir>/farb365/`), if the platform has one
pub fn app_config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("farb365"))
}

/// Default review profile location inside the configuration directory
pub fn default_profile_path() -> Option<PathBuf> {
    app_config_dir().map(|dir| dir.join("review_profile.json"))
}

/// Review profile path: `FARB365_PROFILE` when set, else the default location
pub fn profile_path() -> Option<PathBuf> {
    std::env::var_os(PROFILE_ENV_VAR)
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
        .or_else(default_profile_path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_path_under_config_dir() {
        if let (Some(profile), Some(dir)) = (default_profile_path(), app_config_dir()) {
            assert!(profile.starts_with(&dir));
            assert!(profile.ends_with("review_profile.json"));
            assert!(dir.ends_with("farb365"));
        }
    }

    #[test]
    fn app_name_is_farb365() {
        assert_eq!(APP_NAME, "FARB365");
    }

    #[test]
    fn app_version_matches_cargo() {
        assert_eq!(APP_VERSION, "0.1.0");
    }

    #[test]
    fn log_filter_targets_this_crate() {
        assert!(default_log_filter().starts_with("farb365="));
    }
}
