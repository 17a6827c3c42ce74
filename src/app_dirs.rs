use directories::ProjectDirs;
use std::path::PathBuf;

const APP_NAME: &str = "typelab";

/// Centralized application directory resolution
pub struct AppDirs;

impl AppDirs {
    fn project() -> Option<ProjectDirs> {
        ProjectDirs::from("", "", APP_NAME)
    }

    pub fn config_path() -> PathBuf {
        match Self::project() {
            Some(pd) => pd.config_dir().join("config.json"),
            None => PathBuf::from("typelab_config.json"),
        }
    }

    pub fn history_path() -> Option<PathBuf> {
        if let Ok(home) = std::env::var("HOME") {
            let state_dir = PathBuf::from(home)
                .join(".local")
                .join("state")
                .join(APP_NAME);
            Some(state_dir.join("history.csv"))
        } else {
            Self::project().map(|pd| pd.data_local_dir().join("history.csv"))
        }
    }
}
