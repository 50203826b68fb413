//! Scan configuration
//!
//! Which organizations to walk, which label to look for and how far back
//! a cycle looks. Every field has a default, so a partial
//! `.issue-relay.toml` only overrides what it names.

use serde::{Deserialize, Serialize};

use crate::MAX_PER_PAGE;

/// Settings for one scan-and-notify cycle
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ScanConfig {
    /// Organizations to scan, in order
    #[serde(default = "default_organizations")]
    pub organizations: Vec<String>,

    /// Issue label to filter on
    #[serde(default = "default_label")]
    pub label: String,

    /// Length of the trailing window in minutes
    #[serde(default = "default_window_minutes")]
    pub window_minutes: u32,

    /// Repository page size, `1..=MAX_PER_PAGE`
    #[serde(default = "default_per_page")]
    pub per_page: u8,

    /// First line of the notification message
    #[serde(default = "default_alert_header")]
    pub alert_header: String,
}

fn default_organizations() -> Vec<String> {
    vec![
        "kubernetes".to_string(),
        "kubernetes-sigs".to_string(),
        "etcd-io".to_string(),
    ]
}

fn default_label() -> String {
    "help wanted".to_string()
}

fn default_window_minutes() -> u32 {
    30
}

fn default_per_page() -> u8 {
    MAX_PER_PAGE
}

fn default_alert_header() -> String {
    ":alert-3319: Identified good first issues!".to_string()
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            organizations: default_organizations(),
            label: default_label(),
            window_minutes: default_window_minutes(),
            per_page: default_per_page(),
            alert_header: default_alert_header(),
        }
    }
}

impl ScanConfig {
    /// Load config from CWD first, then home directory, or use defaults
    pub fn load() -> Self {
        if let Some(content) = crate::load_config_file() {
            match toml::from_str(&content) {
                Ok(config) => {
                    log::info!("Loaded scan config from file");
                    return Self::normalized(config);
                }
                Err(e) => {
                    log::warn!("Failed to parse config file: {}", e);
                }
            }
        }

        log::debug!("Using default scan config");
        Self::default()
    }

    /// Bring out-of-range values back to something GitHub honours
    ///
    /// GitHub silently replaces `per_page=0` with its default and caps
    /// anything above `MAX_PER_PAGE`, so both are made explicit here.
    pub fn normalized(mut self) -> Self {
        if self.per_page == 0 {
            log::warn!(
                "per_page = 0 is invalid, using {} instead",
                default_per_page()
            );
            self.per_page = default_per_page();
        } else if self.per_page > MAX_PER_PAGE {
            log::warn!(
                "per_page = {} exceeds GitHub's limit, clamping to {}",
                self.per_page,
                MAX_PER_PAGE
            );
            self.per_page = MAX_PER_PAGE;
        }
        self
    }

    /// The trailing window as a duration
    pub fn window(&self) -> chrono::Duration {
        chrono::Duration::minutes(i64::from(self.window_minutes))
    }
}
