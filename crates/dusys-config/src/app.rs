//! Presentation and platform-level settings handed to the host framework.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Language {
    pub flag: String,
    pub name: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub app_name: String,
    pub app_icon: String,
    pub babel_default_locale: String,
    pub languages: BTreeMap<String, Language>,
    /// Headers added to every response unless the handler already set them.
    pub http_headers: BTreeMap<String, String>,
    pub talisman_enabled: bool,
    /// Directory of the file-system results backend for SQL Lab.
    pub results_backend_dir: String,
    pub alert_reports_notification_dry_run: bool,
    pub webdriver_baseurl: String,
    /// Base URL for hyperlinks in report e-mails; falls back to `webdriver_baseurl`.
    pub webdriver_baseurl_user_friendly: Option<String>,
    pub sqllab_ctas_no_limit: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        let mut languages = BTreeMap::new();
        languages.insert(
            "pt_BR".to_string(),
            Language {
                flag: "br".to_string(),
                name: "Brazilian Portuguese".to_string(),
            },
        );

        let mut http_headers = BTreeMap::new();
        http_headers.insert("X-Frame-Options".to_string(), "ALLOWALL".to_string());

        Self {
            app_name: "Dusys - Superset".to_string(),
            app_icon: "https://i.postimg.cc/9FHY1cCW/slym.png".to_string(),
            babel_default_locale: "pt_BR".to_string(),
            languages,
            http_headers,
            talisman_enabled: false,
            results_backend_dir: "/app/superset_home/sqllab".to_string(),
            alert_reports_notification_dry_run: true,
            webdriver_baseurl: "http://superset:8088/".to_string(),
            webdriver_baseurl_user_friendly: None,
            sqllab_ctas_no_limit: true,
        }
    }
}

impl AppConfig {
    pub fn webdriver_baseurl_user_friendly(&self) -> &str {
        self.webdriver_baseurl_user_friendly
            .as_deref()
            .unwrap_or(&self.webdriver_baseurl)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_friendly_url_falls_back() {
        let mut config = AppConfig::default();
        assert_eq!(config.webdriver_baseurl_user_friendly(), "http://superset:8088/");

        config.webdriver_baseurl_user_friendly = Some("https://bi.example.com/".to_string());
        assert_eq!(config.webdriver_baseurl_user_friendly(), "https://bi.example.com/");
    }
}
