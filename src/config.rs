use config::{Config as ConfigBuilder, ConfigError, Environment, File};
use lunchline_menu::CategoryView;
use lunchline_notification::{EmailConfig, Recipients};
use lunchline_schoolcafe::ApiConfig;
use serde::Deserialize;
use std::env;

pub const DEFAULT_SCHOOL_ID: &str = "2f37947e-6d30-4bb3-a306-7f69a3b3ed62";

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub school: SchoolConfig,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub email: EmailConfig,
    #[serde(default)]
    pub report: ReportConfig,
    #[serde(default)]
    pub observability: ObservabilityConfig,
    #[serde(default)]
    pub test_run: bool,
    /// Problems found while reading legacy variables, logged once tracing is up.
    #[serde(skip)]
    pub warnings: Vec<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SchoolConfig {
    pub id: String,
    pub grade: String,
    pub serving_line: String,
    pub meal_type: String,
    pub prek_grade: String,
    pub prek_serving_line: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ReportConfig {
    #[serde(default)]
    pub view: CategoryView,
    #[serde(default = "default_timezone")]
    pub timezone: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            view: CategoryView::default(),
            timezone: default_timezone(),
        }
    }
}

fn default_timezone() -> String {
    "UTC".to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct ObservabilityConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Unprefixed variables the notifier has always been deployed with.
const LEGACY_ENV: [(&str, &str); 11] = [
    ("SCHOOL_ID", "school.id"),
    ("GRADE", "school.grade"),
    ("SERVING_LINE", "school.serving_line"),
    ("MEAL_TYPE", "school.meal_type"),
    ("PREK_SERVING_LINE", "school.prek_serving_line"),
    ("SMTP_SERVER", "email.smtp_host"),
    ("SENDER_EMAIL", "email.smtp_username"),
    ("SENDER_PASSWORD", "email.smtp_password"),
    ("RECIPIENT_EMAIL", "email.recipient"),
    ("ADDITIONAL_RECIPIENTS", "email.additional_recipients"),
    ("TIMEZONE", "report.timezone"),
];

impl Config {
    /// Load configuration from file and environment variables
    ///
    /// Priority (highest to lowest):
    /// 1. Legacy environment variables (SCHOOL_ID, SENDER_EMAIL, TEST_RUN, etc.)
    /// 2. Prefixed environment variables (LUNCHLINE__EMAIL__SMTP_HOST, etc.)
    /// 3. Config file specified by path
    /// 4. Hardcoded defaults
    pub fn load(config_path: Option<String>) -> Result<Self, ConfigError> {
        Self::load_with(config_path, |key| env::var(key).ok())
    }

    /// Same as [`Config::load`] with legacy variables read through `lookup`.
    pub fn load_with(
        config_path: Option<String>,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let mut builder = ConfigBuilder::builder()
            .set_default("school.id", DEFAULT_SCHOOL_ID)?
            .set_default("school.grade", "01")?
            .set_default("school.serving_line", "Main Line")?
            .set_default("school.meal_type", "Lunch")?
            .set_default("school.prek_grade", "PK")?
            .set_default("school.prek_serving_line", "Main Line")?;

        let config_file_path = config_path
            .or_else(|| lookup("CONFIG_PATH"))
            .unwrap_or_else(|| "config/default.toml".to_string());

        // Optional, ignored if not found
        if std::path::Path::new(&config_file_path).exists() {
            builder = builder.add_source(File::with_name(&config_file_path));
        }

        builder = builder.add_source(
            Environment::with_prefix("LUNCHLINE")
                .separator("__")
                .try_parsing(true),
        );

        let mut warnings = Vec::new();
        let legacy = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_owned())
                .filter(|value| !value.is_empty())
        };

        for (var, key) in LEGACY_ENV {
            if let Some(value) = legacy(var) {
                builder = builder.set_override(key, value)?;
            }
        }

        if let Some(port) = legacy("SMTP_PORT") {
            match port.parse::<u16>() {
                Ok(port) => builder = builder.set_override("email.smtp_port", i64::from(port))?,
                Err(_) => warnings.push(format!("Invalid SMTP_PORT '{port}', ignoring it")),
            }
        }

        if let Some(test_run) = legacy("TEST_RUN") {
            builder = builder.set_override("test_run", test_run.eq_ignore_ascii_case("true"))?;
        }

        let mut config: Self = builder.build()?.try_deserialize()?;
        config.warnings = warnings;

        Ok(config)
    }

    pub fn recipients(&self) -> Recipients {
        Recipients::new(&self.email.recipient, &self.email.additional_recipients)
    }

    /// Validate the settings needed to send email
    pub fn validate(&self) -> Result<(), String> {
        let mut missing = Vec::new();

        if self.email.smtp_username.trim().is_empty() {
            missing.push("SENDER_EMAIL");
        }
        if self.email.smtp_password.trim().is_empty() {
            missing.push("SENDER_PASSWORD");
        }
        if self.recipients().is_empty() {
            missing.push("RECIPIENT_EMAIL (or ADDITIONAL_RECIPIENTS)");
        }

        if !missing.is_empty() {
            return Err(format!(
                "Email configuration incomplete. Missing required settings: {}",
                missing.join(", ")
            ));
        }

        if self.email.smtp_port == 0 {
            return Err("SMTP port must be greater than 0".to_string());
        }

        Ok(())
    }

    /// Logs the effective configuration without secrets.
    pub fn log_summary(&self) {
        for warning in &self.warnings {
            tracing::warn!("{warning}");
        }

        let sender = if self.email.smtp_username.is_empty() {
            "NOT_SET"
        } else {
            "***"
        };

        tracing::info!(
            school = %self.school.id,
            grade = %self.school.grade,
            serving_line = %self.school.serving_line,
            meal_type = %self.school.meal_type,
            prek_serving_line = %self.school.prek_serving_line,
            smtp = %format!("{}:{}", self.email.smtp_host, self.email.smtp_port),
            sender,
            recipients = self.recipients().len(),
            view = ?self.report.view,
            timezone = %self.report.timezone,
            test_run = self.test_run,
            "Configuration loaded"
        );
    }
}
