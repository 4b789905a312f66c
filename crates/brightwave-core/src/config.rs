use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variables that override the `[email]` identifiers
pub const ENV_EMAIL_SERVICE_ID: &str = "BRIGHTWAVE_EMAIL_SERVICE_ID";
pub const ENV_EMAIL_TEMPLATE_ID: &str = "BRIGHTWAVE_EMAIL_TEMPLATE_ID";
pub const ENV_EMAIL_PUBLIC_KEY: &str = "BRIGHTWAVE_EMAIL_PUBLIC_KEY";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub email: EmailConfig,
    #[serde(default)]
    pub form: FormConfig,
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub motion: MotionConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Data directory path (log files live here)
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Log level used when RUST_LOG is not set
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            log_level: default_log_level(),
        }
    }
}

/// Third-party email delivery settings.
///
/// The three identifiers are the only externally supplied configuration of the
/// site. They are optional here on purpose: a missing value surfaces as a
/// failed submission, see [`EmailConfig::credentials`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailConfig {
    /// Send endpoint of the email delivery API
    #[serde(default = "default_email_endpoint")]
    pub endpoint: String,
    #[serde(default)]
    pub service_id: Option<String>,
    #[serde(default)]
    pub template_id: Option<String>,
    /// Public API key of the account
    #[serde(default)]
    pub public_key: Option<String>,
    /// Request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            endpoint: default_email_endpoint(),
            service_id: None,
            template_id: None,
            public_key: None,
            request_timeout_secs: default_request_timeout(),
        }
    }
}

/// Fully resolved identifiers for one delivery request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailCredentials {
    pub service_id: String,
    pub template_id: String,
    pub public_key: String,
}

impl EmailConfig {
    /// Resolve the identifiers, reporting every missing one by name
    pub fn credentials(&self) -> crate::Result<EmailCredentials> {
        fn present(value: &Option<String>) -> Option<&str> {
            value.as_deref().map(str::trim).filter(|v| !v.is_empty())
        }

        let service_id = present(&self.service_id);
        let template_id = present(&self.template_id);
        let public_key = present(&self.public_key);

        match (service_id, template_id, public_key) {
            (Some(service_id), Some(template_id), Some(public_key)) => Ok(EmailCredentials {
                service_id: service_id.to_string(),
                template_id: template_id.to_string(),
                public_key: public_key.to_string(),
            }),
            _ => {
                let missing: Vec<&str> = [
                    ("service_id", service_id.is_none()),
                    ("template_id", template_id.is_none()),
                    ("public_key", public_key.is_none()),
                ]
                .into_iter()
                .filter_map(|(name, missing)| missing.then_some(name))
                .collect();
                Err(crate::Error::Config(format!(
                    "email delivery is not configured: missing {}",
                    missing.join(", ")
                )))
            }
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormConfig {
    /// How long a delivery error banner stays visible
    #[serde(default = "default_error_dismiss_ms")]
    pub error_dismiss_ms: u64,
    /// Delay between a confirmed submission and the form closing
    #[serde(default = "default_close_delay_ms")]
    pub close_delay_ms: u64,
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            error_dismiss_ms: default_error_dismiss_ms(),
            close_delay_ms: default_close_delay_ms(),
        }
    }
}

impl FormConfig {
    pub fn error_dismiss(&self) -> Duration {
        Duration::from_millis(self.error_dismiss_ms)
    }

    pub fn close_delay(&self) -> Duration {
        Duration::from_millis(self.close_delay_ms)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Tick rate in milliseconds when nothing is animating
    #[serde(default = "default_tick_rate")]
    pub tick_rate_ms: u64,
    /// Page palette
    #[serde(default)]
    pub palette: PaletteConfig,
    /// Smooth scrolling configuration
    #[serde(default)]
    pub scroll: ScrollConfig,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            tick_rate_ms: default_tick_rate(),
            palette: PaletteConfig::default(),
            scroll: ScrollConfig::default(),
        }
    }
}

/// Base page colours as hex strings ("#RRGGBB", "RRGGBB", "#RGB")
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaletteConfig {
    #[serde(default = "default_background")]
    pub background: String,
    #[serde(default = "default_foreground")]
    pub foreground: String,
    #[serde(default = "default_accent")]
    pub accent: String,
    /// Palette pushed while an inverted ("dark") section is in view
    #[serde(default = "default_inverted_background")]
    pub inverted_background: String,
    #[serde(default = "default_inverted_foreground")]
    pub inverted_foreground: String,
}

impl Default for PaletteConfig {
    fn default() -> Self {
        Self {
            background: default_background(),
            foreground: default_foreground(),
            accent: default_accent(),
            inverted_background: default_inverted_background(),
            inverted_foreground: default_inverted_foreground(),
        }
    }
}

/// Easing curve used by the motion engine.
///
/// Every variant maps [0, 1] onto [0, 1] with `f(0) = 0` and `f(1) = 1`
/// (except `None`, which jumps at the end). `BackOut` overshoots past 1
/// before settling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EasingType {
    None,
    Linear,
    QuadOut,
    #[default]
    Cubic,
    Quintic,
    EaseOut,
    CubicInOut,
    SineInOut,
    BackOut,
}

/// Smooth page scrolling
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrollConfig {
    #[serde(default = "default_true")]
    pub smooth_enabled: bool,
    #[serde(default = "default_scroll_duration")]
    pub animation_duration_ms: u64,
    #[serde(default)]
    pub easing: EasingType,
    /// Rows per scroll step when smooth scrolling is off
    #[serde(default = "default_scroll_lines")]
    pub scroll_lines: u16,
    #[serde(default = "default_animation_fps")]
    pub animation_fps: u32,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            smooth_enabled: default_true(),
            animation_duration_ms: default_scroll_duration(),
            easing: EasingType::default(),
            scroll_lines: default_scroll_lines(),
            animation_fps: default_animation_fps(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MotionConfig {
    /// Render every animation at its end state
    #[serde(default)]
    pub reduced_motion: bool,
    /// Quiet period before a resize triggers re-measurement
    #[serde(default = "default_resize_debounce")]
    pub resize_debounce_ms: u64,
    /// Retry delay when a looping track measures zero span
    #[serde(default = "default_measure_retry")]
    pub measure_retry_ms: u64,
    /// Marquee speed in cells per second
    #[serde(default = "default_marquee_speed")]
    pub marquee_speed: f64,
    #[serde(default)]
    pub rings: RingsConfig,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            reduced_motion: false,
            resize_debounce_ms: default_resize_debounce(),
            measure_retry_ms: default_measure_retry(),
            marquee_speed: default_marquee_speed(),
            rings: RingsConfig::default(),
        }
    }
}

impl MotionConfig {
    pub fn resize_debounce(&self) -> Duration {
        Duration::from_millis(self.resize_debounce_ms)
    }

    pub fn measure_retry(&self) -> Duration {
        Duration::from_millis(self.measure_retry_ms)
    }
}

/// Scroll-velocity speed boost of the rotating rings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RingsConfig {
    /// Multiplier gained per unit of scroll velocity (rows/second)
    #[serde(default = "default_ring_gain")]
    pub gain: f64,
    /// Upper bound of the speed multiplier
    #[serde(default = "default_ring_max_multiplier")]
    pub max_multiplier: f64,
    /// How the multiplier returns to 1x
    #[serde(default)]
    pub decay: DecayCurve,
}

impl Default for RingsConfig {
    fn default() -> Self {
        Self {
            gain: default_ring_gain(),
            max_multiplier: default_ring_max_multiplier(),
            decay: DecayCurve::default(),
        }
    }
}

/// Decay of a boosted multiplier back towards 1x
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DecayCurve {
    /// Excess over 1x halves every `half_life_ms`
    Exponential { half_life_ms: u64 },
    /// Excess over 1x drops by `per_second` each second
    Linear { per_second: f64 },
}

impl Default for DecayCurve {
    fn default() -> Self {
        DecayCurve::Exponential { half_life_ms: 350 }
    }
}

fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("brightwave")
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_email_endpoint() -> String {
    "https://api.emailjs.com/api/v1.0/email/send".to_string()
}

fn default_request_timeout() -> u64 {
    15
}

fn default_error_dismiss_ms() -> u64 {
    5000
}

fn default_close_delay_ms() -> u64 {
    2000
}

fn default_tick_rate() -> u64 {
    100
}

fn default_background() -> String {
    "#f5f1ea".to_string()
}

fn default_foreground() -> String {
    "#1c1b1a".to_string()
}

fn default_accent() -> String {
    "#ff5a1f".to_string()
}

fn default_inverted_background() -> String {
    "#111111".to_string()
}

fn default_inverted_foreground() -> String {
    "#f5f1ea".to_string()
}

fn default_true() -> bool {
    true
}

fn default_scroll_duration() -> u64 {
    180
}

fn default_scroll_lines() -> u16 {
    3
}

fn default_animation_fps() -> u32 {
    60
}

fn default_resize_debounce() -> u64 {
    150
}

fn default_measure_retry() -> u64 {
    100
}

fn default_marquee_speed() -> f64 {
    12.0
}

fn default_ring_gain() -> f64 {
    0.02
}

fn default_ring_max_multiplier() -> f64 {
    4.0
}

/// Expand tilde (~) in path to user's home directory
fn expand_tilde(path: &Path) -> PathBuf {
    if let Some(path_str) = path.to_str() {
        if let Some(stripped) = path_str.strip_prefix("~/") {
            if let Some(home) = dirs::home_dir() {
                return home.join(stripped);
            }
        } else if path_str == "~" {
            if let Some(home) = dirs::home_dir() {
                return home;
            }
        }
    }
    path.to_path_buf()
}

impl AppConfig {
    /// Load configuration from the default path (or defaults) and apply
    /// environment overrides
    pub fn load() -> crate::Result<Self> {
        let mut config = Self::load_from(&Self::config_path())?;
        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Load configuration from a specific file, falling back to defaults when
    /// the file does not exist
    pub fn load_from(path: &Path) -> crate::Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config = toml::from_str(&content)
                .map_err(|e| crate::Error::Config(e.to_string()))?;
            tracing::debug!(path = %path.display(), "Loaded configuration");
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Apply email identifier overrides from a key lookup (the process
    /// environment in production)
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let overrides = [
            (ENV_EMAIL_SERVICE_ID, &mut self.email.service_id),
            (ENV_EMAIL_TEMPLATE_ID, &mut self.email.template_id),
            (ENV_EMAIL_PUBLIC_KEY, &mut self.email.public_key),
        ];
        for (key, slot) in overrides {
            if let Some(value) = lookup(key).filter(|v| !v.trim().is_empty()) {
                *slot = Some(value);
            }
        }
    }

    /// Save configuration to file
    pub fn save(&self) -> crate::Result<()> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &Path) -> crate::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| crate::Error::Config(e.to_string()))?;
        std::fs::write(path, content)?;

        Ok(())
    }

    /// Get the configuration file path
    /// Always uses ~/.config/brightwave/config.toml on all platforms
    pub fn config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
            .join("brightwave")
            .join("config.toml")
    }

    /// Get the data directory (with tilde expansion)
    pub fn data_dir(&self) -> PathBuf {
        expand_tilde(&self.general.data_dir)
    }

    /// Log file used while the interactive terminal owns stdout
    pub fn log_path(&self) -> PathBuf {
        self.data_dir().join("brightwave.log")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load_from(&dir.path().join("nope.toml")).unwrap();
        assert_eq!(config.form.close_delay_ms, 2000);
        assert_eq!(config.form.error_dismiss_ms, 5000);
        assert_eq!(config.motion.resize_debounce_ms, 150);
        assert!(config.email.service_id.is_none());
    }

    #[test]
    fn test_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
[email]
service_id = "service_abc"

[motion.rings]
gain = 0.5
decay = { kind = "linear", per_second = 2.0 }

[ui.scroll]
easing = "back_out"
"#,
        )
        .unwrap();

        let config = AppConfig::load_from(&path).unwrap();
        assert_eq!(config.email.service_id.as_deref(), Some("service_abc"));
        assert_eq!(config.motion.rings.gain, 0.5);
        assert_eq!(config.motion.rings.decay, DecayCurve::Linear { per_second: 2.0 });
        assert_eq!(config.ui.scroll.easing, EasingType::BackOut);
        assert_eq!(config.motion.rings.max_multiplier, 4.0);
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[email\nservice_id = 1").unwrap();
        assert!(matches!(
            AppConfig::load_from(&path),
            Err(crate::Error::Config(_))
        ));
    }

    #[test]
    fn test_save_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let mut config = AppConfig::default();
        config.email.template_id = Some("template_x".into());
        config.save_to(&path).unwrap();

        let loaded = AppConfig::load_from(&path).unwrap();
        assert_eq!(loaded.email.template_id.as_deref(), Some("template_x"));
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            (ENV_EMAIL_SERVICE_ID, "svc"),
            (ENV_EMAIL_TEMPLATE_ID, "tpl"),
            (ENV_EMAIL_PUBLIC_KEY, "  "),
        ]
        .into_iter()
        .collect();

        let mut config = AppConfig::default();
        config.email.public_key = Some("from-file".into());
        config.apply_overrides(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.email.service_id.as_deref(), Some("svc"));
        assert_eq!(config.email.template_id.as_deref(), Some("tpl"));
        // Blank environment values do not clobber the file
        assert_eq!(config.email.public_key.as_deref(), Some("from-file"));
    }

    #[test]
    fn test_credentials_report_missing_fields() {
        let mut email = EmailConfig::default();
        email.template_id = Some("tpl".into());

        let err = email.credentials().unwrap_err().to_string();
        assert!(err.contains("service_id"));
        assert!(err.contains("public_key"));
        assert!(!err.contains("template_id"));

        email.service_id = Some("svc".into());
        email.public_key = Some("key".into());
        let creds = email.credentials().unwrap();
        assert_eq!(creds.public_key, "key");
    }
}
