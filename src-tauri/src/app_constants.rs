use std::time::Duration;

pub(crate) const APP_DIR_NAME: &str = "ResumeOptimizer";
pub(crate) const SETTINGS_FILE_NAME: &str = "config.env";
pub(crate) const API_KEY_SETTING: &str = "GEMINI_API_KEY";

pub(crate) const CONFIG_DIR_ENV: &str = "RESUME_OPTIMIZER_CONFIG_DIR";
pub(crate) const BACKEND_PATH_ENV: &str = "RESUME_OPTIMIZER_BACKEND_PATH";
pub(crate) const BACKEND_CMD_ENV: &str = "RESUME_OPTIMIZER_BACKEND_CMD";
pub(crate) const BACKEND_URL_ENV: &str = "RESUME_OPTIMIZER_BACKEND_URL";
pub(crate) const BACKEND_TIMEOUT_ENV: &str = "RESUME_OPTIMIZER_BACKEND_TIMEOUT_MS";

pub(crate) const DEFAULT_BACKEND_URL: &str = "http://127.0.0.1:8001/";
pub(crate) const DEFAULT_BACKEND_READY_TIMEOUT_MS: u64 = 120_000;
pub(crate) const BACKEND_READY_POLL_INTERVAL: Duration = Duration::from_millis(300);
pub(crate) const BACKEND_PING_TIMEOUT: Duration = Duration::from_millis(800);
pub(crate) const BACKEND_WATCH_INTERVAL: Duration = Duration::from_millis(200);
pub(crate) const GRACEFUL_STOP_TIMEOUT: Duration = Duration::from_secs(5);
pub(crate) const BACKEND_READY_EVENT: &str = "backend://ready";

pub(crate) const DESKTOP_LOG_FILE: &str = "desktop.log";
pub(crate) const DESKTOP_LOG_MAX_BYTES: u64 = 5 * 1024 * 1024;
pub(crate) const LOG_BACKUP_COUNT: usize = 5;

pub(crate) const MAIN_WINDOW_LABEL: &str = "main";
pub(crate) const MAIN_WINDOW_TITLE: &str = "Resume Optimizer";
pub(crate) const API_KEY_WINDOW_LABEL: &str = "api-key";
pub(crate) const API_KEY_WINDOW_TITLE: &str = "Resume Optimizer - API Key";

pub(crate) const GITHUB_REPOSITORY_URL: &str = "https://github.com/aklamkin/resume_optmzr.1.2";
pub(crate) const DOCUMENTATION_URL: &str =
    "https://github.com/aklamkin/resume_optmzr.1.2/blob/main/README.md";
pub(crate) const REPORT_ISSUE_URL: &str = "https://github.com/aklamkin/resume_optmzr.1.2/issues";
pub(crate) const GEMINI_API_KEY_URL: &str = "https://aistudio.google.com/";
