// src/config/consts.rs

// Net config
pub const DEFAULT_LANDING_URL: &str = "https://e-qwerty.zse-zdwola.pl/plan-lekcji-2024-2025/";
pub const DEFAULT_FALLBACK_URL: &str = "https://planlekcji.zse-zdwola.pl/";
pub const DEFAULT_TIMEOUT_SECS: f64 = 20.0;
pub const DEFAULT_RETRIES: u32 = 3;
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (compatible; ZSE-TimetableScraper/2.0; +https://zse-zdwola.pl)";

// Environment overrides
pub const ENV_LANDING_URL: &str = "TIMETABLE_LANDING_URL";
pub const ENV_FALLBACK_URL: &str = "TIMETABLE_FALLBACK_URL";
pub const ENV_TIMEOUT: &str = "SCRAPER_TIMEOUT";
pub const ENV_RETRIES: &str = "SCRAPER_RETRIES";
pub const ENV_USER_AGENT: &str = "SCRAPER_UA";

// Local files
pub const LOG_FILE: &str = ".store/debug.log";

// Export
pub const DEFAULT_OUT_DIR: &str = "out";
pub const DEFAULT_OUT_FILE: &str = "timetable_data.json";

// Page structure
pub const PLAN_IFRAME_ID: &str = "planIframe";
pub const TABLE_SELECTOR: &str = "table.plan";
pub const NAV_SELECTOR: &str = "nav > div";
pub const GROUP_BLOCK_SELECTOR: &str = "div.g";
