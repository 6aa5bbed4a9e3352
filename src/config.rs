use ratatui::style::{Color, Modifier};
use serde::Deserialize;
use std::fs;
use std::path::PathBuf;
use xdg::BaseDirectories;

use crate::formatting::BoxChars;
use crate::report::layout::PageCapacity;
use crate::table::PageSize;
use crate::types::ReportKind;

/// Modifier applied to the focused row / selected element
pub const SELECTION_STYLE_MODIFIER: Modifier = Modifier::REVERSED.union(Modifier::BOLD);

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct Config {
    pub log_level: String,
    pub log_file: String,
    pub api: ApiConfig,
    pub tables: TablesConfig,
    pub print: PrintConfig,
    pub display: DisplayConfig,
}

/// Backend location
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

/// List view behaviour
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct TablesConfig {
    /// Report kinds whose lists are paginated by the server; the rest are
    /// fetched whole and paginated locally
    pub server_paged: Vec<ReportKind>,
    pub page_size: usize,
    pub search_debounce_ms: u64,
    pub min_loading_ms: u64,
}

/// Print layout of report documents
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct PrintConfig {
    pub first_page_rows: usize,
    pub page_rows: usize,
    /// Usable page width in points (A4 minus margins)
    pub page_width_pt: f32,
    pub stamp_width_pt: f32,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct DisplayConfig {
    pub use_unicode: bool,
    #[serde(deserialize_with = "deserialize_color")]
    pub selection_fg: Color,
    #[serde(deserialize_with = "deserialize_color_optional")]
    pub unfocused_selection_fg: Option<Color>,
    #[serde(deserialize_with = "deserialize_color")]
    pub header_fg: Color,
    #[serde(deserialize_with = "deserialize_color")]
    pub error_fg: Color,
    #[serde(skip, default = "BoxChars::unicode")]
    pub box_chars: BoxChars,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            log_level: "info".to_string(),
            log_file: "/dev/null".to_string(),
            api: ApiConfig::default(),
            tables: TablesConfig::default(),
            print: PrintConfig::default(),
            display: DisplayConfig::default(),
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        ApiConfig {
            base_url: "http://localhost:8080/api".to_string(),
            timeout_secs: 30,
        }
    }
}

impl Default for TablesConfig {
    fn default() -> Self {
        TablesConfig {
            server_paged: vec![ReportKind::Acb, ReportKind::HtBreaker, ReportKind::EarthTest],
            page_size: 10,
            search_debounce_ms: 500,
            min_loading_ms: 500,
        }
    }
}

impl TablesConfig {
    pub fn is_server_paged(&self, kind: ReportKind) -> bool {
        self.server_paged.contains(&kind)
    }

    /// Page size for client-driven tables, rounded up to an allowed choice
    pub fn client_page_size(&self) -> PageSize {
        PageSize::at_least(self.page_size)
    }
}

impl Default for PrintConfig {
    fn default() -> Self {
        PrintConfig {
            first_page_rows: 20,
            page_rows: 37,
            page_width_pt: 510.0,
            stamp_width_pt: 110.0,
        }
    }
}

impl PrintConfig {
    pub fn capacity(&self) -> PageCapacity {
        PageCapacity::new(self.first_page_rows, self.page_rows)
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        DisplayConfig {
            use_unicode: true,
            selection_fg: Color::Rgb(255, 165, 0), // Orange
            unfocused_selection_fg: None,
            header_fg: Color::Rgb(159, 226, 191),
            error_fg: Color::Red,
            box_chars: BoxChars::unicode(),
        }
    }
}

impl DisplayConfig {
    /// Get the unfocused selection color, calculating 50% darker if not explicitly set
    pub fn unfocused_selection_fg(&self) -> Color {
        self.unfocused_selection_fg
            .unwrap_or_else(|| darken_color(self.selection_fg, 0.5))
    }
}

/// Darken a color by a given factor (0.0 = black, 1.0 = original)
fn darken_color(color: Color, factor: f32) -> Color {
    match color {
        Color::Rgb(r, g, b) => {
            let r = (r as f32 * factor) as u8;
            let g = (g as f32 * factor) as u8;
            let b = (b as f32 * factor) as u8;
            Color::Rgb(r, g, b)
        }
        other => other,
    }
}

/// Deserialize a color from a string (supports named colors, RGB hex, or RGB tuple)
fn deserialize_color<'de, D>(deserializer: D) -> Result<Color, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    parse_color(&s).ok_or_else(|| serde::de::Error::custom(format!("Invalid color: {}", s)))
}

/// Deserialize an optional color from a string
fn deserialize_color_optional<'de, D>(deserializer: D) -> Result<Option<Color>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s {
        Some(color_str) => {
            let color = parse_color(&color_str)
                .ok_or_else(|| serde::de::Error::custom(format!("Invalid color: {}", color_str)))?;
            Ok(Some(color))
        }
        None => Ok(None),
    }
}

/// Parse a color string into a ratatui Color
/// Supports:
/// - Named colors: "red", "blue", "cyan", "orange", etc.
/// - Hex colors: "#FF6600", "#f60"
/// - RGB tuples: "255,165,0"
fn parse_color(s: &str) -> Option<Color> {
    let s = s.trim().to_lowercase();

    match s.as_str() {
        "black" => return Some(Color::Black),
        "red" => return Some(Color::Red),
        "green" => return Some(Color::Green),
        "yellow" => return Some(Color::Yellow),
        "blue" => return Some(Color::Blue),
        "magenta" => return Some(Color::Magenta),
        "cyan" => return Some(Color::Cyan),
        "gray" | "grey" => return Some(Color::Gray),
        "darkgray" | "darkgrey" => return Some(Color::DarkGray),
        "white" => return Some(Color::White),
        "orange" => return Some(Color::Rgb(255, 165, 0)),
        _ => {}
    }

    if let Some(hex) = s.strip_prefix('#') {
        if hex.len() == 6 {
            let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
            let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
            let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
            return Some(Color::Rgb(r, g, b));
        } else if hex.len() == 3 {
            let r = u8::from_str_radix(&hex[0..1].repeat(2), 16).ok()?;
            let g = u8::from_str_radix(&hex[1..2].repeat(2), 16).ok()?;
            let b = u8::from_str_radix(&hex[2..3].repeat(2), 16).ok()?;
            return Some(Color::Rgb(r, g, b));
        }
    }

    if s.contains(',') {
        let parts: Vec<&str> = s.split(',').collect();
        if parts.len() == 3 {
            let r = parts[0].trim().parse::<u8>().ok()?;
            let g = parts[1].trim().parse::<u8>().ok()?;
            let b = parts[2].trim().parse::<u8>().ok()?;
            return Some(Color::Rgb(r, g, b));
        }
    }

    None
}

pub fn get_config_path() -> Option<PathBuf> {
    let pgm = env!("CARGO_PKG_NAME");
    let xdg_dirs = BaseDirectories::with_prefix(pgm);
    let config_home = xdg_dirs.get_config_home()?;
    Some(config_home.join("config.toml"))
}

/// Parse a config document; box characters follow `display.use_unicode`
pub fn parse(content: &str) -> Result<Config, toml::de::Error> {
    let mut config: Config = toml::from_str(content)?;
    config.display.box_chars = BoxChars::from_use_unicode(config.display.use_unicode);
    Ok(config)
}

pub fn read() -> Config {
    let config_path = match get_config_path() {
        Some(path) => path,
        None => return Config::default(),
    };

    if !config_path.exists() {
        return Config::default();
    }

    let content = match fs::read_to_string(&config_path) {
        Ok(content) => content,
        Err(_) => return Config::default(),
    };

    parse(&content).unwrap_or_else(|_| Config::default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_color_named() {
        assert_eq!(parse_color("red"), Some(Color::Red));
        assert_eq!(parse_color("orange"), Some(Color::Rgb(255, 165, 0)));
        assert_eq!(parse_color("CYAN"), Some(Color::Cyan));
    }

    #[test]
    fn test_parse_color_hex() {
        assert_eq!(parse_color("#FF6600"), Some(Color::Rgb(255, 102, 0)));
        assert_eq!(parse_color("#f60"), Some(Color::Rgb(255, 102, 0)));
    }

    #[test]
    fn test_parse_color_rgb_tuple() {
        assert_eq!(parse_color("255, 102, 0"), Some(Color::Rgb(255, 102, 0)));
    }

    #[test]
    fn test_parse_color_invalid() {
        assert_eq!(parse_color("invalid"), None);
        assert_eq!(parse_color("#ZZZ"), None);
        assert_eq!(parse_color("256,0,0"), None);
    }

    #[test]
    fn test_unfocused_selection_is_darker_by_default() {
        let display = DisplayConfig::default();
        assert_eq!(display.unfocused_selection_fg(), Color::Rgb(127, 82, 0));
    }

    #[test]
    fn test_config_defaults() {
        let config = Config::default();
        assert_eq!(config.print.first_page_rows, 20);
        assert_eq!(config.print.page_rows, 37);
        assert_eq!(config.tables.search_debounce_ms, 500);
        assert!(config.tables.is_server_paged(ReportKind::Acb));
        assert!(!config.tables.is_server_paged(ReportKind::OilFiltration));
    }

    #[test]
    fn test_config_from_toml_partial() {
        let toml_str = r##"
log_level = "debug"

[api]
base_url = "https://reports.example.com/api"

[tables]
server_paged = ["earth-test"]
page_size = 25

[display]
use_unicode = false
selection_fg = "#00FFFF"
        "##;

        let config = parse(toml_str).unwrap();
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.log_file, "/dev/null");
        assert_eq!(config.api.base_url, "https://reports.example.com/api");
        assert_eq!(config.api.timeout_secs, 30);
        assert_eq!(config.tables.server_paged, vec![ReportKind::EarthTest]);
        assert_eq!(config.tables.client_page_size(), PageSize::Thirty);
        assert_eq!(config.display.selection_fg, Color::Rgb(0, 255, 255));
        assert_eq!(config.display.box_chars, BoxChars::ascii());
        assert_eq!(config.print.page_width_pt, 510.0);
    }

    #[test]
    fn test_config_rejects_unknown_report_kind() {
        let toml_str = r#"
[tables]
server_paged = ["pump"]
        "#;
        assert!(parse(toml_str).is_err());
    }
}
