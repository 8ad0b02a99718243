use anyhow::Result;
use ratatui::style::Color;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub display: DisplayConfig,
    pub behavior: BehaviorConfig,
    pub split: SplitConfig,
    pub theme: ThemeConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Rows per grid page.
    pub page_size: usize,
    /// Show a leading # column with the record's position in the view.
    pub show_row_numbers: bool,
    /// Message shown when the filtered collection is empty.
    pub empty_message: String,
    /// Record key whose text feeds the detail pane's narrative panel.
    /// `--notes FILE` overrides this.
    pub detail_text_key: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BehaviorConfig {
    /// Quiet period before a search keystroke burst is applied.
    pub search_debounce_ms: u64,
    /// Capture mouse events (header clicks, row clicks, divider drags).
    pub mouse: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SplitConfig {
    pub min_fraction: f64,
    pub max_fraction: f64,
    pub initial_fraction: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeConfig {
    pub header_fg: String,
    pub selection_bg: String,
    pub divider_fg: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            display: DisplayConfig::default(),
            behavior: BehaviorConfig::default(),
            split: SplitConfig::default(),
            theme: ThemeConfig::default(),
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            page_size: 20,
            show_row_numbers: true,
            empty_message: "No matching records".to_string(),
            detail_text_key: None,
        }
    }
}

impl Default for BehaviorConfig {
    fn default() -> Self {
        Self {
            search_debounce_ms: 300,
            mouse: true,
        }
    }
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            min_fraction: 0.20,
            max_fraction: 0.80,
            initial_fraction: 0.35,
        }
    }
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            header_fg: "cyan".to_string(),
            selection_bg: "darkgray".to_string(),
            divider_fg: "darkgray".to_string(),
        }
    }
}

impl Config {
    /// Load config from the default location, writing a default file on
    /// first run.
    pub fn load() -> Result<Self> {
        let config_path = Self::get_config_path()?;

        if !config_path.exists() {
            let default_config = Self::default();
            default_config.save()?;
            return Ok(default_config);
        }

        let contents = fs::read_to_string(&config_path)?;
        let mut config: Config = toml::from_str(&contents)?;
        config.sanitize();
        Ok(config)
    }

    /// Save config to the default location.
    pub fn save(&self) -> Result<()> {
        let config_path = Self::get_config_path()?;

        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        fs::write(&config_path, contents)?;

        Ok(())
    }

    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

        Ok(config_dir.join("record-browser").join("config.toml"))
    }

    /// Pull edited values back into their invariants instead of erroring:
    /// fractions inside [0, 1], min strictly below max, page size nonzero.
    pub fn sanitize(&mut self) {
        let split = &mut self.split;
        split.min_fraction = split.min_fraction.clamp(0.0, 1.0);
        split.max_fraction = split.max_fraction.clamp(0.0, 1.0);
        if split.min_fraction >= split.max_fraction {
            *split = SplitConfig::default();
        }
        split.initial_fraction = split
            .initial_fraction
            .clamp(split.min_fraction, split.max_fraction);

        if self.display.page_size == 0 {
            self.display.page_size = DisplayConfig::default().page_size;
        }
    }

    /// Annotated config template for `--generate-config`.
    pub fn create_default_with_comments() -> String {
        r#"# record-browser configuration
# Location: ~/.config/record-browser/config.toml (Linux/macOS)
#           %APPDATA%\record-browser\config.toml (Windows)

[display]
# Rows shown per page
page_size = 20

# Show a leading # column with each row's position in the view
show_row_numbers = true

# Message shown when a search or filter matches nothing
empty_message = "No matching records"

# Record key whose text is rendered in the detail pane's right panel,
# e.g. detail_text_key = "Notes". Commented out: fall back to --notes FILE
# or a field-by-field dump.
# detail_text_key = "Notes"

[behavior]
# Quiet period (ms) before search keystrokes are applied to the grid
search_debounce_ms = 300

# Capture mouse events for header clicks, row clicks, and divider drags
mouse = true

[split]
# Bounds on the detail view's left pane, as fractions of the window width
min_fraction = 0.20
max_fraction = 0.80
initial_fraction = 0.35

[theme]
# Color names: black, red, green, yellow, blue, magenta, cyan, gray,
# darkgray, white, or an index like "240"
header_fg = "cyan"
selection_bg = "darkgray"
divider_fg = "darkgray"
"#
        .to_string()
    }
}

impl ThemeConfig {
    pub fn header_fg(&self) -> Color {
        parse_color(&self.header_fg)
    }

    pub fn selection_bg(&self) -> Color {
        parse_color(&self.selection_bg)
    }

    pub fn divider_fg(&self) -> Color {
        parse_color(&self.divider_fg)
    }
}

fn parse_color(name: &str) -> Color {
    match name.to_lowercase().as_str() {
        "black" => Color::Black,
        "red" => Color::Red,
        "green" => Color::Green,
        "yellow" => Color::Yellow,
        "blue" => Color::Blue,
        "magenta" => Color::Magenta,
        "cyan" => Color::Cyan,
        "gray" | "grey" => Color::Gray,
        "darkgray" | "darkgrey" => Color::DarkGray,
        "lightred" => Color::LightRed,
        "lightgreen" => Color::LightGreen,
        "lightyellow" => Color::LightYellow,
        "lightblue" => Color::LightBlue,
        "lightmagenta" => Color::LightMagenta,
        "lightcyan" => Color::LightCyan,
        "white" => Color::White,
        other => other
            .parse::<u8>()
            .map(Color::Indexed)
            .unwrap_or(Color::White),
    }
}
