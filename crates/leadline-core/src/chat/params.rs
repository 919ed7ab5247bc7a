use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const DEFAULT_SOURCE: &str = "Chat Widget Web";

const DEFAULT_PRIMARY: &str = "#ea580c";
const DEFAULT_PRIMARY_LIGHT: &str = "#ffedd5";
const DEFAULT_PRIMARY_DARK: &str = "#c2410c";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Lang {
    #[default]
    Es,
    En,
}

impl Lang {
    /// `en` selects English; anything else, including nothing, is Spanish.
    pub fn from_param(raw: Option<&str>) -> Self {
        match raw {
            Some("en") => Lang::En,
            _ => Lang::Es,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Lang::Es => "es",
            Lang::En => "en",
        }
    }
}

impl fmt::Display for Lang {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Lang {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "es" => Ok(Lang::Es),
            "en" => Ok(Lang::En),
            other => Err(format!("unsupported language: {other}")),
        }
    }
}

/// Widget colors derived from the `primary` parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Theme {
    pub primary: String,
    pub primary_light: String,
    pub primary_dark: String,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            primary: DEFAULT_PRIMARY.to_string(),
            primary_light: DEFAULT_PRIMARY_LIGHT.to_string(),
            primary_dark: DEFAULT_PRIMARY_DARK.to_string(),
        }
    }
}

impl Theme {
    /// Accepts 3 or 6 hex digits without `#`; anything else yields the default theme.
    pub fn from_param(raw: Option<&str>) -> Self {
        match raw {
            Some(hex) if is_hex_color(hex) => Self {
                primary: format!("#{hex}"),
                primary_light: format!("#{hex}20"),
                primary_dark: format!("#{hex}E6"),
            },
            _ => Self::default(),
        }
    }

    /// The primary color as RGB channels; 3-digit colors are expanded.
    pub fn primary_rgb(&self) -> Option<(u8, u8, u8)> {
        let hex = self.primary.strip_prefix('#')?;
        let expanded: String = match hex.len() {
            3 => hex.chars().flat_map(|ch| [ch, ch]).collect(),
            6 => hex.to_string(),
            _ => return None,
        };
        let channel = |idx: usize| {
            expanded
                .get(idx..idx + 2)
                .and_then(|pair| u8::from_str_radix(pair, 16).ok())
        };
        Some((channel(0)?, channel(2)?, channel(4)?))
    }
}

fn is_hex_color(value: &str) -> bool {
    matches!(value.len(), 3 | 6) && value.chars().all(|ch| ch.is_ascii_hexdigit())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WidgetParams {
    pub source: String,
    pub lang: Lang,
    pub theme: Theme,
}

impl Default for WidgetParams {
    fn default() -> Self {
        Self::new(None, None, None)
    }
}

impl WidgetParams {
    pub fn new(source: Option<&str>, lang: Option<&str>, primary: Option<&str>) -> Self {
        let source = match source {
            Some(value) if !value.is_empty() => value.to_string(),
            _ => DEFAULT_SOURCE.to_string(),
        };
        Self {
            source,
            lang: Lang::from_param(lang),
            theme: Theme::from_param(primary),
        }
    }

    /// Parses `source`, `lang` and `primary` from a URL query string.
    /// A leading `?` is allowed; for repeated keys the first value wins.
    pub fn from_query(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        let mut source = None;
        let mut lang = None;
        let mut primary = None;
        for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
            let slot = match key.as_ref() {
                "source" => &mut source,
                "lang" => &mut lang,
                "primary" => &mut primary,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value.into_owned());
            }
        }
        Self::new(source.as_deref(), lang.as_deref(), primary.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::{Lang, Theme, WidgetParams, DEFAULT_SOURCE};

    #[test]
    fn defaults_apply_without_params() {
        let params = WidgetParams::from_query("");
        assert_eq!(params.source, DEFAULT_SOURCE);
        assert_eq!(params.lang, Lang::Es);
        assert_eq!(params.theme, Theme::default());
        assert_eq!(params.theme.primary, "#ea580c");
    }

    #[test]
    fn query_string_is_decoded() {
        let params = WidgetParams::from_query("?source=Col%20Brew&lang=en&primary=1e40af");
        assert_eq!(params.source, "Col Brew");
        assert_eq!(params.lang, Lang::En);
        assert_eq!(params.theme.primary, "#1e40af");
        assert_eq!(params.theme.primary_light, "#1e40af20");
        assert_eq!(params.theme.primary_dark, "#1e40afE6");
    }

    #[test]
    fn unknown_lang_falls_back_to_spanish() {
        assert_eq!(Lang::from_param(Some("fr")), Lang::Es);
        assert_eq!(Lang::from_param(Some("EN")), Lang::Es);
    }

    #[test]
    fn invalid_colors_use_default_theme() {
        assert_eq!(Theme::from_param(Some("#fff")), Theme::default());
        assert_eq!(Theme::from_param(Some("abcd")), Theme::default());
        assert_eq!(Theme::from_param(Some("ggg")), Theme::default());
        assert_eq!(Theme::from_param(Some("FFF")).primary, "#FFF");
    }

    #[test]
    fn primary_color_splits_into_channels() {
        assert_eq!(Theme::default().primary_rgb(), Some((0xea, 0x58, 0x0c)));
        assert_eq!(Theme::from_param(Some("1e40af")).primary_rgb(), Some((30, 64, 175)));
        assert_eq!(Theme::from_param(Some("FfF")).primary_rgb(), Some((255, 255, 255)));
    }
}
