use serde::{Deserialize, Serialize};

/// Display glyph for a weather condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Glyph {
    Sun,
    PartlyCloudy,
    Cloud,
    Rain,
    Storm,
    Snow,
    Fog,
    Unknown,
}

impl Glyph {
    pub fn symbol(&self) -> &'static str {
        match self {
            Glyph::Sun => "☀️",
            Glyph::PartlyCloudy => "⛅",
            Glyph::Cloud => "☁️",
            Glyph::Rain => "🌧️",
            Glyph::Storm => "⛈️",
            Glyph::Snow => "❄️",
            Glyph::Fog => "🌫️",
            Glyph::Unknown => "🌐",
        }
    }
}

impl std::fmt::Display for Glyph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Condition keywords, checked in order. Earlier entries win.
const CONDITION_KEYWORDS: &[(&[&str], Glyph)] = &[
    (&["cloud"], Glyph::Cloud),
    (&["rain"], Glyph::Rain),
    (&["storm", "thunder"], Glyph::Storm),
    (&["snow"], Glyph::Snow),
    (&["clear"], Glyph::Sun),
    (&["mist", "fog", "haze"], Glyph::Fog),
];

/// OpenWeather icon code prefixes, consulted only when no keyword matched.
const ICON_PREFIXES: &[(&[&str], Glyph)] = &[
    (&["01"], Glyph::Sun),
    (&["02"], Glyph::PartlyCloudy),
    (&["03", "04"], Glyph::Cloud),
    (&["09", "10"], Glyph::Rain),
    (&["11"], Glyph::Storm),
    (&["13"], Glyph::Snow),
    (&["50"], Glyph::Fog),
];

/// Pick a glyph for a provider icon code and condition text.
///
/// Condition text is authoritative: the icon code is only looked at when the
/// condition contains none of the known keywords.
pub fn resolve_icon(icon_code: &str, condition: &str) -> Glyph {
    let condition = condition.to_lowercase();

    let by_condition = CONDITION_KEYWORDS
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| condition.contains(k)));

    let by_code = || {
        ICON_PREFIXES
            .iter()
            .find(|(prefixes, _)| prefixes.iter().any(|p| icon_code.starts_with(p)))
    };

    by_condition
        .or_else(by_code)
        .map(|(_, glyph)| *glyph)
        .unwrap_or(Glyph::Unknown)
}
