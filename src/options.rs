/// Formatter options and the random option sampler.
///
/// Every sampled configuration is valid by construction: numeric fields are
/// drawn within the formatter's accepted domain, and the dialect comes from
/// a fixed enumerated set. Options serialize camelCase so the persisted
/// `options.json` reads like a normal formatter config file.
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Input dialect the formatter parses the program as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    Babylon,
    Flow,
}

impl Dialect {
    pub fn as_str(self) -> &'static str {
        match self {
            Dialect::Babylon => "babylon",
            Dialect::Flow => "flow",
        }
    }
}

/// One complete formatter configuration, fully determining formatter
/// behavior for a single pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormatOptions {
    pub print_width: u32,
    pub tab_width: u32,
    pub single_quote: bool,
    pub trailing_comma: bool,
    pub bracket_spacing: bool,
    pub parser: Dialect,
}

impl FormatOptions {
    /// Draw a random configuration. Each field is sampled independently and
    /// uniformly — the point is to surface interactions between arbitrary
    /// option combinations, not to model realistic user configs.
    pub fn sample(rng: &mut impl Rng) -> Self {
        FormatOptions {
            print_width: rng.random_range(0..200),
            tab_width: rng.random_range(0..12),
            single_quote: rng.random_bool(0.5),
            trailing_comma: rng.random_bool(0.5),
            bracket_spacing: rng.random_bool(0.5),
            parser: if rng.random_bool(0.5) {
                Dialect::Babylon
            } else {
                Dialect::Flow
            },
        }
    }

    /// Render as kebab-case CLI flags, the form both the subprocess oracle
    /// and the printed reproduction command use.
    pub fn cli_flags(&self) -> Vec<String> {
        vec![
            format!("--print-width={}", self.print_width),
            format!("--tab-width={}", self.tab_width),
            format!("--single-quote={}", self.single_quote),
            format!("--trailing-comma={}", self.trailing_comma),
            format!("--bracket-spacing={}", self.bracket_spacing),
            format!("--parser={}", self.parser.as_str()),
        ]
    }

    /// Pretty-printed JSON, the exact bytes the corpus persists.
    pub fn to_json_pretty(&self) -> String {
        // serde_json can't fail on this struct: no maps, no non-string keys.
        serde_json::to_string_pretty(self).unwrap_or_default()
    }
}
