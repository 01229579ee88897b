//! Source tags recorded on every canonical record.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identifies which upstream adapter produced a record.
///
/// Link building uses the tag to pick the local URL scheme for chapter and
/// manga-detail cross-links.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum SourceTag {
    /// komiku.id, the primary regional source.
    #[default]
    Komiku,
    /// westmanga, the secondary regional source.
    Asia,
    /// weebcentral, the international source.
    International,
    /// komikdewasa doujin catalogue.
    Doujin,
}

impl SourceTag {
    /// Sources tried by selection when the identifier carries no usable hint, in priority order.
    pub const FALLBACK_ORDER: [SourceTag; 3] = [SourceTag::Komiku, SourceTag::Asia, SourceTag::International];

    pub fn as_str(&self) -> &'static str {
        match self {
            SourceTag::Komiku => "komiku",
            SourceTag::Asia => "asia",
            SourceTag::International => "international",
            SourceTag::Doujin => "doujin",
        }
    }
}

impl fmt::Display for SourceTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SourceTag {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "komiku" => Ok(SourceTag::Komiku),
            "asia" | "westmanga" => Ok(SourceTag::Asia),
            "international" | "intl" | "weebcentral" => Ok(SourceTag::International),
            "doujin" | "komikdewasa" => Ok(SourceTag::Doujin),
            other => Err(format!("unknown source: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_aliases() {
        assert_eq!("westmanga".parse::<SourceTag>().unwrap(), SourceTag::Asia);
        assert_eq!("INTL".parse::<SourceTag>().unwrap(), SourceTag::International);
        assert_eq!(" komiku ".parse::<SourceTag>().unwrap(), SourceTag::Komiku);
        assert!("mangadex".parse::<SourceTag>().is_err());
    }

    #[test]
    fn test_serde_lowercase() {
        let json = serde_json::to_string(&SourceTag::International).unwrap();
        assert_eq!(json, "\"international\"");
        let tag: SourceTag = serde_json::from_str("\"asia\"").unwrap();
        assert_eq!(tag, SourceTag::Asia);
    }

    #[test]
    fn test_fallback_order_excludes_doujin() {
        assert!(!SourceTag::FALLBACK_ORDER.contains(&SourceTag::Doujin));
        assert_eq!(SourceTag::FALLBACK_ORDER[0], SourceTag::Komiku);
    }
}
