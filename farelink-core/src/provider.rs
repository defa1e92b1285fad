use serde::{Deserialize, Serialize};
use std::fmt;

/// The set of upstream flight providers known at startup. Adapters are
/// enumerated from this list, never looked up by untyped string keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProviderKind {
    Garuda,
    LionAir,
    BatikAir,
    AirAsia,
}

impl ProviderKind {
    pub const ALL: [ProviderKind; 4] = [
        ProviderKind::Garuda,
        ProviderKind::LionAir,
        ProviderKind::BatikAir,
        ProviderKind::AirAsia,
    ];

    /// Short code used in cache keys, record ids and airline allow-lists.
    pub fn code(&self) -> &'static str {
        match self {
            ProviderKind::Garuda => "Garuda",
            ProviderKind::LionAir => "LionAir",
            ProviderKind::BatikAir => "BatikAir",
            ProviderKind::AirAsia => "AirAsia",
        }
    }

    /// Human-readable provider name carried on unified records.
    pub fn display_name(&self) -> &'static str {
        match self {
            ProviderKind::Garuda => "Garuda Indonesia",
            ProviderKind::LionAir => "Lion Air",
            ProviderKind::BatikAir => "Batik Air",
            ProviderKind::AirAsia => "AirAsia Indonesia",
        }
    }

    pub fn from_code(code: &str) -> Option<ProviderKind> {
        ProviderKind::ALL
            .into_iter()
            .find(|p| p.code().eq_ignore_ascii_case(code))
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
