use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Dealership website technology. Each platform has its own extraction
/// adapter and its own list of dealer-installed accessory names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    DealerCom,
    DealerEprocess,
    DealerOn,
    DealerInspire,
    DealerVenom,
    TeamVelocity,
}

impl Platform {
    pub const ALL: [Platform; 6] = [
        Platform::DealerCom,
        Platform::DealerEprocess,
        Platform::DealerOn,
        Platform::DealerInspire,
        Platform::DealerVenom,
        Platform::TeamVelocity,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Platform::DealerCom => "dealercom",
            Platform::DealerEprocess => "dealereprocess",
            Platform::DealerOn => "dealeron",
            Platform::DealerInspire => "dealerinspire",
            Platform::DealerVenom => "dealervenom",
            Platform::TeamVelocity => "teamvelocity",
        }
    }

    #[must_use]
    pub fn description(self) -> &'static str {
        match self {
            Platform::DealerCom => "Dealer.com (DDC) inventory pages",
            Platform::DealerEprocess => "Dealer eProcess vehicle detail pages",
            Platform::DealerOn => "DealerOn search and detail pages",
            Platform::DealerInspire => "Dealer Inspire (Algolia-backed) inventory",
            Platform::DealerVenom => "DealerVenom inventory pages",
            Platform::TeamVelocity => "Team Velocity inventory pages",
        }
    }

    /// Lowercased names of dealer-installed add-ons this platform lists
    /// alongside factory packages.
    #[must_use]
    pub fn accessory_names(self) -> &'static [&'static str] {
        match self {
            Platform::DealerCom => &[
                "pulse",
                "perma plate appearance protection 5yrs coverage",
                "permaplate appearance protection 5yrs coverage",
                "permaplate windshield protection 5yrs coverage",
                "door edge and cup guards",
                "door edge & cup guards",
                "tint",
                "chiprotect 10yrs coverage",
            ],
            Platform::DealerEprocess => &["pulse"],
            Platform::DealerOn => &[
                "360shield -paintshield and interiorshield",
                "z360shield -paintshield and interiorshield",
            ],
            Platform::DealerInspire | Platform::DealerVenom | Platform::TeamVelocity => &[],
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Platform::ALL
            .into_iter()
            .find(|p| p.as_str() == wanted)
            .ok_or_else(|| {
                let known: Vec<&str> = Platform::ALL.iter().map(|p| p.as_str()).collect();
                ConfigError::Validation(format!(
                    "unknown platform '{s}'; expected one of: {}",
                    known.join(", ")
                ))
            })
    }
}
