use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Standard race distances offered as quick picks.
#[derive(
    Debug, Copy, Clone, PartialEq, Eq, ValueEnum, Serialize, Deserialize, strum_macros::Display,
)]
#[serde(rename_all = "lowercase")]
pub enum DistancePreset {
    #[value(name = "5k")]
    #[serde(rename = "5k")]
    #[strum(serialize = "5K")]
    FiveK,
    #[value(name = "10k")]
    #[serde(rename = "10k")]
    #[strum(serialize = "10K")]
    TenK,
    #[strum(serialize = "Half marathon")]
    Half,
    #[strum(serialize = "Marathon")]
    Marathon,
}

impl DistancePreset {
    pub const ALL: [DistancePreset; 4] = [
        DistancePreset::FiveK,
        DistancePreset::TenK,
        DistancePreset::Half,
        DistancePreset::Marathon,
    ];

    pub fn km(&self) -> f64 {
        match self {
            DistancePreset::FiveK => 5.0,
            DistancePreset::TenK => 10.0,
            DistancePreset::Half => 21.0975,
            DistancePreset::Marathon => 42.195,
        }
    }

    /// Next preset in the cycle; `None` wraps round to the first one.
    pub fn cycle(current: Option<DistancePreset>) -> DistancePreset {
        match current {
            None => DistancePreset::FiveK,
            Some(p) => {
                let pos = Self::ALL.iter().position(|x| *x == p).unwrap_or(0);
                Self::ALL[(pos + 1) % Self::ALL.len()]
            }
        }
    }
}
