//! Vehicle classes and their cost/speed profiles

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

/// Vehicle class used to move goods along an edge
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum TransportMode {
    /// Heavy goods vehicle (truck)
    #[default]
    HeavyGoodsVehicle,
    /// Light commercial vehicle (van)
    LightCommercialVehicle,
    /// Cargo bicycle
    Bicycle,
    /// Delivery on foot
    WalkingDelivery,
}

impl TransportMode {
    /// All modes in registry priority order
    ///
    /// This order decides ties during mode selection.
    pub const ALL: [Self; 4] = [
        Self::HeavyGoodsVehicle,
        Self::LightCommercialVehicle,
        Self::Bicycle,
        Self::WalkingDelivery,
    ];

    const fn index(self) -> usize {
        match self {
            Self::HeavyGoodsVehicle => 0,
            Self::LightCommercialVehicle => 1,
            Self::Bicycle => 2,
            Self::WalkingDelivery => 3,
        }
    }

    /// Stable snake_case identifier
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::HeavyGoodsVehicle => "heavy_goods_vehicle",
            Self::LightCommercialVehicle => "light_commercial_vehicle",
            Self::Bicycle => "bicycle",
            Self::WalkingDelivery => "walking_delivery",
        }
    }
}

impl fmt::Display for TransportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransportMode {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "hgv" | "truck" | "heavy_goods_vehicle" => Ok(Self::HeavyGoodsVehicle),
            "lcv" | "van" | "light_commercial_vehicle" => Ok(Self::LightCommercialVehicle),
            "bicycle" | "bike" | "cycling" => Ok(Self::Bicycle),
            "walking" | "foot" | "walking_delivery" => Ok(Self::WalkingDelivery),
            _ => Err(DomainError::UnknownTransportMode(s.to_string())),
        }
    }
}

/// Cost and speed profile of a vehicle class
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransportModeConfig {
    /// Operating cost per kilometer (currency units)
    pub cost_per_km: f64,
    /// Maximum cruising speed in km/h
    pub max_speed_kmh: f64,
    /// Human-readable label
    pub label: String,
    /// Icon for map markers and legends
    pub icon: String,
    /// Hex color for route polylines
    pub color: String,
}

impl TransportModeConfig {
    fn new(cost_per_km: f64, max_speed_kmh: f64, label: &str, icon: &str, color: &str) -> Self {
        Self {
            cost_per_km,
            max_speed_kmh,
            label: label.to_string(),
            icon: icon.to_string(),
            color: color.to_string(),
        }
    }
}

/// Partial override of a mode's numeric profile
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TransportModeOverride {
    /// Replacement cost per kilometer
    #[serde(default)]
    pub cost_per_km: Option<f64>,
    /// Replacement maximum speed
    #[serde(default)]
    pub max_speed_kmh: Option<f64>,
}

/// Fixed table of vehicle classes
///
/// Built once at start-up and shared read-only afterwards. Every
/// [`TransportMode`] variant always has an entry, so lookups cannot fail.
#[derive(Debug, Clone, PartialEq)]
pub struct TransportModeRegistry {
    configs: [TransportModeConfig; 4],
}

impl Default for TransportModeRegistry {
    fn default() -> Self {
        Self {
            configs: [
                TransportModeConfig::new(25.0, 60.0, "Heavy Goods Vehicle", "🚛", "#dc2626"),
                TransportModeConfig::new(15.0, 80.0, "Light Commercial Vehicle", "🚐", "#2563eb"),
                TransportModeConfig::new(3.0, 18.0, "Cargo Bicycle", "🚲", "#16a34a"),
                TransportModeConfig::new(1.0, 5.0, "Walking Delivery", "🚶", "#9333ea"),
            ],
        }
    }
}

impl TransportModeRegistry {
    /// Apply a numeric override to one mode
    ///
    /// Non-finite values, negative costs and non-positive speeds are ignored.
    #[must_use]
    pub fn with_override(mut self, mode: TransportMode, patch: TransportModeOverride) -> Self {
        let config = &mut self.configs[mode.index()];
        if let Some(cost) = patch.cost_per_km.filter(|c| c.is_finite() && *c >= 0.0) {
            config.cost_per_km = cost;
        }
        if let Some(speed) = patch.max_speed_kmh.filter(|s| s.is_finite() && *s > 0.0) {
            config.max_speed_kmh = speed;
        }
        self
    }

    /// Look up the profile of a mode
    #[must_use]
    pub fn lookup(&self, mode: TransportMode) -> &TransportModeConfig {
        &self.configs[mode.index()]
    }

    /// Iterate over all modes in priority order
    pub fn iter(&self) -> impl Iterator<Item = (TransportMode, &TransportModeConfig)> {
        TransportMode::ALL
            .into_iter()
            .map(move |mode| (mode, self.lookup(mode)))
    }
}
