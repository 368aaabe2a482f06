//! Static hazard and safe-zone listings.
//!
//! The listings are JSON arrays shipped next to the app; they are read once
//! and never written.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::error::{ContentError, Result};

/// File name of the hazard listing.
pub const HAZARDS_FILE: &str = "hazards.json";

/// File name of the safe-zone listing.
pub const SAFE_ZONES_FILE: &str = "safeZones.json";

/// The two static listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Listing {
    /// Reported coastal hazards.
    Hazards,
    /// Evacuation safe zones.
    SafeZones,
}

impl Listing {
    /// Returns the listing's file name.
    pub const fn file_name(self) -> &'static str {
        match self {
            Self::Hazards => HAZARDS_FILE,
            Self::SafeZones => SAFE_ZONES_FILE,
        }
    }

    /// Message shown instead of the listing when it cannot be loaded.
    pub fn failure_message(self) -> String {
        format!("Failed to load {self}. Please try again later.")
    }
}

impl fmt::Display for Listing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Hazards => f.write_str("hazard reports"),
            Self::SafeZones => f.write_str("safe zones"),
        }
    }
}

/// Severity of a reported hazard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Intensity {
    /// Low severity.
    Low,
    /// Medium severity.
    Medium,
    /// High severity.
    High,
}

impl fmt::Display for Intensity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Low => f.write_str("Low"),
            Self::Medium => f.write_str("Medium"),
            Self::High => f.write_str("High"),
        }
    }
}

impl FromStr for Intensity {
    type Err = ContentError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            _ => Err(ContentError::UnknownIntensity(s.to_string())),
        }
    }
}

/// A reported coastal hazard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hazard {
    /// Report identifier.
    pub id: String,
    /// Kind of hazard, e.g. "High Waves".
    pub disaster_type: String,
    /// What the reporter saw.
    pub description: String,
    /// Where it was seen.
    pub location: String,
    /// When it was reported.
    pub timestamp: DateTime<Utc>,
    /// Severity.
    pub intensity: Intensity,
    /// Image path or URL.
    pub image: String,
}

impl Hazard {
    /// Formats the report time as `10 Apr 2025, 02:30 pm`.
    pub fn formatted_timestamp(&self) -> String {
        self.timestamp.format("%-d %b %Y, %I:%M %P").to_string()
    }
}

/// Latitude/longitude pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees.
    pub lng: f64,
}

/// An evacuation safe zone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SafeZone {
    /// Zone identifier.
    pub id: String,
    /// Zone name.
    pub name: String,
    /// Human-readable address.
    pub location: String,
    /// Number of people it can shelter.
    pub capacity: u32,
    /// Available facilities.
    #[serde(default)]
    pub facilities: Vec<String>,
    /// Map position.
    pub coordinates: Coordinates,
}

/// Decodes the hazard listing.
pub fn parse_hazards(json: &str) -> Result<Vec<Hazard>> {
    serde_json::from_str(json).map_err(|source| ContentError::Parse {
        listing: Listing::Hazards,
        source,
    })
}

/// Decodes the safe-zone listing.
pub fn parse_safe_zones(json: &str) -> Result<Vec<SafeZone>> {
    serde_json::from_str(json).map_err(|source| ContentError::Parse {
        listing: Listing::SafeZones,
        source,
    })
}

/// Both listings, as loaded.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    /// Hazard reports in file order.
    pub hazards: Vec<Hazard>,
    /// Safe zones in file order.
    pub safe_zones: Vec<SafeZone>,
}

impl Catalog {
    /// Decodes both listings from JSON text.
    pub fn from_json(hazards: &str, safe_zones: &str) -> Result<Self> {
        Ok(Self {
            hazards: parse_hazards(hazards)?,
            safe_zones: parse_safe_zones(safe_zones)?,
        })
    }

    /// Reads both listings from `dir`.
    pub async fn load(dir: &Path) -> Result<Self> {
        let hazards = read_listing(dir, Listing::Hazards).await?;
        let safe_zones = read_listing(dir, Listing::SafeZones).await?;
        let catalog = Self::from_json(&hazards, &safe_zones)?;
        debug!(
            hazards = catalog.hazards.len(),
            safe_zones = catalog.safe_zones.len(),
            "catalog loaded"
        );
        Ok(catalog)
    }

    /// Hazards, most recent first.
    pub fn recent_hazards(&self) -> Vec<&Hazard> {
        let mut hazards: Vec<&Hazard> = self.hazards.iter().collect();
        hazards.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        hazards
    }

    /// Hazards of the given intensity, most recent first.
    pub fn hazards_with_intensity(&self, intensity: Intensity) -> Vec<&Hazard> {
        self.recent_hazards()
            .into_iter()
            .filter(|h| h.intensity == intensity)
            .collect()
    }

    /// Looks up a hazard by id.
    pub fn hazard(&self, id: &str) -> Option<&Hazard> {
        self.hazards.iter().find(|h| h.id == id)
    }

    /// Looks up a safe zone by id.
    pub fn safe_zone(&self, id: &str) -> Option<&SafeZone> {
        self.safe_zones.iter().find(|z| z.id == id)
    }

    /// Combined capacity of all safe zones.
    pub fn total_capacity(&self) -> u64 {
        self.safe_zones.iter().map(|z| u64::from(z.capacity)).sum()
    }
}

async fn read_listing(dir: &Path, listing: Listing) -> Result<String> {
    let path = dir.join(listing.file_name());
    tokio::fs::read_to_string(&path).await.map_err(|source| {
        error!(path = %path.display(), %source, "error fetching {listing}");
        ContentError::Io {
            listing,
            path,
            source,
        }
    })
}
