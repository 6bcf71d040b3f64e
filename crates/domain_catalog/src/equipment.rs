//! Rental equipment and its tiered rate card

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use core_kernel::{EquipmentId, MAX_AMOUNT};

use crate::error::CatalogError;

/// Folder under which uploaded equipment images are stored
const IMAGE_FOLDER: &str = "equipment/global";

/// Tiered prices for a piece of equipment
///
/// `total_cost` is an absolute ceiling on any computed rental price and
/// `monthly` is optional. Both treat zero the same as unset: a zero cap means
/// "no cap" and a zero monthly rate falls back to the weekly rate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EquipmentPrices {
    #[serde(default)]
    pub total_cost: Option<Decimal>,
    pub daily: Decimal,
    pub weekly: Decimal,
    #[serde(default)]
    pub monthly: Option<Decimal>,
}

impl EquipmentPrices {
    pub fn new(daily: Decimal, weekly: Decimal) -> Self {
        Self {
            total_cost: None,
            daily,
            weekly,
            monthly: None,
        }
    }

    pub fn with_monthly(mut self, monthly: Decimal) -> Self {
        self.monthly = Some(monthly);
        self
    }

    pub fn with_total_cost(mut self, total_cost: Decimal) -> Self {
        self.total_cost = Some(total_cost);
        self
    }

    /// The price ceiling, if one is configured
    pub fn cap(&self) -> Option<Decimal> {
        self.total_cost.filter(|cost| !cost.is_zero())
    }

    /// The monthly rate, if one is configured
    pub fn monthly_rate(&self) -> Option<Decimal> {
        self.monthly.filter(|rate| !rate.is_zero())
    }

    /// Rejects negative rates and rates too large to store
    pub fn validate(&self) -> Result<(), CatalogError> {
        let rates = [
            ("daily", Some(self.daily)),
            ("weekly", Some(self.weekly)),
            ("monthly", self.monthly),
            ("total_cost", self.total_cost),
        ];
        for (field, rate) in rates {
            if let Some(rate) = rate {
                if rate < Decimal::ZERO {
                    return Err(CatalogError::invalid_rate(field, "must not be negative"));
                }
                if rate > MAX_AMOUNT {
                    return Err(CatalogError::invalid_rate(field, "is too large"));
                }
            }
        }
        Ok(())
    }
}

/// A rentable piece of equipment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Equipment {
    pub id: EquipmentId,
    pub name: String,
    pub description: String,
    /// Hosted image URLs or storage paths
    pub images: Vec<String>,
    pub prices: EquipmentPrices,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Equipment {
    pub fn new(name: impl Into<String>, description: impl Into<String>, prices: EquipmentPrices) -> Self {
        let now = Utc::now();
        Self {
            id: EquipmentId::new_v7(),
            name: name.into(),
            description: description.into(),
            images: Vec::new(),
            prices,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_images(mut self, images: Vec<String>) -> Self {
        self.images = images;
        self
    }

    pub fn validate(&self) -> Result<(), CatalogError> {
        if self.name.trim().is_empty() {
            return Err(CatalogError::MissingField("name"));
        }
        self.prices.validate()
    }

    /// Assigns storage paths to every image that is not already hosted
    ///
    /// Returns the `(source, path)` pairs that still need uploading. Hosted
    /// URLs are left untouched.
    pub fn assign_image_paths(&mut self, timestamp_ms: i64) -> Vec<(String, String)> {
        let mut pending = Vec::new();
        for (index, image) in self.images.iter_mut().enumerate() {
            if is_hosted_url(image) {
                continue;
            }
            let path = image_storage_path(timestamp_ms, index);
            pending.push((std::mem::replace(image, path.clone()), path));
        }
        pending
    }
}

/// Storage path for the `index`-th image uploaded at `timestamp_ms`
pub fn image_storage_path(timestamp_ms: i64, index: usize) -> String {
    format!("{}/{}_{}", IMAGE_FOLDER, timestamp_ms, index)
}

/// Returns true for images that already live at an http(s) URL
pub fn is_hosted_url(image: &str) -> bool {
    image.starts_with("https://") || image.starts_with("http://")
}
