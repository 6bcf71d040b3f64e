//! Billable field actions and their per-unit rate table
//!
//! An action's price map is sparse: only units with a rate entered are
//! selectable when a driver logs the action. Stored documents may carry
//! empty strings or nulls for units that were never filled in, and those
//! read back as unset.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

use core_kernel::{ActionId, TimeUnit, MAX_AMOUNT};

use crate::error::CatalogError;
use crate::job::JobRoles;

/// The unit an action is billed in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BillingUnit {
    Bag,
    Gallon,
    Hour,
    Trip,
    Day,
}

impl BillingUnit {
    pub const ALL: [BillingUnit; 5] = [
        BillingUnit::Bag,
        BillingUnit::Gallon,
        BillingUnit::Hour,
        BillingUnit::Trip,
        BillingUnit::Day,
    ];

    /// Units priced per counted quantity
    pub fn is_quantity_based(&self) -> bool {
        matches!(self, BillingUnit::Bag | BillingUnit::Gallon)
    }

    /// Units priced on elapsed time between a start and an end
    pub fn is_time_based(&self) -> bool {
        self.time_unit().is_some()
    }

    pub fn time_unit(&self) -> Option<TimeUnit> {
        match self {
            BillingUnit::Hour => Some(TimeUnit::Hours),
            BillingUnit::Day => Some(TimeUnit::Days),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BillingUnit::Bag => "bag",
            BillingUnit::Gallon => "gallon",
            BillingUnit::Hour => "hour",
            BillingUnit::Trip => "trip",
            BillingUnit::Day => "day",
        }
    }
}

impl fmt::Display for BillingUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BillingUnit {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        BillingUnit::ALL
            .into_iter()
            .find(|unit| unit.as_str() == normalized)
            .ok_or_else(|| CatalogError::UnknownUnit(s.to_string()))
    }
}

/// Sparse unit -> rate mapping for an action
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ActionPrices(BTreeMap<BillingUnit, Decimal>);

impl ActionPrices {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, unit: BillingUnit, rate: Decimal) -> Self {
        self.0.insert(unit, rate);
        self
    }

    pub fn set(&mut self, unit: BillingUnit, rate: Option<Decimal>) {
        match rate {
            Some(rate) => {
                self.0.insert(unit, rate);
            }
            None => {
                self.0.remove(&unit);
            }
        }
    }

    /// Units with a rate entered, in declaration order
    ///
    /// A rate of zero still counts as entered; it simply prices to nothing.
    pub fn available_units(&self) -> Vec<BillingUnit> {
        self.0.keys().copied().collect()
    }

    pub fn is_available(&self, unit: BillingUnit) -> bool {
        self.0.contains_key(&unit)
    }

    /// The billable rate for `unit`, when entered and non-zero
    pub fn price_for(&self, unit: BillingUnit) -> Option<Decimal> {
        self.0.get(&unit).copied().filter(|rate| !rate.is_zero())
    }

    pub fn iter(&self) -> impl Iterator<Item = (BillingUnit, Decimal)> + '_ {
        self.0.iter().map(|(unit, rate)| (*unit, *rate))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Stored rate values: a number, a numeric string, or a blank string
#[derive(Deserialize)]
#[serde(untagged)]
enum StoredRate {
    Amount(Decimal),
    Text(String),
}

impl<'de> Deserialize<'de> for ActionPrices {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = BTreeMap::<String, Option<StoredRate>>::deserialize(deserializer)?;
        let mut prices = BTreeMap::new();

        for (key, value) in raw {
            // Keys outside the unit list are legacy data; they can never be selected
            let Ok(unit) = key.parse::<BillingUnit>() else {
                continue;
            };
            match value {
                None => {}
                Some(StoredRate::Amount(rate)) => {
                    prices.insert(unit, rate);
                }
                Some(StoredRate::Text(text)) if text.trim().is_empty() => {}
                Some(StoredRate::Text(text)) => {
                    return Err(serde::de::Error::custom(format!(
                        "invalid rate for {}: {:?}",
                        unit, text
                    )));
                }
            }
        }

        Ok(ActionPrices(prices))
    }
}

/// A billable activity drivers record in their logs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Action {
    pub id: ActionId,
    pub name: String,
    pub description: String,
    /// Unit preselected when the action is logged
    pub unit: Option<BillingUnit>,
    pub prices: ActionPrices,
    /// Roles allowed to log this action
    #[serde(default)]
    pub roles: JobRoles,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Action {
    pub fn new(name: impl Into<String>, description: impl Into<String>, prices: ActionPrices) -> Self {
        let now = Utc::now();
        Self {
            id: ActionId::new_v7(),
            name: name.into(),
            description: description.into(),
            unit: None,
            prices,
            roles: JobRoles::default(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_unit(mut self, unit: BillingUnit) -> Self {
        self.unit = Some(unit);
        self
    }

    pub fn validate(&self) -> Result<(), CatalogError> {
        if self.name.trim().is_empty() {
            return Err(CatalogError::MissingField("name"));
        }
        for (unit, rate) in self.prices.iter() {
            if rate < Decimal::ZERO {
                return Err(CatalogError::invalid_rate(unit.as_str(), "must not be negative"));
            }
            if rate > MAX_AMOUNT {
                return Err(CatalogError::invalid_rate(unit.as_str(), "is too large"));
            }
        }
        Ok(())
    }
}
