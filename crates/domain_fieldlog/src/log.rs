//! Driver log entries

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use core_kernel::{ActionId, ContactId, DriverLogId, JobId, Money, UserId, MAX_AMOUNT};
use domain_catalog::{Action, BillingUnit, Contact, Job};

use crate::error::FieldLogError;
use crate::pricing::{parse_quantity, LogDuration, LogPriceEngine, LogPricingInput};

/// A log entry as submitted by a driver
///
/// `quantity` is kept as entered; it is parsed when the entry is priced.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LogEntryRequest {
    pub contact_id: Option<ContactId>,
    pub action_id: Option<ActionId>,
    pub job_id: Option<JobId>,
    pub unit: Option<BillingUnit>,
    pub quantity: Option<String>,
    pub description: String,
    /// Captured signature image, usually a data URL
    pub signature: String,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
}

impl LogEntryRequest {
    /// Lists the required fields that are missing
    ///
    /// A time-based entry without start or end time is accepted while the
    /// driver's timer is running; the timer's start and stop instants fill
    /// them in.
    pub fn missing_fields(&self, timer_running: bool) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.contact_id.is_none() {
            missing.push("contact_id");
        }
        if self.action_id.is_none() {
            missing.push("action_id");
        }
        if self.job_id.is_none() {
            missing.push("job_id");
        }
        if self.unit.is_none() {
            missing.push("unit");
        }
        if self.description.trim().is_empty() {
            missing.push("description");
        }
        if self.signature.trim().is_empty() {
            missing.push("signature");
        }

        match self.unit {
            Some(unit) if unit.is_quantity_based() => {
                if self.quantity.as_deref().map_or(true, |q| q.trim().is_empty()) {
                    missing.push("quantity");
                }
            }
            Some(unit) if unit.is_time_based() => {
                if self.start_time.is_none() && !timer_running {
                    missing.push("start_time");
                }
                if self.end_time.is_none() && !timer_running {
                    missing.push("end_time");
                }
            }
            _ => {}
        }
        missing
    }

    /// Checks required fields, then that the quantity fits a stored amount
    pub fn validate(&self, timer_running: bool) -> Result<(), FieldLogError> {
        let missing = self.missing_fields(timer_running);
        if !missing.is_empty() {
            return Err(FieldLogError::MissingFields(missing));
        }
        if let Some(quantity) = self.parsed_quantity() {
            if quantity.abs() > MAX_AMOUNT {
                return Err(FieldLogError::Validation(format!(
                    "Quantity must be at most {}",
                    MAX_AMOUNT.normalize()
                )));
            }
        }
        Ok(())
    }

    /// The parsed quantity, for units billed by quantity
    pub fn parsed_quantity(&self) -> Option<Decimal> {
        match self.unit {
            Some(unit) if unit.is_quantity_based() => self.quantity.as_deref().map(parse_quantity),
            _ => None,
        }
    }
}

/// A stored driver log entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriverLog {
    pub id: DriverLogId,
    pub driver_id: UserId,
    pub contact_id: ContactId,
    pub contact_name: String,
    pub action_id: ActionId,
    pub action_name: String,
    pub job_id: JobId,
    pub job_name: String,
    pub unit: BillingUnit,
    pub quantity: Option<Decimal>,
    pub description: String,
    pub total_price: Money,
    pub signature: String,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    /// Billed duration, for hour and day entries
    pub duration: Option<LogDuration>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The catalog records a log entry refers to
pub struct LogRefs<'a> {
    pub contact: &'a Contact,
    pub action: &'a Action,
    pub job: &'a Job,
}

impl DriverLog {
    /// Builds a priced entry from a validated request
    ///
    /// `end_time` overrides the request's end time (the timer stop instant).
    pub fn from_request(
        driver_id: UserId,
        request: LogEntryRequest,
        refs: LogRefs<'_>,
        engine: &LogPriceEngine,
        now: DateTime<Utc>,
    ) -> Result<Self, FieldLogError> {
        let mut log = DriverLog {
            id: DriverLogId::new_v7(),
            driver_id,
            contact_id: refs.contact.id,
            contact_name: String::new(),
            action_id: refs.action.id,
            action_name: String::new(),
            job_id: refs.job.id,
            job_name: String::new(),
            unit: BillingUnit::Trip,
            quantity: None,
            description: String::new(),
            total_price: Money::zero(engine.currency()),
            signature: String::new(),
            start_time: None,
            end_time: None,
            duration: None,
            created_at: now,
            updated_at: now,
        };
        log.apply(request, refs, engine, now)?;
        Ok(log)
    }

    /// Replaces the entry's fields with `request` and reprices it
    pub fn apply(
        &mut self,
        request: LogEntryRequest,
        refs: LogRefs<'_>,
        engine: &LogPriceEngine,
        now: DateTime<Utc>,
    ) -> Result<(), FieldLogError> {
        let unit = request
            .unit
            .ok_or_else(|| FieldLogError::MissingFields(vec!["unit"]))?;
        if !refs.action.prices.is_available(unit) {
            return Err(FieldLogError::UnitUnavailable {
                unit,
                action: refs.action.name.clone(),
            });
        }

        let quantity = request.parsed_quantity();
        let (start_time, end_time) = if unit.is_time_based() {
            (request.start_time, request.end_time)
        } else {
            (None, None)
        };

        self.total_price = engine.price(&LogPricingInput {
            prices: Some(&refs.action.prices),
            unit: Some(unit),
            quantity,
            start_time,
            end_time,
        });
        self.duration = LogDuration::for_entry(unit, start_time, end_time);
        self.contact_id = refs.contact.id;
        self.contact_name = refs.contact.name.clone();
        self.action_id = refs.action.id;
        self.action_name = refs.action.name.clone();
        self.job_id = refs.job.id;
        self.job_name = refs.job.name.clone();
        self.unit = unit;
        self.quantity = quantity;
        self.description = request.description;
        self.signature = request.signature;
        self.start_time = start_time;
        self.end_time = end_time;
        self.updated_at = now;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use core_kernel::TimeUnit;
    use domain_catalog::{ActionPrices, JobRoles};
    use rust_decimal_macros::dec;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 4, 2, 8, 0, 0).unwrap()
    }

    fn catalog() -> (Contact, Action, Job) {
        let contact = Contact::new("Greenway Farms");
        let action = Action::new(
            "Hauling",
            "",
            ActionPrices::new()
                .with(BillingUnit::Hour, dec!(65))
                .with(BillingUnit::Trip, dec!(120)),
        );
        let job = Job::new("Driver", "", JobRoles::driver());
        (contact, action, job)
    }

    fn request(unit: BillingUnit) -> LogEntryRequest {
        LogEntryRequest {
            contact_id: Some(ContactId::new()),
            action_id: Some(ActionId::new()),
            job_id: Some(JobId::new()),
            unit: Some(unit),
            quantity: None,
            description: "Gravel run".to_string(),
            signature: "data:image/png;base64,iVBOR".to_string(),
            start_time: None,
            end_time: None,
        }
    }

    #[test]
    fn test_missing_fields_for_empty_request() {
        let missing = LogEntryRequest::default().missing_fields(false);
        assert_eq!(
            missing,
            vec!["contact_id", "action_id", "job_id", "unit", "description", "signature"]
        );
    }

    #[test]
    fn test_quantity_required_for_bags() {
        let mut req = request(BillingUnit::Bag);
        assert_eq!(req.missing_fields(false), vec!["quantity"]);
        req.quantity = Some("  ".to_string());
        assert_eq!(req.missing_fields(false), vec!["quantity"]);
        req.quantity = Some("4".to_string());
        assert!(req.missing_fields(false).is_empty());
    }

    #[test]
    fn test_running_timer_stands_in_for_times() {
        let mut req = request(BillingUnit::Hour);
        assert_eq!(req.missing_fields(false), vec!["start_time", "end_time"]);
        assert!(req.missing_fields(true).is_empty());
        req.start_time = Some(t0());
        assert_eq!(req.missing_fields(false), vec!["end_time"]);
    }

    #[test]
    fn test_quantity_beyond_stored_range_rejected() {
        let mut req = request(BillingUnit::Bag);
        req.quantity = Some("79228162514264337593543950335".to_string());
        let err = req.validate(false).unwrap_err();
        assert!(matches!(err, FieldLogError::Validation(_)));

        req.quantity = Some("1e14".to_string());
        assert!(req.validate(false).is_ok());
        req.quantity = Some("-1e16".to_string());
        assert!(req.validate(false).is_err());
    }

    #[test]
    fn test_hourly_entry_priced_with_duration() {
        let (contact, action, job) = catalog();
        let mut req = request(BillingUnit::Hour);
        req.start_time = Some(t0());
        req.end_time = Some(t0() + Duration::minutes(90));

        let log = DriverLog::from_request(
            UserId::new(),
            req,
            LogRefs { contact: &contact, action: &action, job: &job },
            &LogPriceEngine::default(),
            t0(),
        )
        .unwrap();

        assert_eq!(log.total_price.amount(), dec!(97.50));
        assert_eq!(log.duration.map(|d| (d.value, d.unit)), Some((dec!(1.5), TimeUnit::Hours)));
        assert_eq!(log.contact_name, "Greenway Farms");
    }

    #[test]
    fn test_trip_entry_drops_times() {
        let (contact, action, job) = catalog();
        let mut req = request(BillingUnit::Trip);
        req.start_time = Some(t0());

        let log = DriverLog::from_request(
            UserId::new(),
            req,
            LogRefs { contact: &contact, action: &action, job: &job },
            &LogPriceEngine::default(),
            t0(),
        )
        .unwrap();

        assert_eq!(log.total_price.amount(), dec!(120.00));
        assert_eq!(log.start_time, None);
        assert_eq!(log.duration, None);
    }

    #[test]
    fn test_unit_without_rate_rejected() {
        let (contact, action, job) = catalog();
        let mut req = request(BillingUnit::Gallon);
        req.quantity = Some("10".to_string());

        let err = DriverLog::from_request(
            UserId::new(),
            req,
            LogRefs { contact: &contact, action: &action, job: &job },
            &LogPriceEngine::default(),
            t0(),
        )
        .unwrap_err();
        assert!(matches!(err, FieldLogError::UnitUnavailable { .. }));
    }
}
