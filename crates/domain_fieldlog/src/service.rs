//! Driver log application service

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use tracing::{info, instrument, warn};

use core_kernel::{ActionId, DriverLogId, Money, Timezone, UserId};
use domain_catalog::{Action, CatalogPort, Contact, Job};

use crate::error::FieldLogError;
use crate::log::{DriverLog, LogEntryRequest, LogRefs};
use crate::ports::{LogPort, LogQuery};
use crate::pricing::{parse_quantity, LogPriceEngine, LogPricingInput};
use crate::timer::{TimerService, TimerState, TimerStop};

pub struct DriverLogService {
    logs: Arc<dyn LogPort>,
    catalog: Arc<dyn CatalogPort>,
    timers: Arc<TimerService>,
    engine: LogPriceEngine,
    timezone: Timezone,
}

impl DriverLogService {
    pub fn new(
        logs: Arc<dyn LogPort>,
        catalog: Arc<dyn CatalogPort>,
        timers: Arc<TimerService>,
        engine: LogPriceEngine,
    ) -> Self {
        Self {
            logs,
            catalog,
            timers,
            engine,
            timezone: Timezone::default(),
        }
    }

    /// Sets the timezone used to resolve calendar days when listing logs
    pub fn with_timezone(mut self, timezone: Timezone) -> Self {
        self.timezone = timezone;
        self
    }

    /// Records a new log entry for `driver_id`
    #[instrument(skip(self, request), fields(unit = ?request.unit))]
    pub async fn record(&self, driver_id: UserId, request: LogEntryRequest) -> Result<DriverLog, FieldLogError> {
        let entry = self.prepare(driver_id, request).await?;
        let log = DriverLog::from_request(
            driver_id,
            entry.request,
            LogRefs {
                contact: &entry.contact,
                action: &entry.action,
                job: &entry.job,
            },
            &self.engine,
            Utc::now(),
        )?;

        let log = self
            .logs
            .insert_log(log)
            .await
            .map_err(|e| FieldLogError::from_port("save log", e))?;
        self.finish_timer(driver_id, entry.timer).await;
        info!(log_id = %log.id, total = %log.total_price, "Driver log recorded");
        Ok(log)
    }

    /// Replaces the fields of an existing entry and reprices it
    #[instrument(skip(self, request))]
    pub async fn edit(&self, id: DriverLogId, request: LogEntryRequest) -> Result<DriverLog, FieldLogError> {
        let mut log = self.get(id).await?;
        let driver_id = log.driver_id;
        let entry = self.prepare(driver_id, request).await?;
        log.apply(
            entry.request,
            LogRefs {
                contact: &entry.contact,
                action: &entry.action,
                job: &entry.job,
            },
            &self.engine,
            Utc::now(),
        )?;

        let log = self
            .logs
            .update_log(log)
            .await
            .map_err(|e| FieldLogError::from_port("update log", e))?;
        self.finish_timer(driver_id, entry.timer).await;
        info!(log_id = %log.id, total = %log.total_price, "Driver log updated");
        Ok(log)
    }

    pub async fn get(&self, id: DriverLogId) -> Result<DriverLog, FieldLogError> {
        self.logs
            .get_log(id)
            .await
            .map_err(|e| FieldLogError::from_port("load log", e))
    }

    /// A driver's logs, optionally limited to one calendar day
    pub async fn list_for_driver(
        &self,
        driver_id: UserId,
        day: Option<NaiveDate>,
    ) -> Result<Vec<DriverLog>, FieldLogError> {
        let mut query = LogQuery::for_driver(driver_id);
        if let Some(day) = day {
            let (from, to) = self
                .timezone
                .day_bounds(day)
                .map_err(|e| FieldLogError::Validation(e.to_string()))?;
            query = query.between(from, to);
        }
        self.logs
            .list_logs(query)
            .await
            .map_err(|e| FieldLogError::from_port("load logs", e))
    }

    /// Prices an entry without recording it
    pub async fn quote(
        &self,
        action_id: ActionId,
        request: &LogEntryRequest,
    ) -> Result<Money, FieldLogError> {
        let action = self
            .catalog
            .get_action(action_id)
            .await
            .map_err(|e| FieldLogError::from_port("load action", e))?;
        Ok(self.engine.price(&LogPricingInput {
            prices: Some(&action.prices),
            unit: request.unit,
            quantity: request.quantity.as_deref().map(parse_quantity),
            start_time: request.start_time,
            end_time: request.end_time,
        }))
    }

    pub async fn timer_status(&self, driver_id: UserId) -> TimerState {
        self.timers.status(driver_id).await
    }

    pub async fn start_timer(&self, driver_id: UserId) -> TimerState {
        let previous = self.timers.start(driver_id, Utc::now()).await;
        if previous.is_running() {
            warn!(driver = %driver_id, "Timer already running");
        }
        previous
    }

    pub async fn stop_timer(&self, driver_id: UserId) -> TimerStop {
        self.timers.stop(driver_id, Utc::now()).await
    }

    /// Validates a request and resolves its catalog references
    ///
    /// A time-based entry missing its start or end time takes them from the
    /// driver's running timer. The timer keeps running until the entry is
    /// stored.
    async fn prepare(&self, driver_id: UserId, mut request: LogEntryRequest) -> Result<PreparedEntry, FieldLogError> {
        let timer = self.timers.status(driver_id).await;
        request.validate(timer.is_running())?;

        let (Some(contact_id), Some(action_id), Some(job_id), Some(unit)) =
            (request.contact_id, request.action_id, request.job_id, request.unit)
        else {
            return Err(FieldLogError::MissingFields(vec!["contact_id", "action_id", "job_id", "unit"]));
        };

        let contact = self
            .catalog
            .get_contact(contact_id)
            .await
            .map_err(|e| FieldLogError::from_port("load contact", e))?;
        let action = self
            .catalog
            .get_action(action_id)
            .await
            .map_err(|e| FieldLogError::from_port("load action", e))?;
        let job = self
            .catalog
            .get_job(job_id)
            .await
            .map_err(|e| FieldLogError::from_port("load job", e))?;

        if !action.prices.is_available(unit) {
            return Err(FieldLogError::UnitUnavailable {
                unit,
                action: action.name.clone(),
            });
        }

        let mut finishes = None;
        if unit.is_time_based() {
            if let Some(started_at) = timer.started_at() {
                request.start_time.get_or_insert(started_at);
                if request.end_time.is_none() {
                    request.end_time = Some(Utc::now());
                    finishes = Some(started_at);
                }
            }
            if request.end_time.is_none() {
                return Err(FieldLogError::MissingFields(vec!["end_time"]));
            }
        }

        Ok(PreparedEntry {
            request,
            contact,
            action,
            job,
            timer: finishes,
        })
    }

    /// Stops the timer whose stop instant an entry just recorded
    async fn finish_timer(&self, driver_id: UserId, started_at: Option<DateTime<Utc>>) {
        let Some(started_at) = started_at else {
            return;
        };
        if !self.timers.finish(driver_id, started_at, Utc::now()).await {
            warn!(driver = %driver_id, "Timer changed while the log entry was saved");
        }
    }
}

/// A validated request with its catalog records
struct PreparedEntry {
    request: LogEntryRequest,
    contact: Contact,
    action: Action,
    job: Job,
    /// Start of the running timer this entry closes
    timer: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::mock::MockLogPort;
    use chrono::{Duration, TimeZone};
    use domain_catalog::{ActionPrices, BillingUnit, JobRoles, MockCatalogPort};
    use rust_decimal_macros::dec;

    struct Fixture {
        service: DriverLogService,
        logs: MockLogPort,
        contact: Contact,
        action: Action,
        job: Job,
    }

    async fn fixture() -> Fixture {
        let contact = Contact::new("Lakeside Estates");
        let action = Action::new(
            "Topsoil",
            "",
            ActionPrices::new()
                .with(BillingUnit::Bag, dec!(5))
                .with(BillingUnit::Hour, dec!(10)),
        );
        let job = Job::new("Driver", "", JobRoles::driver());
        let catalog = MockCatalogPort::new()
            .with_contact(contact.clone())
            .await
            .with_action(action.clone())
            .await
            .with_job(job.clone())
            .await;
        let logs = MockLogPort::new();
        let service = DriverLogService::new(
            Arc::new(logs.clone()),
            Arc::new(catalog),
            Arc::new(TimerService::new()),
            LogPriceEngine::default(),
        );
        Fixture {
            service,
            logs,
            contact,
            action,
            job,
        }
    }

    fn request(f: &Fixture, unit: BillingUnit) -> LogEntryRequest {
        LogEntryRequest {
            contact_id: Some(f.contact.id),
            action_id: Some(f.action.id),
            job_id: Some(f.job.id),
            unit: Some(unit),
            description: "Back yard".to_string(),
            signature: "signed".to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_record_bag_entry() {
        let f = fixture().await;
        let mut req = request(&f, BillingUnit::Bag);
        req.quantity = Some("3".to_string());

        let driver = UserId::new();
        let log = f.service.record(driver, req).await.unwrap();

        assert_eq!(log.total_price.amount(), dec!(15.00));
        assert_eq!(log.quantity, Some(dec!(3)));
        assert_eq!(f.service.list_for_driver(driver, None).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_running_timer_supplies_end_time() {
        let f = fixture().await;
        let driver = UserId::new();
        f.service.start_timer(driver).await;

        let mut req = request(&f, BillingUnit::Hour);
        req.start_time = Some(Utc::now() - Duration::hours(2));
        let log = f.service.record(driver, req).await.unwrap();

        assert!(log.end_time.is_some());
        assert!(log.total_price.amount() >= dec!(20.00));
        assert!(!f.service.timer_status(driver).await.is_running());
    }

    #[tokio::test]
    async fn test_unavailable_unit_keeps_timer_running() {
        let f = fixture().await;
        let driver = UserId::new();
        f.service.start_timer(driver).await;

        let mut req = request(&f, BillingUnit::Day);
        req.start_time = Some(Utc::now());
        let err = f.service.record(driver, req).await.unwrap_err();

        assert!(matches!(err, FieldLogError::UnitUnavailable { .. }));
        assert!(f.service.timer_status(driver).await.is_running());
    }

    #[tokio::test]
    async fn test_running_timer_supplies_start_time() {
        let f = fixture().await;
        let driver = UserId::new();
        let started_at = Utc::now() - Duration::minutes(90);
        f.service.timers.start(driver, started_at).await;

        let log = f.service.record(driver, request(&f, BillingUnit::Hour)).await.unwrap();

        assert_eq!(log.start_time, Some(started_at));
        assert!(log.total_price.amount() >= dec!(15.00));
        assert!(!f.service.timer_status(driver).await.is_running());
    }

    #[tokio::test]
    async fn test_failed_save_keeps_timer_running() {
        let f = fixture().await;
        let driver = UserId::new();
        f.service.start_timer(driver).await;
        f.logs.fail_writes(true);

        let err = f.service.record(driver, request(&f, BillingUnit::Hour)).await.unwrap_err();

        assert!(matches!(err, FieldLogError::Persistence { .. }));
        assert!(f.service.timer_status(driver).await.is_running());
        f.logs.fail_writes(false);
        let log = f.service.record(driver, request(&f, BillingUnit::Hour)).await.unwrap();
        assert!(log.end_time.is_some());
        assert!(!f.service.timer_status(driver).await.is_running());
    }

    #[tokio::test]
    async fn test_failed_update_keeps_timer_running() {
        let f = fixture().await;
        let driver = UserId::new();
        let mut req = request(&f, BillingUnit::Bag);
        req.quantity = Some("2".to_string());
        let log = f.service.record(driver, req).await.unwrap();

        f.service.start_timer(driver).await;
        f.logs.fail_writes(true);
        let err = f.service.edit(log.id, request(&f, BillingUnit::Hour)).await.unwrap_err();

        assert!(matches!(err, FieldLogError::Persistence { .. }));
        assert!(f.service.timer_status(driver).await.is_running());
    }

    #[tokio::test]
    async fn test_missing_end_time_without_timer() {
        let f = fixture().await;
        let mut req = request(&f, BillingUnit::Hour);
        req.start_time = Some(Utc::now());
        let err = f.service.record(UserId::new(), req).await.unwrap_err();
        assert!(err.is_validation());
    }

    #[tokio::test]
    async fn test_edit_reprices() {
        let f = fixture().await;
        let mut req = request(&f, BillingUnit::Bag);
        req.quantity = Some("2".to_string());
        let log = f.service.record(UserId::new(), req.clone()).await.unwrap();

        req.quantity = Some("7".to_string());
        let edited = f.service.edit(log.id, req).await.unwrap();

        assert_eq!(edited.total_price.amount(), dec!(35.00));
        assert_eq!(edited.created_at, log.created_at);
    }

    #[tokio::test]
    async fn test_list_for_day_uses_calendar_bounds() {
        let f = fixture().await;
        let driver = UserId::new();
        let mut req = request(&f, BillingUnit::Bag);
        req.quantity = Some("1".to_string());
        let log = f.service.record(driver, req).await.unwrap();

        // Backdate a second entry to the previous day
        let mut old = log.clone();
        old.id = DriverLogId::new();
        old.created_at = Utc.with_ymd_and_hms(2020, 1, 1, 23, 59, 59).unwrap();
        f.logs.insert_log(old).await.unwrap();

        let today = log.created_at.date_naive();
        let listed = f.service.list_for_driver(driver, Some(today)).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, log.id);

        let all = f.service.list_for_driver(driver, None).await.unwrap();
        assert_eq!(all.len(), 2);
    }
}
