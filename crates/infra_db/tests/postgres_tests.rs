//! PostgreSQL adapter tests
//!
//! Each test starts its own container; run with `cargo test -- --ignored`
//! on a machine with Docker.

use std::sync::Arc;

use rust_decimal_macros::dec;

use core_kernel::{AdapterHealth, Currency, HealthCheckable, PortError, UserId};
use domain_billing::{InvoiceNumber, InvoicePort};
use domain_catalog::{CatalogPort, JobFilter, UserAccount, UserPort, UserRoles};
use domain_fieldlog::{DriverLogService, LogPriceEngine, TimerService};
use domain_rental::{OrderPriceEngine, OrderService, OrderStatus};
use infra_db::{
    PostgresCatalogAdapter, PostgresDriverLogAdapter, PostgresInvoiceAdapter, PostgresOrderAdapter,
    PostgresUserAdapter,
};
use test_utils::*;

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_catalog_round_trip() {
    let db = create_isolated_test_database().await.unwrap();
    let catalog = PostgresCatalogAdapter::new(db.pool().clone());

    let equipment = catalog.save_equipment(CatalogFixtures::excavator()).await.unwrap();
    let stored = catalog.get_equipment(equipment.id).await.unwrap();
    assert_eq!(stored.prices, CatalogFixtures::excavator_prices());

    catalog.save_job(CatalogFixtures::operator_job()).await.unwrap();
    catalog.save_job(CatalogFixtures::driver_job()).await.unwrap();
    let orderable = catalog.list_jobs(JobFilter::for_orders()).await.unwrap();
    assert_eq!(orderable.len(), 1);

    let action = catalog.save_action(CatalogFixtures::hauling_action()).await.unwrap();
    assert_eq!(catalog.get_action(action.id).await.unwrap().prices, action.prices);

    catalog.delete_equipment(equipment.id).await.unwrap();
    assert_not_found(catalog.get_equipment(equipment.id).await);

    assert_eq!(catalog.health_check().await.status, AdapterHealth::Healthy);
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_user_accounts_keep_role_flags() {
    let db = create_isolated_test_database().await.unwrap();
    let users = PostgresUserAdapter::new(db.pool().clone());

    let roles = UserRoles {
        is_driver: true,
        is_equipment_man: true,
        ..Default::default()
    };
    let crew = users.save_user(UserAccount::new("crew@fieldops.example", roles)).await.unwrap();
    assert_eq!(users.get_user(crew.id).await.unwrap().roles, roles);

    let clash = users
        .save_user(UserAccount::new("crew@fieldops.example", UserRoles::default()))
        .await;
    assert!(matches!(clash, Err(PortError::Conflict { .. })));

    let mut shouting = UserAccount::new("office@fieldops.example", UserRoles::default());
    shouting.email = "Office@FieldOps.example".into();
    assert_validation_error(users.save_user(shouting).await, None);

    users.delete_user(crew.id).await.unwrap();
    assert_not_found(users.get_user(crew.id).await);
    assert!(users.list_users().await.unwrap().is_empty());
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_order_completion_is_persisted() {
    let db = create_isolated_test_database().await.unwrap();
    let catalog = Arc::new(PostgresCatalogAdapter::new(db.pool().clone()));
    let equipment = catalog.save_equipment(CatalogFixtures::excavator()).await.unwrap();
    let job = catalog.save_job(CatalogFixtures::operator_job()).await.unwrap();

    let service = OrderService::new(
        Arc::new(PostgresOrderAdapter::new(db.pool().clone())),
        catalog,
        OrderPriceEngine::new(Currency::USD),
    );
    let order = service
        .create(UserId::new(), OrderDraftBuilder::new(&equipment, &job).build())
        .await
        .unwrap();

    // 2 days at 300/day
    let draft = OrderDraftBuilder::new(&equipment, &job)
        .completed_between(TemporalFixtures::pending(), TemporalFixtures::days_after_pending(2))
        .build();
    service.update(order.id, draft).await.unwrap();

    let stored = service.get(order.id).await.unwrap();
    assert_eq!(stored.status, OrderStatus::Completed);
    assert_money_eq(&stored.price, &MoneyFixtures::usd(dec!(600)));

    service.delete(order.id).await.unwrap();
    assert!(service.get(order.id).await.is_err());
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_driver_logs_are_listed_per_driver() {
    let db = create_isolated_test_database().await.unwrap();
    let catalog = Arc::new(PostgresCatalogAdapter::new(db.pool().clone()));
    let contact = catalog.save_contact(CatalogFixtures::contact()).await.unwrap();
    let action = catalog.save_action(CatalogFixtures::hauling_action()).await.unwrap();
    let job = catalog.save_job(CatalogFixtures::driver_job()).await.unwrap();

    let service = DriverLogService::new(
        Arc::new(PostgresDriverLogAdapter::new(db.pool().clone())),
        catalog,
        Arc::new(TimerService::new()),
        LogPriceEngine::new(Currency::USD),
    );
    let driver = UserId::new();
    let log = service
        .record(driver, LogEntryBuilder::new(&contact, &action, &job).build())
        .await
        .unwrap();

    assert_money_eq(&service.get(log.id).await.unwrap().total_price, &MoneyFixtures::usd(dec!(20)));
    assert_eq!(service.list_for_driver(driver, None).await.unwrap().len(), 1);
    assert!(service.list_for_driver(UserId::new(), None).await.unwrap().is_empty());
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_unknown_invoice_is_not_found() {
    let db = create_isolated_test_database().await.unwrap();
    let invoices = PostgresInvoiceAdapter::new(db.pool().clone());

    let number = InvoiceNumber::parse("INV-1714560000123").unwrap();

    assert_not_found(invoices.get_invoice(&number).await);
    assert!(invoices.list_invoices(UserId::new()).await.unwrap().is_empty());
}
