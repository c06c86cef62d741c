//! End-to-end monitoring cycles against the in-memory store and transport.

mod helpers;

use std::collections::BTreeSet;
use std::sync::Arc;

use serde_json::json;

use chemtrack_core::config::{AppConfig, StoreProvider, TransportProvider};
use chemtrack_database::MemoryRecordStore;
use chemtrack_monitor::{ChemicalMonitor, CycleOutcome};
use chemtrack_notify::transport::memory::{Channel, Delivery};

use helpers::{CONFIG_PATH, TestMonitor, at};

fn recipients(deliveries: &[Delivery], channel: Channel) -> BTreeSet<String> {
    deliveries
        .iter()
        .filter(|d| d.channel == channel)
        .map(|d| d.recipient.clone())
        .collect()
}

#[tokio::test]
async fn test_seeded_cycle_report() {
    let app = TestMonitor::seeded().await;
    let report = app.run_at(at(2024, 6, 1)).await;

    assert_eq!(report.documents_scanned, 5);
    assert_eq!(report.records_skipped, 1);
    assert_eq!(report.organizations_alerted, 2);
    assert_eq!(report.conditions.low_stock, 2);
    assert_eq!(report.conditions.expired, 1);
    assert_eq!(report.conditions.expiring_soon, 2);
    assert_eq!(report.delivery.emails_sent, 3);
    assert_eq!(report.delivery.pushes_sent, 2);
    assert_eq!(report.delivery.failures(), 0);
}

#[tokio::test]
async fn test_seeded_cycle_reaches_admins_and_masters() {
    let app = TestMonitor::seeded().await;
    app.run_at(at(2024, 6, 1)).await;

    let deliveries = app.transport.deliveries();
    assert_eq!(
        recipients(&deliveries, Channel::Email),
        BTreeSet::from([
            "admin@lincoln.example".to_string(),
            "safety@district.example".to_string(),
        ])
    );
    assert_eq!(
        recipients(&deliveries, Channel::Push),
        BTreeSet::from([
            "ExponentPushToken[lincoln-admin]".to_string(),
            "ExponentPushToken[roosevelt-admin]".to_string(),
        ])
    );

    // The district master gets one email per alerted school.
    let district: Vec<&Delivery> = deliveries
        .iter()
        .filter(|d| d.recipient == "safety@district.example")
        .collect();
    assert_eq!(district.len(), 2);
    let subjects: BTreeSet<&str> = district.iter().map(|d| d.title.as_str()).collect();
    assert!(subjects.contains("Chemical Alert Report for Lincoln High"));
    assert!(subjects.contains("Chemical Alert Report for Roosevelt"));
}

#[tokio::test]
async fn test_alert_content_per_organization() {
    let app = TestMonitor::seeded().await;
    app.run_at(at(2024, 6, 1)).await;

    let deliveries = app.transport.deliveries();
    let lincoln_email = deliveries
        .iter()
        .find(|d| d.recipient == "admin@lincoln.example")
        .expect("lincoln email");
    assert!(lincoln_email.body.contains("CAS Number: 67641"));
    assert!(lincoln_email.body.contains("LOW STOCK ALERT"));
    assert!(lincoln_email.body.contains("EXPIRED CHEMICAL ALERT"));
    assert!(!lincoln_email.body.contains("64175"));

    let roosevelt_push = deliveries
        .iter()
        .find(|d| d.recipient == "ExponentPushToken[roosevelt-admin]")
        .expect("roosevelt push");
    assert_eq!(roosevelt_push.title, "Chemical Alert Report for Roosevelt");
    assert_eq!(
        roosevelt_push.body,
        "2 alerts: 1 low stock, 0 expired, 1 expiring soon"
    );
}

#[tokio::test]
async fn test_cycles_are_repeatable() {
    let app = TestMonitor::seeded().await;
    let first = app.run_at(at(2024, 6, 1)).await;
    let second = app.run_at(at(2024, 6, 1)).await;

    assert_ne!(first.cycle_id, second.cycle_id);
    assert_eq!(first.conditions, second.conditions);
    assert_eq!(second.delivery.emails_sent, first.delivery.emails_sent);
    assert_eq!(app.transport.count(Channel::Email), 6);
}

#[tokio::test]
async fn test_later_reference_date_changes_conditions() {
    let app = TestMonitor::seeded().await;
    let report = app.run_at(at(2031, 1, 1)).await;

    // Ethanol (2030-01-01) and HCl (2024-09-15) are now expired as well.
    assert_eq!(report.conditions.expired, 3);
    assert_eq!(report.conditions.expiring_soon, 4);
    assert_eq!(report.conditions.low_stock, 2);
}

#[tokio::test]
async fn test_new_records_are_picked_up_next_cycle() {
    let app = TestMonitor::seeded().await;
    app.run_at(at(2024, 6, 1)).await;

    app.store.insert_value(
        "chemicals",
        "chem-new",
        json!({"CAS": 7664939, "school": "Jefferson", "expiration_date": "2030-01-01", "quantity": "Low"}),
    );
    let report = app.run_at(at(2024, 6, 1)).await;

    assert_eq!(report.organizations_alerted, 3);
    let jefferson = app
        .transport
        .deliveries()
        .into_iter()
        .filter(|d| d.title == "Chemical Alert Report for Jefferson")
        .count();
    assert_eq!(jefferson, 1);
}

#[tokio::test]
async fn test_failing_recipient_is_isolated() {
    let app = TestMonitor::seeded().await;
    app.transport.fail_for("safety@district.example");

    let report = app.run_at(at(2024, 6, 1)).await;

    assert_eq!(report.delivery.emails_failed, 2);
    assert_eq!(report.delivery.emails_sent, 1);
    assert_eq!(report.delivery.pushes_sent, 2);
}

#[tokio::test]
async fn test_concurrency_setting_does_not_change_results() {
    let mut config = AppConfig::default();
    config.monitor.organization_concurrency = 1;
    let store = MemoryRecordStore::from_seed_file(helpers::SEED_PATH)
        .await
        .expect("seed");
    let app = TestMonitor::with_store(store, &config);

    let report = app.run_at(at(2024, 6, 1)).await;
    assert_eq!(report.delivery.emails_sent, 3);
    assert_eq!(report.delivery.pushes_sent, 2);
}

#[tokio::test]
async fn test_empty_store_completes_quietly() {
    let app = TestMonitor::with_store(MemoryRecordStore::new(), &AppConfig::default());
    let report = app.run_at(at(2024, 6, 1)).await;

    assert_eq!(report.documents_scanned, 0);
    assert!(app.transport.deliveries().is_empty());
}

#[tokio::test]
async fn test_sample_configuration_builds_monitor() {
    let mut config = AppConfig::load(CONFIG_PATH).expect("sample config loads");
    assert_eq!(config.store.provider, StoreProvider::Memory);
    assert_eq!(config.notify.provider, TransportProvider::Log);
    assert_eq!(config.monitor.interval_seconds, 30 * 24 * 60 * 60);

    config.store.seed_file = Some(helpers::SEED_PATH.to_string());
    let store = chemtrack_database::build_store(&config.store)
        .await
        .expect("store builds");
    let transport = chemtrack_notify::build_transport(&config.notify);
    let monitor = Arc::new(ChemicalMonitor::new(store, transport, &config));

    let outcome = monitor.trigger_at(at(2024, 6, 1)).await.expect("cycle runs");
    assert!(matches!(outcome, CycleOutcome::Completed(ref r) if r.organizations_alerted == 2));
}
