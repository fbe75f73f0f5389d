//! Usage metrics and cost tracking across the pipeline.

use crate::helpers::{manager_with, manager_with_cost_caps, CNJ, CNJ_DIGITS};
use crate::mock_providers::{MockEscavador, MockJudit};
use juris_config::CostAlertConfig;
use juris_core::{Operation, SearchOptions};
use juris_manager::CostAlertKind;
use pretty_assertions::assert_eq;
use std::time::Duration;

const TRAILING_DAY: Duration = Duration::from_secs(86_400);

const OTHER_CNJ: &str = "7654321-09.2022.8.26.0224";
const OTHER_CNJ_DIGITS: &str = "76543210920228260224";

#[tokio::test]
async fn successful_call_records_cost_and_latency() {
    let escavador = MockEscavador::start().await;
    escavador.mock_process_ok(CNJ_DIGITS).await;

    let manager = manager_with(vec![escavador.config()]);
    manager
        .search_process(CNJ, &SearchOptions::default())
        .await
        .unwrap();

    let summary = manager.usage_summary(Some("escavador"), None);
    assert_eq!(summary.total_calls, 1);
    assert_eq!(summary.successful_calls, 1);
    assert!((summary.total_cost - 0.30).abs() < 1e-9);
    manager.shutdown();
}

#[tokio::test]
async fn failed_attempts_cost_nothing() {
    let escavador = MockEscavador::start().await;
    let judit = MockJudit::start().await;
    escavador.mock_process_error(CNJ_DIGITS, 503).await;
    judit.mock_search_ok(CNJ_DIGITS).await;

    let manager = manager_with(vec![escavador.config(), judit.config()]);
    manager
        .search_process(CNJ, &SearchOptions::default())
        .await
        .unwrap();

    let summary = manager.usage_summary(None, None);
    // Three failed attempts on the primary plus one success on the
    // fallback; only the success is charged.
    assert_eq!(summary.failed_calls, 3);
    assert_eq!(summary.successful_calls, 1);
    assert!((summary.total_cost - 0.90).abs() < 1e-9);

    let breakdown = manager.cost_summary(TRAILING_DAY).breakdown;
    assert!((breakdown.by_provider["judit"] - 0.90).abs() < 1e-9);
    assert_eq!(breakdown.by_provider.get("escavador"), Some(&0.0));
    manager.shutdown();
}

#[tokio::test]
async fn cache_hits_show_up_in_the_summary() {
    let escavador = MockEscavador::start().await;
    escavador.mock_process_ok(CNJ_DIGITS).await;

    let manager = manager_with(vec![escavador.config()]);
    let options = SearchOptions::default();
    manager.search_process(CNJ, &options).await.unwrap();
    manager.search_process(CNJ, &options).await.unwrap();

    let summary = manager.usage_summary(None, None);
    assert_eq!(summary.total_calls, 1);
    assert!((summary.cache_hit_rate - 0.5).abs() < f64::EPSILON);
    manager.shutdown();
}

#[tokio::test]
async fn hourly_cap_breach_raises_an_alert() {
    let escavador = MockEscavador::start().await;
    escavador.mock_process_ok(CNJ_DIGITS).await;
    escavador.mock_process_ok(OTHER_CNJ_DIGITS).await;

    let manager = manager_with_cost_caps(
        vec![escavador.config()],
        CostAlertConfig {
            hourly_cap: Some(0.5),
            ..CostAlertConfig::default()
        },
    );
    let options = SearchOptions::default();
    manager.search_process(CNJ, &options).await.unwrap();
    manager.search_process(OTHER_CNJ, &options).await.unwrap();

    let summary = manager.cost_summary(TRAILING_DAY);
    assert!((summary.breakdown.total - 0.60).abs() < 1e-9);
    assert_eq!(summary.alerts.len(), 1);
    assert_eq!(summary.alerts[0].kind, CostAlertKind::Hourly);
    manager.shutdown();
}

#[tokio::test]
async fn operation_cap_names_the_operation() {
    let escavador = MockEscavador::start().await;
    escavador.mock_process_ok(CNJ_DIGITS).await;

    let mut config = CostAlertConfig::default();
    config
        .operation_caps
        .insert(Operation::SearchProcess, 0.10);
    let manager = manager_with_cost_caps(vec![escavador.config()], config);

    manager
        .search_process(CNJ, &SearchOptions::default())
        .await
        .unwrap();

    let summary = manager.cost_summary(TRAILING_DAY);
    assert_eq!(summary.alerts.len(), 1);
    assert_eq!(
        summary.alerts[0].kind,
        CostAlertKind::Operation(Operation::SearchProcess)
    );
    manager.shutdown();
}

#[tokio::test]
async fn csv_export_lists_recorded_calls() {
    let escavador = MockEscavador::start().await;
    escavador.mock_process_ok(CNJ_DIGITS).await;

    let manager = manager_with(vec![escavador.config()]);
    manager
        .search_process(CNJ, &SearchOptions::default())
        .await
        .unwrap();

    let csv = manager.metrics().export_csv();
    let mut lines = csv.lines();
    assert_eq!(
        lines.next(),
        Some("timestamp,provider,operation,success,latency_ms,cost,error")
    );
    let row = lines.next().unwrap();
    assert!(row.contains("escavador"));
    assert!(row.contains("search_process"));
    manager.shutdown();
}
