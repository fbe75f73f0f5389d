//! Selection behavior driven by live health probes.

use crate::helpers::{manager_with, CNJ, CNJ_DIGITS};
use crate::mock_providers::{MockEscavador, MockJudit};
use juris_core::SearchOptions;
use pretty_assertions::assert_eq;

#[tokio::test]
async fn zero_credit_provider_is_skipped() {
    let escavador = MockEscavador::start().await;
    let judit = MockJudit::start().await;
    escavador.mock_status(0.0, 1_000.0).await;
    escavador.mock_process_ok(CNJ_DIGITS).await;
    judit.mock_credits(500.0, 500.0).await;
    judit.mock_search_ok(CNJ_DIGITS).await;

    let manager = manager_with(vec![escavador.config(), judit.config()]);
    manager.refresh_health().await;

    let result = manager
        .search_process(CNJ, &SearchOptions::default())
        .await
        .unwrap();

    // Cheapest provider is out of credits, so the pricier one serves.
    assert_eq!(result.id, "judit-law-1");
    assert_eq!(
        escavador
            .requests_to(&format!("/api/v2/processos/{CNJ_DIGITS}"))
            .await,
        0
    );
    manager.shutdown();
}

#[tokio::test]
async fn provider_flips_unhealthy_after_three_failed_probes() {
    let escavador = MockEscavador::start().await;
    let judit = MockJudit::start().await;
    escavador.mock_status_error().await;
    judit.mock_credits(500.0, 500.0).await;
    judit.mock_search_ok(CNJ_DIGITS).await;

    let manager = manager_with(vec![escavador.config(), judit.config()]);

    manager.refresh_health().await;
    manager.refresh_health().await;
    let statuses = manager.refresh_health().await;

    let escavador_status = statuses.iter().find(|s| s.provider == "escavador").unwrap();
    assert!(!escavador_status.healthy);

    let result = manager
        .search_process(CNJ, &SearchOptions::default())
        .await
        .unwrap();
    assert_eq!(result.id, "judit-law-1");
    manager.shutdown();
}

#[tokio::test]
async fn provider_recovers_after_two_successful_probes() {
    let escavador = MockEscavador::start().await;
    escavador.mock_status_error().await;

    let manager = manager_with(vec![escavador.config()]);
    for _ in 0..3 {
        manager.refresh_health().await;
    }
    assert!(!manager.health_status()[0].healthy);

    // Backend comes back up.
    escavador.server.reset().await;
    escavador.mock_status(800.0, 1_000.0).await;

    manager.refresh_health().await;
    assert!(!manager.health_status()[0].healthy);
    manager.refresh_health().await;
    assert!(manager.health_status()[0].healthy);
    manager.shutdown();
}
