//! Outbound rate limiting across requests and probes.

use crate::helpers::{manager_with, CNJ, CNJ_DIGITS};
use crate::mock_providers::MockEscavador;
use juris_core::SearchOptions;
use std::time::{Duration, Instant};

#[tokio::test]
async fn third_call_in_the_window_waits_for_the_reset() {
    let escavador = MockEscavador::start().await;
    escavador.mock_process_ok(CNJ_DIGITS).await;
    let config = escavador
        .config()
        .with_rate_limit(2, Duration::from_millis(300));

    let manager = manager_with(vec![config]);
    let options = SearchOptions::default().with_cache(false);

    let started = Instant::now();
    for _ in 0..3 {
        manager.search_process(CNJ, &options).await.unwrap();
    }
    let elapsed = started.elapsed();

    // The third call cannot start before the 300ms window rolls over.
    assert!(
        elapsed >= Duration::from_millis(300),
        "third call completed after only {elapsed:?}"
    );
    assert_eq!(
        escavador
            .requests_to(&format!("/api/v2/processos/{CNJ_DIGITS}"))
            .await,
        3
    );
    manager.shutdown();
}

#[tokio::test]
async fn health_probes_consume_the_same_budget() {
    let escavador = MockEscavador::start().await;
    escavador.mock_status(800.0, 1_000.0).await;
    escavador.mock_process_ok(CNJ_DIGITS).await;
    let config = escavador
        .config()
        .with_rate_limit(1, Duration::from_millis(300));

    let manager = manager_with(vec![config]);
    let options = SearchOptions::default().with_cache(false);

    // A probe takes the only slot in the window, so the request that
    // follows has to wait for the reset.
    let started = Instant::now();
    manager.refresh_health().await;
    manager.search_process(CNJ, &options).await.unwrap();
    let elapsed = started.elapsed();

    assert!(
        elapsed >= Duration::from_millis(300),
        "request was not delayed by the probe ({elapsed:?})"
    );
    manager.shutdown();
}
