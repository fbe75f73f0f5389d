//! Caching behavior across the full pipeline.

use crate::helpers::{manager_with, CNJ, CNJ_DIGITS};
use crate::mock_providers::MockEscavador;
use chrono::{TimeZone, Utc};
use juris_core::SearchOptions;
use pretty_assertions::assert_eq;
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, ResponseTemplate};

#[tokio::test]
async fn zero_ttl_override_disables_reuse() {
    let escavador = MockEscavador::start().await;
    escavador.mock_process_ok(CNJ_DIGITS).await;

    let manager = manager_with(vec![escavador.config()]);
    let options = SearchOptions::default().with_cache_ttl(Duration::ZERO);

    manager.search_process(CNJ, &options).await.unwrap();
    manager.search_process(CNJ, &options).await.unwrap();

    assert_eq!(
        escavador
            .requests_to(&format!("/api/v2/processos/{CNJ_DIGITS}"))
            .await,
        2
    );
    manager.shutdown();
}

#[tokio::test]
async fn cache_disabled_never_reads_or_writes() {
    let escavador = MockEscavador::start().await;
    escavador.mock_process_ok(CNJ_DIGITS).await;

    let manager = manager_with(vec![escavador.config()]);
    let options = SearchOptions::default().with_cache(false);

    manager.search_process(CNJ, &options).await.unwrap();
    manager.search_process(CNJ, &options).await.unwrap();

    assert_eq!(
        escavador
            .requests_to(&format!("/api/v2/processos/{CNJ_DIGITS}"))
            .await,
        2
    );
    assert_eq!(manager.cache().stats().entries, 0);
    manager.shutdown();
}

#[tokio::test]
async fn movement_windows_cache_independently() {
    let escavador = MockEscavador::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v2/processos/proc-1/movimentacoes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [{"id": "m1", "data": "2023-05-10", "tipo": "despacho"}]
        })))
        .mount(&escavador.server)
        .await;

    let manager = manager_with(vec![escavador.config()]);
    let options = SearchOptions::default();
    let since = Utc.with_ymd_and_hms(2023, 5, 1, 0, 0, 0).unwrap();

    manager.track_movements("proc-1", None, &options).await.unwrap();
    manager
        .track_movements("proc-1", Some(since), &options)
        .await
        .unwrap();
    // Both windows now cached; repeats stay local.
    manager.track_movements("proc-1", None, &options).await.unwrap();
    manager
        .track_movements("proc-1", Some(since), &options)
        .await
        .unwrap();

    assert_eq!(
        escavador
            .requests_to("/api/v2/processos/proc-1/movimentacoes")
            .await,
        2
    );
    assert_eq!(manager.cache().stats().entries, 2);
    manager.shutdown();
}

#[tokio::test]
async fn clearing_the_cache_forces_a_refetch() {
    let escavador = MockEscavador::start().await;
    escavador.mock_process_ok(CNJ_DIGITS).await;

    let manager = manager_with(vec![escavador.config()]);
    let options = SearchOptions::default();

    manager.search_process(CNJ, &options).await.unwrap();
    manager.cache().clear();
    manager.search_process(CNJ, &options).await.unwrap();

    assert_eq!(
        escavador
            .requests_to(&format!("/api/v2/processos/{CNJ_DIGITS}"))
            .await,
        2
    );
    manager.shutdown();
}
