//! End-to-end pipeline tests: selection, retry, fallback, and caching
//! against mock provider backends.

use crate::helpers::{manager_with, CNJ, CNJ_DIGITS, CPF, CPF_DIGITS};
use crate::mock_providers::{MockEscavador, MockJudit};
use juris_core::{JurisError, SearchOptions};
use pretty_assertions::assert_eq;

fn escavador_process_path() -> String {
    format!("/api/v2/processos/{CNJ_DIGITS}")
}

#[tokio::test]
async fn cheaper_provider_is_tried_first() {
    let escavador = MockEscavador::start().await;
    let judit = MockJudit::start().await;
    escavador.mock_process_ok(CNJ_DIGITS).await;
    judit.mock_search_ok(CNJ_DIGITS).await;

    let manager = manager_with(vec![escavador.config(), judit.config()]);
    let result = manager
        .search_process(CNJ, &SearchOptions::default())
        .await
        .unwrap();

    assert_eq!(result.id, "esc-proc-1");
    assert_eq!(escavador.requests_to(&escavador_process_path()).await, 1);
    assert_eq!(judit.requests_to("/lawsuits/search").await, 0);
    manager.shutdown();
}

#[tokio::test]
async fn retries_then_falls_back_when_the_primary_is_down() {
    let escavador = MockEscavador::start().await;
    let judit = MockJudit::start().await;
    escavador.mock_process_error(CNJ_DIGITS, 503).await;
    judit.mock_search_ok(CNJ_DIGITS).await;

    let manager = manager_with(vec![escavador.config(), judit.config()]);
    let result = manager
        .search_process(CNJ, &SearchOptions::default())
        .await
        .unwrap();

    assert_eq!(result.id, "judit-law-1");
    // Three attempts against the primary, then one against the fallback.
    assert_eq!(escavador.requests_to(&escavador_process_path()).await, 3);
    assert_eq!(judit.requests_to("/lawsuits/search").await, 1);
    manager.shutdown();
}

#[tokio::test]
async fn missing_record_on_one_provider_falls_back_to_the_next() {
    let escavador = MockEscavador::start().await;
    let judit = MockJudit::start().await;
    escavador.mock_process_error(CNJ_DIGITS, 404).await;
    judit.mock_search_ok(CNJ_DIGITS).await;

    let manager = manager_with(vec![escavador.config(), judit.config()]);
    let result = manager
        .search_process(CNJ, &SearchOptions::default())
        .await
        .unwrap();

    // Provider coverage differs: a 404 from one provider is final for
    // that provider but the chain still consults the next one.
    assert_eq!(result.id, "judit-law-1");
    assert_eq!(escavador.requests_to(&escavador_process_path()).await, 1);
    assert_eq!(judit.requests_to("/lawsuits/search").await, 1);
    manager.shutdown();
}

#[tokio::test]
async fn credit_exhaustion_falls_back_without_retrying() {
    let escavador = MockEscavador::start().await;
    let judit = MockJudit::start().await;
    escavador.mock_process_error(CNJ_DIGITS, 402).await;
    judit.mock_search_ok(CNJ_DIGITS).await;

    let manager = manager_with(vec![escavador.config(), judit.config()]);
    let result = manager
        .search_process(CNJ, &SearchOptions::default())
        .await
        .unwrap();

    assert_eq!(result.id, "judit-law-1");
    // 402 is not retryable; one attempt then straight to the fallback.
    assert_eq!(escavador.requests_to(&escavador_process_path()).await, 1);
    manager.shutdown();
}

#[tokio::test]
async fn auth_failure_falls_back_without_retrying() {
    let escavador = MockEscavador::start().await;
    let judit = MockJudit::start().await;
    escavador.mock_process_error(CNJ_DIGITS, 401).await;
    judit.mock_search_ok(CNJ_DIGITS).await;

    let manager = manager_with(vec![escavador.config(), judit.config()]);
    let result = manager
        .search_process(CNJ, &SearchOptions::default())
        .await
        .unwrap();

    assert_eq!(result.id, "judit-law-1");
    assert_eq!(escavador.requests_to(&escavador_process_path()).await, 1);
    manager.shutdown();
}

#[tokio::test]
async fn preferred_provider_overrides_price_ranking() {
    let escavador = MockEscavador::start().await;
    let judit = MockJudit::start().await;
    escavador.mock_process_ok(CNJ_DIGITS).await;
    judit.mock_search_ok(CNJ_DIGITS).await;

    let manager = manager_with(vec![escavador.config(), judit.config()]);
    let options = SearchOptions::default().with_preferred_provider("judit");
    let result = manager.search_process(CNJ, &options).await.unwrap();

    assert_eq!(result.id, "judit-law-1");
    assert_eq!(escavador.requests_to(&escavador_process_path()).await, 0);
    manager.shutdown();
}

#[tokio::test]
async fn repeat_lookup_is_served_from_cache() {
    let escavador = MockEscavador::start().await;
    escavador.mock_process_ok(CNJ_DIGITS).await;

    let manager = manager_with(vec![escavador.config()]);
    let first = manager
        .search_process(CNJ, &SearchOptions::default())
        .await
        .unwrap();
    // Same process requested in bare-digit form: same cache key.
    let second = manager
        .search_process(CNJ_DIGITS, &SearchOptions::default())
        .await
        .unwrap();

    assert_eq!(first.id, second.id);
    assert_eq!(escavador.requests_to(&escavador_process_path()).await, 1);
    manager.shutdown();
}

#[tokio::test]
async fn concurrent_misses_each_hit_provider() {
    let escavador = MockEscavador::start().await;
    escavador.mock_process_ok(CNJ_DIGITS).await;

    let manager = manager_with(vec![escavador.config()]);
    let options = SearchOptions::default();
    // No request coalescing: simultaneous misses on the same key both go
    // upstream, and the later response wins the cache write.
    let (first, second) = tokio::join!(
        manager.search_process(CNJ, &options),
        manager.search_process(CNJ, &options),
    );

    assert_eq!(first.unwrap().id, "esc-proc-1");
    assert_eq!(second.unwrap().id, "esc-proc-1");
    assert_eq!(escavador.requests_to(&escavador_process_path()).await, 2);
    manager.shutdown();
}

#[tokio::test]
async fn malformed_cnj_never_goes_upstream() {
    let escavador = MockEscavador::start().await;
    let manager = manager_with(vec![escavador.config()]);

    let err = manager
        .search_process("not-a-cnj", &SearchOptions::default())
        .await
        .unwrap_err();

    assert!(matches!(err, JurisError::Validation { .. }));
    assert_eq!(escavador.server.received_requests().await.unwrap().len(), 0);
    manager.shutdown();
}

#[tokio::test]
async fn person_search_maps_the_normalized_record() {
    let escavador = MockEscavador::start().await;
    escavador.mock_person_ok(CPF_DIGITS).await;

    let manager = manager_with(vec![escavador.config()]);
    let person = manager
        .search_person(CPF, &SearchOptions::default())
        .await
        .unwrap();

    assert_eq!(person.name, "Maria Silva");
    assert_eq!(person.document, CPF_DIGITS);
    manager.shutdown();
}

#[tokio::test]
async fn exhausted_chain_reports_every_provider() {
    let escavador = MockEscavador::start().await;
    let judit = MockJudit::start().await;
    escavador.mock_process_error(CNJ_DIGITS, 503).await;
    judit.mock_search_error(500).await;

    let manager = manager_with(vec![escavador.config(), judit.config()]);
    let err = manager
        .search_process(CNJ, &SearchOptions::default())
        .await
        .unwrap_err();

    match err {
        JurisError::AllProvidersFailed { operation, failures } => {
            assert_eq!(operation, "search_process");
            let providers: Vec<&str> = failures.iter().map(|f| f.provider.as_str()).collect();
            assert_eq!(providers, vec!["escavador", "judit"]);
        }
        other => panic!("expected AllProvidersFailed, got {other:?}"),
    }
    // Both retryable failures: three attempts each.
    assert_eq!(escavador.requests_to(&escavador_process_path()).await, 3);
    assert_eq!(judit.requests_to("/lawsuits/search").await, 3);
    manager.shutdown();
}
