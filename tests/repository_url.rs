use sqlx::PgPool;
use std::sync::Arc;
use url_shortener_service::application::services::UrlService;
use url_shortener_service::domain::entities::NewUrlRecord;
use url_shortener_service::domain::repositories::{InsertOutcome, UrlRepository};
use url_shortener_service::infrastructure::persistence::PgUrlRepository;
use url_shortener_service::utils::code_generator::CodeGenerator;

fn repo(pool: PgPool) -> PgUrlRepository {
    PgUrlRepository::new(Arc::new(pool), "tester")
}

#[sqlx::test]
async fn test_insert_and_find_by_id(pool: PgPool) {
    let repo = repo(pool);

    let outcome = repo
        .insert(NewUrlRecord::new("EAaArVRs", "https://example.com"))
        .await
        .unwrap();

    assert!(outcome.is_inserted());
    let record = outcome.into_record();
    assert_eq!(record.created_by, "tester");
    assert_eq!(record.modified_by.as_deref(), Some("tester"));
    assert!(record.modified_at.is_some());

    let found = repo.find_by_id("EAaArVRs").await.unwrap().unwrap();
    assert_eq!(found.original_url, "https://example.com");
    assert_eq!(found.created_at, record.created_at);
}

#[sqlx::test]
async fn test_find_by_id_not_found(pool: PgPool) {
    let repo = repo(pool);

    assert!(repo.find_by_id("notfound").await.unwrap().is_none());
}

#[sqlx::test]
async fn test_duplicate_insert_returns_existing(pool: PgPool) {
    let repo = repo(pool);

    repo.insert(NewUrlRecord::new("EAaArVRs", "https://example.com"))
        .await
        .unwrap();
    let outcome = repo
        .insert(NewUrlRecord::new("EAaArVRs", "https://other.example.com"))
        .await
        .unwrap();

    match outcome {
        InsertOutcome::AlreadyExists(existing) => {
            assert_eq!(existing.original_url, "https://example.com");
        }
        InsertOutcome::Inserted(_) => panic!("duplicate id must not be inserted"),
    }
    assert_eq!(repo.count().await.unwrap(), 1);
}

#[sqlx::test]
async fn test_find_by_original_url(pool: PgPool) {
    let repo = repo(pool);

    repo.insert(NewUrlRecord::new("EAaArVRs", "https://example.com"))
        .await
        .unwrap();
    repo.insert(NewUrlRecord::new("6c3zbkaa", "https://rust-lang.org/"))
        .await
        .unwrap();

    let record = repo
        .find_by_original_url("https://rust-lang.org/")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(record.id, "6c3zbkaa");

    assert!(
        repo.find_by_original_url("https://missing.example.com")
            .await
            .unwrap()
            .is_none()
    );
}

#[sqlx::test]
async fn test_empty_url_violates_check(pool: PgPool) {
    let repo = repo(pool);

    let err = repo
        .insert(NewUrlRecord::new("EAaArVRs", ""))
        .await
        .unwrap_err();

    assert!(err.is_retryable());
    assert_eq!(err.code(), "storage_error");
}

#[sqlx::test]
async fn test_concurrent_inserts_have_one_winner(pool: PgPool) {
    let repo = Arc::new(repo(pool));

    let handles: Vec<_> = (0..16)
        .map(|i| {
            let repo = repo.clone();
            tokio::spawn(async move {
                repo.insert(NewUrlRecord::new("race1234", format!("https://{i}.example.com")))
                    .await
                    .unwrap()
            })
        })
        .collect();

    let mut winners = 0;
    let mut urls = Vec::new();
    for handle in handles {
        let outcome = handle.await.unwrap();
        if outcome.is_inserted() {
            winners += 1;
        }
        urls.push(outcome.into_record().original_url);
    }

    assert_eq!(winners, 1);
    assert!(urls.windows(2).all(|w| w[0] == w[1]));
    assert_eq!(repo.count().await.unwrap(), 1);
}

#[sqlx::test]
async fn test_records_survive_code_length_change(pool: PgPool) {
    let repo: Arc<dyn UrlRepository> = Arc::new(repo(pool));
    let url = "https://example.com/very/long/path";

    let before = UrlService::new(repo.clone(), CodeGenerator::new(8, 12), "https://sho.rt/u");
    assert_eq!(before.create_short_url(url).await.unwrap().id, "HkTRTCTy");

    let after = UrlService::new(repo.clone(), CodeGenerator::new(10, 14), "https://sho.rt/u");
    assert_eq!(after.resolve_short_url("HkTRTCTy").await.unwrap(), url);

    let again = after.create_short_url(url).await.unwrap();
    assert_eq!(again.id, "HkTRTCTy");
    assert!(!again.created);
    assert_eq!(repo.count().await.unwrap(), 1);
}
