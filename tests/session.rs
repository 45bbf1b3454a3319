// tests/session.rs
//! Session behaviour against an in-memory workspace.

mod common;

use common::*;
use pretty_assertions::assert_eq;
use std::sync::Arc;
use std::time::Duration;
use ultimate_notion::{
    ApiKey, AppError, BaseUrl, CacheSettings, NotionErrorCode, NotionId, NotionRepository, PageId,
    Session, SessionConfig, SingleItemError, UserId,
};

fn session_with(workspace: &Arc<FakeWorkspace>, cache: CacheSettings) -> Session {
    let repository: Arc<dyn NotionRepository> = workspace.clone();
    Session::with_repository(repository, cache)
}

fn session() -> (Session, Arc<FakeWorkspace>) {
    let workspace = Arc::new(FakeWorkspace::sample());
    (session_with(&workspace, CacheSettings::default()), workspace)
}

#[tokio::test]
async fn raise_for_status_on_healthy_workspace() {
    let (notion, _) = session();
    assert!(notion.raise_for_status().await.is_ok());
}

#[tokio::test]
async fn raise_for_status_reports_rejected_token() {
    let (notion, workspace) = session();
    workspace.fail_with(NotionErrorCode::Unauthorized);

    let err = notion.raise_for_status().await.unwrap_err();
    assert!(matches!(err, AppError::SessionUnavailable(_)), "{:?}", err);
}

#[tokio::test]
async fn connected_user_asks_notion_once() {
    let (notion, workspace) = session();

    let me = notion.connected_user().await.unwrap();
    assert_eq!(me.name(), BOT_NAME);
    assert_eq!(workspace.calls.count("current_user"), 1);

    workspace.fail_with(NotionErrorCode::Unauthorized);
    let err = notion.connected_user().await.unwrap_err();
    assert!(matches!(err, AppError::SessionUnavailable(_)), "{:?}", err);
    assert_eq!(workspace.calls.count("current_user"), 2);
}

#[tokio::test]
async fn raise_for_status_reports_unreachable_notion() {
    let config = SessionConfig::new(ApiKey::new("secret_0123456789abcdefghij").unwrap())
        .with_base_url(BaseUrl::parse("http://127.0.0.1:9/v1").unwrap())
        .with_timeout(Duration::from_secs(5));
    let notion = Session::new(config).unwrap();

    match notion.raise_for_status().await {
        Err(AppError::SessionUnavailable(msg)) => assert_eq!(msg, "Unable to connect to Notion"),
        other => panic!("expected SessionUnavailable, got {:?}", other),
    }
}

#[tokio::test]
async fn search_and_get_db() {
    let (notion, _) = session();

    let db = notion
        .search_db(Some(CONTACTS_DB), true, &[])
        .await
        .unwrap()
        .item()
        .unwrap();
    assert_eq!(db.title(), CONTACTS_DB);

    let same_db = notion.get_db(&db.id).await.unwrap();
    assert_eq!(same_db.id, db.id);
    assert_eq!(same_db.title(), CONTACTS_DB);
}

#[tokio::test]
async fn substring_search_returns_every_match() {
    let (notion, _) = session();

    let dbs = notion.search_db(Some("contacts"), false, &[]).await.unwrap();
    let titles: Vec<_> = dbs.iter().map(|db| db.title().to_string()).collect();
    assert_eq!(titles, vec!["Contacts DB", "Contacts DB Archive"]);

    match dbs.item() {
        Err(SingleItemError::MoreThanOne { type_name }) => assert_eq!(type_name, "Database"),
        other => panic!("expected MoreThanOne, got {:?}", other),
    }
}

#[tokio::test]
async fn exact_search_without_match_is_empty() {
    let (notion, _) = session();

    let dbs = notion.search_db(Some("contacts"), true, &[]).await.unwrap();
    assert!(dbs.is_empty());
    assert_eq!(dbs.item().unwrap_err(), SingleItemError::Empty);
}

#[tokio::test]
async fn search_without_name_lists_all_databases() {
    let (notion, _) = session();
    let dbs = notion.search_db(None, true, &[]).await.unwrap();
    assert_eq!(dbs.len(), 3);
}

#[tokio::test]
async fn search_restricted_to_parents() {
    let (notion, _) = session();
    let root = NotionId::parse(ROOT_PAGE_ID).unwrap();

    let below_root = notion.search_db(None, false, &[&root]).await.unwrap();
    assert_eq!(below_root.len(), 2);
    assert!(below_root.iter().all(|db| db.title().starts_with("Contacts")));

    let elsewhere = NotionId::parse(INTRO_PAGE_ID).unwrap();
    let none = notion.search_db(None, false, &[&elsewhere]).await.unwrap();
    assert!(none.is_empty());
}

#[tokio::test]
async fn parents_accept_any_reference() {
    let (notion, workspace) = session();
    let url = format!("https://www.notion.so/Tests-{}", ROOT_PAGE_ID.replace('-', ""));
    let root_page = notion.get_page(ROOT_PAGE_ID).await.unwrap();

    let by_url = notion.search_db(None, false, &[&url]).await.unwrap();
    let by_id = notion
        .search_db(None, false, &[&root_page.id, &INTRO_PAGE_ID])
        .await
        .unwrap();
    assert_eq!(by_url.len(), 2);
    assert_eq!(by_url, by_id);

    let pages = notion
        .search_page(None, false, &[&ROOT_PAGE_ID])
        .await
        .unwrap();
    assert_eq!(pages.item().unwrap().title(), "Getting Started");

    let err = notion
        .search_db(Some(CONTACTS_DB), true, &[&"not-a-parent"])
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::ValidationError(_)), "{:?}", err);
    assert_eq!(workspace.calls.count("search"), 2);
}

#[tokio::test]
async fn search_page_by_title() {
    let (notion, _) = session();

    let page = notion
        .search_page(Some("Getting Started"), true, &[])
        .await
        .unwrap()
        .item()
        .unwrap();
    assert_eq!(page.id, PageId::parse(INTRO_PAGE_ID).unwrap());
}

#[tokio::test]
async fn whoami_and_get_user() {
    let (notion, workspace) = session();

    let me = notion.whoami().await.unwrap();
    assert_eq!(me.name(), BOT_NAME);
    assert!(me.is_bot());

    let user = notion.get_user(&me.id).await.unwrap();
    assert_eq!(user.id, me.id);

    let uncached = notion.get_user_uncached(&me.id).await.unwrap();
    assert_eq!(uncached.id, me.id);
    assert_eq!(workspace.calls.count("retrieve_user"), 2);
}

#[tokio::test]
async fn get_page_by_id() {
    let (notion, _) = session();

    let intro = notion.get_page(INTRO_PAGE_ID).await.unwrap();
    assert_eq!(intro.title(), "Getting Started");

    // compact ids, UUIDs and URLs resolve to the same page
    let compact = INTRO_PAGE_ID.replace('-', "");
    let url = format!("https://www.notion.so/Getting-Started-{}", compact);
    assert_eq!(notion.get_page(compact.as_str()).await.unwrap(), intro);
    assert_eq!(notion.get_page(&url).await.unwrap(), intro);
    assert_eq!(notion.get_page(&intro.id.as_notion_id().to_uuid()).await.unwrap(), intro);
}

#[tokio::test]
async fn all_users_contains_me() {
    let (notion, _) = session();

    let me = notion.whoami().await.unwrap();
    let users = notion.all_users().await.unwrap();
    assert!(users.contains(&me));
    assert!(users.iter().any(|u| u.email() == Some("jane@example.com")));
}

#[tokio::test]
async fn invalid_reference_never_reaches_notion() {
    let (notion, workspace) = session();

    let err = notion.get_db("not-a-notion-id").await.unwrap_err();
    assert!(matches!(err, AppError::ValidationError(_)), "{:?}", err);
    assert_eq!(workspace.calls.count("retrieve_database"), 0);
}

#[tokio::test]
async fn missing_object_reports_not_found() {
    let (notion, workspace) = session();
    let unknown = UserId::new_v4();

    for _ in 0..2 {
        let err = notion.get_user(&unknown).await.unwrap_err();
        assert!(err.notion_code().is_some_and(NotionErrorCode::is_not_found));
    }
    // failures are not cached
    assert_eq!(workspace.calls.count("retrieve_user"), 2);
}

#[tokio::test]
async fn lookups_are_cached() {
    let (notion, workspace) = session();

    notion.get_db(CONTACTS_DB_ID).await.unwrap();
    notion.get_db(CONTACTS_DB_ID).await.unwrap();
    assert_eq!(workspace.calls.count("retrieve_database"), 1);

    notion.get_db_uncached(CONTACTS_DB_ID).await.unwrap();
    assert_eq!(workspace.calls.count("retrieve_database"), 2);

    notion.search_db(Some(CONTACTS_DB), true, &[]).await.unwrap();
    notion.search_db(Some(CONTACTS_DB), false, &[]).await.unwrap();
    assert_eq!(workspace.calls.count("search"), 1);

    notion.get_page(INTRO_PAGE_ID).await.unwrap();
    notion.get_page_uncached(INTRO_PAGE_ID).await.unwrap();
    notion.get_page(INTRO_PAGE_ID).await.unwrap();
    assert_eq!(workspace.calls.count("retrieve_page"), 2);
}

#[tokio::test]
async fn current_user_is_never_cached() {
    let (notion, workspace) = session();

    notion.whoami().await.unwrap();
    notion.whoami().await.unwrap();
    notion.all_users().await.unwrap();
    notion.all_users().await.unwrap();

    assert_eq!(workspace.calls.count("current_user"), 2);
    assert_eq!(workspace.calls.count("list_users"), 2);
}

#[tokio::test]
async fn cached_entries_expire() {
    let workspace = Arc::new(FakeWorkspace::sample());
    let notion = session_with(
        &workspace,
        CacheSettings::new(Duration::from_millis(50), 16),
    );

    notion.get_page(INTRO_PAGE_ID).await.unwrap();
    tokio::time::sleep(Duration::from_millis(120)).await;
    notion.get_page(INTRO_PAGE_ID).await.unwrap();

    assert_eq!(workspace.calls.count("retrieve_page"), 2);
}

#[tokio::test]
async fn set_cache_discards_previous_entries() {
    let (notion, workspace) = session();

    notion.get_db(CONTACTS_DB_ID).await.unwrap();
    notion.set_cache(Duration::from_secs(60), 8);
    assert_eq!(
        notion.cache_settings(),
        CacheSettings::new(Duration::from_secs(60), 8)
    );

    notion.get_db(CONTACTS_DB_ID).await.unwrap();
    notion.get_db(CONTACTS_DB_ID).await.unwrap();
    assert_eq!(workspace.calls.count("retrieve_database"), 2);
}

#[tokio::test]
async fn disabled_cache_always_asks_notion() {
    let workspace = Arc::new(FakeWorkspace::sample());
    let notion = session_with(&workspace, CacheSettings::disabled());

    for _ in 0..3 {
        notion.get_db(TASKS_DB_ID).await.unwrap();
    }
    assert_eq!(workspace.calls.count("retrieve_database"), 3);
}

#[tokio::test]
async fn close_consumes_session() {
    let (notion, workspace) = session();
    notion.get_page(INTRO_PAGE_ID).await.unwrap();
    notion.close();

    let reopened = session_with(&workspace, CacheSettings::default());
    reopened.get_page(INTRO_PAGE_ID).await.unwrap();
    assert_eq!(workspace.calls.count("retrieve_page"), 2);
}
