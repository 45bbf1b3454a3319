// src/session.rs
//! The session: one authenticated connection to a Notion workspace.

use crate::api::{CachedNotionClient, NotionHttpClient, NotionRepository, SearchQuery};
use crate::config::{CacheSettings, SessionConfig};
use crate::error::AppError;
use crate::model::{Database, NotionObject, Page, Parent, User};
use crate::types::{NotionId, ObjRef, SList};
use parking_lot::RwLock;
use std::sync::Arc;
use std::time::Duration;

/// A session for the Notion API.
///
/// Lookups by id and database searches are cached for a short while
/// (see [`CacheSettings`]); `whoami` and `all_users` always ask Notion.
///
/// ```no_run
/// # async fn demo() -> Result<(), ultimate_notion::AppError> {
/// use ultimate_notion::Session;
///
/// let notion = Session::from_env()?;
/// notion.raise_for_status().await?;
/// let contacts = notion.search_db(Some("Contacts"), true, &[]).await?.item()?;
/// println!("{}", contacts);
/// # Ok(())
/// # }
/// ```
pub struct Session {
    repository: Arc<dyn NotionRepository>,
    cached: RwLock<Arc<CachedNotionClient>>,
}

impl Session {
    /// Opens a session against the Notion API described by `config`.
    pub fn new(config: SessionConfig) -> Result<Self, AppError> {
        log::debug!("Connecting to Notion at {}...", config.base_url);
        let client = NotionHttpClient::new(&config)?;
        Ok(Self::with_repository(Arc::new(client), config.cache))
    }

    /// Opens a session with the token from `NOTION_AUTH_TOKEN`.
    pub fn from_env() -> Result<Self, AppError> {
        Self::new(SessionConfig::from_env()?)
    }

    /// Opens a session on top of any repository, e.g. a recorded workspace.
    pub fn with_repository(repository: Arc<dyn NotionRepository>, cache: CacheSettings) -> Self {
        let cached = CachedNotionClient::new(Arc::clone(&repository), cache);
        log::info!("Initialized Notion session");
        Self {
            repository,
            cached: RwLock::new(Arc::new(cached)),
        }
    }

    /// Replaces the lookup caches; previously cached entries are discarded.
    pub fn set_cache(&self, ttl: Duration, capacity: usize) {
        let settings = CacheSettings::new(ttl, capacity);
        log::debug!(
            "Resetting lookup cache (ttl {:?}, capacity {})",
            settings.ttl,
            settings.capacity
        );
        *self.cached.write() =
            Arc::new(CachedNotionClient::new(Arc::clone(&self.repository), settings));
    }

    pub fn cache_settings(&self) -> CacheSettings {
        self.cached.read().settings()
    }

    /// Closes the session and releases its resources.
    pub fn close(self) {
        self.cached.read().clear();
    }

    fn cached(&self) -> Arc<CachedNotionClient> {
        self.cached.read().clone()
    }

    /// Confirms that the session is active.
    ///
    /// Fails with [`AppError::SessionUnavailable`] when Notion can't be
    /// reached or refuses the integration token.
    pub async fn raise_for_status(&self) -> Result<(), AppError> {
        self.connected_user().await.map(|_| ())
    }

    /// Like [`Session::whoami`], with failures reported as in
    /// [`Session::raise_for_status`].
    pub async fn connected_user(&self) -> Result<User, AppError> {
        self.whoami().await.map_err(|err| match err {
            err if err.is_connection_failure() => {
                AppError::SessionUnavailable("Unable to connect to Notion".to_string())
            }
            err @ AppError::NotionService { .. } => AppError::SessionUnavailable(err.to_string()),
            err => err,
        })
    }

    /// Searches databases by title.
    ///
    /// `db_name = None` returns every database shared with the integration.
    /// With `exact`, only titles equal to `db_name` are kept, otherwise
    /// Notion's substring match decides. A non-empty `parents` keeps only
    /// databases placed directly below one of those pages or blocks; every
    /// parent reference is validated before Notion is asked.
    pub async fn search_db(
        &self,
        db_name: Option<&str>,
        exact: bool,
        parents: &[&(dyn ObjRef + Sync)],
    ) -> Result<SList<Database>, AppError> {
        let parents = resolve_all(parents)?;
        let hits = self.cached().search(&SearchQuery::databases(db_name)).await?;
        Ok(select_hits(hits, db_name, exact, &parents)
            .filter_map(NotionObject::into_database)
            .collect())
    }

    /// Searches pages by title; same rules as [`Session::search_db`].
    pub async fn search_page(
        &self,
        page_name: Option<&str>,
        exact: bool,
        parents: &[&(dyn ObjRef + Sync)],
    ) -> Result<SList<Page>, AppError> {
        let parents = resolve_all(parents)?;
        let hits = self.cached().search(&SearchQuery::pages(page_name)).await?;
        Ok(select_hits(hits, page_name, exact, &parents)
            .filter_map(NotionObject::into_page)
            .collect())
    }

    /// Retrieves a database by id, UUID or URL.
    pub async fn get_db<R: ObjRef + ?Sized>(&self, db_ref: &R) -> Result<Database, AppError> {
        let id = db_ref.resolve()?;
        self.cached().retrieve_database(&id).await
    }

    pub async fn get_db_uncached<R: ObjRef + ?Sized>(
        &self,
        db_ref: &R,
    ) -> Result<Database, AppError> {
        let id = db_ref.resolve()?;
        self.repository.retrieve_database(&id).await
    }

    /// Retrieves a page by id, UUID or URL.
    pub async fn get_page<R: ObjRef + ?Sized>(&self, page_ref: &R) -> Result<Page, AppError> {
        let id = page_ref.resolve()?;
        self.cached().retrieve_page(&id).await
    }

    pub async fn get_page_uncached<R: ObjRef + ?Sized>(
        &self,
        page_ref: &R,
    ) -> Result<Page, AppError> {
        let id = page_ref.resolve()?;
        self.repository.retrieve_page(&id).await
    }

    /// Retrieves a user by id.
    pub async fn get_user<R: ObjRef + ?Sized>(&self, user_ref: &R) -> Result<User, AppError> {
        let id = user_ref.resolve()?;
        self.cached().retrieve_user(&id).await
    }

    pub async fn get_user_uncached<R: ObjRef + ?Sized>(
        &self,
        user_ref: &R,
    ) -> Result<User, AppError> {
        let id = user_ref.resolve()?;
        self.repository.retrieve_user(&id).await
    }

    /// The bot user of this integration.
    pub async fn whoami(&self) -> Result<User, AppError> {
        self.repository.current_user().await
    }

    /// Every user of the workspace.
    pub async fn all_users(&self) -> Result<Vec<User>, AppError> {
        self.repository.list_users().await
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        log::debug!("Closing connection to Notion...");
    }
}

fn resolve_all(refs: &[&(dyn ObjRef + Sync)]) -> Result<Vec<NotionId>, AppError> {
    refs.iter()
        .map(|r| r.resolve().map_err(AppError::from))
        .collect()
}

/// Applies the exact-title and parent filters to raw search hits.
fn select_hits<'a>(
    hits: Vec<NotionObject>,
    name: Option<&'a str>,
    exact: bool,
    parents: &'a [NotionId],
) -> impl Iterator<Item = NotionObject> + 'a {
    hits.into_iter()
        .filter(move |hit| match (exact, name) {
            (true, Some(name)) => hit.title() == name,
            _ => true,
        })
        .filter(move |hit| parents.is_empty() || has_parent_in(hit.parent(), parents))
}

fn has_parent_in(parent: Option<&Parent>, parents: &[NotionId]) -> bool {
    parent
        .and_then(Parent::id)
        .is_some_and(|id| parents.contains(id))
}
