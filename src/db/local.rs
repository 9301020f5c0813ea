//! In-memory repository for local development and tests.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;

use super::repository::{RepositoryError, RepositoryResult, ScheduleRepository};
use crate::api::UserId;
use crate::models::{ScheduleDocument, SharedLink};

/// In-memory implementation of [`ScheduleRepository`].
///
/// Documents and share links live in process memory and vanish on restart.
/// Matches the production semantics otherwise: whole-document replacement,
/// last write wins.
#[derive(Default)]
pub struct LocalRepository {
    documents: RwLock<HashMap<i64, ScheduleDocument>>,
    share_links: RwLock<HashMap<String, SharedLink>>,
}

impl LocalRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ScheduleRepository for LocalRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        Ok(true)
    }

    async fn fetch_document(&self, user_id: UserId) -> RepositoryResult<Option<ScheduleDocument>> {
        Ok(self.documents.read().get(&user_id.value()).cloned())
    }

    async fn store_document(
        &self,
        user_id: UserId,
        document: &ScheduleDocument,
    ) -> RepositoryResult<()> {
        self.documents
            .write()
            .insert(user_id.value(), document.clone());
        Ok(())
    }

    async fn clear_document(&self, user_id: UserId) -> RepositoryResult<()> {
        self.documents.write().remove(&user_id.value());
        Ok(())
    }

    async fn store_share_link(&self, link: &SharedLink) -> RepositoryResult<()> {
        self.share_links
            .write()
            .insert(link.token.clone(), link.clone());
        Ok(())
    }

    async fn fetch_share_link(&self, token: &str) -> RepositoryResult<Option<SharedLink>> {
        Ok(self.share_links.read().get(token).cloned())
    }

    async fn record_share_visit(&self, token: &str) -> RepositoryResult<SharedLink> {
        let mut links = self.share_links.write();
        let link = links
            .get_mut(token)
            .ok_or_else(|| RepositoryError::not_found(format!("share link {token}")))?;

        let under_cap = link.max_visits.map_or(true, |max| link.visit_count < max);
        if !link.disabled && under_cap {
            link.visit_count += 1;
        }
        Ok(link.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn user() -> UserId {
        UserId::new(100001)
    }

    #[tokio::test]
    async fn test_store_and_fetch_document() {
        let repo = LocalRepository::new();
        assert!(repo.fetch_document(user()).await.unwrap().is_none());

        let doc = ScheduleDocument::default();
        repo.store_document(user(), &doc).await.unwrap();
        assert_eq!(repo.fetch_document(user()).await.unwrap(), Some(doc));
    }

    #[tokio::test]
    async fn test_store_replaces_wholesale() {
        let repo = LocalRepository::new();
        let mut doc = ScheduleDocument::default();
        repo.store_document(user(), &doc).await.unwrap();

        doc.enabled_days = vec![6, 7];
        repo.store_document(user(), &doc).await.unwrap();

        let stored = repo.fetch_document(user()).await.unwrap().unwrap();
        assert_eq!(stored.enabled_days, vec![6, 7]);
    }

    #[tokio::test]
    async fn test_clear_document() {
        let repo = LocalRepository::new();
        repo.store_document(user(), &ScheduleDocument::default())
            .await
            .unwrap();
        repo.clear_document(user()).await.unwrap();
        assert!(repo.fetch_document(user()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_share_link_round_trip() {
        let repo = LocalRepository::new();
        let link = SharedLink::new(user(), "1234".to_string(), Vec::new(), Utc::now());
        repo.store_share_link(&link).await.unwrap();

        let fetched = repo.fetch_share_link(&link.token).await.unwrap();
        assert_eq!(fetched, Some(link));
        assert!(repo.fetch_share_link("ffffffffffffffffffffffffffffffff").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_visit_counter_increments_until_cap() {
        let repo = LocalRepository::new();
        let mut link = SharedLink::new(user(), "1234".to_string(), Vec::new(), Utc::now());
        link.max_visits = Some(2);
        repo.store_share_link(&link).await.unwrap();

        assert_eq!(repo.record_share_visit(&link.token).await.unwrap().visit_count, 1);
        assert_eq!(repo.record_share_visit(&link.token).await.unwrap().visit_count, 2);
        // At the cap the counter stops moving.
        assert_eq!(repo.record_share_visit(&link.token).await.unwrap().visit_count, 2);
    }

    #[tokio::test]
    async fn test_visit_counter_unknown_token() {
        let repo = LocalRepository::new();
        let result = repo.record_share_visit("deadbeefdeadbeefdeadbeefdeadbeef").await;
        assert!(matches!(result, Err(RepositoryError::NotFound(_))));
    }
}
