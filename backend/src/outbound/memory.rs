//! Process-local adapter backing every driven repository port.
//!
//! Used when no database URL is configured and by handler tests. A single
//! async mutex guards users, ledger and documents, so the check-and-append
//! paths of the ledger are atomic in the same way the PostgreSQL adapter's
//! transactions are.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::domain::ports::{
    AppendAward, AppendRedemption, DocumentRepository, DocumentRepositoryError,
    PointsLedgerRepository, PointsLedgerRepositoryError, UserPersistenceError, UserRepository,
};
use crate::domain::{
    ActionTag, Document, DocumentKind, PointHistoryEntry, User, UserId, balance_of,
};

#[derive(Debug, Default)]
struct StoreState {
    users: HashMap<UserId, User>,
    history: Vec<PointHistoryEntry>,
    documents: Vec<Document>,
}

impl StoreState {
    fn entries_for<'a>(
        &'a self,
        user_id: &'a UserId,
    ) -> impl Iterator<Item = &'a PointHistoryEntry> + 'a {
        self.history
            .iter()
            .filter(move |entry| &entry.user_id == user_id)
    }

    fn email_taken_by_other(&self, user: &User) -> bool {
        self.users
            .values()
            .any(|stored| stored.id != user.id && stored.email == user.email)
    }

    fn credit(&mut self, entry: &PointHistoryEntry) -> Result<(), PointsLedgerRepositoryError> {
        let user = self.users.get_mut(&entry.user_id).ok_or_else(|| {
            PointsLedgerRepositoryError::user_not_found(entry.user_id.to_string())
        })?;
        user.points += entry.points;
        self.history.push(entry.clone());
        Ok(())
    }
}

/// Shared in-memory store. Clones share state.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    state: Arc<Mutex<StoreState>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        let state = self.state.lock().await;
        Ok(state.users.get(id).cloned())
    }

    async fn create_if_missing(&self, user: &User) -> Result<User, UserPersistenceError> {
        let mut state = self.state.lock().await;
        if let Some(existing) = state.users.get(&user.id) {
            return Ok(existing.clone());
        }
        if state.email_taken_by_other(user) {
            return Err(UserPersistenceError::duplicate_email(user.email.as_ref()));
        }
        let stored = User {
            points: 0,
            ..user.clone()
        };
        state.users.insert(stored.id.clone(), stored.clone());
        Ok(stored)
    }

    async fn update(&self, user: &User) -> Result<bool, UserPersistenceError> {
        let mut state = self.state.lock().await;
        if state.email_taken_by_other(user) {
            return Err(UserPersistenceError::duplicate_email(user.email.as_ref()));
        }
        let Some(stored) = state.users.get_mut(&user.id) else {
            return Ok(false);
        };
        let points = stored.points;
        *stored = User {
            points,
            ..user.clone()
        };
        Ok(true)
    }
}

#[async_trait]
impl PointsLedgerRepository for InMemoryStore {
    async fn user_exists(&self, user_id: &UserId) -> Result<bool, PointsLedgerRepositoryError> {
        let state = self.state.lock().await;
        Ok(state.users.contains_key(user_id))
    }

    async fn find_entry(
        &self,
        user_id: &UserId,
        action: &ActionTag,
    ) -> Result<Option<PointHistoryEntry>, PointsLedgerRepositoryError> {
        let state = self.state.lock().await;
        Ok(state
            .entries_for(user_id)
            .filter(|entry| &entry.action == action)
            .max_by_key(|entry| entry.created_at)
            .cloned())
    }

    async fn list_entries(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<PointHistoryEntry>, PointsLedgerRepositoryError> {
        let state = self.state.lock().await;
        let mut entries: Vec<_> = state.entries_for(user_id).cloned().collect();
        entries.reverse();
        entries.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(entries)
    }

    async fn append_award(
        &self,
        entry: &PointHistoryEntry,
    ) -> Result<AppendAward, PointsLedgerRepositoryError> {
        let mut state = self.state.lock().await;
        let duplicate = state
            .entries_for(&entry.user_id)
            .any(|existing| existing.action == entry.action);
        if duplicate {
            return Ok(AppendAward::AlreadyRecorded);
        }
        state.credit(entry)?;
        Ok(AppendAward::Recorded(entry.clone()))
    }

    async fn append_redemption(
        &self,
        entry: &PointHistoryEntry,
    ) -> Result<AppendRedemption, PointsLedgerRepositoryError> {
        let mut state = self.state.lock().await;
        if !state.users.contains_key(&entry.user_id) {
            return Err(PointsLedgerRepositoryError::user_not_found(
                entry.user_id.to_string(),
            ));
        }
        let history: Vec<_> = state.entries_for(&entry.user_id).cloned().collect();
        let balance = balance_of(&history);
        if balance + entry.points < 0 {
            return Ok(AppendRedemption::InsufficientBalance { balance });
        }
        state.credit(entry)?;
        Ok(AppendRedemption::Recorded(entry.clone()))
    }
}

#[async_trait]
impl DocumentRepository for InMemoryStore {
    async fn kind_exists(
        &self,
        user_id: &UserId,
        kind: DocumentKind,
    ) -> Result<bool, DocumentRepositoryError> {
        let state = self.state.lock().await;
        Ok(state
            .documents
            .iter()
            .any(|doc| &doc.user_id == user_id && doc.kind == kind))
    }

    async fn insert(&self, document: &Document) -> Result<(), DocumentRepositoryError> {
        let mut state = self.state.lock().await;
        let taken = state
            .documents
            .iter()
            .any(|doc| doc.user_id == document.user_id && doc.kind == document.kind);
        if taken {
            return Err(DocumentRepositoryError::kind_taken(document.kind));
        }
        state.documents.push(document.clone());
        Ok(())
    }

    async fn list_for_user(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<Document>, DocumentRepositoryError> {
        let state = self.state.lock().await;
        let mut documents: Vec<_> = state
            .documents
            .iter()
            .filter(|doc| &doc.user_id == user_id)
            .cloned()
            .collect();
        documents.reverse();
        documents.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(documents)
    }

    async fn find_for_user(
        &self,
        user_id: &UserId,
        id: Uuid,
    ) -> Result<Option<Document>, DocumentRepositoryError> {
        let state = self.state.lock().await;
        Ok(state
            .documents
            .iter()
            .find(|doc| doc.id == id && &doc.user_id == user_id)
            .cloned())
    }

    async fn delete_for_user(
        &self,
        user_id: &UserId,
        id: Uuid,
    ) -> Result<bool, DocumentRepositoryError> {
        let mut state = self.state.lock().await;
        let before = state.documents.len();
        state
            .documents
            .retain(|doc| !(doc.id == id && &doc.user_id == user_id));
        Ok(state.documents.len() < before)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        DocumentStatus, DocumentSubmission, Email, PointAmount, RewardId, SocialProvider,
        UserName,
    };
    use chrono::{Duration, Utc};
    use rstest::{fixture, rstest};

    #[fixture]
    fn fan() -> User {
        User::new(
            UserId::random(),
            UserName::new("Ada").expect("name"),
            Email::new("ada@example.com").expect("email"),
        )
    }

    async fn seeded(user: &User) -> InMemoryStore {
        let store = InMemoryStore::new();
        store.create_if_missing(user).await.expect("create user");
        store
    }

    fn award(user: &User, action: ActionTag) -> PointHistoryEntry {
        PointHistoryEntry::award(user.id.clone(), action, PointAmount::STANDARD, Utc::now())
    }

    #[rstest]
    #[tokio::test]
    async fn create_if_missing_keeps_the_first_row(fan: User) {
        let store = seeded(&fan).await;
        let renamed = User {
            name: UserName::new("Someone Else").expect("name"),
            ..fan.clone()
        };

        let stored = store.create_if_missing(&renamed).await.expect("create");

        assert_eq!(stored.name, fan.name);
    }

    #[rstest]
    #[tokio::test]
    async fn duplicate_email_is_rejected(fan: User) {
        let store = seeded(&fan).await;
        let other = User::new(
            UserId::random(),
            UserName::new("Eve").expect("name"),
            fan.email.clone(),
        );

        let err = store.create_if_missing(&other).await.expect_err("duplicate");

        assert!(matches!(err, UserPersistenceError::DuplicateEmail { .. }));
    }

    #[rstest]
    #[tokio::test]
    async fn update_never_touches_points(fan: User) {
        let store = seeded(&fan).await;
        store
            .append_award(&award(&fan, ActionTag::ProfileUpdate))
            .await
            .expect("award");
        let stale = User {
            points: 999,
            has_accepted_terms: true,
            ..fan.clone()
        };

        assert!(store.update(&stale).await.expect("update"));

        let stored = store.find_by_id(&fan.id).await.expect("find").expect("user");
        assert_eq!(stored.points, 10);
        assert!(stored.has_accepted_terms);
    }

    #[rstest]
    #[tokio::test]
    async fn awards_are_recorded_once_per_action(fan: User) {
        let store = seeded(&fan).await;
        let action = ActionTag::SocialLink(SocialProvider::Twitch);

        let first = store.append_award(&award(&fan, action.clone())).await;
        let second = store.append_award(&award(&fan, action)).await;

        assert!(matches!(first, Ok(AppendAward::Recorded(_))));
        assert_eq!(second, Ok(AppendAward::AlreadyRecorded));
        let entries = store.list_entries(&fan.id).await.expect("list");
        assert_eq!(entries.len(), 1);
    }

    #[rstest]
    #[tokio::test]
    async fn concurrent_awards_resolve_to_one_entry(fan: User) {
        let store = seeded(&fan).await;
        let attempts = (0..8).map(|_| {
            let store = store.clone();
            let entry = award(&fan, ActionTag::DocumentValidation);
            tokio::spawn(async move { store.append_award(&entry).await })
        });

        let mut recorded = 0;
        for handle in attempts {
            if matches!(handle.await.expect("join"), Ok(AppendAward::Recorded(_))) {
                recorded += 1;
            }
        }

        assert_eq!(recorded, 1);
        let stored = store.find_by_id(&fan.id).await.expect("find").expect("user");
        assert_eq!(stored.points, 10);
    }

    #[rstest]
    #[tokio::test]
    async fn redemption_beyond_balance_is_refused(fan: User) {
        let store = seeded(&fan).await;
        store
            .append_award(&award(&fan, ActionTag::ProfileUpdate))
            .await
            .expect("award");
        let entry = PointHistoryEntry::redemption(
            fan.id.clone(),
            RewardId::new("Jersey").expect("reward"),
            PointAmount::new(11).expect("amount"),
            Utc::now(),
        );

        let outcome = store.append_redemption(&entry).await;

        assert_eq!(
            outcome,
            Ok(AppendRedemption::InsufficientBalance { balance: 10 })
        );
    }

    #[rstest]
    #[tokio::test]
    async fn awards_for_unknown_users_fail(fan: User) {
        let store = InMemoryStore::new();

        let err = store
            .append_award(&award(&fan, ActionTag::ProfileUpdate))
            .await
            .expect_err("missing user");

        assert!(matches!(err, PointsLedgerRepositoryError::UserNotFound { .. }));
    }

    #[rstest]
    #[tokio::test]
    async fn history_lists_newest_first(fan: User) {
        let store = seeded(&fan).await;
        let older = PointHistoryEntry {
            created_at: Utc::now() - Duration::minutes(5),
            ..award(&fan, ActionTag::ProfileUpdate)
        };
        store.append_award(&older).await.expect("older");
        store
            .append_award(&award(&fan, ActionTag::DocumentValidation))
            .await
            .expect("newer");

        let entries = store.list_entries(&fan.id).await.expect("list");

        assert_eq!(entries[0].action, ActionTag::DocumentValidation);
        assert_eq!(entries[1].action, ActionTag::ProfileUpdate);
    }

    #[rstest]
    #[tokio::test]
    async fn same_instant_entries_list_latest_append_first(fan: User) {
        let store = seeded(&fan).await;
        let at = Utc::now();
        for action in [ActionTag::ProfileUpdate, ActionTag::DocumentValidation] {
            let entry = PointHistoryEntry {
                created_at: at,
                ..award(&fan, action)
            };
            store.append_award(&entry).await.expect("award");
        }

        let entries = store.list_entries(&fan.id).await.expect("list");
        let actions: Vec<_> = entries.iter().map(|entry| entry.action.clone()).collect();

        assert_eq!(
            actions,
            [ActionTag::DocumentValidation, ActionTag::ProfileUpdate]
        );
    }

    #[rstest]
    #[tokio::test]
    async fn documents_are_scoped_to_their_owner(fan: User) {
        let store = seeded(&fan).await;
        let submission =
            DocumentSubmission::new(DocumentKind::Rg, "rg.pdf", 4096).expect("submission");
        let document = Document::from_submission(
            fan.id.clone(),
            submission,
            DocumentStatus::Validated,
            Utc::now(),
        );
        store.insert(&document).await.expect("insert");
        let stranger = UserId::random();

        assert_eq!(
            store.find_for_user(&stranger, document.id).await,
            Ok(None)
        );
        assert_eq!(store.delete_for_user(&stranger, document.id).await, Ok(false));
        assert_eq!(store.delete_for_user(&fan.id, document.id).await, Ok(true));
        assert!(!store.kind_exists(&fan.id, DocumentKind::Rg).await.expect("exists"));
    }

    #[rstest]
    #[tokio::test]
    async fn duplicate_kinds_are_refused(fan: User) {
        let store = seeded(&fan).await;
        let make = || {
            Document::from_submission(
                fan.id.clone(),
                DocumentSubmission::new(DocumentKind::Cpf, "cpf.png", 4096).expect("submission"),
                DocumentStatus::Rejected,
                Utc::now(),
            )
        };
        store.insert(&make()).await.expect("first");

        let err = store.insert(&make()).await.expect_err("second");

        assert_eq!(err, DocumentRepositoryError::kind_taken(DocumentKind::Cpf));
    }
}
