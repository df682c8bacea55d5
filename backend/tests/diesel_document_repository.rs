//! Integration tests for `DieselDocumentRepository` against embedded PostgreSQL.

use chrono::{TimeDelta, Utc};
use fanclub::domain::ports::{DocumentRepository, DocumentRepositoryError};
use fanclub::domain::{Document, DocumentKind, DocumentStatus, DocumentSubmission, UserId};
use fanclub::outbound::persistence::{DbPool, DieselDocumentRepository, PoolConfig};
use pg_embedded_setup_unpriv::TestCluster;
use rstest::{fixture, rstest};
use tokio::runtime::Runtime;
use uuid::Uuid;

mod support;

use support::pg_embed::test_cluster;
use support::{handle_cluster_setup_failure, migrate_schema, reset_database, seed_fan};

const TEST_DB: &str = "diesel_document_repo_test";

struct TestContext {
    runtime: Runtime,
    _cluster: TestCluster,
    repository: DieselDocumentRepository,
    owner: UserId,
    other: UserId,
}

impl TestContext {
    fn insert(
        &self,
        user_id: &UserId,
        kind: DocumentKind,
        offset_secs: i64,
    ) -> Result<Document, DocumentRepositoryError> {
        let submission = DocumentSubmission::new(kind, "scan.pdf", 4096).expect("valid submission");
        let document = Document::from_submission(
            user_id.clone(),
            submission,
            DocumentStatus::Validated,
            Utc::now() + TimeDelta::seconds(offset_secs),
        );
        self.runtime
            .block_on(self.repository.insert(&document))
            .map(|()| document)
    }
}

fn setup_context() -> Result<TestContext, String> {
    let runtime = Runtime::new().map_err(|err| err.to_string())?;
    let cluster = test_cluster()?;
    reset_database(&cluster, TEST_DB)?;
    let database_url = cluster.connection().database_url(TEST_DB);
    migrate_schema(&database_url)?;

    let owner = UserId::from_uuid(seed_fan(&database_url, "Owner", "owner@fanclub.test")?);
    let other = UserId::from_uuid(seed_fan(&database_url, "Other", "other@fanclub.test")?);

    let config = PoolConfig::new(&database_url)
        .with_max_size(2)
        .with_min_idle(Some(1));
    let pool = runtime
        .block_on(DbPool::new(config))
        .map_err(|err| err.to_string())?;

    Ok(TestContext {
        runtime,
        _cluster: cluster,
        repository: DieselDocumentRepository::new(pool),
        owner,
        other,
    })
}

#[fixture]
fn repo_context() -> Option<TestContext> {
    match setup_context() {
        Ok(context) => Some(context),
        Err(reason) => handle_cluster_setup_failure(reason),
    }
}

#[rstest]
fn documents_are_listed_newest_first(repo_context: Option<TestContext>) {
    let Some(context) = repo_context else {
        eprintln!("SKIP-TEST-CLUSTER: documents_are_listed_newest_first skipped");
        return;
    };

    let rg = context
        .insert(&context.owner, DocumentKind::Rg, 0)
        .expect("insert RG");
    let cpf = context
        .insert(&context.owner, DocumentKind::Cpf, 10)
        .expect("insert CPF");

    let listed = context
        .runtime
        .block_on(context.repository.list_for_user(&context.owner))
        .expect("list documents");
    let ids: Vec<Uuid> = listed.iter().map(|document| document.id).collect();
    assert_eq!(ids, [cpf.id, rg.id]);
    assert_eq!(listed.first().map(|document| document.size_bytes), Some(4096));

    let exists = context
        .runtime
        .block_on(context.repository.kind_exists(&context.owner, DocumentKind::Rg))
        .expect("kind exists");
    assert!(exists);
}

#[rstest]
fn one_document_per_kind(repo_context: Option<TestContext>) {
    let Some(context) = repo_context else {
        eprintln!("SKIP-TEST-CLUSTER: one_document_per_kind skipped");
        return;
    };

    context
        .insert(&context.owner, DocumentKind::Cnh, 0)
        .expect("first CNH");
    let duplicate = context.insert(&context.owner, DocumentKind::Cnh, 1);
    assert!(matches!(
        duplicate,
        Err(DocumentRepositoryError::KindTaken {
            kind: DocumentKind::Cnh
        })
    ));

    context
        .insert(&context.other, DocumentKind::Cnh, 2)
        .expect("another fan may submit the same kind");
}

#[rstest]
fn lookups_are_scoped_to_the_owner(repo_context: Option<TestContext>) {
    let Some(context) = repo_context else {
        eprintln!("SKIP-TEST-CLUSTER: lookups_are_scoped_to_the_owner skipped");
        return;
    };

    let passport = context
        .insert(&context.owner, DocumentKind::Passport, 0)
        .expect("insert passport");

    let foreign = context
        .runtime
        .block_on(context.repository.find_for_user(&context.other, passport.id))
        .expect("find as other");
    assert!(foreign.is_none());
    let foreign_delete = context
        .runtime
        .block_on(context.repository.delete_for_user(&context.other, passport.id))
        .expect("delete as other");
    assert!(!foreign_delete);

    let own = context
        .runtime
        .block_on(context.repository.find_for_user(&context.owner, passport.id))
        .expect("find as owner");
    assert_eq!(own.map(|document| document.kind), Some(DocumentKind::Passport));

    let deleted = context
        .runtime
        .block_on(context.repository.delete_for_user(&context.owner, passport.id))
        .expect("delete as owner");
    assert!(deleted);
    let listed = context
        .runtime
        .block_on(context.repository.list_for_user(&context.owner))
        .expect("list documents");
    assert!(listed.is_empty());
}
