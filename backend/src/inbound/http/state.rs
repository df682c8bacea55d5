//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use mockable::Clock;

use crate::domain::ports::{
    DocumentClassifier, DocumentRepository, DocumentsCommand, DocumentsQuery,
    EsportsProfileVerifier, EsportsValidationCommand, LoginService, PointsLedgerCommand,
    PointsLedgerQuery, PointsLedgerRepository, ProfileCommand, ProfileQuery,
    RegistrationCommand, SocialAccountsCommand, TermsGate, UserRepository,
};
use crate::domain::{
    DocumentService, Error, EsportsValidationService, FixtureLoginService, PointsLedgerService,
    ProfileService, RegistrationService, SocialAccountsService, UserId,
};
use crate::inbound::http::session::SessionContext;

/// Parameter object bundling the driven adapters the services are built on.
pub struct HttpStateAdapters<U, L, D, V, C> {
    pub users: Arc<U>,
    pub ledger: Arc<L>,
    pub documents: Arc<D>,
    pub verifier: Arc<V>,
    pub classifier: Arc<C>,
    pub clock: Arc<dyn Clock>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub login: Arc<dyn LoginService>,
    pub registration: Arc<dyn RegistrationCommand>,
    pub profile: Arc<dyn ProfileCommand>,
    pub profile_query: Arc<dyn ProfileQuery>,
    pub terms: Arc<dyn TermsGate>,
    pub points: Arc<dyn PointsLedgerCommand>,
    pub points_query: Arc<dyn PointsLedgerQuery>,
    pub social: Arc<dyn SocialAccountsCommand>,
    pub esports: Arc<dyn EsportsValidationCommand>,
    pub documents: Arc<dyn DocumentsCommand>,
    pub documents_query: Arc<dyn DocumentsQuery>,
}

impl HttpState {
    /// Wire every domain service on top of one set of adapters.
    ///
    /// All collaborating services share the same ledger service so awards
    /// flow through a single [`PointsLedgerCommand`].
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use fanclub::inbound::http::state::{HttpState, HttpStateAdapters};
    /// use fanclub::outbound::memory::InMemoryStore;
    /// use fanclub::outbound::verification::{HostAllowListVerifier, SizeThresholdClassifier};
    /// use mockable::DefaultClock;
    ///
    /// let store = Arc::new(InMemoryStore::new());
    /// let state = HttpState::from_adapters(HttpStateAdapters {
    ///     users: store.clone(),
    ///     ledger: store.clone(),
    ///     documents: store,
    ///     verifier: Arc::new(HostAllowListVerifier),
    ///     classifier: Arc::new(SizeThresholdClassifier::default()),
    ///     clock: Arc::new(DefaultClock),
    /// });
    /// let _points = state.points.clone();
    /// ```
    pub fn from_adapters<U, L, D, V, C>(adapters: HttpStateAdapters<U, L, D, V, C>) -> Self
    where
        U: UserRepository + 'static,
        L: PointsLedgerRepository + 'static,
        D: DocumentRepository + 'static,
        V: EsportsProfileVerifier + 'static,
        C: DocumentClassifier + 'static,
    {
        let HttpStateAdapters {
            users,
            ledger,
            documents,
            verifier,
            classifier,
            clock,
        } = adapters;

        let ledger_service = Arc::new(PointsLedgerService::new(ledger, clock.clone()));
        let points: Arc<dyn PointsLedgerCommand> = ledger_service.clone();
        let profile_service = Arc::new(ProfileService::new(users.clone(), points.clone()));
        let document_service = Arc::new(DocumentService::new(
            documents,
            classifier,
            points.clone(),
            clock,
        ));

        Self {
            login: Arc::new(FixtureLoginService::new(users.clone())),
            registration: Arc::new(RegistrationService::new(users.clone())),
            profile: profile_service.clone(),
            profile_query: profile_service.clone(),
            terms: profile_service,
            points_query: ledger_service,
            social: Arc::new(SocialAccountsService::new(users.clone(), points.clone())),
            esports: Arc::new(EsportsValidationService::new(
                users,
                verifier,
                points.clone(),
            )),
            documents: document_service.clone(),
            documents_query: document_service,
            points,
        }
    }

    /// Signed-in user who accepted the terms of service.
    ///
    /// Points, social, e-sports and document handlers call this before any
    /// use-case so the gate cannot be skipped.
    pub async fn consenting_user(&self, session: &SessionContext) -> Result<UserId, Error> {
        let user_id = session.require_user_id()?;
        self.terms.require_accepted(&user_id).await?;
        Ok(user_id)
    }
}
