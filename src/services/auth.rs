// src/services/auth.rs

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};

use crate::{
    common::error::AppError,
    db::{SessionRepository, Store, Tables, TenantRepository, UserRepository},
    models::{
        auth::{AuthResponse, Claims, User},
        session::{Actor, FilteredData, Session, SessionView},
    },
    services::{rbac_service, scope_service, tenancy_service},
};

#[derive(Clone)]
pub struct AuthService {
    user_repo: UserRepository,
    session_repo: SessionRepository,
    tenant_repo: TenantRepository,
    jwt_secret: String,
    session_ttl: Duration,
    store: Store,
}

impl AuthService {
    pub fn new(
        user_repo: UserRepository,
        session_repo: SessionRepository,
        tenant_repo: TenantRepository,
        jwt_secret: String,
        session_ttl: Duration,
        store: Store,
    ) -> Self {
        Self {
            user_repo,
            session_repo,
            tenant_repo,
            jwt_secret,
            session_ttl,
            store,
        }
    }

    /// Login só por e-mail. Um usuário com uma única unidade entra direto na fase ativa.
    pub async fn login_user(&self, email: &str) -> Result<AuthResponse, AppError> {
        let mut tx = self.store.begin().await;

        let expired = self.session_repo.delete_expired(&mut tx, Utc::now(), self.session_ttl);
        if expired > 0 {
            tracing::debug!("🧹 {} sessões expiradas removidas", expired);
        }

        let user = self
            .user_repo
            .find_by_email(&tx, email)
            .cloned()
            .ok_or(AppError::InvalidCredentials)?;

        let session = self.session_repo.insert(
            &mut tx,
            Session::new(user.id, tenancy_service::initial_selection(&user)),
        );

        let token = self.create_token(&session)?;

        tracing::info!(
            "🔑 Login de {} (sessão {}, fase {:?})",
            user.email,
            session.id,
            session.phase()
        );

        Ok(AuthResponse {
            token,
            session: self.build_view(&tx, user, &session),
        })
    }

    pub async fn logout_user(&self, actor: &Actor) -> Result<(), AppError> {
        let mut tx = self.store.begin().await;
        self.session_repo
            .delete(&mut tx, actor.session_id)
            .ok_or(AppError::InvalidToken)?;

        tracing::info!("👋 Logout do usuário {} (sessão {})", actor.user_id, actor.session_id);
        Ok(())
    }

    /// Decodifica o token e relê sessão e usuário, para que edições valham no próximo request.
    pub async fn validate_token(&self, token: &str) -> Result<(User, Session), AppError> {
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_ref()),
            &Validation::default(),
        )
        .map_err(|_| AppError::InvalidToken)?;

        let actor = Actor {
            user_id: token_data.claims.sub,
            session_id: token_data.claims.sid,
        };

        let tx = self.store.read().await;
        let (user, session) = rbac_service::load_actor(&tx, &actor)?;
        if session.is_expired(Utc::now(), self.session_ttl) {
            return Err(AppError::InvalidToken);
        }
        Ok((user, session))
    }

    pub async fn session_view(&self, actor: &Actor) -> Result<SessionView, AppError> {
        let tx = self.store.read().await;
        let (user, session) = rbac_service::load_actor(&tx, actor)?;
        Ok(self.build_view(&tx, user, &session))
    }

    /// Seleção explícita ou troca de unidade.
    pub async fn select_unit(&self, actor: &Actor, raw_unit_id: &str) -> Result<SessionView, AppError> {
        let mut tx = self.store.begin().await;
        let (user, _) = rbac_service::load_actor(&tx, actor)?;

        let selection = tenancy_service::resolve_selection_request(
            &user,
            raw_unit_id,
            self.tenant_repo.list_units(&tx),
        )?;

        let session = self
            .session_repo
            .find_mut(&mut tx, actor.session_id)
            .ok_or(AppError::InvalidToken)?;
        session.selection = selection;
        let session = session.clone();

        tracing::info!("🏬 {} selecionou a unidade {:?}", user.email, session.selection);

        Ok(self.build_view(&tx, user, &session))
    }

    pub async fn filtered_data(&self, actor: &Actor) -> Result<FilteredData, AppError> {
        let tx = self.store.read().await;
        let (user, session) = rbac_service::load_actor(&tx, actor)?;
        Ok(scope_service::filtered_data(&tx, Some(&user), &session.selection))
    }

    fn build_view(&self, tx: &Tables, user: User, session: &Session) -> SessionView {
        let units = self.tenant_repo.list_units(tx);
        SessionView {
            phase: session.phase(),
            active_unit_id: session.selection.clone(),
            is_super_admin: tenancy_service::is_super_admin(&user),
            can_switch_units: tenancy_service::can_switch_units(&user, units),
            accessible_units: tenancy_service::accessible_units(&user, units),
            permissions: rbac_service::module_permissions(&user, &tx.role_permissions),
            user,
        }
    }

    fn create_token(&self, session: &Session) -> Result<String, AppError> {
        let now = Utc::now();
        let expires_at = now + self.session_ttl;

        let claims = Claims {
            sub: session.user_id,
            sid: session.id,
            exp: expires_at.timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        Ok(encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_ref()),
        )?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::seed::demo_tables;
    use crate::models::{
        session::SessionPhase,
        tenancy::{ActiveSelection, UnitId},
    };

    fn service() -> AuthService {
        AuthService::new(
            UserRepository::new(),
            SessionRepository::new(),
            TenantRepository::new(),
            "test-secret".into(),
            Duration::hours(1),
            Store::new(demo_tables()),
        )
    }

    #[tokio::test]
    async fn single_unit_user_goes_straight_to_active() {
        let auth = service();
        let response = auth.login_user("Carlos@Kitchen.com").await.unwrap();

        assert_eq!(response.session.phase, SessionPhase::Active);
        assert_eq!(
            response.session.active_unit_id,
            ActiveSelection::Specific(UnitId::from("prod-central"))
        );
        assert!(!response.session.can_switch_units);
    }

    #[tokio::test]
    async fn multi_unit_user_must_pick_a_unit() {
        let auth = service();
        let response = auth.login_user("chef.regional@kitchen.com").await.unwrap();
        assert_eq!(response.session.phase, SessionPhase::AwaitingUnitSelection);

        let (user, session) = auth.validate_token(&response.token).await.unwrap();
        let view = auth
            .select_unit(&session.actor(), "tecamachalco")
            .await
            .unwrap();
        assert_eq!(user.id, 7);
        assert_eq!(view.phase, SessionPhase::Active);

        let data = auth.filtered_data(&session.actor()).await.unwrap();
        assert!(data.operational_tasks.iter().all(|t| t.unit_id.as_str() == "tecamachalco"));
    }

    #[tokio::test]
    async fn unknown_email_is_rejected() {
        let auth = service();
        assert!(matches!(
            auth.login_user("nadie@kitchen.com").await,
            Err(AppError::InvalidCredentials)
        ));
    }

    #[tokio::test]
    async fn logout_invalidates_the_token() {
        let auth = service();
        let response = auth.login_user("ana@kitchen.com").await.unwrap();
        let (_, session) = auth.validate_token(&response.token).await.unwrap();

        auth.logout_user(&session.actor()).await.unwrap();
        assert!(matches!(
            auth.validate_token(&response.token).await,
            Err(AppError::InvalidToken)
        ));
    }

    #[tokio::test]
    async fn expired_sessions_are_swept_on_login() {
        let auth = service();
        let mut stale = Session::new(5, ActiveSelection::Unset);
        stale.created_at = Utc::now() - Duration::hours(2);
        let stale_id = stale.id;
        let stale_token = auth.create_token(&stale).unwrap();
        {
            let mut tx = auth.store.begin().await;
            auth.session_repo.insert(&mut tx, stale);
        }

        // O JWT ainda não venceu, mas a sessão passou do prazo
        assert!(matches!(
            auth.validate_token(&stale_token).await,
            Err(AppError::InvalidToken)
        ));

        auth.login_user("carlos@kitchen.com").await.unwrap();
        let tx = auth.store.read().await;
        assert!(auth.session_repo.find(&tx, stale_id).is_none());
        assert_eq!(tx.sessions.len(), 1);
    }

    #[tokio::test]
    async fn tampered_token_is_rejected() {
        let auth = service();
        let response = auth.login_user("ana@kitchen.com").await.unwrap();
        let tampered = format!("{}x", response.token);
        assert!(matches!(
            auth.validate_token(&tampered).await,
            Err(AppError::InvalidToken)
        ));
    }
}
