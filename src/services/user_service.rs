// src/services/user_service.rs

use validator::Validate;

use crate::{
    common::error::AppError,
    db::{SessionRepository, Store, Tables, TenantRepository, UserRepository},
    models::{
        auth::{User, UserId, UserPayload},
        rbac::{AppModule, RequiredLevel},
        session::Actor,
        tenancy::UnitScope,
    },
    services::{rbac_service::ensure_permission, tenancy_service::reconcile_selection},
};

#[derive(Clone)]
pub struct UserService {
    user_repo: UserRepository,
    session_repo: SessionRepository,
    tenant_repo: TenantRepository,
    store: Store,
}

impl UserService {
    pub fn new(
        user_repo: UserRepository,
        session_repo: SessionRepository,
        tenant_repo: TenantRepository,
        store: Store,
    ) -> Self {
        Self {
            user_repo,
            session_repo,
            tenant_repo,
            store,
        }
    }

    pub async fn list_users(&self, actor: &Actor) -> Result<Vec<User>, AppError> {
        let tx = self.store.read().await;
        ensure_permission(&tx, actor, AppModule::AdminUsers, RequiredLevel::View)?;
        Ok(self.user_repo.list(&tx))
    }

    pub async fn create_user(&self, actor: &Actor, payload: UserPayload) -> Result<User, AppError> {
        payload.validate()?;

        let mut tx = self.store.begin().await;
        let (admin, _) = ensure_permission(&tx, actor, AppModule::AdminUsers, RequiredLevel::Edit)?;
        self.check_payload(&tx, &payload, None)?;

        let mut user = User::new(
            self.user_repo.next_id(&tx),
            payload.name.trim(),
            payload.email.trim(),
            payload.role,
            payload.accessible_unit_ids,
        );
        user.permission_overrides = payload.permission_overrides;

        let user = self.user_repo.insert(&mut tx, user);
        tracing::info!("👤 Usuário {} criado por {}", user.email, admin.email);
        Ok(user)
    }

    /// Atualiza o usuário e reajusta a unidade ativa de todas as sessões dele.
    pub async fn update_user(
        &self,
        actor: &Actor,
        id: UserId,
        payload: UserPayload,
    ) -> Result<User, AppError> {
        payload.validate()?;

        let mut tx = self.store.begin().await;
        let (admin, _) = ensure_permission(&tx, actor, AppModule::AdminUsers, RequiredLevel::Edit)?;
        if self.user_repo.find_by_id(&tx, id).is_none() {
            return Err(AppError::UserNotFound);
        }
        self.check_payload(&tx, &payload, Some(id))?;

        let mut user = User::new(
            id,
            payload.name.trim(),
            payload.email.trim(),
            payload.role,
            payload.accessible_unit_ids,
        );
        user.permission_overrides = payload.permission_overrides;
        let user = self.user_repo.update(&mut tx, user)?;

        for session in self.session_repo.for_user_mut(&mut tx, id) {
            if let Some(selection) = reconcile_selection(&user, &session.selection) {
                tracing::info!(
                    "🔄 Sessão {} de {} mudou de {:?} para {:?}",
                    session.id,
                    user.email,
                    session.selection,
                    selection
                );
                session.selection = selection;
            }
        }

        tracing::info!("👤 Usuário {} atualizado por {}", user.email, admin.email);
        Ok(user)
    }

    pub async fn delete_user(&self, actor: &Actor, id: UserId) -> Result<(), AppError> {
        let mut tx = self.store.begin().await;
        let (admin, _) = ensure_permission(&tx, actor, AppModule::AdminUsers, RequiredLevel::Edit)?;
        if admin.id == id {
            return Err(AppError::CannotDeleteSelf);
        }

        let removed = self.user_repo.delete(&mut tx, id)?;
        let sessions = self.session_repo.delete_for_user(&mut tx, id);

        tracing::info!(
            "🗑️ Usuário {} excluído por {} ({} sessões encerradas)",
            removed.email,
            admin.email,
            sessions
        );
        Ok(())
    }

    fn check_payload(
        &self,
        tx: &Tables,
        payload: &UserPayload,
        editing: Option<UserId>,
    ) -> Result<(), AppError> {
        if self.user_repo.email_taken(tx, &payload.email, editing) {
            return Err(AppError::EmailAlreadyExists);
        }

        if payload.accessible_unit_ids.is_empty() {
            return Err(AppError::EmptyUnitScope);
        }
        if let UnitScope::Units(ids) = &payload.accessible_unit_ids {
            if let Some(unknown) = ids.iter().find(|id| !self.tenant_repo.unit_exists(tx, id)) {
                return Err(AppError::UnknownUnit(unknown.to_string()));
            }
        }

        if let Some(module) = payload
            .permission_overrides
            .keys()
            .find(|m| !m.is_editable_target())
        {
            return Err(AppError::ProtectedModule(*module));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::seed::demo_tables;
    use crate::models::{
        auth::Role,
        rbac::{ModulePermissions, PermissionLevel},
        session::Session,
        tenancy::{ActiveSelection, UnitId},
    };

    struct Fixture {
        service: UserService,
        store: Store,
        admin: Actor,
    }

    async fn fixture() -> Fixture {
        let store = Store::new(demo_tables());
        let admin = {
            let mut tx = store.begin().await;
            SessionRepository::new()
                .insert(&mut tx, Session::new(1, ActiveSelection::Global))
                .actor()
        };
        let service = UserService::new(
            UserRepository::new(),
            SessionRepository::new(),
            TenantRepository::new(),
            store.clone(),
        );
        Fixture { service, store, admin }
    }

    async fn open_session(store: &Store, user_id: UserId, unit: &str) -> Actor {
        let mut tx = store.begin().await;
        SessionRepository::new()
            .insert(
                &mut tx,
                Session::new(user_id, ActiveSelection::Specific(UnitId::from(unit))),
            )
            .actor()
    }

    fn payload(email: &str, units: UnitScope) -> UserPayload {
        UserPayload {
            name: "Nuevo Usuario".into(),
            email: email.into(),
            role: Role::Cocina,
            accessible_unit_ids: units,
            permission_overrides: ModulePermissions::new(),
        }
    }

    fn chef_payload(units: UnitScope) -> UserPayload {
        UserPayload {
            name: "Chef Regional".into(),
            email: "chef.regional@kitchen.com".into(),
            role: Role::Cocina,
            accessible_unit_ids: units,
            permission_overrides: ModulePermissions::new(),
        }
    }

    #[tokio::test]
    async fn creates_user_with_next_id() {
        let f = fixture().await;
        let user = f
            .service
            .create_user(&f.admin, payload("nuevo@kitchen.com", UnitScope::units(["polanco"])))
            .await
            .unwrap();
        assert_eq!(user.id, 11);
    }

    #[tokio::test]
    async fn rejects_duplicate_email_ignoring_case() {
        let f = fixture().await;
        let result = f
            .service
            .create_user(&f.admin, payload("ANA@kitchen.com", UnitScope::units(["polanco"])))
            .await;
        assert!(matches!(result, Err(AppError::EmailAlreadyExists)));
    }

    #[tokio::test]
    async fn rejects_empty_or_unknown_units() {
        let f = fixture().await;
        let empty = f
            .service
            .create_user(&f.admin, payload("a@kitchen.com", UnitScope::Units(vec![])))
            .await;
        assert!(matches!(empty, Err(AppError::EmptyUnitScope)));

        let unknown = f
            .service
            .create_user(&f.admin, payload("b@kitchen.com", UnitScope::units(["narvarte"])))
            .await;
        assert!(matches!(unknown, Err(AppError::UnknownUnit(_))));
    }

    #[tokio::test]
    async fn rejects_override_on_permission_screen() {
        let f = fixture().await;
        let mut p = payload("c@kitchen.com", UnitScope::units(["polanco"]));
        p.permission_overrides
            .insert(AppModule::AdminPermissions, PermissionLevel::Edit);
        assert!(matches!(
            f.service.create_user(&f.admin, p).await,
            Err(AppError::ProtectedModule(AppModule::AdminPermissions))
        ));
    }

    #[tokio::test]
    async fn non_admin_cannot_manage_users() {
        let f = fixture().await;
        let ana = open_session(&f.store, 5, "prod-central").await;
        assert!(matches!(
            f.service.list_users(&ana).await,
            Err(AppError::PermissionDenied { .. })
        ));
    }

    #[tokio::test]
    async fn edit_moves_session_to_the_only_remaining_unit() {
        let f = fixture().await;
        let chef = open_session(&f.store, 7, "polanco").await;

        f.service
            .update_user(&f.admin, 7, chef_payload(UnitScope::units(["tecamachalco"])))
            .await
            .unwrap();

        let tx = f.store.read().await;
        assert_eq!(
            tx.sessions[&chef.session_id].selection,
            ActiveSelection::Specific(UnitId::from("tecamachalco"))
        );
    }

    #[tokio::test]
    async fn edit_forces_reselection_when_several_units_remain() {
        let f = fixture().await;
        let chef = open_session(&f.store, 7, "polanco").await;

        f.service
            .update_user(
                &f.admin,
                7,
                chef_payload(UnitScope::units(["tecamachalco", "santa-fe"])),
            )
            .await
            .unwrap();

        let tx = f.store.read().await;
        assert_eq!(tx.sessions[&chef.session_id].selection, ActiveSelection::Unset);
    }

    #[tokio::test]
    async fn promotion_to_super_admin_keeps_selection() {
        let f = fixture().await;
        let chef = open_session(&f.store, 7, "polanco").await;

        f.service
            .update_user(&f.admin, 7, chef_payload(UnitScope::AllUnits))
            .await
            .unwrap();

        let tx = f.store.read().await;
        assert_eq!(
            tx.sessions[&chef.session_id].selection,
            ActiveSelection::Specific(UnitId::from("polanco"))
        );
    }

    #[tokio::test]
    async fn delete_ends_sessions_but_not_own_account() {
        let f = fixture().await;
        let chef = open_session(&f.store, 7, "polanco").await;

        assert!(matches!(
            f.service.delete_user(&f.admin, 1).await,
            Err(AppError::CannotDeleteSelf)
        ));

        f.service.delete_user(&f.admin, 7).await.unwrap();
        let tx = f.store.read().await;
        assert!(!tx.sessions.contains_key(&chef.session_id));
        assert!(tx.users.iter().all(|u| u.id != 7));
    }
}
