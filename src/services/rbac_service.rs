// src/services/rbac_service.rs

use crate::{
    common::error::AppError,
    db::{RbacRepository, SessionRepository, Store, Tables, UserRepository},
    models::{
        auth::User,
        rbac::{
            AppModule, ModuleInfo, ModulePermissions, PermissionLevel, RequiredLevel,
            RolePermissions, RolePermissionsResponse, UpdateRolePermissionPayload,
        },
        session::{Actor, Session},
    },
    services::tenancy_service::is_super_admin,
};

// ---
// Resolução de permissões (funções puras)
// ---

/// Override do usuário > padrão do cargo > `none`. Super admin sempre tem `edit`.
pub fn effective_permission(user: &User, module: AppModule, table: &RolePermissions) -> PermissionLevel {
    if is_super_admin(user) {
        return PermissionLevel::Edit;
    }

    user.permission_overrides
        .get(&module)
        .copied()
        .unwrap_or_else(|| table.level(user.role, module))
}

/// Sem usuário, a resposta é sempre `false`.
pub fn has_permission(
    user: Option<&User>,
    module: AppModule,
    required: RequiredLevel,
    table: &RolePermissions,
) -> bool {
    user.is_some_and(|u| effective_permission(u, module, table).allows(required))
}

/// Nível efetivo de todos os módulos, para montar menus no cliente.
pub fn module_permissions(user: &User, table: &RolePermissions) -> ModulePermissions {
    AppModule::ALL
        .iter()
        .map(|module| (*module, effective_permission(user, *module, table)))
        .collect()
}

/// Relê usuário e sessão dentro da transação.
/// Sessão encerrada ou usuário excluído invalidam o token.
pub fn load_actor(tx: &Tables, actor: &Actor) -> Result<(User, Session), AppError> {
    let session = SessionRepository::new()
        .find(tx, actor.session_id)
        .filter(|s| s.user_id == actor.user_id)
        .cloned()
        .ok_or(AppError::InvalidToken)?;

    let user = UserRepository::new()
        .find_by_id(tx, actor.user_id)
        .cloned()
        .ok_or(AppError::InvalidToken)?;

    Ok((user, session))
}

/// Verificação feita dentro da mesma transação que aplica a mutação.
pub fn ensure_permission(
    tx: &Tables,
    actor: &Actor,
    module: AppModule,
    required: RequiredLevel,
) -> Result<(User, Session), AppError> {
    let (user, session) = load_actor(tx, actor)?;

    if !has_permission(Some(&user), module, required, &tx.role_permissions) {
        return Err(AppError::PermissionDenied { module, required });
    }

    Ok((user, session))
}

// ---
// Serviço
// ---
#[derive(Clone)]
pub struct RbacService {
    rbac_repo: RbacRepository,
    store: Store,
}

impl RbacService {
    pub fn new(rbac_repo: RbacRepository, store: Store) -> Self {
        Self { rbac_repo, store }
    }

    pub async fn get_role_permissions(&self, actor: &Actor) -> Result<RolePermissionsResponse, AppError> {
        let tx = self.store.read().await;
        let (user, _) = load_actor(&tx, actor)?;
        if !is_super_admin(&user) {
            return Err(AppError::SuperAdminRequired);
        }

        Ok(RolePermissionsResponse {
            roles: self.rbac_repo.role_permissions(&tx).clone(),
            editable_modules: AppModule::ALL
                .into_iter()
                .filter(|m| m.is_editable_target())
                .map(ModuleInfo::from)
                .collect(),
        })
    }

    pub async fn update_role_permission(
        &self,
        actor: &Actor,
        payload: UpdateRolePermissionPayload,
    ) -> Result<RolePermissions, AppError> {
        let mut tx = self.store.begin().await;
        let (user, _) = load_actor(&tx, actor)?;
        if !is_super_admin(&user) {
            return Err(AppError::SuperAdminRequired);
        }
        if !payload.module.is_editable_target() {
            return Err(AppError::ProtectedModule(payload.module));
        }

        self.rbac_repo
            .set_role_level(&mut tx, payload.role, payload.module, payload.level);

        tracing::info!(
            "🔐 Permissão do cargo {} em '{}' alterada para {:?} por {}",
            payload.role,
            payload.module,
            payload.level,
            user.email
        );

        Ok(self.rbac_repo.role_permissions(&tx).clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::seed::{demo_tables, role_permissions, users};
    use crate::models::{auth::Role, tenancy::ActiveSelection};

    fn user(id: i64) -> User {
        users().into_iter().find(|u| u.id == id).unwrap()
    }

    #[test]
    fn super_admin_passes_every_check() {
        let table = RolePermissions::new();
        let admin = user(1);
        for module in AppModule::ALL {
            for required in [RequiredLevel::View, RequiredLevel::Edit] {
                assert!(has_permission(Some(&admin), module, required, &table));
            }
        }
    }

    #[test]
    fn super_admin_ignores_overrides() {
        let admin = user(1).with_override(AppModule::Batches, PermissionLevel::None);
        assert_eq!(
            effective_permission(&admin, AppModule::Batches, &role_permissions()),
            PermissionLevel::Edit
        );
    }

    #[test]
    fn override_beats_role_default() {
        // Marketing: cargo Admin com edit em produccion, override none
        let marketing = user(10);
        let table = role_permissions();
        assert_eq!(table.level(Role::Admin, AppModule::Production), PermissionLevel::Edit);
        assert_eq!(
            effective_permission(&marketing, AppModule::Production, &table),
            PermissionLevel::None
        );
        assert_eq!(
            effective_permission(&marketing, AppModule::Recipes, &table),
            PermissionLevel::Edit
        );
    }

    #[test]
    fn override_can_also_widen() {
        let servicio = user(3).with_override(AppModule::Batches, PermissionLevel::Edit);
        assert_eq!(
            effective_permission(&servicio, AppModule::Batches, &role_permissions()),
            PermissionLevel::Edit
        );
    }

    #[test]
    fn missing_role_entry_falls_back_to_none() {
        let table = RolePermissions::new().with(Role::Servicio, &[(AppModule::Waste, PermissionLevel::View)]);
        let servicio = user(3);
        assert_eq!(effective_permission(&servicio, AppModule::Waste, &table), PermissionLevel::View);
        assert_eq!(effective_permission(&servicio, AppModule::Recipes, &table), PermissionLevel::None);
    }

    #[test]
    fn no_user_means_no_access() {
        let table = role_permissions();
        for module in AppModule::ALL {
            assert!(!has_permission(None, module, RequiredLevel::View, &table));
        }
    }

    #[test]
    fn edit_always_implies_view() {
        let table = role_permissions();
        for u in users() {
            for module in AppModule::ALL {
                if has_permission(Some(&u), module, RequiredLevel::Edit, &table) {
                    assert!(has_permission(Some(&u), module, RequiredLevel::View, &table));
                }
            }
        }
    }

    #[test]
    fn ana_loses_edit_after_override() {
        let table = role_permissions();
        let ana = user(5);
        assert!(has_permission(Some(&ana), AppModule::Production, RequiredLevel::Edit, &table));

        let ana = ana.with_override(AppModule::Production, PermissionLevel::View);
        assert!(!has_permission(Some(&ana), AppModule::Production, RequiredLevel::Edit, &table));
        assert!(has_permission(Some(&ana), AppModule::Production, RequiredLevel::View, &table));
    }

    #[test]
    fn module_permissions_cover_every_module() {
        let perms = module_permissions(&user(4), &role_permissions());
        assert_eq!(perms.len(), AppModule::ALL.len());
        assert_eq!(perms[&AppModule::Recipes], PermissionLevel::Edit);
        assert_eq!(perms[&AppModule::AdminUsers], PermissionLevel::None);
    }

    #[test]
    fn ensure_permission_rereads_the_role_table() {
        let mut tables = demo_tables();
        let session = Session::new(5, ActiveSelection::Unset);
        let actor = session.actor();
        tables.sessions.insert(session.id, session);

        assert!(ensure_permission(&tables, &actor, AppModule::Production, RequiredLevel::Edit).is_ok());

        tables
            .role_permissions
            .set(Role::Produccion, AppModule::Production, PermissionLevel::View);
        assert!(matches!(
            ensure_permission(&tables, &actor, AppModule::Production, RequiredLevel::Edit),
            Err(AppError::PermissionDenied { .. })
        ));
    }

    #[test]
    fn ended_session_is_rejected() {
        let tables = demo_tables();
        let actor = Session::new(5, ActiveSelection::Unset).actor();
        assert!(matches!(
            ensure_permission(&tables, &actor, AppModule::Recipes, RequiredLevel::View),
            Err(AppError::InvalidToken)
        ));
    }

    #[tokio::test]
    async fn only_super_admin_edits_the_table() {
        let mut tables = demo_tables();
        let root = Session::new(1, ActiveSelection::Global);
        let branch_admin = Session::new(9, ActiveSelection::Global);
        let (root_actor, branch_actor) = (root.actor(), branch_admin.actor());
        tables.sessions.insert(root.id, root);
        tables.sessions.insert(branch_admin.id, branch_admin);

        let service = RbacService::new(RbacRepository::new(), Store::new(tables));
        let payload = || UpdateRolePermissionPayload {
            role: Role::Cocina,
            module: AppModule::WeeklySummary,
            level: PermissionLevel::View,
        };

        assert!(matches!(
            service.update_role_permission(&branch_actor, payload()).await,
            Err(AppError::SuperAdminRequired)
        ));

        let table = service.update_role_permission(&root_actor, payload()).await.unwrap();
        assert_eq!(table.level(Role::Cocina, AppModule::WeeklySummary), PermissionLevel::View);

        let protected = UpdateRolePermissionPayload {
            role: Role::Cocina,
            module: AppModule::AdminPermissions,
            level: PermissionLevel::Edit,
        };
        assert!(matches!(
            service.update_role_permission(&root_actor, protected).await,
            Err(AppError::ProtectedModule(AppModule::AdminPermissions))
        ));

        let response = service.get_role_permissions(&root_actor).await.unwrap();
        assert_eq!(response.editable_modules.len(), AppModule::ALL.len() - 1);
    }
}
