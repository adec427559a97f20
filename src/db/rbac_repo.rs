// src/db/rbac_repo.rs

use crate::{
    db::store::Tables,
    models::{
        auth::Role,
        rbac::{AppModule, PermissionLevel, RolePermissions},
    },
};

#[derive(Clone, Default)]
pub struct RbacRepository;

impl RbacRepository {
    pub fn new() -> Self {
        Self
    }

    pub fn role_permissions<'t>(&self, tx: &'t Tables) -> &'t RolePermissions {
        &tx.role_permissions
    }

    // Atualiza uma célula (cargo, módulo) da tabela
    pub fn set_role_level(&self, tx: &mut Tables, role: Role, module: AppModule, level: PermissionLevel) {
        tx.role_permissions.set(role, module, level);
    }
}
