// src/services/tenancy_service.rs

use crate::{
    common::error::AppError,
    db::{Store, TenantRepository},
    models::{
        auth::{Role, User},
        tenancy::{ActiveSelection, BusinessUnit, UnitScope},
    },
};

// ---
// Resolução de acesso a unidades (funções puras)
// ---

/// Super admin é quem tem o escopo `["*"]`, independente do cargo.
pub fn is_super_admin(user: &User) -> bool {
    user.accessible_unit_ids.is_all()
}

/// Unidades acessíveis, sempre na ordem canônica de `all_units`.
/// Ids que não existem em `all_units` são ignorados.
pub fn accessible_units(user: &User, all_units: &[BusinessUnit]) -> Vec<BusinessUnit> {
    all_units
        .iter()
        .filter(|unit| user.accessible_unit_ids.contains(&unit.id))
        .cloned()
        .collect()
}

pub fn can_switch_units(user: &User, all_units: &[BusinessUnit]) -> bool {
    user.role == Role::Admin || accessible_units(user, all_units).len() > 1
}

/// Seleção logo após o login: uma única unidade concreta é escolhida automaticamente.
pub fn initial_selection(user: &User) -> ActiveSelection {
    match &user.accessible_unit_ids {
        UnitScope::Units(ids) if ids.len() == 1 => ActiveSelection::Specific(ids[0].clone()),
        _ => ActiveSelection::Unset,
    }
}

/// Depois de editar o usuário: devolve a nova seleção se a atual deixou de ser válida.
///
/// Só uma unidade concreta fora do novo escopo força a troca. `Global` e `Unset`
/// ficam como estão, assim como qualquer seleção de um usuário que virou super admin.
pub fn reconcile_selection(user: &User, current: &ActiveSelection) -> Option<ActiveSelection> {
    let unit_id = current.concrete()?;
    match &user.accessible_unit_ids {
        UnitScope::AllUnits => None,
        UnitScope::Units(ids) if ids.contains(unit_id) => None,
        UnitScope::Units(ids) if ids.len() == 1 => Some(ActiveSelection::Specific(ids[0].clone())),
        UnitScope::Units(_) => Some(ActiveSelection::Unset),
    }
}

/// Valida a escolha explícita de unidade feita pelo usuário.
pub fn resolve_selection_request(
    user: &User,
    raw: &str,
    all_units: &[BusinessUnit],
) -> Result<ActiveSelection, AppError> {
    match ActiveSelection::parse(raw) {
        ActiveSelection::Unset => Err(AppError::UnknownUnit(raw.to_string())),
        ActiveSelection::Global if user.role == Role::Admin => Ok(ActiveSelection::Global),
        ActiveSelection::Global => Err(AppError::GlobalViewNotAllowed),
        ActiveSelection::Specific(unit_id) => {
            if !all_units.iter().any(|u| u.id == unit_id) {
                return Err(AppError::UnknownUnit(unit_id.to_string()));
            }
            if !user.accessible_unit_ids.contains(&unit_id) {
                return Err(AppError::UnitNotAccessible(unit_id.to_string()));
            }
            Ok(ActiveSelection::Specific(unit_id))
        }
    }
}

// ---
// Serviço
// ---
#[derive(Clone)]
pub struct TenantService {
    tenant_repo: TenantRepository,
    store: Store,
}

impl TenantService {
    pub fn new(tenant_repo: TenantRepository, store: Store) -> Self {
        Self { tenant_repo, store }
    }

    pub async fn list_units(&self) -> Vec<BusinessUnit> {
        let tx = self.store.read().await;
        self.tenant_repo.list_units(&tx).to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::seed::{business_units, users};
    use crate::models::tenancy::UnitId;

    fn user(id: i64) -> User {
        users().into_iter().find(|u| u.id == id).unwrap()
    }

    fn ids(units: &[BusinessUnit]) -> Vec<&str> {
        units.iter().map(|u| u.id.as_str()).collect()
    }

    #[test]
    fn super_admin_sees_every_unit() {
        let units = business_units();
        let admin = user(1);
        assert!(is_super_admin(&admin));
        assert_eq!(accessible_units(&admin, &units), units);
    }

    #[test]
    fn single_unit_user_is_pinned() {
        // Carlos: só prod-central
        let units = business_units();
        let carlos = user(6);
        assert_eq!(ids(&accessible_units(&carlos, &units)), ["prod-central"]);
        assert!(!can_switch_units(&carlos, &units));
    }

    #[test]
    fn accessible_units_follow_canonical_order_and_skip_dangling_ids() {
        let units = business_units();
        let mut chef = user(7);
        chef.accessible_unit_ids = UnitScope::units(["tecamachalco", "narvarte", "polanco"]);
        assert_eq!(ids(&accessible_units(&chef, &units)), ["polanco", "tecamachalco"]);
        assert!(can_switch_units(&chef, &units));
    }

    #[test]
    fn admin_role_can_always_switch() {
        let units = business_units();
        let mut admin = user(9);
        admin.accessible_unit_ids = UnitScope::units(["polanco"]);
        assert!(can_switch_units(&admin, &units));
    }

    #[test]
    fn login_auto_selects_only_a_single_concrete_unit() {
        assert_eq!(
            initial_selection(&user(3)),
            ActiveSelection::Specific(UnitId::from("polanco"))
        );
        assert_eq!(initial_selection(&user(7)), ActiveSelection::Unset);
        assert_eq!(initial_selection(&user(1)), ActiveSelection::Unset);
    }

    #[test]
    fn reconcile_keeps_a_still_valid_selection() {
        let chef = user(7);
        let current = ActiveSelection::Specific(UnitId::from("polanco"));
        assert_eq!(reconcile_selection(&chef, &current), None);
        assert_eq!(reconcile_selection(&chef, &ActiveSelection::Global), None);
        assert_eq!(reconcile_selection(&chef, &ActiveSelection::Unset), None);
    }

    #[test]
    fn reconcile_moves_to_the_only_remaining_unit() {
        let mut chef = user(7);
        chef.accessible_unit_ids = UnitScope::units(["tecamachalco"]);
        let current = ActiveSelection::Specific(UnitId::from("polanco"));
        assert_eq!(
            reconcile_selection(&chef, &current),
            Some(ActiveSelection::Specific(UnitId::from("tecamachalco")))
        );
    }

    #[test]
    fn reconcile_forces_reselection_with_several_units() {
        let mut chef = user(7);
        chef.accessible_unit_ids = UnitScope::units(["tecamachalco", "santa-fe"]);
        let current = ActiveSelection::Specific(UnitId::from("polanco"));
        assert_eq!(reconcile_selection(&chef, &current), Some(ActiveSelection::Unset));
    }

    #[test]
    fn reconcile_never_touches_new_super_admins() {
        let mut chef = user(7);
        chef.accessible_unit_ids = UnitScope::AllUnits;
        let current = ActiveSelection::Specific(UnitId::from("santa-fe"));
        assert_eq!(reconcile_selection(&chef, &current), None);
    }

    #[test]
    fn selection_requests_are_validated() {
        let units = business_units();
        let chef = user(7);

        assert_eq!(
            resolve_selection_request(&chef, "tecamachalco", &units).unwrap(),
            ActiveSelection::Specific(UnitId::from("tecamachalco"))
        );
        assert!(matches!(
            resolve_selection_request(&chef, "santa-fe", &units),
            Err(AppError::UnitNotAccessible(_))
        ));
        assert!(matches!(
            resolve_selection_request(&chef, "narvarte", &units),
            Err(AppError::UnknownUnit(_))
        ));
        assert!(matches!(
            resolve_selection_request(&chef, "all", &units),
            Err(AppError::GlobalViewNotAllowed)
        ));
        assert_eq!(
            resolve_selection_request(&user(9), "all", &units).unwrap(),
            ActiveSelection::Global
        );
    }
}
