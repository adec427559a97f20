// src/services/waste_service.rs

use chrono::{Datelike, Duration, NaiveDate, Utc};
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use validator::Validate;

use crate::{
    common::error::AppError,
    db::{new_record_id, Store, TenantRepository, WasteRepository},
    models::{
        rbac::{AppModule, RequiredLevel},
        session::Actor,
        tenancy::BusinessUnit,
        waste::{LogWastePayload, UnitWasteSummary, Waste, WasteReport, WasteSummary, WasteType},
    },
    services::{rbac_service::ensure_permission, scope_service},
};

/// Segunda-feira da semana de `today`, deslocada em `week_offset` semanas.
/// `None` quando o deslocamento sai do calendário representável.
pub fn week_bounds(today: NaiveDate, week_offset: i64) -> Option<(NaiveDate, NaiveDate)> {
    let monday = today.checked_sub_signed(Duration::days(i64::from(today.weekday().num_days_from_monday())))?;
    let start = monday.checked_add_signed(Duration::try_weeks(week_offset)?)?;
    Some((start, start.checked_add_signed(Duration::days(6))?))
}

/// Agrupa os registros da semana por tipo e por unidade de negócio.
pub fn build_report(records: &[Waste], units: &[BusinessUnit], start: NaiveDate, end: NaiveDate) -> WasteReport {
    let mut week: Vec<Waste> = records
        .iter()
        .filter(|w| {
            let day = w.date.date_naive();
            day >= start && day <= end
        })
        .cloned()
        .collect();
    week.sort_by(|a, b| b.date.cmp(&a.date));

    let mut by_type: BTreeMap<WasteType, WasteSummary> = BTreeMap::new();
    let mut totals: BTreeMap<String, Decimal> = BTreeMap::new();
    for record in &week {
        by_type.entry(record.waste_type).or_default().add(record);
        let total = totals.entry(record.unit.clone()).or_default();
        *total = total.saturating_add(record.quantity);
    }

    // Ordem canônica das unidades; unidades sem registro ficam de fora
    let by_unit = units
        .iter()
        .filter_map(|unit| {
            let mut summary = WasteSummary::default();
            week.iter()
                .filter(|w| w.unit_id == unit.id)
                .for_each(|w| summary.add(w));
            (summary.count > 0).then(|| UnitWasteSummary {
                unit_id: unit.id.clone(),
                unit_name: unit.name.clone(),
                summary,
            })
        })
        .collect();

    WasteReport {
        week_start: start,
        week_end: end,
        records: week,
        by_type,
        by_unit,
        totals,
    }
}

#[derive(Clone)]
pub struct WasteService {
    waste_repo: WasteRepository,
    tenant_repo: TenantRepository,
    store: Store,
}

impl WasteService {
    pub fn new(waste_repo: WasteRepository, tenant_repo: TenantRepository, store: Store) -> Self {
        Self {
            waste_repo,
            tenant_repo,
            store,
        }
    }

    pub async fn list_waste(&self, actor: &Actor) -> Result<Vec<Waste>, AppError> {
        let tx = self.store.read().await;
        let (user, session) = ensure_permission(&tx, actor, AppModule::Waste, RequiredLevel::View)?;

        let mut records = scope_service::scope(self.waste_repo.list(&tx), Some(&user), &session.selection);
        records.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(records)
    }

    /// Responsável e data vêm da sessão; a unidade padrão é a unidade ativa.
    pub async fn log_waste(&self, actor: &Actor, payload: LogWastePayload) -> Result<Waste, AppError> {
        payload.validate()?;

        let mut tx = self.store.begin().await;
        let (user, session) = ensure_permission(&tx, actor, AppModule::Waste, RequiredLevel::Edit)?;

        let unit_id = payload
            .unit_id
            .or_else(|| session.selection.concrete().cloned())
            .ok_or(AppError::ConcreteUnitRequired)?;
        if !self.tenant_repo.unit_exists(&tx, &unit_id) {
            return Err(AppError::UnknownUnit(unit_id.to_string()));
        }
        if !user.accessible_unit_ids.contains(&unit_id) {
            return Err(AppError::UnitNotAccessible(unit_id.to_string()));
        }

        let non_blank = |value: Option<String>| value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let record = Waste {
            id: new_record_id("W"),
            date: Utc::now(),
            unit_id,
            waste_type: payload.waste_type,
            related_recipe_or_batch_id: non_blank(payload.related_recipe_or_batch_id),
            related_recipe_or_batch_name: non_blank(payload.related_recipe_or_batch_name),
            description: non_blank(payload.description),
            quantity: payload.quantity,
            unit: payload.unit.trim().to_string(),
            responsible_user: user.name.clone(),
        };

        let record = self.waste_repo.insert(&mut tx, record);
        tracing::info!(
            "🗑️ Merma {} registrada em {} por {} ({} {})",
            record.id,
            record.unit_id,
            user.email,
            record.quantity,
            record.unit
        );
        Ok(record)
    }

    pub async fn weekly_report(&self, actor: &Actor, week_offset: i64) -> Result<WasteReport, AppError> {
        let tx = self.store.read().await;
        let (user, session) = ensure_permission(&tx, actor, AppModule::Waste, RequiredLevel::View)?;

        let scoped = scope_service::scope(self.waste_repo.list(&tx), Some(&user), &session.selection);
        let (start, end) = week_bounds(Utc::now().date_naive(), week_offset).ok_or_else(|| {
            AppError::invalid_field("weekOffset", "El desplazamiento de semanas está fuera de rango.")
        })?;
        Ok(build_report(&scoped, self.tenant_repo.list_units(&tx), start, end))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{seed::{business_units, demo_tables}, SessionRepository};
    use crate::models::{
        session::Session,
        tenancy::{ActiveSelection, UnitId},
    };
    use chrono::{TimeZone, Weekday};

    fn waste(day: u32, unit: &str, waste_type: WasteType, quantity: i64, measure: &str) -> Waste {
        Waste {
            id: format!("W{day}{unit}"),
            date: Utc.with_ymd_and_hms(2024, 7, day, 12, 0, 0).unwrap(),
            unit_id: UnitId::from(unit),
            waste_type,
            related_recipe_or_batch_id: None,
            related_recipe_or_batch_name: None,
            description: None,
            quantity: Decimal::new(quantity, 0),
            unit: measure.into(),
            responsible_user: "Ana".into(),
        }
    }

    fn payload(unit_id: Option<&str>) -> LogWastePayload {
        LogWastePayload {
            unit_id: unit_id.map(UnitId::from),
            waste_type: WasteType::Porcionado,
            related_recipe_or_batch_id: Some("salsa-roja".into()),
            related_recipe_or_batch_name: Some("Salsa Roja Clásica".into()),
            description: Some("  ".into()),
            quantity: Decimal::ONE,
            unit: "L".into(),
        }
    }

    async fn setup(user_id: i64, selection: ActiveSelection) -> (WasteService, Actor) {
        let store = Store::new(demo_tables());
        let actor = {
            let mut tx = store.begin().await;
            SessionRepository::new()
                .insert(&mut tx, Session::new(user_id, selection))
                .actor()
        };
        (WasteService::new(WasteRepository::new(), TenantRepository::new(), store), actor)
    }

    #[test]
    fn week_starts_on_monday() {
        // 2024-07-18 é quinta-feira
        let thursday = NaiveDate::from_ymd_opt(2024, 7, 18).unwrap();
        let (start, end) = week_bounds(thursday, 0).unwrap();
        assert_eq!(start.weekday(), Weekday::Mon);
        assert_eq!(start, NaiveDate::from_ymd_opt(2024, 7, 15).unwrap());
        assert_eq!(end, NaiveDate::from_ymd_opt(2024, 7, 21).unwrap());

        let (previous, _) = week_bounds(thursday, -1).unwrap();
        assert_eq!(previous, NaiveDate::from_ymd_opt(2024, 7, 8).unwrap());
    }

    #[test]
    fn out_of_calendar_offset_has_no_week() {
        let thursday = NaiveDate::from_ymd_opt(2024, 7, 18).unwrap();
        assert!(week_bounds(thursday, i64::MAX).is_none());
        assert!(week_bounds(thursday, i64::MIN).is_none());
        assert!(week_bounds(thursday, 100_000_000).is_none());
    }

    #[tokio::test]
    async fn huge_week_offset_is_a_validation_error() {
        let (service, ana) = setup(5, ActiveSelection::Specific(UnitId::from("prod-central"))).await;
        assert!(matches!(
            service.weekly_report(&ana, i64::MAX).await,
            Err(AppError::ValidationError(_))
        ));
        assert!(service.weekly_report(&ana, -1).await.is_ok());
    }

    #[test]
    fn report_groups_by_type_and_unit() {
        let records = vec![
            waste(15, "polanco", WasteType::Caducidad, 2, "kg"),
            waste(16, "polanco", WasteType::Caducidad, 3, "kg"),
            waste(17, "prod-central", WasteType::Preparacion, 1, "L"),
            waste(10, "prod-central", WasteType::Otro, 9, "kg"),
        ];
        let start = NaiveDate::from_ymd_opt(2024, 7, 15).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 7, 21).unwrap();
        let report = build_report(&records, &business_units(), start, end);

        assert_eq!(report.records.len(), 3);
        assert_eq!(report.records[0].id, "W17prod-central");
        assert_eq!(report.by_type[&WasteType::Caducidad].count, 2);
        assert_eq!(report.by_type[&WasteType::Caducidad].quantities["kg"], Decimal::new(5, 0));
        assert!(!report.by_type.contains_key(&WasteType::Otro));

        let units: Vec<&str> = report.by_unit.iter().map(|u| u.unit_id.as_str()).collect();
        assert_eq!(units, ["prod-central", "polanco"]);
        assert_eq!(report.totals["kg"], Decimal::new(5, 0));
        assert_eq!(report.totals["L"], Decimal::ONE);
    }

    #[tokio::test]
    async fn log_defaults_to_active_unit() {
        let (service, ana) = setup(5, ActiveSelection::Specific(UnitId::from("prod-central"))).await;
        let record = service.log_waste(&ana, payload(None)).await.unwrap();

        assert_eq!(record.unit_id, UnitId::from("prod-central"));
        assert_eq!(record.responsible_user, "Ana (Producción)");
        assert_eq!(record.description, None);
        assert_eq!(service.list_waste(&ana).await.unwrap()[0].id, record.id);
    }

    #[tokio::test]
    async fn log_rejects_units_outside_the_scope() {
        let (service, ana) = setup(5, ActiveSelection::Specific(UnitId::from("prod-central"))).await;
        assert!(matches!(
            service.log_waste(&ana, payload(Some("polanco"))).await,
            Err(AppError::UnitNotAccessible(_))
        ));

        let (service, root) = setup(1, ActiveSelection::Global).await;
        assert!(matches!(
            service.log_waste(&root, payload(None)).await,
            Err(AppError::ConcreteUnitRequired)
        ));
        assert!(service.log_waste(&root, payload(Some("santa-fe"))).await.is_ok());
    }
}
