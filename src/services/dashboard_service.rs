// src/services/dashboard_service.rs

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};

use crate::{
    common::error::AppError,
    db::{ProductionRepository, Store},
    models::{
        batches::Batch,
        rbac::{AppModule, RequiredLevel},
        reports::{ProductionByRecipe, SummaryPeriod, WeeklySummary},
        session::Actor,
    },
    services::{rbac_service::ensure_permission, scope_service},
};

fn midnight(day: NaiveDate) -> DateTime<Utc> {
    day.and_time(chrono::NaiveTime::MIN).and_utc()
}

/// Janela inclusiva do período: esta semana vai de domingo 00:00 até agora,
/// o mês passado cobre o mês civil anterior inteiro.
pub fn period_window(now: DateTime<Utc>, period: SummaryPeriod) -> (DateTime<Utc>, DateTime<Utc>) {
    let today = now.date_naive();
    match period {
        SummaryPeriod::ThisWeek => {
            let sunday = today - Duration::days(i64::from(today.weekday().num_days_from_sunday()));
            (midnight(sunday), now)
        }
        SummaryPeriod::LastMonth => {
            let first_of_month = today.with_day(1).unwrap_or(today);
            let last_of_previous = first_of_month - Duration::days(1);
            let first_of_previous = last_of_previous.with_day(1).unwrap_or(last_of_previous);
            (
                midnight(first_of_previous),
                midnight(first_of_month) - Duration::nanoseconds(1),
            )
        }
    }
}

/// Soma das quantidades por receita, na ordem em que cada receita aparece.
/// A soma satura no máximo do `Decimal`.
pub fn production_by_recipe(batches: &[Batch]) -> Vec<ProductionByRecipe> {
    let mut report: Vec<ProductionByRecipe> = Vec::new();
    for batch in batches {
        match report.iter_mut().find(|r| r.recipe_name == batch.recipe_name) {
            Some(entry) => entry.total_quantity = entry.total_quantity.saturating_add(batch.quantity),
            None => report.push(ProductionByRecipe {
                recipe_name: batch.recipe_name.clone(),
                total_quantity: batch.quantity,
            }),
        }
    }
    report
}

#[derive(Clone)]
pub struct DashboardService {
    production_repo: ProductionRepository,
    store: Store,
}

impl DashboardService {
    pub fn new(production_repo: ProductionRepository, store: Store) -> Self {
        Self { production_repo, store }
    }

    pub async fn weekly_summary(&self, actor: &Actor, period: SummaryPeriod) -> Result<WeeklySummary, AppError> {
        let tx = self.store.read().await;
        let (user, session) = ensure_permission(&tx, actor, AppModule::WeeklySummary, RequiredLevel::View)?;

        let (start, end) = period_window(Utc::now(), period);
        let mut batches: Vec<Batch> = scope_service::scope(
            self.production_repo.list_batches(&tx),
            Some(&user),
            &session.selection,
        )
        .into_iter()
        .filter(|b| b.production_date >= start && b.production_date <= end)
        .collect();
        batches.sort_by(|a, b| b.production_date.cmp(&a.production_date));

        Ok(WeeklySummary { period, batches })
    }

    pub async fn production_report(&self, actor: &Actor) -> Result<Vec<ProductionByRecipe>, AppError> {
        let tx = self.store.read().await;
        let (user, session) = ensure_permission(&tx, actor, AppModule::AdminReports, RequiredLevel::View)?;

        let batches = scope_service::scope(
            self.production_repo.list_batches(&tx),
            Some(&user),
            &session.selection,
        );
        Ok(production_by_recipe(&batches))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{seed::demo_tables, SessionRepository};
    use rust_decimal::Decimal;
    use crate::models::{
        session::Session,
        tenancy::{ActiveSelection, UnitId},
    };
    use chrono::{TimeZone, Weekday};

    fn total_produced(report: &[ProductionByRecipe]) -> Decimal {
        report.iter().map(|r| r.total_quantity).sum()
    }

    async fn setup(user_id: i64, selection: ActiveSelection) -> (DashboardService, Actor) {
        let store = Store::new(demo_tables());
        let actor = {
            let mut tx = store.begin().await;
            SessionRepository::new()
                .insert(&mut tx, Session::new(user_id, selection))
                .actor()
        };
        (DashboardService::new(ProductionRepository::new(), store), actor)
    }

    #[test]
    fn this_week_starts_on_sunday() {
        let thursday = Utc.with_ymd_and_hms(2024, 7, 18, 15, 30, 0).unwrap();
        let (start, end) = period_window(thursday, SummaryPeriod::ThisWeek);
        assert_eq!(start, Utc.with_ymd_and_hms(2024, 7, 14, 0, 0, 0).unwrap());
        assert_eq!(start.weekday(), Weekday::Sun);
        assert_eq!(end, thursday);
    }

    #[test]
    fn last_month_is_the_previous_calendar_month() {
        let now = Utc.with_ymd_and_hms(2024, 3, 10, 9, 0, 0).unwrap();
        let (start, end) = period_window(now, SummaryPeriod::LastMonth);
        assert_eq!(start, Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap());
        assert_eq!(end.date_naive(), NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());

        let january = Utc.with_ymd_and_hms(2025, 1, 5, 9, 0, 0).unwrap();
        let (start, _) = period_window(january, SummaryPeriod::LastMonth);
        assert_eq!(start, Utc.with_ymd_and_hms(2024, 12, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn report_sums_by_recipe_name() {
        let mut batches = demo_tables().batches;
        let mut extra = batches[0].clone();
        extra.quantity = Decimal::new(25, 1);
        batches.push(extra);

        let report = production_by_recipe(&batches);
        assert_eq!(report.len(), 3);
        assert_eq!(report[0].recipe_name, batches[0].recipe_name);
        assert_eq!(report[0].total_quantity, batches[0].quantity + Decimal::new(25, 1));
        assert_eq!(total_produced(&report), batches.iter().map(|b| b.quantity).sum::<Decimal>());
    }

    #[test]
    fn report_total_saturates_instead_of_overflowing() {
        let mut batches = demo_tables().batches;
        batches.truncate(1);
        batches[0].quantity = Decimal::MAX;
        batches.push(batches[0].clone());

        let report = production_by_recipe(&batches);
        assert_eq!(report[0].total_quantity, Decimal::MAX);
    }

    #[tokio::test]
    async fn summary_requires_weekly_summary_permission() {
        let (service, cocina) = setup(4, ActiveSelection::Specific(UnitId::from("polanco"))).await;
        assert!(matches!(
            service.weekly_summary(&cocina, SummaryPeriod::ThisWeek).await,
            Err(AppError::PermissionDenied { .. })
        ));

        let (service, ana) = setup(5, ActiveSelection::Specific(UnitId::from("prod-central"))).await;
        let summary = service.weekly_summary(&ana, SummaryPeriod::ThisWeek).await.unwrap();
        assert!(summary.batches.iter().all(|b| b.unit_id == UnitId::from("prod-central")));
        assert!(summary
            .batches
            .windows(2)
            .all(|pair| pair[0].production_date >= pair[1].production_date));
    }

    #[tokio::test]
    async fn report_is_scoped() {
        let (service, root) = setup(1, ActiveSelection::Global).await;
        let all: Decimal = total_produced(&service.production_report(&root).await.unwrap());

        let (service, root) = setup(1, ActiveSelection::Specific(UnitId::from("polanco"))).await;
        let polanco: Decimal = total_produced(&service.production_report(&root).await.unwrap());
        assert!(polanco < all);
    }
}
