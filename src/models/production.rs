// src/models/production.rs

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use utoipa::ToSchema;
use validator::Validate;

use crate::models::{
    auth::UserId,
    recipes::validate_positive,
    tenancy::UnitId,
};

// ---
// 1. Tarefa do plano de produção
// ---
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum ProductionStatus {
    Pendiente,
    #[serde(rename = "En progreso")]
    EnProgreso,
    Completado,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductionTask {
    #[schema(example = "task1")]
    pub id: String,
    pub recipe_id: String,
    pub recipe_name: String,
    #[schema(value_type = f64, example = 20.0)]
    pub quantity_to_produce: Decimal,
    pub unit: String,
    pub priority: u32,
    pub status: ProductionStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_user_id: Option<UserId>,
    pub unit_id: UnitId,
}

impl ProductionTask {
    pub fn is_completed(&self) -> bool {
        self.status == ProductionStatus::Completado
    }
}

// ---
// 2. Cronômetro por tarefa
// ---
// Tempo acumulado + trecho em andamento, medido com relógio monotônico.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TaskTimer {
    accumulated: Duration,
    started_at: Option<Instant>,
}

impl TaskTimer {
    /// Cria um cronômetro já rodando.
    pub fn started(now: Instant) -> Self {
        Self {
            accumulated: Duration::ZERO,
            started_at: Some(now),
        }
    }

    pub fn is_running(&self) -> bool {
        self.started_at.is_some()
    }

    /// Pausar um cronômetro parado não faz nada.
    pub fn pause(&mut self, now: Instant) {
        if let Some(start) = self.started_at.take() {
            self.accumulated += now.saturating_duration_since(start);
        }
    }

    /// Retomar um cronômetro que já roda não reinicia o trecho atual.
    pub fn resume(&mut self, now: Instant) {
        if self.started_at.is_none() {
            self.started_at = Some(now);
        }
    }

    pub fn elapsed(&self, now: Instant) -> Duration {
        match self.started_at {
            Some(start) => self.accumulated + now.saturating_duration_since(start),
            None => self.accumulated,
        }
    }

    /// Segundos arredondados, como gravados no lote.
    pub fn elapsed_seconds(&self, now: Instant) -> u64 {
        let elapsed = self.elapsed(now);
        let millis = elapsed.as_millis();
        ((millis + 500) / 1000) as u64
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TimerView {
    pub task_id: String,
    pub running: bool,
    pub elapsed_seconds: u64,
}

// ---
// 3. Payloads
// ---
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskPayload {
    #[validate(length(min = 1, message = "La receta es obligatoria."))]
    #[schema(example = "salsa-roja")]
    pub recipe_id: String,
    #[validate(custom(function = "validate_positive"))]
    #[schema(value_type = f64, example = 20.0)]
    pub quantity: Decimal,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AssignTaskPayload {
    /// `null` remove a atribuição.
    pub user_id: Option<UserId>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReorderPayload {
    pub dragged_id: String,
    pub target_id: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompleteTaskPayload {
    #[validate(custom(function = "validate_positive"))]
    #[schema(value_type = f64, example = 18.5)]
    pub actual_yield: Decimal,
    /// Se ausente, o nome do usuário da sessão.
    pub producer_name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timer_accumulates_across_pauses() {
        let t0 = Instant::now();
        let mut timer = TaskTimer::started(t0);

        timer.pause(t0 + Duration::from_secs(30));
        assert!(!timer.is_running());
        // Parado: o relógio não avança
        assert_eq!(timer.elapsed(t0 + Duration::from_secs(500)), Duration::from_secs(30));

        timer.resume(t0 + Duration::from_secs(100));
        assert_eq!(timer.elapsed(t0 + Duration::from_secs(110)), Duration::from_secs(40));
    }

    #[test]
    fn double_pause_and_double_resume_are_noops() {
        let t0 = Instant::now();
        let mut timer = TaskTimer::started(t0);
        timer.resume(t0 + Duration::from_secs(5));
        timer.pause(t0 + Duration::from_secs(10));
        timer.pause(t0 + Duration::from_secs(20));
        assert_eq!(timer.elapsed(t0 + Duration::from_secs(60)), Duration::from_secs(10));
    }

    #[test]
    fn elapsed_seconds_round_to_nearest() {
        let t0 = Instant::now();
        let timer = TaskTimer::started(t0);
        assert_eq!(timer.elapsed_seconds(t0 + Duration::from_millis(1499)), 1);
        assert_eq!(timer.elapsed_seconds(t0 + Duration::from_millis(1500)), 2);
    }

    #[test]
    fn status_labels() {
        assert_eq!(
            serde_json::to_string(&ProductionStatus::EnProgreso).unwrap(),
            r#""En progreso""#
        );
    }
}
