// src/models/tenancy.rs

use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;

/// Valor reservado que, dentro da lista de unidades de um usuário, significa "todas".
pub const ALL_UNITS_SENTINEL: &str = "*";

/// Valor reservado para a seleção de visão global na sessão.
pub const GLOBAL_SELECTION: &str = "all";

// ---
// 1. UnitId
// ---
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
#[schema(value_type = String, example = "polanco")]
pub struct UnitId(pub String);

impl UnitId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for UnitId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

// ---
// 2. BusinessUnit (Sucursal ou Produção Central)
// ---
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum UnitKind {
    Branch,
    Production,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BusinessUnit {
    pub id: UnitId,
    #[schema(example = "Sucursal Polanco")]
    pub name: String,
    #[serde(rename = "type")]
    pub kind: UnitKind,
}

impl BusinessUnit {
    pub fn new(id: &str, name: &str, kind: UnitKind) -> Self {
        Self {
            id: UnitId::new(id),
            name: name.to_string(),
            kind,
        }
    }
}

// ---
// 3. UnitScope: quais unidades um usuário pode acessar
// ---
// No JSON continua sendo `["*"]` ou a lista de ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub enum UnitScope {
    AllUnits,
    Units(Vec<UnitId>),
}

impl UnitScope {
    /// Monta uma lista específica, removendo duplicados e mantendo a ordem.
    pub fn units<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut unique: Vec<UnitId> = Vec::new();
        for id in ids {
            let id = UnitId(id.into());
            if !unique.contains(&id) {
                unique.push(id);
            }
        }
        Self::Units(unique)
    }

    pub fn is_all(&self) -> bool {
        matches!(self, Self::AllUnits)
    }

    pub fn contains(&self, unit_id: &UnitId) -> bool {
        match self {
            Self::AllUnits => true,
            Self::Units(ids) => ids.contains(unit_id),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Units(ids) if ids.is_empty())
    }
}

impl TryFrom<Vec<String>> for UnitScope {
    type Error = String;

    fn try_from(ids: Vec<String>) -> Result<Self, Self::Error> {
        if ids.len() == 1 && ids[0] == ALL_UNITS_SENTINEL {
            return Ok(Self::AllUnits);
        }
        if ids.iter().any(|id| id == ALL_UNITS_SENTINEL) {
            return Err(format!(
                "'{ALL_UNITS_SENTINEL}' must be the only entry of accessibleUnitIds"
            ));
        }
        Ok(Self::units(ids))
    }
}

impl From<UnitScope> for Vec<String> {
    fn from(scope: UnitScope) -> Self {
        match scope {
            UnitScope::AllUnits => vec![ALL_UNITS_SENTINEL.to_string()],
            UnitScope::Units(ids) => ids.into_iter().map(|id| id.0).collect(),
        }
    }
}

// ---
// 4. ActiveSelection: a unidade ativa da sessão
// ---
// `null` = seleção pendente, `"all"` = visão global, qualquer outro valor = unidade concreta.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "Option<String>", into = "Option<String>")]
pub enum ActiveSelection {
    #[default]
    Unset,
    Global,
    Specific(UnitId),
}

impl ActiveSelection {
    /// Interpreta o valor enviado pelo cliente na troca de unidade.
    pub fn parse(raw: &str) -> Self {
        match raw.trim() {
            "" => Self::Unset,
            GLOBAL_SELECTION => Self::Global,
            other => Self::Specific(UnitId::new(other)),
        }
    }

    pub fn is_unset(&self) -> bool {
        matches!(self, Self::Unset)
    }

    pub fn concrete(&self) -> Option<&UnitId> {
        match self {
            Self::Specific(id) => Some(id),
            _ => None,
        }
    }
}

impl From<Option<String>> for ActiveSelection {
    fn from(raw: Option<String>) -> Self {
        raw.map(|value| Self::parse(&value)).unwrap_or_default()
    }
}

impl From<ActiveSelection> for Option<String> {
    fn from(selection: ActiveSelection) -> Self {
        match selection {
            ActiveSelection::Unset => None,
            ActiveSelection::Global => Some(GLOBAL_SELECTION.to_string()),
            ActiveSelection::Specific(id) => Some(id.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentinel_list_becomes_all_units() {
        let scope: UnitScope = serde_json::from_str(r#"["*"]"#).unwrap();
        assert_eq!(scope, UnitScope::AllUnits);
        assert_eq!(serde_json::to_string(&scope).unwrap(), r#"["*"]"#);
    }

    #[test]
    fn sentinel_mixed_with_units_is_rejected() {
        let result: Result<UnitScope, _> = serde_json::from_str(r#"["*","polanco"]"#);
        assert!(result.is_err());
    }

    #[test]
    fn unit_list_keeps_order_and_drops_duplicates() {
        let scope: UnitScope = serde_json::from_str(r#"["polanco","prod-central","polanco"]"#).unwrap();
        assert_eq!(scope, UnitScope::units(["polanco", "prod-central"]));
        assert!(scope.contains(&UnitId::from("prod-central")));
        assert!(!scope.contains(&UnitId::from("santa-fe")));
    }

    #[test]
    fn selection_wire_values() {
        assert_eq!(ActiveSelection::parse("all"), ActiveSelection::Global);
        assert_eq!(
            ActiveSelection::parse("polanco"),
            ActiveSelection::Specific(UnitId::from("polanco"))
        );

        let unset: ActiveSelection = serde_json::from_str("null").unwrap();
        assert!(unset.is_unset());
        assert_eq!(serde_json::to_string(&ActiveSelection::Global).unwrap(), r#""all""#);
    }
}
