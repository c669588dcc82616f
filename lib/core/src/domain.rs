//! Records read from the project risk register.

use serde::{Deserialize, Serialize};

/// Risk records are offset by this amount when indexed, so their ids never
/// collide with suggestion ids.
pub const RISK_ID_OFFSET: i64 = 1_000_000;

/// A register entry describing a project risk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Risk {
    pub id: i64,
    pub title: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
}

impl Risk {
    #[must_use]
    pub fn new(id: i64) -> Self {
        Self {
            id,
            title: None,
            category: None,
            description: None,
        }
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// A mitigation suggestion tied to a risk category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    pub id: i64,
    pub category: Option<String>,
    pub text: String,
}

impl Suggestion {
    #[must_use]
    pub fn new(id: i64, category: Option<String>, text: impl Into<String>) -> Self {
        Self {
            id,
            category,
            text: text.into(),
        }
    }
}

/// One completed evaluation row. Only rows where both scores were recorded
/// become samples; partially filled evaluations are skipped at the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvalSample {
    pub category: Option<String>,
    pub probability: f64,
    pub severity: f64,
}

impl EvalSample {
    #[must_use]
    pub fn new(category: Option<String>, probability: f64, severity: f64) -> Self {
        Self {
            category,
            probability,
            severity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn risk_builder_fills_fields() {
        let risk = Risk::new(7)
            .with_title("Beton dökümü gecikmesi")
            .with_category("Beton İşleri")
            .with_description("Santral sevkiyatı aksayabilir");

        assert_eq!(risk.id, 7);
        assert_eq!(risk.title.as_deref(), Some("Beton dökümü gecikmesi"));
        assert_eq!(risk.category.as_deref(), Some("Beton İşleri"));
        assert!(risk.description.is_some());
    }

    #[test]
    fn risk_defaults_to_empty_fields() {
        let risk = Risk::new(1);
        assert!(risk.title.is_none());
        assert!(risk.category.is_none());
        assert!(risk.description.is_none());
    }
}
