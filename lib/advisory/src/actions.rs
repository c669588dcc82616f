//! Category-driven action plans.

use chrono::{Days, NaiveDate};

/// One proposed mitigation with an owner and a deadline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionItem {
    pub owner: &'static str,
    pub action: &'static str,
    pub due: NaiveDate,
}

/// Propose actions for a risk category.
///
/// Concrete-works risks get a three-step plan across site, quality, and
/// procurement; everything else gets a single monitoring action.
#[must_use]
pub fn propose_actions(category: Option<&str>, today: NaiveDate) -> Vec<ActionItem> {
    let lowered = category.unwrap_or("").to_lowercase();
    if lowered.contains("beton") {
        vec![
            ActionItem {
                owner: "Şantiye Şefi",
                action: "Döküm öncesi kalıp ve donatı kontrolünü tamamla; kür planını onaylat",
                due: today + Days::new(14),
            },
            ActionItem {
                owner: "Kalite Mühendisi",
                action: "Beton numune ve slump test planını devreye al",
                due: today + Days::new(7),
            },
            ActionItem {
                owner: "Satınalma",
                action: "Beton santrali ve tedarikçi sevkiyat programını teyit et",
                due: today + Days::new(21),
            },
        ]
    } else {
        vec![ActionItem {
            owner: "Risk Sahibi",
            action: "Haftalık izleme formu aç; sorumlu ata",
            due: today + Days::new(7),
        }]
    }
}
