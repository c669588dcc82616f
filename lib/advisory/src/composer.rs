//! Markdown advisory composition.
//!
//! The advisory is a fixed five-section Turkish template. Every sub-step
//! degrades rather than aborts: a failing store lookup renders the
//! not-found notice, a failing estimator fit keeps the global defaults,
//! and a missing index just leaves out the literature section. Output is
//! byte-identical for the same register snapshot, index, and `today`.

use tracing::warn;

use riskwise_core::estimator::PsEstimator;
use riskwise_core::facts::PAPER_RULE_LABEL;

use crate::actions::propose_actions;
use crate::context::AdvisoryContext;

pub const NOT_FOUND_NOTICE: &str = "⚠️ Risk bulunamadı.";

const KPI_LINES: [&str; 3] = [
    "- Hata oranı ≤ %1 (48 saat sonrası ölçüm)",
    "- Rework saatleri ≤ toplamın %2’si (aylık)",
    "- Uygunsuzluk sayısı = 0 (aylık)",
];
const CLOSURE_LINE: &str = "- 2 ay 0 uygunsuzluk + KPI’lar 8 hafta üst üste tutturulmuş";

/// Render the advisory for one risk.
#[must_use]
pub fn compose(ctx: &AdvisoryContext, risk_id: i64) -> String {
    let risk = match ctx.store().risk(risk_id) {
        Ok(Some(risk)) => risk,
        Ok(None) => return NOT_FOUND_NOTICE.to_string(),
        Err(e) => {
            warn!("risk lookup failed for {}: {}", risk_id, e);
            return NOT_FOUND_NOTICE.to_string();
        }
    };

    let mut estimator = PsEstimator::default();
    if let Err(e) = estimator.fit(ctx.store()) {
        warn!("estimator fit failed, keeping global defaults: {}", e);
    }
    let hint = estimator.suggest(risk.category.as_deref());

    let query = format!(
        "{} {} {}",
        risk.category.as_deref().unwrap_or(""),
        risk.title.as_deref().unwrap_or(""),
        risk.description.as_deref().unwrap_or("")
    );
    let hits = ctx.search(&query, 5);
    let rules: Vec<_> = hits
        .iter()
        .filter(|h| h.label == PAPER_RULE_LABEL)
        .collect();

    let actions = propose_actions(risk.category.as_deref(), ctx.today());

    let mut lines: Vec<String> = Vec::new();
    lines.push(format!(
        "🤖 **AI Önerisi — {}**",
        non_empty(risk.title.as_deref()).unwrap_or("Risk")
    ));
    lines.push(format!(
        "**Kategori:** {}",
        non_empty(risk.category.as_deref()).unwrap_or("—")
    ));
    lines.push(format!(
        "**Açıklama:** {}",
        non_empty(risk.description.as_deref()).unwrap_or("—")
    ));

    lines.push(String::new());
    lines.push("### 1) Sayısal Özet".to_string());
    lines.push(format!(
        "- Tahmini Olasılık **P={:.1}**, Şiddet **S={:.1}** (kaynak: {}, örnek: P {}/{}, S {}/{})",
        hint.p, hint.s, hint.source, hint.n_cat.0, hint.n_all.0, hint.n_cat.1, hint.n_all.1
    ));
    if !hint.applied_rules.is_empty() {
        lines.push(format!(
            "- Uygulanan makale kuralları: {}",
            hint.applied_rules.join(", ")
        ));
    }

    lines.push(String::new());
    lines.push("### 2) Önerilen Aksiyonlar (RACI/Termin)".to_string());
    for action in &actions {
        lines.push(format!(
            "- [**{}**] {} — **Termin:** {}",
            action.owner,
            action.action,
            action.due.format("%Y-%m-%d")
        ));
    }

    lines.push(String::new());
    lines.push("### 3) KPI’lar".to_string());
    for kpi in KPI_LINES {
        lines.push(kpi.to_string());
    }

    lines.push(String::new());
    lines.push("### 4) Kapanış Kriteri".to_string());
    lines.push(CLOSURE_LINE.to_string());

    if !rules.is_empty() {
        lines.push(String::new());
        lines.push("### 5) Makale Bağlamı".to_string());
        for rule in &rules {
            lines.push(format!("- {}", rule.text));
        }
    }

    lines.join("\n")
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use chrono::NaiveDate;
    use riskwise_core::domain::Risk;
    use riskwise_core::encoder::{HashEncoder, TextEncoder};
    use riskwise_core::index::VectorIndex;
    use riskwise_core::knn::Backend;
    use riskwise_core::store::MemoryStore;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 1).unwrap()
    }

    fn context(store: MemoryStore) -> AdvisoryContext {
        AdvisoryContext::new(Arc::new(store), None, today())
    }

    #[test]
    fn unknown_risk_renders_notice() {
        let ctx = context(MemoryStore::new());
        assert_eq!(ctx.compose(99), "⚠️ Risk bulunamadı.");
    }

    #[test]
    fn bare_risk_renders_the_full_template() {
        let mut store = MemoryStore::new();
        store.add_risk(Risk::new(10).with_title("Saha erişim yolu kapalı"));
        let ctx = context(store);

        let expected = [
            "🤖 **AI Önerisi — Saha erişim yolu kapalı**",
            "**Kategori:** —",
            "**Açıklama:** —",
            "",
            "### 1) Sayısal Özet",
            "- Tahmini Olasılık **P=3.0**, Şiddet **S=3.0** (kaynak: global, örnek: P 0/0, S 0/0)",
            "",
            "### 2) Önerilen Aksiyonlar (RACI/Termin)",
            "- [**Risk Sahibi**] Haftalık izleme formu aç; sorumlu ata — **Termin:** 2025-03-08",
            "",
            "### 3) KPI’lar",
            "- Hata oranı ≤ %1 (48 saat sonrası ölçüm)",
            "- Rework saatleri ≤ toplamın %2’si (aylık)",
            "- Uygunsuzluk sayısı = 0 (aylık)",
            "",
            "### 4) Kapanış Kriteri",
            "- 2 ay 0 uygunsuzluk + KPI’lar 8 hafta üst üste tutturulmuş",
        ]
        .join("\n");
        assert_eq!(ctx.compose(10), expected);
    }

    #[test]
    fn concrete_category_gets_three_deadlines_in_order() {
        let mut store = MemoryStore::new();
        store.add_risk(
            Risk::new(1)
                .with_title("Beton dökümünde gecikme")
                .with_category("Beton İşleri")
                .with_description("Santral sevkiyatı aksıyor"),
        );
        let ctx = context(store);
        let advisory = ctx.compose(1);

        let action_lines: Vec<&str> = advisory
            .lines()
            .filter(|l| l.contains("**Termin:**"))
            .collect();
        assert_eq!(
            action_lines,
            [
                "- [**Şantiye Şefi**] Döküm öncesi kalıp ve donatı kontrolünü tamamla; kür planını onaylat — **Termin:** 2025-03-15",
                "- [**Kalite Mühendisi**] Beton numune ve slump test planını devreye al — **Termin:** 2025-03-08",
                "- [**Satınalma**] Beton santrali ve tedarikçi sevkiyat programını teyit et — **Termin:** 2025-03-22",
            ]
        );
    }

    #[test]
    fn matching_rule_shows_its_tag_and_adjusted_score() {
        let mut store = MemoryStore::new();
        store.add_risk(
            Risk::new(2)
                .with_title("Fırtına uyarısı")
                .with_category("Hava Koşulları"),
        );
        let ctx = context(store);
        let advisory = ctx.compose(2);

        assert!(advisory.contains(
            "- Tahmini Olasılık **P=3.2**, Şiddet **S=3.0** (kaynak: global, örnek: P 0/0, S 0/0)"
        ));
        assert!(advisory.contains("- Uygulanan makale kuralları: hava:p×1.08,s×1.00"));
    }

    #[test]
    fn empty_title_falls_back_to_generic_heading() {
        let mut store = MemoryStore::new();
        store.add_risk(Risk::new(3).with_title(""));
        let ctx = context(store);
        assert!(ctx.compose(3).starts_with("🤖 **AI Önerisi — Risk**"));
    }

    #[test]
    fn literature_hits_fill_the_context_section() {
        let mut store = MemoryStore::new();
        store.add_risk(
            Risk::new(5)
                .with_title("Beton kür süreci riskli")
                .with_category("Beton İşleri"),
        );

        let encoder = Arc::new(HashEncoder::new(64));
        let texts = vec![
            "Beton kür süresi kış şartlarında uzatılmalı".to_string(),
            "Kalıp iskelesini haftalık kontrol et".to_string(),
        ];
        let refs: Vec<&str> = texts.iter().map(String::as_str).collect();
        let matrix = encoder.encode_batch(&refs);
        let index = VectorIndex::fit(
            encoder,
            Backend::scan(64),
            matrix,
            vec![900_001, 12],
            texts,
            vec![PAPER_RULE_LABEL.to_string(), "Saha".to_string()],
        )
        .unwrap();

        let ctx = AdvisoryContext::new(Arc::new(store), Some(Arc::new(index)), today());
        let advisory = ctx.compose(5);

        assert!(advisory.contains("### 5) Makale Bağlamı"));
        assert!(advisory.contains("- Beton kür süresi kış şartlarında uzatılmalı"));
        assert!(!advisory.contains("- Kalıp iskelesini haftalık kontrol et"));
    }

    #[test]
    fn no_literature_hits_omits_the_section() {
        let mut store = MemoryStore::new();
        store.add_risk(Risk::new(6).with_title("Genel risk kaydı"));
        let ctx = context(store);
        let advisory = ctx.compose(6);
        assert!(!advisory.contains("### 5)"));
        assert!(!advisory.ends_with('\n'));
    }
}
