//! Literature-derived category adjustments.
//!
//! Each rule is a multiplicative nudge keyed by a substring of the
//! lowercased category name. Keys are deliberately short and match
//! both English and Turkish category spellings.

/// One multiplicative adjustment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rule {
    pub key: &'static str,
    pub p_mul: f64,
    pub s_mul: f64,
}

/// The rule book. Applied strictly in table order.
pub const PAPER_RULES: &[Rule] = &[
    Rule { key: "legal", p_mul: 1.00, s_mul: 1.10 },
    Rule { key: "reg", p_mul: 1.00, s_mul: 1.10 },
    Rule { key: "izin", p_mul: 1.00, s_mul: 1.08 },
    Rule { key: "supply", p_mul: 1.08, s_mul: 1.00 },
    Rule { key: "tedarik", p_mul: 1.08, s_mul: 1.00 },
    Rule { key: "weather", p_mul: 1.10, s_mul: 1.00 },
    Rule { key: "wind", p_mul: 1.10, s_mul: 1.00 },
    Rule { key: "hava", p_mul: 1.08, s_mul: 1.00 },
];

/// Apply every matching rule to `(p, s)`.
///
/// A missing or empty category applies nothing and leaves the values
/// untouched; otherwise the result is clamped to the 1..=5 scoring scale
/// even when no rule matched. Returns the adjusted pair plus one
/// `"{key}:p×{p_mul:.2},s×{s_mul:.2}"` tag per applied rule, in table order.
#[must_use]
pub fn apply_paper_rules(category: Option<&str>, p: f64, s: f64) -> (f64, f64, Vec<String>) {
    let Some(category) = category.filter(|c| !c.is_empty()) else {
        return (p, s, Vec::new());
    };

    let cat = category.to_lowercase();
    let mut p = p;
    let mut s = s;
    let mut applied = Vec::new();
    for rule in PAPER_RULES {
        if cat.contains(rule.key) {
            p *= rule.p_mul;
            s *= rule.s_mul;
            applied.push(format!(
                "{}:p×{:.2},s×{:.2}",
                rule.key, rule.p_mul, rule.s_mul
            ));
        }
    }

    (p.clamp(1.0, 5.0), s.clamp(1.0, 5.0), applied)
}
