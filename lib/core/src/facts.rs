//! Built-in literature fact cards.
//!
//! A small curated set of risk-management findings distilled from the
//! construction and software risk literature. They are indexed alongside
//! register rows so advisory searches can surface methodological context.

/// Corpus label shared by fact cards and sentence-bank rows.
pub const PAPER_RULE_LABEL: &str = "paper_rule";

/// A literature-derived fact card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaperFact {
    pub id: i64,
    pub source: &'static str,
    pub text: &'static str,
}

/// The built-in card set, ascending id order. Ids live in the 900xxx range
/// so they collide with neither suggestion ids nor offset risk ids.
pub const PAPER_FACTS: &[PaperFact] = &[
    PaperFact {
        id: 900_001,
        source: "SoftRisk yaklaşımı",
        text: "Yazılım projelerinde risk önceliği için iki temel ölçü: Risk Exposure (RE = Olasılık × Etki) ve FMEA tabanlı RPN (Olasılık × Şiddet × Tespit edilebilirlik). Takip, Top-10 risk listesi ve kırmızı-sarı-yeşil bölgelerle görselleştirme.",
    },
    PaperFact {
        id: 900_002,
        source: "Risk Mitigasyon Prototipi (Anti-Ageing)",
        text: "RPN aralığına göre öneri seti: RPN çok yüksek ise hızla uygulanabilir düşük maliyetli mitigasyonlar (tedarikçi çeşitlendirme, ek testler) önce gelir; orta seviye RPN için planlı süreç iyileştirme; düşük RPN'de izleme yeterli olabilir.",
    },
    PaperFact {
        id: 900_101,
        source: "IRMS – International Construction",
        text: "HRBS↔WBS eşlemesiyle riskin kaynağı (HRBS) ilgili iş paketi (WBS) ile bağlanmalı. Önce/sonra/final risk puanı üç kademede izlenmeli; kurumsal hafıza için benzer proje eşlemesi (CBR).",
    },
    PaperFact {
        id: 900_102,
        source: "IRMS – Maliyet belirsizliği",
        text: "Proje maliyet/süre belirsizliği için Monte Carlo simülasyonu: kritik riskler üçgen/PERT dağılımları ile modellenir; sonuçlar P50/P80/P95 özetleriyle raporlanır.",
    },
    PaperFact {
        id: 900_201,
        source: "Onshore Wind – FAHP + FTOPSIS",
        text: "Rüzgâr çiftliği inşaatında kritik risk seçimi için FAHP ile kriter ağırlıkları, FTOPSIS ile alternatiflerin sıralaması birlikte kullanılabilir.",
    },
    PaperFact {
        id: 900_202,
        source: "Onshore Wind – Hava riski",
        text: "Hava durumu (özellikle rüzgâr hızları) için faaliyet bazlı eşikler tanımlanmalı. Eşik aşımında üretkenlik sıfıra düşer; look-ahead çizelgeleme bu kısıtı göz önünde bulundurmalı.",
    },
    PaperFact {
        id: 900_301,
        source: "Participative Web DSS",
        text: "Çok ölçütlü değerlendirme (MCE/TOPSIS/Compromise Programming) ile paydaş tercihleri senaryo/alternatif seçiminde ağırlıklandırılmalı. Web tabanlı arayüzde katılımcı geribildirim toplanmalı.",
    },
];
