//! Presentation metadata for categories and institutions
//!
//! The category vocabulary is closed, but ledgers may carry anything; unknown
//! names fall back to the "other" entry.

use serde::Serialize;

/// Category used for income lines; excluded from spending comparisons
pub const INCOME_CATEGORY: &str = "収入";

/// Catch-all category
pub const OTHER_CATEGORY: &str = "その他";

const DEFAULT_COLOR: &str = "#6B7280";
const DEFAULT_ICON: &str = "more-horizontal";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CategoryInfo {
    pub name: &'static str,
    pub color: &'static str,
    pub icon: &'static str,
}

const CATEGORIES: &[CategoryInfo] = &[
    CategoryInfo { name: "食費", color: "#F59E0B", icon: "utensils" },
    CategoryInfo { name: "日用品", color: "#8B5CF6", icon: "shopping-bag" },
    CategoryInfo { name: "交通費", color: "#3B82F6", icon: "train" },
    CategoryInfo { name: "通信費", color: "#06B6D4", icon: "smartphone" },
    CategoryInfo { name: "教養・教育", color: "#10B981", icon: "book-open" },
    CategoryInfo { name: "健康・医療", color: "#EC4899", icon: "heart-pulse" },
    CategoryInfo { name: "衣服・美容", color: "#F97316", icon: "shirt" },
    CategoryInfo { name: "趣味・娯楽", color: "#6366F1", icon: "gamepad-2" },
    CategoryInfo { name: "水道・光熱費", color: "#14B8A6", icon: "zap" },
    CategoryInfo { name: "交際費", color: "#EF4444", icon: "users" },
    CategoryInfo { name: OTHER_CATEGORY, color: DEFAULT_COLOR, icon: DEFAULT_ICON },
    CategoryInfo { name: INCOME_CATEGORY, color: "#059669", icon: "arrow-up-circle" },
];

/// All known categories in display order
pub fn categories() -> &'static [CategoryInfo] {
    CATEGORIES
}

pub fn category_info(category: &str) -> Option<&'static CategoryInfo> {
    CATEGORIES.iter().find(|c| c.name == category)
}

/// Hex color for a category, the "other" color when unknown
pub fn category_color(category: &str) -> &'static str {
    category_info(category).map_or(DEFAULT_COLOR, |c| c.color)
}

pub fn category_icon(category: &str) -> &'static str {
    category_info(category).map_or(DEFAULT_ICON, |c| c.icon)
}

/// Kind of financial institution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InstitutionKind {
    Bank,
    Card,
    Epay,
    Cash,
    Other,
}

impl InstitutionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bank => "bank",
            Self::Card => "card",
            Self::Epay => "epay",
            Self::Cash => "cash",
            Self::Other => "other",
        }
    }
}

impl std::fmt::Display for InstitutionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

struct InstitutionInfo {
    name: &'static str,
    short_name: &'static str,
    kind: InstitutionKind,
}

const INSTITUTIONS: &[InstitutionInfo] = &[
    InstitutionInfo { name: "三菱UFJ銀行", short_name: "三菱UFJ", kind: InstitutionKind::Bank },
    InstitutionInfo { name: "みずほ銀行", short_name: "みずほ", kind: InstitutionKind::Bank },
    InstitutionInfo { name: "三井住友銀行", short_name: "三井住友", kind: InstitutionKind::Bank },
    InstitutionInfo { name: "ゆうちょ銀行", short_name: "ゆうちょ", kind: InstitutionKind::Bank },
    InstitutionInfo { name: "楽天銀行", short_name: "楽天", kind: InstitutionKind::Bank },
    InstitutionInfo { name: "住信SBIネット銀行", short_name: "SBI", kind: InstitutionKind::Bank },
    InstitutionInfo { name: "楽天カード", short_name: "楽天", kind: InstitutionKind::Card },
    InstitutionInfo { name: "三井住友カード", short_name: "三井住友", kind: InstitutionKind::Card },
    InstitutionInfo { name: "JCBカード", short_name: "JCB", kind: InstitutionKind::Card },
    InstitutionInfo { name: "アメックス", short_name: "AMEX", kind: InstitutionKind::Card },
    InstitutionInfo { name: "PayPay", short_name: "PayPay", kind: InstitutionKind::Epay },
    InstitutionInfo { name: "LINE Pay", short_name: "LINE", kind: InstitutionKind::Epay },
    InstitutionInfo { name: "楽天ペイ", short_name: "楽天Pay", kind: InstitutionKind::Epay },
    InstitutionInfo { name: "d払い", short_name: "d払い", kind: InstitutionKind::Epay },
    InstitutionInfo { name: "現金", short_name: "現金", kind: InstitutionKind::Cash },
];

/// Short display name; unknown institutions keep their full name
pub fn institution_short_name(institution: &str) -> &str {
    INSTITUTIONS
        .iter()
        .find(|i| i.name == institution)
        .map_or(institution, |i| i.short_name)
}

pub fn institution_kind(institution: &str) -> InstitutionKind {
    INSTITUTIONS
        .iter()
        .find(|i| i.name == institution)
        .map_or(InstitutionKind::Other, |i| i.kind)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_category() {
        assert_eq!(category_color("食費"), "#F59E0B");
        assert_eq!(category_icon("交通費"), "train");
    }

    #[test]
    fn test_unknown_category_falls_back_to_other() {
        assert_eq!(category_color("ペット"), category_color(OTHER_CATEGORY));
        assert_eq!(category_icon("ペット"), "more-horizontal");
        assert!(category_info("ペット").is_none());
    }

    #[test]
    fn test_institutions() {
        assert_eq!(institution_short_name("住信SBIネット銀行"), "SBI");
        assert_eq!(institution_short_name("地元信金"), "地元信金");
        assert_eq!(institution_kind("PayPay"), InstitutionKind::Epay);
        assert_eq!(institution_kind("地元信金"), InstitutionKind::Other);
    }
}
