//! Renderers: how a layer picks a symbol for each feature.

use serde::{Deserialize, Serialize};

use cartopress_core::Feature;

use crate::symbol::Symbol;

/// Comparison operator for attribute filters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FilterOp {
    Eq,
    Ne,
}

/// Attribute filter of the form `"field" = 'value'` / `"field" != 'value'`.
///
/// Comparison is on the attribute's text form, matching how the host
/// expression strings in the original workflow behaved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterExpr {
    pub field: String,
    pub op: FilterOp,
    pub value: String,
}

impl FilterExpr {
    pub fn eq(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            op: FilterOp::Eq,
            value: value.into(),
        }
    }

    pub fn ne(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            op: FilterOp::Ne,
            value: value.into(),
        }
    }

    /// Evaluate against a feature. A missing attribute compares as the
    /// empty string.
    pub fn matches(&self, feature: &Feature) -> bool {
        let text = feature
            .get_property(&self.field)
            .map(|v| v.as_text())
            .unwrap_or_default();
        match self.op {
            FilterOp::Eq => text == self.value,
            FilterOp::Ne => text != self.value,
        }
    }
}

/// One rule of a rule-based renderer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    /// `None` matches every feature (an else-rule)
    pub filter: Option<FilterExpr>,
    pub symbol: Symbol,
}

impl Rule {
    pub fn new(filter: Option<FilterExpr>, symbol: impl Into<Symbol>) -> Self {
        Self {
            filter,
            symbol: symbol.into(),
        }
    }
}

/// Layer renderer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Renderer {
    /// Every feature gets the same symbol
    Single(Symbol),
    /// First matching rule wins
    RuleBased(Vec<Rule>),
}

impl Renderer {
    pub fn single(symbol: impl Into<Symbol>) -> Self {
        Self::Single(symbol.into())
    }

    pub fn rule_based(rules: Vec<Rule>) -> Self {
        Self::RuleBased(rules)
    }

    /// Symbol for a feature, or `None` when no rule matches
    pub fn symbol_for(&self, feature: &Feature) -> Option<&Symbol> {
        match self {
            Self::Single(symbol) => Some(symbol),
            Self::RuleBased(rules) => rules
                .iter()
                .find(|r| r.filter.as_ref().is_none_or(|f| f.matches(feature)))
                .map(|r| &r.symbol),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgb;
    use crate::symbol::FillSymbol;
    use cartopress_core::AttributeValue;

    fn district(name: &str) -> Feature {
        let mut f = Feature::empty();
        f.set_property("district", AttributeValue::from(name));
        f
    }

    #[test]
    fn test_filter_eq_ne() {
        let f = district("Tarqui");
        assert!(FilterExpr::eq("district", "Tarqui").matches(&f));
        assert!(!FilterExpr::eq("district", "Ximena").matches(&f));
        assert!(FilterExpr::ne("district", "Ximena").matches(&f));
        assert!(!FilterExpr::ne("district", "Tarqui").matches(&f));
    }

    #[test]
    fn test_missing_attribute_compares_empty() {
        let f = Feature::empty();
        assert!(!FilterExpr::eq("district", "Tarqui").matches(&f));
        assert!(FilterExpr::ne("district", "Tarqui").matches(&f));
    }

    #[test]
    fn test_rule_based_first_match_wins() {
        let highlighted = FillSymbol::simple(Rgb::from_hex("#006AFF").unwrap(), Rgb::WHITE, 1.25)
            .with_opacity(0.45);
        let muted = FillSymbol::simple(Rgb::from_hex("#006AFF").unwrap(), Rgb::WHITE, 1.25)
            .with_opacity(0.40);

        let renderer = Renderer::rule_based(vec![
            Rule::new(Some(FilterExpr::eq("district", "Tarqui")), highlighted.clone()),
            Rule::new(Some(FilterExpr::ne("district", "Tarqui")), muted.clone()),
        ]);

        match renderer.symbol_for(&district("Tarqui")) {
            Some(Symbol::Fill(s)) => assert!((s.opacity - 0.45).abs() < 1e-12),
            other => panic!("expected fill symbol, got {other:?}"),
        }
        match renderer.symbol_for(&district("Ximena")) {
            Some(Symbol::Fill(s)) => assert!((s.opacity - 0.40).abs() < 1e-12),
            other => panic!("expected fill symbol, got {other:?}"),
        }
    }

    #[test]
    fn test_else_rule() {
        let renderer = Renderer::rule_based(vec![Rule::new(None, FillSymbol::default())]);
        assert!(renderer.symbol_for(&Feature::empty()).is_some());
    }

    #[test]
    fn test_no_matching_rule() {
        let renderer = Renderer::rule_based(vec![Rule::new(
            Some(FilterExpr::eq("district", "Tarqui")),
            FillSymbol::default(),
        )]);
        assert!(renderer.symbol_for(&district("Ximena")).is_none());
    }
}
