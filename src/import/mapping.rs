use anyhow::Result;
use regex::Regex;

/// Sale fields a CSV column can feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Field {
    Date,
    Amount,
    Category,
    Region,
}

impl Field {
    pub(crate) fn as_str(&self) -> &'static str {
        match self {
            Self::Date => "date",
            Self::Amount => "amount",
            Self::Category => "category",
            Self::Region => "region",
        }
    }

    pub(crate) fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "date" => Some(Self::Date),
            "amount" => Some(Self::Amount),
            "category" | "product_category" => Some(Self::Category),
            "region" => Some(Self::Region),
            _ => None,
        }
    }

    /// Header names recognised without any user rule.
    fn aliases(&self) -> &'static [&'static str] {
        match self {
            Self::Date => &["date", "order date", "order_date", "transaction date"],
            Self::Amount => &[
                "amount",
                "amount ($)",
                "sales",
                "weekly_sales",
                "item_mrp",
                "revenue",
            ],
            Self::Category => &[
                "category",
                "product_category",
                "productcategory",
                "product category",
                "item_type",
                "store",
            ],
            Self::Region => &["region", "outlet_identifier", "store"],
        }
    }
}

/// A user-supplied header pattern, e.g. `amount=^gross`.
#[derive(Debug, Clone)]
pub(crate) struct ColumnRule {
    pub(crate) field: Field,
    pub(crate) pattern: String,
}

impl ColumnRule {
    /// Parse `field=regex`.
    pub(crate) fn parse(raw: &str) -> Result<Self> {
        let (field, pattern) = raw
            .split_once('=')
            .ok_or_else(|| anyhow::anyhow!("Expected <field>=<pattern>, got '{raw}'"))?;
        let field = Field::parse(field)
            .ok_or_else(|| anyhow::anyhow!("Unknown field '{field}' (date, amount, category, region)"))?;
        Ok(Self {
            field,
            pattern: pattern.to_string(),
        })
    }
}

/// Column index for each field. Category and region are optional.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ColumnMap {
    pub(crate) date: usize,
    pub(crate) amount: usize,
    pub(crate) category: Option<usize>,
    pub(crate) region: Option<usize>,
}

struct CompiledRule {
    field: Field,
    regex: Regex,
}

/// Resolves CSV headers to sale fields.
///
/// User rules are case-insensitive regexes and win over the built-in aliases.
#[derive(Default)]
pub(crate) struct ColumnMapper {
    rules: Vec<CompiledRule>,
}

impl ColumnMapper {
    /// Returns the mapper plus any patterns that failed to compile.
    pub(crate) fn new(rules: &[ColumnRule]) -> (Self, Vec<String>) {
        let mut bad = Vec::new();
        let compiled = rules
            .iter()
            .filter_map(|r| match Regex::new(&format!("(?i){}", r.pattern)) {
                Ok(regex) => Some(CompiledRule {
                    field: r.field,
                    regex,
                }),
                Err(_) => {
                    bad.push(r.pattern.clone());
                    None
                }
            })
            .collect();
        (Self { rules: compiled }, bad)
    }

    fn find(&self, field: Field, headers: &[String]) -> Option<usize> {
        let normalized: Vec<String> = headers.iter().map(|h| h.trim().to_lowercase()).collect();

        let by_rule = self
            .rules
            .iter()
            .filter(|r| r.field == field)
            .find_map(|r| normalized.iter().position(|h| r.regex.is_match(h)));

        by_rule.or_else(|| {
            normalized
                .iter()
                .position(|h| field.aliases().contains(&h.as_str()))
        })
    }

    pub(crate) fn map_headers(&self, headers: &[String]) -> Result<ColumnMap> {
        let required = |field: Field| {
            self.find(field, headers).ok_or_else(|| {
                anyhow::anyhow!(
                    "No {} column found in headers: {}",
                    field.as_str(),
                    headers.join(", ")
                )
            })
        };
        let map = ColumnMap {
            date: required(Field::Date)?,
            amount: required(Field::Amount)?,
            category: self.find(Field::Category, headers),
            region: self.find(Field::Region, headers),
        };
        tracing::debug!(?map, "mapped csv columns");
        Ok(map)
    }
}

#[cfg(test)]
#[path = "mapping_tests.rs"]
mod tests;
