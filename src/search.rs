// Vendor search: linear scan with optional AND-combined filters and a soft gate
//
// Every search reads the whole vendor store. There is no index and no cache,
// so results always reflect the file as it is at scan time.

use crate::error::Result;
use crate::records::VendorRecord;
use crate::store::RecordStore;
use serde::{Deserialize, Serialize};
use tracing::debug;

// ============================================================================
// FILTERS
// ============================================================================

/// Query filters. Absent, empty and whitespace-only values impose no constraint.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SearchFilters {
    #[serde(default)]
    pub keyword: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub integrates_with: Option<String>,
    #[serde(default)]
    pub price_tier: Option<String>,
}

impl SearchFilters {
    pub fn with_keyword(mut self, keyword: &str) -> Self {
        self.keyword = Some(keyword.to_string());
        self
    }

    pub fn with_category(mut self, category: &str) -> Self {
        self.category = Some(category.to_string());
        self
    }

    pub fn with_integration(mut self, integration: &str) -> Self {
        self.integrates_with = Some(integration.to_string());
        self
    }

    pub fn with_price_tier(mut self, price_tier: &str) -> Self {
        self.price_tier = Some(price_tier.to_string());
        self
    }

    fn compile(&self) -> CompiledFilters {
        CompiledFilters {
            keyword: active(&self.keyword),
            category: active(&self.category),
            integrates_with: active(&self.integrates_with),
            price_tier: active(&self.price_tier),
        }
    }
}

/// Lowercased, trimmed filter values with the inactive ones removed
struct CompiledFilters {
    keyword: Option<String>,
    category: Option<String>,
    integrates_with: Option<String>,
    price_tier: Option<String>,
}

impl CompiledFilters {
    fn matches(&self, record: &VendorRecord) -> bool {
        if let Some(keyword) = &self.keyword {
            let hit = serde_json::to_string(record)
                .map(|json| json.to_lowercase().contains(keyword))
                .unwrap_or(false);
            if !hit {
                return false;
            }
        }

        if let Some(category) = &self.category {
            if !record.category.to_lowercase().contains(category) {
                return false;
            }
        }

        if let Some(integration) = &self.integrates_with {
            if !record.integrates_with(integration) {
                return false;
            }
        }

        if let Some(tier) = &self.price_tier {
            if record.pricing_model.trim().to_lowercase() != *tier {
                return false;
            }
        }

        true
    }
}

fn active(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_lowercase)
}

// ============================================================================
// RESULTS
// ============================================================================

/// Matches visible to an anonymous caller plus what the gate held back
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchPage {
    pub visible: Vec<VendorRecord>,
    pub total_matches: usize,
    pub hidden: usize,
}

impl SearchPage {
    pub fn is_empty(&self) -> bool {
        self.total_matches == 0
    }

    pub fn is_truncated(&self) -> bool {
        self.hidden > 0
    }

    /// User-facing summary: no matches, or the sign-up prompt when truncated
    pub fn notice(&self) -> Option<String> {
        if self.is_empty() {
            Some("No matches.".to_string())
        } else if self.is_truncated() {
            Some(format!(
                "{} total matches, {} hidden. Sign up to see all results.",
                self.total_matches, self.hidden
            ))
        } else {
            None
        }
    }
}

/// Filter `records` in order, keeping the first `visible_limit` matches visible
pub fn filter_records<I>(records: I, filters: &SearchFilters, visible_limit: usize) -> SearchPage
where
    I: IntoIterator<Item = VendorRecord>,
{
    let compiled = filters.compile();
    let mut visible = Vec::new();
    let mut total_matches = 0;

    for record in records {
        if !compiled.matches(&record) {
            continue;
        }
        total_matches += 1;
        if visible.len() < visible_limit {
            visible.push(record);
        }
    }

    SearchPage {
        hidden: total_matches - visible.len(),
        visible,
        total_matches,
    }
}

/// Scan the vendor store and apply `filters`
pub fn search(store: &RecordStore, filters: &SearchFilters, visible_limit: usize) -> Result<SearchPage> {
    let records = store.read_all::<VendorRecord>()?;
    let page = filter_records(records, filters, visible_limit);

    debug!(
        ?filters,
        total = page.total_matches,
        hidden = page.hidden,
        "vendor search complete"
    );
    Ok(page)
}
