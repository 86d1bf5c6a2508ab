use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};
use std::time::SystemTime;

use tally_core::{CatalogError, PricingRule, RulesProvider};

/// One fully-formed version of the rule set, swapped wholesale on reload.
#[derive(Debug)]
struct Snapshot {
    rules: Arc<HashMap<String, PricingRule>>,
    last_modified: Option<SystemTime>,
}

/// JSON-file-backed pricing rules, read-mostly behind a reader/writer lock.
///
/// Readers clone the current `Arc` snapshot and never block each other;
/// a reload parses outside the lock and takes the write lock only for the
/// swap. A failed reload leaves the prior snapshot active.
#[derive(Debug)]
pub struct PricingCatalog {
    source: PathBuf,
    current: RwLock<Snapshot>,
}

impl PricingCatalog {
    /// Loads the catalog from `source`. Initial failure is fatal: there is
    /// no catalog without at least one valid rule set.
    pub fn load(source: impl Into<PathBuf>) -> Result<Arc<Self>, CatalogError> {
        let source = source.into();
        let bytes = std::fs::read(&source)?;
        let rules = parse_rules(&bytes)?;
        let last_modified = modified(&source);

        tracing::info!(
            source = %source.display(),
            rules = rules.len(),
            "loaded pricing rules"
        );

        Ok(Arc::new(Self {
            source,
            current: RwLock::new(Snapshot {
                rules: Arc::new(rules),
                last_modified,
            }),
        }))
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Re-reads the source and atomically swaps in the new rule set.
    ///
    /// On any failure the existing snapshot stays untouched and the error is
    /// returned for the caller to log.
    pub async fn reload(&self) -> Result<(), CatalogError> {
        let bytes = tokio::fs::read(&self.source).await?;
        let rules = parse_rules(&bytes)?;
        let last_modified = modified(&self.source);
        let count = rules.len();

        let mut current = self.current.write().expect("catalog lock poisoned");
        *current = Snapshot {
            rules: Arc::new(rules),
            last_modified,
        };
        drop(current);

        tracing::info!(rules = count, "reloaded pricing rules");
        Ok(())
    }

    /// Whether the source has been modified since the current snapshot was
    /// taken. Errors stat-ing the source read as "no change".
    pub(crate) fn source_changed(&self) -> bool {
        let Some(on_disk) = modified(&self.source) else {
            return false;
        };
        let loaded = self
            .current
            .read()
            .expect("catalog lock poisoned")
            .last_modified;
        match loaded {
            Some(loaded) => on_disk > loaded,
            None => true,
        }
    }
}

impl RulesProvider for PricingCatalog {
    fn rules(&self) -> Arc<HashMap<String, PricingRule>> {
        Arc::clone(&self.current.read().expect("catalog lock poisoned").rules)
    }
}

fn modified(path: &Path) -> Option<SystemTime> {
    std::fs::metadata(path).and_then(|meta| meta.modified()).ok()
}

fn parse_rules(bytes: &[u8]) -> Result<HashMap<String, PricingRule>, CatalogError> {
    let rules: HashMap<String, PricingRule> = serde_json::from_slice(bytes)?;

    if rules.is_empty() {
        return Err(CatalogError::Validation(
            "pricing source defines no rules".to_string(),
        ));
    }
    for (sku, rule) in &rules {
        if sku.is_empty() {
            return Err(CatalogError::Validation("empty SKU".to_string()));
        }
        if let Some(offer) = rule.special_offer {
            if offer.quantity == 0 {
                return Err(CatalogError::Validation(format!(
                    "sku '{sku}' has a special offer with quantity 0"
                )));
            }
        }
    }

    Ok(rules)
}
