//! Per-session read-through cache of reference curves.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use tracing::{debug, info, warn};

use super::demo::demo_curve;
use super::ReferenceProvider;
use crate::config::CoreConfig;
use crate::models::{DataSource, Measure, ReferenceCurve, Sex};

/// Cache of curves keyed by `(measure, sex)`.
///
/// Entries are never overwritten or expired. Concurrent misses on the same
/// key may both hit the provider; the first insert is kept.
#[derive(Debug, Default)]
pub struct ReferenceCache {
    entries: RwLock<HashMap<(Measure, Sex), Arc<ReferenceCurve>>>,
}

impl ReferenceCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached curve, if any.
    pub fn get(&self, measure: Measure, sex: Sex) -> Option<Arc<ReferenceCurve>> {
        // Entries are immutable, so a poisoned lock still holds valid data.
        let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
        entries.get(&(measure, sex)).cloned()
    }

    /// Number of cached curves.
    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Cached curve, or fetch it from `provider`.
    ///
    /// Non-empty live results are cached. Provider errors and empty results
    /// fall back to the demo data when enabled; fallback curves are cached only
    /// with `cache_fallback`, and empty curves never are.
    pub fn get_or_fetch<P: ReferenceProvider + ?Sized>(
        &self,
        provider: &P,
        config: &CoreConfig,
        measure: Measure,
        sex: Sex,
    ) -> Arc<ReferenceCurve> {
        if let Some(curve) = self.get(measure, sex) {
            debug!(%measure, %sex, "reference cache hit");
            return curve;
        }

        debug!(%measure, %sex, "fetching reference table");
        match provider.fetch_curve(measure, sex) {
            Ok(points) if !points.is_empty() => {
                info!(%measure, %sex, rows = points.len(), "reference table loaded");
                return self.insert(ReferenceCurve {
                    measure,
                    sex,
                    points,
                    source: DataSource::Live,
                });
            }
            Ok(_) => warn!(%measure, %sex, "no reference rows found"),
            Err(e) => warn!(%measure, %sex, error = %e, "reference fetch failed"),
        }

        // Nothing was substituted, so the empty result is still the provider's answer
        if !config.fallback_enabled {
            return Arc::new(ReferenceCurve {
                measure,
                sex,
                points: Vec::new(),
                source: DataSource::Live,
            });
        }

        warn!(%measure, %sex, "using demo reference data");
        let curve = ReferenceCurve {
            measure,
            sex,
            points: demo_curve(measure, sex),
            source: DataSource::Fallback,
        };

        if config.cache_fallback && !curve.is_empty() {
            self.insert(curve)
        } else {
            Arc::new(curve)
        }
    }

    fn insert(&self, curve: ReferenceCurve) -> Arc<ReferenceCurve> {
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        entries
            .entry((curve.measure, curve.sex))
            .or_insert_with(|| Arc::new(curve))
            .clone()
    }
}
