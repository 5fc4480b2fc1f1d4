//! Summary cache index: which stored summary belongs to which window of a comet.
//!
//! The index is always rebuilt wholesale from the comet's windows and its summary records.
//! Records are visited in ascending id order, so when several records claim the same window
//! the most recently created one wins.

use std::collections::{BTreeMap, HashMap};

use sea_orm::ConnectionTrait;

use crate::server::{
    data::flyby::FlybyRepository,
    error::Error,
    model::db::SummaryModel,
    service::{
        reference::{resolve_reference, ResolvedReference},
        window::{FlybyWindow, WindowKey},
    },
};

/// Mapping from window key to the summary shown for it.
#[derive(Clone, Debug, Default)]
pub struct SummaryIndex {
    entries: BTreeMap<WindowKey, SummaryModel>,
}

impl SummaryIndex {
    pub fn get(&self, key: &WindowKey) -> Option<&SummaryModel> {
        self.entries.get(key)
    }

    pub fn contains(&self, key: &WindowKey) -> bool {
        self.entries.contains_key(key)
    }

    /// Insert or replace the summary of a window.
    pub fn insert(&mut self, key: WindowKey, summary: SummaryModel) {
        self.entries.insert(key, summary);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&WindowKey, &SummaryModel)> {
        self.entries.iter()
    }
}

/// Summary record with both flyby references resolved to ids where possible.
#[derive(Clone, Debug)]
pub struct ResolvedSummary {
    pub summary: SummaryModel,
    pub previous: Option<i32>,
    pub next: Option<i32>,
}

/// Builds a fresh index from resolved records.
///
/// Records of another comet, with an unresolved reference, or whose pair is not a window of
/// the comet are left out.
pub fn reconcile(
    comet_id: i32,
    windows: &[FlybyWindow],
    summaries: impl IntoIterator<Item = ResolvedSummary>,
) -> SummaryIndex {
    let keys: Vec<WindowKey> = windows.iter().map(|window| window.key).collect();
    let mut index = SummaryIndex::default();

    for resolved in summaries {
        let summary_id = resolved.summary.id;

        if resolved.summary.comet_id != comet_id {
            tracing::debug!(summary_id, comet_id, "Dropping summary of another comet");
            continue;
        }

        let (Some(previous), Some(next)) = (resolved.previous, resolved.next) else {
            tracing::debug!(summary_id, "Dropping summary with unresolved flyby reference");
            continue;
        };

        let key = WindowKey::new(previous, next);
        if !keys.contains(&key) {
            tracing::debug!(summary_id, window = %key, "Dropping summary that matches no window");
            continue;
        }

        index.insert(key, resolved.summary);
    }

    index
}

/// Resolves summary references, looking up flybys by year when a reference carries no id.
pub struct SummaryIndexer<'a, C: ConnectionTrait> {
    db: &'a C,
    comet_id: i32,
    year_cache: HashMap<u64, Option<i32>>,
}

impl<'a, C: ConnectionTrait> SummaryIndexer<'a, C> {
    pub fn new(db: &'a C, comet_id: i32) -> Self {
        Self {
            db,
            comet_id,
            year_cache: HashMap::new(),
        }
    }

    async fn resolve_id(&mut self, reference: ResolvedReference) -> Result<Option<i32>, Error> {
        match reference {
            ResolvedReference::Id(id) => Ok(Some(id)),
            ResolvedReference::Unresolved => Ok(None),
            ResolvedReference::Year(year) => {
                if let Some(cached) = self.year_cache.get(&year.to_bits()) {
                    return Ok(*cached);
                }

                let flyby_id = FlybyRepository::new(self.db)
                    .find_by_comet_and_year(self.comet_id, year)
                    .await?
                    .map(|flyby| flyby.id);

                self.year_cache.insert(year.to_bits(), flyby_id);

                Ok(flyby_id)
            }
        }
    }

    pub async fn resolve(&mut self, summary: SummaryModel) -> Result<ResolvedSummary, Error> {
        let previous = self
            .resolve_id(resolve_reference(summary.previous_flyby.as_ref()))
            .await?;
        let next = self
            .resolve_id(resolve_reference(summary.next_flyby.as_ref()))
            .await?;

        Ok(ResolvedSummary {
            summary,
            previous,
            next,
        })
    }

    /// Resolve every record and rebuild the index for the comet's windows.
    pub async fn rebuild(
        mut self,
        windows: &[FlybyWindow],
        summaries: Vec<SummaryModel>,
    ) -> Result<SummaryIndex, Error> {
        let mut resolved = Vec::with_capacity(summaries.len());
        for summary in summaries {
            resolved.push(self.resolve(summary).await?);
        }

        Ok(reconcile(self.comet_id, windows, resolved))
    }
}
