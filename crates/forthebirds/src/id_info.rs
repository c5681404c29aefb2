//! Identification text enrichment
//!
//! Species pages are scraped once per distinct species code in a result set,
//! never once per record, and the text is copied onto every matching record.

use std::collections::{HashMap, HashSet};

use ebird_species_page::SpeciesPageClient;
use futures::stream::{self, StreamExt, TryStreamExt};
use tracing::debug;

use crate::error::{PlannerError, Result};
use crate::record::ObservationRecord;

/// Species codes in first-seen order, each once
pub(crate) fn distinct_species(records: &[ObservationRecord]) -> Vec<String> {
    let mut seen = HashSet::new();
    records
        .iter()
        .filter(|record| seen.insert(record.species_code.as_str()))
        .map(|record| record.species_code.clone())
        .collect()
}

/// Scrape identification text for each distinct species and attach it
///
/// Up to `concurrency` pages are fetched at once. Any failure aborts the
/// whole enrichment; records are left untouched in that case.
pub(crate) async fn attach_id_info(
    pages: &SpeciesPageClient,
    records: &mut [ObservationRecord],
    concurrency: usize,
) -> Result<()> {
    let species = distinct_species(records);
    if species.is_empty() {
        return Ok(());
    }

    debug!(species = species.len(), records = records.len(), "Fetching identification info");

    let blurbs: HashMap<String, String> = stream::iter(species)
        .map(|code| async move {
            let info = pages.id_info(&code).await?;
            Ok::<_, PlannerError>((code, info))
        })
        .buffer_unordered(concurrency.max(1))
        .try_collect()
        .await?;

    for record in records.iter_mut() {
        record.id_info = blurbs.get(&record.species_code).cloned();
    }

    Ok(())
}
