//! Routing extracted records to the rewards and offers stores

use tracing::debug;

use crate::error::Result;
use crate::models::{DispatchStats, RewardRecord, Sink};

/// A store that accepts reward documents
///
/// One append operation per document; the sink says which collection it
/// belongs to and the card name travels alongside the record.
pub trait RewardStore {
    fn append(&self, sink: Sink, card_name: &str, record: &RewardRecord) -> Result<i64>;
}

/// Append every record to the sink its reward type routes to
pub fn dispatch<S: RewardStore + ?Sized>(
    store: &S,
    card_name: &str,
    records: &[RewardRecord],
) -> Result<DispatchStats> {
    let mut stats = DispatchStats::default();

    for record in records {
        let sink = Sink::for_record(record);
        store.append(sink, card_name, record)?;
        match sink {
            Sink::Rewards => stats.rewards += 1,
            Sink::Offers => stats.offers += 1,
        }
    }

    debug!(
        "Stored {} rewards and {} offers for '{}'",
        stats.rewards, stats.offers, card_name
    );
    Ok(stats)
}
