use crate::{
    error::FanoutError,
    sink::{ChannelSink, RegionalRecord},
};
use connectors::{fetcher::PageFetcher, session::SessionProvider};
use engine_core::{
    enumerate::{EnumerationSummary, Termination},
    error::QueryError,
    sink::RowSink,
    table::ReservedInstanceTable,
};
use futures::{StreamExt, future::try_join_all, stream::FuturesUnordered};
use model::{
    query::{Quals, RowCeiling},
    table::TABLE_NAME,
};
use tokio::{sync::mpsc, task::JoinHandle};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

pub const DEFAULT_CHANNEL_CAPACITY: usize = 256;

/// Outcome of a multi-region listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FanoutSummary {
    /// Rows handed to the caller's sink.
    pub emitted: u64,
    pub termination: Termination,
    /// Per-region driver summaries, in region order.
    pub regions: Vec<(String, EnumerationSummary)>,
    /// The caller's token was cancelled while the query ran.
    pub cancelled: bool,
}

/// Runs one independent enumeration per region and merges their rows.
///
/// Each region gets its own session and its own driver task; nothing is
/// shared between them except the merge channel and a child cancellation
/// token. Rows of one region keep their remote order; rows of different
/// regions interleave.
pub struct RegionFanout<P> {
    provider: P,
    channel_capacity: usize,
}

impl<P> RegionFanout<P>
where
    P: SessionProvider,
{
    pub fn new(provider: P) -> Self {
        RegionFanout {
            provider,
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
        }
    }

    pub fn with_channel_capacity(mut self, capacity: usize) -> Self {
        self.channel_capacity = capacity.max(1);
        self
    }

    /// Build every region's session up front so a bad region fails the
    /// query before any page is fetched.
    async fn connect_all(
        &self,
        regions: &[String],
        op: &str,
    ) -> Result<Vec<(String, P::Fetcher)>, FanoutError> {
        if regions.is_empty() {
            return Err(FanoutError::NoRegions);
        }

        let mut fetchers = Vec::with_capacity(regions.len());
        for region in regions {
            let fetcher = self.provider.connect(region).await.map_err(|e| {
                error!(table = TABLE_NAME, op, region = %region, error = %e, "Failed to create client.");
                FanoutError::region(region.clone(), QueryError::Setup(e))
            })?;
            fetchers.push((region.clone(), fetcher));
        }
        Ok(fetchers)
    }

    /// Run one query per region and merge the rows into `sink`. An id qual
    /// makes every region a single lookup call; otherwise each region is
    /// enumerated page by page.
    ///
    /// When a region fails, the others are cancelled and the earliest
    /// failure is returned. Every region task is awaited before returning.
    pub async fn query<S>(
        &self,
        regions: &[String],
        quals: &Quals,
        ceiling: Option<RowCeiling>,
        sink: &mut S,
        cancel: CancellationToken,
    ) -> Result<FanoutSummary, FanoutError>
    where
        S: RowSink<RegionalRecord<<P::Fetcher as PageFetcher>::Record>> + ?Sized,
    {
        let fetchers = self.connect_all(regions, "query").await?;
        let mut summary = FanoutSummary::default();
        if ceiling.is_some_and(RowCeiling::is_zero) {
            summary.termination = Termination::CeilingReached;
            return Ok(summary);
        }

        let stop = cancel.child_token();
        let (tx, mut rx) = mpsc::channel(self.channel_capacity);
        let mut pending: FuturesUnordered<_> = fetchers
            .into_iter()
            .enumerate()
            .map(|(index, (region, fetcher))| {
                let mut sink = ChannelSink::new(region.clone(), tx.clone(), stop.clone());
                let stop = stop.clone();
                let quals = quals.clone();
                let task_region = region.clone();
                let handle: JoinHandle<Result<EnumerationSummary, FanoutError>> =
                    tokio::spawn(async move {
                        let res = ReservedInstanceTable::new(&fetcher)
                            .query(&quals, ceiling, &mut sink)
                            .await;
                        res.map_err(|e| {
                            stop.cancel();
                            FanoutError::region(task_region, e)
                        })
                    });
                async move { (index, region, handle.await) }
            })
            .collect();
        drop(tx);

        // Merge rows and collect region outcomes together, so failures are
        // seen in the order they happen.
        let mut merging = true;
        let mut finished = Vec::new();
        let mut failure = None;
        while merging || !pending.is_empty() {
            tokio::select! {
                item = rx.recv(), if merging => {
                    let Some(item) = item else {
                        merging = false;
                        continue;
                    };
                    let control = sink.emit(item).await;
                    summary.emitted += 1;

                    let reason = if control.is_stop() {
                        Some(Termination::SinkStopped)
                    } else if ceiling.is_some_and(|c| c.reached(summary.emitted)) {
                        Some(Termination::CeilingReached)
                    } else {
                        None
                    };
                    if let Some(reason) = reason {
                        summary.termination = reason;
                        stop.cancel();
                        rx.close();
                        merging = false;
                    }
                }
                Some((index, region, joined)) = pending.next(), if !pending.is_empty() => {
                    match joined.map_err(FanoutError::from).and_then(|res| res) {
                        Ok(region_summary) => finished.push((index, region, region_summary)),
                        Err(e) => {
                            stop.cancel();
                            if failure.is_none() {
                                rx.close();
                                merging = false;
                                failure = Some(e);
                            } else {
                                warn!(region = %region, error = %e, "Additional region failure.");
                            }
                        }
                    }
                }
                else => break,
            }
        }
        if let Some(e) = failure {
            return Err(e);
        }

        finished.sort_by_key(|(index, _, _)| *index);
        summary.regions = finished
            .into_iter()
            .map(|(_, region, region_summary)| (region, region_summary))
            .collect();
        summary.cancelled = cancel.is_cancelled();
        if summary.termination == Termination::Exhausted
            && summary
                .regions
                .iter()
                .any(|(_, s)| s.termination == Termination::DuplicateToken)
        {
            summary.termination = Termination::DuplicateToken;
        }

        info!(
            regions = summary.regions.len(),
            rows = summary.emitted,
            termination = ?summary.termination,
            cancelled = summary.cancelled,
            "Query finished."
        );
        Ok(summary)
    }

    /// Look the id up in every region concurrently and return the first
    /// hit in region order.
    pub async fn get(
        &self,
        regions: &[String],
        reserved_instance_id: &str,
    ) -> Result<Option<RegionalRecord<<P::Fetcher as PageFetcher>::Record>>, FanoutError> {
        if reserved_instance_id.is_empty() {
            return Ok(None);
        }

        let fetchers = self.connect_all(regions, "get").await?;
        let lookups = fetchers.iter().map(|(region, fetcher)| async move {
            ReservedInstanceTable::new(fetcher)
                .get(reserved_instance_id)
                .await
                .map(|found| {
                    found.map(|record| RegionalRecord {
                        region: region.clone(),
                        record,
                    })
                })
                .map_err(|e| FanoutError::region(region.clone(), e))
        });

        let results = try_join_all(lookups).await?;
        Ok(results.into_iter().flatten().next())
    }
}
