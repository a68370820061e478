use crate::{
    error::QueryError,
    paginator::Paginator,
    paging::PageRequest,
    sink::RowSink,
};
use connectors::fetcher::PageFetcher;
use model::{
    query::{Filter, RowCeiling},
    table::TABLE_NAME,
};
use tracing::{debug, error, info};

/// Why an enumeration stopped without error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Termination {
    /// The service reported no further pages.
    #[default]
    Exhausted,
    /// The service repeated a continuation token.
    DuplicateToken,
    /// The row ceiling was met.
    CeilingReached,
    /// The sink asked to stop.
    SinkStopped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EnumerationSummary {
    pub emitted: u64,
    pub pages: usize,
    pub termination: Termination,
}

/// Streams every record of a (possibly filtered) listing to a sink, one
/// page at a time, stopping as soon as the ceiling or the sink allows.
pub struct EnumerationDriver<'a, F> {
    fetcher: &'a F,
}

impl<'a, F: PageFetcher> EnumerationDriver<'a, F> {
    pub fn new(fetcher: &'a F) -> Self {
        EnumerationDriver { fetcher }
    }

    pub async fn run<S>(
        &self,
        filter: Option<Filter>,
        ceiling: Option<RowCeiling>,
        sink: &mut S,
    ) -> Result<EnumerationSummary, QueryError>
    where
        S: RowSink<F::Record> + ?Sized,
    {
        let mut summary = EnumerationSummary::default();
        if ceiling.is_some_and(RowCeiling::is_zero) {
            summary.termination = Termination::CeilingReached;
            return Ok(summary);
        }

        let request = PageRequest::new(filter, ceiling);
        debug!(
            scope = self.fetcher.scope(),
            filter = ?request.filter(),
            page_size = request.page_size(),
            "Starting enumeration."
        );

        let mut paginator = Paginator::new(self.fetcher, request);
        while paginator.has_more_pages() {
            let page = paginator.next_page().await.map_err(|e| {
                error!(
                    table = TABLE_NAME,
                    scope = self.fetcher.scope(),
                    page = paginator.pages_fetched() + 1,
                    emitted = summary.emitted,
                    error = %e,
                    "Page fetch failed."
                );
                e
            })?;
            summary.pages = paginator.pages_fetched();

            for record in page.records {
                let control = sink.emit(record).await;
                summary.emitted += 1;

                if control.is_stop() {
                    summary.termination = Termination::SinkStopped;
                    return Ok(self.finish(summary));
                }
                if ceiling.is_some_and(|c| c.reached(summary.emitted)) {
                    summary.termination = Termination::CeilingReached;
                    return Ok(self.finish(summary));
                }
            }
        }

        summary.termination = if paginator.stopped_on_duplicate_token() {
            Termination::DuplicateToken
        } else {
            Termination::Exhausted
        };
        Ok(self.finish(summary))
    }

    fn finish(&self, summary: EnumerationSummary) -> EnumerationSummary {
        info!(
            scope = self.fetcher.scope(),
            rows = summary.emitted,
            pages = summary.pages,
            termination = ?summary.termination,
            "Enumeration finished."
        );
        summary
    }
}
