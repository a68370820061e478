use crate::{
    enumerate::{EnumerationDriver, EnumerationSummary, Termination},
    error::QueryError,
    lookup::LookupResolver,
    sink::RowSink,
};
use connectors::fetcher::PageFetcher;
use model::query::{Filter, Quals, RowCeiling};
use tracing::debug;

/// Caller surface of the reserved instance table over one connected
/// region: a keyed Get and a filtered, limited List.
pub struct ReservedInstanceTable<'a, F> {
    fetcher: &'a F,
}

impl<'a, F: PageFetcher> ReservedInstanceTable<'a, F> {
    pub fn new(fetcher: &'a F) -> Self {
        ReservedInstanceTable { fetcher }
    }

    pub async fn get(&self, reserved_instance_id: &str) -> Result<Option<F::Record>, QueryError> {
        LookupResolver::new(self.fetcher)
            .resolve(reserved_instance_id)
            .await
    }

    pub async fn list<S>(
        &self,
        filter: Option<Filter>,
        ceiling: Option<RowCeiling>,
        sink: &mut S,
    ) -> Result<EnumerationSummary, QueryError>
    where
        S: RowSink<F::Record> + ?Sized,
    {
        EnumerationDriver::new(self.fetcher)
            .run(filter, ceiling, sink)
            .await
    }

    /// Route a query: an id qual goes to Get, everything else to List.
    pub async fn query<S>(
        &self,
        quals: &Quals,
        ceiling: Option<RowCeiling>,
        sink: &mut S,
    ) -> Result<EnumerationSummary, QueryError>
    where
        S: RowSink<F::Record> + ?Sized,
    {
        let Some(id) = quals.key() else {
            return self.list(None, ceiling, sink).await;
        };
        debug!(scope = self.fetcher.scope(), id, "Routing to lookup.");

        let mut summary = EnumerationSummary::default();
        if ceiling.is_some_and(RowCeiling::is_zero) {
            summary.termination = Termination::CeilingReached;
            return Ok(summary);
        }
        if id.is_empty() {
            return Ok(summary);
        }

        let found = self.get(id).await?;
        summary.pages = 1;
        if let Some(record) = found {
            summary.emitted = 1;
            if sink.emit(record).await.is_stop() {
                summary.termination = Termination::SinkStopped;
            }
        }
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::VecSink;
    use connectors::{error::FetchError, memory::ScriptedFetcher};
    use model::{
        pagination::{cursor::ContinuationToken, page::Page},
        records::reserved_instance::ReservedInstance,
    };

    fn ri(id: &str) -> ReservedInstance {
        ReservedInstance::with_id(id)
    }

    #[tokio::test]
    async fn test_query_with_id_uses_lookup() {
        let fetcher = ScriptedFetcher::with_pages(
            "us-east-1",
            vec![Page::new(vec![ri("ri-1"), ri("ri-2")], Some(ContinuationToken::new("n")))],
        );
        let mut sink = VecSink::new();

        let summary = ReservedInstanceTable::new(&fetcher)
            .query(&Quals::with_id("ri-1"), None, &mut sink)
            .await
            .unwrap();

        assert_eq!(summary.emitted, 1);
        assert_eq!(summary.pages, 1);
        assert_eq!(sink.records(), [ri("ri-1")]);
        assert_eq!(fetcher.calls(), 1);
        let request = &fetcher.requests()[0];
        assert_eq!(request.max_results, None);
        assert_eq!(request.next_token, None);
        assert_eq!(request.filter, Some(Filter::reserved_instance_id("ri-1")));
    }

    #[tokio::test]
    async fn test_query_with_empty_id_makes_no_call() {
        let fetcher = ScriptedFetcher::with_pages("us-east-1", vec![Page::last(vec![ri("x")])]);
        let mut sink = VecSink::new();

        let summary = ReservedInstanceTable::new(&fetcher)
            .query(&Quals::with_id(""), None, &mut sink)
            .await
            .unwrap();
        assert_eq!(summary.emitted, 0);
        assert!(sink.records().is_empty());
        assert_eq!(fetcher.calls(), 0);
    }

    #[tokio::test]
    async fn test_query_with_id_and_zero_ceiling_makes_no_call() {
        let fetcher = ScriptedFetcher::with_pages("us-east-1", vec![Page::last(vec![ri("ri-1")])]);
        let mut sink = VecSink::new();

        let summary = ReservedInstanceTable::new(&fetcher)
            .query(&Quals::with_id("ri-1"), Some(RowCeiling::new(0)), &mut sink)
            .await
            .unwrap();
        assert_eq!(summary.termination, Termination::CeilingReached);
        assert_eq!(fetcher.calls(), 0);
    }

    #[tokio::test]
    async fn test_query_without_id_lists() {
        let fetcher = ScriptedFetcher::with_pages(
            "us-east-1",
            vec![
                Page::new(vec![ri("a")], Some(ContinuationToken::new("t"))),
                Page::last(vec![ri("b")]),
            ],
        );
        let mut sink = VecSink::new();

        let summary = ReservedInstanceTable::new(&fetcher)
            .query(&Quals::default(), None, &mut sink)
            .await
            .unwrap();
        assert_eq!(summary.emitted, 2);
        assert_eq!(fetcher.calls(), 2);
        assert!(fetcher.requests().iter().all(|r| r.filter.is_none()));
        assert!(fetcher.requests().iter().all(|r| r.max_results == Some(100)));
    }

    #[tokio::test]
    async fn test_lookup_failure_propagates() {
        let fetcher = ScriptedFetcher::<ReservedInstance>::new("us-east-1");
        fetcher.push(Err(FetchError::Unauthorized {
            status: 403,
            body: "denied".into(),
        }));
        let mut sink = VecSink::new();

        let err = ReservedInstanceTable::new(&fetcher)
            .query(&Quals::with_id("ri-1"), None, &mut sink)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            QueryError::Fetch(FetchError::Unauthorized { status: 403, .. })
        ));
        assert!(sink.records().is_empty());
    }
}
