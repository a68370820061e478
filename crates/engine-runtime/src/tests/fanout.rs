use crate::{error::FanoutError, fanout::RegionFanout, sink::RegionalRecord};
use async_trait::async_trait;
use connectors::{
    error::{FetchError, SessionError},
    fetcher::{FetchPageRequest, PageFetcher},
    memory::{ScriptedFetcher, ScriptedSessionProvider},
    session::SessionProvider,
};
use engine_core::{
    enumerate::Termination,
    error::QueryError,
    sink::{FnSink, SinkControl, VecSink},
};
use model::{
    pagination::{cursor::ContinuationToken, page::Page},
    query::{Filter, Quals, RowCeiling},
    records::reserved_instance::ReservedInstance,
};
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;

/// Fails every fetch with `status` after waiting `delay`.
#[derive(Clone)]
struct FailingFetcher {
    region: String,
    delay: Duration,
    status: u16,
}

#[async_trait]
impl PageFetcher for FailingFetcher {
    type Record = ReservedInstance;

    async fn fetch_page(
        &self,
        _request: &FetchPageRequest,
    ) -> Result<Page<ReservedInstance>, FetchError> {
        tokio::time::sleep(self.delay).await;
        Err(FetchError::Status {
            status: self.status,
            body: self.region.clone(),
        })
    }

    fn scope(&self) -> &str {
        &self.region
    }
}

struct FailingProvider {
    fetchers: Vec<FailingFetcher>,
}

#[async_trait]
impl SessionProvider for FailingProvider {
    type Fetcher = FailingFetcher;

    async fn connect(&self, region: &str) -> Result<FailingFetcher, SessionError> {
        self.fetchers
            .iter()
            .find(|f| f.region == region)
            .cloned()
            .ok_or_else(|| SessionError::UnknownRegion(region.to_string()))
    }
}

fn ri(id: &str) -> ReservedInstance {
    ReservedInstance::with_id(id)
}

fn regions(names: &[&str]) -> Vec<String> {
    names.iter().map(|r| r.to_string()).collect()
}

fn ids(records: &[RegionalRecord<ReservedInstance>], region: &str) -> Vec<String> {
    records
        .iter()
        .filter(|r| r.region == region)
        .filter_map(|r| r.record.id().map(str::to_string))
        .collect()
}

#[tokio::test]
async fn test_merges_regions_preserving_per_region_order() {
    let east = ScriptedFetcher::with_pages(
        "us-east-1",
        vec![
            Page::new(vec![ri("e1"), ri("e2")], Some(ContinuationToken::new("t"))),
            Page::last(vec![ri("e3")]),
        ],
    );
    let west = ScriptedFetcher::with_pages("eu-west-1", vec![Page::last(vec![ri("w1")])]);
    let fanout = RegionFanout::new(
        ScriptedSessionProvider::new()
            .with_region(east.clone())
            .with_region(west.clone()),
    );
    let mut sink = VecSink::new();

    let summary = fanout
        .query(
            &regions(&["us-east-1", "eu-west-1"]),
            &Quals::default(),
            None,
            &mut sink,
            CancellationToken::new(),
        )
        .await
        .unwrap();

    assert_eq!(summary.emitted, 4);
    assert_eq!(summary.termination, Termination::Exhausted);
    assert_eq!(summary.regions.len(), 2);
    assert_eq!(summary.regions[0].0, "us-east-1");
    assert!(!summary.cancelled);
    assert_eq!(ids(sink.records(), "us-east-1"), vec!["e1", "e2", "e3"]);
    assert_eq!(ids(sink.records(), "eu-west-1"), vec!["w1"]);
}

#[tokio::test]
async fn test_global_ceiling_across_regions() {
    let east = ScriptedFetcher::with_pages(
        "us-east-1",
        vec![Page::last((0..10).map(|i| ri(&format!("e{i}"))).collect())],
    );
    let west = ScriptedFetcher::with_pages(
        "eu-west-1",
        vec![Page::last((0..10).map(|i| ri(&format!("w{i}"))).collect())],
    );
    let fanout = RegionFanout::new(
        ScriptedSessionProvider::new()
            .with_region(east.clone())
            .with_region(west.clone()),
    )
    .with_channel_capacity(1);
    let mut sink = VecSink::new();

    let summary = fanout
        .query(
            &regions(&["us-east-1", "eu-west-1"]),
            &Quals::default(),
            Some(RowCeiling::new(5)),
            &mut sink,
            CancellationToken::new(),
        )
        .await
        .unwrap();

    assert_eq!(sink.records().len(), 5);
    assert_eq!(summary.emitted, 5);
    assert_eq!(summary.termination, Termination::CeilingReached);
    for fetcher in [&east, &west] {
        let requests = fetcher.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].max_results, Some(20));
        assert_eq!(requests[0].filter, None);
    }
}

#[tokio::test]
async fn test_sink_stop_cancels_all_regions() {
    let east = ScriptedFetcher::new("us-east-1").repeat(Page::new(
        vec![ri("e")],
        Some(ContinuationToken::new("never-repeats-in-practice")),
    ));
    let fanout = RegionFanout::new(ScriptedSessionProvider::new().with_region(east.clone()));

    let mut count = 0;
    let mut sink = FnSink(|_: RegionalRecord<ReservedInstance>| {
        count += 1;
        if count == 1 {
            SinkControl::Stop
        } else {
            SinkControl::Continue
        }
    });

    let summary = fanout
        .query(
            &regions(&["us-east-1"]),
            &Quals::default(),
            None,
            &mut sink,
            CancellationToken::new(),
        )
        .await
        .unwrap();

    assert_eq!(summary.emitted, 1);
    assert_eq!(summary.termination, Termination::SinkStopped);
    assert!(east.calls() <= 2);
}

#[tokio::test]
async fn test_setup_failure_fetches_nothing() {
    let east = ScriptedFetcher::with_pages("us-east-1", vec![Page::last(vec![ri("e1")])]);
    let fanout = RegionFanout::new(ScriptedSessionProvider::new().with_region(east.clone()));
    let mut sink = VecSink::new();

    let err = fanout
        .query(
            &regions(&["us-east-1", "ap-south-1"]),
            &Quals::default(),
            None,
            &mut sink,
            CancellationToken::new(),
        )
        .await
        .unwrap_err();

    match err {
        FanoutError::Region { region, source } => {
            assert_eq!(region, "ap-south-1");
            assert!(matches!(
                source,
                QueryError::Setup(SessionError::UnknownRegion(_))
            ));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(east.calls(), 0);
    assert!(sink.records().is_empty());
}

#[tokio::test]
async fn test_region_failure_is_returned_after_partial_rows() {
    let east = ScriptedFetcher::with_pages(
        "us-east-1",
        vec![Page::new(vec![ri("e1")], Some(ContinuationToken::new("t")))],
    );
    east.push(Err(FetchError::Status {
        status: 503,
        body: "slow down".into(),
    }));
    let fanout = RegionFanout::new(ScriptedSessionProvider::new().with_region(east.clone()));
    let mut sink = VecSink::new();

    let err = fanout
        .query(
            &regions(&["us-east-1"]),
            &Quals::default(),
            None,
            &mut sink,
            CancellationToken::new(),
        )
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        FanoutError::Region {
            source: QueryError::Fetch(FetchError::Status { status: 503, .. }),
            ..
        }
    ));
    assert_eq!(ids(sink.records(), "us-east-1"), vec!["e1"]);
}

#[tokio::test]
async fn test_cancelled_token_stops_listing() {
    let east = ScriptedFetcher::new("us-east-1").repeat(Page::new(
        vec![ri("e")],
        Some(ContinuationToken::new("loop")),
    ));
    let fanout = RegionFanout::new(ScriptedSessionProvider::new().with_region(east.clone()));
    let cancel = CancellationToken::new();
    cancel.cancel();
    let mut sink = VecSink::new();

    let summary = fanout
        .query(&regions(&["us-east-1"]), &Quals::default(), None, &mut sink, cancel)
        .await
        .unwrap();

    assert!(summary.cancelled);
    assert!(sink.records().is_empty());
    assert_eq!(east.calls(), 1);
}

#[tokio::test]
async fn test_no_regions() {
    let fanout = RegionFanout::new(ScriptedSessionProvider::<ReservedInstance>::new());
    let mut sink = VecSink::new();
    let err = fanout
        .query(&[], &Quals::default(), None, &mut sink, CancellationToken::new())
        .await
        .unwrap_err();
    assert!(matches!(err, FanoutError::NoRegions));
}

#[tokio::test]
async fn test_get_returns_first_region_hit() {
    let east = ScriptedFetcher::<ReservedInstance>::with_pages("us-east-1", vec![Page::last(vec![])]);
    let west = ScriptedFetcher::with_pages("eu-west-1", vec![Page::last(vec![ri("ri-9")])]);
    let fanout = RegionFanout::new(
        ScriptedSessionProvider::new()
            .with_region(east.clone())
            .with_region(west.clone()),
    );

    let found = fanout
        .get(&regions(&["us-east-1", "eu-west-1"]), "ri-9")
        .await
        .unwrap()
        .unwrap();

    assert_eq!(found.region, "eu-west-1");
    assert_eq!(found.record.id(), Some("ri-9"));
    assert_eq!(east.calls(), 1);
    assert_eq!(west.calls(), 1);
}

#[tokio::test]
async fn test_get_empty_id_skips_sessions() {
    let fanout = RegionFanout::new(ScriptedSessionProvider::<ReservedInstance>::new());
    let found = fanout.get(&regions(&["nowhere"]), "").await.unwrap();
    assert!(found.is_none());
}

#[tokio::test]
async fn test_id_qual_routes_every_region_to_lookup() {
    let east = ScriptedFetcher::with_pages(
        "us-east-1",
        vec![Page::new(vec![ri("ri-9"), ri("ri-10")], Some(ContinuationToken::new("t")))],
    );
    let west = ScriptedFetcher::<ReservedInstance>::with_pages("eu-west-1", vec![Page::last(vec![])]);
    let fanout = RegionFanout::new(
        ScriptedSessionProvider::new()
            .with_region(east.clone())
            .with_region(west.clone()),
    );
    let mut sink = VecSink::new();

    let summary = fanout
        .query(
            &regions(&["us-east-1", "eu-west-1"]),
            &Quals::with_id("ri-9"),
            None,
            &mut sink,
            CancellationToken::new(),
        )
        .await
        .unwrap();

    assert_eq!(summary.emitted, 1);
    assert_eq!(ids(sink.records(), "us-east-1"), vec!["ri-9"]);
    for fetcher in [&east, &west] {
        let requests = fetcher.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].max_results, None);
        assert_eq!(requests[0].filter, Some(Filter::reserved_instance_id("ri-9")));
    }
}

#[tokio::test]
async fn test_earliest_region_failure_wins_and_all_tasks_are_awaited() {
    let slow = Duration::from_millis(200);
    let fanout = RegionFanout::new(FailingProvider {
        fetchers: vec![
            FailingFetcher {
                region: "us-east-1".into(),
                delay: slow,
                status: 500,
            },
            FailingFetcher {
                region: "eu-west-1".into(),
                delay: Duration::ZERO,
                status: 403,
            },
        ],
    });
    let mut sink = VecSink::new();

    let started = Instant::now();
    let err = fanout
        .query(
            &regions(&["us-east-1", "eu-west-1"]),
            &Quals::default(),
            None,
            &mut sink,
            CancellationToken::new(),
        )
        .await
        .unwrap_err();

    match err {
        FanoutError::Region { region, source } => {
            assert_eq!(region, "eu-west-1");
            assert!(matches!(
                source,
                QueryError::Fetch(FetchError::Status { status: 403, .. })
            ));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(started.elapsed() >= slow);
}
