use crate::{
    error::{FetchError, SessionError},
    fetcher::{FetchPageRequest, PageFetcher},
    session::SessionProvider,
};
use async_trait::async_trait;
use model::pagination::page::Page;
use std::{
    collections::{HashMap, VecDeque},
    sync::{Arc, Mutex},
};

struct Script<R> {
    responses: VecDeque<Result<Page<R>, FetchError>>,
    /// Served forever once `responses` runs dry.
    repeat: Option<Page<R>>,
    requests: Vec<FetchPageRequest>,
}

/// In-memory fetcher that plays back a fixed sequence of responses and
/// records every request it receives. Clones share the same script.
pub struct ScriptedFetcher<R> {
    scope: String,
    script: Arc<Mutex<Script<R>>>,
}

impl<R> Clone for ScriptedFetcher<R> {
    fn clone(&self) -> Self {
        ScriptedFetcher {
            scope: self.scope.clone(),
            script: Arc::clone(&self.script),
        }
    }
}

impl<R> ScriptedFetcher<R> {
    pub fn new(scope: impl Into<String>) -> Self {
        ScriptedFetcher {
            scope: scope.into(),
            script: Arc::new(Mutex::new(Script {
                responses: VecDeque::new(),
                repeat: None,
                requests: Vec::new(),
            })),
        }
    }

    pub fn with_pages(scope: impl Into<String>, pages: Vec<Page<R>>) -> Self {
        let fetcher = Self::new(scope);
        for page in pages {
            fetcher.push(Ok(page));
        }
        fetcher
    }

    pub fn push(&self, response: Result<Page<R>, FetchError>) {
        if let Ok(mut script) = self.script.lock() {
            script.responses.push_back(response);
        }
    }

    /// Keep answering with `page` after the scripted responses are used up.
    pub fn repeat(self, page: Page<R>) -> Self {
        if let Ok(mut script) = self.script.lock() {
            script.repeat = Some(page);
        }
        self
    }

    pub fn calls(&self) -> usize {
        self.script.lock().map(|s| s.requests.len()).unwrap_or(0)
    }

    pub fn requests(&self) -> Vec<FetchPageRequest> {
        self.script
            .lock()
            .map(|s| s.requests.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl<R> PageFetcher for ScriptedFetcher<R>
where
    R: Clone + Send + Sync + 'static,
{
    type Record = R;

    async fn fetch_page(&self, request: &FetchPageRequest) -> Result<Page<R>, FetchError> {
        let mut script = self
            .script
            .lock()
            .map_err(|_| FetchError::Transport("script lock poisoned".into()))?;
        script.requests.push(request.clone());

        match script.responses.pop_front() {
            Some(response) => response,
            None => script
                .repeat
                .clone()
                .ok_or_else(|| FetchError::Transport("script exhausted".into())),
        }
    }

    fn scope(&self) -> &str {
        &self.scope
    }
}

/// Hands out pre-built scripted fetchers by region. Regions without a
/// script fail at connect time.
pub struct ScriptedSessionProvider<R> {
    fetchers: HashMap<String, ScriptedFetcher<R>>,
}

impl<R> ScriptedSessionProvider<R> {
    pub fn new() -> Self {
        ScriptedSessionProvider {
            fetchers: HashMap::new(),
        }
    }

    pub fn with_region(mut self, fetcher: ScriptedFetcher<R>) -> Self {
        self.fetchers.insert(fetcher.scope.clone(), fetcher);
        self
    }
}

impl<R> Default for ScriptedSessionProvider<R> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<R> SessionProvider for ScriptedSessionProvider<R>
where
    R: Clone + Send + Sync + 'static,
{
    type Fetcher = ScriptedFetcher<R>;

    async fn connect(&self, region: &str) -> Result<ScriptedFetcher<R>, SessionError> {
        self.fetchers
            .get(region)
            .cloned()
            .ok_or_else(|| SessionError::UnknownRegion(region.to_string()))
    }
}
