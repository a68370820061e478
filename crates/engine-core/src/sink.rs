use async_trait::async_trait;

/// Answer of a sink after each record: keep the rows coming or stop the
/// whole query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SinkControl {
    Continue,
    Stop,
}

impl SinkControl {
    pub fn is_stop(self) -> bool {
        self == SinkControl::Stop
    }
}

/// Consumer of emitted records. Called once per record, in remote order;
/// returning [`SinkControl::Stop`] ends the query before the next record.
#[async_trait]
pub trait RowSink<R: Send + 'static>: Send {
    async fn emit(&mut self, record: R) -> SinkControl;
}

/// Adapts a plain closure into a sink.
pub struct FnSink<F>(pub F);

#[async_trait]
impl<R, F> RowSink<R> for FnSink<F>
where
    R: Send + 'static,
    F: FnMut(R) -> SinkControl + Send,
{
    async fn emit(&mut self, record: R) -> SinkControl {
        (self.0)(record)
    }
}

/// Collects every record and never asks to stop.
#[derive(Debug)]
pub struct VecSink<R> {
    records: Vec<R>,
}

impl<R> VecSink<R> {
    pub fn new() -> Self {
        VecSink {
            records: Vec::new(),
        }
    }

    pub fn records(&self) -> &[R] {
        &self.records
    }

    pub fn into_records(self) -> Vec<R> {
        self.records
    }
}

impl<R> Default for VecSink<R> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<R: Send + 'static> RowSink<R> for VecSink<R> {
    async fn emit(&mut self, record: R) -> SinkControl {
        self.records.push(record);
        SinkControl::Continue
    }
}
