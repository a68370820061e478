use async_trait::async_trait;
use engine_core::sink::{RowSink, SinkControl};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// A record tagged with the region it was listed from.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionalRecord<R> {
    pub region: String,
    pub record: R,
}

/// Forwards one region's records into the merge channel. Reports Stop once
/// the shared token is cancelled or the merge side has hung up.
pub struct ChannelSink<R> {
    region: String,
    tx: mpsc::Sender<RegionalRecord<R>>,
    cancel: CancellationToken,
}

impl<R> ChannelSink<R> {
    pub fn new(
        region: impl Into<String>,
        tx: mpsc::Sender<RegionalRecord<R>>,
        cancel: CancellationToken,
    ) -> Self {
        ChannelSink {
            region: region.into(),
            tx,
            cancel,
        }
    }
}

#[async_trait]
impl<R: Send + 'static> RowSink<R> for ChannelSink<R> {
    async fn emit(&mut self, record: R) -> SinkControl {
        if self.cancel.is_cancelled() {
            return SinkControl::Stop;
        }

        let item = RegionalRecord {
            region: self.region.clone(),
            record,
        };
        tokio::select! {
            _ = self.cancel.cancelled() => SinkControl::Stop,
            sent = self.tx.send(item) => match sent {
                Ok(()) if !self.cancel.is_cancelled() => SinkControl::Continue,
                _ => SinkControl::Stop,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_forwards_with_region() {
        let (tx, mut rx) = mpsc::channel(4);
        let mut sink = ChannelSink::new("eu-west-1", tx, CancellationToken::new());

        assert_eq!(sink.emit(7).await, SinkControl::Continue);
        let got = rx.recv().await.unwrap();
        assert_eq!(got.region, "eu-west-1");
        assert_eq!(got.record, 7);
    }

    #[tokio::test]
    async fn test_stops_when_cancelled() {
        let (tx, mut rx) = mpsc::channel(4);
        let cancel = CancellationToken::new();
        let mut sink = ChannelSink::new("eu-west-1", tx, cancel.clone());

        cancel.cancel();
        assert_eq!(sink.emit(1).await, SinkControl::Stop);
        drop(sink);
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test]
    async fn test_stops_when_receiver_gone() {
        let (tx, rx) = mpsc::channel(4);
        drop(rx);
        let mut sink = ChannelSink::new("eu-west-1", tx, CancellationToken::new());
        assert_eq!(sink.emit(1).await, SinkControl::Stop);
    }

    #[tokio::test]
    async fn test_cancel_unblocks_full_channel() {
        let (tx, _rx) = mpsc::channel(1);
        let cancel = CancellationToken::new();
        let mut sink = ChannelSink::new("eu-west-1", tx, cancel.clone());

        assert_eq!(sink.emit(1).await, SinkControl::Continue);
        let pending = tokio::spawn(async move { sink.emit(2).await });
        cancel.cancel();
        assert_eq!(pending.await.unwrap(), SinkControl::Stop);
    }
}
