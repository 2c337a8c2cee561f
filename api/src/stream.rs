//! Cancellable prop-generation stream.
//!
//! A spawned task owns the HTTP response, decodes SSE chunks and forwards
//! typed events through a bounded channel. Dropping the stream or calling
//! [`GenerationStream::cancel`] aborts the task, which drops the response
//! and closes the connection.

use std::pin::Pin;
use std::task::{Context, Poll};

use futures_util::{Stream, StreamExt};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::error::ApiError;
use crate::events::GenerationEvent;
use crate::sse::{SseDecoder, SseMessage};

type StreamItem = Result<GenerationEvent, ApiError>;

#[derive(Debug)]
pub struct GenerationStream {
    id: Uuid,
    rx: mpsc::Receiver<StreamItem>,
    task: JoinHandle<()>,
}

impl GenerationStream {
    /// Send `request` on a background task. Must be called inside a tokio runtime.
    pub(crate) fn spawn(request: reqwest::RequestBuilder, capacity: usize) -> Self {
        let id = Uuid::new_v4();
        let (tx, rx) = mpsc::channel(capacity.max(1));
        let task = tokio::spawn(pump(id, request, tx));
        tracing::info!(%id, "generation stream started");
        Self { id, rx, task }
    }

    /// Correlation id used in this stream's log lines.
    #[must_use]
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Next event, or `None` once the stream has ended or been cancelled.
    pub async fn recv(&mut self) -> Option<StreamItem> {
        self.rx.recv().await
    }

    /// Abort the request. Buffered events are discarded.
    pub fn cancel(&mut self) {
        if !self.task.is_finished() {
            tracing::info!(id = %self.id, "generation stream cancelled");
        }
        self.task.abort();
        self.rx.close();
        while self.rx.try_recv().is_ok() {}
    }
}

impl Stream for GenerationStream {
    type Item = StreamItem;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<StreamItem>> {
        self.rx.poll_recv(cx)
    }
}

impl Drop for GenerationStream {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn pump(id: Uuid, request: reqwest::RequestBuilder, tx: mpsc::Sender<StreamItem>) {
    let response = match request.send().await {
        Ok(response) => response,
        Err(e) => {
            tracing::warn!(%id, error = %e, "generation request failed");
            deliver(&tx, Err(ApiError::Request(e.to_string()))).await;
            return;
        }
    };

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        tracing::warn!(%id, status = status.as_u16(), "generation request rejected");
        deliver(&tx, Err(ApiError::Response { status: status.as_u16(), body })).await;
        return;
    }

    let mut decoder = SseDecoder::new();
    let mut body = response.bytes_stream();
    while let Some(chunk) = body.next().await {
        let chunk = match chunk {
            Ok(chunk) => chunk,
            Err(e) => {
                tracing::warn!(%id, error = %e, "generation stream broke");
                deliver(&tx, Err(ApiError::Stream(e.to_string()))).await;
                return;
            }
        };
        for message in decoder.push(&chunk) {
            if !forward(&tx, &message).await {
                return;
            }
        }
    }
    if let Some(message) = decoder.finish() {
        forward(&tx, &message).await;
    }
    tracing::info!(%id, "generation stream finished");
}

/// Decode and send one message. Returns false once the receiver is gone.
async fn forward(tx: &mpsc::Sender<StreamItem>, message: &SseMessage) -> bool {
    let event = GenerationEvent::from_sse(message);
    if let Err(e) = &event {
        tracing::warn!(event = %message.event, error = %e, "malformed generation event");
    }
    deliver(tx, event).await
}

async fn deliver(tx: &mpsc::Sender<StreamItem>, item: StreamItem) -> bool {
    if tx.send(item).await.is_err() {
        tracing::debug!("generation receiver dropped");
        return false;
    }
    true
}
