//! Scripted transport for tests.
//!
//! Each endpoint gets a canned reply. Every body handed out counts its own drop in
//! a shared counter so tests can check that no response is leaked.

use super::Transport;
use super::types::{ByteStream, EndpointResponse, OutboundRequest};
use crate::error::{Result, RouteError};

use async_trait::async_trait;
use bytes::Bytes;
use dashmap::DashMap;
use futures::Stream;
use reqwest::StatusCode;
use reqwest::header::HeaderMap;
use std::collections::VecDeque;
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};
use std::time::Duration;

/// Body stream that increments `closed` when dropped.
pub struct TrackedBody {
    chunks: VecDeque<Result<Bytes>>,
    closed: Arc<AtomicUsize>,
}

impl Stream for TrackedBody {
    type Item = Result<Bytes>;

    fn poll_next(mut self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Poll::Ready(self.chunks.pop_front())
    }
}

impl Drop for TrackedBody {
    fn drop(&mut self) {
        self.closed.fetch_add(1, Ordering::SeqCst);
    }
}

pub fn tracked_body(chunks: Vec<Result<Bytes>>, closed: &Arc<AtomicUsize>) -> ByteStream {
    Box::pin(TrackedBody {
        chunks: chunks.into(),
        closed: closed.clone(),
    })
}

/// Body made of `&str` chunks.
pub fn text_body(chunks: &[&str], closed: &Arc<AtomicUsize>) -> ByteStream {
    tracked_body(
        chunks
            .iter()
            .map(|chunk| Ok(Bytes::copy_from_slice(chunk.as_bytes())))
            .collect(),
        closed,
    )
}

#[derive(Clone)]
pub enum MockReply {
    Respond {
        status: StatusCode,
        headers: HeaderMap,
        chunks: Vec<Bytes>,
    },
    Fail(String),
}

#[derive(Default)]
pub struct MockTransport {
    replies: DashMap<String, MockReply>,
    delays: DashMap<String, Duration>,
    sent: Mutex<Vec<OutboundRequest>>,
    closed: Arc<AtomicUsize>,
}

impl MockTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn respond(&self, endpoint: &str, status: StatusCode, body: &str) {
        self.respond_with(
            endpoint,
            status,
            HeaderMap::new(),
            vec![Bytes::copy_from_slice(body.as_bytes())],
        );
    }

    pub fn respond_with(
        &self,
        endpoint: &str,
        status: StatusCode,
        headers: HeaderMap,
        chunks: Vec<Bytes>,
    ) {
        self.replies.insert(
            endpoint.to_string(),
            MockReply::Respond {
                status,
                headers,
                chunks,
            },
        );
    }

    pub fn fail(&self, endpoint: &str, message: &str) {
        self.replies
            .insert(endpoint.to_string(), MockReply::Fail(message.to_string()));
    }

    pub fn delay(&self, endpoint: &str, delay: Duration) {
        self.delays.insert(endpoint.to_string(), delay);
    }

    pub fn calls(&self) -> usize {
        self.sent.lock().unwrap().len()
    }

    pub fn sent(&self) -> Vec<OutboundRequest> {
        self.sent.lock().unwrap().clone()
    }

    /// Number of response bodies dropped so far.
    pub fn closed(&self) -> usize {
        self.closed.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: OutboundRequest) -> Result<EndpointResponse> {
        self.sent.lock().unwrap().push(request.clone());

        let delay = self.delays.get(&request.endpoint).map(|d| *d.value());
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let reply = self
            .replies
            .get(&request.endpoint)
            .map(|reply| reply.value().clone());

        match reply {
            Some(MockReply::Respond {
                status,
                headers,
                chunks,
            }) => Ok(EndpointResponse {
                address: request.endpoint,
                status,
                headers,
                body: tracked_body(chunks.into_iter().map(Ok).collect(), &self.closed),
            }),
            Some(MockReply::Fail(message)) => Err(RouteError::Transport(message)),
            None => Err(RouteError::Transport(format!(
                "no route to {}",
                request.endpoint
            ))),
        }
    }
}
