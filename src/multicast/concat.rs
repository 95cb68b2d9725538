use crate::error::Result;
use crate::transport::ByteStream;

use bytes::Bytes;
use futures::{Stream, ready};
use std::collections::VecDeque;
use std::pin::Pin;
use std::task::{Context, Poll};

/// Presents a sequence of body streams as one.
///
/// Each sub-stream is dropped, and so closed, as soon as it reports its end. Empty
/// chunks are swallowed so an empty sub-stream never looks like the end of the whole.
/// Dropping the `ConcatStream` closes every sub-stream not yet reached.
pub struct ConcatStream {
    streams: VecDeque<ByteStream>,
}

impl ConcatStream {
    pub fn new(streams: impl IntoIterator<Item = ByteStream>) -> Self {
        Self {
            streams: streams.into_iter().collect(),
        }
    }

    /// Sub-streams not yet exhausted, including the one being read.
    pub fn remaining(&self) -> usize {
        self.streams.len()
    }
}

impl Stream for ConcatStream {
    type Item = Result<Bytes>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        loop {
            let Some(current) = self.streams.front_mut() else {
                return Poll::Ready(None);
            };

            match ready!(current.as_mut().poll_next(cx)) {
                Some(Ok(chunk)) if chunk.is_empty() => continue,
                Some(item) => return Poll::Ready(Some(item)),
                None => {
                    self.streams.pop_front();
                }
            }
        }
    }
}
