//! Response Merging
//!
//! Folds the response set of a multicast into one header map and one body stream.
//! Nothing is read until the caller polls the merged body.

use super::concat::ConcatStream;
use crate::error::{Result, RouteError};
use crate::transport::{BOUNDARY_HEADER, ByteStream, EndpointResponse};

use bytes::Bytes;
use futures::StreamExt;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReturnMode {
    /// Only the first collected response. The others are closed unread.
    One,
    /// Every response, concatenated or re-framed as one multipart message.
    All,
}

pub struct MergedResponse {
    pub headers: HeaderMap,
    pub body: ByteStream,
}

pub fn merge(responses: Vec<EndpointResponse>, mode: ReturnMode) -> Result<MergedResponse> {
    let mut responses: VecDeque<EndpointResponse> = responses.into();
    let multipart = responses
        .front()
        .ok_or(RouteError::NoHosts)?
        .boundary()
        .is_some();

    match mode {
        ReturnMode::One => {
            let first = responses.pop_front().ok_or(RouteError::NoHosts)?;
            tracing::debug!(
                address = %first.address,
                discarded = responses.len(),
                "Returning first response"
            );
            drop(responses);

            Ok(MergedResponse {
                headers: content_type_of(&first.headers),
                body: first.body,
            })
        }
        ReturnMode::All if !multipart => {
            let headers = responses
                .front()
                .map(|first| content_type_of(&first.headers))
                .unwrap_or_default();
            Ok(MergedResponse {
                headers,
                body: ConcatStream::new(responses.into_iter().map(|r| r.body)).boxed(),
            })
        }
        ReturnMode::All => {
            let boundary = Uuid::new_v4().simple().to_string();
            let mut headers = HeaderMap::new();
            let content_type = format!("multipart/form-data; boundary={}", boundary);
            if let Ok(value) = HeaderValue::from_str(&boundary) {
                headers.insert(BOUNDARY_HEADER, value);
            }
            if let Ok(value) = HeaderValue::from_str(&content_type) {
                headers.insert(CONTENT_TYPE, value);
            }

            tracing::debug!(responses = responses.len(), boundary = %boundary, "Merging multipart responses");
            Ok(MergedResponse {
                headers,
                body: multipart_body(responses, boundary),
            })
        }
    }
}

fn content_type_of(source: &HeaderMap) -> HeaderMap {
    let mut headers = HeaderMap::new();
    if let Some(value) = source.get(CONTENT_TYPE) {
        headers.insert(CONTENT_TYPE, value.clone());
    }
    headers
}

/// Re-emits every part of every response under one fresh boundary, one part per chunk.
fn multipart_body(responses: VecDeque<EndpointResponse>, boundary: String) -> ByteStream {
    let state = MultipartMerge {
        pending: responses,
        current: None,
        boundary,
        closed: false,
    };

    futures::stream::try_unfold(state, |mut state| async move {
        let chunk = state.next_chunk().await?;
        Ok::<_, RouteError>(chunk.map(|chunk| (chunk, state)))
    })
    .boxed()
}

struct MultipartMerge {
    pending: VecDeque<EndpointResponse>,
    current: Option<multer::Multipart<'static>>,
    boundary: String,
    closed: bool,
}

impl MultipartMerge {
    async fn next_chunk(&mut self) -> Result<Option<Bytes>> {
        loop {
            if let Some(reader) = self.current.as_mut() {
                match reader.next_field().await? {
                    Some(field) => {
                        let name = field.name().unwrap_or_default().to_string();
                        let file_name = field.file_name().unwrap_or_default().to_string();
                        let data = field.bytes().await?;
                        return Ok(Some(self.encode_part(&name, &file_name, &data)));
                    }
                    None => {
                        // Drops the reader and with it the response body
                        self.current = None;
                        continue;
                    }
                }
            }

            match self.pending.pop_front() {
                Some(response) => {
                    let boundary = response
                        .boundary()
                        .map(str::to_string)
                        .ok_or_else(|| RouteError::MissingBoundary(response.address.clone()))?;
                    self.current = Some(multer::Multipart::new(response.body, boundary));
                }
                None if !self.closed => {
                    self.closed = true;
                    return Ok(Some(Bytes::from(format!("--{}--\r\n", self.boundary))));
                }
                None => return Ok(None),
            }
        }
    }

    fn encode_part(&self, name: &str, file_name: &str, data: &[u8]) -> Bytes {
        let head = format!(
            "--{}\r\nContent-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: application/octet-stream\r\n\r\n",
            self.boundary,
            escape_quotes(name),
            escape_quotes(file_name)
        );

        let mut part = Vec::with_capacity(head.len() + data.len() + 2);
        part.extend_from_slice(head.as_bytes());
        part.extend_from_slice(data);
        part.extend_from_slice(b"\r\n");
        Bytes::from(part)
    }
}

fn escape_quotes(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}
