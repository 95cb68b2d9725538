use super::AppState;
use super::types::*;
use crate::error::{Result, RouteError};
use crate::multicast::ReturnMode;
use crate::router::Router;
use crate::sharding::ShardIndex;
use crate::transport::ByteStream;

use axum::body::Body;
use axum::extract::{Path, Query, Request};
use axum::http::{HeaderMap, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::{Extension, Json};
use futures::TryStreamExt;

pub const ROUTE_PREFIX: &str = "/route";
pub const MULTICAST_ONE_PREFIX: &str = "/multicast/one";
pub const MULTICAST_ALL_PREFIX: &str = "/multicast/all";

impl IntoResponse for RouteError {
    fn into_response(self) -> Response {
        tracing::error!(error = %self, "Request failed");
        (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()).into_response()
    }
}

pub async fn handle_health(Extension(state): Extension<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        address: state.router.local_address().to_string(),
        num_shards: state.sharder.num_shards(),
    })
}

pub async fn handle_lookup(
    Extension(state): Extension<AppState>,
    Query(query): Query<LookupQuery>,
) -> Result<Json<ShardLookupResponse>> {
    let descriptor = state.sharder.get_descriptor(&query.key)?;

    Ok(Json(ShardLookupResponse {
        key: query.key,
        shard: descriptor.index,
        num_shards: descriptor.num_shards,
        descriptor: descriptor.to_string(),
    }))
}

pub async fn handle_local_shards(
    Extension(state): Extension<AppState>,
) -> Result<Json<LocalShardsResponse>> {
    let master = state.router.get_master_shards().await?;
    let slave = state.router.get_slave_shards().await?;

    Ok(Json(LocalShardsResponse {
        address: state.router.local_address().to_string(),
        master,
        slave,
    }))
}

pub async fn handle_shard_master(
    Extension(state): Extension<AppState>,
    Path(shard): Path<ShardIndex>,
) -> Result<Json<ShardConnResponse>> {
    let conn = state.router.get_master_client_conn(shard).await?;
    Ok(Json(ShardConnResponse {
        shard,
        conn: ConnInfo::from(&conn),
    }))
}

pub async fn handle_shard_replica(
    Extension(state): Extension<AppState>,
    Path(shard): Path<ShardIndex>,
) -> Result<Json<ShardConnResponse>> {
    let conn = state.router.get_master_or_slave_client_conn(shard).await?;
    Ok(Json(ShardConnResponse {
        shard,
        conn: ConnInfo::from(&conn),
    }))
}

pub async fn handle_shard_slaves(
    Extension(state): Extension<AppState>,
    Path(shard): Path<ShardIndex>,
) -> Result<Json<ConnListResponse>> {
    let conns = state.router.get_all_slave_client_conns(shard).await?;
    Ok(Json(ConnListResponse {
        shard: Some(shard),
        conns: conns.iter().map(ConnInfo::from).collect(),
    }))
}

pub async fn handle_peers(Extension(state): Extension<AppState>) -> Result<Json<ConnListResponse>> {
    let conns = state.router.get_all_client_conns().await?;
    Ok(Json(ConnListResponse {
        shard: None,
        conns: conns.iter().map(ConnInfo::from).collect(),
    }))
}

/// Forwards the request below `/route` to the master of its shard.
pub async fn handle_route(Extension(state): Extension<AppState>, request: Request) -> Response {
    let result = async {
        let request = strip_prefix(request, ROUTE_PREFIX)?;
        state.forwarder.route(request).await
    }
    .await;

    match result {
        Ok(response) => {
            let mut headers = HeaderMap::new();
            if let Some(content_type) = response.headers.get(axum::http::header::CONTENT_TYPE) {
                headers.insert(axum::http::header::CONTENT_TYPE, content_type.clone());
            }
            stream_response(response.status, headers, response.body)
        }
        Err(e) => e.into_response(),
    }
}

pub async fn handle_multicast_one(
    Extension(state): Extension<AppState>,
    request: Request,
) -> Response {
    multicast(state, request, MULTICAST_ONE_PREFIX, ReturnMode::One).await
}

pub async fn handle_multicast_all(
    Extension(state): Extension<AppState>,
    request: Request,
) -> Response {
    multicast(state, request, MULTICAST_ALL_PREFIX, ReturnMode::All).await
}

async fn multicast(state: AppState, request: Request, prefix: &str, mode: ReturnMode) -> Response {
    let result = async {
        let request = strip_prefix(request, prefix)?;
        state
            .multicaster
            .multicast_merged(request, &state.endpoints_key, mode)
            .await
    }
    .await;

    match result {
        Ok(merged) => stream_response(StatusCode::OK, merged.headers, merged.body),
        Err(e) => e.into_response(),
    }
}

/// Streams `body` back to the client. Once the status line is out, a failing body
/// can only be logged and cut short.
fn stream_response(status: StatusCode, headers: HeaderMap, body: ByteStream) -> Response {
    let body = body.inspect_err(|e| tracing::error!(error = %e, "Response body failed mid-stream"));

    let mut response = Response::new(Body::from_stream(body));
    *response.status_mut() = status;
    *response.headers_mut() = headers;
    response
}

/// Rewrites the request URI so the path seen downstream no longer carries `prefix`.
pub fn strip_prefix(request: Request, prefix: &str) -> Result<Request> {
    let (mut parts, body) = request.into_parts();

    let path_and_query = parts
        .uri
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or("/");
    let rest = path_and_query
        .strip_prefix(prefix)
        .unwrap_or(path_and_query);
    let rest = if rest.starts_with('/') {
        rest.to_string()
    } else {
        format!("/{}", rest)
    };

    parts.uri = rest
        .parse::<Uri>()
        .map_err(|e| RouteError::InvalidUri(e.to_string()))?;
    Ok(Request::from_parts(parts, body))
}
