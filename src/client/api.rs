//! Typed async client for the dashboard backend
//!
//! Every endpoint the pages call lives here. Failures come back as
//! [`DashboardError`] with the endpoint attached; a non-2xx answer carrying
//! `{ "error": ... }` keeps that text so it can be shown inline.

use crate::chat::message::Message;
use crate::client::mjpeg::{Frame, MjpegDecoder};
use crate::client::types::{
    CountDelta, CreateSessionRequest, DeltaMetric, ErrorBody, MessagesResponse,
    PostMessageRequest, PostMessageResponse, SessionCreated, TrendRange, TrendResponse,
};
use crate::config::ApiConfig;
use crate::core::error::{DashboardError, Result, ValidationError};
use crate::entities::Camera;
use futures::stream::{BoxStream, Stream, StreamExt};
use reqwest::{Client, RequestBuilder, Response, StatusCode, Url, header};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::collections::VecDeque;
use std::time::Duration;

/// Backend REST client
///
/// Cheap to clone; clones share the connection pool. JSON calls are bounded
/// by the configured timeout as a whole. Camera streams are not: they only
/// fail when the backend goes quiet for longer than that timeout.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base: Url,
    base_url: String,
    timeout: Duration,
}

impl ApiClient {
    /// Build a client from configuration
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let base_url = config.base_url.trim().trim_end_matches('/').to_string();
        let base = Url::parse(&base_url)
            .map_err(|e| DashboardError::Config(format!("Invalid backend URL '{}': {}", base_url, e)))?;
        if base.cannot_be_a_base() {
            return Err(DashboardError::Config(format!(
                "Backend URL '{}' cannot carry a path",
                base_url
            )));
        }

        let timeout = Duration::from_secs(config.timeout_secs);
        let http = Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .read_timeout(timeout)
            .build()
            .map_err(|e| DashboardError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base,
            base_url,
            timeout,
        })
    }

    /// Client for `base_url` with default timeouts
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self> {
        Self::new(&ApiConfig {
            base_url: base_url.into(),
            ..ApiConfig::default()
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Backend URL for `segments`, each one percent-encoded
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        // checked in `new`: the base always accepts path segments
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    // === Cameras ===

    /// `GET /cam/list/cameras`
    pub async fn list_cameras(&self) -> Result<Vec<Camera>> {
        self.get_json(self.endpoint(&["cam", "list", "cameras"])).await
    }

    /// Address of a camera's MJPEG stream, for shells that render it directly
    pub fn stream_url(&self, camera_id: &str) -> String {
        self.endpoint(&["cam", "stream", camera_id]).into()
    }

    /// `POST /cam/activate/{id}`
    pub async fn activate_camera(&self, camera_id: &str) -> Result<()> {
        let url = self.endpoint(&["cam", "activate", camera_id]);
        tracing::info!(camera_id = %camera_id, "Activating camera");

        let request = self.http.post(url.clone()).timeout(self.timeout);
        let response = self.send(request, &url).await?;
        Self::check(response, &url).await?;
        Ok(())
    }

    /// `GET /cam/stream/{id}` decoded into frames
    ///
    /// The returned stream ends when the backend closes the body. A transport
    /// or framing failure is yielded once as [`DashboardError::Stream`] and
    /// ends the stream.
    pub async fn open_stream(&self, camera_id: &str) -> Result<BoxStream<'static, Result<Frame>>> {
        let url = self.endpoint(&["cam", "stream", camera_id]);
        // no total timeout: the body is endless while the camera is live
        let response = self.send(self.http.get(url.clone()), &url).await?;
        let response = Self::check(response, &url).await?;

        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        let decoder = MjpegDecoder::from_content_type(&content_type)
            .map_err(|e| stream_error(camera_id, e))?;

        tracing::debug!(camera_id = %camera_id, content_type = %content_type, "Opened camera stream");

        let state = FrameStream {
            body: Box::pin(response.bytes_stream()),
            decoder,
            pending: VecDeque::new(),
            camera_id: camera_id.to_string(),
            finished: false,
        };

        Ok(futures::stream::unfold(state, FrameStream::next_frame).boxed())
    }

    // === Analytics ===

    /// `GET /analytics/{metric}`
    pub async fn count_delta(&self, metric: DeltaMetric) -> Result<CountDelta> {
        self.get_json(self.endpoint(&["analytics", metric.path()])).await
    }

    /// `GET /analytics/trend?range=...`
    pub async fn trend(&self, range: TrendRange) -> Result<TrendResponse> {
        let mut url = self.endpoint(&["analytics", "trend"]);
        url.query_pairs_mut().append_pair("range", range.as_str());
        self.get_json(url).await
    }

    // === Chat ===

    /// `POST /chat/sessions`, returning the new session ID
    pub async fn create_session(&self, initial_message: Option<&str>) -> Result<String> {
        let body = CreateSessionRequest {
            message: initial_message.map(str::trim).filter(|m| !m.is_empty()),
        };
        let created: SessionCreated = self
            .post_json(self.endpoint(&["chat", "sessions"]), &body)
            .await?;

        tracing::info!(session_id = %created.session_id, "Created chat session");
        Ok(created.session_id)
    }

    /// `GET /chat/sessions/{id}/messages`
    pub async fn session_messages(&self, session_id: &str) -> Result<Vec<Message>> {
        let response: MessagesResponse = self
            .get_json(self.endpoint(&["chat", "sessions", session_id, "messages"]))
            .await?;
        Ok(response.messages)
    }

    /// `POST /chat/sessions/{id}/messages`, returning the AI reply
    pub async fn post_message(&self, session_id: &str, content: &str) -> Result<Message> {
        if content.trim().is_empty() {
            return Err(ValidationError::required("content").into());
        }

        let response: PostMessageResponse = self
            .post_json(
                self.endpoint(&["chat", "sessions", session_id, "messages"]),
                &PostMessageRequest { content },
            )
            .await?;
        Ok(response.ai_response)
    }

    // === Plumbing ===

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        let request = self.http.get(url.clone()).timeout(self.timeout);
        let response = self.send(request, &url).await?;
        Self::decode(Self::check(response, &url).await?, &url).await
    }

    async fn post_json<B, T>(&self, url: Url, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self.http.post(url.clone()).timeout(self.timeout).json(body);
        let response = self.send(request, &url).await?;
        Self::decode(Self::check(response, &url).await?, &url).await
    }

    async fn send(&self, request: RequestBuilder, url: &Url) -> Result<Response> {
        let path = url.path();
        tracing::debug!(endpoint = %path, "Calling backend");

        request.send().await.map_err(|e| {
            tracing::warn!(endpoint = %path, error = %e, "Backend unreachable");
            DashboardError::Network {
                endpoint: path.to_string(),
                message: e.to_string(),
            }
        })
    }

    async fn check(response: Response, url: &Url) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let path = url.path();
        let text = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&text)
            .map(|body| body.error)
            .unwrap_or_else(|_| fallback_message(status));

        tracing::warn!(endpoint = %path, status = status.as_u16(), error = %message, "Backend returned an error");

        Err(DashboardError::Status {
            endpoint: path.to_string(),
            status: status.as_u16(),
            message,
        })
    }

    async fn decode<T: DeserializeOwned>(response: Response, url: &Url) -> Result<T> {
        response.json::<T>().await.map_err(|e| {
            tracing::warn!(endpoint = %url.path(), error = %e, "Unexpected response body");
            DashboardError::Decode {
                endpoint: url.path().to_string(),
                message: e.to_string(),
            }
        })
    }
}

fn fallback_message(status: StatusCode) -> String {
    status
        .canonical_reason()
        .map(str::to_string)
        .unwrap_or_else(|| format!("HTTP {}", status.as_u16()))
}

fn stream_error(camera_id: &str, error: impl std::fmt::Display) -> DashboardError {
    DashboardError::Stream {
        camera_id: camera_id.to_string(),
        message: error.to_string(),
    }
}

/// Unfold state turning a byte stream into frames
struct FrameStream<S> {
    body: S,
    decoder: MjpegDecoder,
    pending: VecDeque<Frame>,
    camera_id: String,
    finished: bool,
}

impl<S, B> FrameStream<S>
where
    S: Stream<Item = reqwest::Result<B>> + Unpin,
    B: AsRef<[u8]>,
{
    async fn next_frame(mut self) -> Option<(Result<Frame>, Self)> {
        loop {
            if let Some(frame) = self.pending.pop_front() {
                return Some((Ok(frame), self));
            }
            if self.finished {
                return None;
            }

            match self.body.next().await {
                Some(Ok(chunk)) => match self.decoder.feed(chunk.as_ref()) {
                    Ok(frames) => self.pending.extend(frames),
                    Err(e) => return Some((Err(self.fail(e)), self)),
                },
                Some(Err(e)) => return Some((Err(self.fail(e)), self)),
                None => {
                    self.finished = true;
                    self.pending.extend(self.decoder.finish());
                    tracing::debug!(camera_id = %self.camera_id, "Camera stream ended");
                }
            }
        }
    }

    fn fail(&mut self, error: impl std::fmt::Display) -> DashboardError {
        self.finished = true;
        self.pending.clear();
        tracing::warn!(camera_id = %self.camera_id, error = %error, "Camera stream failed");
        stream_error(&self.camera_id, error)
    }
}
