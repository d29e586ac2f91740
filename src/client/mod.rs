//! Backend access: REST client, wire types and the MJPEG stream decoder

pub mod api;
pub mod mjpeg;
pub mod repository;
pub mod types;

pub use api::ApiClient;
pub use mjpeg::{Frame, MjpegDecoder, MjpegError};
pub use repository::CameraApiRepository;
pub use types::{CountDelta, DeltaMetric, TrendPoint, TrendRange, TrendResponse};
