pub mod canned;
pub mod client;
pub mod response;
pub mod transport;
pub mod types;

pub use canned::CannedTransport;
pub use client::{ApiClient, Timed};
pub use response::ApiResponse;
pub use transport::{ClientError, HttpTransport, Transport};
pub use types::{
    ApiErrorBody, Classification, GenerateRequest, Generation, GenerationInfo, ModelInfo,
    Prediction, Sentiment, SentimentScores, ServiceStatus, valid_confidence,
};
