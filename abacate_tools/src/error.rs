use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum AbacateApiError {
    #[error("Could not initialize the AbacatePay client. {0}")]
    Initialization(String),
    #[error("Error sending request to AbacatePay. {0}")]
    RequestError(String),
    #[error("AbacatePay returned an error. status: {status}, message: {message}")]
    QueryError { status: u16, message: String },
    #[error("AbacatePay rejected the request. {0}")]
    GatewayError(String),
    #[error("Could not deserialize AbacatePay response. {0}")]
    JsonError(String),
    #[error("AbacatePay returned an empty response")]
    EmptyResponse,
}
