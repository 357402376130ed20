use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    /// Transport failure: the request never produced a response. The
    /// operation is left retryable; no automatic retry is attempted.
    #[error("network error: {0}")]
    Network(String),

    /// The order service answered with a non-OK status.
    #[error("order service returned {status}: {message}")]
    Status { status: u16, message: String },

    /// The response body was not the expected shape.
    #[error("could not decode response: {0}")]
    Decode(String),
}

impl ClientError {
    /// A server-side business-rule rejection (4xx), e.g. deleting an order
    /// that is no longer pending. Surfaced to the user as-is; 5xx and
    /// transport failures are infrastructure trouble instead.
    pub fn is_business_rule(&self) -> bool {
        matches!(self, ClientError::Status { status, .. } if (400..500).contains(status))
    }
}
