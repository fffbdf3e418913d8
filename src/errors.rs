use astra::Response;
use thiserror::Error;

/// Errors originating from the server logic (routing, bad input,
/// rendering) as opposed to the scraping pipeline, which degrades to
/// "no data" instead of failing a request.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Not Found")]
    NotFound,

    #[error("Bad Request: {0}")]
    BadRequest(String),

    #[error("Spreadsheet Error: {0}")]
    XlsxError(String),

    #[error("Internal Server Error")]
    InternalError,
}

/// What every route handler returns.
pub type ResultResp = Result<Response, ServerError>;
