pub mod errors;
pub mod html;
pub mod xlsx;

pub use errors::error_to_response;
pub use html::{html_response, html_status_response, redirect, with_session_cookie};
pub use xlsx::xlsx_response;
