use serde::Serialize;

/// Uniform response wrapper: `{"success": ..., "message": ..., "data": ...}`.
///
/// Error responses render the same shape with `success: false` and null data;
/// that side lives with the error type.
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    pub success: bool,
    pub message: &'static str,
    pub data: Option<T>,
}

impl<T> Envelope<T> {
    pub fn ok(message: &'static str, data: T) -> Self {
        Self { success: true, message, data: Some(data) }
    }
}

impl Envelope<()> {
    pub fn message_only(message: &'static str) -> Self {
        Self { success: true, message, data: None }
    }
}
