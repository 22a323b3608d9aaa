use wasm_bindgen::JsValue;

/// Error returned by viewer construction and option decoding.
#[derive(Debug, thiserror::Error)]
pub enum ViewerError {
    /// No element with the given id exists in the document.
    #[error("canvas element not found: {0}")]
    CanvasNotFound(String),
    /// The element with the given id is not a `<canvas>`.
    #[error("element is not a canvas: {0}")]
    NotACanvas(String),
    /// The canvas refused to hand out a 2D context.
    #[error("2d rendering context unavailable")]
    ContextUnavailable,
    /// Not running inside a browser window.
    #[error("no browser window available")]
    NoWindow,
    /// An edit mode was requested without the callback that reports its edits.
    #[error("mode {mode} requires the {callback} callback")]
    MissingCallback { mode: &'static str, callback: &'static str },
    /// The options string is not valid JSON.
    #[error("invalid options: {0}")]
    InvalidOptions(#[source] serde_json::Error),
    /// Polygon or annotation records don't match the record schema.
    #[error("invalid polygon records: {0}")]
    InvalidRecords(#[source] serde_json::Error),
    /// A browser API call failed.
    #[error("javascript error: {0}")]
    Js(String),
}

impl ViewerError {
    /// Wrap a thrown JS value.
    #[must_use]
    pub fn from_js(value: &JsValue) -> Self {
        Self::Js(value.as_string().unwrap_or_else(|| format!("{value:?}")))
    }
}

impl From<ViewerError> for JsValue {
    fn from(err: ViewerError) -> Self {
        js_sys::Error::new(&err.to_string()).into()
    }
}
