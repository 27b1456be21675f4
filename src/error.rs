// error.rs - Crate error type
//
// Nothing in the effect is fatal. These cover invalid image data handed in
// by a host and the web host failing to find what it needs on the page.

use std::fmt::{self, Display};

use wasm_bindgen::JsValue;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Pixel buffer length does not match width * height * 4
    AssetSize { width: u32, height: u32, len: usize },
    /// Image has a zero dimension
    EmptyAsset,
    /// No element with this id on the page
    MissingElement(String),
    /// Canvas with this id has no 2D context
    NoContext(String),
    /// Any other browser call that failed while mounting
    Browser(String),
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::AssetSize { width, height, len } => write!(
                f,
                "image data is {len} bytes, expected {} for {width}x{height}",
                *width as usize * *height as usize * 4
            ),
            Error::EmptyAsset => write!(f, "image has a zero dimension"),
            Error::MissingElement(id) => write!(f, "no element with id '{id}'"),
            Error::NoContext(id) => write!(f, "canvas '{id}' has no 2d context"),
            Error::Browser(msg) => write!(f, "browser error: {msg}"),
        }
    }
}

impl std::error::Error for Error {}

impl From<Error> for JsValue {
    fn from(e: Error) -> Self {
        JsValue::from_str(&e.to_string())
    }
}
