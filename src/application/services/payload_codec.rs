//! Encoding of thumbnail bytes into compact storable payloads.
//!
//! A payload is a `data:<mime>;base64,<body>` URI. With compression enabled,
//! two known substrings are swapped for three-character sentinels, and when
//! payloads go to files the text is additionally raw-deflated.
//!
//! The JPEG header sentinel only ever replaces the start of the URI. The
//! dictionary prefix is substituted wherever it occurs in the base64 body, and
//! never in the MIME type. Base64 never contains `#`, so decoding restores
//! every occurrence exactly, whatever characters the MIME type holds.

use std::io::{Read, Write};

use base64::{Engine as _, engine::general_purpose};
use flate2::Compression;
use flate2::read::DeflateDecoder;
use flate2::write::DeflateEncoder;

use crate::domain::entities::{GenerationSettings, StoredPayload};
use crate::domain::errors::CodecError;

/// Literal start of every baseline JPEG data URI.
pub const JPEG_DATA_URI_HEADER: &str = "data:image/jpeg;base64,/9j/";

const JPEG_HEADER_SENTINEL: &str = "#d#";
const PREFIX_SENTINEL: &str = "#j#";
const BASE64_MARKER: &str = ";base64,";

/// Image bytes recovered from a payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedImage {
    /// MIME type from the data URI.
    pub mime: String,
    /// Raw image bytes.
    pub bytes: Vec<u8>,
}

/// Two-way payload encoder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PayloadCodec {
    substitute: bool,
    deflate: bool,
    dictionary_prefix: String,
}

impl PayloadCodec {
    /// Creates a codec for the given settings, with no dictionary prefix.
    #[must_use]
    pub fn new(settings: &GenerationSettings) -> Self {
        Self {
            substitute: settings.compress,
            deflate: settings.deflates(),
            dictionary_prefix: String::new(),
        }
    }

    /// Sets the shared dictionary prefix.
    #[must_use]
    pub fn with_dictionary_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.dictionary_prefix = prefix.into();
        self
    }

    /// Returns the shared dictionary prefix, empty if none.
    #[must_use]
    pub fn dictionary_prefix(&self) -> &str {
        &self.dictionary_prefix
    }

    /// Returns true if encoded payloads are deflated binaries.
    #[must_use]
    pub const fn deflates(&self) -> bool {
        self.deflate
    }

    /// Builds the plain data URI for `bytes`.
    #[must_use]
    pub fn to_data_uri(bytes: &[u8], mime: &str) -> String {
        format!(
            "data:{mime}{BASE64_MARKER}{}",
            general_purpose::STANDARD.encode(bytes)
        )
    }

    /// Splits a data URI into MIME type and decoded bytes.
    ///
    /// # Errors
    /// Returns error if the URI is not a base64 data URI.
    pub fn parse_data_uri(uri: &str) -> Result<DecodedImage, CodecError> {
        let rest = uri
            .strip_prefix("data:")
            .ok_or_else(|| CodecError::malformed("missing data: scheme"))?;
        let (mime, body) = rest
            .split_once(BASE64_MARKER)
            .ok_or_else(|| CodecError::malformed("missing ;base64, marker"))?;
        let bytes = general_purpose::STANDARD.decode(body)?;
        Ok(DecodedImage {
            mime: mime.to_string(),
            bytes,
        })
    }

    /// Replaces `from` with `to` in the base64 body of `text`, leaving the
    /// head (header sentinel or `data:<mime>;base64,`) untouched.
    fn replace_in_body(text: &str, from: &str, to: &str) -> String {
        let (head, body) = match text.strip_prefix(JPEG_HEADER_SENTINEL) {
            Some(body) => (JPEG_HEADER_SENTINEL, body),
            None => match text.find(BASE64_MARKER) {
                Some(at) => text.split_at(at + BASE64_MARKER.len()),
                None => return text.to_string(),
            },
        };
        format!("{head}{}", body.replace(from, to))
    }

    /// Turns a data URI into its stored form.
    ///
    /// # Errors
    /// Returns error if deflating fails.
    pub fn compact(&self, data_uri: &str) -> Result<StoredPayload, CodecError> {
        if !self.substitute {
            return Ok(StoredPayload::Text(data_uri.to_string()));
        }

        let mut text = match data_uri.strip_prefix(JPEG_DATA_URI_HEADER) {
            Some(rest) => format!("{JPEG_HEADER_SENTINEL}{rest}"),
            None => data_uri.to_string(),
        };
        if !self.dictionary_prefix.is_empty() {
            text = Self::replace_in_body(&text, &self.dictionary_prefix, PREFIX_SENTINEL);
        }

        if !self.deflate {
            return Ok(StoredPayload::Text(text));
        }

        let mut encoder = DeflateEncoder::new(Vec::new(), Compression::default());
        encoder
            .write_all(text.as_bytes())
            .map_err(CodecError::Deflate)?;
        let bytes = encoder.finish().map_err(CodecError::Deflate)?;
        Ok(StoredPayload::Binary(bytes))
    }

    /// Encodes raw image bytes into a stored payload.
    ///
    /// # Errors
    /// Returns error if deflating fails.
    pub fn encode(&self, bytes: &[u8], mime: &str) -> Result<StoredPayload, CodecError> {
        self.compact(&Self::to_data_uri(bytes, mime))
    }

    /// Restores the data URI from a stored payload.
    ///
    /// # Errors
    /// Returns error if the payload cannot be inflated or is not UTF-8.
    pub fn expand(&self, stored: &StoredPayload) -> Result<String, CodecError> {
        let text = match stored {
            StoredPayload::Text(text) => text.clone(),
            StoredPayload::Binary(bytes) if self.deflate => {
                let mut text = String::new();
                DeflateDecoder::new(bytes.as_slice())
                    .read_to_string(&mut text)
                    .map_err(CodecError::Inflate)?;
                text
            }
            StoredPayload::Binary(bytes) => {
                String::from_utf8(bytes.clone()).map_err(|_| CodecError::NotUtf8)?
            }
        };

        if !self.substitute {
            return Ok(text);
        }

        let text = if self.dictionary_prefix.is_empty() {
            text
        } else {
            Self::replace_in_body(&text, PREFIX_SENTINEL, &self.dictionary_prefix)
        };
        Ok(match text.strip_prefix(JPEG_HEADER_SENTINEL) {
            Some(rest) => format!("{JPEG_DATA_URI_HEADER}{rest}"),
            None => text,
        })
    }

    /// Decodes a stored payload back into image bytes.
    ///
    /// # Errors
    /// Returns error if the payload is corrupt.
    pub fn decode(&self, stored: &StoredPayload) -> Result<DecodedImage, CodecError> {
        Self::parse_data_uri(&self.expand(stored)?)
    }
}
