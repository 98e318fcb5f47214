//! Puzzle definition codec and normalisation
//!
//! A puzzle definition is stored as base64 of gzip-compressed JSON text. Two
//! definitions describe the same puzzle when their documents agree after the
//! author and the randomized input counts have been removed.

use std::io::{Read, Write};

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use serde_json::{Map, Value};
use thiserror::Error;

const AUTHOR_FIELD: &str = "author";
const COUNT_FIELD: &str = "count";
const OUTPUT_ZONES_FIELD: &str = "output-zones";

#[derive(Error, Debug)]
pub enum DefinitionError {
    #[error("Encode+decode of puzzle definition did not return the original definition")]
    RoundTrip,
    #[error("Invalid base64 in puzzle definition: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("Failed to (de)compress puzzle definition: {0}")]
    Compression(#[from] std::io::Error),
    #[error("Puzzle definition is not valid UTF-8 text")]
    NotText,
    #[error("Puzzle definition is not a JSON object: {0}")]
    Malformed(String),
    #[error("Puzzle definition has no '{field}' field: {text}")]
    MissingField { field: &'static str, text: String },
}

/// Decode a base64 definition into its JSON text.
pub fn decode(encoded: &str) -> Result<String, DefinitionError> {
    let compressed = STANDARD.decode(encoded.trim())?;
    let mut decoder = GzDecoder::new(compressed.as_slice());
    let mut text = Vec::new();
    decoder.read_to_end(&mut text)?;
    String::from_utf8(text).map_err(|_| DefinitionError::NotText)
}

/// Encode JSON text into a base64 definition.
///
/// The result is decoded again before it is returned; a mismatch means the
/// codec is broken and nothing built from the output can be trusted.
pub fn encode(text: &str) -> Result<String, DefinitionError> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(text.as_bytes())?;
    let encoded = STANDARD.encode(encoder.finish()?);

    if decode(&encoded)? != text {
        return Err(DefinitionError::RoundTrip);
    }
    Ok(encoded)
}

/// Whether two encoded definitions describe the same puzzle.
///
/// Different authors are ignored (export replaces the puzzle author with the
/// solver) and so are differing random input ratios.
pub fn definitions_match(a: &str, b: &str) -> Result<bool, DefinitionError> {
    Ok(PuzzleDocument::identity_of(a)? == PuzzleDocument::identity_of(b)?)
}

/// Decode a definition, set its author and encode it again.
pub fn replace_author(encoded: &str, author: &str) -> Result<String, DefinitionError> {
    let document = PuzzleDocument::parse(&decode(encoded)?)?.with_author(author)?;
    encode(&document.to_text())
}

/// Typed view of a decoded puzzle definition.
///
/// Field order is preserved so that re-serialising an untouched document
/// keeps the game's layout.
#[derive(Debug, Clone, PartialEq)]
pub struct PuzzleDocument {
    fields: Map<String, Value>,
}

impl PuzzleDocument {
    pub fn parse(text: &str) -> Result<Self, DefinitionError> {
        match serde_json::from_str::<Value>(text) {
            Ok(Value::Object(fields)) => Ok(Self { fields }),
            Ok(other) => Err(DefinitionError::Malformed(format!(
                "expected an object, found {}",
                other
            ))),
            Err(e) => Err(DefinitionError::Malformed(e.to_string())),
        }
    }

    /// Normalised document of an encoded definition, for repeated
    /// comparisons against one puzzle.
    pub fn identity_of(encoded: &str) -> Result<Self, DefinitionError> {
        Self::parse(&decode(encoded)?)?.normalized()
    }

    pub fn to_text(&self) -> String {
        Value::Object(self.fields.clone()).to_string()
    }

    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    pub fn author(&self) -> Option<&str> {
        self.fields.get(AUTHOR_FIELD).and_then(Value::as_str)
    }

    pub fn with_author(mut self, author: &str) -> Result<Self, DefinitionError> {
        if !self.fields.contains_key(AUTHOR_FIELD) {
            return Err(self.missing(AUTHOR_FIELD));
        }
        self.fields
            .insert(AUTHOR_FIELD.to_string(), Value::String(author.to_string()));
        Ok(self)
    }

    /// Remove the author. A definition without exactly one author is not a
    /// game definition, so absence is an error.
    pub fn strip_author(mut self) -> Result<Self, DefinitionError> {
        if self.fields.shift_remove(AUTHOR_FIELD).is_none() {
            return Err(self.missing(AUTHOR_FIELD));
        }
        Ok(self)
    }

    /// Remove every `count` field from the entries laid out before the output
    /// zones. Those counts are the randomized input quantities.
    ///
    /// A document without output zones is returned untouched.
    pub fn strip_input_counts(mut self) -> Self {
        let Some(end) = self.fields.keys().position(|k| k == OUTPUT_ZONES_FIELD) else {
            return self;
        };
        for (_, value) in self.fields.iter_mut().take(end) {
            remove_counts(value);
        }
        self
    }

    /// Identity of the puzzle: no author, no input counts.
    pub fn normalized(self) -> Result<Self, DefinitionError> {
        self.strip_input_counts().strip_author()
    }

    fn missing(&self, field: &'static str) -> DefinitionError {
        DefinitionError::MissingField {
            field,
            text: self.to_text(),
        }
    }
}

fn remove_counts(value: &mut Value) {
    match value {
        Value::Object(map) => {
            map.shift_remove(COUNT_FIELD);
            map.values_mut().for_each(remove_counts);
        }
        Value::Array(items) => items.iter_mut().for_each(remove_counts),
        _ => {}
    }
}
