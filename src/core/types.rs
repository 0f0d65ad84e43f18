use std::collections::BTreeMap;

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A scalar generation option value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    TextList(Vec<String>),
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        ParamValue::Bool(value)
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        ParamValue::Int(value)
    }
}

impl From<u32> for ParamValue {
    fn from(value: u32) -> Self {
        ParamValue::Int(i64::from(value))
    }
}

impl From<f64> for ParamValue {
    fn from(value: f64) -> Self {
        ParamValue::Float(value)
    }
}

impl From<f32> for ParamValue {
    fn from(value: f32) -> Self {
        ParamValue::Float(f64::from(value))
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::Text(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        ParamValue::Text(value)
    }
}

impl From<Vec<String>> for ParamValue {
    fn from(value: Vec<String>) -> Self {
        ParamValue::TextList(value)
    }
}

impl From<&ParamValue> for Value {
    fn from(value: &ParamValue) -> Self {
        match value {
            ParamValue::Bool(b) => Value::Bool(*b),
            ParamValue::Int(i) => Value::from(*i),
            // Non-finite floats have no JSON form and become null.
            ParamValue::Float(f) => Value::from(*f),
            ParamValue::Text(s) => Value::String(s.clone()),
            ParamValue::TextList(items) => {
                Value::Array(items.iter().cloned().map(Value::String).collect())
            }
        }
    }
}

/// Generation options sent alongside the prompt, e.g. `max_tokens` or `temperature`.
///
/// Keys are kept sorted so request bodies serialize deterministically.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GenerationParameters(BTreeMap<String, ParamValue>);

impl GenerationParameters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn max_tokens(self, max_tokens: u32) -> Self {
        self.with("max_tokens", max_tokens)
    }

    pub fn temperature(self, temperature: f64) -> Self {
        self.with("temperature", temperature)
    }

    pub fn top_p(self, top_p: f64) -> Self {
        self.with("top_p", top_p)
    }

    pub fn top_k(self, top_k: u32) -> Self {
        self.with("top_k", top_k)
    }

    pub fn repetition_penalty(self, penalty: f64) -> Self {
        self.with("repetition_penalty", penalty)
    }

    pub fn n(self, n: u32) -> Self {
        self.with("n", n)
    }

    pub fn stop(self, stop: impl Into<String>) -> Self {
        let stop: String = stop.into();
        self.with("stop", stop)
    }

    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.0.get(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &ParamValue)> {
        self.0.iter()
    }

    /// Returns `self` with every key from `overrides` replacing its own.
    pub fn merged_with(&self, overrides: &GenerationParameters) -> GenerationParameters {
        let mut merged = self.0.clone();
        merged.extend(overrides.0.iter().map(|(k, v)| (k.clone(), v.clone())));
        GenerationParameters(merged)
    }
}

/// One logical completion call. Built once and shared by every attempt.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub prompt: String,
    pub model: String,
    pub parameters: GenerationParameters,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Choice {
    pub text: String,
}

/// Normalized output of a completion, remote or local.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionResult {
    pub prompt: String,
    pub choices: Vec<Choice>,
}

impl CompletionResult {
    /// Text of the first choice, if any.
    pub fn first_text(&self) -> Option<&str> {
        self.choices.first().map(|choice| choice.text.as_str())
    }
}

/// An HTTP POST with a JSON body, as handed to a [`Transport`](super::Transport).
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Value,
}

/// Status and undecoded body of one HTTP exchange.
#[derive(Debug, Clone, PartialEq)]
pub struct RawResponse {
    pub status: u16,
    pub body: Bytes,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}
