//! Endpoint-test simulation. No request leaves the process; the reported
//! latency comes from a pluggable random source and is not reproducible
//! unless the caller installs a deterministic one.

use std::ops::Range;
use std::sync::atomic::{AtomicUsize, Ordering};

use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Simulated latency window in milliseconds, end exclusive.
pub const RESPONSE_TIME_MS: Range<u32> = 100..600;

pub trait RandomSource: Send + Sync {
    /// A value in `range`; `range` is never empty.
    fn next_in_range(&self, range: Range<u32>) -> u32;
}

/// Thread-local `rand` generator.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
    fn next_in_range(&self, range: Range<u32>) -> u32 {
        rand::thread_rng().gen_range(range)
    }
}

/// Replays a fixed sequence, cycling, each value clamped into the range.
#[derive(Debug)]
pub struct SequenceRandom {
    values: Vec<u32>,
    cursor: AtomicUsize,
}

impl SequenceRandom {
    pub fn new(values: Vec<u32>) -> Self {
        Self { values, cursor: AtomicUsize::new(0) }
    }

    pub fn fixed(value: u32) -> Self {
        Self::new(vec![value])
    }
}

impl RandomSource for SequenceRandom {
    fn next_in_range(&self, range: Range<u32>) -> u32 {
        if self.values.is_empty() {
            return range.start;
        }
        let i = self.cursor.fetch_add(1, Ordering::Relaxed) % self.values.len();
        self.values[i].clamp(range.start, range.end.saturating_sub(1).max(range.start))
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EndpointTestRequest {
    pub method: Option<String>,
    pub url: Option<String>,
    pub headers: Option<Value>,
    pub body: Option<Value>,
}

impl EndpointTestRequest {
    pub fn method_or_default(&self) -> &str {
        self.method.as_deref().unwrap_or("GET")
    }

    pub fn url_or_default(&self) -> &str {
        self.url.as_deref().unwrap_or("/")
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EndpointTestResult {
    pub status: u16,
    pub response_time: u32,
    pub response: Value,
}

pub fn simulate_endpoint_test(
    _request: &EndpointTestRequest,
    rng: &dyn RandomSource,
) -> EndpointTestResult {
    EndpointTestResult {
        status: 200,
        response_time: rng.next_in_range(RESPONSE_TIME_MS),
        response: json!({ "success": true, "message": "API test successful" }),
    }
}
