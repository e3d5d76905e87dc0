//! HTTP probing
//!
//! Timeout-bounded requests against the discovered routes.

mod client;

pub use client::{HttpClient, HttpProbe, HttpResponse, ProbeOptions};
