//! Model client module for the inference server
//!
//! This module provides:
//! - `client`: `InferenceClient` for listing models and generating answers
//! - `descriptor`: `ModelDescriptor` and vision-capability detection
//! - `wire`: JSON request and response bodies

mod client;
mod descriptor;
mod wire;

pub use client::{ConnectionReport, InferenceClient};
pub use descriptor::{KeywordPredicate, ModelDescriptor, VisionPredicate, VISION_KEYWORDS};
pub use wire::{GenerateRequest, GenerateResponse, NO_RESPONSE_PLACEHOLDER};
