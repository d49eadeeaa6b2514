//! Configuration module for vision_tester
//!
//! This module contains:
//! - `prompts`: The fixed vision test prompts
//! - `timing`: Request timeouts

mod prompts;
mod timing;

pub use prompts::{PromptStyle, VisionTest};
pub use timing::{TimingConfig, DEFAULT_GENERATE_TIMEOUT, DEFAULT_LIST_TIMEOUT, TIMING_CONFIG};
