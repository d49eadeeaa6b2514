//! vision_tester: client for local multimodal inference servers
//!
//! This library provides:
//! - Model discovery with a vision-capability heuristic
//! - Single-shot, non-streaming image + prompt generation
//! - Image normalization and base64 JPEG encoding
//! - Fixed color, shape and general vision test prompts
//! - Result rendering, report saving and synthetic test images
//!
//! # Example
//!
//! ```no_run
//! use vision_tester::{
//!     ImagePayload, InferenceClient, PromptStyle, ServerEndpoint, VisionTest, TIMING_CONFIG,
//! };
//!
//! #[tokio::main]
//! async fn main() {
//!     let endpoint = ServerEndpoint::default();
//!     let client = InferenceClient::new();
//!
//!     let report = client.check_connection(&endpoint).await.unwrap();
//!     for model in report.vision_models() {
//!         println!("vision model: {}", model.name);
//!     }
//!
//!     let image = ImagePayload::open("photo.png").unwrap();
//!     let prompt = VisionTest::Color.prompt(PromptStyle::Brief);
//!     match client
//!         .generate(&endpoint, "llava", prompt, &image, TIMING_CONFIG.generate_timeout)
//!         .await
//!     {
//!         Ok(text) => println!("{}", text),
//!         Err(e) => println!("{}", e.user_message()),
//!     }
//! }
//! ```

// Core modules
pub mod error;

// Configuration module
pub mod config;

// Core functionality
pub mod endpoint;
pub mod model;
pub mod payload;
pub mod worker;

// Presentation helpers
pub mod report;
pub mod report_saver;
pub mod test_images;

// Re-export commonly used types and functions
pub use error::{ClientError, EncodeError, EndpointError, ReportError, Result};

// Config re-exports
pub use config::{
    PromptStyle, TimingConfig, VisionTest, DEFAULT_GENERATE_TIMEOUT, DEFAULT_LIST_TIMEOUT,
    TIMING_CONFIG,
};

pub use endpoint::{ServerEndpoint, DEFAULT_ENDPOINT};

// Model re-exports
pub use model::{
    ConnectionReport, InferenceClient, KeywordPredicate, ModelDescriptor, VisionPredicate,
    NO_RESPONSE_PLACEHOLDER, VISION_KEYWORDS,
};

pub use payload::{encode_image, ImageInfo, ImagePayload};
pub use worker::{spawn_generate, spawn_list_models, PendingCall};

pub use report::TestReport;
pub use report_saver::ReportSaver;
pub use test_images::{write_test_images, TestImageKind};
