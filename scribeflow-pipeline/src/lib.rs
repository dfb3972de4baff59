//! # ScribeFlow Generation Pipeline
//!
//! The multi-stage content-to-article pipeline: stage collaborators for
//! extraction, analysis, generation, imagery, and SEO scoring, plus the
//! orchestrator that sequences them with per-stage failure classification.
//!
//! ## Modules
//!
//! - `stages`: stage collaborator traits, production implementations, mocks
//! - `orchestrator`: sequencing, Fatal/Degradable policy, persistence
//! - `types`: request/outcome types shared with the API layer
//! - `error`: the fatal failure taxonomy
//!
//! ## Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use scribeflow_pipeline::orchestrator::PipelineOrchestrator;
//! use scribeflow_pipeline::stages::mock::{MockExtractor, MockGenerator, MockImageFetcher};
//! use scribeflow_pipeline::types::PipelineRequest;
//! use scribeflow_shared::store::memory::MemoryStore;
//! use uuid::Uuid;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = Arc::new(MemoryStore::new());
//! let orchestrator = PipelineOrchestrator::new(
//!     Arc::new(MockExtractor::new()),
//!     Arc::new(MockGenerator::new()),
//!     Arc::new(MockImageFetcher::new()),
//!     store.clone(),
//!     store,
//! );
//!
//! let outcome = orchestrator
//!     .run(
//!         Uuid::new_v4(),
//!         &PipelineRequest {
//!             url: "https://example.com".to_string(),
//!             tone: "informative".to_string(),
//!             word_count: 800,
//!         },
//!     )
//!     .await?;
//! println!("Generated {} words", outcome.word_count);
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod orchestrator;
pub mod stages;
pub mod types;
