//! # rfp-agent
//!
//! The two agents behind the RFP assistant and the loop that connects them.
//!
//! - [`RetrieverAgent`] finds the chunks most similar to a query.
//! - [`EditorAgent`] turns retrieved context into improved RFP content,
//!   annotated with the [`BestPractice`]s it appears to apply.
//! - [`RfpAssistant`] sequences the two and handles accept / reject / edit
//!   feedback without keeping any session state.
//!
//! ```rust,ignore
//! let assistant = RfpAssistant::new(
//!     RetrieverAgent::new(pipeline, "rag_collection"),
//!     EditorAgent::new(llm, EditorConfig::default()),
//! );
//! let outcome = assistant.ask("Tighten the vendor responsibilities", None).await?;
//! ```

pub mod assistant;
pub mod editor;
pub mod error;
pub mod feedback;
pub mod practices;
pub mod prompt;
pub mod retriever;
pub mod suggestion;

pub use assistant::{
    AgentStep, AskOutcome, AssistantState, FeedbackOutcome, IngestSummary, IngestedDocument,
    RfpAssistant, ServiceHealth, ServiceStatus, StepStatus,
};
pub use editor::{EditMode, EditorAgent, EditorConfig};
pub use error::{AgentError, Result};
pub use feedback::{FeedbackAction, FeedbackRecord};
pub use practices::{BestPractice, extract_applied_practices};
pub use retriever::{RetrievalResult, RetrieverAgent};
pub use suggestion::{NO_CONTEXT_TEXT, Suggestion, SuggestionOrigin, SuggestionSections};
