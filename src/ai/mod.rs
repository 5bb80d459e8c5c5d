pub mod provider;
pub mod remediation;

pub use provider::{OpenAICompatibleProvider, TextGenerator};
pub use remediation::{RemediationError, RemediationRequest, RemediationService, RemediationSuggestion};
