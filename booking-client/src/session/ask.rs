//! Free-text questions about providers, and provider profiles.

use crate::api::ApiRequest;
use crate::domain::{AnsweredExcerpt, ProviderProfile};

use super::error::ClientError;
use super::outbox::Outbox;

pub const NOTHING_FOUND_HINT: &str = "No relevant information found. Try asking about specific bus providers like Hanif, Green Line, or Shyamoli.";

/// The answer panel. Waiting is shown here rather than on the global
/// loading indicator.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum AnswerPanel {
    #[default]
    Empty,
    Thinking,
    Answers(Vec<AnsweredExcerpt>),
    NothingFound,
    Failed,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum ProfilePanel {
    #[default]
    Empty,
    Loading(String),
    Loaded(ProviderProfile),
    Failed,
}

#[derive(Debug, Default)]
pub struct AskController {
    answers: AnswerPanel,
    profile: ProfilePanel,
}

impl AskController {
    pub(crate) fn ask(&mut self, question: &str, out: &mut Outbox) -> Result<(), ClientError> {
        let question = question.trim();
        if question.is_empty() {
            return Err(ClientError::validation("Please enter a question"));
        }
        tracing::info!(%question, "asking");
        self.answers = AnswerPanel::Thinking;
        out.request(ApiRequest::Ask(question.to_string()));
        Ok(())
    }

    pub(crate) fn answered(
        &mut self,
        result: Result<Vec<AnsweredExcerpt>, ClientError>,
        out: &mut Outbox,
    ) {
        self.answers = match result {
            Ok(excerpts) if excerpts.is_empty() => AnswerPanel::NothingFound,
            Ok(excerpts) => AnswerPanel::Answers(excerpts),
            Err(e) => {
                tracing::warn!(error = %e, "question failed");
                out.error("Failed to get answer");
                AnswerPanel::Failed
            }
        };
    }

    pub(crate) fn load_profile(&mut self, name: &str, out: &mut Outbox) -> Result<(), ClientError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ClientError::validation("Please choose a bus provider"));
        }
        self.profile = ProfilePanel::Loading(name.to_string());
        out.request(ApiRequest::ProviderDetails(name.to_string()));
        Ok(())
    }

    pub(crate) fn profile_loaded(
        &mut self,
        name: &str,
        result: Result<ProviderProfile, ClientError>,
        out: &mut Outbox,
    ) {
        self.profile = match result {
            Ok(profile) => ProfilePanel::Loaded(profile),
            Err(e) => {
                tracing::warn!(provider = %name, error = %e, "provider lookup failed");
                out.error(e.user_message("Failed to load provider details"));
                ProfilePanel::Failed
            }
        };
    }

    pub fn answers(&self) -> &AnswerPanel {
        &self.answers
    }

    pub fn profile(&self) -> &ProfilePanel {
        &self.profile
    }
}
