//! Guard-railed AI chat engine.
//!
//! Every message runs through the guardrails first; refused queries never
//! reach the model. Allowed queries are answered with recent conversation
//! history folded into the prompt and the per-type disclaimer appended.

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::guardrails::{self, QueryType};
use crate::llm::ChatGenerate;

/// System prompt defining the assistant's behavior and boundaries.
pub const SYSTEM_PROMPT: &str = "\
You are MedCompanion AI, a helpful medication information assistant.

**YOUR ROLE:**
- Provide general, factual information about medications
- Explain how medications work in simple terms
- List common side effects from official sources
- Explain general usage instructions

**STRICT RULES - YOU MUST NEVER:**
- Recommend specific dosages
- Diagnose medical conditions
- Suggest treatment plans
- Tell users to start/stop medications
- Provide personalized medical advice
- Make decisions that should be made by doctors

**ALWAYS:**
- Refer users to their doctor/pharmacist for medical decisions
- Provide general, educational information only
- Include disclaimers
- Be helpful but stay within safe boundaries

**RESPONSE STYLE:**
- Clear and concise
- Easy to understand (avoid medical jargon when possible)
- Empathetic and supportive
- Always include appropriate disclaimers

Remember: You are an information tool, not a replacement for medical professionals.";

/// Fixed in-band reply when generation fails. No retries; the user
/// re-submits manually.
pub const GENERATION_FAILURE_MESSAGE: &str =
    "I apologize, but I encountered an error. Please try again. If the problem \
     persists, contact support.";

/// How many prior exchanges are folded into the prompt.
const HISTORY_WINDOW: usize = 3;

/// One completed user/assistant exchange.
#[derive(Debug, Clone)]
pub struct ChatExchange {
    pub user: String,
    pub assistant: String,
}

/// Outcome of one chat turn.
#[derive(Debug, Clone)]
pub struct ChatOutcome {
    pub response: String,
    pub query_type: QueryType,
    /// Guardrail decision, or "error" when generation failed.
    pub guardrail_decision: &'static str,
    pub is_refused: bool,
}

/// Chat engine holding the generation backend and the running history.
pub struct ChatEngine {
    backend: Arc<dyn ChatGenerate>,
    history: Mutex<Vec<ChatExchange>>,
}

impl ChatEngine {
    pub fn new(backend: Arc<dyn ChatGenerate>) -> Self {
        Self {
            backend,
            history: Mutex::new(Vec::new()),
        }
    }

    /// Process one chat message with guardrails.
    pub async fn chat(&self, user_message: &str, include_history: bool) -> ChatOutcome {
        let (decision, _) = guardrails::check(user_message);
        let query_type = guardrails::classify_query(user_message);

        if decision.is_refusal() {
            tracing::info!(
                query_type = query_type.as_str(),
                decision = decision.as_str(),
                "chat query refused by guardrails"
            );
            return ChatOutcome {
                response: guardrails::refusal_message(query_type).to_string(),
                query_type,
                guardrail_decision: decision.as_str(),
                is_refused: true,
            };
        }

        let prompt = self.build_prompt(user_message, include_history).await;

        let backend = Arc::clone(&self.backend);
        let generated = tokio::task::spawn_blocking(move || backend.generate(&prompt)).await;

        match generated {
            Ok(Ok(text)) => {
                let response = guardrails::add_disclaimer(&text, query_type);
                self.history.lock().await.push(ChatExchange {
                    user: user_message.to_string(),
                    assistant: response.clone(),
                });
                ChatOutcome {
                    response,
                    query_type,
                    guardrail_decision: decision.as_str(),
                    is_refused: false,
                }
            }
            Ok(Err(e)) => {
                tracing::warn!(error = %e, "chat generation failed");
                self.failure_outcome(query_type)
            }
            Err(e) => {
                tracing::error!(error = %e, "chat generation task panicked");
                self.failure_outcome(query_type)
            }
        }
    }

    /// Structured overview query for a named medication. History excluded:
    /// the question stands alone.
    pub async fn medication_info(&self, medication_name: &str) -> ChatOutcome {
        let query = format!(
            "Provide a brief overview of {medication_name}: what it is, what \
             it's used for, and common side effects."
        );
        self.chat(&query, false).await
    }

    pub async fn clear_history(&self) {
        self.history.lock().await.clear();
    }

    pub async fn history_len(&self) -> usize {
        self.history.lock().await.len()
    }

    async fn build_prompt(&self, user_message: &str, include_history: bool) -> String {
        let mut prompt = format!("{SYSTEM_PROMPT}\n\n");

        if include_history {
            let history = self.history.lock().await;
            if !history.is_empty() {
                prompt.push_str("**Previous conversation:**\n");
                let skip = history.len().saturating_sub(HISTORY_WINDOW);
                for exchange in history.iter().skip(skip) {
                    prompt.push_str(&format!(
                        "User: {}\nAssistant: {}\n\n",
                        exchange.user, exchange.assistant
                    ));
                }
            }
        }

        prompt.push_str(&format!(
            "**Current question:**\nUser: {user_message}\n\nAssistant:"
        ));
        prompt
    }

    fn failure_outcome(&self, query_type: QueryType) -> ChatOutcome {
        ChatOutcome {
            response: GENERATION_FAILURE_MESSAGE.to_string(),
            query_type,
            guardrail_decision: "error",
            is_refused: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::MockGenerate;

    fn engine(response: &str) -> ChatEngine {
        ChatEngine::new(Arc::new(MockGenerate::new(response)))
    }

    #[tokio::test]
    async fn allowed_query_gets_response_with_disclaimer() {
        let engine = engine("Metformin helps control blood sugar.");
        let outcome = engine.chat("What is Metformin used for?", true).await;

        assert!(!outcome.is_refused);
        assert!(outcome.response.starts_with("Metformin helps control blood sugar."));
        assert!(outcome.response.contains("Disclaimer"));
        assert_eq!(outcome.query_type, QueryType::MedicationInfo);
        assert_eq!(outcome.guardrail_decision, "require_disclaimer");
    }

    #[tokio::test]
    async fn refused_query_never_reaches_backend() {
        // A failing backend proves the refusal path short-circuits.
        let engine = ChatEngine::new(Arc::new(MockGenerate::failing()));
        let outcome = engine.chat("Should I take 500mg or 1000mg?", true).await;

        assert!(outcome.is_refused);
        assert_eq!(outcome.guardrail_decision, "refuse_medical_advice");
        assert!(outcome.response.contains("dosage"));
        assert_eq!(engine.history_len().await, 0);
    }

    #[tokio::test]
    async fn harmful_query_refused() {
        let engine = engine("unused");
        let outcome = engine.chat("how to overdose on lisinopril", true).await;

        assert!(outcome.is_refused);
        assert_eq!(outcome.guardrail_decision, "refuse_harmful");
        assert_eq!(outcome.query_type, QueryType::Harmful);
    }

    #[tokio::test]
    async fn generation_failure_returns_apology_in_band() {
        let engine = ChatEngine::new(Arc::new(MockGenerate::failing()));
        let outcome = engine.chat("Tell me about aspirin", true).await;

        assert!(!outcome.is_refused);
        assert_eq!(outcome.response, GENERATION_FAILURE_MESSAGE);
        assert_eq!(outcome.guardrail_decision, "error");
        // Failed turns are not recorded.
        assert_eq!(engine.history_len().await, 0);
    }

    #[tokio::test]
    async fn successful_turns_accumulate_history() {
        let engine = engine("General information.");
        engine.chat("Tell me about aspirin", true).await;
        engine.chat("Tell me about ibuprofen", true).await;
        assert_eq!(engine.history_len().await, 2);

        engine.clear_history().await;
        assert_eq!(engine.history_len().await, 0);
    }

    #[tokio::test]
    async fn prompt_includes_recent_history_window() {
        let engine = engine("ok");
        for i in 0..5 {
            engine
                .chat(&format!("Tell me about medication number {i}"), true)
                .await;
        }

        let prompt = engine.build_prompt("latest question", true).await;
        assert!(prompt.starts_with(SYSTEM_PROMPT));
        assert!(prompt.contains("medication number 4"));
        assert!(prompt.contains("medication number 2"));
        // Older exchanges fall outside the window.
        assert!(!prompt.contains("medication number 1"));
        assert!(prompt.ends_with("Assistant:"));
    }

    #[tokio::test]
    async fn prompt_omits_history_when_excluded() {
        let engine = engine("ok");
        engine.chat("Tell me about aspirin", true).await;

        let prompt = engine.build_prompt("standalone", false).await;
        assert!(!prompt.contains("Previous conversation"));
    }

    #[tokio::test]
    async fn medication_info_formats_standing_query() {
        let engine = engine("Lisinopril is an ACE inhibitor.");
        let outcome = engine.medication_info("Lisinopril").await;

        assert!(!outcome.is_refused);
        assert!(outcome.response.contains("ACE inhibitor"));
        // The standing query mentions side effects, so it classifies there.
        assert_eq!(outcome.query_type, QueryType::SideEffects);
    }
}
