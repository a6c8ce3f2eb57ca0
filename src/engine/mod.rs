//! Demo chat engine: simulated pill recognition plus the ordered
//! keyword-rule reply table, bound to a fixed medication catalog.

pub mod recognizer;
pub mod rules;

use crate::catalog::{Catalog, MedicationRecord};
use crate::context::ConversationContext;

pub use recognizer::RECOGNITION_DELAY;
pub use rules::REFUSAL_REPLY;

/// Facade owning the catalog. `reply` is pure; `recognize` mutates the
/// passed context the way the upload path does.
pub struct ResponseEngine {
    catalog: Catalog,
}

impl ResponseEngine {
    pub fn new(catalog: Catalog) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Derive a reply for a user utterance against the current context.
    pub fn reply(&self, utterance: &str, ctx: &ConversationContext) -> String {
        rules::reply(utterance, ctx)
    }

    /// Run the simulated upload path to completion.
    pub async fn recognize(&self, ctx: &mut ConversationContext) -> MedicationRecord {
        recognizer::recognize(&self.catalog, ctx).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn recognize_then_reply_uses_recognized_record() {
        let engine = ResponseEngine::new(Catalog::builtin());
        let mut ctx = ConversationContext::new();

        let record = engine.recognize(&mut ctx).await;
        let answer = engine.reply("what is this?", &ctx);

        assert!(answer.contains(&record.name));
        assert!(answer.contains(&record.drug_class));
    }
}
