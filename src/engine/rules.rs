//! Ordered keyword-rule table for the demo chat.
//!
//! Rules are explicit data evaluated top to bottom; the first match wins.
//! The safety refusal sits at the top unconditionally so that no
//! context-specific template can shadow a dosage-change request.

use crate::catalog::MedicationRecord;
use crate::context::ConversationContext;

/// Fixed reply for utterances that ask to change, stop, or swap a
/// medication. Checked before every other rule, regardless of context.
pub const REFUSAL_REPLY: &str =
    "I can't advise on changing doses, stopping a medication, or replacing one \
     medicine with another. Please talk to your doctor or pharmacist before \
     making any change to how you take your medication.";

const THANKS_REPLY: &str =
    "You're welcome! Let me know if you have any other questions about your medication.";

const GREETING_REPLY: &str =
    "Hello! Upload a photo of your medication, or ask me a question about the \
     one we've already identified.";

/// How a rule's triggers are tested against the lowercased utterance.
#[derive(Debug, Clone, Copy)]
enum MatchKind {
    /// Plain substring containment.
    Substring,
    /// Whole-word match, so "hi" does not fire inside "this".
    Word,
}

struct KeywordRule {
    triggers: &'static [&'static str],
    match_kind: MatchKind,
    /// Context-dependent rules are skipped when no medication is recognized.
    needs_medication: bool,
    respond: fn(Option<&MedicationRecord>) -> String,
}

impl KeywordRule {
    fn matches(&self, lowered: &str) -> bool {
        match self.match_kind {
            MatchKind::Substring => self.triggers.iter().any(|t| lowered.contains(t)),
            MatchKind::Word => {
                let mut words = lowered.split(|c: char| !c.is_alphanumeric());
                words.any(|w| self.triggers.contains(&w))
            }
        }
    }
}

/// Priority order: safety refusal, then context-dependent templates, then
/// general courtesy. The fallback lives outside the table and always applies.
static RULES: &[KeywordRule] = &[
    KeywordRule {
        triggers: &["dosage change", "stop taking", "instead of", "replace"],
        match_kind: MatchKind::Substring,
        needs_medication: false,
        respond: refusal,
    },
    KeywordRule {
        triggers: &["side effect"],
        match_kind: MatchKind::Substring,
        needs_medication: true,
        respond: side_effects,
    },
    KeywordRule {
        triggers: &["how to take", "instruction"],
        match_kind: MatchKind::Substring,
        needs_medication: true,
        respond: instructions,
    },
    KeywordRule {
        triggers: &["what is", "what does"],
        match_kind: MatchKind::Substring,
        needs_medication: true,
        respond: identity,
    },
    KeywordRule {
        triggers: &["food", "eat"],
        match_kind: MatchKind::Substring,
        needs_medication: true,
        respond: food,
    },
    KeywordRule {
        triggers: &["miss", "forgot"],
        match_kind: MatchKind::Substring,
        needs_medication: true,
        respond: missed_dose,
    },
    KeywordRule {
        triggers: &["thank"],
        match_kind: MatchKind::Substring,
        needs_medication: false,
        respond: thanks,
    },
    KeywordRule {
        triggers: &["hello", "hi"],
        match_kind: MatchKind::Word,
        needs_medication: false,
        respond: greeting,
    },
];

/// Derive a reply for a user utterance. Total: always returns a string,
/// never mutates the context. Matching is case-insensitive.
pub fn reply(utterance: &str, ctx: &ConversationContext) -> String {
    let lowered = utterance.to_lowercase();
    for rule in RULES {
        if rule.needs_medication && ctx.current_medication.is_none() {
            continue;
        }
        if rule.matches(&lowered) {
            return (rule.respond)(ctx.current_medication.as_ref());
        }
    }
    fallback(ctx.current_medication.as_ref())
}

fn refusal(_med: Option<&MedicationRecord>) -> String {
    REFUSAL_REPLY.to_string()
}

fn side_effects(med: Option<&MedicationRecord>) -> String {
    let Some(med) = med else { return fallback(None) };
    format!(
        "Common side effects of {} include: {}. Contact your doctor if you \
         experience anything concerning.",
        med.name, med.side_effects
    )
}

fn instructions(med: Option<&MedicationRecord>) -> String {
    let Some(med) = med else { return fallback(None) };
    format!("How to take {}: {}", med.name, med.instructions)
}

fn identity(med: Option<&MedicationRecord>) -> String {
    let Some(med) = med else { return fallback(None) };
    format!(
        "{} ({}) is a {}. {}",
        med.name, med.generic_name, med.drug_class, med.description
    )
}

fn food(med: Option<&MedicationRecord>) -> String {
    let Some(med) = med else { return fallback(None) };
    format!(
        "Food can affect how some medications work. For {}: {}",
        med.name, med.instructions
    )
}

fn missed_dose(med: Option<&MedicationRecord>) -> String {
    let Some(med) = med else { return fallback(None) };
    format!(
        "If you missed a dose of {}, take it as soon as you remember, unless \
         it's almost time for your next one. Skip the missed dose rather than \
         doubling up, and ask your pharmacist if you're unsure.",
        med.name
    )
}

fn thanks(_med: Option<&MedicationRecord>) -> String {
    THANKS_REPLY.to_string()
}

fn greeting(_med: Option<&MedicationRecord>) -> String {
    GREETING_REPLY.to_string()
}

fn fallback(med: Option<&MedicationRecord>) -> String {
    match med {
        Some(med) => format!(
            "I can help with {}'s side effects, how to take it, what it's used \
             for, and what to do about a missed dose. What would you like to know?",
            med.name
        ),
        None => "I can help with side effects, how to take a medication, what \
                 it's used for, and what to do about a missed dose. Upload a \
                 photo of your medication to get started."
            .to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;

    fn ctx_with(name: &str) -> ConversationContext {
        let mut ctx = ConversationContext::new();
        ctx.current_medication = Some(Catalog::builtin().get(name).unwrap().clone());
        ctx
    }

    // Safety refusal precedence

    #[test]
    fn refusal_fires_without_context() {
        let ctx = ConversationContext::new();
        assert_eq!(reply("can I get a dosage change?", &ctx), REFUSAL_REPLY);
        assert_eq!(reply("should I stop taking this?", &ctx), REFUSAL_REPLY);
    }

    #[test]
    fn refusal_wins_over_context_rules() {
        let ctx = ctx_with("metformin");
        assert_eq!(
            reply("please replace my metformin with something", &ctx),
            REFUSAL_REPLY
        );
    }

    #[test]
    fn refusal_wins_over_combined_matches() {
        // Also matches the food and side-effect vocabulary; the refusal
        // must still take precedence.
        let ctx = ctx_with("lisinopril");
        assert_eq!(
            reply("what if I stop taking and replace it with food timing", &ctx),
            REFUSAL_REPLY
        );
    }

    #[test]
    fn refusal_is_case_insensitive() {
        let ctx = ctx_with("lisinopril");
        assert_eq!(reply("STOP TAKING it now?", &ctx), REFUSAL_REPLY);
    }

    // Context-dependent rules

    #[test]
    fn side_effects_template_uses_record() {
        let ctx = ctx_with("lisinopril");
        let answer = reply("what are the side effects?", &ctx);
        assert!(answer.contains("Dizziness, dry cough, headache"));
        assert!(answer.contains("Lisinopril"));
    }

    #[test]
    fn instructions_rule_matches_both_triggers() {
        let ctx = ctx_with("metformin");
        for q in ["how to take this?", "any instructions?"] {
            let answer = reply(q, &ctx);
            assert!(answer.contains("Take with meals"), "query: {q}");
        }
    }

    #[test]
    fn identity_rule_names_class_and_purpose() {
        let ctx = ctx_with("atorvastatin");
        let answer = reply("what is this pill?", &ctx);
        assert!(answer.contains("Statin"));
        assert!(answer.contains("Lowers cholesterol"));
    }

    #[test]
    fn food_rule_uses_instructions() {
        let ctx = ctx_with("metformin");
        let answer = reply("can I take it with food?", &ctx);
        assert!(answer.contains("Metformin"));
        assert!(answer.contains("Take with meals"));
    }

    #[test]
    fn missed_dose_rule_matches_both_triggers() {
        let ctx = ctx_with("lisinopril");
        for q in ["I missed my dose today", "I forgot to take it"] {
            let answer = reply(q, &ctx);
            assert!(answer.contains("missed a dose of Lisinopril"), "query: {q}");
        }
    }

    #[test]
    fn context_rules_skipped_without_medication() {
        let ctx = ConversationContext::new();
        let answer = reply("what is this", &ctx);
        // No identity template, no greeting from the "hi" in "this";
        // falls through to the generic fallback.
        assert!(answer.contains("Upload a photo"));
        assert!(!answer.contains("is a"));
    }

    #[test]
    fn side_effect_question_without_context_falls_back() {
        let ctx = ConversationContext::new();
        let answer = reply("tell me the side effects", &ctx);
        assert!(answer.contains("Upload a photo"));
    }

    // General rules and fallback

    #[test]
    fn gratitude_reply() {
        let ctx = ConversationContext::new();
        assert_eq!(reply("thanks a lot!", &ctx), THANKS_REPLY);
    }

    #[test]
    fn greeting_reply_on_whole_words() {
        let ctx = ConversationContext::new();
        assert_eq!(reply("hello there", &ctx), GREETING_REPLY);
        assert_eq!(reply("Hi!", &ctx), GREETING_REPLY);
    }

    #[test]
    fn greeting_does_not_fire_inside_words() {
        let ctx = ConversationContext::new();
        // "something" contains "hi" as a substring only.
        let answer = reply("something about my meds", &ctx);
        assert_ne!(answer, GREETING_REPLY);
    }

    #[test]
    fn fallback_personalizes_with_medication_name() {
        let ctx = ctx_with("metformin");
        let answer = reply("help me out here", &ctx);
        assert!(answer.contains("Metformin"));
        assert!(answer.contains("side effects"));
    }

    #[test]
    fn reply_is_total() {
        let ctx = ConversationContext::new();
        for q in ["", "   ", "🤷", "zzz"] {
            assert!(!reply(q, &ctx).is_empty(), "query: {q:?}");
        }
    }

    #[test]
    fn reply_does_not_touch_history() {
        let mut ctx = ctx_with("lisinopril");
        ctx.push_user("earlier message");
        let _ = reply("what is this?", &ctx);
        assert_eq!(ctx.history().len(), 1);
    }
}
