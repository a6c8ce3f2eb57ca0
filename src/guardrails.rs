//! Safety guardrails for the AI chat path.
//!
//! Every incoming query is classified before generation. Medical-advice and
//! harmful queries are refused outright; everything else is answered with an
//! appropriate disclaimer appended. Refusal enforcement lives here, on the
//! server: a refused query never reaches the model.

use serde::{Deserialize, Serialize};

/// Keywords that indicate a medical-advice request. Refused.
static MEDICAL_ADVICE_KEYWORDS: &[&str] = &[
    "should i take",
    "can i take",
    "how much should i",
    "what should i do",
    "diagnose",
    "treat my",
    "cure",
    "prescribe",
    "recommend dosage",
    "stop taking",
    "increase dose",
    "decrease dose",
    "substitute",
    "mg or",
    "can i stop",
];

/// Keywords that indicate harmful intent. Refused.
static HARMFUL_KEYWORDS: &[&str] = &[
    "overdose",
    "get high",
    "abuse",
    "recreational",
    "suicide",
    "self-harm",
    "kill myself",
];

/// Informational patterns that are safe to answer with a disclaimer.
static SAFE_PATTERNS: &[&str] = &[
    "what is",
    "tell me about",
    "information about",
    "side effects of",
    "used for",
    "how does",
    "what are",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryType {
    MedicationInfo,
    SideEffects,
    Dosage,
    Diagnosis,
    Treatment,
    Interaction,
    General,
    Harmful,
}

impl QueryType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MedicationInfo => "medication_info",
            Self::SideEffects => "side_effects",
            Self::Dosage => "dosage",
            Self::Diagnosis => "diagnosis",
            Self::Treatment => "treatment",
            Self::Interaction => "interaction",
            Self::General => "general",
            Self::Harmful => "harmful",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GuardrailDecision {
    RefuseMedicalAdvice,
    RefuseHarmful,
    RequireDisclaimer,
}

impl GuardrailDecision {
    pub fn is_refusal(&self) -> bool {
        matches!(self, Self::RefuseMedicalAdvice | Self::RefuseHarmful)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RefuseMedicalAdvice => "refuse_medical_advice",
            Self::RefuseHarmful => "refuse_harmful",
            Self::RequireDisclaimer => "require_disclaimer",
        }
    }
}

/// Classify a user query with keyword heuristics. Harmful wins over advice,
/// advice over informational. An advice match without a recognizable
/// dosage/diagnosis subtype still counts as treatment advice, so it is
/// never answered.
pub fn classify_query(query: &str) -> QueryType {
    let lowered = query.to_lowercase();

    if HARMFUL_KEYWORDS.iter().any(|k| lowered.contains(k)) {
        return QueryType::Harmful;
    }

    if MEDICAL_ADVICE_KEYWORDS.iter().any(|k| lowered.contains(k)) {
        return if lowered.contains("dosage") || lowered.contains("dose") || lowered.contains("mg or")
        {
            QueryType::Dosage
        } else if lowered.contains("diagnos") {
            QueryType::Diagnosis
        } else {
            QueryType::Treatment
        };
    }

    if lowered.contains("side effect") {
        QueryType::SideEffects
    } else if lowered.contains("interact") {
        QueryType::Interaction
    } else if SAFE_PATTERNS.iter().any(|p| lowered.contains(p)) {
        QueryType::MedicationInfo
    } else {
        QueryType::General
    }
}

/// Decide whether a query may be answered, and with what standing message.
pub fn check(query: &str) -> (GuardrailDecision, &'static str) {
    match classify_query(query) {
        QueryType::Harmful => (
            GuardrailDecision::RefuseHarmful,
            "I cannot provide information that could be harmful. If you're \
             experiencing a crisis, please contact emergency services or call \
             the National Suicide Prevention Lifeline at 988.",
        ),
        QueryType::Dosage | QueryType::Diagnosis | QueryType::Treatment => (
            GuardrailDecision::RefuseMedicalAdvice,
            "I can provide general information about medications, but I cannot \
             give medical advice, recommend dosages, diagnose conditions, or \
             suggest treatments. Please consult your doctor or pharmacist for \
             personalized medical guidance.",
        ),
        _ => (
            GuardrailDecision::RequireDisclaimer,
            "This is general information only. Always consult your healthcare provider.",
        ),
    }
}

/// Polite refusal text for a disallowed query type.
pub fn refusal_message(query_type: QueryType) -> &'static str {
    match query_type {
        QueryType::Dosage => {
            "I cannot provide dosage recommendations. Medication dosages must be \
             determined by your doctor based on your specific health condition, \
             age, weight, and other factors. Please consult your healthcare provider."
        }
        QueryType::Diagnosis => {
            "I cannot diagnose medical conditions. If you're experiencing symptoms, \
             please consult a qualified healthcare professional for proper \
             evaluation and diagnosis."
        }
        QueryType::Treatment => {
            "I cannot recommend treatments or medical interventions. Treatment \
             plans should be developed by your doctor based on your individual \
             health needs. Please schedule an appointment with your healthcare provider."
        }
        QueryType::Harmful => {
            "I cannot provide information that could be harmful. If you're in \
             crisis, please reach out for help:\n\
             • Emergency: 911\n\
             • Suicide Prevention Lifeline: 988\n\
             • Crisis Text Line: Text HOME to 741741"
        }
        _ => {
            "I can provide general medication information, but I cannot give \
             medical advice. Please consult your healthcare provider."
        }
    }
}

/// Append the per-type disclaimer to a generated response.
pub fn add_disclaimer(response: &str, query_type: QueryType) -> String {
    let disclaimer = match query_type {
        QueryType::MedicationInfo => {
            "\n\n⚠️ **Disclaimer**: This is general information about this \
             medication. Always follow your doctor's instructions and consult \
             your healthcare provider for personalized medical advice."
        }
        QueryType::SideEffects => {
            "\n\n⚠️ **Disclaimer**: These are potential side effects. Not \
             everyone experiences them. Contact your doctor if you experience \
             concerning symptoms."
        }
        QueryType::Interaction => {
            "\n\n⚠️ **Disclaimer**: This information is for educational \
             purposes. Always inform your doctor and pharmacist about all \
             medications you're taking."
        }
        QueryType::General => {
            "\n\n⚠️ **Disclaimer**: This is general health information only. \
             Consult your healthcare provider for medical advice."
        }
        _ => "\n\n⚠️ **Disclaimer**: Always consult your healthcare provider for medical advice.",
    };
    format!("{response}{disclaimer}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn informational_queries_allowed() {
        assert_eq!(
            classify_query("What is Metformin used for?"),
            QueryType::MedicationInfo
        );
        assert_eq!(
            classify_query("Tell me about aspirin"),
            QueryType::MedicationInfo
        );
    }

    #[test]
    fn side_effect_queries_classified() {
        assert_eq!(
            classify_query("What are the side effects of Lisinopril?"),
            QueryType::SideEffects
        );
    }

    #[test]
    fn interaction_queries_classified() {
        assert_eq!(
            classify_query("Does Metformin interact with alcohol?"),
            QueryType::Interaction
        );
    }

    #[test]
    fn dosage_choice_refused() {
        let query = "Should I take 500mg or 1000mg of Metformin?";
        assert_eq!(classify_query(query), QueryType::Dosage);
        let (decision, _) = check(query);
        assert_eq!(decision, GuardrailDecision::RefuseMedicalAdvice);
    }

    #[test]
    fn diagnosis_refused() {
        let query = "Can you diagnose my symptoms?";
        assert_eq!(classify_query(query), QueryType::Diagnosis);
        assert!(check(query).0.is_refusal());
    }

    #[test]
    fn stop_taking_refused_as_treatment_advice() {
        let query = "Can I stop taking lisinopril?";
        assert_eq!(classify_query(query), QueryType::Treatment);
        assert!(check(query).0.is_refusal());
    }

    #[test]
    fn harmful_refused_before_everything_else() {
        // Also matches the safe "how does" pattern; harmful wins.
        let query = "How does one overdose on this medication?";
        assert_eq!(classify_query(query), QueryType::Harmful);
        let (decision, message) = check(query);
        assert_eq!(decision, GuardrailDecision::RefuseHarmful);
        assert!(message.contains("988"));
    }

    #[test]
    fn general_queries_require_disclaimer_only() {
        let (decision, _) = check("hello there");
        assert_eq!(decision, GuardrailDecision::RequireDisclaimer);
        assert!(!decision.is_refusal());
    }

    #[test]
    fn classification_is_case_insensitive() {
        assert_eq!(
            classify_query("SHOULD I TAKE more of this?"),
            QueryType::Treatment
        );
    }

    #[test]
    fn refusal_messages_direct_to_professionals() {
        assert!(refusal_message(QueryType::Dosage).contains("doctor"));
        assert!(refusal_message(QueryType::Treatment).contains("healthcare provider"));
        assert!(refusal_message(QueryType::Harmful).contains("911"));
    }

    #[test]
    fn disclaimer_appended_per_type() {
        let text = add_disclaimer("Metformin controls blood sugar.", QueryType::MedicationInfo);
        assert!(text.starts_with("Metformin controls blood sugar."));
        assert!(text.contains("Disclaimer"));

        let side = add_disclaimer("May cause dizziness.", QueryType::SideEffects);
        assert!(side.contains("Not everyone experiences them"));
    }

    #[test]
    fn query_type_wire_names() {
        assert_eq!(QueryType::MedicationInfo.as_str(), "medication_info");
        assert_eq!(
            serde_json::to_string(&QueryType::SideEffects).unwrap(),
            "\"side_effects\""
        );
        assert_eq!(
            serde_json::to_string(&GuardrailDecision::RefuseHarmful).unwrap(),
            "\"refuse_harmful\""
        );
    }
}
