//! Simulated pill recognition.
//!
//! Selection is a pure function over a seedable random source; the fixed
//! display delay is a separate concern layered on top, so tests can assert
//! selection without waiting.

use std::time::Duration;

use rand::Rng;

use crate::catalog::{Catalog, MedicationRecord};
use crate::context::ConversationContext;

/// Fixed display delay standing in for real image inference.
pub const RECOGNITION_DELAY: Duration = Duration::from_secs(2);

/// Pick one catalog entry uniformly at random.
pub fn select_record<'a, R: Rng + ?Sized>(catalog: &'a Catalog, rng: &mut R) -> &'a MedicationRecord {
    // Catalog construction rejects the empty set, so gen_range is safe.
    let index = rng.gen_range(0..catalog.len());
    catalog.at(index)
}

/// Assistant transcript entry summarizing a recognized medication:
/// name, generic name, dosage, purpose, drug class, then an invitation.
pub fn summary_message(record: &MedicationRecord) -> String {
    format!(
        "I've identified this as {} ({}), {}. It's a {}: {} Feel free to ask \
         about side effects, how to take it, or anything else.",
        record.name, record.generic_name, record.dosage, record.drug_class, record.description
    )
}

/// Full upload path: wait out the simulated latency, pick a record, set it
/// as the current medication, and append the summary to the transcript.
/// The delay always runs to completion; there is no cancellation.
pub async fn recognize(catalog: &Catalog, ctx: &mut ConversationContext) -> MedicationRecord {
    tokio::time::sleep(RECOGNITION_DELAY).await;

    let record = select_record(catalog, &mut rand::thread_rng()).clone();
    tracing::debug!(medication = %record.name, "demo recognition selected a record");

    ctx.current_medication = Some(record.clone());
    ctx.push_assistant(&summary_message(&record));
    record
}
