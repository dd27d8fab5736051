use renoprop_core::proposal::{ProposalRequest, SAMPLE_PROPOSAL};

/// Build the drafting prompt for one proposal request.
///
/// The reference document carries every clause a proposal needs; the
/// prompt tells the model to keep that structure and swap in the user's
/// details, inventing nothing the reference does not already provide.
pub fn drafting_prompt(request: &ProposalRequest) -> String {
    let mut details = format!("Renovation requested: {}.", request.renovation_request);
    match &request.contractor_location {
        Some(location) => {
            details.push_str(&format!(" The contractor should be located in {location}."));
        }
        None => details.push_str(" Use the contractor location from the reference document."),
    }
    match request.budget_display() {
        Some(budget) => {
            details.push_str(&format!(" The total contract price must be {budget}."));
        }
        None => details.push_str(" Use the pricing from the reference document."),
    }

    format!(
        "You are drafting a home renovation proposal document.\n\
         Rewrite the reference document below so it covers the customer's request.\n\
         Keep every numbered section, keep the formal register, and adjust only the\n\
         scope of work, locations, and prices to match the request. Fill any detail\n\
         the request does not mention from the reference document. Reply with the\n\
         proposal text only, no commentary.\n\n\
         Customer request:\n{details}\n\n\
         Reference document:\n{SAMPLE_PROPOSAL}"
    )
}

#[cfg(test)]
mod tests {
    use renoprop_core::proposal::ProposalRequest;

    use super::drafting_prompt;

    #[test]
    fn prompt_carries_request_details_and_reference_document() {
        let request = ProposalRequest {
            renovation_request: "kitchen remodel".to_string(),
            contractor_location: Some("San Jose".to_string()),
            budget_cents: Some(3_000_000),
        };
        let prompt = drafting_prompt(&request);

        assert!(prompt.contains("Renovation requested: kitchen remodel."));
        assert!(prompt.contains("located in San Jose"));
        assert!(prompt.contains("$30,000.00"));
        assert!(prompt.contains("PROPOSAL DOCUMENT"));
        assert!(prompt.contains("11. Entire Agreement"));
    }

    #[test]
    fn missing_details_defer_to_the_reference_document() {
        let prompt = drafting_prompt(&ProposalRequest::new("bathroom refresh"));

        assert!(prompt.contains("Use the contractor location from the reference document."));
        assert!(prompt.contains("Use the pricing from the reference document."));
    }
}
