use std::collections::BTreeSet;

use renoprop_core::proposal::ProposalRequest;

/// What the extractor understood from one user message.
///
/// The renovation requirement is the only mandatory detail; contractor
/// location and budget refine the draft when present. When the required
/// detail is missing the extractor emits a clarification prompt instead
/// of letting the LLM guess.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExtractedIntent {
    pub scope_mentions: Vec<String>,
    pub contractor_location: Option<String>,
    pub budget_cents: Option<i64>,
    pub confidence_score: u8,
    pub clarification_prompt: Option<String>,
}

impl ExtractedIntent {
    pub fn needs_clarification(&self) -> bool {
        self.clarification_prompt.is_some()
    }

    /// Convert to the drafting request once clarification is settled.
    pub fn into_request(self) -> ProposalRequest {
        ProposalRequest {
            renovation_request: self.scope_mentions.join(", "),
            contractor_location: self.contractor_location,
            budget_cents: self.budget_cents,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct IntentExtractor;

impl IntentExtractor {
    pub fn new() -> Self {
        Self
    }

    pub fn extract(&self, text: &str) -> ExtractedIntent {
        let normalized_text = normalize_text(text);
        let tokens = tokenize(&normalized_text);

        let scope_mentions = extract_scopes(&normalized_text);
        let contractor_location = extract_location(&normalized_text);
        let budget_cents = extract_budget_cents(&tokens);

        let confidence_score = confidence_score(
            !scope_mentions.is_empty(),
            contractor_location.is_some(),
            budget_cents.is_some(),
        );

        let clarification_prompt = if scope_mentions.is_empty() {
            Some(
                "What would you like to renovate? Tell me the rooms or work involved \
                 (for example: kitchen remodel, bathroom refresh, new flooring)."
                    .to_string(),
            )
        } else {
            None
        };

        ExtractedIntent {
            scope_mentions,
            contractor_location,
            budget_cents,
            confidence_score,
            clarification_prompt,
        }
    }
}

fn normalize_text(text: &str) -> String {
    text.to_ascii_lowercase()
}

fn tokenize(text: &str) -> Vec<String> {
    let mut sanitized = String::with_capacity(text.len());
    for character in text.chars() {
        if character.is_ascii_alphanumeric() || matches!(character, '$' | '.') {
            sanitized.push(character);
        } else {
            sanitized.push(' ');
        }
    }
    sanitized.split_whitespace().map(|token| token.to_string()).collect()
}

const SCOPE_VOCABULARY: &[(&str, &str)] = &[
    ("kitchen", "kitchen remodel"),
    ("bathroom", "bathroom renovation"),
    ("bath ", "bathroom renovation"),
    ("basement", "basement finishing"),
    ("attic", "attic conversion"),
    ("roof", "roof replacement"),
    ("garage", "garage renovation"),
    ("deck", "deck construction"),
    ("patio", "patio construction"),
    ("floor", "flooring replacement"),
    ("paint", "interior painting"),
    ("plumbing", "plumbing work"),
    ("electrical", "electrical work"),
    ("window", "window replacement"),
    ("siding", "siding replacement"),
    ("whole house", "whole-house renovation"),
    ("full home", "whole-house renovation"),
];

fn extract_scopes(normalized_text: &str) -> Vec<String> {
    let mut scopes = BTreeSet::new();
    for (keyword, scope) in SCOPE_VOCABULARY {
        if normalized_text.contains(keyword) {
            scopes.insert((*scope).to_string());
        }
    }
    scopes.into_iter().collect()
}

/// Look for a contractor-location preference such as "contractor in
/// Anytown" or "someone near San Jose". The captured place name runs to
/// the next punctuation mark or budget/scope keyword.
fn extract_location(normalized_text: &str) -> Option<String> {
    const ANCHORS: &[&str] =
        &["contractor in ", "contractor near ", "contractor from ", "contractor around "];
    const LOOSE_ANCHORS: &[&str] = &["someone near ", "based in ", "local to "];

    let tail = ANCHORS
        .iter()
        .chain(LOOSE_ANCHORS.iter())
        .find_map(|anchor| normalized_text.split_once(anchor).map(|(_, tail)| tail))?;

    let mut place_words = Vec::new();
    for word in tail.split_whitespace() {
        let cleaned = word.trim_matches(|c: char| !c.is_ascii_alphanumeric());
        if cleaned.is_empty() || is_location_terminator(cleaned) {
            break;
        }
        place_words.push(titlecase(cleaned));
        if word.ends_with([',', '.', ';', '!', '?']) || place_words.len() == 4 {
            break;
        }
    }

    if place_words.is_empty() {
        None
    } else {
        Some(place_words.join(" "))
    }
}

fn is_location_terminator(word: &str) -> bool {
    matches!(
        word,
        "with" | "and" | "budget" | "under" | "for" | "within" | "max" | "around" | "about"
    ) || word.starts_with('$')
}

fn titlecase(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
        None => String::new(),
    }
}

fn extract_budget_cents(tokens: &[String]) -> Option<i64> {
    let budget_context = ["budget", "spend", "cap", "under", "below", "max", "around", "about"];
    for (index, token) in tokens.iter().enumerate() {
        let in_context = index > 0 && budget_context.contains(&tokens[index - 1].as_str());
        if token.starts_with('$') || in_context {
            if let Some(cents) = parse_money_token(token) {
                return Some(cents);
            }
        }
    }
    None
}

fn parse_money_token(token: &str) -> Option<i64> {
    let trimmed = token.trim_start_matches('$').trim_end_matches(',');
    if trimmed.is_empty() {
        return None;
    }

    let (number_part, multiplier) = if let Some(prefix) = trimmed.strip_suffix('k') {
        (prefix, 1_000.0)
    } else if let Some(prefix) = trimmed.strip_suffix('m') {
        (prefix, 1_000_000.0)
    } else {
        (trimmed, 1.0)
    };

    let amount = number_part.parse::<f64>().ok()?;
    if amount <= 0.0 {
        return None;
    }
    let dollars = amount * multiplier;
    Some((dollars * 100.0).round() as i64)
}

fn confidence_score(has_scope: bool, has_location: bool, has_budget: bool) -> u8 {
    let mut score = 10u8;
    if has_scope {
        score += 60;
    }
    if has_location {
        score += 15;
    }
    if has_budget {
        score += 15;
    }
    score.min(100)
}

#[cfg(test)]
mod tests {
    use super::IntentExtractor;

    #[test]
    fn extracts_scope_location_and_budget_from_rich_request() {
        let extractor = IntentExtractor::new();
        let intent = extractor
            .extract("I want a kitchen remodel, contractor in San Jose, budget $30k please");

        assert_eq!(intent.scope_mentions, vec!["kitchen remodel".to_string()]);
        assert_eq!(intent.contractor_location.as_deref(), Some("San Jose"));
        assert_eq!(intent.budget_cents, Some(3_000_000));
        assert!(intent.confidence_score >= 90);
        assert!(!intent.needs_clarification());
    }

    #[test]
    fn scope_alone_is_sufficient() {
        let extractor = IntentExtractor::new();
        let intent = extractor.extract("redo my bathroom");

        assert_eq!(intent.scope_mentions, vec!["bathroom renovation".to_string()]);
        assert!(intent.contractor_location.is_none());
        assert!(intent.budget_cents.is_none());
        assert!(!intent.needs_clarification());
    }

    #[test]
    fn missing_scope_requests_clarification() {
        let extractor = IntentExtractor::new();
        let intent = extractor.extract("can you help me with my house?");

        assert!(intent.needs_clarification());
        assert!(intent
            .clarification_prompt
            .as_deref()
            .unwrap_or_default()
            .contains("What would you like to renovate"));
    }

    #[test]
    fn multiple_scopes_are_collected_once_each() {
        let extractor = IntentExtractor::new();
        let intent =
            extractor.extract("kitchen and bathroom and more kitchen work with new flooring");

        assert_eq!(
            intent.scope_mentions,
            vec![
                "bathroom renovation".to_string(),
                "flooring replacement".to_string(),
                "kitchen remodel".to_string(),
            ]
        );
    }

    #[test]
    fn budget_parses_plain_k_and_decimal_forms() {
        let extractor = IntentExtractor::new();
        assert_eq!(extractor.extract("kitchen for $25000").budget_cents, Some(2_500_000));
        assert_eq!(extractor.extract("kitchen under 40k").budget_cents, Some(4_000_000));
        assert_eq!(extractor.extract("kitchen budget $12.5k").budget_cents, Some(1_250_000));
        assert_eq!(extractor.extract("kitchen, no numbers here").budget_cents, None);
    }

    #[test]
    fn location_capture_stops_at_budget_talk() {
        let extractor = IntentExtractor::new();
        let intent =
            extractor.extract("bathroom refresh, contractor near palo alto under $18k");
        assert_eq!(intent.contractor_location.as_deref(), Some("Palo Alto"));
        assert_eq!(intent.budget_cents, Some(1_800_000));
    }

    #[test]
    fn intent_converts_into_a_proposal_request() {
        let extractor = IntentExtractor::new();
        let request = extractor
            .extract("full home renovation, contractor in Anytown, budget $150k")
            .into_request();

        assert_eq!(request.renovation_request, "whole-house renovation");
        assert_eq!(request.contractor_location.as_deref(), Some("Anytown"));
        assert_eq!(request.budget_cents, Some(15_000_000));
    }
}
