use serde::{Deserialize, Serialize};

/// Fixed object key the rendered proposal is stored under. Re-publishing
/// overwrites the previous document (last write wins in the bucket).
pub const PROPOSAL_OBJECT_NAME: &str = "proposal_document_for_user.pdf";

/// Details the agent collects from the user before drafting a proposal.
///
/// Only the renovation requirement is mandatory; contractor location and
/// budget are optional refinements. The struct is created fresh per
/// conversation turn and consumed by the drafting prompt.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposalRequest {
    pub renovation_request: String,
    pub contractor_location: Option<String>,
    pub budget_cents: Option<i64>,
}

impl ProposalRequest {
    pub fn new(renovation_request: impl Into<String>) -> Self {
        Self { renovation_request: renovation_request.into(), ..Self::default() }
    }

    /// Budget formatted for prompt text, e.g. `$30,000.00`.
    pub fn budget_display(&self) -> Option<String> {
        self.budget_cents.map(format_cents)
    }
}

fn format_cents(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let absolute = cents.unsigned_abs();
    let dollars = absolute / 100;
    let remainder = absolute % 100;

    let mut grouped = String::new();
    let digits = dollars.to_string();
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    format!("{sign}${grouped}.{remainder:02}")
}

/// Reference proposal content handed to the LLM as a drafting template.
/// The agent fills unknown details from this sample rather than asking
/// the user additional questions.
pub const SAMPLE_PROPOSAL: &str = r#"PROPOSAL DOCUMENT
This proposal is made and entered into by and between:
Homeowner: Alice Smith, residing at 123 Main Street, Anytown, CA 91234
Contractor: Bob's Renovations, Inc., a California corporation, with its
principal place of business at 456 Oak Avenue, Anytown, CA 91235
(License #1234567)

1. Scope of Work:
Contractor agrees to perform the following work:
Kitchen Remodel
Demolition of existing kitchen cabinets, countertops, and flooring.
Installation of new custom cabinets (specified in Exhibit A - Cabinet Design).
Installation of granite countertops (specified in Exhibit B - Countertop Selection).
Installation of tile backsplash (specified in Exhibit C - Backsplash Tile).
Installation of new stainless steel sink and faucet.
Installation of new recessed lighting (6 fixtures).
Installation of new flooring (specified in Exhibit D - Flooring Selection).
Painting of walls and ceiling (2 coats, color specified in Exhibit E - Paint Color).
Plumbing work necessary for sink and dishwasher connections.
Electrical work necessary for lighting and appliance connections (GFCI outlets).
All work will be performed in a professional and workmanlike manner in
accordance with local building codes.

2. Proposal Price:
The total contract price for the work described above is $30,000.00
(Thirty Thousand Dollars).

3. Payment Schedule:
Deposit: $10,000.00 due upon signing of this proposal.
Phase 1 (Demolition & Rough-in): $5,000.00 due upon completion of demolition
and rough-in plumbing and electrical.
Phase 2 (Cabinet & Countertop Installation): $10,000.00 due upon completion
of cabinet and countertop installation.
Final Payment: $5,000.00 due upon final inspection and completion of all work.

4. Change Orders:
Any changes to the scope of work must be agreed upon in writing and signed
by both parties. Changes may result in adjustments to the contract price
and schedule.

5. Timeline:
The work shall commence within four weeks of signing and be substantially
completed within 6 weeks of commencement. This timeline is subject to change
due to unforeseen circumstances (e.g., material delays, weather).

6. Permits:
Contractor is responsible for obtaining all necessary permits for the work.

7. Insurance:
Contractor shall maintain general liability insurance and workers'
compensation insurance. Proof of insurance will be provided upon request.

8. Warranty:
Contractor warrants all labor for a period of one (1) year from the date of
completion. Manufacturer warranties apply to materials.

9. Dispute Resolution:
Any disputes arising out of this contract shall be resolved through
mediation. If mediation fails, the parties agree to binding arbitration.

10. Termination:
This proposal may be terminated by either party with written notice if the
other party breaches the proposal.

11. Entire Agreement:
This proposal constitutes the entire agreement between the parties and
supersedes all prior discussions and agreements.

IN WITNESS WHEREOF, the parties have executed this contract as of the date
first written above.

____________________________
Homeowner

____________________________
Contractor
"#;
