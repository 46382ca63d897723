//! Stage 3: named contacts likely to buy or influence the purchase.
use outreach_core::{AgentRole, StageDefinition};

use crate::{company_researcher, org_structure_analyst};

pub const NAME: &str = "contacts";

const ROLE: &str = "Key Contact Finder";

const GOAL: &str = "Identify the role archetypes at {target_company} a seller of \
{our_product} should reach, and why each one matters.";

const BACKSTORY: &str = "You are a sales development lead who builds account maps for a \
living. You think in buying committees: champions, economic buyers, technical evaluators \
and blockers. You never invent names or contact details; you describe roles.";

const PROMPT: &str = "Based on the company research and organizational analysis above, list the \
people a sales team should target at {target_company} for {our_product}.

For each role archetype give:
- Title or role (no personal names)
- Department
- Part in the buying process (champion, economic buyer, technical evaluator, end user, gatekeeper)
- What they care about and why {our_product} is relevant to them
- Priority for outreach (high, medium, low)";

const EXPECTED_OUTPUT: &str = "A markdown table of 5 to 8 role archetypes with the columns \
Role, Department, Buying Role, Key Concerns, Relevance of {our_product} and Priority, \
followed by a short note on where to start.";

pub fn definition() -> StageDefinition {
    StageDefinition {
        name: NAME.to_string(),
        role: AgentRole {
            role: ROLE.to_string(),
            goal: GOAL.to_string(),
            backstory: BACKSTORY.to_string(),
        },
        prompt_template: PROMPT.to_string(),
        expected_output: EXPECTED_OUTPUT.to_string(),
        depends_on: vec![
            company_researcher::NAME.to_string(),
            org_structure_analyst::NAME.to_string(),
        ],
        output_file: None,
    }
}
