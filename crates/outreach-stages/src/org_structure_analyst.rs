//! Stage 2: how the target company is organised and who buys.
use outreach_core::{AgentRole, StageDefinition};

use crate::company_researcher;

pub const NAME: &str = "org_structure";

const ROLE: &str = "Organizational Structure Analyst";

const GOAL: &str = "Map the departments and decision-making structure at {target_company} \
that matter for a purchase of {our_product}.";

const BACKSTORY: &str = "You spent years in enterprise procurement and sales operations. \
You can read a company's shape from its industry and size, and you know who usually owns \
budget, who evaluates, and who signs off for a given kind of product.";

const PROMPT: &str = "Using the company research above, analyze the organizational structure of \
{target_company} with respect to buying {our_product}.

Identify:
1. The departments or business units that would use, evaluate or pay for {our_product}.
2. The typical reporting lines and seniority levels inside those departments.
3. Who is likely to own the budget, who influences the decision, and who gives final approval.
4. Any procurement, security or compliance functions that usually join this kind of purchase.";

const EXPECTED_OUTPUT: &str = "A markdown overview of the relevant departments and roles at \
{target_company}, describing how a buying decision for {our_product} would most likely flow \
through the organization.";

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
        depends_on: vec![company_researcher::NAME.to_string()],
        output_file: None,
    }
}
