//! Stage 4: the outreach strategy, persisted as the run artifact.
use outreach_core::{AgentRole, StageDefinition};

use crate::{company_researcher, contact_finder, org_structure_analyst};

pub const NAME: &str = "strategy";

/// File the final strategy is persisted to
pub const ARTIFACT_FILE: &str = "buyer_contact.md";

const ROLE: &str = "Sales Strategist";

const GOAL: &str = "Turn the research on {target_company} into a concrete, sequenced \
outreach plan for selling {our_product}.";

const BACKSTORY: &str = "You have led enterprise sales teams and closed complex deals with \
long buying cycles. You write plans that an account executive can execute tomorrow: who to \
contact first, with what message, through which channel, and what to do when they reply.";

const PROMPT: &str = "Using all of the research above, develop an outreach strategy for selling \
{our_product} to {target_company}.

Include:
1. Executive summary of the opportunity.
2. Recommended entry point and the order in which to engage each role archetype.
3. Tailored value propositions and talking points per role.
4. Suggested channels and a multi-touch sequence (for example email, LinkedIn, events, referrals).
5. A short sample opening message for the highest-priority contact.
6. Likely objections and how to handle them.
7. Next steps and how to measure progress.";

const EXPECTED_OUTPUT: &str = "A complete outreach strategy document in markdown titled \
\"Outreach Strategy: {our_product} for {target_company}\", including the key contacts table \
from the research and the seven sections listed above.";

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
            contact_finder::NAME.to_string(),
        ],
        output_file: Some(ARTIFACT_FILE.to_string()),
    }
}
