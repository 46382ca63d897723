//! Stage 1: public research on the target company.
use outreach_core::{AgentRole, StageDefinition};

pub const NAME: &str = "research";

const ROLE: &str = "Company Researcher";

const GOAL: &str = "Build an accurate, sales-relevant picture of {target_company} \
and where {our_product} could fit into its business.";

const BACKSTORY: &str = "You are a seasoned B2B market researcher. You have profiled \
hundreds of companies for enterprise sales teams and know which facts actually move a \
deal: size, business model, strategic priorities, recent changes and pain points. You \
work only from what you already know; when you are unsure of a fact, say so instead of \
inventing it.";

const PROMPT: &str = "Research {target_company} as a prospective buyer of {our_product}.

Cover:
1. What {target_company} does: core business lines, customers and markets served.
2. Approximate size: headcount, revenue range, geographic footprint.
3. Current strategic priorities and any recent initiatives, reorganizations or announcements you are aware of.
4. Technology landscape and tools they are likely to use today that relate to {our_product}.
5. Likely pain points or goals that {our_product} could address.";

const EXPECTED_OUTPUT: &str = "A concise company overview of {target_company} in markdown, \
with one section per point above and a closing list of the three most relevant \
opportunities for {our_product}. Flag uncertain facts explicitly.";

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
        depends_on: Vec::new(),
        output_file: None,
    }
}
