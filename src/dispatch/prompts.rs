use crate::knowledge::KnowledgeTable;
use crate::risk::RiskAssessment;

use super::DispatchKind;

struct Template {
    preamble: &'static str,
    label: &'static str,
    instructions: &'static str,
}

const LOGISTICS_MANIFEST: Template = Template {
    preamble: "You are V-LO Agent: Vector-Led Orchestration for Turkana Health.",
    label: "QUERY",
    instructions: "Respond in 3 STEPS:\n\
        1. LOGISTICS: Single truck route + supplies\n\
        2. DETECTION: SMS/CHP alert to herders\n\
        3. VECTOR: LSM, SMC, IRS action",
};

const CRISIS_RESPONSE: Template = Template {
    preamble: "You are ADIIT Agent (Life-Saving Orchestrator). 'Adiit' = To Save in Turkana.",
    label: "CRISIS",
    instructions: "RESPOND IN 4 PRIORITIES:\n\
        1. DRUG RESISTANCE & EXPIRY: Pfk13 mutations, Amphotericin B expiry\n\
        2. LOGISTICS: Single truck routing across 132 facilities\n\
        3. CLINICAL ADHERENCE: Support CHPs, simplify protocols\n\
        4. VECTOR INTELLIGENCE: An. stephensi in Lodwar, sandfly hotspots\n\
        \n\
        OUTPUT: Actionable, time-bound, lives-saved estimate",
};

const EPIDEMIC_INTELLIGENCE: Template = Template {
    preamble: "Generate 30-DAY EPIDEMIC INTELLIGENCE for Turkana:",
    label: "SURVEILLANCE",
    instructions: "ANALYZE:\n\
        - Vector dynamics (An. stephensi, An. funestus, sandflies)\n\
        - Drug resistance (Pfk13 C469Y, P553L, A675V)\n\
        - Nomadic mobility risks\n\
        - Multi-disease hotspots\n\
        \n\
        PREDICT:\n\
        - Risk zones next 30 days\n\
        - Outbreak probability\n\
        - Early warning signals\n\
        - Mitigation strategy",
};

fn template(kind: DispatchKind) -> &'static Template {
    match kind {
        DispatchKind::LogisticsManifest => &LOGISTICS_MANIFEST,
        DispatchKind::CrisisResponse => &CRISIS_RESPONSE,
        DispatchKind::EpidemicIntelligence => &EPIDEMIC_INTELLIGENCE,
    }
}

/// Assembles the single prompt sent for one dispatch.
///
/// The risk summary is only included for logistics manifests.
pub fn build_prompt(
    kind: DispatchKind,
    free_text: &str,
    knowledge: &KnowledgeTable,
    risk: Option<&RiskAssessment>,
) -> String {
    let template = template(kind);

    let mut prompt = format!(
        "{}\nDATA: {}\n{}: {}\n",
        template.preamble,
        knowledge.snapshot(),
        template.label,
        free_text
    );

    if kind == DispatchKind::LogisticsManifest
        && let Some(risk) = risk
    {
        prompt.push_str(&risk.summary_line());
        prompt.push('\n');
    }

    prompt.push('\n');
    prompt.push_str(template.instructions);
    prompt
}
