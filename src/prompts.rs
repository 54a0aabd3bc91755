//! Prompt text sent with every inference request.

pub const SYSTEM_PROMPT: &str = "You are an expert librarian specializing in digital knowledge management, \
renowned for your meticulous approach to naming, organizing, and ensuring the discoverability of electronic \
resources. You cross-reference key bibliographic details from several places in a document (title page, \
copyright page, table of contents, citation instructions) and balance searchability, traceability and \
archival order in every filename you craft.\n\
Upon receiving the raw text of the first pages of a PDF, infer three bibliographic details for naming the file:\n\
Title: the complete, official title including any subtitle, checked against the title page, copyright page, \
table of contents and citation guidance.\n\
Author/Institution: the primary institution(s) or lead author(s). Prefer institutions over individuals and \
use their most recognisable acronyms. Join at most three institutions with \"&\". For one or two individual \
authors give their full names; for three or more, give the lead author followed by \"etal\".\n\
Year of Publication: the most likely year, with the month if one is given, validated across several mentions.\n\
Structure the filename as: [Institution(s) or Author] - [Full Title] ([Year])\n\
Example: OECD & MissionLab - Harnessing mission governance to achieve national climate targets (2025)\n\
If unclear, suggest author as Various and title as Unknown.";

const NAMING_EXAMPLES: &[&str] = &[
    "SpringerOpen - African Handbook of Climate Change Adaptation (2022)",
    "GIZ & NCFA & UNEP-FI & Global Canopy & Emerging Markets Dialogu - making FIs more resilient to environmental risks (Apr, 2017)",
    "NBER - Adapting To Flood Risk Evidence From A Panel Of Global Cities (2022)",
    "Gaby Frangieh - Credit spread risk in the banking book (2025)",
    "Banca d'Italia & IMF - Embedding sustainability in credit risk assessment (Mar, 2025)",
    "Augusto Blanc-Blocquel etal - Climate-related default probabilities (2024)",
    "Misereor - Towards a socio-ecological transformation of the economy (Mar, 2024)",
    "Esther Shears etal - How central banks manage climate and energy transition risks (Feb, 2025)",
    "OECD & ColumbiaU - Harnessing mission governance to achieve national climate targets (2025)",
    "OxfordU - Input for the update of the SBTi corporate net-zero standard (April, 2025)",
];

/// Task message: worked examples, the output contract, then the page text.
pub fn build_task_prompt(page_text: &str, page_limit: usize) -> String {
    let mut prompt = format!(
        "Given the following raw text from the first {} pages of a PDF, guess the probable author, title, \
         and publication year.\nHere are {} examples of how I want titles to be structured:\n",
        page_limit,
        NAMING_EXAMPLES.len()
    );
    for example in NAMING_EXAMPLES {
        prompt.push_str(example);
        prompt.push('\n');
    }
    prompt.push_str(
        "Put simply, your guess should look like this: OrgA & OrgB & Jane Smith - The Document Title- Subtitles (2023).\n\
         Please output strictly JSON with exactly these three fields: \
         {\"author\": \"\", \"title\": \"\", \"pubdate\": \"\"}\n",
    );
    prompt.push_str("----\n");
    prompt.push_str(page_text);
    prompt.push_str("\n----");
    prompt
}
