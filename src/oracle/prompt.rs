//! Selection prompt construction and response parsing.

use crate::catalog::Candidate;
use crate::oracle::types::{OracleSelection, SelectionConstraints};
use crate::oracle::{OracleError, PROMPT_SHORTLIST_LIMIT};

pub(crate) const SYSTEM_PROMPT: &str =
    "You are an expert retail analyst selecting substitute products. \
     Always answer with a single JSON object and nothing else.";

/// Renders the selection prompt for a shortlist under constraints.
pub fn build_selection_prompt(
    shortlist: &[Candidate],
    constraints: &SelectionConstraints,
) -> String {
    let visible = &shortlist[..shortlist.len().min(PROMPT_SHORTLIST_LIMIT)];
    let shortlist_json =
        serde_json::to_string_pretty(visible).unwrap_or_else(|_| "[]".to_string());

    let mut prompt = format!(
        "From this JSON list of product candidates:\n{shortlist_json}\n\n\
         Select ONE product that meets these criteria:\n\
         1. MUST be from country: \"{country}\"\n\
         2. SHOULD be in same category: \"{category}\"\n\
         3. PREFERABLY priced between ${min_price:.2} and ${max_price:.2}\n\
         4. PREFERABLY brand popularity between {min_pop:.1} and {max_pop:.1}\n\
         5. MUST NOT be in rejected set: {rejected:?}\n\
         6. MUST NOT be in used set: {used:?}\n\
         7. PREFERABLY different brand than: \"{avoid_brand}\"\n\n\
         Return a JSON object in exactly this format (no explanation or markdown):\n\n\
         {{\n\
         \"replacement_id\": \"selected_id_here\",\n\
         \"name\": \"Exact Product Name From Metadata\",\n\
         \"brand\": \"Exact Brand Name From Metadata\",\n\
         \"category\": \"{category}\",\n\
         \"price\": 0.0,\n\
         \"reason_code\": \"tariff\" or \"popularity\" or \"quality\",\n\
         \"brand_popularity\": 0.0\n\
         }}\n\n\
         Select the best available product from the candidates list.",
        country = constraints.country,
        category = constraints.category,
        min_price = constraints.min_price,
        max_price = constraints.max_price,
        min_pop = constraints.min_popularity,
        max_pop = constraints.max_popularity,
        rejected = constraints.rejected,
        used = constraints.used,
        avoid_brand = constraints.avoid_brand,
    );

    if let Some(instruction) = &constraints.retry_instruction {
        prompt.push_str("\n\n");
        prompt.push_str(instruction);
    }

    prompt
}

/// Parses an oracle reply into a selection, tolerating markdown code fences.
pub fn parse_selection(reply: &str) -> Result<OracleSelection, OracleError> {
    let trimmed = strip_code_fences(reply.trim());

    serde_json::from_str(trimmed).map_err(|e| OracleError::MalformedResponse {
        message: e.to_string(),
    })
}

fn strip_code_fences(reply: &str) -> &str {
    let reply = reply
        .strip_prefix("```json")
        .or_else(|| reply.strip_prefix("```"))
        .unwrap_or(reply);
    reply.strip_suffix("```").unwrap_or(reply).trim()
}
