use crate::domain::{
    lead::{parse_leads_from_text, LeadField, LEAD_DELIMITER},
    search::{QueryError, SearchParams, SearchResult},
};

use super::{classify, GeminiClient, GenerateContentResponse};

pub fn build_prompt(params: &SearchParams) -> String {
    let template_line = |field: LeadField| {
        let placeholder = match field {
            LeadField::Name => "[Business Name]",
            LeadField::Url => r#"[Website URL or "None"]"#,
            LeadField::Rating => r#"[Google Maps Rating/Review Count or "N/A"]"#,
            LeadField::Issue => "[One sentence explaining the SEO weakness]",
            LeadField::Action => r#"[One specific service to pitch, e.g., "Website Redesign", "Local SEO", "Reputation Management"]"#,
            LeadField::Description => {
                "[A brief 1-2 sentence overview of the business status found via search]"
            }
        };
        format!("{}: {}", field.key(), placeholder)
    };
    let template: Vec<String> = LeadField::ALL.iter().map(|f| template_line(*f)).collect();

    format!(
        r#"Find 5-7 real estate businesses (agents, agencies, property managers) in "{location}" related to "{niche}" that might need SEO services.
Use Google Maps to verify they exist and Google Search to analyze their digital presence.

Look for businesses that:
1. Have low ratings or few reviews on Maps.
2. Do not have a website listed, or have a website that appears outdated or hard to find.
3. Are not ranking at the top of search results for their main keywords.

Strictly format your response as a list of text blocks.
Do NOT use JSON markdown.
Use exactly this format for each lead found:

{delimiter}
{template}

If you cannot find specific details, write "N/A"."#,
        location = params.location,
        niche = params.niche,
        delimiter = LEAD_DELIMITER,
        template = template.join("\n"),
    )
}

pub async fn find_leads(
    gemini_client: &GeminiClient,
    params: &SearchParams,
) -> Result<SearchResult, QueryError> {
    log::info!(
        "Searching leads for niche {:?} in {:?}",
        params.niche,
        params.location
    );

    let prompt = build_prompt(params);
    let response = gemini_client
        .generate_content(&prompt)
        .await
        .map_err(|e| {
            log::error!("Gemini API Error: {:?}", e);
            classify(&e)
        })?;

    let result = search_result_from_response(&response);
    log::info!(
        "Parsed {} leads and {} sources from model response",
        result.leads.len(),
        result.sources.len()
    );

    Ok(result)
}

pub fn search_result_from_response(response: &GenerateContentResponse) -> SearchResult {
    let raw_text = response.text();
    let leads = parse_leads_from_text(&raw_text);

    SearchResult {
        leads,
        raw_text,
        sources: response.web_sources(),
    }
}

#[cfg(test)]
mod tests {
    use super::{build_prompt, search_result_from_response};
    use crate::{
        domain::search::{SearchParams, SearchResult},
        services::GenerateContentResponse,
    };

    #[test]
    fn empty_reply_is_an_empty_result() {
        let response: GenerateContentResponse =
            serde_json::from_value(serde_json::json!({"candidates": []})).unwrap();

        assert_eq!(
            search_result_from_response(&response),
            SearchResult {
                leads: vec![],
                raw_text: String::new(),
                sources: vec![],
            }
        );
    }

    #[test]
    fn reply_is_parsed_and_kept_raw() {
        let text = "Here you go.\n### LEAD\nName: Acme Realty\nURL: None\n";
        let response: GenerateContentResponse = serde_json::from_value(serde_json::json!({
            "candidates": [{
                "content": {"parts": [{"text": text}]},
                "groundingMetadata": {"groundingChunks": [
                    {"web": {"uri": "https://acme.example/", "title": "acme.example"}}
                ]}
            }]
        }))
        .unwrap();

        let result = search_result_from_response(&response);

        assert_eq!(result.raw_text, text);
        assert_eq!(result.leads.len(), 1);
        assert_eq!(result.leads[0].name, "Acme Realty");
        assert_eq!(result.leads[0].website(), None);
        assert_eq!(result.sources[0].url, "https://acme.example/");
    }

    #[test]
    fn prompt_embeds_params_verbatim() {
        let params = SearchParams {
            location: "Austin, TX".to_string(),
            niche: "luxury \"condos\"".to_string(),
        };
        let prompt = build_prompt(&params);

        assert!(prompt.contains(r#"in "Austin, TX""#));
        assert!(prompt.contains(r#"related to "luxury "condos"""#));
        assert!(prompt.contains("5-7"));
        assert!(prompt.contains("Google Maps"));
        assert!(prompt.contains("Google Search"));
        assert!(prompt.contains("Do NOT use JSON"));
    }

    #[test]
    fn prompt_template_keys_in_order() {
        let params = SearchParams {
            location: "Leeds".to_string(),
            niche: "lettings".to_string(),
        };
        let prompt = build_prompt(&params);

        let positions: Vec<usize> = [
            "### LEAD\n",
            "\nName: ",
            "\nURL: ",
            "\nRating: ",
            "\nIssue: ",
            "\nAction: ",
            "\nDescription: ",
        ]
        .iter()
        .map(|key| prompt.find(key).unwrap())
        .collect();

        let mut sorted = positions.clone();
        sorted.sort();
        assert_eq!(positions, sorted);
    }
}
