use serde::Serialize;

pub const LEAD_DELIMITER: &str = "### LEAD";

const NO_WEBSITE_SENTINELS: [&str; 2] = ["None", "N/A"];

const DEFAULT_URL: &str = "N/A";
const DEFAULT_RATING: &str = "N/A";
const DEFAULT_ISSUE: &str = "Unknown Issue";
const DEFAULT_ACTION: &str = "General SEO";
const DEFAULT_DESCRIPTION: &str = "No description available.";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Lead {
    pub id: String,
    pub name: String,
    pub url: String,
    pub rating: String,
    pub issue: String,
    pub action: String,
    pub description: String,
}

impl Lead {
    /// Link to the business website, or `None` when the model reported
    /// no site ("None", "N/A" or nothing at all).
    pub fn website(&self) -> Option<String> {
        let url = self.url.trim();
        if url.is_empty() || NO_WEBSITE_SENTINELS.contains(&url) {
            return None;
        }

        match url.starts_with("http") {
            true => Some(url.to_string()),
            false => Some(format!("https://{}", url)),
        }
    }
}

/// Keys of the template the model is asked to reproduce, in prompt order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LeadField {
    Name,
    Url,
    Rating,
    Issue,
    Action,
    Description,
}

impl LeadField {
    pub const ALL: [LeadField; 6] = [
        LeadField::Name,
        LeadField::Url,
        LeadField::Rating,
        LeadField::Issue,
        LeadField::Action,
        LeadField::Description,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            LeadField::Name => "Name",
            LeadField::Url => "URL",
            LeadField::Rating => "Rating",
            LeadField::Issue => "Issue",
            LeadField::Action => "Action",
            LeadField::Description => "Description",
        }
    }

    /// First line of the block starting with `<Key>:` that carries a value.
    fn find_in(&self, block: &str) -> Option<String> {
        let key = self.key();

        block
            .lines()
            .filter_map(|line| {
                line.trim_start()
                    .strip_prefix(key)
                    .and_then(|rest| rest.strip_prefix(':'))
                    .map(|value| value.trim())
            })
            .find(|value| !value.is_empty())
            .map(|value| value.to_string())
    }
}

pub fn parse_leads_from_text(text: &str) -> Vec<Lead> {
    text.split(LEAD_DELIMITER)
        .enumerate()
        .skip(1)
        .filter(|(_, block)| !block.trim().is_empty())
        .filter_map(|(index, block)| parse_lead_block(index, block))
        .collect()
}

fn parse_lead_block(index: usize, block: &str) -> Option<Lead> {
    let name = LeadField::Name.find_in(block)?;
    let field_or = |field: LeadField, default: &str| {
        field.find_in(block).unwrap_or_else(|| default.to_string())
    };

    Some(Lead {
        id: format!("lead-{}", index),
        name,
        url: field_or(LeadField::Url, DEFAULT_URL),
        rating: field_or(LeadField::Rating, DEFAULT_RATING),
        issue: field_or(LeadField::Issue, DEFAULT_ISSUE),
        action: field_or(LeadField::Action, DEFAULT_ACTION),
        description: field_or(LeadField::Description, DEFAULT_DESCRIPTION),
    })
}

#[cfg(test)]
mod tests {
    use super::{parse_leads_from_text, Lead};

    fn lead_with_url(url: &str) -> Lead {
        Lead {
            id: "lead-1".to_string(),
            name: "Acme Realty".to_string(),
            url: url.to_string(),
            rating: "N/A".to_string(),
            issue: "Unknown Issue".to_string(),
            action: "General SEO".to_string(),
            description: "No description available.".to_string(),
        }
    }

    #[test]
    fn parse_full_block() {
        let text = r#"Here is what I found in Austin.

### LEAD
Name: Hill Country Homes
URL: hillcountryhomes.com
Rating: 3.8 (12 reviews)
Issue: Website has no mobile layout and loads slowly.
Action: Website Redesign
Description: Small family agency with an outdated site.
"#;
        let leads = parse_leads_from_text(text);

        assert_eq!(
            leads,
            vec![Lead {
                id: "lead-1".to_string(),
                name: "Hill Country Homes".to_string(),
                url: "hillcountryhomes.com".to_string(),
                rating: "3.8 (12 reviews)".to_string(),
                issue: "Website has no mobile layout and loads slowly.".to_string(),
                action: "Website Redesign".to_string(),
                description: "Small family agency with an outdated site.".to_string(),
            }]
        );
    }

    #[test]
    fn block_without_name_is_dropped() {
        let text = "### LEAD\nURL: acme.com\nRating: 4.1\nIssue: No reviews\nAction: Local SEO\nDescription: Something\n### LEAD\nName: Second Realty\n";
        let leads = parse_leads_from_text(text);

        assert_eq!(leads.len(), 1);
        assert_eq!(leads[0].name, "Second Realty");
        assert_eq!(leads[0].id, "lead-2");
    }

    #[test]
    fn missing_fields_get_defaults() {
        let leads = parse_leads_from_text("### LEAD\nName: Acme Realty\n");

        assert_eq!(leads, vec![lead_with_url("N/A")]);
    }

    #[test]
    fn field_order_does_not_matter() {
        let ordered = "### LEAD\nName: Acme Realty\nURL: None\nRating: 2.9\nIssue: Few reviews\nAction: Reputation Management\nDescription: Solo agent.\n";
        let shuffled = "### LEAD\nName: Acme Realty\nDescription: Solo agent.\nAction: Reputation Management\nRating: 2.9\nURL: None\nIssue: Few reviews\n";

        assert_eq!(
            parse_leads_from_text(ordered),
            parse_leads_from_text(shuffled)
        );
    }

    #[test]
    fn three_delimiters_yield_three_leads_in_order() {
        let text = "Intro text\n### LEAD\nName: First\n### LEAD\nName: Second\n### LEAD\nName: Third\n";
        let leads = parse_leads_from_text(text);

        let names: Vec<&str> = leads.iter().map(|l| l.name.as_str()).collect();
        let ids: Vec<&str> = leads.iter().map(|l| l.id.as_str()).collect();
        assert_eq!(names, vec!["First", "Second", "Third"]);
        assert_eq!(ids, vec!["lead-1", "lead-2", "lead-3"]);
    }

    #[test]
    fn whitespace_block_is_skipped_without_shifting_ids() {
        let text = "### LEAD\nName: First\n### LEAD\n   \n\t\n### LEAD\nName: Third\n";
        let leads = parse_leads_from_text(text);

        let ids: Vec<&str> = leads.iter().map(|l| l.id.as_str()).collect();
        assert_eq!(ids, vec!["lead-1", "lead-3"]);
    }

    #[test]
    fn preamble_is_never_a_lead() {
        let leads = parse_leads_from_text("Name: Not A Lead\n### LEAD\nName: Real One\n");

        assert_eq!(leads.len(), 1);
        assert_eq!(leads[0].name, "Real One");
    }

    #[test]
    fn text_without_delimiter_yields_nothing() {
        assert!(parse_leads_from_text("I could not find any businesses.").is_empty());
        assert!(parse_leads_from_text("").is_empty());
    }

    #[test]
    fn keys_are_case_sensitive_and_line_anchored() {
        let text = "### LEAD\nBusiness Name: Wrong\nname: also wrong\nName: Right Realty\nurl: lower.com\n";
        let leads = parse_leads_from_text(text);

        assert_eq!(leads[0].name, "Right Realty");
        assert_eq!(leads[0].url, "N/A");
    }

    #[test]
    fn empty_name_value_is_not_a_match() {
        let leads = parse_leads_from_text("### LEAD\nName:   \nURL: acme.com\n");

        assert!(leads.is_empty());
    }

    #[test]
    fn first_match_wins_and_values_are_trimmed() {
        let leads = parse_leads_from_text("### LEAD\n  Name:   Acme Realty  \nName: Duplicate\n");

        assert_eq!(leads[0].name, "Acme Realty");
    }

    #[test]
    fn website_sentinels() {
        assert_eq!(lead_with_url("None").website(), None);
        assert_eq!(lead_with_url("N/A").website(), None);
        assert_eq!(lead_with_url("").website(), None);
        assert_eq!(
            lead_with_url("acme.com").website(),
            Some("https://acme.com".to_string())
        );
        assert_eq!(
            lead_with_url("http://acme.com").website(),
            Some("http://acme.com".to_string())
        );
    }
}
