use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::catalog::Assessment;

/// Descriptions are cut to this many characters in the prompt.
const DESCRIPTION_CHARS: usize = 200;

static URLS: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r#"https?://[^\s"'<>\]\[,)]+"#).ok());

const SYSTEM_PROMPT: &str = "You rank assessment products for a hiring query. \
Reply with a JSON array of the candidate URLs, most relevant first. \
Include only URLs from the candidate list. No commentary.";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JudgeCandidate {
    pub url: String,
    pub name: String,
    pub description: String,
    pub duration_minutes: Option<u32>,
    pub test_types: Vec<String>,
}

impl From<&Assessment> for JudgeCandidate {
    fn from(a: &Assessment) -> Self {
        Self {
            url: a.url.clone(),
            name: a.name.clone(),
            description: a.description.chars().take(DESCRIPTION_CHARS).collect(),
            duration_minutes: a.duration_minutes,
            test_types: a.test_type_labels(),
        }
    }
}

/// Query plus a compact listing of the candidates to rank.
#[derive(Debug, Clone, PartialEq)]
pub struct JudgePrompt {
    pub query: String,
    pub candidates: Vec<JudgeCandidate>,
}

impl JudgePrompt {
    pub fn system(&self) -> &'static str {
        SYSTEM_PROMPT
    }

    pub fn user(&self) -> String {
        let mut out = format!("Query:\n{}\n\nCandidates:\n", self.query);
        for (i, c) in self.candidates.iter().enumerate() {
            let duration = c
                .duration_minutes
                .map_or_else(|| "unknown".to_string(), |d| format!("{d} min"));
            out.push_str(&format!(
                "{}. {} | {} | {} | {}\n   {}\n",
                i + 1,
                c.name,
                c.url,
                duration,
                c.test_types.join(", "),
                c.description
            ));
        }
        out.push_str("\nReturn the JSON array of URLs now.");
        out
    }
}

/// Extracts the ranked URL list from a judge reply.
///
/// Accepts a JSON array of strings or of `{"url": ...}` objects, optionally
/// inside a markdown fence or surrounding prose. Falls back to scraping
/// http(s) URLs in order of appearance.
pub fn parse_ranked_urls(reply: &str) -> Vec<String> {
    let body = strip_fences(reply.trim());

    if let Some(urls) = parse_json_array(body) {
        return urls;
    }
    if let (Some(start), Some(end)) = (body.find('['), body.rfind(']')) {
        if start < end {
            if let Some(urls) = parse_json_array(&body[start..=end]) {
                return urls;
            }
        }
    }

    let Some(re) = URLS.as_ref() else {
        return Vec::new();
    };
    re.find_iter(body)
        .map(|m| m.as_str().trim_end_matches(['.', ';']).to_string())
        .collect()
}

fn strip_fences(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    // Drop the language tag line.
    let rest = rest.split_once('\n').map_or("", |(_, body)| body);
    rest.trim_end().strip_suffix("```").unwrap_or(rest).trim()
}

fn parse_json_array(text: &str) -> Option<Vec<String>> {
    let values: Vec<serde_json::Value> = serde_json::from_str(text).ok()?;
    let urls: Vec<String> = values
        .iter()
        .filter_map(|v| match v {
            serde_json::Value::String(s) => Some(s.trim().to_string()),
            serde_json::Value::Object(o) => o.get("url").and_then(|u| u.as_str()).map(str::to_string),
            _ => None,
        })
        .filter(|s| !s.is_empty())
        .collect();
    Some(urls)
}
