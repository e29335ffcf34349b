//! Duration ceiling extraction ("under 30 minutes", "1 hour 30 mins", "30-40 minutes").

use regex::Regex;

use super::error::QueryError;

const HALF_HOUR: u32 = 30;
const ONE_HOUR: u32 = 60;

/// Compiled duration grammar.
///
/// Matches are taken in passes (compound, range, word-form hours, single) and
/// each pass masks what it consumed, so "1 hour 30 minutes" yields 90 and not
/// also 60 and 30. The smallest value found is the ceiling.
#[derive(Debug, Clone)]
pub struct DurationParser {
    compound: Regex,
    range: Regex,
    half_hour: Regex,
    one_hour: Regex,
    single: Regex,
    hour_units: Vec<String>,
}

fn alternation(units: &[String]) -> String {
    let mut sorted: Vec<&String> = units.iter().filter(|u| !u.is_empty()).collect();
    sorted.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
    sorted
        .iter()
        .map(|u| regex::escape(&u.to_lowercase()))
        .collect::<Vec<_>>()
        .join("|")
}

fn compile(pattern: &str) -> Result<Regex, QueryError> {
    Regex::new(pattern).map_err(|e| QueryError::InvalidPattern {
        pattern: pattern.to_string(),
        reason: e.to_string(),
    })
}

impl DurationParser {
    pub fn new(minute_units: &[String], hour_units: &[String]) -> Result<Self, QueryError> {
        if minute_units.is_empty() || hour_units.is_empty() {
            return Err(QueryError::InvalidPattern {
                pattern: String::new(),
                reason: "duration units must not be empty".to_string(),
            });
        }
        let minutes = alternation(minute_units);
        let hours = alternation(hour_units);
        let any_unit = format!("{hours}|{minutes}");

        Ok(Self {
            compound: compile(&format!(
                r"\b(\d+)\s*(?:{hours})\s*(?:and\s+)?(\d+)\s*(?:{minutes})\b"
            ))?,
            range: compile(&format!(
                r"\b(\d+(?:\.\d+)?)\s*(?:-|–|to)\s*(\d+(?:\.\d+)?)\s*({any_unit})\b"
            ))?,
            half_hour: compile(r"\bhalf\s+(?:an\s+)?hour\b")?,
            one_hour: compile(r"\b(?:an|one)\s+hour\b")?,
            single: compile(&format!(r"\b(\d+(?:\.\d+)?)\s*({any_unit})\b"))?,
            hour_units: hour_units.iter().map(|u| u.to_lowercase()).collect(),
        })
    }

    fn to_minutes(&self, value: &str, unit: &str) -> Option<u32> {
        let v: f32 = value.parse().ok()?;
        let minutes = if self.hour_units.iter().any(|u| u == unit) {
            v * 60.0
        } else {
            v
        };
        let rounded = minutes.round();
        (rounded >= 1.0 && rounded <= u32::MAX as f32).then_some(rounded as u32)
    }

    /// Smallest duration mentioned in `text`, in minutes.
    pub fn parse(&self, text: &str) -> Option<u32> {
        let mut work = text.to_lowercase();
        let mut found: Vec<u32> = Vec::new();

        let spans: Vec<(usize, usize, Option<u32>)> = self
            .compound
            .captures_iter(&work)
            .filter_map(|c| {
                let m = c.get(0)?;
                let h: u32 = c.get(1)?.as_str().parse().ok()?;
                let mins: u32 = c.get(2)?.as_str().parse().ok()?;
                Some((m.start(), m.end(), h.checked_mul(60)?.checked_add(mins)))
            })
            .collect();
        mask(&mut work, &spans, &mut found);

        let spans: Vec<(usize, usize, Option<u32>)> = self
            .range
            .captures_iter(&work)
            .filter_map(|c| {
                let m = c.get(0)?;
                let unit = c.get(3)?.as_str();
                let low = self.to_minutes(c.get(1)?.as_str(), unit);
                let high = self.to_minutes(c.get(2)?.as_str(), unit);
                Some((m.start(), m.end(), high.max(low)))
            })
            .collect();
        mask(&mut work, &spans, &mut found);

        let spans: Vec<(usize, usize, Option<u32>)> = self
            .half_hour
            .find_iter(&work)
            .map(|m| (m.start(), m.end(), Some(HALF_HOUR)))
            .collect();
        mask(&mut work, &spans, &mut found);

        let spans: Vec<(usize, usize, Option<u32>)> = self
            .one_hour
            .find_iter(&work)
            .map(|m| (m.start(), m.end(), Some(ONE_HOUR)))
            .collect();
        mask(&mut work, &spans, &mut found);

        let spans: Vec<(usize, usize, Option<u32>)> = self
            .single
            .captures_iter(&work)
            .filter_map(|c| {
                let m = c.get(0)?;
                let value = self.to_minutes(c.get(1)?.as_str(), c.get(2)?.as_str());
                Some((m.start(), m.end(), value))
            })
            .collect();
        mask(&mut work, &spans, &mut found);

        found.into_iter().min()
    }
}

/// Records values and blanks their spans (byte-length preserving).
fn mask(work: &mut String, spans: &[(usize, usize, Option<u32>)], found: &mut Vec<u32>) {
    for &(start, end, value) in spans {
        if let Some(v) = value {
            found.push(v);
        }
        work.replace_range(start..end, &" ".repeat(end - start));
    }
}
