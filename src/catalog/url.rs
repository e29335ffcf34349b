//! URL canonicalization.
//!
//! The catalog publishes the same page under `/solutions/products/...` and
//! `/products/...`, with and without trailing slashes and with partially
//! percent-encoded slugs. Every spelling maps to one identifier.

const VIEW_MARKER: &str = "/view/";
const SOLUTIONS_PATH: &str = "/solutions/products/product-catalog/view/";
const PRODUCTS_PATH: &str = "/products/product-catalog/view/";

fn decode_slug(s: &str) -> String {
    s.replace("%28", "(")
        .replace("%29", ")")
        .replace("%20", " ")
        .replace("%2d", "-")
}

/// Returns the canonical identifier for a URL (or a bare slug).
///
/// Idempotent: `canonicalize(&canonicalize(x)) == canonicalize(x)`.
pub fn canonicalize(url: &str) -> String {
    let lowered = url.trim().to_lowercase();
    let trimmed = lowered.trim_end_matches('/');

    let decoded = match trimmed.rfind(VIEW_MARKER) {
        Some(pos) => decode_slug(&trimmed[pos + VIEW_MARKER.len()..]),
        None => {
            let mut folded = trimmed.to_string();
            while folded.contains("/solutions/products/") {
                folded = folded.replace("/solutions/products/", "/products/");
            }
            decode_slug(&folded)
        }
    };

    // Decoding can expose whitespace (`%20`) at either end.
    decoded
        .trim_start()
        .trim_end_matches(|c: char| c == '/' || c.is_whitespace())
        .to_string()
}

/// Swaps between the `/solutions/products/` and `/products/` spellings.
///
/// The result is lower-cased. Returns `None` when the URL has neither.
pub fn alternate_spelling(url: &str) -> Option<String> {
    let lower = url.to_lowercase();
    let (pos, from, to) = if let Some(pos) = lower.find(SOLUTIONS_PATH) {
        (pos, SOLUTIONS_PATH, PRODUCTS_PATH)
    } else if let Some(pos) = lower.find(PRODUCTS_PATH) {
        (pos, PRODUCTS_PATH, SOLUTIONS_PATH)
    } else {
        return None;
    };

    let mut out = String::with_capacity(lower.len() + 10);
    out.push_str(&lower[..pos]);
    out.push_str(to);
    out.push_str(&lower[pos + from.len()..]);
    Some(out)
}

/// All spellings a catalog entry can be reached by, as lowercase keys.
pub fn url_variants<'a, I>(url: &str, alternates: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a String>,
{
    let mut out = Vec::new();
    let mut push = |s: &str| {
        let key = s.trim().to_lowercase().trim_end_matches('/').to_string();
        if !key.is_empty() && !out.contains(&key) {
            out.push(key);
        }
    };

    push(url);
    if let Some(alt) = alternate_spelling(url) {
        push(&alt);
    }
    for alt in alternates {
        push(alt);
        if let Some(swapped) = alternate_spelling(alt) {
            push(&swapped);
        }
    }
    out
}
