//! Closed industry label set and keyword mapping.
//!
//! The labels mirror the single-select options of the destination table, so
//! every industry written out should be one of [`INDUSTRY_LABELS`]. Both
//! tables are ordered: the first hit wins.

/// Industry labels accepted by the destination table.
pub const INDUSTRY_LABELS: [&str; 18] = [
    "Banking & Finance",
    "Investment & Private Equity",
    "Technology & Software",
    "Real Estate & Property Development",
    "Hospitality & Leisure",
    "Food & Beverage",
    "Professional Services",
    "Logistics & Transportation",
    "Retail & Consumer Goods",
    "Telecommunications",
    "Manufacturing & Industrial",
    "Education & Training",
    "Energy & Utilities",
    "Government & Nonprofit",
    "Media & Advertising",
    "Healthcare & Pharmaceutical",
    "Agriculture",
    "Personal Services",
];

/// Keyword to label mapping, scanned in order.
pub const INDUSTRY_KEYWORDS: [(&str, &str); 46] = [
    ("banking", "Banking & Finance"),
    ("finance", "Banking & Finance"),
    ("financial", "Banking & Finance"),
    ("investment", "Investment & Private Equity"),
    ("private equity", "Investment & Private Equity"),
    ("venture capital", "Investment & Private Equity"),
    ("vc", "Investment & Private Equity"),
    ("technology", "Technology & Software"),
    ("tech", "Technology & Software"),
    ("software", "Technology & Software"),
    ("it", "Technology & Software"),
    ("real estate", "Real Estate & Property Development"),
    ("property", "Real Estate & Property Development"),
    ("development", "Real Estate & Property Development"),
    ("hospitality", "Hospitality & Leisure"),
    ("hotel", "Hospitality & Leisure"),
    ("leisure", "Hospitality & Leisure"),
    ("food", "Food & Beverage"),
    ("beverage", "Food & Beverage"),
    ("restaurant", "Food & Beverage"),
    ("professional services", "Professional Services"),
    ("consulting", "Professional Services"),
    ("legal", "Professional Services"),
    ("law", "Professional Services"),
    ("logistics", "Logistics & Transportation"),
    ("transportation", "Logistics & Transportation"),
    ("shipping", "Logistics & Transportation"),
    ("retail", "Retail & Consumer Goods"),
    ("consumer goods", "Retail & Consumer Goods"),
    ("telecommunications", "Telecommunications"),
    ("telecom", "Telecommunications"),
    ("manufacturing", "Manufacturing & Industrial"),
    ("industrial", "Manufacturing & Industrial"),
    ("education", "Education & Training"),
    ("training", "Education & Training"),
    ("energy", "Energy & Utilities"),
    ("utilities", "Energy & Utilities"),
    ("government", "Government & Nonprofit"),
    ("nonprofit", "Government & Nonprofit"),
    ("media", "Media & Advertising"),
    ("advertising", "Media & Advertising"),
    ("healthcare", "Healthcare & Pharmaceutical"),
    ("medical", "Healthcare & Pharmaceutical"),
    ("pharmaceutical", "Healthcare & Pharmaceutical"),
    ("agriculture", "Agriculture"),
    ("personal services", "Personal Services"),
];

/// First label contained in `line`, case-insensitively.
#[must_use]
pub fn match_label(line: &str) -> Option<&'static str> {
    let lower = line.to_lowercase();
    INDUSTRY_LABELS
        .iter()
        .find(|label| lower.contains(&label.to_lowercase()))
        .copied()
}

/// Label of the first keyword contained in `line`, in table order.
#[must_use]
pub fn match_keyword(line: &str) -> Option<&'static str> {
    let lower = line.to_lowercase();
    INDUSTRY_KEYWORDS
        .iter()
        .find(|(keyword, _)| lower.contains(keyword))
        .map(|(_, label)| *label)
}

/// Label of the first keyword present in `value` as whole words.
///
/// Unlike [`match_keyword`], "it" does not hit inside "utilities".
#[must_use]
pub fn match_keyword_words(value: &str) -> Option<&'static str> {
    let words: Vec<String> = value
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
        .collect();
    let padded = format!(" {} ", words.join(" "));

    INDUSTRY_KEYWORDS
        .iter()
        .find(|(keyword, _)| padded.contains(&format!(" {keyword} ")))
        .map(|(_, label)| *label)
}

/// Coerce a model-supplied industry value onto the closed label set.
///
/// An exact label (ignoring case) wins, then a label contained in the value,
/// then the keyword table matched on whole words.
#[must_use]
pub fn canonical_industry(value: &str) -> Option<&'static str> {
    let trimmed = value.trim();
    INDUSTRY_LABELS
        .iter()
        .find(|label| label.eq_ignore_ascii_case(trimmed))
        .copied()
        .or_else(|| match_label(trimmed))
        .or_else(|| match_keyword_words(trimmed))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_keyword_maps_to_a_known_label() {
        for (keyword, label) in INDUSTRY_KEYWORDS {
            assert!(INDUSTRY_LABELS.contains(&label), "{keyword} -> {label}");
        }
    }

    #[test]
    fn label_match_is_case_insensitive() {
        assert_eq!(
            match_label("Leaders in FOOD & BEVERAGE since 1990"),
            Some("Food & Beverage")
        );
        assert_eq!(match_label("Food and beverage"), None);
    }

    #[test]
    fn keyword_order_decides_ties() {
        // "fintech" has no "finance" substring, so "tech" is the first hit
        assert_eq!(
            match_keyword("We specialize in fintech solutions"),
            Some("Technology & Software")
        );
        assert_eq!(match_keyword("Financial advisory"), Some("Banking & Finance"));
        // "it" is a bare substring and catches surnames
        assert_eq!(match_keyword("John Smith"), Some("Technology & Software"));
        assert_eq!(match_keyword("hello world"), None);
    }

    #[test]
    fn canonical_industry_prefers_exact_labels() {
        assert_eq!(canonical_industry("agriculture"), Some("Agriculture"));
        assert_eq!(canonical_industry("Hotel chain"), Some("Hospitality & Leisure"));
        assert_eq!(canonical_industry("Mining"), None);
    }

    #[test]
    fn canonical_industry_keeps_model_answers() {
        assert_eq!(canonical_industry("Hospitality"), Some("Hospitality & Leisure"));
        assert_eq!(canonical_industry("Utilities"), Some("Energy & Utilities"));
        assert_eq!(canonical_industry("Nonprofit"), Some("Government & Nonprofit"));
        assert_eq!(
            canonical_industry("Hospitality & Leisure industry"),
            Some("Hospitality & Leisure")
        );
        assert_eq!(canonical_industry("IT services"), Some("Technology & Software"));
        assert_eq!(canonical_industry("fintech"), None);
    }

    #[test]
    fn whole_word_keywords_span_multiple_words() {
        assert_eq!(
            match_keyword_words("Private-Equity fund"),
            Some("Investment & Private Equity")
        );
        assert_eq!(match_keyword_words("Lawson Partners"), None);
    }
}
