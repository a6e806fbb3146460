//! Heuristic field extraction from business card text.
//!
//! Used when the vision model does not return parseable JSON. Every field is
//! extracted independently with ordered regex and keyword passes, and the
//! first applicable rule wins. A single line may therefore land in several
//! slots at once: a "Director, Finance Corp" line is both title and company.

use regex::Regex;
use std::collections::HashSet;
use std::sync::OnceLock;
use tracing::debug;

use crate::card::BusinessCard;
use crate::industry;

const NOTES_SEPARATOR: &str = " | ";
const NOTES_MIN_CHARS: usize = 3;
const NOTES_MAX_CHARS: usize = 100;

/// Terms that disqualify the first line from the name fallback.
const BUSINESS_TERMS: [&str; 8] = [
    "inc",
    "llc",
    "corp",
    "company",
    "ltd",
    "co",
    "group",
    "associates",
];

const TITLE_KEYWORDS: [&str; 25] = [
    "manager",
    "director",
    "president",
    "ceo",
    "cto",
    "cfo",
    "vp",
    "vice president",
    "senior",
    "lead",
    "head",
    "chief",
    "executive",
    "officer",
    "coordinator",
    "specialist",
    "analyst",
    "consultant",
    "advisor",
    "developer",
    "engineer",
    "designer",
    "architect",
    "supervisor",
    "administrator",
];

const COMPANY_KEYWORDS: [&str; 25] = [
    "inc",
    "llc",
    "corp",
    "corporation",
    "company",
    "ltd",
    "limited",
    "co",
    "group",
    "associates",
    "partners",
    "solutions",
    "systems",
    "technologies",
    "consulting",
    "services",
    "enterprises",
    "ventures",
    "finance",
    "bank",
    "capital",
    "investment",
    "holdings",
    "international",
    "global",
];

/// Narrower keyword set for the second company pass.
const COMPANY_FALLBACK_KEYWORDS: [&str; 6] = ["finance", "company", "corp", "inc", "ltd", "group"];

/// Compiled pattern tables, shared by every extraction.
struct Patterns {
    email: Regex,
    phones: Vec<Regex>,
    country_code: Regex,
    website: Regex,
    names: Vec<Regex>,
    addresses: Vec<Regex>,
}

static PATTERNS: OnceLock<Patterns> = OnceLock::new();

#[expect(
    clippy::expect_used,
    reason = "Static regex patterns validated at compile time"
)]
fn patterns() -> &'static Patterns {
    PATTERNS.get_or_init(|| {
        let compile = |pattern: &str| {
            Regex::new(pattern).expect("Static regex pattern is guaranteed to be valid")
        };

        Patterns {
            email: compile(r"(?-u:\b)[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}(?-u:\b)"),
            phones: [
                // (415) 555-0100, 415-555-0100, +1 415 555 0100
                r"(\+?1[-.\s]?)?\(?([0-9]{3})\)?[-.\s]?([0-9]{3})[-.\s]?([0-9]{4})",
                // +65 1234 5678, +65-1234-5678
                r"(\+[0-9]{1,3}[-.\s]?)?([0-9]{1,4}[-.\s]?[0-9]{1,4}[-.\s]?[0-9]{1,4})",
                // P 9833 2268
                r"[Pp]\s*([0-9]{4}\s*[0-9]{4})",
                r"(?-u:\b)[0-9]{2,4}[-.\s]?[0-9]{2,4}[-.\s]?[0-9]{2,4}(?-u:\b)",
            ]
            .into_iter()
            .map(compile)
            .collect(),
            country_code: compile(r"\(\+[0-9]+\)\s*"),
            website: compile(r"(https?://)?(www\.)?[a-zA-Z0-9-]+\.[a-zA-Z]{2,}(/[^\s]*)?"),
            names: [
                r"^[A-Z][a-z]+ [A-Z][a-z]+$",
                r"^[A-Z][a-z]+ [A-Z]\. [A-Z][a-z]+$",
                r"^[A-Z][a-z]+ [A-Z][a-z]+ [A-Z][a-z]+$",
            ]
            .into_iter()
            .map(compile)
            .collect(),
            addresses: [
                // 123 Main Street, Springfield, IL 62704
                r"(?i)[0-9]+\s+[A-Za-z\s]+(?:Street|St|Avenue|Ave|Road|Rd|Drive|Dr|Lane|Ln|Boulevard|Blvd).*?(?:,\s*)?[A-Za-z\s]+,?\s*[A-Z]{2}\s*[0-9]{5}(?:-[0-9]{4})?",
                // 71 Ayer Rajah Crescent #05-01 Singapore 139951
                r"(?i)[0-9]+\s+[A-Za-z\s]+(?:Street|St|Avenue|Ave|Road|Rd|Drive|Dr|Lane|Ln|Boulevard|Blvd|Crescent|Cres|Way|Place|Pl|Close|Cl|Terrace|Ter|Square|Sq|Park|Pk|Gardens|Gdns|Heights|Hts|View|Vw|Hill|Rise|Green|Grove|Valley|Vale|Meadows|Manor|Court|Ct).*?(?:#[0-9]+-[0-9]+)?\s*(?:Singapore|SGP)?\s*[0-9]{6}",
                // 5F DMG Center, D. M. Guevara St.
                r"(?i)[0-9]+[A-Za-z]?\s+[A-Za-z\s]+(?:Center|Centre|Building|Bldg|Tower|Plaza|Mall|Complex|St|Street|Ave|Avenue|Road|Rd|Drive|Dr|Lane|Ln|Boulevard|Blvd|Crescent|Cres|Way|Place|Pl|Close|Cl|Terrace|Ter|Square|Sq|Park|Pk|Gardens|Gdns|Heights|Hts|View|Vw|Hill|Rise|Green|Grove|Valley|Vale|Meadows|Manor|Court|Ct)",
                r"(?i)[0-9]+[A-Za-z]?\s+[A-Za-z\s]+(?:Street|St|Avenue|Ave|Road|Rd|Drive|Dr|Lane|Ln|Boulevard|Blvd|Crescent|Cres|Way|Place|Pl|Close|Cl|Terrace|Ter|Square|Sq|Park|Pk|Gardens|Gdns|Heights|Hts|View|Vw|Hill|Rise|Green|Grove|Valley|Vale|Meadows|Manor|Court|Ct|Center|Centre|Building|Bldg|Tower|Plaza|Mall|Complex)",
            ]
            .into_iter()
            .map(compile)
            .collect(),
        }
    })
}

impl Patterns {
    fn is_email(&self, line: &str) -> bool {
        self.email.is_match(line)
    }

    fn is_phone(&self, line: &str) -> bool {
        self.phones.iter().any(|re| re.is_match(line))
    }

    fn is_website(&self, line: &str) -> bool {
        self.website.is_match(line)
    }

    fn is_contact_line(&self, line: &str) -> bool {
        self.is_email(line) || self.is_phone(line) || self.is_website(line)
    }
}

fn contains_any(line: &str, keywords: &[&str]) -> bool {
    let lower = line.to_lowercase();
    keywords.iter().any(|keyword| lower.contains(keyword))
}

/// Extract a partial record from free-form card text.
///
/// Never fails: a field with no matching rule is left `None`. The output is
/// not normalized; pass it through [`crate::normalize`] before use.
#[must_use]
pub fn extract_fields(text: &str) -> BusinessCard {
    let patterns = patterns();
    let lines: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();

    let mut card = BusinessCard {
        email: extract_email(patterns, text),
        phone: extract_phone(patterns, text),
        website: extract_website(patterns, text),
        name: extract_name(patterns, &lines),
        title: extract_title(&lines),
        company: extract_company(patterns, &lines),
        address: extract_address(patterns, &lines),
        industry: extract_industry(&lines),
        notes: None,
    };
    card.notes = extract_notes(patterns, &lines, &card);

    debug!(
        "Heuristic extraction filled {} fields from {} lines",
        card.present_fields().count(),
        lines.len()
    );

    card
}

fn extract_email(patterns: &Patterns, text: &str) -> Option<String> {
    patterns.email.find(text).map(|m| m.as_str().to_string())
}

fn extract_phone(patterns: &Patterns, text: &str) -> Option<String> {
    let found = patterns.phones.iter().find_map(|re| re.find(text))?;
    Some(clean_phone(patterns, found.as_str()))
}

/// Drop a parenthesized country code such as `(+63)` and collapse spacing.
fn clean_phone(patterns: &Patterns, raw: &str) -> String {
    let without_code = patterns.country_code.replace(raw.trim(), "");
    without_code.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// First website-shaped match that is not part of an email address.
fn extract_website(patterns: &Patterns, text: &str) -> Option<String> {
    let emails: Vec<(usize, usize)> = patterns
        .email
        .find_iter(text)
        .map(|m| (m.start(), m.end()))
        .collect();

    patterns
        .website
        .find_iter(text)
        .find(|m| {
            !emails
                .iter()
                .any(|&(start, end)| m.start() < end && start < m.end())
        })
        .map(|m| m.as_str().to_string())
}

fn extract_name(patterns: &Patterns, lines: &[&str]) -> Option<String> {
    if let Some(line) = lines
        .iter()
        .find(|line| patterns.names.iter().any(|re| re.is_match(line)))
    {
        return Some((*line).to_string());
    }

    let first = lines.first()?;
    let capitalized = first.chars().next().is_some_and(char::is_uppercase);
    if capitalized
        && !contains_any(first, &BUSINESS_TERMS)
        && !patterns.is_email(first)
        && !patterns.is_phone(first)
    {
        return Some((*first).to_string());
    }

    None
}

fn extract_title(lines: &[&str]) -> Option<String> {
    lines
        .iter()
        .find(|line| contains_any(line, &TITLE_KEYWORDS))
        .map(|line| (*line).to_string())
}

fn extract_company(patterns: &Patterns, lines: &[&str]) -> Option<String> {
    lines
        .iter()
        .find(|line| contains_any(line, &COMPANY_KEYWORDS))
        .or_else(|| {
            lines.iter().find(|line| {
                !patterns.is_contact_line(line) && contains_any(line, &COMPANY_FALLBACK_KEYWORDS)
            })
        })
        .map(|line| (*line).to_string())
}

fn extract_address(patterns: &Patterns, lines: &[&str]) -> Option<String> {
    lines
        .iter()
        .find(|line| patterns.addresses.iter().any(|re| re.is_match(line)))
        .map(|line| (*line).to_string())
}

fn extract_industry(lines: &[&str]) -> Option<String> {
    lines
        .iter()
        .find_map(|line| industry::match_label(line))
        .or_else(|| lines.iter().find_map(|line| industry::match_keyword(line)))
        .map(str::to_string)
}

/// Leftover lines that no other rule claimed.
fn extract_notes(patterns: &Patterns, lines: &[&str], card: &BusinessCard) -> Option<String> {
    let used: HashSet<&str> = [
        card.name.as_deref(),
        card.title.as_deref(),
        card.company.as_deref(),
        card.address.as_deref(),
        card.industry.as_deref(),
    ]
    .into_iter()
    .flatten()
    .collect();

    let remaining: Vec<&str> = lines
        .iter()
        .copied()
        .filter(|line| {
            let chars = line.chars().count();
            !used.contains(line)
                && !patterns.is_contact_line(line)
                && chars > NOTES_MIN_CHARS
                && chars < NOTES_MAX_CHARS
        })
        .collect();

    if remaining.is_empty() {
        None
    } else {
        Some(remaining.join(NOTES_SEPARATOR))
    }
}
