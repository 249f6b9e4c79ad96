//! Prompt interpreter: pulls a bounded set of fields out of free text.
//!
//! Every extractor is independent and total. A prompt with no usable signal
//! still yields a complete [`StructuredDescription`] built from defaults, so
//! [`interpret`] never fails.

use std::sync::OnceLock;

use regex::Regex;

use crate::design::{ContactInfo, DesignType, StructuredDescription};

/// Company name used when the prompt doesn't name one
pub const DEFAULT_COMPANY_NAME: &str = "Your Business";
/// Palette used when the prompt names no known color
pub const DEFAULT_PALETTE: [&str; 2] = ["#667eea", "#FFFFFF"];
/// Maximum number of palette entries kept
pub const MAX_PALETTE: usize = 3;

/// Named colors in lookup order. The palette follows this order, not prompt order.
pub const NAMED_COLORS: [(&str, &str); 16] = [
    ("red", "#FF0000"),
    ("blue", "#0066CC"),
    ("green", "#00AA00"),
    ("yellow", "#FFD700"),
    ("orange", "#FF8800"),
    ("purple", "#8B00FF"),
    ("pink", "#FF69B4"),
    ("black", "#000000"),
    ("white", "#FFFFFF"),
    ("gray", "#808080"),
    ("grey", "#808080"),
    ("brown", "#8B4513"),
    ("navy", "#000080"),
    ("teal", "#008080"),
    ("gold", "#FFD700"),
    ("silver", "#C0C0C0"),
];

// `<word> name "X"` after one of these names a business, not a person.
const NON_PERSON_NAME_PREFIXES: [&str; 5] = ["company", "business", "store", "service", "brand"];

struct Patterns {
    company: [Regex; 3],
    quoted: Regex,
    phone: Regex,
    email: Regex,
    website: Regex,
    address: Regex,
    person_name: Regex,
    title: Regex,
}

fn compile(pattern: &str) -> Regex {
    // Patterns are literals in this module; a failure here is a programming error.
    Regex::new(pattern).unwrap_or_else(|e| panic!("invalid built-in pattern {pattern:?}: {e}"))
}

fn patterns() -> &'static Patterns {
    static PATTERNS: OnceLock<Patterns> = OnceLock::new();
    PATTERNS.get_or_init(|| Patterns {
        company: [
            compile(r#"(?i)(?:called|named)\s+["']([^"']+)["']"#),
            compile(r#"(?i)(?:company|business|store|service)\s+["']([^"']+)["']"#),
            compile(r#"(?i)for\s+["']([^"']+)["']"#),
        ],
        quoted: compile(r#"["']([^"']+)["']"#),
        phone: compile(r"\(?\d{3}\)?[-.\s]?\d{3}[-.\s]?\d{4}"),
        email: compile(r"[\w.-]+@[\w.-]+\.\w+"),
        website: compile(r"(?i)(?:www\.)?[\w-]+\.(?:com|net|org|io|co)"),
        address: compile(
            r"(?i)\d+\s+[\w\s]+(?:Street|St|Avenue|Ave|Road|Rd|Boulevard|Blvd|Lane|Ln|Drive|Dr)[\w\s,]*",
        ),
        person_name: compile(r#"(?i)(?:(\w+)\s+)?\bname:?\s+["']([^"']+)["']"#),
        title: compile(r#"(?i)\btitle:?\s+["']([^"']+)["']"#),
    })
}

/// Interpret a prompt for the given design type.
pub fn interpret(prompt: &str, design_type: DesignType) -> StructuredDescription {
    let description = StructuredDescription {
        design_type,
        colors: extract_palette(prompt),
        text_content: extract_quoted(prompt),
        company_name: extract_company_name(prompt),
        contact_info: extract_contact_info(prompt),
        raw_prompt: prompt.to_string(),
    };
    log::debug!(
        "interpreted {} prompt: company={:?} palette={:?} quotes={}",
        design_type,
        description.company_name,
        description.colors,
        description.text_content.len()
    );
    description
}

/// Named colors appearing anywhere in the prompt (substrings count, so
/// "reddish" is red), in table order, deduplicated by hex, at most three.
pub fn extract_palette(prompt: &str) -> Vec<String> {
    let lower = prompt.to_lowercase();

    let mut palette: Vec<String> = Vec::new();
    for (name, hex) in NAMED_COLORS {
        if palette.len() == MAX_PALETTE {
            break;
        }
        if lower.contains(name) && !palette.iter().any(|h| h == hex) {
            palette.push(hex.to_string());
        }
    }

    if palette.is_empty() {
        palette = DEFAULT_PALETTE.iter().map(|s| s.to_string()).collect();
    }
    palette
}

/// Company name from the first matching pattern, or [`DEFAULT_COMPANY_NAME`].
pub fn extract_company_name(prompt: &str) -> String {
    patterns()
        .company
        .iter()
        .find_map(|re| re.captures(prompt).and_then(|c| c.get(1)))
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| DEFAULT_COMPANY_NAME.to_string())
}

/// Every quoted fragment, in prompt order, without its quotes.
pub fn extract_quoted(prompt: &str) -> Vec<String> {
    patterns()
        .quoted
        .captures_iter(prompt)
        .filter_map(|c| c.get(1))
        .map(|m| m.as_str().to_string())
        .collect()
}

pub fn extract_contact_info(prompt: &str) -> ContactInfo {
    let p = patterns();
    ContactInfo {
        name: extract_person_name(prompt),
        title: first_group(&p.title, prompt),
        phone: first_match(&p.phone, prompt),
        email: first_match(&p.email, prompt),
        website: first_match(&p.website, prompt),
        address: first_match(&p.address, prompt),
    }
}

fn extract_person_name(prompt: &str) -> Option<String> {
    patterns()
        .person_name
        .captures_iter(prompt)
        .filter(|c| {
            c.get(1)
                .map(|w| !NON_PERSON_NAME_PREFIXES.contains(&w.as_str().to_lowercase().as_str()))
                .unwrap_or(true)
        })
        .find_map(|c| c.get(2))
        .map(|m| m.as_str().to_string())
}

fn first_match(re: &Regex, haystack: &str) -> Option<String> {
    re.find(haystack)
        .map(|m| m.as_str().trim().to_string())
        .filter(|s| !s.is_empty())
}

fn first_group(re: &Regex, haystack: &str) -> Option<String> {
    re.captures(haystack).and_then(|c| c.get(1)).map(|m| m.as_str().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const CARD_PROMPT: &str = r#"Create a modern business card for a tech startup called "InnovateTech". Use blue and white colors. Include the name "John Smith", title "CEO & Founder", phone "(555) 123-4567", email "john@innovatetech.com", and website "www.innovatetech.com"."#;
    const FLYER_PROMPT: &str = r#"Design a promotional flyer for a grand opening sale. Title: "Grand Opening - 50% OFF Everything!" Include store name "Fashion Hub", date "October 15, 2025", address "123 Main St, Downtown", and phone "(555) 987-6543". Use bold red and yellow colors with an energetic design."#;

    #[test]
    fn palette_follows_table_order_not_prompt_order() {
        assert_eq!(extract_palette("white then blue"), vec!["#0066CC", "#FFFFFF"]);
    }

    #[test]
    fn palette_dedupes_and_caps() {
        // yellow and gold share a hex; gray and grey too
        let p = extract_palette("red yellow gold gray grey silver");
        assert_eq!(p, vec!["#FF0000", "#FFD700", "#808080"]);
        let p = extract_palette("Red, BLUE, green, black, white");
        assert_eq!(p.len(), MAX_PALETTE);
    }

    #[test]
    fn palette_defaults_without_colors() {
        assert_eq!(extract_palette("nothing colorful here"), vec!["#667eea", "#FFFFFF"]);
        assert_eq!(extract_palette(""), vec!["#667eea", "#FFFFFF"]);
    }

    #[test]
    fn palette_matches_inside_words() {
        assert_eq!(extract_palette("a greenery themed flyer with reddish accents"), vec!["#FF0000", "#00AA00"]);
        assert_eq!(extract_palette("Fred covered the credit"), vec!["#FF0000"]);
        assert_eq!(extract_palette("GOLDEN hour"), vec!["#FFD700"]);
    }

    #[test]
    fn company_name_pattern_precedence() {
        assert_eq!(extract_company_name(CARD_PROMPT), "InnovateTech");
        assert_eq!(extract_company_name(r#"a flyer for 'Joe's"#), "Joe");
        assert_eq!(extract_company_name(r#"for "Second" company "First""#), "First");
        // "store name" puts a word between keyword and quote, so nothing matches
        assert_eq!(extract_company_name(FLYER_PROMPT), DEFAULT_COMPANY_NAME);
        assert_eq!(extract_company_name(r#"a lawn care service "Green Paradise""#), "Green Paradise");
        assert_eq!(extract_company_name("no quotes at all"), DEFAULT_COMPANY_NAME);
    }

    #[test]
    fn quotes_are_collected_in_order() {
        let q = extract_quoted(r#"one "alpha" two 'beta' three "gamma""#);
        assert_eq!(q, vec!["alpha", "beta", "gamma"]);
        assert!(extract_quoted("none").is_empty());
    }

    #[test]
    fn contact_fields_from_card_prompt() {
        let info = extract_contact_info(CARD_PROMPT);
        assert_eq!(info.phone.as_deref(), Some("(555) 123-4567"));
        assert_eq!(info.email.as_deref(), Some("john@innovatetech.com"));
        assert_eq!(info.name.as_deref(), Some("John Smith"));
        assert_eq!(info.title.as_deref(), Some("CEO & Founder"));
        // first website-shaped substring wins, which is the email's domain
        assert_eq!(info.website.as_deref(), Some("innovatetech.com"));
        assert_eq!(info.address, None);
    }

    #[test]
    fn contact_fields_from_flyer_prompt() {
        let info = extract_contact_info(FLYER_PROMPT);
        assert_eq!(info.address.as_deref(), Some("123 Main St, Downtown"));
        assert_eq!(info.phone.as_deref(), Some("(555) 987-6543"));
        // "store name" is the business, not a person
        assert_eq!(info.name, None);
    }

    #[test]
    fn business_words_before_name_are_not_people() {
        for prefix in ["brand", "Company", "business", "service"] {
            let prompt = format!(r#"{prefix} name "Acme Rockets""#);
            assert_eq!(extract_contact_info(&prompt).name, None, "{prompt}");
        }
        let info = extract_contact_info(r#"brand name "Acme", owner name "Ada Lovelace""#);
        assert_eq!(info.name.as_deref(), Some("Ada Lovelace"));
        assert_eq!(extract_contact_info(r#"Name: "Grace Hopper""#).name.as_deref(), Some("Grace Hopper"));
    }

    #[test]
    fn phone_variants() {
        for (input, expected) in [
            ("call 555-123-4567 now", "555-123-4567"),
            ("call 555.123.4567 now", "555.123.4567"),
            ("call 5551234567 now", "5551234567"),
            ("call (555)123-4567 now", "(555)123-4567"),
        ] {
            assert_eq!(extract_contact_info(input).phone.as_deref(), Some(expected), "{input}");
        }
    }

    #[test]
    fn website_tld_whitelist() {
        assert_eq!(extract_contact_info("see www.acme.io").website.as_deref(), Some("www.acme.io"));
        assert_eq!(extract_contact_info("see acme.xyz").website, None);
    }

    #[test]
    fn interpret_is_total() {
        for prompt in ["", "   ", "'", "\"\"", "ñandú 🎨", "123 456"] {
            let d = interpret(prompt, DesignType::Flyer);
            assert!(!d.colors.is_empty() && d.colors.len() <= MAX_PALETTE);
            assert!(!d.company_name.is_empty());
            assert_eq!(d.raw_prompt, prompt);
            assert_eq!(d.design_type, DesignType::Flyer);
        }
    }
}
