//! Prompt -> document scenarios

use printstudio::design::Shape;
use printstudio::prompt::interpret;
use printstudio::synth::synthesize;
use printstudio::{generate_design, DesignType};

const INNOVATE: &str = r#"Create a modern business card for a tech startup called "InnovateTech". Use blue and white colors."#;

#[test]
fn innovatetech_business_card() {
    let doc = generate_design(INNOVATE, DesignType::BusinessCard);
    assert_eq!(doc.colors.primary_color, "#0066CC");
    assert_eq!(doc.colors.secondary_color, "#FFFFFF");
    let company = doc.element("company-name").expect("company-name element");
    match &company.shape {
        Shape::Text(t) => assert_eq!(t.text, "InnovateTech"),
        other => panic!("company-name is not text: {:?}", other),
    }
    assert!(doc.id.is_none());
    assert!(doc.created_at.is_none() && doc.updated_at.is_none());
}

#[test]
fn interpret_is_total() {
    let prompts = [
        "",
        "   ",
        "\"",
        "''''",
        "called \"\" named ''",
        "ünïcödé ✨ prompt with emoji 🎨 and (555",
        "red red red red",
    ];
    for prompt in prompts {
        for design_type in DesignType::ALL {
            let desc = interpret(prompt, design_type);
            assert!(!desc.colors.is_empty() && desc.colors.len() <= 3, "{:?}", prompt);
            assert!(desc.colors.iter().all(|c| c.starts_with('#')));
            assert!(!desc.company_name.is_empty());
        }
    }
}

#[test]
fn synthesis_is_deterministic_per_type() {
    for design_type in DesignType::ALL {
        for prompt in [INNOVATE, "", r#"flyer "A" "B" "C" call 555-000-1111"#] {
            let desc = interpret(prompt, design_type);
            let a = synthesize(&desc, design_type);
            let b = synthesize(&desc, design_type);
            assert_eq!(a, b);
            assert!(a.has_unique_ids());
        }
        // ids and geometry don't depend on the prompt either
        let plain = generate_design("", design_type);
        let rich = generate_design(INNOVATE, design_type);
        assert_eq!(plain.element_ids(), rich.element_ids());
        assert_eq!(plain.dimensions, design_type.dimensions());
    }
}

#[test]
fn documents_survive_json() {
    for design_type in DesignType::ALL {
        let doc = generate_design(INNOVATE, design_type);
        let json = serde_json::to_string(&doc).unwrap();
        let back: printstudio::DesignDocument = serde_json::from_str(&json).unwrap();
        assert_eq!(back, doc);
    }
}
