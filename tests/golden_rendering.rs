use std::fs;
use std::path::PathBuf;

use printstudio::rendering::{rasterize, View};
use printstudio::{generate_design, DesignDocument, DesignType, Shape};

// (prompt, type, golden name, element outlined in the preview)
const PROMPTS: [(&str, DesignType, &str, &str); 3] = [
    (
        r#"Create a modern business card for a tech startup called "InnovateTech". Use blue and white colors. Include the name "John Smith", title "CEO & Founder""#,
        DesignType::BusinessCard,
        "business-card",
        "bg",
    ),
    (
        r#"Flyer for "Grand Opening" with "50% off everything" and "Free coffee", red and yellow, call (555) 987-6543 at 123 Main St"#,
        DesignType::Flyer,
        "flyer",
        "header-bar",
    ),
    (
        r#"Door hanger for a lawn care service called "Green Paradise Lawns", green and white"#,
        DesignType::DoorHanger,
        "door-hanger",
        "header",
    ),
];

fn golden_path(name: &str) -> PathBuf {
    let mut p = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    p.push("tests/goldens/expected");
    p.push(name);
    p
}

/// Compare `digest` against the stored golden, or write it when `UPDATE_GOLDENS` is set
fn check_golden(name: &str, digest: &str) {
    let expected_path = golden_path(name);
    if std::env::var("UPDATE_GOLDENS").is_ok() {
        if let Some(dir) = expected_path.parent() {
            fs::create_dir_all(dir).expect("create golden dir");
        }
        fs::write(&expected_path, format!("{}\n", digest)).expect("write golden");
        println!("Updated golden: {:?}", expected_path);
        return;
    }

    let exp = fs::read_to_string(&expected_path)
        .unwrap_or_else(|e| panic!("missing golden {:?} ({}); run with UPDATE_GOLDENS=1 to create it", expected_path, e));
    assert_eq!(digest, exp.trim(), "raster digest changed for {}", name);
}

/// The document without its text elements. Glyphs come from whatever fonts
/// the machine has installed, so only the shape layer is pinned by digest.
fn shape_layer(prompt: &str, design_type: DesignType) -> DesignDocument {
    let mut doc = generate_design(prompt, design_type);
    doc.elements.retain(|e| !matches!(e.shape, Shape::Text(_)));
    doc
}

#[test]
fn preview_shape_layers_match_goldens() {
    for (prompt, design_type, name, selected) in PROMPTS {
        let doc = shape_layer(prompt, design_type);
        let canvas = rasterize(&doc, &View::preview(&doc.dimensions), Some(selected));
        check_golden(&format!("{}.shapes.preview.sha256", name), &canvas.digest());
    }
}

#[test]
fn thumbnail_shape_layers_match_goldens() {
    for (prompt, design_type, name, _) in PROMPTS {
        let doc = shape_layer(prompt, design_type);
        let canvas = rasterize(&doc, &View::thumbnail(&doc.dimensions), None);
        check_golden(&format!("{}.shapes.thumb.sha256", name), &canvas.digest());
    }
}

#[test]
fn every_golden_is_committed() {
    for (_, _, name, _) in PROMPTS {
        for view in ["preview", "thumb"] {
            let path = golden_path(&format!("{}.shapes.{}.sha256", name, view));
            let digest = fs::read_to_string(&path).unwrap_or_default();
            assert_eq!(digest.trim().len(), 64, "{:?}", path);
        }
    }
}

#[test]
fn shape_layer_pixels() {
    let doc = shape_layer(PROMPTS[2].0, DesignType::DoorHanger);
    let canvas = rasterize(&doc, &View::preview(&doc.dimensions), None);
    assert_eq!((canvas.width(), canvas.height()), (425, 1100));
    let rgba = |x, y| {
        let p = canvas.pixel(x, y).unwrap();
        (p.r, p.g, p.b, p.a)
    };
    assert_eq!(rgba(10, 10), (0x00, 0xAA, 0x00, 0xFF));
    assert_eq!(rgba(400, 600), (0xFF, 0xFF, 0xFF, 0xFF));
    // green accent at 20% over the white body
    assert_eq!(rgba(64, 770), (204, 238, 204, 255));

    let doc = shape_layer(PROMPTS[1].0, DesignType::Flyer);
    let canvas = rasterize(&doc, &View::preview(&doc.dimensions), Some("header-bar"));
    let rgba = |x, y| {
        let p = canvas.pixel(x, y).unwrap();
        (p.r, p.g, p.b, p.a)
    };
    // selection dashes along the top edge, 5 on then 5 off
    assert_eq!(rgba(3, 0), (0x66, 0x7e, 0xea, 0xFF));
    assert_eq!(rgba(7, 0), (0xFF, 0x00, 0x00, 0xFF));
    // red accent at 30% over the yellow background
    assert_eq!(rgba(520, 230), (255, 151, 0, 255));
}

#[test]
fn rasters_are_deterministic() {
    for (prompt, design_type, _, selected) in PROMPTS {
        let doc = generate_design(prompt, design_type);
        let view = View::preview(&doc.dimensions);
        assert_eq!(
            rasterize(&doc, &view, Some(selected)).digest(),
            rasterize(&doc, &view, Some(selected)).digest()
        );
    }
}

#[test]
fn text_draws_over_the_shape_layer() {
    for (prompt, design_type, _, _) in PROMPTS {
        let full = generate_design(prompt, design_type);
        let shapes = shape_layer(prompt, design_type);
        let view = View::preview(&full.dimensions);
        let (a, b) = (rasterize(&full, &view, None), rasterize(&shapes, &view, None));
        assert_eq!((a.width(), a.height()), (b.width(), b.height()));
        // no installed fonts means no glyphs; otherwise text must change pixels
        if printstudio::rendering::text::measure_line("Ag", &sample_style()) > 0.0 {
            assert_ne!(a.digest(), b.digest(), "{}", design_type);
        }
    }
}

fn sample_style() -> printstudio::rendering::layout::TextStyle {
    printstudio::rendering::layout::TextStyle {
        family: "sans-serif".into(),
        size: 16.0,
        weight: printstudio::design::FontWeight::Normal,
    }
}

#[test]
fn export_paints_background_edge_to_edge() {
    let doc = generate_design(PROMPTS[0].0, DesignType::BusinessCard);
    let canvas = rasterize(&doc, &View::export(), None);
    assert_eq!((canvas.width(), canvas.height()), (1050, 600));
    // the locked background is the primary color and fully opaque in the corners
    for (x, y) in [(0, 0), (1049, 0), (0, 599), (1049, 599)] {
        let p = canvas.pixel(x, y).unwrap();
        assert_eq!((p.r, p.g, p.b, p.a), (0x00, 0x66, 0xCC, 0xFF), "pixel {},{}", x, y);
    }
}
