use criterion::{black_box, criterion_group, criterion_main, Criterion};

use printstudio::rendering::{hit_test, rasterize, View};
use printstudio::{generate_design, DesignType};

const PROMPT: &str = r#"Create a modern business card for a tech startup called "InnovateTech". Use blue and white colors. Include the name "John Smith", title "CEO & Founder", phone "(555) 123-4567", email "john@innovatetech.com", and website "www.innovatetech.com"."#;

fn bench_generate(c: &mut Criterion) {
    c.bench_function("generate_business_card", |b| {
        b.iter(|| generate_design(black_box(PROMPT), DesignType::BusinessCard))
    });
}

fn bench_rasterize(c: &mut Criterion) {
    let doc = generate_design(PROMPT, DesignType::BusinessCard);
    let preview = View::preview(&doc.dimensions);
    c.bench_function("rasterize_preview", |b| b.iter(|| rasterize(black_box(&doc), &preview, Some("company-name"))));
    c.bench_function("rasterize_export", |b| b.iter(|| rasterize(black_box(&doc), &View::export(), None)));
}

fn bench_hit_test(c: &mut Criterion) {
    let doc = generate_design(PROMPT, DesignType::Flyer);
    let view = View::preview(&doc.dimensions);
    c.bench_function("hit_test_grid", |b| {
        b.iter(|| {
            let mut hits = 0;
            for y in (0..792).step_by(16) {
                for x in (0..612).step_by(16) {
                    if hit_test(&doc, x as f64, y as f64, &view).is_some() {
                        hits += 1;
                    }
                }
            }
            black_box(hits)
        })
    });
}

criterion_group!(benches, bench_generate, bench_rasterize, bench_hit_test);
criterion_main!(benches);
