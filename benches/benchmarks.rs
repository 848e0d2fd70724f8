// benches/benchmarks.rs — Performance benchmarks (criterion)
//
// Covers the pure hot paths:
//   1. Markdown -> HTML -> WeChat normalization for article-sized input
//   2. Prompt assembly for initial and revision turns

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use wxdraft::core::prompt::{build_initial_prompt, build_revision_prompt};
use wxdraft::core::types::{Draft, Spec, Turn, INITIAL_TURN_LABEL, REVISION_SUMMARY};
use wxdraft::publisher::normalize::{markdown_to_html, normalize_for_wechat};

// ─── Helpers ────────────────────────────────────────────────────────────────

/// An article with `sections` h2 sections, each with a paragraph and two lists.
fn article(sections: usize) -> String {
    let mut md = String::from("# 自动化实践\n\n");
    for i in 0..sections {
        md.push_str(&format!("## 第 {i} 节\n\n"));
        md.push_str("从一个日常场景说起，解释背后的原理。\n\n");
        md.push_str("1. 观察\n2. 假设\n3. 验证\n\n");
        md.push_str("- 要点甲\n- 要点乙\n\n");
    }
    md
}

fn spec() -> Spec {
    Spec {
        topic: "自动化".into(),
        outline: vec!["背景".into(), "方法".into(), "结论".into()],
        words: 1500,
        constraints: vec!["避免术语".into(), "结尾给出行动建议".into()],
        style: String::new(),
    }
}

// ─── Benchmarks ─────────────────────────────────────────────────────────────

fn bench_normalize(c: &mut Criterion) {
    let mut group = c.benchmark_group("normalize");

    let small = markdown_to_html(&article(3));
    let large = markdown_to_html(&article(60));

    group.bench_function("markdown_to_html_60_sections", |b| {
        let md = article(60);
        b.iter(|| markdown_to_html(black_box(&md)))
    });

    group.bench_function("normalize_3_sections", |b| {
        b.iter(|| normalize_for_wechat(black_box(&small)))
    });

    group.bench_function("normalize_60_sections", |b| {
        b.iter(|| normalize_for_wechat(black_box(&large)))
    });

    group.finish();
}

fn bench_prompts(c: &mut Criterion) {
    let mut group = c.benchmark_group("prompt");
    let spec = spec();
    let draft = Draft {
        title: "自动化实践".into(),
        markdown: article(10),
        ..Default::default()
    };
    let mut history = vec![Turn::new(INITIAL_TURN_LABEL, draft.clone(), INITIAL_TURN_LABEL)];
    for i in 0..8 {
        history.push(Turn::new(format!("修改意见 {i}"), draft.clone(), REVISION_SUMMARY));
    }

    group.bench_function("initial", |b| {
        b.iter(|| build_initial_prompt(black_box(&spec)))
    });

    group.bench_function("revision_9_turns", |b| {
        b.iter(|| build_revision_prompt(black_box(&spec), &draft, "加强结尾", &history))
    });

    group.finish();
}

criterion_group!(benches, bench_normalize, bench_prompts);
criterion_main!(benches);
