use codenano_assembler::{assemble, AssembleOptions};
use codenano_common::{FileSet, Mode, SourceFile};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn project(entries: &[(&str, &str)]) -> FileSet {
    FileSet::from_files(
        entries
            .iter()
            .map(|(path, content)| SourceFile::from_path(*path, *content))
            .collect(),
    )
    .unwrap()
}

fn assemble_html(c: &mut Criterion) {
    let files = project(&[
        (
            "index.html",
            "<!DOCTYPE html><html><head><title>Demo</title></head><body><main id=\"app\"></main></body></html>",
        ),
        ("style.css", "main { display: grid; gap: 8px; }"),
        ("app.js", "document.getElementById('app').textContent = 'ready';"),
    ]);
    let options = AssembleOptions::default();

    c.bench_function("assemble_html", |b| {
        b.iter(|| assemble(Mode::Html, black_box(&files), &options))
    });
}

fn assemble_nextjs(c: &mut Criterion) {
    let files = project(&[(
        "app/page.jsx",
        r#"'use client';
import React, { useState } from 'react';

export default function Counter() {
  const [count, setCount] = useState(0);
  return <button onClick={() => setCount(count + 1)}>{count}</button>;
}
"#,
    )]);
    let options = AssembleOptions::default();

    c.bench_function("assemble_nextjs", |b| {
        b.iter(|| assemble(Mode::Nextjs, black_box(&files), &options))
    });
}

criterion_group!(benches, assemble_html, assemble_nextjs);
criterion_main!(benches);
