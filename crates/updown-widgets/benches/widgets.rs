//! Benchmarks for parsing, rendering and reconciliation.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use updown_core::{Event, Key, Widget};
use updown_widgets::{
    format_number, parse_number, NumberFormat, NumberStyles, NumericState, NumericUpDown,
    Reconciler, ValueFormatter,
};

fn bench_parse_number(c: &mut Criterion) {
    let nf = NumberFormat::invariant();

    c.bench_function("parse_number_grouped", |b| {
        b.iter(|| parse_number(black_box("-1,234,567.891"), NumberStyles::ANY, &nf))
    });
}

fn bench_format_number(c: &mut Criterion) {
    let nf = NumberFormat::en_us();

    c.bench_function("format_number_n2", |b| {
        b.iter(|| format_number(black_box(-1_234_567.891), "N2", &nf))
    });
    c.bench_function("format_number_custom", |b| {
        b.iter(|| format_number(black_box(0.4567), "#,##0.00 'kg'", &nf))
    });
}

fn bench_decorated_parse(c: &mut Criterion) {
    let formatter = ValueFormatter {
        format_string: "0.0 °C".to_string(),
        ..ValueFormatter::default()
    };

    c.bench_function("parse_with_recovery", |b| {
        b.iter(|| formatter.parse(Some("21.5 °C"), black_box(Some("19.0 °C"))))
    });
}

fn bench_reconcile(c: &mut Criterion) {
    let mut state = NumericState::new()
        .with_minimum(0.0)
        .with_maximum(1000.0)
        .with_format_string("F2");
    let _ = state.initialize();
    let mut flip = false;

    c.bench_function("reconcile_text_to_value", |b| {
        b.iter(|| {
            flip = !flip;
            let text = if flip { "12.50" } else { "750.25" };
            let valid = state.reconcile(true, black_box(Some(text)), true);
            state.drain_effects();
            valid
        })
    });
}

fn bench_spin_events(c: &mut Criterion) {
    let mut widget = NumericUpDown::new().minimum(-1.0e9).maximum(1.0e9).value(0.0);
    let _ = widget.initialize();
    let up = Event::KeyDown { key: Key::Up };

    c.bench_function("numeric_up_down_key_spin", |b| {
        b.iter(|| widget.event(black_box(&up)))
    });
}

criterion_group!(
    benches,
    bench_parse_number,
    bench_format_number,
    bench_decorated_parse,
    bench_reconcile,
    bench_spin_events,
);
criterion_main!(benches);
