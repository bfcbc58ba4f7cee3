//! Benchmarks for gesture classification

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use gestura_core::GestureLabel;
use gestura_runtime::RecognitionSession;
use gestura_test::HandSynth;
use gestura_vision::{
    finger_pattern, frame_confidence, FrameClassifier, Sensitivity, SequenceClassifier, SwipeDirection,
};

fn bench_finger_pattern(c: &mut Criterion) {
    let frame = HandSynth::seeded(1).labelled(GestureLabel::Peace, 0).unwrap();

    c.bench_function("finger_pattern", |b| {
        b.iter(|| black_box(finger_pattern(black_box(&frame), Sensitivity::DEFAULT)))
    });
}

fn bench_frame_confidence(c: &mut Criterion) {
    let frame = HandSynth::seeded(1).labelled(GestureLabel::OpenHand, 0).unwrap();

    c.bench_function("frame_confidence", |b| {
        b.iter(|| black_box(frame_confidence(black_box(&frame))))
    });
}

fn bench_classify_frame(c: &mut Criterion) {
    let classifier = FrameClassifier::default();
    let mut synth = HandSynth::seeded(2);
    let frames: Vec<_> = (0..64).map(|i| synth.random_labelled(i).1).collect();

    c.bench_function("classify_frame", |b| {
        let mut i = 0;
        b.iter(|| {
            i = (i + 1) % frames.len();
            black_box(classifier.classify(black_box(&frames[i])))
        })
    });
}

fn bench_classify_sequence(c: &mut Criterion) {
    let classifier = SequenceClassifier::default();
    let frames = HandSynth::seeded(3).swipe(SwipeDirection::Right, 0, 7, 33);

    c.bench_function("classify_sequence_window_8", |b| {
        b.iter(|| black_box(classifier.classify(black_box(&frames))))
    });
}

fn bench_session_process_frame(c: &mut Criterion) {
    let mut session = RecognitionSession::default();
    let mut synth = HandSynth::seeded(4);
    let mut millis = 0;

    c.bench_function("session_process_frame", |b| {
        b.iter(|| {
            millis += 33;
            let (_, frame) = synth.random_labelled(millis);
            black_box(session.process_frame(frame))
        })
    });
}

criterion_group!(
    benches,
    bench_finger_pattern,
    bench_frame_confidence,
    bench_classify_frame,
    bench_classify_sequence,
    bench_session_process_frame,
);
criterion_main!(benches);
