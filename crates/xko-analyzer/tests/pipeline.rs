//! End-to-end runs over in-memory video.

use image::{Rgb, RgbImage};
use xko_analyzer::{
    render, AnalysisSession, AnalyzerConfig, AnalyzerError, MoveRecognizer, StaticCatalog,
    SyntheticMoveRecognizer,
};
use xko_media::VideoSource;
use xko_models::{
    Actor, CharacterProfile, DataQuality, Event, EventKind, MistakeKind, MoveObservation,
    MoveOutcome, PlayerStats, Report,
};

const WIDTH: u32 = 8;
const HEIGHT: u32 = 4;

fn black() -> RgbImage {
    RgbImage::new(WIDTH, HEIGHT)
}

fn left_white() -> RgbImage {
    let mut img = black();
    for y in 0..HEIGHT {
        for x in 0..WIDTH / 2 {
            img.put_pixel(x, y, Rgb([255, 255, 255]));
        }
    }
    img
}

/// 5 still frames, a 10-frame flicker on the left half, 10 still frames.
fn left_burst() -> Vec<RgbImage> {
    let mut frames: Vec<RgbImage> = (0..5).map(|_| black()).collect();
    for i in 0..10 {
        frames.push(if i % 2 == 0 { left_white() } else { black() });
    }
    frames.extend((0..10).map(|_| black()));
    frames
}

fn session() -> AnalysisSession {
    let config = AnalyzerConfig {
        frame_stride: 1,
        ..AnalyzerConfig::default()
    };
    AnalysisSession::new(config, &StaticCatalog::builtin(), "Blitzcrank", "mirror").unwrap()
}

/// Claims every event was a blocked Rocket Grab without assist.
struct RocketGrabRecognizer;

impl MoveRecognizer for RocketGrabRecognizer {
    fn recognize(&mut self, _event: &Event, _profile: &CharacterProfile) -> Option<MoveObservation> {
        Some(MoveObservation::new("5S1", MoveOutcome::Blocked))
    }

    fn data_quality(&self) -> DataQuality {
        DataQuality::Measured
    }
}

#[test]
fn test_empty_video_gives_zeroed_report() {
    let mut source = VideoSource::from_frames("empty.mp4", Vec::new(), 60.0);
    let outcome = session().run(&mut source).unwrap();
    let report = outcome.report;

    assert_eq!(report.data_quality, DataQuality::Measured);
    assert_eq!(report.video_info.frame_count, 0);
    assert_eq!(report.video_info.duration, 0.0);
    assert!(report.key_events.is_empty());
    for actor in Actor::PLAYERS {
        let analysis = report.analysis(actor).unwrap();
        assert_eq!(analysis.stats, PlayerStats::default());
        assert!(analysis.mistakes.is_empty());
    }
    assert_eq!(report.combos.player1.total_combos, 0);
}

#[test]
fn test_identical_frames_give_no_events() {
    let frames: Vec<RgbImage> = (0..30).map(|_| left_white()).collect();
    let mut source = VideoSource::from_frames("still.mp4", frames, 60.0);
    let outcome = session().run(&mut source).unwrap();
    assert!(outcome.events.is_empty());
}

#[test]
fn test_left_burst_gives_one_player1_event() {
    let mut source = VideoSource::from_frames("burst.mp4", left_burst(), 60.0);
    let outcome = session().run(&mut source).unwrap();

    assert_eq!(outcome.events.len(), 1);
    let event = &outcome.events[0];
    assert_eq!(event.actor, Actor::Player1);
    assert_eq!(event.kind, EventKind::HitOrBlock);
    assert_eq!(event.frame_index, 5);
    assert!(event.observation.is_none());
    assert_eq!(outcome.classification.mistake_count(), 0);
}

#[test]
fn test_unknown_character_fails_before_decoding() {
    let err = AnalysisSession::new(
        AnalyzerConfig::default(),
        &StaticCatalog::builtin(),
        "Ekko",
        "mirror",
    )
    .err()
    .unwrap();

    match err {
        AnalyzerError::UnsupportedCharacter { name, available } => {
            assert_eq!(name, "Ekko");
            assert_eq!(available, vec!["Blitzcrank"]);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_recognized_unsafe_special_flows_into_report() {
    let mut source = VideoSource::from_frames("burst.mp4", left_burst(), 60.0);
    let mut session = session().with_recognizer(Box::new(RocketGrabRecognizer));
    let outcome = session.run(&mut source).unwrap();
    let report = &outcome.report;

    let p1 = &report.player1_analysis;
    assert_eq!(p1.stats.unsafe_moves_used, 1);
    assert_eq!(p1.stats.blocked_attacks, 1);
    assert_eq!(p1.mistakes.len(), 1);
    assert_eq!(p1.mistakes[0].kind, MistakeKind::UnsafeSpecial);
    assert!(p1.mistakes[0].context.is_some());

    // Original detection plus the unsafe_special marker.
    assert_eq!(report.key_events.len(), 2);
    assert_eq!(report.key_events[1].kind, EventKind::UnsafeSpecial);

    let text = render(report).to_string();
    assert!(text.contains("[00:00]"));
    assert!(text.contains("UNSAFE_SPECIAL"));
}

#[test]
fn test_report_json_round_trip_and_idempotence() {
    let run = || {
        let mut source = VideoSource::from_frames("burst.mp4", left_burst(), 60.0);
        let mut session = session().with_recognizer(Box::new(RocketGrabRecognizer));
        session.run(&mut source).unwrap().report
    };

    let first = run();
    let second = run();
    let json = first.to_json_pretty().unwrap();
    assert_eq!(json, second.to_json_pretty().unwrap());
    assert_eq!(Report::from_json(&json).unwrap(), first);

    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    for key in [
        "video_info",
        "matchup",
        "player1_analysis",
        "player2_analysis",
        "key_events",
        "recommendations",
        "combos",
        "data_quality",
    ] {
        assert!(value.get(key).is_some(), "missing key {key}");
    }
}

#[test]
fn test_synthetic_recognizer_labels_report() {
    let mut source = VideoSource::from_frames("burst.mp4", left_burst(), 60.0);
    let mut session =
        session().with_recognizer(Box::new(SyntheticMoveRecognizer::new(7, 1.0)));
    let outcome = session.run(&mut source).unwrap();

    assert_eq!(outcome.report.data_quality, DataQuality::Synthetic);
    assert!(outcome.events[0].observation.is_some());
    let doc = render(&outcome.report);
    assert_eq!(doc.sections[0].title, "SYNTHETIC DATA");
}
