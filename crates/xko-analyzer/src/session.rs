//! One analysis run over one video.

use std::fs;
use std::path::Path;
use std::time::Instant;

use tracing::{debug, info};
use xko_media::{
    attribute_actor, default_encoder_backend, ClipExtractor, EncoderBackend, FrameEventDetector,
    RgbImage, VideoSource,
};
use xko_models::{CharacterProfile, Clip, Event, MatchupType, Report};

use crate::aggregator::EventAggregator;
use crate::catalog::{require, MoveCatalog};
use crate::classifier::{Classification, Classifier};
use crate::combo::{ComboTracker, DamageTimeline};
use crate::config::AnalyzerConfig;
use crate::enrichment::Enricher;
use crate::error::{AnalyzerError, AnalyzerResult};
use crate::logging::SessionLogger;
use crate::metrics;
use crate::recognizer::{MoveRecognizer, NoMoveRecognizer};
use crate::report::{assemble, ReportInputs};

/// Everything a run produced.
#[derive(Debug, Clone)]
pub struct AnalysisOutcome {
    pub report: Report,
    pub classification: Classification,
    /// Merged, frame-ordered event log.
    pub events: Vec<Event>,
}

/// A validated analysis setup.
///
/// Construction checks the character and matchup, so configuration errors
/// surface before any video is opened.
pub struct AnalysisSession {
    config: AnalyzerConfig,
    profile: CharacterProfile,
    matchup: MatchupType,
    recognizer: Box<dyn MoveRecognizer>,
    logger: SessionLogger,
}

impl AnalysisSession {
    pub fn new(
        config: AnalyzerConfig,
        catalog: &dyn MoveCatalog,
        character: &str,
        matchup: &str,
    ) -> AnalyzerResult<Self> {
        let available = || {
            MatchupType::supported()
                .into_iter()
                .map(str::to_string)
                .collect::<Vec<_>>()
        };
        let matchup_type = matchup
            .parse::<MatchupType>()
            .map_err(|_| AnalyzerError::unsupported_matchup(matchup, available()))?;
        if !matchup_type.is_supported() {
            return Err(AnalyzerError::unsupported_matchup(matchup, available()));
        }

        let profile = require(catalog, character)?.clone();

        Ok(Self {
            config,
            profile,
            matchup: matchup_type,
            recognizer: Box::new(NoMoveRecognizer),
            logger: SessionLogger::new("analyze"),
        })
    }

    pub fn with_recognizer(mut self, recognizer: Box<dyn MoveRecognizer>) -> Self {
        self.recognizer = recognizer;
        self
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    pub fn profile(&self) -> &CharacterProfile {
        &self.profile
    }

    pub fn session_id(&self) -> &str {
        self.logger.session_id()
    }

    /// Run the full pipeline over `source`.
    pub fn run(&mut self, source: &mut VideoSource) -> AnalyzerResult<AnalysisOutcome> {
        let started = Instant::now();
        let _span = self.logger.span().entered();
        self.logger.log_start(&format!(
            "{} ({} frames at {:.2} fps, {} vs {})",
            source.path().display(),
            source.frame_count(),
            source.fps(),
            self.profile.name,
            self.profile.name
        ));

        let events = self.detect_events(source)?;
        self.logger
            .log_progress(&format!("Detected {} events", events.len()));

        let classifier = Classifier::new(&self.profile, self.config.classifier_settings());
        let mut classification = classifier.classify(&events);
        let merged = classification.merge_events(&events);

        let timeline = DamageTimeline::from_events(&merged, &self.profile);
        Enricher::new(&self.profile, self.config.context_window_secs).enrich_all(
            &mut classification,
            &merged,
            &timeline,
        );
        let combos = ComboTracker::new(self.config.combo_timeout_frames).track(
            &merged,
            &self.profile,
            &timeline,
        );
        self.logger.log_progress(&format!(
            "Found {} mistakes and {} combos",
            classification.mistake_count(),
            combos.len()
        ));

        let video = source.info().to_metadata(source.path());
        let data_quality = self.recognizer.data_quality();
        if data_quality.is_synthetic() {
            self.logger
                .log_warning("Move observations are synthetic; report is labelled as such");
        }
        let report = assemble(&ReportInputs {
            video: &video,
            matchup: self.matchup,
            profile: &self.profile,
            events: &merged,
            classification: &classification,
            combos: &combos,
            data_quality,
        });

        let elapsed = started.elapsed().as_secs_f64();
        metrics::record_analysis_duration(elapsed);
        self.logger
            .log_completion(&format!("Analysis finished in {:.2}s", elapsed));

        Ok(AnalysisOutcome {
            report,
            classification,
            events: merged,
        })
    }

    /// Sample, diff, attribute and debounce frames into raw events, then let
    /// the recognizer attach moves.
    fn detect_events(&mut self, source: &mut VideoSource) -> AnalyzerResult<Vec<Event>> {
        let detector = FrameEventDetector::new(self.config.diff_threshold, self.config.noise_floor);
        let mut aggregator = EventAggregator::new(self.config.cooldown_frames);
        let mut previous: Option<RgbImage> = None;
        let mut sampled = 0u64;
        let mut events = Vec::new();

        for sample in source.extract_frames(self.config.frame_stride)? {
            let sample = sample?;
            sampled += 1;

            if let Some(prev) = &previous {
                let signal = detector.classify(&sample.pixels, prev);
                let actor = attribute_actor(&signal, self.config.activity_ratio);
                if let Some(event) = aggregator.observe(
                    sample.frame_index,
                    sample.timestamp,
                    actor,
                    signal.classification,
                ) {
                    let event = match self.recognizer.recognize(&event, &self.profile) {
                        Some(observation) => event.with_observation(observation),
                        None => event,
                    };
                    debug!(
                        frame = event.frame_index,
                        actor = %event.actor,
                        "{}", event.description
                    );
                    events.push(event);
                }
            }
            previous = Some(sample.pixels);
        }

        metrics::record_frames_sampled(sampled);
        info!(
            sampled,
            suppressed = aggregator.suppressed(),
            "Frame sampling finished"
        );
        Ok(events)
    }

    /// Cut annotated clips for every mistake in `outcome` with the default
    /// encoder, and write the manifest.
    pub fn generate_clips(
        &self,
        source: &mut VideoSource,
        outcome: &AnalysisOutcome,
    ) -> AnalyzerResult<Vec<Clip>> {
        self.generate_clips_with(source, outcome, default_encoder_backend())
    }

    pub fn generate_clips_with(
        &self,
        source: &mut VideoSource,
        outcome: &AnalysisOutcome,
        backend: Box<dyn EncoderBackend>,
    ) -> AnalyzerResult<Vec<Clip>> {
        let mistakes = outcome.classification.all_mistakes();
        let mut extractor = ClipExtractor::new(self.config.clips_dir(), backend)?
            .with_settings(self.config.clip_settings());

        let clips = extractor.generate_from_mistakes(source, &mistakes)?;
        for warning in extractor.warnings() {
            self.logger.log_warning(warning);
        }
        extractor.save_manifest()?;
        metrics::record_clips_written(clips.len() as u64);
        self.logger.log_progress(&format!(
            "Wrote {} clips to {}",
            clips.len(),
            extractor.output_dir().display()
        ));
        Ok(clips)
    }
}

/// Write `report` as indented JSON, creating parent directories.
pub fn write_report(report: &Report, path: impl AsRef<Path>) -> AnalyzerResult<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| AnalyzerError::io(parent, e))?;
    }
    let json = report.to_json_pretty()?;
    fs::write(path, json).map_err(|e| AnalyzerError::io(path, e))?;
    info!("Saved report to {}", path.display());
    Ok(())
}
