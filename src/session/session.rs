use super::config::SessionConfig;
use super::stats::{SegmentResult, SessionStats};
use crate::error::{RecognizerError, SessionError};
use crate::extract::{extract, Extraction};
use crate::recognizer::{ModelCache, Recognizer};
use crate::solfege::Syllable;
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Protocol state of a connection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No session yet
    Unconfigured,
    /// Session exists, no segment open
    Configured,
    /// A segment is open
    SegmentOpen(i64),
    /// `end_session` was processed; terminal
    Ended,
}

/// Recognition state bound to one connection
pub struct Session {
    /// Session configuration
    config: SessionConfig,

    /// Streaming recognizer, owned exclusively by this session
    recognizer: Box<dyn Recognizer>,

    /// Id of the open segment, if any
    current_segment_id: Option<i64>,

    /// Finalized segments in call order
    results: Vec<SegmentResult>,

    /// When the session started
    started_at: chrono::DateTime<Utc>,

    /// PCM bytes accepted so far
    audio_bytes: usize,
}

impl Session {
    pub fn new(config: SessionConfig, recognizer: Box<dyn Recognizer>) -> Self {
        info!("Creating recognition session at {} Hz", config.sample_rate);

        Self {
            config,
            recognizer,
            current_segment_id: None,
            results: Vec::new(),
            started_at: Utc::now(),
            audio_bytes: 0,
        }
    }

    /// Swap in a recognizer for a new configuration.
    ///
    /// Results are kept; any open segment is abandoned with the old recognizer.
    pub fn reconfigure(&mut self, config: SessionConfig, recognizer: Box<dyn Recognizer>) {
        if let Some(segment_id) = self.current_segment_id.take() {
            warn!("Reconfigured with segment {} open; abandoning it", segment_id);
        }
        info!(
            "Reconfiguring session: {} Hz -> {} Hz ({} results kept)",
            self.config.sample_rate,
            config.sample_rate,
            self.results.len()
        );

        self.config = config;
        self.recognizer = recognizer;
    }

    pub fn sample_rate(&self) -> u32 {
        self.config.sample_rate
    }

    pub fn current_segment_id(&self) -> Option<i64> {
        self.current_segment_id
    }

    pub fn results(&self) -> &[SegmentResult] {
        &self.results
    }

    /// Open a segment, resetting the recognizer so earlier audio cannot leak in
    pub fn start_segment(&mut self, segment_id: i64) {
        if let Some(previous) = self.current_segment_id {
            debug!("Segment {} abandoned by start of segment {}", previous, segment_id);
        }

        self.recognizer.reset();
        self.current_segment_id = Some(segment_id);
        debug!("Segment {} started", segment_id);
    }

    /// Feed PCM to the recognizer, whether or not a segment is open
    pub fn accept_audio(&mut self, pcm: &[u8]) -> Result<(), RecognizerError> {
        self.recognizer.accept_audio(pcm)?;
        self.audio_bytes += pcm.len();
        Ok(())
    }

    /// Finalize the open segment.
    ///
    /// Returns `None` when no segment is open.
    pub async fn end_segment(&mut self) -> Result<Option<SegmentResult>, RecognizerError> {
        let Some(segment_id) = self.current_segment_id.take() else {
            debug!("end_segment with no open segment");
            return Ok(None);
        };

        let frame = self.recognizer.finalize().await?;
        let Extraction { word, confidence } = extract(&frame);

        let result = SegmentResult {
            segment_id,
            word,
            confidence,
        };

        match result.word.as_deref().and_then(Syllable::from_word) {
            Some(syllable) => info!(
                "Segment {}: {:?} (degree {}, confidence {:?})",
                segment_id,
                syllable,
                syllable.degree(),
                result.confidence
            ),
            None => info!("Segment {}: no syllable ({:?})", segment_id, result.word),
        }

        self.results.push(result.clone());
        Ok(Some(result))
    }

    pub fn stats(&self) -> SessionStats {
        let duration = Utc::now().signed_duration_since(self.started_at);

        SessionStats {
            sample_rate: self.config.sample_rate,
            started_at: self.started_at,
            duration_secs: duration.num_milliseconds() as f64 / 1000.0,
            segments_count: self.results.len(),
            audio_bytes: self.audio_bytes,
        }
    }

    pub fn into_results(self) -> Vec<SegmentResult> {
        self.results
    }
}

/// Drives one connection's session through its lifecycle
///
/// Sessions are created by `config`, or implicitly at the default sample rate
/// by the first `start_segment` or audio chunk. Once `end_session` runs, every
/// further operation fails with `SessionError::Ended`.
pub struct SessionController {
    models: Arc<ModelCache>,
    session: Option<Session>,
    ended: bool,
}

impl SessionController {
    pub fn new(models: Arc<ModelCache>) -> Self {
        Self {
            models,
            session: None,
            ended: false,
        }
    }

    pub fn state(&self) -> SessionState {
        if self.ended {
            return SessionState::Ended;
        }

        match &self.session {
            None => SessionState::Unconfigured,
            Some(session) => match session.current_segment_id() {
                Some(segment_id) => SessionState::SegmentOpen(segment_id),
                None => SessionState::Configured,
            },
        }
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn stats(&self) -> Option<SessionStats> {
        self.session.as_ref().map(Session::stats)
    }

    /// Create the session, or replace its recognizer if one exists
    pub async fn apply_config(&mut self, sample_rate: u32) -> Result<(), SessionError> {
        self.ensure_active()?;

        let config = SessionConfig::with_sample_rate(sample_rate);
        let recognizer = self.models.create_recognizer(&config).await?;

        match self.session.as_mut() {
            Some(session) => session.reconfigure(config, recognizer),
            None => self.session = Some(Session::new(config, recognizer)),
        }

        Ok(())
    }

    pub async fn start_segment(&mut self, segment_id: i64) -> Result<(), SessionError> {
        self.session_mut().await?.start_segment(segment_id);
        Ok(())
    }

    pub async fn accept_audio(&mut self, pcm: &[u8]) -> Result<(), SessionError> {
        self.session_mut().await?.accept_audio(pcm)?;
        Ok(())
    }

    /// Finalize the open segment; `None` if there is no session or no open segment
    pub async fn end_segment(&mut self) -> Result<Option<SegmentResult>, SessionError> {
        self.ensure_active()?;

        match self.session.as_mut() {
            Some(session) => Ok(session.end_segment().await?),
            None => {
                debug!("end_segment before any session was created");
                Ok(None)
            }
        }
    }

    /// End the session and hand back every finalized segment
    pub fn end_session(&mut self) -> Result<Vec<SegmentResult>, SessionError> {
        self.ensure_active()?;
        self.ended = true;

        let Some(session) = self.session.take() else {
            info!("Session ended before it was created");
            return Ok(Vec::new());
        };

        let stats = session.stats();
        info!(
            "Session ended: {} segments, {} audio bytes, {:.1}s",
            stats.segments_count, stats.audio_bytes, stats.duration_secs
        );

        Ok(session.into_results())
    }

    fn ensure_active(&self) -> Result<(), SessionError> {
        if self.ended {
            return Err(SessionError::Ended);
        }
        Ok(())
    }

    /// The session, created with defaults if the client never sent `config`
    async fn session_mut(&mut self) -> Result<&mut Session, SessionError> {
        self.ensure_active()?;

        let session = match self.session.take() {
            Some(session) => session,
            None => {
                debug!("No config received; creating session with defaults");
                let config = SessionConfig::default();
                let recognizer = self.models.create_recognizer(&config).await?;
                Session::new(config, recognizer)
            }
        };

        Ok(self.session.insert(session))
    }
}
