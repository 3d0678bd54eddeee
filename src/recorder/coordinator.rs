//! Sign recorder
//!
//! Drives the capture state machine. Frames are buffered while a capture
//! window is open; a flush hands the buffer to the matcher (recognize mode)
//! or to the reference library and its store (record mode).

use super::state::{CaptureState, FlushOutcome, FrameOutcome, Mode, RecordingSession};
use crate::announce::Announcer;
use crate::config::RecognizerConfig;
use crate::landmarks::{HandFrame, LandmarkFrame, Sequence};
use crate::library::{FsSignStore, ReferenceLibrary, SignStore};
use crate::matcher::{DtwMatcher, Recognition, Verdict};
use crate::utils::{AppError, AppResult};
use parking_lot::RwLock;
use std::sync::Arc;
use tokio::sync::broadcast;

/// Events emitted by the recorder
#[derive(Debug, Clone, PartialEq)]
pub enum RecorderEvent {
    /// A capture window opened
    CaptureStarted { mode: Mode, label: Option<String> },
    /// A capture window was dropped without being used
    CaptureCancelled,
    /// The mode changed
    ModeChanged(Mode),
    /// A buffered capture was classified
    Recognized { verdict: Verdict, distance: Option<f64> },
    /// A capture was stored as a new reference
    SignSaved { label: String, frames: usize },
    /// A flush failed
    Error(String),
}

/// Record/recognize controller for one camera session
pub struct SignRecorder {
    /// Mode, capture state and buffer
    session: RecordingSession,

    /// Shared so other contexts can read labels while frames are processed
    library: Arc<RwLock<ReferenceLibrary>>,

    /// Where new recordings are persisted
    store: Box<dyn SignStore>,

    matcher: DtwMatcher,

    /// Capture window length that triggers an automatic flush
    max_frames: usize,

    /// Distance from the most recent classification
    last_distance: Option<f64>,

    /// Optional speech output for recognize-mode verdicts
    announcer: Option<Announcer>,

    /// Event broadcaster
    event_tx: broadcast::Sender<RecorderEvent>,
}

impl SignRecorder {
    /// Create a recorder in recognize mode
    pub fn new(
        config: &RecognizerConfig,
        library: ReferenceLibrary,
        store: Box<dyn SignStore>,
    ) -> AppResult<Self> {
        config.validate()?;

        let (event_tx, _) = broadcast::channel(100);
        Ok(Self {
            session: RecordingSession::new(Mode::Recognize),
            library: Arc::new(RwLock::new(library)),
            store,
            matcher: DtwMatcher::new(config.acceptance_threshold),
            max_frames: config.max_frames,
            last_distance: None,
            announcer: None,
            event_tx,
        })
    }

    /// Create a recorder backed by the sign directory named in `config`
    pub fn open(config: &RecognizerConfig) -> AppResult<Self> {
        let store = FsSignStore::new(&config.signs_dir);
        let library = ReferenceLibrary::load(&store)?;

        tracing::info!(
            "Recognizer ready: {} sign(s), window {} frames, threshold {}",
            library.len(),
            config.max_frames,
            config.acceptance_threshold
        );

        Self::new(config, library, Box::new(store))
    }

    /// Announce recognized signs through `announcer`
    pub fn with_announcer(mut self, announcer: Announcer) -> Self {
        self.announcer = Some(announcer);
        self
    }

    /// Subscribe to recorder events
    pub fn subscribe(&self) -> broadcast::Receiver<RecorderEvent> {
        self.event_tx.subscribe()
    }

    fn emit(&self, event: RecorderEvent) {
        // No subscribers is fine
        let _ = self.event_tx.send(event);
    }

    // =========================================================================
    // Control signals
    // =========================================================================

    /// Open a capture window.
    ///
    /// Record mode requires a non-empty sign name; recognize mode ignores it.
    /// A begin while a window is already open or being flushed is ignored.
    pub fn begin_capture(&mut self, label: Option<&str>) -> AppResult<()> {
        match self.session.state {
            CaptureState::Flushing => {
                tracing::debug!("Ignoring begin capture while flushing");
                return Ok(());
            }
            CaptureState::Recording => {
                tracing::debug!("Ignoring begin capture, already capturing");
                return Ok(());
            }
            CaptureState::Idle => {}
        }

        if self.session.mode == Mode::Record {
            let label = label
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .ok_or_else(|| {
                    tracing::warn!("Rejected recording without a sign name");
                    AppError::UserInput("sign name cannot be empty".to_string())
                })?;
            self.session.active_label = Some(label.to_string());
        }

        self.session.start();

        tracing::info!(
            "Capture started in {} mode{}",
            self.session.mode,
            self.session
                .active_label
                .as_deref()
                .map(|l| format!(" for '{}'", l))
                .unwrap_or_default()
        );
        self.emit(RecorderEvent::CaptureStarted {
            mode: self.session.mode,
            label: self.session.active_label.clone(),
        });

        Ok(())
    }

    /// Close the capture window and flush it.
    ///
    /// Returns `Ok(None)` when no window was open.
    pub fn end_capture(&mut self) -> AppResult<Option<FlushOutcome>> {
        if self.session.state != CaptureState::Recording {
            tracing::debug!("End capture with no open window");
            return Ok(None);
        }
        self.flush().map(Some)
    }

    /// Drop the open capture window without classifying or storing it.
    ///
    /// Returns whether a window was open.
    pub fn cancel_capture(&mut self) -> bool {
        if self.session.state != CaptureState::Recording {
            return false;
        }

        let dropped = self.session.discard();
        tracing::info!("Capture cancelled, discarded {} frame(s)", dropped);
        self.emit(RecorderEvent::CaptureCancelled);
        true
    }

    /// Switch mode. An open capture window is discarded and the active
    /// sign name is cleared.
    pub fn set_mode(&mut self, mode: Mode) {
        if self.session.mode == mode {
            return;
        }

        if self.session.state == CaptureState::Recording {
            let dropped = self.session.discard();
            tracing::info!("Mode change discarded {} buffered frame(s)", dropped);
        }

        self.session.mode = mode;
        self.session.active_label = None;
        if let Some(announcer) = self.announcer.as_mut() {
            announcer.reset();
        }

        tracing::info!("Switched to {} mode", mode);
        self.emit(RecorderEvent::ModeChanged(mode));
    }

    /// Switch to the other mode and return it
    pub fn toggle_mode(&mut self) -> Mode {
        let mode = self.session.mode.toggled();
        self.set_mode(mode);
        mode
    }

    // =========================================================================
    // Frame processing
    // =========================================================================

    /// Process one extracted frame.
    ///
    /// While capturing, the frame is buffered and the window flushes once it
    /// holds `max_frames` frames. In recognize mode with no open window the
    /// frame is classified on its own.
    pub fn process_frame(&mut self, frame: &LandmarkFrame) -> AppResult<FrameOutcome> {
        match self.session.state {
            CaptureState::Recording => {
                self.session.push(frame.hands().clone());

                if self.session.buffered_len() >= self.max_frames {
                    tracing::debug!("Capture window full ({} frames), flushing", self.max_frames);
                    let outcome = self.flush()?;
                    return Ok(FrameOutcome::from_flush(outcome, self.is_capturing()));
                }

                Ok(FrameOutcome::capturing(true))
            }
            CaptureState::Idle if self.session.mode == Mode::Recognize => {
                let query = Sequence::single(frame.hands().clone());
                let recognition = self.classify(&query);
                self.announce(&recognition.verdict);
                Ok(FrameOutcome::from_recognition(recognition, false))
            }
            CaptureState::Idle => Ok(FrameOutcome::capturing(false)),
            CaptureState::Flushing => {
                tracing::debug!("Dropping frame received while flushing");
                Ok(FrameOutcome::capturing(false))
            }
        }
    }

    fn classify(&mut self, query: &Sequence) -> Recognition {
        let recognition = self.matcher.classify(query, &self.library.read());
        self.last_distance = recognition.distance;
        recognition
    }

    fn announce(&mut self, verdict: &Verdict) {
        if let Some(announcer) = self.announcer.as_mut() {
            announcer.announce(verdict);
        }
    }

    /// Hand the buffer to its consumer. The session is idle with an empty
    /// buffer afterwards, whether or not the flush succeeded.
    fn flush(&mut self) -> AppResult<FlushOutcome> {
        self.session.state = CaptureState::Flushing;
        let frames = self.session.take_buffer();

        let result = self.route(frames);

        self.session.state = CaptureState::Idle;

        if let Err(e) = &result {
            tracing::warn!("Flush failed: {}", e);
            self.emit(RecorderEvent::Error(e.to_string()));
        }

        result
    }

    fn route(&mut self, frames: Vec<HandFrame>) -> AppResult<FlushOutcome> {
        let sequence = Sequence::new(frames)?;

        match self.session.mode {
            Mode::Recognize => {
                let recognition = self.classify(&sequence);

                tracing::info!(
                    "Recognized {} frame(s) as '{}' (distance {:?})",
                    sequence.len(),
                    recognition.verdict,
                    recognition.distance
                );

                self.announce(&recognition.verdict);
                self.emit(RecorderEvent::Recognized {
                    verdict: recognition.verdict.clone(),
                    distance: recognition.distance,
                });

                Ok(FlushOutcome::Recognized(recognition))
            }
            Mode::Record => {
                let label = self.session.active_label.clone().ok_or_else(|| {
                    AppError::UserInput("no sign name set for recording".to_string())
                })?;
                let frames = sequence.len();

                self.library
                    .write()
                    .add(&label, sequence, self.store.as_ref())?;

                self.emit(RecorderEvent::SignSaved {
                    label: label.clone(),
                    frames,
                });

                Ok(FlushOutcome::Saved { label, frames })
            }
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn mode(&self) -> Mode {
        self.session.mode
    }

    pub fn capture_state(&self) -> CaptureState {
        self.session.state
    }

    pub fn is_capturing(&self) -> bool {
        self.session.is_capturing()
    }

    /// Frames in the open capture window
    pub fn buffered_len(&self) -> usize {
        self.session.buffered_len()
    }

    pub fn max_frames(&self) -> usize {
        self.max_frames
    }

    /// Sign name used for record-mode captures
    pub fn active_label(&self) -> Option<&str> {
        self.session.active_label.as_deref()
    }

    /// Distance from the most recent classification
    pub fn last_distance(&self) -> Option<f64> {
        self.last_distance
    }

    /// Known sign names
    pub fn labels(&self) -> Vec<String> {
        self.library.read().labels()
    }

    /// Shared handle to the reference library
    pub fn library(&self) -> Arc<RwLock<ReferenceLibrary>> {
        Arc::clone(&self.library)
    }
}
