//! Studio - holds the latest session and the latest export
//!
//! A studio is the one place a finished run lives between "generate" and
//! "export". Starting a new run replaces the previous session wholesale and
//! forgets any bytes exported from it; a run that fails validation leaves
//! the previous results untouched.

use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use rand::Rng;
use rand_pcg::Pcg32;
use tracing::info;

use crate::error::{ExportError, SessionError};
use crate::io::{encode_wav, AudioBuffer};
use crate::render::{play_notes, tone_events, OfflineRender, ToneEvent, ToneSink};
use crate::rng::session_rng;
use crate::session::{schedule_with, ScheduledNote, Session, SessionParams};

pub struct Studio<R = Pcg32> {
    rng: R,
    session: Option<Session>,
    last_export: Option<Vec<u8>>,
}

impl Studio<Pcg32> {
    /// Studio with a `Pcg32`, seeded when `seed` is given.
    pub fn new(seed: Option<u64>) -> Self {
        Self::with_rng(session_rng(seed))
    }
}

impl<R: Rng> Studio<R> {
    pub fn with_rng(rng: R) -> Self {
        Self {
            rng,
            session: None,
            last_export: None,
        }
    }

    /// Schedule a new session without sounding it.
    pub fn generate(&mut self, params: SessionParams) -> Result<&Session, SessionError> {
        self.run(params, |_| {})
    }

    /// Schedule a new session, sending each note to `sink` as it is scheduled.
    pub fn play<S: ToneSink + ?Sized>(
        &mut self,
        params: SessionParams,
        sink: &mut S,
    ) -> Result<&Session, SessionError> {
        self.run(params, |note| sink.schedule_tone(ToneEvent::from_note(note)))
    }

    fn run<F>(&mut self, params: SessionParams, on_note: F) -> Result<&Session, SessionError>
    where
        F: FnMut(&ScheduledNote),
    {
        let session = schedule_with(params, &mut self.rng, on_note)?;
        self.last_export = None;
        Ok(self.session.insert(session))
    }

    /// Send the current session's notes to `sink` again.
    pub fn replay<S: ToneSink + ?Sized>(&self, sink: &mut S) -> Result<(), ExportError> {
        let session = self.finished_session()?;
        play_notes(session.notes(), sink);
        Ok(())
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// Bytes from the most recent successful export of the current session.
    pub fn last_export(&self) -> Option<&[u8]> {
        self.last_export.as_deref()
    }

    fn finished_session(&self) -> Result<&Session, ExportError> {
        match &self.session {
            Some(session) if !session.notes().is_empty() => Ok(session),
            _ => Err(ExportError::EmptySession),
        }
    }

    /// Render the current session through `renderer` and wait for it.
    pub fn render<O: OfflineRender + ?Sized>(&self, renderer: &O) -> Result<AudioBuffer, ExportError> {
        let session = self.finished_session()?;
        let job = renderer.start_rendering(tone_events(session.notes()), session.end_time());
        Ok(job.wait()?)
    }

    /// Render and encode the current session as WAV bytes.
    pub fn export<O: OfflineRender + ?Sized>(&mut self, renderer: &O) -> Result<&[u8], ExportError> {
        let buffer = self.render(renderer)?;
        let bytes = encode_wav(&buffer)?;
        info!(
            bytes = bytes.len(),
            frames = buffer.frames(),
            "encoded WAV"
        );
        Ok(self.last_export.insert(bytes).as_slice())
    }

    /// Render, encode and write the current session to `path`.
    ///
    /// The bytes go to a sibling temporary file that is renamed over `path`
    /// once fully written, so `path` never holds a partial WAV.
    pub fn export_to<O, P>(&mut self, renderer: &O, path: P) -> Result<usize, ExportError>
    where
        O: OfflineRender + ?Sized,
        P: AsRef<Path>,
    {
        let path = path.as_ref();
        let bytes = self.export(renderer)?;
        write_atomically(path, bytes)?;
        info!(path = %path.display(), bytes = bytes.len(), "wrote WAV file");
        Ok(bytes.len())
    }
}

fn partial_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(OsString::from).unwrap_or_default();
    name.push(".partial");
    path.with_file_name(name)
}

/// Write `bytes` to `path` through a temporary file in the same directory.
fn write_atomically(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let tmp = partial_path(path);
    let result = (|| {
        let mut file = File::create(&tmp)?;
        file.write_all(bytes)?;
        file.sync_all()?;
        fs::rename(&tmp, path)
    })();

    if result.is_err() {
        let _ = fs::remove_file(&tmp);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RenderError;
    use crate::render::{OfflineRenderer, RenderJob};
    use crate::session::KeyChangeRule;
    use crate::theory::{PitchClass, ScaleType};

    struct FailingRenderer;

    impl OfflineRender for FailingRenderer {
        fn start_rendering(&self, _events: Vec<ToneEvent>, _duration_secs: f64) -> RenderJob {
            RenderJob::spawn(|| Err(RenderError::Allocation { frames: 1 }))
        }
    }

    fn params() -> SessionParams {
        SessionParams::new(PitchClass::D, ScaleType::Minor, 120, 2).key_change(KeyChangeRule::never())
    }

    #[test]
    fn export_before_generate_is_refused() {
        let mut studio = Studio::new(Some(1));
        let result = studio.export(&OfflineRenderer::default());

        assert!(matches!(result, Err(ExportError::EmptySession)));
        assert!(studio.last_export().is_none());
    }

    #[test]
    fn export_to_before_generate_writes_nothing() {
        let dir = std::env::temp_dir().join(format!("qtones-empty-{}", std::process::id()));
        let path = dir.with_extension("wav");
        let mut studio = Studio::new(Some(1));

        let result = studio.export_to(&OfflineRenderer::default(), &path);
        assert!(matches!(result, Err(ExportError::EmptySession)));
        assert!(!path.exists());
    }

    #[test]
    fn failed_validation_keeps_the_previous_session() {
        let mut studio = Studio::new(Some(2));
        let first = studio.generate(params()).unwrap().notes().to_vec();

        let err = studio.generate(params().bpm(0)).unwrap_err();
        assert_eq!(err, SessionError::InvalidBpm { bpm: 0 });
        assert_eq!(studio.session().unwrap().notes(), first.as_slice());
    }

    #[test]
    fn invalid_play_leaves_the_sink_untouched() {
        let mut studio = Studio::new(Some(3));
        let mut sink: Vec<ToneEvent> = Vec::new();

        let err = studio.play(params().bpm(0), &mut sink).unwrap_err();
        assert_eq!(err, SessionError::InvalidBpm { bpm: 0 });
        assert!(sink.is_empty());
        assert!(studio.session().is_none());

        let huge = params().bpm(u32::MAX).duration_secs(u32::MAX);
        assert!(matches!(
            studio.play(huge, &mut sink),
            Err(SessionError::TooManyNotes { .. })
        ));
        assert!(sink.is_empty());
    }

    #[test]
    fn export_to_replaces_the_file_whole() {
        let dir = std::env::temp_dir().join(format!("qtones-atomic-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("take.wav");
        fs::write(&path, b"stale").unwrap();

        let mut studio = Studio::new(Some(9));
        studio.generate(params()).unwrap();
        let written = studio.export_to(&OfflineRenderer::default(), &path).unwrap();

        assert_eq!(fs::read(&path).unwrap(), studio.last_export().unwrap());
        assert_eq!(written, 44 + 88_200 * 4);
        assert!(!partial_path(&path).exists());
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn failed_write_leaves_no_partial_file() {
        let dir = std::env::temp_dir().join(format!("qtones-missing-{}", std::process::id()));
        let path = dir.join("nested").join("take.wav");

        let mut studio = Studio::new(Some(10));
        studio.generate(params()).unwrap();
        let result = studio.export_to(&OfflineRenderer::default(), &path);

        assert!(matches!(result, Err(ExportError::Io(_))));
        assert!(!path.exists());
        assert!(!partial_path(&path).exists());
    }

    #[test]
    fn partial_path_is_a_sibling() {
        let path = Path::new("/tmp/out/quantum_music.wav");
        assert_eq!(
            partial_path(path),
            PathBuf::from("/tmp/out/quantum_music.wav.partial")
        );
    }

    #[test]
    fn play_sends_every_note_to_the_sink() {
        let mut studio = Studio::new(Some(3));
        let mut sink: Vec<ToneEvent> = Vec::new();
        let session = studio.play(params(), &mut sink).unwrap();

        assert_eq!(sink.len(), 4);
        assert_eq!(sink, tone_events(session.notes()));

        let mut again: Vec<ToneEvent> = Vec::new();
        studio.replay(&mut again).unwrap();
        assert_eq!(again, sink);
    }

    #[test]
    fn export_produces_a_full_length_wav() {
        let mut studio = Studio::new(Some(4));
        studio.generate(params()).unwrap();

        let bytes = studio.export(&OfflineRenderer::default()).unwrap().to_vec();
        // 2 s at 44.1 kHz, stereo, 16-bit
        assert_eq!(bytes.len(), 44 + 88_200 * 4);
        assert_eq!(studio.last_export(), Some(bytes.as_slice()));
    }

    #[test]
    fn render_failure_is_reported_and_nothing_is_kept() {
        let mut studio = Studio::new(Some(5));
        studio.generate(params()).unwrap();

        let result = studio.export(&FailingRenderer);
        assert!(matches!(
            result,
            Err(ExportError::Render(RenderError::Allocation { frames: 1 }))
        ));
        assert!(studio.last_export().is_none());
    }

    #[test]
    fn render_failure_writes_no_file() {
        let path = std::env::temp_dir().join(format!("qtones-failed-{}.wav", std::process::id()));
        let mut studio = Studio::new(Some(6));
        studio.generate(params()).unwrap();

        assert!(studio.export_to(&FailingRenderer, &path).is_err());
        assert!(!path.exists());
    }

    #[test]
    fn new_generation_discards_old_export() {
        let mut studio = Studio::new(Some(7));
        studio.generate(params()).unwrap();
        studio.export(&OfflineRenderer::default()).unwrap();
        assert!(studio.last_export().is_some());

        studio.generate(params().bpm(90)).unwrap();
        assert!(studio.last_export().is_none());
        assert_eq!(studio.session().unwrap().params().bpm, 90);
    }
}
