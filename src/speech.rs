// 🔊 Speech Readout
// Best-effort text-to-speech for the banner.
//
// Engines are local CLI synthesizers (espeak-ng, then espeak) fed through
// stdin. Failures never reach the caller: they come back as a SpeechOutcome
// and are logged here. Ctrl+C during playback ends the call, not the process.

use crate::banner::get_banner;
use std::io::{self, Write};
use std::process::{Command, ExitStatus, Stdio};
use std::sync::{Mutex, PoisonError};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Synthesizers tried by `CommandEngine::detect`, in order
pub const ENGINE_CANDIDATES: [&str; 2] = ["espeak-ng", "espeak"];

// ============================================================================
// ERRORS & OUTCOME
// ============================================================================

#[derive(Debug, Error)]
pub enum SpeechError {
    #[error("no speech engine available (tried {tried})")]
    Unavailable { tried: String },

    #[error("speech interrupted")]
    Interrupted,

    #[error("failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("{program} exited with {status}")]
    Playback { program: String, status: ExitStatus },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpeechOutcome {
    /// Playback ran to completion
    Spoken,

    /// User stopped playback (Ctrl+C)
    Interrupted,

    /// Engine missing or failed; holds the reason
    Skipped(String),
}

// ============================================================================
// ENGINE
// ============================================================================

pub trait SpeechEngine {
    /// Speak `text`, blocking until playback finishes.
    fn say_and_wait(&mut self, text: &str) -> Result<(), SpeechError>;
}

impl<E: SpeechEngine + ?Sized> SpeechEngine for &mut E {
    fn say_and_wait(&mut self, text: &str) -> Result<(), SpeechError> {
        (**self).say_and_wait(text)
    }
}

/// Speech through a synthesizer binary that reads the text from stdin
#[derive(Debug, Clone)]
pub struct CommandEngine {
    program: String,
    args: Vec<String>,
}

impl CommandEngine {
    pub fn new(program: impl Into<String>) -> Self {
        CommandEngine {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// First candidate that answers `--version`, set up to read stdin.
    pub fn detect() -> Result<Self, SpeechError> {
        for program in ENGINE_CANDIDATES {
            let probe = Command::new(program)
                .arg("--version")
                .stdout(Stdio::null())
                .stderr(Stdio::null())
                .status();

            match probe {
                Ok(status) if status.success() => {
                    debug!("Speech engine found: {}", program);
                    return Ok(CommandEngine::new(program).arg("--stdin"));
                }
                Ok(status) => debug!("{} --version exited with {}", program, status),
                Err(e) => debug!("{} not usable: {}", program, e),
            }
        }

        Err(SpeechError::Unavailable {
            tried: ENGINE_CANDIDATES.join(", "),
        })
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    fn spawn_error(&self, source: io::Error) -> SpeechError {
        if source.kind() == io::ErrorKind::Interrupted {
            SpeechError::Interrupted
        } else {
            SpeechError::Spawn {
                program: self.program.clone(),
                source,
            }
        }
    }
}

// One playback at a time: the SIGINT trap is process-wide.
static SPEAKING: Mutex<()> = Mutex::new(());

impl SpeechEngine for CommandEngine {
    fn say_and_wait(&mut self, text: &str) -> Result<(), SpeechError> {
        let _speaking = SPEAKING.lock().unwrap_or_else(PoisonError::into_inner);
        let trap = interrupt::SigintTrap::install();

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .spawn()
            .map_err(|e| self.spawn_error(e))?;

        if let Some(mut stdin) = child.stdin.take() {
            // The engine may exit early (e.g. interrupted) and close the pipe.
            if let Err(e) = stdin.write_all(text.as_bytes()) {
                debug!("{} stopped reading input: {}", self.program, e);
            }
        }

        let status = child.wait().map_err(|e| self.spawn_error(e))?;

        if trap.caught() || interrupt::killed_by_sigint(&status) {
            Err(SpeechError::Interrupted)
        } else if status.success() {
            Ok(())
        } else {
            Err(SpeechError::Playback {
                program: self.program.clone(),
                status,
            })
        }
    }
}

// ============================================================================
// INTERRUPTION (Ctrl+C)
// ============================================================================

#[cfg(unix)]
mod interrupt {
    use nix::sys::signal::{sigaction, SaFlags, SigAction, SigHandler, SigSet, Signal};
    use std::os::raw::c_int;
    use std::os::unix::process::ExitStatusExt;
    use std::process::ExitStatus;
    use std::sync::atomic::{AtomicBool, Ordering};
    use tracing::debug;

    static CAUGHT: AtomicBool = AtomicBool::new(false);

    extern "C" fn on_sigint(_: c_int) {
        CAUGHT.store(true, Ordering::SeqCst);
    }

    /// Catches SIGINT in this process until dropped, then puts the previous
    /// disposition back. A caught handler is reset to default across exec,
    /// so the synthesizer child still dies on Ctrl+C.
    pub struct SigintTrap {
        previous: Option<SigAction>,
    }

    impl SigintTrap {
        pub fn install() -> Self {
            CAUGHT.store(false, Ordering::SeqCst);
            let action = SigAction::new(
                SigHandler::Handler(on_sigint),
                SaFlags::SA_RESTART,
                SigSet::empty(),
            );

            // SAFETY: the handler only stores to an atomic.
            let previous = match unsafe { sigaction(Signal::SIGINT, &action) } {
                Ok(previous) => Some(previous),
                Err(e) => {
                    debug!("SIGINT trap not installed: {}", e);
                    None
                }
            };
            SigintTrap { previous }
        }

        pub fn caught(&self) -> bool {
            CAUGHT.load(Ordering::SeqCst)
        }
    }

    impl Drop for SigintTrap {
        fn drop(&mut self) {
            if let Some(previous) = self.previous.take() {
                // SAFETY: restores the disposition that was active before install.
                if let Err(e) = unsafe { sigaction(Signal::SIGINT, &previous) } {
                    debug!("SIGINT disposition not restored: {}", e);
                }
            }
        }
    }

    pub fn killed_by_sigint(status: &ExitStatus) -> bool {
        status.signal() == Some(Signal::SIGINT as c_int)
    }
}

#[cfg(not(unix))]
mod interrupt {
    use std::process::ExitStatus;

    pub struct SigintTrap;

    impl SigintTrap {
        pub fn install() -> Self {
            SigintTrap
        }

        pub fn caught(&self) -> bool {
            false
        }
    }

    pub fn killed_by_sigint(_status: &ExitStatus) -> bool {
        false
    }
}

// ============================================================================
// ACCESSORS
// ============================================================================

/// Initialize an engine with `init`, speak `text`, and log how it went.
pub fn speak_with<E, F>(init: F, text: &str) -> SpeechOutcome
where
    E: SpeechEngine,
    F: FnOnce() -> Result<E, SpeechError>,
{
    let result = init().and_then(|mut engine| engine.say_and_wait(text));

    match result {
        Ok(()) => {
            debug!("Banner read aloud.");
            SpeechOutcome::Spoken
        }
        Err(SpeechError::Interrupted) => {
            info!("Speech interrupted by user (Ctrl+C).");
            SpeechOutcome::Interrupted
        }
        Err(e) => {
            warn!("Text-to-speech skipped: {}", e);
            SpeechOutcome::Skipped(e.to_string())
        }
    }
}

/// Read the cached banner aloud with the first available engine.
pub fn speak_banner() -> SpeechOutcome {
    speak_with(CommandEngine::detect, get_banner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::line_layer;
    use crate::logging::test_support::Captured;
    use tracing_subscriber::prelude::*;

    /// Engine that records what it was asked to say and replays a result
    struct ScriptedEngine {
        spoken: Vec<String>,
        result: fn() -> Result<(), SpeechError>,
    }

    impl SpeechEngine for ScriptedEngine {
        fn say_and_wait(&mut self, text: &str) -> Result<(), SpeechError> {
            self.spoken.push(text.to_string());
            (self.result)()
        }
    }

    fn scripted(result: fn() -> Result<(), SpeechError>) -> ScriptedEngine {
        ScriptedEngine {
            spoken: Vec::new(),
            result,
        }
    }

    fn capture<T>(f: impl FnOnce() -> T) -> (T, String) {
        let sink = Captured::default();
        let subscriber = tracing_subscriber::registry().with(line_layer(sink.clone()));
        let value = tracing::subscriber::with_default(subscriber, f);
        (value, sink.contents())
    }

    #[test]
    fn test_init_failure_is_logged_not_raised() {
        let (outcome, logs) = capture(|| {
            speak_with(
                || -> Result<ScriptedEngine, SpeechError> {
                    Err(SpeechError::Unavailable {
                        tried: "espeak-ng, espeak".to_string(),
                    })
                },
                get_banner(),
            )
        });

        assert_eq!(
            outcome,
            SpeechOutcome::Skipped("no speech engine available (tried espeak-ng, espeak)".to_string())
        );
        assert!(logs.contains(" | WARNING | "));
        assert!(logs.contains("Text-to-speech skipped: no speech engine available"));
    }

    #[test]
    fn test_playback_failure_is_logged_not_raised() {
        let (outcome, logs) = capture(|| {
            speak_with(
                || {
                    Ok(scripted(|| {
                        Err(SpeechError::Spawn {
                            program: "espeak-ng".to_string(),
                            source: io::Error::new(io::ErrorKind::NotFound, "not found"),
                        })
                    }))
                },
                "hello",
            )
        });

        assert!(matches!(outcome, SpeechOutcome::Skipped(ref reason) if reason.contains("espeak-ng")));
        assert!(logs.contains("WARNING"));
    }

    #[test]
    fn test_interruption_is_logged_as_info() {
        let (outcome, logs) = capture(|| {
            speak_with(|| Ok(scripted(|| Err(SpeechError::Interrupted))), "hello")
        });

        assert_eq!(outcome, SpeechOutcome::Interrupted);
        assert!(logs.contains(" | INFO | "));
        assert!(logs.contains("Speech interrupted by user (Ctrl+C)."));
        assert!(!logs.contains("WARNING"));
    }

    #[test]
    fn test_engine_receives_full_text() {
        let mut engine = scripted(|| Ok(()));
        let borrowed = &mut engine;
        let outcome = speak_with(move || Ok(borrowed), get_banner());

        assert_eq!(outcome, SpeechOutcome::Spoken);
        assert_eq!(engine.spoken, vec![get_banner().to_string()]);
    }

    #[test]
    fn test_missing_program_maps_to_spawn_error() {
        let mut engine = CommandEngine::new("definitely-not-a-speech-engine-binary");
        let err = engine.say_and_wait("hello").unwrap_err();

        assert!(matches!(err, SpeechError::Spawn { .. }));
        assert!(err.to_string().starts_with("failed to start definitely-not-a-speech-engine-binary"));
    }

    #[test]
    fn test_text_is_fed_through_stdin() {
        // A leading dash must reach the engine as text, not as an option
        let mut engine = CommandEngine::new("sh")
            .arg("-c")
            .arg(r#"test "$(cat)" = "--version""#);
        assert!(engine.say_and_wait("--version").is_ok());

        let err = engine.say_and_wait("hello").unwrap_err();
        assert!(matches!(err, SpeechError::Playback { ref program, .. } if program == "sh"));
    }

    #[test]
    fn test_long_text_is_fed_through_stdin() {
        let text = "word ".repeat(100_000);
        let mut engine = CommandEngine::new("sh")
            .arg("-c")
            .arg("test $(wc -c) -eq 500000");
        assert!(engine.say_and_wait(&text).is_ok());
    }

    #[cfg(unix)]
    #[test]
    fn test_engine_killed_by_sigint_is_interrupted() {
        let mut engine = CommandEngine::new("sh")
            .arg("-c")
            .arg("cat >/dev/null; kill -INT $$; sleep 5");
        assert!(matches!(
            engine.say_and_wait("hello"),
            Err(SpeechError::Interrupted)
        ));

        let (outcome, logs) = capture(|| speak_with(|| Ok(engine), "hello"));
        assert_eq!(outcome, SpeechOutcome::Interrupted);
        assert!(logs.contains(" | INFO | "));
        assert!(logs.contains("Speech interrupted by user (Ctrl+C)."));
    }

    #[cfg(unix)]
    #[test]
    fn test_ctrl_c_reaching_this_process_is_caught() {
        // Terminal Ctrl+C signals the whole group: this process and the engine
        let engine = CommandEngine::new("sh")
            .arg("-c")
            .arg("cat >/dev/null; kill -INT $PPID; kill -INT $$; sleep 5");

        let (outcome, logs) = capture(|| speak_with(|| Ok(engine), "hello"));
        assert_eq!(outcome, SpeechOutcome::Interrupted);
        assert!(logs.contains("Speech interrupted by user (Ctrl+C)."));
        assert!(!logs.contains("WARNING"));
    }

    #[cfg(unix)]
    #[test]
    fn test_ctrl_c_caught_even_when_engine_finishes() {
        let engine = CommandEngine::new("sh")
            .arg("-c")
            .arg("cat >/dev/null; kill -INT $PPID; sleep 1; exit 0");

        let outcome = speak_with(|| Ok(engine), "hello");
        assert_eq!(outcome, SpeechOutcome::Interrupted);
    }

    #[cfg(unix)]
    #[test]
    fn test_sigint_disposition_restored_after_playback() {
        use nix::sys::signal::{sigaction, SaFlags, SigAction, SigHandler, SigSet, Signal};

        fn current_handler() -> SigHandler {
            let _speaking = SPEAKING.lock().unwrap_or_else(PoisonError::into_inner);
            let probe = SigAction::new(SigHandler::SigDfl, SaFlags::empty(), SigSet::empty());
            let current = unsafe { sigaction(Signal::SIGINT, &probe) }.unwrap();
            unsafe { sigaction(Signal::SIGINT, &current) }.unwrap();
            current.handler()
        }

        let before = current_handler();
        let mut engine = CommandEngine::new("sh").arg("-c").arg("cat >/dev/null");
        assert!(engine.say_and_wait("hello").is_ok());
        assert_eq!(current_handler(), before);
    }

    #[test]
    fn test_speak_banner_never_fails() {
        // Whether or not a synthesizer is installed, this returns normally.
        // Stub the engine out so the test stays silent.
        let outcome = speak_with(
            || CommandEngine::detect().map(|_| scripted(|| Ok(()))),
            get_banner(),
        );
        assert!(matches!(
            outcome,
            SpeechOutcome::Spoken | SpeechOutcome::Skipped(_)
        ));
    }
}
