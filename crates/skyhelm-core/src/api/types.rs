/// Unique identifier for a body in the arena.
///
/// Indices are stable for the lifetime of a run — bodies are never destroyed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BodyId(pub u32);

/// Outcome of interpreting one command utterance.
///
/// Interpretation never fails fatally; the three outcomes mirror a
/// conversational reply: done, "what?" (shape not recognized), or
/// "how?" (shape recognized, argument unusable).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOutcome {
    /// The command was recognized and acted on.
    Completed,
    /// The token shape matched no known command.
    NotUnderstood,
    /// The shape was recognized but the argument or state made it unactionable.
    NotPossible,
}

/// An event emitted by the core for the host to act on.
///
/// The core treats these as fire-and-forget: it never waits for the host
/// to consume them, and dropping them is harmless.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostEvent {
    /// Capture a screenshot of the current view.
    TakeSnapshot,
    /// Start the credits crawl.
    RunCredits,
    /// Re-baseline the external motion-tracking source.
    ResetTracking,
    /// Terminate the application.
    Quit,
    /// The craft crossed into an enterable atmosphere shell.
    AtmosphereEntered { body: BodyId, shell: usize },
}
