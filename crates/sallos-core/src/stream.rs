//! Call status and stream lifecycle.

/// Outcome of one `process` call on an encoder or decoder.
///
/// Stalls are flow control: the engine made all progress currently possible
/// and must be called again once the caller supplies more of the named resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// The stream is complete; call `finish`.
    Ready,
    /// More input is needed.
    StallOnInput,
    /// More output capacity is needed.
    StallOnOutput,
}

impl Status {
    pub fn is_stall(self) -> bool {
        matches!(self, Status::StallOnInput | Status::StallOnOutput)
    }
}

/// Stream state for tracking progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StreamState {
    /// Stream not started.
    #[default]
    Initial,
    /// Stream in progress.
    Active,
    /// All data processed; waiting for `finish`.
    Finished,
    /// `finish` returned; the summary has been taken.
    Closed,
    /// Stream encountered error.
    Error,
}

impl StreamState {
    /// Check if stream is in a terminal state.
    pub fn is_terminal(self) -> bool {
        matches!(self, StreamState::Closed | StreamState::Error)
    }

    /// Check if `process` may be called.
    pub fn can_process(self) -> bool {
        matches!(
            self,
            StreamState::Initial | StreamState::Active | StreamState::Finished
        )
    }

    pub fn name(self) -> &'static str {
        match self {
            StreamState::Initial => "initial",
            StreamState::Active => "active",
            StreamState::Finished => "finished",
            StreamState::Closed => "closed",
            StreamState::Error => "error",
        }
    }
}
