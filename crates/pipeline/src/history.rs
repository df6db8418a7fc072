//! Conversation-history windowing.

/// Return the most recent `max_len` entries of `history`, order preserved.
///
/// If the history fits inside the window it is returned unchanged. The
/// active query is the newest entry and is always part of the window.
/// `max_len` is validated as positive at configuration time, never here.
pub fn window_history(history: &[String], max_len: usize) -> &[String] {
    if history.len() <= max_len {
        history
    } else {
        &history[history.len() - max_len..]
    }
}
