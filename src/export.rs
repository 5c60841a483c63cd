//! Transcript export
//!
//! Builds the payload the download collaborator saves on the client side.
//! The filename and mime type are fixed; only the content varies.

use crate::session::SessionError;

/// Filename offered for every transcript download
pub const TRANSCRIPT_FILENAME: &str = "transcript.txt";

/// Mime type of exported transcripts
pub const TRANSCRIPT_MIME: &str = "text/plain; charset=utf-8";

/// A client-side file save: content plus the metadata the saver needs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptDownload {
    pub content: String,
    pub filename: &'static str,
    pub mime_type: &'static str,
}

/// Build the download payload for a transcript
///
/// Download is disabled for an empty transcript; callers surface
/// `EmptyTranscript` instead of saving a zero-byte file.
pub fn transcript_download(transcript: &str) -> Result<TranscriptDownload, SessionError> {
    if transcript.is_empty() {
        return Err(SessionError::EmptyTranscript);
    }

    Ok(TranscriptDownload {
        content: transcript.to_string(),
        filename: TRANSCRIPT_FILENAME,
        mime_type: TRANSCRIPT_MIME,
    })
}
