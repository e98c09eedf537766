use std::io::{self, Write};

use chrono::{DateTime, Utc};
use scribe_core::{AppViewModel, Failure, StartTime, TranscriptMessage};

/// Receives every view that changed since the previous render.
pub trait ViewSink {
    fn render(&mut self, view: &AppViewModel);
}

/// Prints status changes, failures and the transcript as they change.
pub struct TerminalSink<W: Write> {
    out: W,
    last_label: String,
    last_failure: Option<Failure>,
    last_messages: Vec<TranscriptMessage>,
}

impl TerminalSink<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> TerminalSink<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            last_label: String::new(),
            last_failure: None,
            last_messages: Vec::new(),
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_view(&mut self, view: &AppViewModel) -> io::Result<()> {
        if view.status_label != self.last_label {
            if !view.status_label.is_empty() {
                writeln!(self.out, "== {} ==", view.status_label)?;
            }
            self.last_label = view.status_label.clone();
        }

        if view.last_failure != self.last_failure {
            if let Some(failure) = &view.last_failure {
                writeln!(self.out, "error: {}", failure.message)?;
            }
            self.last_failure = view.last_failure.clone();
        }

        if view.messages != self.last_messages {
            for line in message_lines(&view.messages) {
                writeln!(self.out, "{line}")?;
            }
            self.last_messages = view.messages.clone();
        }
        self.out.flush()
    }
}

impl<W: Write> ViewSink for TerminalSink<W> {
    fn render(&mut self, view: &AppViewModel) {
        if let Err(err) = self.write_view(view) {
            scribe_logging::scribe_warn!("Failed to render view: {}", err);
        }
    }
}

pub fn message_lines(messages: &[TranscriptMessage]) -> Vec<String> {
    messages
        .iter()
        .map(|message| {
            format!(
                "[{}] {}",
                format_start_time(&message.start_time),
                message.text
            )
        })
        .collect()
}

/// Formats a start time as date and time in UTC; unparseable text is shown as sent.
pub fn format_start_time(start_time: &StartTime) -> String {
    let parsed = match start_time {
        StartTime::EpochMillis(millis) => DateTime::<Utc>::from_timestamp_millis(*millis),
        StartTime::Text(text) => DateTime::parse_from_rfc3339(text)
            .ok()
            .map(|time| time.with_timezone(&Utc)),
    };
    match (parsed, start_time) {
        (Some(time), _) => time.format("%a %b %d %Y %H:%M:%S UTC").to_string(),
        (None, StartTime::Text(text)) => text.clone(),
        (None, StartTime::EpochMillis(millis)) => millis.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use scribe_core::{FailureKind, JobStatus};

    use super::*;

    fn hi() -> TranscriptMessage {
        TranscriptMessage {
            text: "hi".to_string(),
            start_time: StartTime::EpochMillis(1000),
        }
    }

    #[test]
    fn formats_millis_and_rfc3339() {
        assert_eq!(
            format_start_time(&StartTime::EpochMillis(1000)),
            "Thu Jan 01 1970 00:00:01 UTC"
        );
        assert_eq!(
            format_start_time(&StartTime::Text("2020-07-10T11:16:21.024Z".to_string())),
            "Fri Jul 10 2020 11:16:21 UTC"
        );
        assert_eq!(
            format_start_time(&StartTime::Text("yesterday".to_string())),
            "yesterday"
        );
    }

    #[test]
    fn terminal_sink_prints_only_changes() {
        let mut sink = TerminalSink::new(Vec::new());
        let mut view = AppViewModel {
            status: JobStatus::InProgress,
            status_label: "processing".to_string(),
            ..AppViewModel::default()
        };
        sink.render(&view);
        sink.render(&view);

        view.status = JobStatus::Completed;
        view.status_label = "completed".to_string();
        view.messages = vec![hi()];
        sink.render(&view);

        view.last_failure = Some(Failure {
            kind: FailureKind::Fetch,
            message: "http status 502".to_string(),
        });
        sink.render(&view);

        let printed = String::from_utf8(sink.into_inner()).unwrap();
        assert_eq!(
            printed,
            "== processing ==\n== completed ==\n[Thu Jan 01 1970 00:00:01 UTC] hi\nerror: http status 502\n"
        );
    }
}
