// Container log retrieval and engine timestamp parsing

use bollard::query_parameters::LogsOptions;
use futures_util::StreamExt;

use super::DockerRepo;
use crate::models::LogLine;

impl DockerRepo {
    /// Fetch up to `tail` recent log lines for one container.
    pub async fn container_logs(&self, id: &str, tail: u32) -> anyhow::Result<Vec<LogLine>> {
        let options = LogsOptions {
            stdout: true,
            stderr: true,
            timestamps: true,
            tail: tail.to_string(),
            ..Default::default()
        };
        let mut stream = self.docker.logs(id, Some(options));
        let mut raw = String::new();
        while let Some(chunk) = stream.next().await {
            let output = chunk?;
            raw.push_str(&String::from_utf8_lossy(&output.into_bytes()));
        }
        Ok(parse_log_lines(&raw))
    }
}

/// Split raw engine output into timestamp/message pairs. With `timestamps`
/// requested, lines open with an RFC3339 stamp ("2024-01-15T10:30:45.123456789Z");
/// the stamp is cut to second precision and reformatted for display. Lines
/// without a recognizable stamp pass through with an empty timestamp.
pub(crate) fn parse_log_lines(raw: &str) -> Vec<LogLine> {
    raw.lines()
        .filter(|line| !line.is_empty())
        .map(|line| match split_timestamped(line) {
            Some((timestamp, message)) => LogLine {
                timestamp,
                message: message.to_string(),
            },
            None => LogLine {
                timestamp: String::new(),
                message: line.to_string(),
            },
        })
        .collect()
}

fn split_timestamped(line: &str) -> Option<(String, &str)> {
    let (stamp, message) = line.split_once(' ')?;
    let bytes = stamp.as_bytes();
    if bytes.len() < 20 || bytes[4] != b'-' || bytes[10] != b'T' || !stamp.ends_with('Z') {
        return None;
    }
    let stamp = stamp.split('.').next().unwrap_or(stamp);
    Some((stamp.trim_end_matches('Z').replace('T', " "), message))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_log_lines_trims_nanoseconds_and_reformats() {
        let raw = "2024-01-15T10:30:45.123456789Z Server listening on :8080\n";
        let lines = parse_log_lines(raw);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].timestamp, "2024-01-15 10:30:45");
        assert_eq!(lines[0].message, "Server listening on :8080");
    }

    #[test]
    fn parse_log_lines_handles_stamp_without_fraction() {
        let lines = parse_log_lines("2024-01-15T10:30:45Z ready\n");
        assert_eq!(lines[0].timestamp, "2024-01-15 10:30:45");
        assert_eq!(lines[0].message, "ready");
    }

    #[test]
    fn parse_log_lines_passes_unstamped_lines_through() {
        let lines = parse_log_lines("plain output without a stamp\n");
        assert_eq!(lines[0].timestamp, "");
        assert_eq!(lines[0].message, "plain output without a stamp");
    }

    #[test]
    fn parse_log_lines_skips_empty_lines() {
        let raw = "2024-01-15T10:30:45Z one\n\n2024-01-15T10:30:46Z two\n";
        let lines = parse_log_lines(raw);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].message, "one");
        assert_eq!(lines[1].message, "two");
    }

    #[test]
    fn parse_log_lines_keeps_spaces_in_messages() {
        let lines = parse_log_lines("2024-01-15T10:30:45Z GET /api/snapshot 200 OK\n");
        assert_eq!(lines[0].message, "GET /api/snapshot 200 OK");
    }
}
