//! Output scraping.
//!
//! The CLI renders a healthy process as
//!
//! ```text
//! === myapp Processes
//! --- web:
//! myapp-v16-web-bujlq up (v16)
//! ```
//!
//! Matching is anchored on the app name as an escaped literal that must not
//! be preceded by another name character, so `test-1` never matches lines
//! belonging to `test-12` or `xtest-1` when several apps share one log.

use regex::Regex;
use tracing::debug;

use crate::error::ScrapeError;
use crate::identity::ProcessIdentity;
use crate::snapshot::ProcessSnapshot;

/// Pattern source for one `<app>-v<n>-<role>-<suffix> up (v<n>)` line.
///
/// Capture group 1 is the identity token.
pub fn process_pattern(app: &str) -> String {
    format!(
        r"(?:^|[^\w-])({}-v\d+-[\w-]+-\w+) up \(v\d+\)",
        regex::escape(app)
    )
}

/// Pattern source for the `=== <app> Processes` header.
pub fn process_list_header(app: &str) -> String {
    format!(r"(?m)^=== {} Processes\b", regex::escape(app))
}

/// Extract every process identity for `app` from raw CLI output.
///
/// Tolerates partial or interleaved text. Zero matches yields an empty
/// snapshot.
pub fn extract_process_identities(app: &str, raw: &[u8]) -> ProcessSnapshot {
    let text = String::from_utf8_lossy(raw);
    let pattern = Regex::new(&process_pattern(app)).expect("escaped app name yields a valid pattern");

    let mut snapshot = ProcessSnapshot::new(app);
    for captures in pattern.captures_iter(&text) {
        let token = &captures[1];
        match ProcessIdentity::parse(app, token) {
            Ok(identity) => {
                // parse() guarantees the app matches
                let _ = snapshot.insert(identity);
            }
            Err(e) => debug!(token, error = %e, "skipping unparseable process line"),
        }
    }
    snapshot
}

/// Parse the output of `ps:list` (or any command that ends by printing the
/// process list).
///
/// Unlike [`extract_process_identities`], this requires the list header so
/// that "no processes" is distinguishable from output that is not a process
/// list at all.
pub fn parse_process_list(app: &str, raw: &[u8]) -> Result<ProcessSnapshot, ScrapeError> {
    let text = String::from_utf8_lossy(raw);
    let header = Regex::new(&process_list_header(app)).expect("escaped app name yields a valid pattern");

    let Some(found) = header.find(&text) else {
        return Err(ScrapeError::MissingHeader {
            app: app.to_string(),
            output: text.into_owned(),
        });
    };

    Ok(extract_process_identities(
        app,
        text[found.start()..].as_bytes(),
    ))
}
