use once_cell::sync::Lazy;
use regex::Regex;

// CSI sequences (ESC[ ... cmd); covers the common styling/movement codes.
static ANSI_CSI: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\x1B\[[0-9;?]*[ -/]*[@-~]").expect("valid regex"));

const MAX_LABEL_CHARS: usize = 200;

/// Cleans scraped text for display: strips ANSI sequences and control
/// characters, collapses line breaks to spaces and truncates to a width the
/// listing can show on one line.
pub fn sanitize_for_terminal(s: &str) -> String {
    strip_controls(s).chars().take(MAX_LABEL_CHARS).collect()
}

/// Like [`sanitize_for_terminal`] but never truncates. Used for links, which
/// are useless once cut.
pub fn strip_controls(s: &str) -> String {
    let no_ansi = ANSI_CSI.replace_all(s, "");

    let collapsed: String = no_ansi
        .chars()
        .map(|ch| if matches!(ch, '\n' | '\r' | '\t') { ' ' } else { ch })
        .filter(|ch| *ch >= ' ' && *ch != '\x7f')
        .collect();

    collapsed.trim().to_string()
}
