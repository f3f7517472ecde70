//! Escaping of untrusted text for rendered UI

/// Escape every character with special meaning in markup.
///
/// Total and allocation-bounded; escaping an already escaped string is still
/// safe to display (it renders the entities literally).
pub fn sanitize(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
