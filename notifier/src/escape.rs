/// Escape text for embedding in a Telegram HTML message.
///
/// Movie and theatre names come straight from the provider; anything
/// markup-shaped in them must not leak into the rendered alert.
pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}
