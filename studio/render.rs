/// Template renderer for the training dialog page.
///
/// The page is a single HTML template (`studio/assets/dialog.html`) with
/// `{{TOKEN}}` placeholders, embedded at compile time. The initial render
/// fills them from the current snapshot; the page then keeps itself up to
/// date from `/events`.
use ferrite_amp::progress::DialogState;

const TEMPLATE: &str = include_str!("assets/dialog.html");

pub fn render_dialog(dialog: &DialogState) -> String {
    let html = TEMPLATE
        .replace("{{TITLE}}",        &html_escape(&dialog.title))
        .replace("{{RUN_LABEL}}",    &html_escape(&dialog.run_label))
        .replace("{{EPOCH_LABEL}}",  &html_escape(&dialog.epoch_label))
        .replace("{{COMPLETED}}",    &html_escape(&dialog.completed_text()))
        .replace("{{BUTTON_LABEL}}", &html_escape(&dialog.button_label))
        .replace("{{INDICATOR}}",    if dialog.indicator_running { "running" } else { "" });

    blank_remaining(html)
}

/// Escapes the five HTML-significant characters.
pub fn html_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&'  => out.push_str("&amp;"),
            '<'  => out.push_str("&lt;"),
            '>'  => out.push_str("&gt;"),
            '"'  => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _    => out.push(c),
        }
    }
    out
}

/// Replaces any `{{UPPERCASE_TOKEN}}` that wasn't substituted with an
/// empty string.
fn blank_remaining(mut html: String) -> String {
    while let Some(start) = html.find("{{") {
        if let Some(end) = html[start..].find("}}") {
            let abs_end = start + end + 2;
            html.replace_range(start..abs_end, "");
        } else {
            break;
        }
    }
    html
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_markup() {
        assert_eq!(html_escape("<a & 'b'>"), "&lt;a &amp; &#39;b&#39;&gt;");
    }

    #[test]
    fn unknown_tokens_are_blanked() {
        assert_eq!(blank_remaining("x{{NOPE}}y".to_owned()), "xy");
    }
}
