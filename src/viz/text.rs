//! Text measurement, markup stripping, truncation and wrapping for rendered labels.

/// Heuristic: estimate pixel width of text (Plotters has no built-in text measuring).
pub fn estimate_text_width_px(text: &str, font_px: u32) -> u32 {
    ((text.chars().count() as f32) * (font_px as f32) * 0.60).ceil() as u32
}

/// Drop the inline tags titles may carry (`<b>`, `<sup>`, `<br>`, ...).
pub fn strip_markup(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_tag = false;
    for ch in text.chars() {
        match ch {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if !in_tag => out.push(ch),
            _ => {}
        }
    }
    out
}

/// Cut `text` so it fits `max_px`, ending in a single ellipsis when shortened.
pub fn truncate_to_width(text: &str, font_px: u32, max_px: u32) -> String {
    if estimate_text_width_px(text, font_px) <= max_px {
        return text.to_string();
    }
    let mut out: String = String::new();
    for ch in text.chars() {
        out.push(ch);
        if estimate_text_width_px(&format!("{out}…"), font_px) > max_px {
            out.pop();
            break;
        }
    }
    out.push('…');
    out
}

/// Break `text` into lines no wider than `max_px`, on word boundaries where possible.
/// Words longer than a line are truncated.
pub fn wrap_text_to_width(text: &str, font_px: u32, max_px: u32) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();
    let mut cur = String::new();
    for word in text.split_whitespace() {
        let candidate = if cur.is_empty() {
            word.to_string()
        } else {
            format!("{cur} {word}")
        };
        if estimate_text_width_px(&candidate, font_px) <= max_px {
            cur = candidate;
            continue;
        }
        if !cur.is_empty() {
            lines.push(std::mem::take(&mut cur));
        }
        cur = truncate_to_width(word, font_px, max_px);
    }
    if !cur.is_empty() {
        lines.push(cur);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_title_markup() {
        assert_eq!(
            strip_markup("<b>Sales</b><br><sup>by region</sup>"),
            "Salesby region"
        );
        assert_eq!(strip_markup("a < b"), "a ");
    }

    #[test]
    fn wraps_on_words() {
        // 10px font -> 6px per char, 60px fits 10 chars
        let lines = wrap_text_to_width("alpha beta gamma delta", 10, 60);
        assert_eq!(lines, vec!["alpha beta", "gamma", "delta"]);
    }

    #[test]
    fn truncates_long_words() {
        let out = truncate_to_width("supercalifragilistic", 10, 60);
        assert!(out.ends_with('…'));
        assert!(estimate_text_width_px(&out, 10) <= 60);
    }
}
