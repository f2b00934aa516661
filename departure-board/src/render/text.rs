//! Fixed-width text helpers for board columns.

/// Appended to names cut to fit a column.
const TRUNCATION_MARK: char = '.';

/// Abbreviations tried, in order, when an address is too long.
const ABBREVIATIONS: [(&str, &str); 3] = [("asse", "."), ("traße", "tr."), ("latz", "l.")];

/// Countdown column text: `**` for a vehicle in the station, else two digits.
pub fn display_countdown(minutes: u32) -> String {
    if minutes == 0 {
        "**".to_string()
    } else {
        format!("{minutes:02}")
    }
}

/// Cut `name` to fit `width` characters, marking the cut.
pub fn format_name(name: &str, width: usize) -> String {
    if name.chars().count() <= width {
        return name.to_string();
    }

    let mut cut: String = name.chars().take(width.saturating_sub(2)).collect();
    cut.push(TRUNCATION_MARK);
    cut
}

/// Format a station or direction name for a column of `width` characters.
///
/// All-caps names are title-cased. Names that do not fit are abbreviated
/// (`Gasse` → `G.`, `Straße` → `Str.`, `Platz` → `Pl.`) before cutting.
pub fn format_addr(addr: &str, width: usize) -> String {
    let mut addr = if is_all_caps(addr) {
        title_case(addr)
    } else {
        addr.to_string()
    };

    if addr.chars().count() > width {
        for (long, short) in ABBREVIATIONS {
            addr = addr.replace(long, short);
        }
    }

    format_name(&addr, width)
}

/// Greedy word wrap to at most `width` characters per line.
///
/// Words longer than a line are split.
pub fn wrap(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();

        while word.len() > width {
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            let rest = word.split_off(width);
            lines.push(word.into_iter().collect());
            word = rest;
        }

        let current_len = current.chars().count();
        if current_len > 0 && current_len + 1 + word.len() > width {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.extend(word);
    }

    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

fn is_all_caps(s: &str) -> bool {
    s.chars().any(char::is_uppercase) && !s.chars().any(char::is_lowercase)
}

/// Upper-case the first letter of every word, lower-case the rest.
fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_word = false;
    for c in s.chars() {
        if in_word {
            out.extend(c.to_lowercase());
        } else {
            out.extend(c.to_uppercase());
        }
        in_word = c.is_alphabetic();
    }
    out
}
