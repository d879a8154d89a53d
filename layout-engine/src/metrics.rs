//! FILENAME: layout-engine/src/metrics.rs
//! Text measurement and word wrapping.
//!
//! Wrapping breaks between words and only splits a word when the word alone
//! is wider than the column. Explicit newlines always start a new line.

/// Points per millimetre.
const PT_PER_MM: f64 = 72.0 / 25.4;

/// Measures rendered text width in millimetres.
pub trait TextMeasurer {
    fn text_width(&self, text: &str) -> f64;
}

/// Helvetica (Arial-compatible) advance widths, in 1/1000 em.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HelveticaMetrics {
    pub font_size: f64,
}

impl HelveticaMetrics {
    pub fn new(font_size: f64) -> Self {
        HelveticaMetrics { font_size }
    }

    fn char_units(c: char) -> u32 {
        match c {
            ' ' | '!' | ',' | '.' | '/' | ':' | ';' | 'I' | '[' | '\\' | ']' | 'f' | 't' => 278,
            '"' => 355,
            '#' | '$' | '0'..='9' | '?' | '_' | 'L' => 556,
            '%' => 889,
            '&' | 'A' | 'B' | 'E' | 'K' | 'P' | 'S' | 'V' | 'X' | 'Y' => 667,
            '\'' => 191,
            '(' | ')' | '-' | '`' | 'r' => 333,
            '*' => 389,
            '+' | '<' | '=' | '>' | '~' => 584,
            '@' => 1015,
            'C' | 'D' | 'H' | 'N' | 'R' | 'U' => 722,
            'F' | 'T' | 'Z' => 611,
            'G' | 'O' | 'Q' => 778,
            'J' => 500,
            'M' | 'm' => 833,
            'W' => 944,
            '^' => 469,
            'a' | 'b' | 'd' | 'e' | 'g' | 'h' | 'n' | 'o' | 'p' | 'q' | 'u' => 556,
            'c' | 'k' | 's' | 'v' | 'x' | 'y' | 'z' => 500,
            'i' | 'j' | 'l' => 222,
            'w' => 722,
            '{' | '}' => 334,
            '|' => 260,
            // Spanish letters and unit marks
            'Á' | 'É' | 'Ü' => 667,
            'Ú' | 'Ñ' => 722,
            'Ó' => 778,
            'Í' => 278,
            'á' | 'é' | 'ó' | 'ú' | 'ü' | 'ñ' => 556,
            'í' => 278,
            '³' | '²' => 333,
            '°' => 400,
            _ => 556,
        }
    }
}

impl TextMeasurer for HelveticaMetrics {
    fn text_width(&self, text: &str) -> f64 {
        let units: u32 = text.chars().map(Self::char_units).sum();
        units as f64 * self.font_size / 1000.0 / PT_PER_MM
    }
}

/// Every character has the same width. Handy for plain-text surfaces.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonospaceMetrics {
    pub char_width: f64,
}

impl TextMeasurer for MonospaceMetrics {
    fn text_width(&self, text: &str) -> f64 {
        text.chars().count() as f64 * self.char_width
    }
}

/// Wraps `text` into lines no wider than `max_width`.
/// Always returns at least one line (empty text is one empty line).
pub fn wrap_text<M: TextMeasurer + ?Sized>(text: &str, max_width: f64, measurer: &M) -> Vec<String> {
    let mut lines = Vec::new();

    for paragraph in text.split('\n') {
        let paragraph = paragraph.trim_end_matches('\r');
        let mut current = String::new();

        for word in paragraph.split_whitespace() {
            if measurer.text_width(word) > max_width {
                if !current.is_empty() {
                    lines.push(std::mem::take(&mut current));
                }
                let mut pieces = split_word(word, max_width, measurer);
                // The tail piece stays open so following words can join it.
                current = pieces.pop().unwrap_or_default();
                lines.extend(pieces);
                continue;
            }

            if current.is_empty() {
                current.push_str(word);
                continue;
            }

            let candidate_width = measurer.text_width(&current)
                + measurer.text_width(" ")
                + measurer.text_width(word);
            if candidate_width <= max_width {
                current.push(' ');
                current.push_str(word);
            } else {
                lines.push(std::mem::replace(&mut current, word.to_string()));
            }
        }

        lines.push(current);
    }

    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

/// Splits an over-wide word into pieces that fit. Each piece holds at
/// least one character, so a column narrower than a glyph still progresses.
fn split_word<M: TextMeasurer + ?Sized>(word: &str, max_width: f64, measurer: &M) -> Vec<String> {
    let mut pieces = Vec::new();
    let mut piece = String::new();

    for c in word.chars() {
        piece.push(c);
        if piece.chars().count() > 1 && measurer.text_width(&piece) > max_width {
            piece.pop();
            pieces.push(std::mem::take(&mut piece));
            piece.push(c);
        }
    }
    if !piece.is_empty() {
        pieces.push(piece);
    }
    pieces
}

#[cfg(test)]
mod tests {
    use super::*;

    const MONO: MonospaceMetrics = MonospaceMetrics { char_width: 1.0 };

    #[test]
    fn test_helvetica_widths() {
        let m = HelveticaMetrics::new(10.0);
        // "0" is 556 units: 5.56pt at 10pt
        assert!((m.text_width("0") - 5.56 / PT_PER_MM).abs() < 1e-9);
        assert!(m.text_width("W") > m.text_width("i"));
        assert_eq!(m.text_width(""), 0.0);
        let m8 = HelveticaMetrics::new(8.0);
        assert!(m8.text_width("REMISIÓN") < m.text_width("REMISIÓN"));
    }

    #[test]
    fn test_wrap_fits_on_one_line() {
        assert_eq!(wrap_text("abc def", 10.0, &MONO), vec!["abc def"]);
    }

    #[test]
    fn test_wrap_breaks_between_words() {
        assert_eq!(
            wrap_text("aaa bbb ccc ddd", 7.0, &MONO),
            vec!["aaa bbb", "ccc ddd"]
        );
        assert_eq!(wrap_text("aaa bbb ccc", 6.0, &MONO), vec!["aaa", "bbb", "ccc"]);
    }

    #[test]
    fn test_wrap_splits_only_oversized_words() {
        assert_eq!(
            wrap_text("ab abcdefghij cd", 4.0, &MONO),
            vec!["ab", "abcd", "efgh", "ij", "cd"]
        );
        assert_eq!(wrap_text("abcdefgh", 4.0, &MONO), vec!["abcd", "efgh"]);
        assert_eq!(wrap_text("abcde xy", 4.0, &MONO), vec!["abcd", "e xy"]);
    }

    #[test]
    fn test_wrap_empty_and_newlines() {
        assert_eq!(wrap_text("", 10.0, &MONO), vec![""]);
        assert_eq!(wrap_text("   ", 10.0, &MONO), vec![""]);
        assert_eq!(wrap_text("one\ntwo", 10.0, &MONO), vec!["one", "two"]);
        assert_eq!(wrap_text("one\r\n\r\ntwo", 10.0, &MONO), vec!["one", "", "two"]);
    }

    #[test]
    fn test_wrap_narrow_column_still_progresses() {
        assert_eq!(wrap_text("abc", 0.5, &MONO), vec!["a", "b", "c"]);
    }
}
