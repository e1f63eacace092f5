/// Integer formed by the digits at the very end of `text`, ignoring trailing
/// whitespace.
///
/// No separator is required between the number and the preceding text, so
/// `"Preface....iv 12"` and `"Chapter12"` both yield `12`. Returns `None` when
/// the text does not end in an ASCII digit or the digits overflow a `u32`.
pub fn trailing_number(text: &str) -> Option<u32> {
    let trimmed = text.trim_end();
    let digits_start = trimmed
        .trim_end_matches(|c: char| c.is_ascii_digit())
        .len();

    if digits_start == trimmed.len() {
        return None;
    }

    trimmed[digits_start..].parse().ok()
}
