//! Character classes used for word boundaries
//!
//! Letters and digits are ASCII-only on purpose: any other character,
//! including non-ASCII letters, belongs to the symbol class.

pub fn is_letter(ch: char) -> bool {
    ch.is_ascii_alphabetic()
}

pub fn is_number(ch: char) -> bool {
    ch.is_ascii_digit()
}

pub fn is_alphanumeric(ch: char) -> bool {
    is_letter(ch) || is_number(ch)
}

/// Neither alphanumeric nor whitespace under the given predicate
pub fn is_symbol_char(ch: char, is_whitespace: impl Fn(char) -> bool) -> bool {
    !is_alphanumeric(ch) && !is_whitespace(ch)
}

/// Whitespace as the C locale defines it: space, `\t`, `\n`, `\v`, `\f`, `\r`
pub fn is_c_whitespace(ch: char) -> bool {
    matches!(ch, ' ' | '\t' | '\n' | '\x0B' | '\x0C' | '\r')
}

/// A word boundary lies between `prev` and `next` when `next` is whitespace
/// or the two differ in alphanumeric class.
pub fn hits_word_boundary(prev: char, next: char, is_whitespace: impl Fn(char) -> bool) -> bool {
    is_whitespace(next) || is_alphanumeric(prev) != is_alphanumeric(next)
}
