//! Text and byte-string samplers.

use crate::constraints::LengthRange;
use crate::rng::RandomSource;
use record_core::Value;

/// Characters text is drawn from: ASCII letters, digits, punctuation and
/// whitespace, each exactly once.
pub const ALPHABET: &str = concat!(
    "abcdefghijklmnopqrstuvwxyz",
    "ABCDEFGHIJKLMNOPQRSTUVWXYZ",
    "0123456789",
    "!\"#$%&'()*+,-./:;<=>?@[\\]^_`{|}~",
    " \t\n\r\x0b\x0c",
);

/// Draw a length in `range`, then that many characters with repetition.
pub fn sample_text(rng: &mut RandomSource, range: LengthRange) -> Value {
    let length = rng.size_inclusive(range.low, range.high);
    let text: String = rng
        .choose_many(ALPHABET.as_bytes(), length)
        .into_iter()
        .map(char::from)
        .collect();
    Value::Text(text)
}

/// Draw a length in `range`, then that many uniform bytes.
pub fn sample_bytes(rng: &mut RandomSource, range: LengthRange) -> Value {
    let length = rng.size_inclusive(range.low, range.high);
    Value::Bytes(rng.bytes(length))
}
