//! Normalization-form mixing stage
//!
//! Each Unicode scalar value is re-encoded on its own, either decomposed
//! (NFD) or composed (NFC), with even odds. Rendering is unchanged: `é`
//! stays `é` whether it is stored as U+00E9 or as U+0065 U+0301. The code
//! point stream becomes a non-canonical mixture of both forms.
//!
//! Mixing is done per scalar value, not per grapheme cluster. A base letter
//! followed by a separate combining mark is therefore left as two scalars
//! even when NFC is chosen for both.

use fastrand::Rng;
use unicode_normalization::UnicodeNormalization;

/// Probability that a scalar value is emitted in decomposed form
pub const DECOMPOSE_PROBABILITY: f64 = 0.5;

/// Re-encode every scalar value of `text` independently into NFD or NFC
pub fn mix_normalization_forms(text: &str, rng: &mut Rng) -> String {
    let mut output = String::with_capacity(text.len() + text.len() / 4);
    let mut buf = [0u8; 4];
    let mut decomposed = 0usize;

    for ch in text.chars() {
        let scalar: &str = ch.encode_utf8(&mut buf);
        if rng.f64() < DECOMPOSE_PROBABILITY {
            output.extend(scalar.nfd());
            decomposed += 1;
        } else {
            output.extend(scalar.nfc());
        }
    }

    tracing::debug!(decomposed, "normalization forms mixed");
    output
}
