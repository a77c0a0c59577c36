use std::io::Write;
use std::sync::atomic::{AtomicUsize, Ordering};

use flate2::write::ZlibEncoder;
use flate2::Compression;

/// Since the random number generator doesn't have to be cryptographically secure
/// it doesn't make sense to import the entire rand library, so this is just a
/// xorshift pseudo-random function
static RAND_SEED: AtomicUsize = AtomicUsize::new(2100);

/// Xorshift-based random number generator. Impure function
pub(crate) fn random_number() -> usize {
    let mut x = RAND_SEED.fetch_add(21, Ordering::SeqCst);
    #[cfg(target_pointer_width = "64")]
    {
        x ^= x << 21;
        x ^= x >> 35;
        x ^= x << 4;
        x
    }

    #[cfg(target_pointer_width = "32")]
    {
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        x
    }
}

/// Returns a string with 32 random characters, used for the trailer `/ID`
pub(crate) fn random_character_string_32() -> String {
    const MAX_CHARS: usize = 32;
    let mut final_string = String::with_capacity(MAX_CHARS);

    while final_string.len() < MAX_CHARS {
        let rand = random_number().to_string();
        for digit in rand.bytes().map(|b| b - b'0') {
            if final_string.len() == MAX_CHARS {
                break;
            }
            final_string.push(u8_to_char(digit));
        }
    }

    final_string
}

/// `0 => A`, `1 => B`, and so on
#[inline(always)]
fn u8_to_char(input: u8) -> char {
    (b'A' + input) as char
}

/// Takes a Vec<u8> of RGBA data and returns two Vec<u8> of RGB and alpha data
pub(crate) fn rgba_to_rgb(data: &[u8]) -> (Vec<u8>, Vec<u8>) {
    let mut rgb = Vec::with_capacity(data.len() / 4 * 3);
    let mut alpha = Vec::with_capacity(data.len() / 4);
    for px in data.chunks_exact(4) {
        rgb.extend_from_slice(&px[..3]);
        alpha.push(px[3]);
    }

    (rgb, alpha)
}

/// Takes luma + alpha data and returns the luma and alpha channels
pub(crate) fn la_to_luma(data: &[u8]) -> (Vec<u8>, Vec<u8>) {
    let mut luma = Vec::with_capacity(data.len() / 2);
    let mut alpha = Vec::with_capacity(data.len() / 2);
    for px in data.chunks_exact(2) {
        luma.push(px[0]);
        alpha.push(px[1]);
    }

    (luma, alpha)
}

/// zlib stream suitable for `/FlateDecode`
pub(crate) fn compress(data: &[u8]) -> std::io::Result<Vec<u8>> {
    let mut encoder = ZlibEncoder::new(Vec::with_capacity(data.len() / 2), Compression::default());
    encoder.write_all(data)?;
    encoder.finish()
}

/// PDF text string: a literal for ASCII text, UTF-16BE with byte order mark otherwise
pub(crate) fn text_string(text: &str) -> lopdf::Object {
    if text.is_ascii() {
        return lopdf::Object::String(text.as_bytes().to_vec(), lopdf::StringFormat::Literal);
    }
    let mut bytes = vec![0xFE, 0xFF];
    for unit in text.encode_utf16() {
        bytes.extend_from_slice(&unit.to_be_bytes());
    }
    lopdf::Object::String(bytes, lopdf::StringFormat::Hexadecimal)
}
