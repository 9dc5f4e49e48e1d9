use chardetng::EncodingDetector;
use encoding_rs::Encoding;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedText {
    pub text: String,
    pub encoding_label: String,
}

/// Decode raw response bytes into UTF-8 text using: BOM -> Content-Type
/// charset -> chardetng detection. Malformed sequences become replacement
/// characters; a body always yields a text view.
pub fn decode_text(bytes: &[u8], content_type: Option<&str>) -> DecodedText {
    let encoding = Encoding::for_bom(bytes)
        .map(|(encoding, _bom_len)| encoding)
        .or_else(|| {
            content_type
                .and_then(extract_charset)
                .and_then(|label| Encoding::for_label(label.as_bytes()))
        })
        .unwrap_or_else(|| {
            let mut detector = EncodingDetector::new();
            detector.feed(bytes, true);
            detector.guess(None, true)
        });

    let (text, used, _had_errors) = encoding.decode(bytes);
    DecodedText {
        text: text.into_owned(),
        encoding_label: used.name().to_string(),
    }
}

fn extract_charset(content_type: &str) -> Option<&str> {
    content_type.split(';').find_map(|part| {
        let (key, value) = part.trim().split_once('=')?;
        if key.eq_ignore_ascii_case("charset") {
            Some(value.trim_matches([' ', '"', '\''].as_ref()))
        } else {
            None
        }
    })
}
