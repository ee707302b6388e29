use crate::utils::error::{ConvertError, Result};
use base64::Engine;

const BYTE_ORDER_MARK: char = '\u{feff}';

pub fn encode_base64(bytes: &[u8]) -> String {
    base64::engine::general_purpose::STANDARD.encode(bytes)
}

pub fn decode_base64(data: &str) -> Result<Vec<u8>> {
    base64::engine::general_purpose::STANDARD
        .decode(data)
        .map_err(|e| ConvertError::encoding("base64", format!("invalid payload data: {}", e)))
}

/// Character encodings understood when turning payload bytes into text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEncoding {
    Utf8,
    Ascii,
    Latin1,
    Utf16Le,
    Base64,
    Hex,
}

impl TextEncoding {
    pub fn from_name(name: &str) -> Result<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "utf8" | "utf-8" => Ok(Self::Utf8),
            "ascii" | "us-ascii" => Ok(Self::Ascii),
            "latin1" | "binary" | "iso-8859-1" | "iso8859-1" => Ok(Self::Latin1),
            "utf16le" | "utf-16le" | "ucs2" | "ucs-2" => Ok(Self::Utf16Le),
            "base64" => Ok(Self::Base64),
            "hex" => Ok(Self::Hex),
            _ => Err(ConvertError::encoding(name, "unrecognized character encoding")),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Utf8 => "utf8",
            Self::Ascii => "ascii",
            Self::Latin1 => "latin1",
            Self::Utf16Le => "utf16le",
            Self::Base64 => "base64",
            Self::Hex => "hex",
        }
    }

    pub fn decode(&self, bytes: &[u8]) -> Result<String> {
        match self {
            Self::Utf8 => String::from_utf8(bytes.to_vec())
                .map_err(|e| ConvertError::encoding(self.name(), e.to_string())),
            Self::Ascii => match bytes.iter().position(|b| !b.is_ascii()) {
                Some(offset) => Err(ConvertError::encoding(
                    self.name(),
                    format!("non-ASCII byte 0x{:02x} at offset {}", bytes[offset], offset),
                )),
                None => Ok(bytes.iter().map(|&b| b as char).collect()),
            },
            Self::Latin1 => Ok(bytes.iter().map(|&b| b as char).collect()),
            Self::Utf16Le => {
                if bytes.len() % 2 != 0 {
                    return Err(ConvertError::encoding(
                        self.name(),
                        format!("odd number of bytes ({})", bytes.len()),
                    ));
                }
                let units = bytes
                    .chunks_exact(2)
                    .map(|pair| u16::from_le_bytes([pair[0], pair[1]]));
                char::decode_utf16(units)
                    .collect::<std::result::Result<String, _>>()
                    .map_err(|e| ConvertError::encoding(self.name(), e.to_string()))
            }
            Self::Base64 => Ok(encode_base64(bytes)),
            Self::Hex => Ok(hex::encode(bytes)),
        }
    }
}

/// Drops a leading byte order mark from decoded text.
pub fn strip_bom(text: &str) -> &str {
    text.strip_prefix(BYTE_ORDER_MARK).unwrap_or(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base64_round_trip() {
        let samples: [&[u8]; 4] = [b"", b"{\"a\":1}", &[0, 255, 128, 7], "żółw 🐢".as_bytes()];
        for bytes in samples {
            assert_eq!(decode_base64(&encode_base64(bytes)).unwrap(), bytes);
        }
        assert_eq!(encode_base64(b"{\"a\":1}"), "eyJhIjoxfQ==");
    }

    #[test]
    fn test_invalid_base64_is_encoding_failure() {
        let err = decode_base64("not base64!").unwrap_err();
        assert!(matches!(err, ConvertError::EncodingFailure { .. }));
    }

    #[test]
    fn test_encoding_names() {
        assert_eq!(TextEncoding::from_name("UTF-8").unwrap(), TextEncoding::Utf8);
        assert_eq!(TextEncoding::from_name("binary").unwrap(), TextEncoding::Latin1);
        assert_eq!(TextEncoding::from_name("ucs2").unwrap(), TextEncoding::Utf16Le);
        assert!(TextEncoding::from_name("klingon").is_err());
    }

    #[test]
    fn test_decode_text_encodings() {
        assert_eq!(TextEncoding::Utf8.decode("héllo".as_bytes()).unwrap(), "héllo");
        assert_eq!(TextEncoding::Latin1.decode(&[0x68, 0xe9]).unwrap(), "hé");
        assert_eq!(TextEncoding::Utf16Le.decode(&[0x68, 0x00, 0x69, 0x00]).unwrap(), "hi");
        assert_eq!(TextEncoding::Hex.decode(&[0xde, 0xad]).unwrap(), "dead");
        assert_eq!(TextEncoding::Base64.decode(b"hi").unwrap(), "aGk=");
    }

    #[test]
    fn test_invalid_sequences_fail() {
        assert!(TextEncoding::Utf8.decode(&[0xff, 0xfe, 0x00]).is_err());
        assert!(TextEncoding::Ascii.decode(&[0x41, 0xc3]).is_err());
        assert!(TextEncoding::Utf16Le.decode(&[0x68]).is_err());
        assert!(TextEncoding::Utf16Le.decode(&[0x00, 0xd8]).is_err());
    }

    #[test]
    fn test_strip_bom() {
        let with_bom = TextEncoding::Utf8.decode(&[0xef, 0xbb, 0xbf, b'{', b'}']).unwrap();
        assert_eq!(strip_bom(&with_bom), "{}");
        let utf16 = TextEncoding::Utf16Le.decode(&[0xff, 0xfe, b'a', 0x00]).unwrap();
        assert_eq!(strip_bom(&utf16), "a");
        assert_eq!(strip_bom("plain"), "plain");
    }
}
