//! Chat log byte decoding. Game chat logs are written as UTF-16LE.

const BYTE_ORDER_MARK: char = '\u{feff}';

/// Decode UTF-16LE bytes, dropping a leading byte order mark.
pub fn decode_log_bytes(bytes: &[u8]) -> Result<String, String> {
    if bytes.len() % 2 != 0 {
        return Err(format!("odd byte count {} for UTF-16LE", bytes.len()));
    }
    let units: Vec<u16> = bytes
        .chunks_exact(2)
        .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
        .collect();
    let text = String::from_utf16(&units).map_err(|e| e.to_string())?;
    Ok(text
        .strip_prefix(BYTE_ORDER_MARK)
        .map(str::to_string)
        .unwrap_or(text))
}

/// Encode text the way the game client writes its logs.
pub fn encode_utf16le(text: &str) -> Vec<u8> {
    text.encode_utf16().flat_map(u16::to_le_bytes).collect()
}
