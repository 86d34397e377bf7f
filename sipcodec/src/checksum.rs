//! SIP2 error-detection support: message checksums and the
//! sequence-number + checksum trailer.
//!
//! The checksum is the 16-bit two's complement of the byte sum of the
//! message, computed over everything up to and including the "AZ"
//! checksum field prefix, so that the full frame (trailer included)
//! sums to zero mod 0x10000.

/// 16-bit two's complement of the byte sum of `text`.
pub fn checksum(text: &str) -> u16 {
    let sum: u32 = text.bytes().map(u32::from).sum();
    (sum as u16).wrapping_neg()
}

/// The checksum rendered as it appears on the wire: four uppercase
/// hex digits.
///
/// ```
/// use sipcodec::checksum;
/// assert_eq!(checksum::checksum_field("97AZ"), "FEF5");
/// ```
pub fn checksum_field(text: &str) -> String {
    format!("{:04X}", checksum(text))
}

/// Append the "AY{seq}AZ{cksum}" error-detection trailer to a message.
///
/// The sequence number is a single ASCII digit chosen by the terminal
/// and echoed in the response.
///
/// ```
/// use sipcodec::checksum;
/// let frame = checksum::with_trailer("9300CNuser|COpass|", '3');
/// assert!(frame.ends_with(&checksum::checksum_field(&frame[..frame.len() - 4])));
/// assert!(checksum::verify(&frame));
/// ```
pub fn with_trailer(msg: &str, seq: char) -> String {
    let mut frame = format!("{msg}AY{seq}AZ");
    frame += &checksum_field(&frame);
    frame
}

/// Verify the checksum of a full frame carrying an error-detection
/// trailer.
///
/// Returns false when the trailing checksum does not balance the frame
/// or when the "AZ" checksum prefix is missing.
pub fn verify(frame: &str) -> bool {
    if frame.len() < 6 {
        return false;
    }

    let split = frame.len() - 4;

    let (body, hex) = match (frame.get(..split), frame.get(split..)) {
        (Some(b), Some(h)) => (b, h),
        _ => return false,
    };

    if !body.ends_with("AZ") {
        return false;
    }

    let cksum = match u16::from_str_radix(hex, 16) {
        Ok(c) => u32::from(c),
        Err(_) => return false,
    };

    let sum: u32 = body.bytes().map(u32::from).sum();

    (sum + cksum) & 0xFFFF == 0
}
