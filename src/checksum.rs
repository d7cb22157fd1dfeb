/// Internet checksum (RFC 1071) over an arbitrary buffer.
///
/// Words are read in network byte order. A trailing odd byte is the high byte
/// of a zero-padded word.
pub fn checksum(data: &[u8]) -> u16 {
    let mut sum: u32 = 0;
    let mut chunks = data.chunks_exact(2);
    for word in &mut chunks {
        sum += u16::from_be_bytes([word[0], word[1]]) as u32;
    }
    if let [last] = chunks.remainder() {
        sum += (*last as u32) << 8;
    }

    sum = (sum >> 16) + (sum & 0xffff);
    sum += sum >> 16;
    !(sum as u16)
}

/// True when a buffer carrying its own checksum sums to zero.
pub fn verify(data: &[u8]) -> bool {
    checksum(data) == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_buffer() {
        assert_eq!(checksum(&[]), 0xffff);
    }

    #[test]
    fn test_rfc1071_example() {
        // RFC 1071 section 3: sum is 0xddf2, checksum is its complement
        let data = [0x00, 0x01, 0xf2, 0x03, 0xf4, 0xf5, 0xf6, 0xf7];
        assert_eq!(checksum(&data), !0xddf2u16);
    }

    #[test]
    fn test_odd_length_pads_high_byte() {
        assert_eq!(checksum(&[0x12]), checksum(&[0x12, 0x00]));
        // 0xabcd + 0xef00 = 0x19acd, folded to 0x9ace
        assert_eq!(checksum(&[0xab, 0xcd, 0xef]), !0x9aceu16);
    }

    #[test]
    fn test_carry_is_folded() {
        // 0xffff + 0x0001 overflows into the carry, folds back to 0x0001
        assert_eq!(checksum(&[0xff, 0xff, 0x00, 0x01]), !0x0001u16);
    }

    #[test]
    fn test_inserted_checksum_verifies() {
        let mut header = [8u8, 0, 0, 0, 0x12, 0x34, 0x00, 0x07, 0xde, 0xad, 0xbe];
        let sum = checksum(&header);
        header[2..4].copy_from_slice(&sum.to_be_bytes());
        assert!(verify(&header), "buffer with its checksum inserted should sum to zero");
    }
}
