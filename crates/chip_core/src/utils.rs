/// Splits an instruction word into its four nibbles, high first.
#[inline(always)]
pub fn nibbles(op: u16) -> (u8, u8, u8, u8) {
    (
        (op >> 12) as u8 & 0x0F,
        (op >> 8) as u8 & 0x0F,
        (op >> 4) as u8 & 0x0F,
        op as u8 & 0x0F,
    )
}

#[inline(always)]
pub fn u8_from_two(a: u8, b: u8) -> u8 {
    // assumes u4 inputs, but does not verify
    a << 4 | b
}

#[inline(always)]
pub fn u16_from_three(a: u8, b: u8, c: u8) -> u16 {
    // assumes u4 inputs, but does not verify
    (a as u16) << 8 | (b as u16) << 4 | (c as u16)
}

#[inline(always)]
pub fn u16_from_two(a: u8, b: u8) -> u16 {
    (a as u16) << 8 | b as u16
}

#[cfg(test)]
mod tests {
    use super::*;
    #[test]
    fn word_composition() {
        assert!(u16_from_two(0xAB, 0xCD) == 0xABCD);
        assert!(u16_from_three(0xA, 0xB, 0xC) == 0x0ABC);
        assert!(u8_from_two(0xA, 0xB) == 0xAB);
    }
    #[test]
    fn word_decomposition() {
        assert!(nibbles(0xD235) == (0xD, 0x2, 0x3, 0x5));
    }
}
