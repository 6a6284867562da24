use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChipError {
    /// ROM image does not fit between the load origin and the end of ram
    ProgramTooLarge(usize),
    /// Program-derived address past the 12-bit space (strict mode only)
    AddressOutOfRange(u16),
    StackOverflow,
    StackUnderflow,
}

impl fmt::Display for ChipError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChipError::ProgramTooLarge(size) => {
                write!(f, "program image of {} bytes does not fit in ram", size)
            }
            ChipError::AddressOutOfRange(addr) => {
                write!(f, "address {:#05x} out of range", addr)
            }
            ChipError::StackOverflow => write!(f, "call stack overflow"),
            ChipError::StackUnderflow => write!(f, "call stack underflow"),
        }
    }
}

impl std::error::Error for ChipError {}
