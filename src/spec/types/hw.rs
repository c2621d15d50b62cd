use static_assertions::const_assert;

pub type Word = u16;

// A memory address. Only the low `ADDR_WIDTH` bits are ever meaningful.
pub type Addr = u16;

pub const WORD_WIDTH: usize = 16;
pub const ADDR_WIDTH: u32 = 12;

pub const MEMORY_WORDS: usize = 1 << ADDR_WIDTH;
pub const ADDR_MAX: Addr = (MEMORY_WORDS - 1) as Addr;

// Words below this address are reserved for the machine and may not hold declared data.
pub const DATA_ADDR_MIN: Addr = 0x010;

// Set on an instruction word when its operand is an indirect (pointer) reference.
pub const INDIRECT_BIT: Word = 0x8000;

const_assert!(MEMORY_WORDS == 4096);
const_assert!((DATA_ADDR_MIN as usize) < MEMORY_WORDS);
const_assert!(INDIRECT_BIT as usize > ADDR_MAX as usize);

