//! Partition type codes.

pub const TYPE_EMPTY: u8 = 0x00;
pub const TYPE_FAT16: u8 = 0x06;
pub const TYPE_NTFS: u8 = 0x07;
pub const TYPE_FAT32_CHS: u8 = 0x0B;
pub const TYPE_FAT32_LBA: u8 = 0x0C;
pub const TYPE_GPT_PROTECTIVE: u8 = 0xEE;

/// Partition type codes recognised as belonging to some known system.
pub const KNOWN_PARTITION_TYPES: &[u8] = &[
    0x00, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0x09, 0x0A, 0x0B, 0x0C, 0x0E, 0x0F,
    0x10, 0x11, 0x12, 0x13, 0x14, 0x15, 0x16, 0x17, 0x18, 0x1B, 0x1C, 0x1E, 0x24, 0x39, 0x3C,
    0x40, 0x41, 0x42, 0x4D, 0x4E, 0x4F, 0x50, 0x51, 0x52, 0x53, 0x54, 0x55, 0x56, 0x5C, 0x61,
    0x63, 0x64, 0x65, 0x70, 0x75, 0x80, 0x81, 0x82, 0x83, 0x84, 0x85, 0x86, 0x87, 0x88, 0x8E,
    0x93, 0x94, 0x9F, 0xA0, 0xA5, 0xA6, 0xA7, 0xA8, 0xA9, 0xAB, 0xB7, 0xB8, 0xBB, 0xBE, 0xBF,
    0xC1, 0xC4, 0xC6, 0xC7, 0xDA, 0xDB, 0xDE, 0xDF, 0xE1, 0xE3, 0xE4, 0xEB, 0xEE, 0xEF, 0xF0,
    0xF1, 0xF2, 0xF3, 0xF4, 0xFD, 0xFE, 0xFF,
];

// One bit per type code, built once at compile time.
static KNOWN_TYPE_BITMAP: [u64; 4] = build_bitmap(KNOWN_PARTITION_TYPES);

const fn build_bitmap(codes: &[u8]) -> [u64; 4] {
    let mut bitmap = [0u64; 4];
    let mut i = 0;
    while i < codes.len() {
        let code = codes[i] as usize;
        bitmap[code / 64] |= 1u64 << (code % 64);
        i += 1;
    }
    bitmap
}

pub fn is_known_partition_type(code: u8) -> bool {
    let code = code as usize;
    KNOWN_TYPE_BITMAP[code / 64] & (1u64 << (code % 64)) != 0
}

pub fn is_fat_type(code: u8) -> bool {
    matches!(code, TYPE_FAT16 | TYPE_FAT32_CHS | TYPE_FAT32_LBA)
}

pub fn is_ntfs_type(code: u8) -> bool {
    code == TYPE_NTFS
}

/// FAT16, FAT32 or NTFS; the types a Windows install may boot from.
pub fn is_windows_compatible_type(code: u8) -> bool {
    is_fat_type(code) || is_ntfs_type(code)
}
