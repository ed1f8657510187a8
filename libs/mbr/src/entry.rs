// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use core::fmt;

use binrw::{BinRead, BinReaderExt};

use crate::chs::CylinderSector;
use crate::{MbrError, Result, types};

/// Boot indicator marking the active partition.
pub const BOOT_INDICATOR: u8 = 0x80;

/// On-disk layout of a partition table slot.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, BinRead)]
#[br(little)]
struct PartRecord {
    state: u8,
    begin_head: u8,
    begin_chs: u16,
    partition_type: u8,
    end_head: u8,
    end_chs: u16,
    relative_sector: u32,
    sector_count: u32,
}

/// One of the four 16-byte partition table entries of an MBR.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct PartitionEntry {
    bytes: [u8; PartitionEntry::SIZE],
    record: PartRecord,
    begin: CylinderSector,
    end: CylinderSector,
}

impl PartitionEntry {
    pub const SIZE: usize = 16;

    /// Decode an entry from exactly [`PartitionEntry::SIZE`] bytes.
    pub fn new(bytes: &[u8]) -> Result<Self> {
        let bytes: [u8; Self::SIZE] = bytes.try_into().map_err(|_| MbrError::InvalidBufferLength {
            expected: Self::SIZE,
            found: bytes.len(),
        })?;
        let record: PartRecord = binrw::io::Cursor::new(&bytes[..]).read_le()?;
        Ok(Self {
            bytes,
            record,
            begin: CylinderSector::unpack(record.begin_chs),
            end: CylinderSector::unpack(record.end_chs),
        })
    }

    pub fn entry_bytes(&self) -> &[u8; Self::SIZE] {
        &self.bytes
    }

    /// Raw boot indicator byte.
    pub fn state(&self) -> u8 {
        self.record.state
    }

    pub fn is_bootable(&self) -> bool {
        self.record.state == BOOT_INDICATOR
    }

    pub fn begin_head(&self) -> u8 {
        self.record.begin_head
    }

    pub fn begin_cylinder(&self) -> u16 {
        self.begin.cylinder
    }

    pub fn begin_sector(&self) -> u8 {
        self.begin.sector
    }

    pub fn end_head(&self) -> u8 {
        self.record.end_head
    }

    pub fn end_cylinder(&self) -> u16 {
        self.end.cylinder
    }

    pub fn end_sector(&self) -> u8 {
        self.end.sector
    }

    pub fn begin_chs(&self) -> CylinderSector {
        self.begin
    }

    pub fn end_chs(&self) -> CylinderSector {
        self.end
    }

    pub fn partition_type(&self) -> u8 {
        self.record.partition_type
    }

    /// Sectors between the MBR and the first sector of the partition.
    pub fn relative_sector_lba(&self) -> u32 {
        self.record.relative_sector
    }

    pub fn sector_count(&self) -> u32 {
        self.record.sector_count
    }

    /// `begin_head + end_head`.
    ///
    /// This is a sum, not a head count. Descriptor output uses it as the
    /// heads-per-track figure, so the arithmetic is kept as is.
    pub fn head_sum(&self) -> u16 {
        self.record.begin_head as u16 + self.record.end_head as u16
    }

    /// `begin_cylinder + end_cylinder`. A sum, like [`Self::head_sum`].
    pub fn cylinder_sum(&self) -> u16 {
        self.begin.cylinder + self.end.cylinder
    }

    pub fn is_valid_partition_type(&self) -> bool {
        types::is_known_partition_type(self.record.partition_type)
    }

    pub fn is_fat(&self) -> bool {
        types::is_fat_type(self.record.partition_type)
    }

    pub fn is_ntfs(&self) -> bool {
        types::is_ntfs_type(self.record.partition_type)
    }

    pub fn is_windows_compatible_type(&self) -> bool {
        types::is_windows_compatible_type(self.record.partition_type)
    }
}

impl TryFrom<&[u8]> for PartitionEntry {
    type Error = MbrError;

    fn try_from(bytes: &[u8]) -> Result<Self> {
        Self::new(bytes)
    }
}

impl fmt::Display for PartitionEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Is Bootable: {}", self.is_bootable())?;
        writeln!(f, "Begin Head: {}", self.begin_head())?;
        writeln!(f, "Begin Cylinder: {}", self.begin_cylinder())?;
        writeln!(f, "Begin Sector: {}", self.begin_sector())?;
        writeln!(f, "Partition Type: {:#x}", self.partition_type())?;
        writeln!(f, "End Head: {}", self.end_head())?;
        writeln!(f, "End Cylinder: {}", self.end_cylinder())?;
        writeln!(f, "End Sector: {}", self.end_sector())?;
        writeln!(f, "Relative Sector: {}", self.relative_sector_lba())?;
        writeln!(f, "Num Sectors: {}", self.sector_count())?;
        writeln!(f, "Head Sum: {}", self.head_sum())?;
        writeln!(f, "Cylinder Sum: {}", self.cylinder_sum())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NTFS_ENTRY: [u8; 16] = [
        0x80, 0, 0x01, 0x00, 0x07, 0, 0x01, 0x00, 0, 0, 0, 0, 0x00, 0x08, 0, 0,
    ];

    #[test]
    fn decode_ntfs_entry() {
        let entry = PartitionEntry::new(&NTFS_ENTRY).unwrap();
        assert!(entry.is_bootable());
        assert!(entry.is_ntfs());
        assert!(!entry.is_fat());
        assert!(entry.is_windows_compatible_type());
        assert!(entry.is_valid_partition_type());
        assert_eq!(entry.partition_type(), 0x07);
        assert_eq!(entry.begin_sector(), 1);
        assert_eq!(entry.end_sector(), 1);
        assert_eq!(entry.relative_sector_lba(), 0);
        assert_eq!(entry.sector_count(), 2048);
        assert_eq!(entry.entry_bytes(), &NTFS_ENTRY);
    }

    #[test]
    fn decode_all_fields() {
        let bytes = [
            0x00, 0x01, 0xC1, 0xFF, 0x83, 0xFE, 0xFF, 0xFF, 0x3F, 0x00, 0x00, 0x00, 0x78, 0x56,
            0x34, 0x12,
        ];
        let entry = PartitionEntry::new(&bytes).unwrap();
        assert!(!entry.is_bootable());
        assert_eq!(entry.begin_head(), 1);
        assert_eq!(entry.begin_sector(), 1);
        assert_eq!(entry.begin_cylinder(), 0xFF + 768);
        assert_eq!(entry.partition_type(), 0x83);
        assert_eq!(entry.end_head(), 254);
        assert_eq!(entry.end_sector(), 63);
        assert_eq!(entry.end_cylinder(), 1023);
        assert_eq!(entry.relative_sector_lba(), 63);
        assert_eq!(entry.sector_count(), 0x1234_5678);
        assert_eq!(entry.head_sum(), 255);
        assert_eq!(entry.cylinder_sum(), 1023 + 1023);
        assert!(!entry.is_windows_compatible_type());
    }

    #[test]
    fn high_bytes_do_not_sign_extend() {
        let mut bytes = [0xFF; 16];
        bytes[0] = 0;
        let entry = PartitionEntry::new(&bytes).unwrap();
        assert_eq!(entry.relative_sector_lba(), u32::MAX);
        assert_eq!(entry.sector_count(), u32::MAX);
        assert_eq!(entry.head_sum(), 510);
    }

    #[test]
    fn bootable_only_for_0x80() {
        for state in 0..=u8::MAX {
            let mut bytes = [0u8; 16];
            bytes[0] = state;
            let entry = PartitionEntry::new(&bytes).unwrap();
            assert_eq!(entry.is_bootable(), state == 0x80, "state {state:#04x}");
            assert_eq!(entry.state(), state);
        }
    }

    #[test]
    fn rejects_wrong_length() {
        for len in [0, 15, 17, 512] {
            let bytes = vec![0u8; len];
            let err = PartitionEntry::new(&bytes).unwrap_err();
            assert!(matches!(
                err,
                MbrError::InvalidBufferLength {
                    expected: 16,
                    found
                } if found == len
            ));
        }
    }

    #[test]
    fn display_lists_fields() {
        let entry = PartitionEntry::try_from(&NTFS_ENTRY[..]).unwrap();
        let text = entry.to_string();
        assert!(text.starts_with("Is Bootable: true\n"));
        assert!(text.contains("Partition Type: 0x7\n"));
        assert!(text.contains("Num Sectors: 2048\n"));
    }
}
