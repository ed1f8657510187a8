// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use core::fmt;
use std::fs::File;
use std::io::{BufReader, Read, Seek, SeekFrom};
use std::path::Path;

use crate::entry::PartitionEntry;
use crate::{MbrError, Result, SECTOR_SIZE};

pub const BOOT_CODE_SIZE: usize = 446;
pub const PARTITION_TABLE_OFFSET: usize = BOOT_CODE_SIZE;
pub const PARTITION_COUNT: usize = 4;
pub const SIGNATURE_OFFSET: usize = PARTITION_TABLE_OFFSET + PARTITION_COUNT * PartitionEntry::SIZE;

/// Marker expected in the last two bytes of a boot sector.
pub const BOOT_SIGNATURE: [u8; 2] = [0x55, 0xAA];

/// `xor ax, ax; mov ss, ...`, the first instructions of Windows-written boot code.
pub const WINDOWS_BOOT_CODE_PROLOGUE: [u8; 3] = [0x33, 0xC0, 0x8E];

/// Master Boot Record, the first sector of a disk image.
///
/// Built once from the raw sector and the total size of the image it was read
/// from; every query afterwards is a pure read.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MasterBootRecord {
    sector: [u8; SECTOR_SIZE],
    partitions: [PartitionEntry; PARTITION_COUNT],
    image_size_bytes: u64,
}

impl MasterBootRecord {
    /// Decode a record from exactly [`SECTOR_SIZE`] bytes.
    ///
    /// `image_size_bytes` is the length of the whole image the sector came
    /// from and only feeds [`Self::total_sectors_from_image_size`].
    pub fn new(bytes: &[u8], image_size_bytes: u64) -> Result<Self> {
        let sector: [u8; SECTOR_SIZE] =
            bytes.try_into().map_err(|_| MbrError::InvalidBufferLength {
                expected: SECTOR_SIZE,
                found: bytes.len(),
            })?;

        let entry = |index: usize| {
            let start = PARTITION_TABLE_OFFSET + index * PartitionEntry::SIZE;
            PartitionEntry::new(&sector[start..start + PartitionEntry::SIZE])
        };
        let partitions = [entry(0)?, entry(1)?, entry(2)?, entry(3)?];

        Ok(Self {
            sector,
            partitions,
            image_size_bytes,
        })
    }

    /// Read the first sector of a seekable source.
    ///
    /// The image size is taken from the end of the stream. A source shorter
    /// than one sector is rejected with [`MbrError::InvalidBufferLength`].
    pub fn read_from<R: Read + Seek>(r: &mut R) -> Result<Self> {
        let image_size_bytes = r.seek(SeekFrom::End(0))?;
        r.seek(SeekFrom::Start(0))?;
        let mut sector = Vec::with_capacity(SECTOR_SIZE);
        r.take(SECTOR_SIZE as u64).read_to_end(&mut sector)?;
        Self::new(&sector, image_size_bytes)
    }

    pub fn open(path: &Path) -> Result<Self> {
        let mut r = BufReader::new(File::open(path)?);
        Self::read_from(&mut r)
    }

    /// The full 512-byte sector as read.
    pub fn sector_bytes(&self) -> &[u8; SECTOR_SIZE] {
        &self.sector
    }

    pub fn boot_code(&self) -> &[u8] {
        &self.sector[..BOOT_CODE_SIZE]
    }

    pub fn boot_signature_marker(&self) -> [u8; 2] {
        [self.sector[SIGNATURE_OFFSET], self.sector[SIGNATURE_OFFSET + 1]]
    }

    pub fn has_boot_signature(&self) -> bool {
        self.boot_signature_marker() == BOOT_SIGNATURE
    }

    pub fn image_size_bytes(&self) -> u64 {
        self.image_size_bytes
    }

    pub fn partitions(&self) -> &[PartitionEntry; PARTITION_COUNT] {
        &self.partitions
    }

    /// Partition entry by its 1-based table position.
    pub fn partition(&self, number: usize) -> Option<&PartitionEntry> {
        number
            .checked_sub(1)
            .and_then(|index| self.partitions.get(index))
    }

    /// First entry, in table order, with the boot indicator set.
    pub fn bootable_partition(&self) -> Option<&PartitionEntry> {
        self.partitions.iter().find(|p| p.is_bootable())
    }

    /// 1-based position of [`Self::bootable_partition`].
    pub fn bootable_partition_index(&self) -> Option<usize> {
        self.partitions
            .iter()
            .position(|p| p.is_bootable())
            .map(|index| index + 1)
    }

    /// Sum of the sector counts of all four entries.
    ///
    /// Some partitioning tools write counts larger than the disk, so this may
    /// exceed [`Self::total_sectors_from_image_size`].
    pub fn total_sectors_from_partition_table(&self) -> u64 {
        self.partitions
            .iter()
            .map(|p| p.sector_count() as u64)
            .sum()
    }

    /// Whole sectors in the source image; a trailing partial sector is dropped.
    pub fn total_sectors_from_image_size(&self) -> u64 {
        self.image_size_bytes / SECTOR_SIZE as u64
    }

    pub fn largest_end_cylinder(&self) -> u16 {
        self.partitions
            .iter()
            .map(|p| p.end_cylinder())
            .max()
            .unwrap_or(0)
    }

    /// A bootable entry exists and its type is a known one.
    pub fn is_valid_mbr(&self) -> bool {
        self.bootable_partition()
            .is_some_and(|p| p.is_valid_partition_type())
    }

    pub fn has_windows_boot_signature(&self) -> bool {
        self.sector.starts_with(&WINDOWS_BOOT_CODE_PROLOGUE)
    }
}

impl TryFrom<&[u8]> for MasterBootRecord {
    type Error = MbrError;

    /// Decode a bare sector; the image is assumed to be that one sector.
    fn try_from(bytes: &[u8]) -> Result<Self> {
        Self::new(bytes, bytes.len() as u64)
    }
}

impl fmt::Display for MasterBootRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in self.sector.chunks(16) {
            for (i, byte) in line.iter().enumerate() {
                if i > 0 {
                    f.write_str(" ")?;
                }
                write!(f, "{byte:02x}")?;
            }
            writeln!(f)?;
        }
        for (i, partition) in self.partitions.iter().enumerate() {
            writeln!(f, "Partition {}:", i + 1)?;
            writeln!(f, "====================")?;
            write!(f, "{partition}")?;
        }
        writeln!(f)?;
        writeln!(f, "Total sectors: {}", self.total_sectors_from_image_size())?;
        write!(f, "Total cylinders: {}", self.largest_end_cylinder())
    }
}
