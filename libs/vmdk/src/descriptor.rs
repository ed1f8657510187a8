use std::collections::BTreeMap;
use std::str::FromStr;

use derive_more::derive::Display;
use mbr::MasterBootRecord;

use crate::VmdkError;

/// Virtual disk adapter written to `ddb.adapterType`.
#[derive(Clone, Copy, Debug, Default, Display, Eq, PartialEq, Hash)]
pub enum DiskType {
    #[default]
    #[display("ide")]
    Ide,
    #[display("buslogic")]
    BusLogic,
    #[display("lsilogic")]
    LsiLogic,
    #[display("legacyESX")]
    LegacyEsx,
}

impl DiskType {
    pub const ALL: [DiskType; 4] = [
        DiskType::Ide,
        DiskType::BusLogic,
        DiskType::LsiLogic,
        DiskType::LegacyEsx,
    ];
}

impl FromStr for DiskType {
    type Err = VmdkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DiskType::ALL
            .into_iter()
            .find(|ty| ty.to_string() == s)
            .ok_or_else(|| VmdkError::UnknownDiskType(s.to_string()))
    }
}

/// Geometry and location values substituted into a descriptor template.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Descriptor {
    pub disk_type: DiskType,
    pub sectors: u64,
    pub cylinders: u16,
    pub heads_per_track: u16,
    pub sectors_per_track: u8,
    pub image_location: String,
}

impl Descriptor {
    pub const DISK_TYPE: &'static str = "diskType";
    pub const NUM_OF_SECTORS: &'static str = "numOfSectors";
    pub const NUM_OF_CYLINDERS: &'static str = "numOfCylinders";
    pub const HEADS_PER_TRACK: &'static str = "headsPerTrack";
    pub const SECTORS_PER_TRACK: &'static str = "sectorsPerTrack";
    pub const IMG_LOCATION: &'static str = "imgLocation";

    /// Derive the descriptor values from a decoded MBR.
    ///
    /// Sector count comes from the image size, cylinders from the largest end
    /// cylinder, and the per-track figures from the first table entry.
    pub fn from_mbr(mbr: &MasterBootRecord, disk_type: DiskType, image_location: &str) -> Self {
        let first = &mbr.partitions()[0];
        Self {
            disk_type,
            sectors: mbr.total_sectors_from_image_size(),
            cylinders: mbr.largest_end_cylinder(),
            heads_per_track: first.head_sum(),
            sectors_per_track: first.end_sector(),
            image_location: image_location.to_string(),
        }
    }

    pub fn values(&self) -> BTreeMap<String, String> {
        [
            (Self::DISK_TYPE, self.disk_type.to_string()),
            (Self::NUM_OF_SECTORS, self.sectors.to_string()),
            (Self::NUM_OF_CYLINDERS, self.cylinders.to_string()),
            (Self::HEADS_PER_TRACK, self.heads_per_track.to_string()),
            (Self::SECTORS_PER_TRACK, self.sectors_per_track.to_string()),
            (Self::IMG_LOCATION, self.image_location.clone()),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect()
    }
}
