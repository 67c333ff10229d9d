//! Unit tests for the logging facility

mod facility_tests;

use std::path::Path;

use wd_shared::RotationPolicy;

use super::facility::{LogFacility, LogFacilityConfig};

/// Facility writing un-rotated files under `root`
pub(super) fn facility_in(root: &Path) -> LogFacility {
    LogFacility::new(LogFacilityConfig::new(root).with_rotation(RotationPolicy::Never))
}
