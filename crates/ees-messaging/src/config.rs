//! Messaging configuration.
//!
//! Scenario files pass model options as a flat string map; the recognized
//! keys are the `OPT_*` constants below.  The same settings can also be
//! deserialised directly from a typed config section.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{info, warn};

use ees_core::HhMm;

use crate::{CollisionPolicy, MessagingError, MessagingResult};

pub const OPT_MESSAGE_FILE:     &str = "fileJson";
pub const OPT_ZONES_FILE:       &str = "fileZonesGeoJson";
pub const OPT_ZONE_ID_PROPERTY: &str = "zoneIdColumnName";
pub const OPT_GLOBAL_START:     &str = "startHHMM";

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MessagingConfig {
    /// JSON message file.
    pub message_file:     Option<PathBuf>,
    /// GeoJSON zones file.
    pub zones_file:       Option<PathBuf>,
    /// Feature property holding the zone id, overriding the SA1 defaults.
    pub zone_id_property: Option<String>,
    /// Time of day of the first scheduler wake-up.  Midnight if unset.
    pub global_start:     Option<HhMm>,
    pub collision_policy: CollisionPolicy,
}

impl MessagingConfig {
    /// Build a config from a scenario option map.
    ///
    /// Unknown keys are logged and ignored.  A malformed start time is an
    /// error.
    pub fn from_options(opts: &BTreeMap<String, String>) -> MessagingResult<Self> {
        let mut cfg = Self::default();
        for (key, value) in opts {
            info!(option = %key, value = %value, "found messaging option");
            match key.as_str() {
                OPT_MESSAGE_FILE     => cfg.message_file = Some(PathBuf::from(value)),
                OPT_ZONES_FILE       => cfg.zones_file = Some(PathBuf::from(value)),
                OPT_ZONE_ID_PROPERTY => cfg.zone_id_property = Some(value.clone()),
                OPT_GLOBAL_START     => {
                    let t = HhMm::parse_colon(value)
                        .map_err(|e| MessagingError::Config(format!("{OPT_GLOBAL_START}: {e}")))?;
                    cfg.global_start = Some(t);
                }
                _ => warn!(option = %key, value = %value, "ignoring unknown messaging option"),
            }
        }
        Ok(cfg)
    }

    /// Message and zone file paths, if both are configured and non-empty.
    pub fn sources(&self) -> Option<(&Path, &Path)> {
        Some((non_empty(&self.message_file)?, non_empty(&self.zones_file)?))
    }

    pub fn start_time(&self) -> HhMm {
        self.global_start.unwrap_or_default()
    }
}

fn non_empty(path: &Option<PathBuf>) -> Option<&Path> {
    path.as_deref().filter(|p| !p.as_os_str().is_empty())
}
