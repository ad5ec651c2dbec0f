//! Settings: the `settings` slot.

use crate::model::Settings;

use super::{Result, SETTINGS_SLOT, Storage};

impl Storage {
    /// Loads saved settings, or defaults when nothing usable is saved.
    pub fn load_settings(&self) -> Settings {
        self.read_slot(SETTINGS_SLOT).unwrap_or_default()
    }

    pub fn save_settings(&self, settings: &Settings) -> Result<()> {
        self.write_slot(SETTINGS_SLOT, settings)
    }
}
