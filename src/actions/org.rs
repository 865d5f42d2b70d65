//! Organization unit listing.

use crate::error::ApiError;
use crate::models::OrgUnit;
use crate::services::OrgUnitDirectory;

pub struct OrgActions<'a> {
    org_units: &'a dyn OrgUnitDirectory,
}

impl<'a> OrgActions<'a> {
    pub fn new(org_units: &'a dyn OrgUnitDirectory) -> Self {
        Self { org_units }
    }

    /// Every organization unit, sorted by path.
    pub async fn list(&self) -> Result<Vec<OrgUnit>, ApiError> {
        let mut units = self.org_units.list_org_units().await?;
        units.sort_by(|a, b| a.org_unit_path.cmp(&b.org_unit_path));
        Ok(units)
    }
}
