use std::collections::HashSet;

use smol_str::SmolStr;
use tracing::trace;

use crate::model::{Attachment, AttachmentType, Skin};

/// A loader failure, reported as `message` followed by `detail`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoaderError {
    pub message: String,
    pub detail: String,
}

impl LoaderError {
    pub fn new(message: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            detail: detail.into(),
        }
    }
}

/// Creates attachments for skin entries. `Ok(None)` skips the entry.
pub trait AttachmentLoader {
    fn new_attachment(
        &mut self,
        skin: &Skin,
        kind: AttachmentType,
        name: &str,
    ) -> Result<Option<Attachment>, LoaderError>;
}

impl<F> AttachmentLoader for F
where
    F: FnMut(&Skin, AttachmentType, &str) -> Result<Option<Attachment>, LoaderError>,
{
    fn new_attachment(
        &mut self,
        skin: &Skin,
        kind: AttachmentType,
        name: &str,
    ) -> Result<Option<Attachment>, LoaderError> {
        self(skin, kind, name)
    }
}

/// Builds a region attachment for every entry. When constructed with
/// [`RegionLoader::with_regions`], names outside that set are rejected.
#[derive(Debug, Clone, Default)]
pub struct RegionLoader {
    regions: Option<HashSet<SmolStr>>,
}

impl RegionLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_regions<I, S>(regions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<SmolStr>,
    {
        Self {
            regions: Some(regions.into_iter().map(Into::into).collect()),
        }
    }
}

impl AttachmentLoader for RegionLoader {
    fn new_attachment(
        &mut self,
        skin: &Skin,
        kind: AttachmentType,
        name: &str,
    ) -> Result<Option<Attachment>, LoaderError> {
        if let Some(regions) = &self.regions {
            if !regions.contains(name) {
                return Err(LoaderError::new("Region not found: ", name));
            }
        }
        trace!(skin = %skin.name, kind = kind.as_str(), name, "new attachment");
        Ok(Some(Attachment::new(kind, name)))
    }
}
