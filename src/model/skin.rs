use serde::Serialize;
use smol_str::SmolStr;

use crate::model::attachment::Attachment;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkinEntry {
    pub slot_index: usize,
    pub name: SmolStr,
    pub attachment: Attachment,
}

/// Attachments keyed by (slot index, attachment name).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Skin {
    pub name: SmolStr,
    pub entries: Vec<SkinEntry>,
}

impl Skin {
    pub fn new(name: impl Into<SmolStr>) -> Self {
        Self {
            name: name.into(),
            entries: Vec::new(),
        }
    }

    /// Stores `attachment`, replacing any entry with the same key.
    pub fn add_attachment(
        &mut self,
        slot_index: usize,
        name: impl Into<SmolStr>,
        attachment: Attachment,
    ) {
        let name = name.into();
        match self
            .entries
            .iter_mut()
            .find(|entry| entry.slot_index == slot_index && entry.name == name)
        {
            Some(entry) => entry.attachment = attachment,
            None => self.entries.push(SkinEntry {
                slot_index,
                name,
                attachment,
            }),
        }
    }

    pub fn attachment(&self, slot_index: usize, name: &str) -> Option<&Attachment> {
        self.entries
            .iter()
            .find(|entry| entry.slot_index == slot_index && entry.name == name)
            .map(|entry| &entry.attachment)
    }

    pub fn slot_entries(&self, slot_index: usize) -> impl Iterator<Item = &SkinEntry> {
        self.entries
            .iter()
            .filter(move |entry| entry.slot_index == slot_index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
