//! Skeleton data produced by [`crate::skeleton::SkeletonJson`]. Owns all of
//! its strings; nothing here borrows from the parsed document.

pub mod animation;
pub mod attachment;
pub mod bone;
pub mod curve;
pub mod skin;
pub mod slot;

use serde::Serialize;

pub use animation::{
    Animation, AttachmentFrame, AttachmentTimeline, ColorFrame, ColorTimeline, CurveFrames,
    Keyframe, RotateFrame, RotateTimeline, Timeline, TranslateFrame, TranslateTimeline,
};
pub use attachment::{Attachment, AttachmentType, RegionAttachment};
pub use bone::BoneData;
pub use curve::{BezierCurve, Curve};
pub use skin::{Skin, SkinEntry};
pub use slot::{to_color, Color, SlotData};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SkeletonData {
    pub bones: Vec<BoneData>,
    pub slots: Vec<SlotData>,
    pub skins: Vec<Skin>,
    /// Index into `skins` of the skin named `default`.
    pub default_skin: Option<usize>,
    pub animations: Vec<Animation>,
}

impl SkeletonData {
    pub fn find_bone_index(&self, name: &str) -> Option<usize> {
        self.bones.iter().position(|bone| bone.name == name)
    }

    pub fn find_bone(&self, name: &str) -> Option<&BoneData> {
        self.find_bone_index(name).map(|index| &self.bones[index])
    }

    pub fn find_slot_index(&self, name: &str) -> Option<usize> {
        self.slots.iter().position(|slot| slot.name == name)
    }

    pub fn find_slot(&self, name: &str) -> Option<&SlotData> {
        self.find_slot_index(name).map(|index| &self.slots[index])
    }

    pub fn find_skin(&self, name: &str) -> Option<&Skin> {
        self.skins.iter().find(|skin| skin.name == name)
    }

    pub fn find_animation(&self, name: &str) -> Option<&Animation> {
        self.animations.iter().find(|animation| animation.name == name)
    }

    pub fn default_skin(&self) -> Option<&Skin> {
        self.default_skin.and_then(|index| self.skins.get(index))
    }
}
