//! Builds [`SkeletonData`] from a skeleton JSON document.
//!
//! Sections are read in order (bones, slots, skins, animations) so that each
//! one can resolve names against the sections before it. The first failure
//! aborts the whole read.

mod loader;

use std::fs;
use std::path::Path;

use tracing::{debug, trace, warn};

use crate::arena::NodeKind;
use crate::constants::{DEFAULT_REGION_SIZE, DEFAULT_SKIN_NAME};
use crate::decode;
use crate::model::{
    Animation, AttachmentFrame, AttachmentTimeline, AttachmentType, BoneData, Color, ColorFrame,
    ColorTimeline, Curve, CurveFrames, Keyframe, RotateFrame, RotateTimeline, SkeletonData, Skin,
    SlotData, Timeline, TranslateFrame, TranslateTimeline,
};
use crate::query::JsonRef;
use crate::{Error, ReadOptions, Result};

pub use loader::{AttachmentLoader, LoaderError, RegionLoader};

const INVALID_JSON: &str = "Invalid skeleton JSON: ";
const PARENT_BONE_NOT_FOUND: &str = "Parent bone not found: ";
const SLOT_BONE_NOT_FOUND: &str = "Slot bone not found: ";
const SLOT_NOT_FOUND: &str = "Slot not found: ";
const BONE_NOT_FOUND: &str = "Bone not found: ";
const UNKNOWN_ATTACHMENT_TYPE: &str = "Unknown attachment type: ";
const INVALID_BONE_TIMELINE: &str = "Invalid timeline type for a bone: ";
const INVALID_SLOT_TIMELINE: &str = "Invalid timeline type for a slot: ";

/// Reads skeleton documents, creating attachments through `L`.
#[derive(Debug)]
pub struct SkeletonJson<L = RegionLoader> {
    loader: L,
    options: ReadOptions,
    last_error: Option<String>,
}

impl SkeletonJson {
    pub fn new() -> Self {
        Self::with_loader(RegionLoader::new())
    }
}

impl Default for SkeletonJson {
    fn default() -> Self {
        Self::new()
    }
}

impl<L: AttachmentLoader> SkeletonJson<L> {
    pub fn with_loader(loader: L) -> Self {
        Self {
            loader,
            options: ReadOptions::default(),
            last_error: None,
        }
    }

    pub fn with_options(mut self, options: ReadOptions) -> Self {
        self.options = options;
        self
    }

    pub fn scale(&self) -> f32 {
        self.options.scale
    }

    pub fn set_scale(&mut self, scale: f32) {
        self.options.scale = scale;
    }

    pub fn loader(&self) -> &L {
        &self.loader
    }

    pub fn loader_mut(&mut self) -> &mut L {
        &mut self.loader
    }

    /// Message of the most recent failed read; cleared when a read starts.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn read_skeleton_data_file(&mut self, path: impl AsRef<Path>) -> Result<SkeletonData> {
        let path = path.as_ref();
        let bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(err) => {
                warn!(path = %path.display(), %err, "unable to read skeleton file");
                return self.fail(Error::missing_file(path.display().to_string()));
            }
        };
        match String::from_utf8(bytes) {
            Ok(json) => self.read_skeleton_data(&json),
            Err(err) => {
                let offset = err.utf8_error().valid_up_to();
                let error = Error::malformed_json(err.as_bytes(), offset).with_prefix(INVALID_JSON);
                self.fail(error)
            }
        }
    }

    pub fn read_skeleton_data(&mut self, json: &str) -> Result<SkeletonData> {
        self.last_error = None;
        match self.read_document(json) {
            Ok(data) => {
                debug!(
                    bones = data.bones.len(),
                    slots = data.slots.len(),
                    skins = data.skins.len(),
                    animations = data.animations.len(),
                    "read skeleton data"
                );
                Ok(data)
            }
            Err(err) => self.fail(err),
        }
    }

    fn fail<T>(&mut self, err: Error) -> Result<T> {
        warn!(kind = ?err.kind, message = %err.message, "skeleton read failed");
        self.last_error = Some(err.message.clone());
        Err(err)
    }

    fn read_document(&mut self, json: &str) -> Result<SkeletonData> {
        let document = decode::from_str(json, &self.options.parse)
            .map_err(|err| err.with_prefix(INVALID_JSON))?;
        let root = document.root();
        let scale = self.options.scale;

        let mut data = SkeletonData::default();
        if let Some(bones) = root.item("bones") {
            read_bones(bones, scale, &mut data)?;
        }
        if let Some(slots) = root.item("slots") {
            read_slots(slots, &mut data)?;
        }
        if let Some(skins) = root.item("skins") {
            data.skins.reserve(skins.size());
            for skin_map in skins.children() {
                let skin = self.read_skin(skin_map, scale, &data)?;
                if skin.name == DEFAULT_SKIN_NAME {
                    data.default_skin = Some(data.skins.len());
                }
                data.skins.push(skin);
            }
        }
        if let Some(animations) = root.item("animations") {
            data.animations.reserve(animations.size());
            for animation_map in animations.children() {
                let animation = read_animation(animation_map, scale, &data)?;
                data.animations.push(animation);
            }
        }
        Ok(data)
    }

    fn read_skin(
        &mut self,
        skin_map: JsonRef<'_>,
        scale: f32,
        data: &SkeletonData,
    ) -> Result<Skin> {
        let mut skin = Skin::new(skin_map.name().unwrap_or_default());
        for slot_map in skin_map.children() {
            let slot_name = slot_map.name().unwrap_or_default();
            let slot_index = data
                .find_slot_index(slot_name)
                .ok_or_else(|| Error::unresolved(SLOT_NOT_FOUND, slot_name))?;

            for attachment_map in slot_map.children() {
                let key = attachment_map.name().unwrap_or_default();
                let name = attachment_map.get_string("name", Some(key)).unwrap_or(key);
                let type_name = attachment_map
                    .get_string("type", Some(AttachmentType::Region.as_str()))
                    .unwrap_or_default();
                let kind = AttachmentType::from_name(type_name)
                    .ok_or_else(|| Error::unknown_type(UNKNOWN_ATTACHMENT_TYPE, type_name))?;

                let mut attachment = match self.loader.new_attachment(&skin, kind, name) {
                    Ok(Some(attachment)) => attachment,
                    Ok(None) => {
                        trace!(skin = %skin.name, name, "loader skipped attachment");
                        continue;
                    }
                    Err(err) => return Err(Error::factory(&err.message, err.detail)),
                };

                let region = attachment.region_mut();
                region.x = attachment_map.get_float("x", 0.0) * scale;
                region.y = attachment_map.get_float("y", 0.0) * scale;
                region.scale_x = attachment_map.get_float("scaleX", 1.0);
                region.scale_y = attachment_map.get_float("scaleY", 1.0);
                region.rotation = attachment_map.get_float("rotation", 0.0);
                region.width = attachment_map.get_float("width", DEFAULT_REGION_SIZE) * scale;
                region.height = attachment_map.get_float("height", DEFAULT_REGION_SIZE) * scale;
                region.update_offset();

                skin.add_attachment(slot_index, key, attachment);
            }
        }
        Ok(skin)
    }
}

fn read_bones(bones: JsonRef<'_>, scale: f32, data: &mut SkeletonData) -> Result<()> {
    data.bones.reserve(bones.size());
    for bone_map in bones.children() {
        let name = bone_map.get_string("name", None).unwrap_or_default();
        let parent = match bone_map.get_string("parent", None) {
            Some(parent_name) => Some(
                data.find_bone_index(parent_name)
                    .ok_or_else(|| Error::unresolved(PARENT_BONE_NOT_FOUND, parent_name))?,
            ),
            None => None,
        };

        let mut bone = BoneData::new(name, parent);
        bone.length = bone_map.get_float("length", 0.0) * scale;
        bone.x = bone_map.get_float("x", 0.0) * scale;
        bone.y = bone_map.get_float("y", 0.0) * scale;
        bone.rotation = bone_map.get_float("rotation", 0.0);
        bone.scale_x = bone_map.get_float("scaleX", 1.0);
        bone.scale_y = bone_map.get_float("scaleY", 1.0);
        data.bones.push(bone);
    }
    Ok(())
}

fn read_slots(slots: JsonRef<'_>, data: &mut SkeletonData) -> Result<()> {
    data.slots.reserve(slots.size());
    for slot_map in slots.children() {
        let name = slot_map.get_string("name", None).unwrap_or_default();
        let bone_name = slot_map.get_string("bone", None).unwrap_or_default();
        let bone = data
            .find_bone_index(bone_name)
            .ok_or_else(|| Error::unresolved(SLOT_BONE_NOT_FOUND, bone_name))?;

        let mut slot = SlotData::new(name, bone);
        if let Some(color) = slot_map.get_string("color", None) {
            slot.color = read_color(color)?;
        }
        slot.attachment_name = slot_map
            .item("attachment")
            .and_then(|item| item.as_str())
            .map(Into::into);
        data.slots.push(slot);
    }
    Ok(())
}

fn read_color(value: &str) -> Result<Color> {
    Color::from_hex(value).ok_or_else(|| Error::invalid_color(value))
}

fn read_animation(map: JsonRef<'_>, scale: f32, data: &SkeletonData) -> Result<Animation> {
    let bones = map.item("bones");
    let slots = map.item("slots");
    let capacity = bones
        .into_iter()
        .chain(slots)
        .flat_map(|group| group.children())
        .map(|target| target.size())
        .sum();
    let mut animation = Animation::new(map.name().unwrap_or_default(), capacity);

    for bone_map in bones.iter().flat_map(|bones| bones.children()) {
        let bone_name = bone_map.name().unwrap_or_default();
        let bone_index = data
            .find_bone_index(bone_name)
            .ok_or_else(|| Error::unresolved(BONE_NOT_FOUND, bone_name))?;

        for timeline_map in bone_map.children() {
            let timeline = match timeline_map.name().unwrap_or_default() {
                "rotate" => Timeline::Rotate(RotateTimeline {
                    bone_index,
                    keys: read_keys(timeline_map, |frame| {
                        Ok(RotateFrame {
                            time: frame.get_float("time", 0.0),
                            angle: frame.get_float("angle", 0.0),
                        })
                    })?,
                }),
                "translate" => Timeline::Translate(TranslateTimeline {
                    bone_index,
                    keys: read_translate_keys(timeline_map, scale)?,
                }),
                "scale" => Timeline::Scale(TranslateTimeline {
                    bone_index,
                    keys: read_translate_keys(timeline_map, 1.0)?,
                }),
                other => return Err(Error::unknown_type(INVALID_BONE_TIMELINE, other)),
            };
            animation.push_timeline(timeline);
        }
    }

    for slot_map in slots.iter().flat_map(|slots| slots.children()) {
        let slot_name = slot_map.name().unwrap_or_default();
        let slot_index = data
            .find_slot_index(slot_name)
            .ok_or_else(|| Error::unresolved(SLOT_NOT_FOUND, slot_name))?;

        for timeline_map in slot_map.children() {
            let timeline = match timeline_map.name().unwrap_or_default() {
                "color" => Timeline::Color(ColorTimeline {
                    slot_index,
                    keys: read_keys(timeline_map, |frame| {
                        let color = frame.get_string("color", None).unwrap_or_default();
                        Ok(ColorFrame {
                            time: frame.get_float("time", 0.0),
                            color: read_color(color)?,
                        })
                    })?,
                }),
                "attachment" => Timeline::Attachment(AttachmentTimeline {
                    slot_index,
                    frames: timeline_map
                        .children()
                        .map(|frame| AttachmentFrame {
                            time: frame.get_float("time", 0.0),
                            name: frame
                                .item("name")
                                .and_then(|name| name.as_str())
                                .map(Into::into),
                        })
                        .collect(),
                }),
                other => return Err(Error::unknown_type(INVALID_SLOT_TIMELINE, other)),
            };
            animation.push_timeline(timeline);
        }
    }

    trace!(
        name = %animation.name,
        timelines = animation.timelines.len(),
        duration = animation.duration,
        "read animation"
    );
    Ok(animation)
}

fn read_keys<'a, F, R>(timeline_map: JsonRef<'a>, mut read_frame: R) -> Result<CurveFrames<F>>
where
    F: Keyframe,
    R: FnMut(JsonRef<'a>) -> Result<F>,
{
    let mut keys = CurveFrames::with_capacity(timeline_map.size());
    for frame in timeline_map.children() {
        keys.push(read_frame(frame)?, read_curve(frame));
    }
    Ok(keys)
}

fn read_translate_keys(
    timeline_map: JsonRef<'_>,
    scale: f32,
) -> Result<CurveFrames<TranslateFrame>> {
    read_keys(timeline_map, |frame| {
        Ok(TranslateFrame {
            time: frame.get_float("time", 0.0),
            x: frame.get_float("x", 0.0) * scale,
            y: frame.get_float("y", 0.0) * scale,
        })
    })
}

fn read_curve(frame: JsonRef<'_>) -> Curve {
    let Some(curve) = frame.item("curve") else {
        return Curve::Linear;
    };
    match curve.kind() {
        NodeKind::String if curve.as_str() == Some("stepped") => Curve::Stepped,
        NodeKind::Array => {
            let control: Vec<f32> = curve
                .children()
                .take(4)
                .map(|point| point.as_float())
                .collect();
            match control[..] {
                [cx1, cy1, cx2, cy2] => Curve::bezier(cx1, cy1, cx2, cy2),
                _ => {
                    warn!(points = control.len(), "bezier curve needs four control values");
                    Curve::Linear
                }
            }
        }
        _ => Curve::Linear,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Attachment;
    use crate::ErrorKind;

    const MINIMAL: &str = r#"{
        "bones": [
            {"name": "root"},
            {"name": "hip", "parent": "root", "x": 10, "y": -4.5, "length": 20, "rotation": 90, "scaleX": 2}
        ],
        "slots": [
            {"name": "body", "bone": "hip", "color": "ff000080", "attachment": "torso"},
            {"name": "shadow", "bone": "root"}
        ],
        "skins": {
            "default": {
                "body": {
                    "torso": {"x": 1, "y": 2, "width": 50, "height": 60, "rotation": 15},
                    "alt": {"name": "torso-alt", "type": "regionSequence"}
                }
            }
        },
        "animations": {
            "walk": {
                "bones": {
                    "hip": {
                        "rotate": [
                            {"time": 0, "angle": 0, "curve": "stepped"},
                            {"time": 2, "angle": 45}
                        ],
                        "translate": [
                            {"time": 0.5, "x": 3, "y": 4, "curve": [0.25, 0, 0.75, 1]}
                        ],
                        "scale": [{"time": 1, "x": 2, "y": 2}]
                    }
                },
                "slots": {
                    "body": {
                        "color": [{"time": 1.5, "color": "00ff00ff"}],
                        "attachment": [{"time": 0, "name": null}, {"time": 1, "name": "alt"}]
                    }
                }
            }
        }
    }"#;

    fn read(json: &str) -> Result<SkeletonData> {
        SkeletonJson::new().read_skeleton_data(json)
    }

    fn read_err(json: &str) -> Error {
        read(json).unwrap_err()
    }

    #[rstest::rstest]
    fn test_reads_minimal_document() {
        let data = read(MINIMAL).unwrap();

        assert_eq!(data.bones.len(), 2);
        let hip = &data.bones[1];
        assert_eq!(hip.parent, Some(0));
        assert_eq!((hip.x, hip.y, hip.length), (10.0, -4.5, 20.0));
        assert_eq!((hip.rotation, hip.scale_x, hip.scale_y), (90.0, 2.0, 1.0));

        let body = &data.slots[0];
        assert_eq!(body.bone, 1);
        assert_eq!(body.attachment_name.as_deref(), Some("torso"));
        assert_eq!(body.color.r, 1.0);
        assert_eq!(body.color.a, 128.0 / 255.0);
        assert_eq!(data.slots[1].color, Color::WHITE);
        assert_eq!(data.slots[1].attachment_name, None);

        let skin = data.default_skin().unwrap();
        assert_eq!(skin.len(), 2);
        let torso = skin.attachment(0, "torso").unwrap().region();
        assert_eq!((torso.width, torso.height, torso.rotation), (50.0, 60.0, 15.0));
        let alt = skin.attachment(0, "alt").unwrap();
        assert_eq!(alt.kind(), AttachmentType::RegionSequence);
        assert_eq!(alt.name(), "torso-alt");
        assert_eq!(alt.region().width, DEFAULT_REGION_SIZE);

        let walk = data.find_animation("walk").unwrap();
        assert_eq!(walk.timelines.len(), 5);
        assert_eq!(walk.duration, 2.0);
    }

    #[rstest::rstest]
    fn test_timeline_contents() {
        let data = read(MINIMAL).unwrap();
        let walk = &data.animations[0];

        let Timeline::Rotate(rotate) = &walk.timelines[0] else {
            panic!("expected rotate timeline");
        };
        assert_eq!(rotate.bone_index, 1);
        assert_eq!(rotate.keys.frames[1], RotateFrame { time: 2.0, angle: 45.0 });
        assert_eq!(rotate.keys.curves, vec![Curve::Stepped, Curve::Linear]);

        let Timeline::Translate(translate) = &walk.timelines[1] else {
            panic!("expected translate timeline");
        };
        assert_eq!(translate.keys.curves[0], Curve::bezier(0.25, 0.0, 0.75, 1.0));

        let Timeline::Attachment(attachment) = &walk.timelines[4] else {
            panic!("expected attachment timeline");
        };
        assert_eq!(attachment.frames[0].name, None);
        assert_eq!(attachment.frames[1].name.as_deref(), Some("alt"));
    }

    #[rstest::rstest]
    fn test_scale_applies_to_positions_only() {
        let mut reader = SkeletonJson::new().with_options(ReadOptions::default().with_scale(2.0));
        let data = reader.read_skeleton_data(MINIMAL).unwrap();
        let hip = &data.bones[1];
        assert_eq!((hip.x, hip.length, hip.scale_x, hip.rotation), (20.0, 40.0, 2.0, 90.0));

        let alt = data.skins[0].attachment(0, "alt").unwrap().region();
        assert_eq!(alt.width, 64.0);
        assert_eq!(alt.scale_x, 1.0);

        let walk = &data.animations[0];
        let Timeline::Translate(translate) = &walk.timelines[1] else {
            panic!("expected translate timeline");
        };
        assert_eq!((translate.keys.frames[0].x, translate.keys.frames[0].y), (6.0, 8.0));
        let Timeline::Scale(scale) = &walk.timelines[2] else {
            panic!("expected scale timeline");
        };
        assert_eq!(scale.keys.frames[0].x, 2.0);

        reader.set_scale(1.0);
        assert_eq!(reader.scale(), 1.0);
    }

    #[rstest::rstest]
    #[case(
        r#"{"bones": [{"name": "a", "parent": "ghost"}]}"#,
        ErrorKind::UnresolvedReference,
        "Parent bone not found: ghost"
    )]
    #[case(
        r#"{"bones": [{"name": "root"}], "slots": [{"name": "s", "bone": "nope"}]}"#,
        ErrorKind::UnresolvedReference,
        "Slot bone not found: nope"
    )]
    #[case(
        r#"{"bones": [{"name": "root"}], "slots": [{"name": "s", "bone": "root", "color": "fff"}]}"#,
        ErrorKind::InvalidColor,
        "Invalid color: fff"
    )]
    #[case(
        r#"{"skins": {"default": {"missing": {}}}}"#,
        ErrorKind::UnresolvedReference,
        "Slot not found: missing"
    )]
    #[case(
        r#"{"bones": [{"name": "root"}], "slots": [{"name": "s", "bone": "root"}],
            "skins": {"default": {"s": {"a": {"type": "mesh"}}}}}"#,
        ErrorKind::UnknownType,
        "Unknown attachment type: mesh"
    )]
    #[case(
        r#"{"animations": {"a": {"bones": {"ghost": {}}}}}"#,
        ErrorKind::UnresolvedReference,
        "Bone not found: ghost"
    )]
    #[case(
        r#"{"bones": [{"name": "root"}], "animations": {"a": {"bones": {"root": {"shear": []}}}}}"#,
        ErrorKind::UnknownType,
        "Invalid timeline type for a bone: shear"
    )]
    #[case(
        r#"{"animations": {"a": {"slots": {"ghost": {}}}}}"#,
        ErrorKind::UnresolvedReference,
        "Slot not found: ghost"
    )]
    #[case(
        r#"{"bones": [{"name": "root"}], "slots": [{"name": "s", "bone": "root"}],
            "animations": {"a": {"slots": {"s": {"deform": []}}}}}"#,
        ErrorKind::UnknownType,
        "Invalid timeline type for a slot: deform"
    )]
    fn test_read_failures(#[case] json: &str, #[case] kind: ErrorKind, #[case] message: &str) {
        let mut reader = SkeletonJson::new();
        let err = reader.read_skeleton_data(json).unwrap_err();
        assert_eq!(err.kind, kind);
        assert_eq!(err.message, message);
        assert_eq!(reader.last_error(), Some(message));
    }

    #[rstest::rstest]
    fn test_last_error_is_cleared_by_next_read() {
        let mut reader = SkeletonJson::new();
        assert!(reader.read_skeleton_data("[").is_err());
        assert!(reader.last_error().is_some());
        reader.read_skeleton_data("{}").unwrap();
        assert_eq!(reader.last_error(), None);
    }

    #[rstest::rstest]
    fn test_malformed_json_is_prefixed() {
        let err = read_err(r#"{"bones": [}"#);
        assert_eq!(err.kind, ErrorKind::MalformedJson);
        assert_eq!(err.message, "Invalid skeleton JSON: }");
        assert_eq!(err.location.map(|location| location.offset), Some(11));
    }

    #[rstest::rstest]
    fn test_empty_document_has_no_sections() {
        let data = read("{}").unwrap();
        assert_eq!(data, SkeletonData::default());
    }

    #[rstest::rstest]
    fn test_loader_can_skip_attachments() {
        let loader = |_: &Skin,
                      _: AttachmentType,
                      name: &str|
         -> std::result::Result<Option<Attachment>, LoaderError> {
            if name == "alt" || name == "torso-alt" {
                Ok(None)
            } else {
                Ok(Some(Attachment::new(AttachmentType::Region, name)))
            }
        };
        let data = SkeletonJson::with_loader(loader)
            .read_skeleton_data(MINIMAL)
            .unwrap();
        let skin = &data.skins[0];
        assert_eq!(skin.len(), 1);
        assert!(skin.attachment(0, "alt").is_none());
    }

    #[rstest::rstest]
    fn test_loader_errors_abort_the_read() {
        let mut reader = SkeletonJson::with_loader(RegionLoader::with_regions(["torso"]));
        let err = reader.read_skeleton_data(MINIMAL).unwrap_err();
        assert_eq!(err.kind, ErrorKind::FactoryError);
        assert_eq!(err.message, "Region not found: torso-alt");
        assert_eq!(err.detail, "torso-alt");
    }

    #[rstest::rstest]
    fn test_short_bezier_array_is_linear() {
        let json = r#"{"bones": [{"name": "b"}],
            "animations": {"a": {"bones": {"b": {"rotate": [{"time": 1, "curve": [0.1, 0.2]}]}}}}}"#;
        let data = read(json).unwrap();
        let Timeline::Rotate(rotate) = &data.animations[0].timelines[0] else {
            panic!("expected rotate timeline");
        };
        assert_eq!(rotate.keys.curves[0], Curve::Linear);
    }

    #[rstest::rstest]
    fn test_missing_file() {
        let mut reader = SkeletonJson::new();
        let err = reader
            .read_skeleton_data_file("/nonexistent/skeleton.json")
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::MissingFile);
        assert_eq!(
            reader.last_error(),
            Some("Unable to read skeleton file: /nonexistent/skeleton.json")
        );
    }
}
