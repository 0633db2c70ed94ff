use serde::Serialize;
use smol_str::SmolStr;

use crate::model::curve::Curve;
use crate::model::slot::Color;

pub trait Keyframe {
    fn time(&self) -> f32;
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RotateFrame {
    pub time: f32,
    pub angle: f32,
}

/// Keyframe shared by translate and scale timelines.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TranslateFrame {
    pub time: f32,
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ColorFrame {
    pub time: f32,
    pub color: Color,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttachmentFrame {
    pub time: f32,
    /// `None` hides the slot's attachment.
    pub name: Option<SmolStr>,
}

macro_rules! impl_keyframe {
    ($($frame:ty),*) => {
        $(impl Keyframe for $frame {
            fn time(&self) -> f32 {
                self.time
            }
        })*
    };
}

impl_keyframe!(RotateFrame, TranslateFrame, ColorFrame, AttachmentFrame);

/// Keyframes paired with the curve easing into the following keyframe.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurveFrames<F> {
    pub frames: Vec<F>,
    pub curves: Vec<Curve>,
}

impl<F: Keyframe> CurveFrames<F> {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            frames: Vec::with_capacity(capacity),
            curves: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, frame: F, curve: Curve) {
        self.frames.push(frame);
        self.curves.push(curve);
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn last_time(&self) -> f32 {
        self.frames.last().map_or(0.0, Keyframe::time)
    }

    /// Eased progress between keyframe `index` and the next one.
    pub fn curve_percent(&self, index: usize, percent: f32) -> f32 {
        self.curves
            .get(index)
            .map_or(percent, |curve| curve.percent(percent))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RotateTimeline {
    pub bone_index: usize,
    #[serde(flatten)]
    pub keys: CurveFrames<RotateFrame>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TranslateTimeline {
    pub bone_index: usize,
    #[serde(flatten)]
    pub keys: CurveFrames<TranslateFrame>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColorTimeline {
    pub slot_index: usize,
    #[serde(flatten)]
    pub keys: CurveFrames<ColorFrame>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttachmentTimeline {
    pub slot_index: usize,
    pub frames: Vec<AttachmentFrame>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Timeline {
    Rotate(RotateTimeline),
    Translate(TranslateTimeline),
    Scale(TranslateTimeline),
    Color(ColorTimeline),
    Attachment(AttachmentTimeline),
}

impl Timeline {
    pub fn frame_count(&self) -> usize {
        match self {
            Timeline::Rotate(timeline) => timeline.keys.len(),
            Timeline::Translate(timeline) | Timeline::Scale(timeline) => timeline.keys.len(),
            Timeline::Color(timeline) => timeline.keys.len(),
            Timeline::Attachment(timeline) => timeline.frames.len(),
        }
    }

    /// Time of the last keyframe; zero for an empty timeline.
    pub fn duration(&self) -> f32 {
        match self {
            Timeline::Rotate(timeline) => timeline.keys.last_time(),
            Timeline::Translate(timeline) | Timeline::Scale(timeline) => {
                timeline.keys.last_time()
            }
            Timeline::Color(timeline) => timeline.keys.last_time(),
            Timeline::Attachment(timeline) => {
                timeline.frames.last().map_or(0.0, Keyframe::time)
            }
        }
    }

    pub fn bone_index(&self) -> Option<usize> {
        match self {
            Timeline::Rotate(timeline) => Some(timeline.bone_index),
            Timeline::Translate(timeline) | Timeline::Scale(timeline) => Some(timeline.bone_index),
            Timeline::Color(_) | Timeline::Attachment(_) => None,
        }
    }

    pub fn slot_index(&self) -> Option<usize> {
        match self {
            Timeline::Color(timeline) => Some(timeline.slot_index),
            Timeline::Attachment(timeline) => Some(timeline.slot_index),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Animation {
    pub name: SmolStr,
    pub timelines: Vec<Timeline>,
    pub duration: f32,
}

impl Animation {
    pub fn new(name: impl Into<SmolStr>, capacity: usize) -> Self {
        Self {
            name: name.into(),
            timelines: Vec::with_capacity(capacity),
            duration: 0.0,
        }
    }

    /// Appends `timeline`, extending the duration to cover it.
    pub fn push_timeline(&mut self, timeline: Timeline) {
        self.duration = self.duration.max(timeline.duration());
        self.timelines.push(timeline);
    }
}
