use serde::Serialize;
use smol_str::SmolStr;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoneData {
    pub name: SmolStr,
    /// Index of the parent bone; parents always precede their children.
    pub parent: Option<usize>,
    pub length: f32,
    pub x: f32,
    pub y: f32,
    pub rotation: f32,
    pub scale_x: f32,
    pub scale_y: f32,
}

impl BoneData {
    pub fn new(name: impl Into<SmolStr>, parent: Option<usize>) -> Self {
        Self {
            name: name.into(),
            parent,
            length: 0.0,
            x: 0.0,
            y: 0.0,
            rotation: 0.0,
            scale_x: 1.0,
            scale_y: 1.0,
        }
    }
}
