use serde::Serialize;
use smol_str::SmolStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum AttachmentType {
    Region,
    RegionSequence,
}

impl AttachmentType {
    /// Resolves the `type` field of a skin attachment entry.
    pub fn from_name(name: &str) -> Option<AttachmentType> {
        match name {
            "region" => Some(AttachmentType::Region),
            "regionSequence" => Some(AttachmentType::RegionSequence),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AttachmentType::Region => "region",
            AttachmentType::RegionSequence => "regionSequence",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Attachment {
    Region(RegionAttachment),
    RegionSequence(RegionAttachment),
}

impl Attachment {
    pub fn new(kind: AttachmentType, name: impl Into<SmolStr>) -> Attachment {
        let region = RegionAttachment::new(name);
        match kind {
            AttachmentType::Region => Attachment::Region(region),
            AttachmentType::RegionSequence => Attachment::RegionSequence(region),
        }
    }

    pub fn kind(&self) -> AttachmentType {
        match self {
            Attachment::Region(_) => AttachmentType::Region,
            Attachment::RegionSequence(_) => AttachmentType::RegionSequence,
        }
    }

    pub fn name(&self) -> &str {
        &self.region().name
    }

    pub fn region(&self) -> &RegionAttachment {
        match self {
            Attachment::Region(region) | Attachment::RegionSequence(region) => region,
        }
    }

    pub fn region_mut(&mut self) -> &mut RegionAttachment {
        match self {
            Attachment::Region(region) | Attachment::RegionSequence(region) => region,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionAttachment {
    pub name: SmolStr,
    pub x: f32,
    pub y: f32,
    pub scale_x: f32,
    pub scale_y: f32,
    pub rotation: f32,
    pub width: f32,
    pub height: f32,
    /// Corner vertices relative to the bone, as `x1 y1 .. x4 y4`.
    pub offset: [f32; 8],
}

impl RegionAttachment {
    pub fn new(name: impl Into<SmolStr>) -> Self {
        Self {
            name: name.into(),
            x: 0.0,
            y: 0.0,
            scale_x: 1.0,
            scale_y: 1.0,
            rotation: 0.0,
            width: 0.0,
            height: 0.0,
            offset: [0.0; 8],
        }
    }

    /// Recomputes `offset` from position, size, scale and rotation.
    pub fn update_offset(&mut self) {
        let local_x2 = self.width / 2.0 * self.scale_x;
        let local_y2 = self.height / 2.0 * self.scale_y;
        let local_x = -local_x2;
        let local_y = -local_y2;
        let (sine, cosine) = self.rotation.to_radians().sin_cos();

        let local_x_cos = local_x * cosine + self.x;
        let local_x_sin = local_x * sine;
        let local_y_cos = local_y * cosine + self.y;
        let local_y_sin = local_y * sine;
        let local_x2_cos = local_x2 * cosine + self.x;
        let local_x2_sin = local_x2 * sine;
        let local_y2_cos = local_y2 * cosine + self.y;
        let local_y2_sin = local_y2 * sine;

        self.offset = [
            local_x_cos - local_y_sin,
            local_y_cos + local_x_sin,
            local_x_cos - local_y2_sin,
            local_y2_cos + local_x_sin,
            local_x2_cos - local_y2_sin,
            local_y2_cos + local_x2_sin,
            local_x2_cos - local_y_sin,
            local_y_cos + local_x2_sin,
        ];
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[rstest::rstest]
    #[case("region", Some(AttachmentType::Region))]
    #[case("regionSequence", Some(AttachmentType::RegionSequence))]
    #[case("mesh", None)]
    #[case("Region", None)]
    fn test_type_names(#[case] name: &str, #[case] expected: Option<AttachmentType>) {
        assert_eq!(AttachmentType::from_name(name), expected);
        if let Some(kind) = expected {
            assert_eq!(kind.as_str(), name);
        }
    }

    #[rstest::rstest]
    fn test_unrotated_offset() {
        let mut region = RegionAttachment::new("r");
        region.x = 10.0;
        region.y = 5.0;
        region.width = 4.0;
        region.height = 2.0;
        region.update_offset();
        assert_eq!(
            region.offset,
            [8.0, 4.0, 8.0, 6.0, 12.0, 6.0, 12.0, 4.0]
        );
    }

    #[rstest::rstest]
    fn test_quarter_turn_offset() {
        let mut region = RegionAttachment::new("r");
        region.width = 2.0;
        region.height = 2.0;
        region.rotation = 90.0;
        region.update_offset();
        let expected = [1.0, -1.0, -1.0, -1.0, -1.0, 1.0, 1.0, 1.0];
        for (actual, expected) in region.offset.iter().zip(expected) {
            assert!((actual - expected).abs() < 1e-5, "{:?}", region.offset);
        }
    }

    #[rstest::rstest]
    fn test_attachment_accessors() {
        let mut attachment = Attachment::new(AttachmentType::RegionSequence, "walk");
        assert_eq!(attachment.kind(), AttachmentType::RegionSequence);
        assert_eq!(attachment.name(), "walk");
        attachment.region_mut().width = 3.0;
        assert_eq!(attachment.region().width, 3.0);
    }
}
