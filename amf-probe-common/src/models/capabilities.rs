/// Hardware encoders the probe knows how to look for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Codec {
    Avc,  // H.264
    Hevc, // H.265
    Av1,
}

impl Codec {
    /// Report order.
    pub const ALL: [Codec; 3] = [Codec::Avc, Codec::Hevc, Codec::Av1];

    /// AMF component id of the encoder for this codec.
    pub fn component_id(self) -> &'static str {
        match self {
            Codec::Avc => "AMFVideoEncoderVCE_AVC",
            Codec::Hevc => "AMFVideoEncoder_HEVC",
            Codec::Av1 => "AMFVideoEncoder_AV1",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Codec::Avc => "AVC (H264)",
            Codec::Hevc => "HEVC (H265)",
            Codec::Av1 => "AV1",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AdapterCapabilities {
    pub has_avc: bool,
    pub has_hevc: bool,
    pub has_av1: bool,
}

impl AdapterCapabilities {
    pub fn supports(&self, codec: Codec) -> bool {
        match codec {
            Codec::Avc => self.has_avc,
            Codec::Hevc => self.has_hevc,
            Codec::Av1 => self.has_av1,
        }
    }

    pub fn set(&mut self, codec: Codec, supported: bool) {
        match codec {
            Codec::Avc => self.has_avc = supported,
            Codec::Hevc => self.has_hevc = supported,
            Codec::Av1 => self.has_av1 = supported,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_unsupported() {
        let caps = AdapterCapabilities::default();
        assert!(Codec::ALL.iter().all(|&codec| !caps.supports(codec)));
    }

    #[test]
    fn set_touches_only_one_flag() {
        let mut caps = AdapterCapabilities::default();
        caps.set(Codec::Hevc, true);
        assert_eq!(
            caps,
            AdapterCapabilities {
                has_avc: false,
                has_hevc: true,
                has_av1: false,
            }
        );
    }
}
