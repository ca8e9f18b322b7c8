// SPDX-License-Identifier: MPL-2.0
//! Position formats the transport can report positions and durations in.

use serde::{Deserialize, Serialize};

/// Unit system used by the transport for position and duration.
///
/// The engine may refuse a preferred format; the format it actually granted
/// is what the control publishes as the current format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PositionFormat {
    /// No seeking interface, or no format negotiated yet.
    #[default]
    None,
    /// Reference time in 100-nanosecond units.
    MediaTime,
    /// Video frames.
    Frame,
    /// Byte offset in the stream.
    Byte,
    /// Interlaced video fields.
    Field,
    /// Audio samples.
    Sample,
}

impl PositionFormat {
    /// Returns true if positions in this format are [`Ticks`](super::Ticks)
    /// of wall-clock media time.
    #[must_use]
    pub fn is_time_based(self) -> bool {
        matches!(self, Self::MediaTime)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_format_is_none() {
        assert_eq!(PositionFormat::default(), PositionFormat::None);
    }

    #[test]
    fn only_media_time_is_time_based() {
        assert!(PositionFormat::MediaTime.is_time_based());
        assert!(!PositionFormat::Frame.is_time_based());
        assert!(!PositionFormat::None.is_time_based());
    }

    #[test]
    fn serializes_as_kebab_case() {
        #[derive(Serialize, Deserialize)]
        struct Wrapper {
            format: PositionFormat,
        }

        let text = toml::to_string(&Wrapper {
            format: PositionFormat::MediaTime,
        })
        .unwrap();
        assert!(text.contains("media-time"));

        let parsed: Wrapper = toml::from_str("format = \"sample\"").unwrap();
        assert_eq!(parsed.format, PositionFormat::Sample);
    }
}
