use crate::style::color::{Rgb, parse_hex_input};
use serde::{Deserialize, Serialize};

/// A solid paint as stored on fills and strokes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SolidPaint {
    /// Paint color.
    pub color: Rgb,
    /// Paint opacity in `0..=1`.
    #[serde(default = "one")]
    pub opacity: f64,
}

fn one() -> f64 {
    1.0
}

impl SolidPaint {
    /// Fully opaque paint.
    pub fn opaque(color: Rgb) -> Self {
        Self {
            color,
            opacity: 1.0,
        }
    }
}

/// Style attributes the looper reads from and writes to a node.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeStyle {
    /// Layer opacity in `0..=1`.
    #[serde(default = "one")]
    pub opacity: f64,
    /// Single solid fill, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill: Option<SolidPaint>,
    /// Single solid stroke, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke: Option<SolidPaint>,
    /// Stroke weight in canvas units.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke_weight: Option<f64>,
}

impl Default for NodeStyle {
    fn default() -> Self {
        Self {
            opacity: 1.0,
            fill: None,
            stroke: None,
            stroke_weight: None,
        }
    }
}

/// Deserialize an optional paint that may be written as a hex string or as a paint object.
///
/// Unparseable hex strings yield `None` with a warning instead of failing the whole document.
pub(crate) fn deserialize_lenient_paint<'de, D>(
    deserializer: D,
) -> Result<Option<SolidPaint>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum ColorRepr {
        Hex(String),
        Obj(Rgb),
    }

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Hex(String),
        Paint {
            color: Option<ColorRepr>,
            #[serde(default = "one")]
            opacity: f64,
        },
    }

    fn color_from(repr: ColorRepr) -> Option<Rgb> {
        match repr {
            ColorRepr::Obj(rgb) => Some(rgb),
            ColorRepr::Hex(s) => {
                let parsed = parse_hex_input(&s);
                if parsed.is_none() {
                    tracing::warn!(input = %s, "ignoring invalid hex color");
                }
                parsed
            }
        }
    }

    let paint = match Option::<Repr>::deserialize(deserializer)? {
        None => None,
        Some(Repr::Hex(s)) => color_from(ColorRepr::Hex(s)).map(SolidPaint::opaque),
        Some(Repr::Paint { color, opacity }) => color
            .and_then(color_from)
            .map(|color| SolidPaint { color, opacity }),
    };
    Ok(paint)
}

#[cfg(test)]
#[path = "../../tests/unit/style/paint.rs"]
mod tests;
