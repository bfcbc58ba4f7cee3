//! Gesture label and class definitions
//!
//! The label set is closed. Single-frame gestures occupy class indices 0-9,
//! sequence gestures 10-13:
//! - Navigation: move between slides
//! - Drawing: annotate the current slide
//! - Control: pointer, stop, save
//! - Sequence: compound gestures spanning several frames (zoom, jumps)

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{GestureError, GesturaResult};

/// Recognized gesture
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum GestureLabel {
    /// Index extended, hand pointing right
    PointRight = 0,
    /// Index extended, hand pointing left
    PointLeft = 1,
    /// Index extended, hand pointing up
    Pointer = 2,
    /// Open palm held upright
    PalmOut = 3,
    /// Closed fist
    Stop = 4,
    /// All fingers extended
    OpenHand = 5,
    /// Index and middle spread apart
    Peace = 6,
    /// Index extended, no clear direction
    Draw = 7,
    /// Thumb only
    Save = 8,
    /// Index and middle together, not upright
    Highlight = 9,

    // Sequence gestures
    ZoomIn = 10,
    ZoomOut = 11,
    FirstSlide = 12,
    LastSlide = 13,
}

/// Gesture family - decides which metadata a result carries
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GestureFamily {
    Navigation,
    Drawing,
    Control,
    Sequence,
}

/// Presentation command a gesture maps to
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PresentationAction {
    NextSlide,
    PreviousSlide,
    ShowPointer,
    Erase,
    StopPresentation,
    FirstSlide,
    LastSlide,
    Draw,
    Save,
    Highlight,
    ZoomIn,
    ZoomOut,
}

impl GestureLabel {
    /// All labels in class order
    pub fn all() -> &'static [GestureLabel] {
        &[
            GestureLabel::PointRight,
            GestureLabel::PointLeft,
            GestureLabel::Pointer,
            GestureLabel::PalmOut,
            GestureLabel::Stop,
            GestureLabel::OpenHand,
            GestureLabel::Peace,
            GestureLabel::Draw,
            GestureLabel::Save,
            GestureLabel::Highlight,
            GestureLabel::ZoomIn,
            GestureLabel::ZoomOut,
            GestureLabel::FirstSlide,
            GestureLabel::LastSlide,
        ]
    }

    /// Labels recognizable from a single frame
    pub fn single_frame() -> &'static [GestureLabel] {
        &Self::all()[..10]
    }

    /// Labels only recognizable from a frame sequence
    pub fn sequence() -> &'static [GestureLabel] {
        &Self::all()[10..]
    }

    /// Parse from class index
    pub fn from_class(class: u8) -> GesturaResult<Self> {
        Self::all()
            .get(class as usize)
            .copied()
            .ok_or(GestureError::UnknownGestureClass(class))
    }

    /// Convert to class index
    #[inline]
    pub fn class(self) -> u8 {
        self as u8
    }

    /// Map a HAGRID dataset label onto the canonical set
    pub fn from_hagrid(name: &str) -> GesturaResult<Self> {
        match name {
            "point" => Ok(GestureLabel::PointRight),
            "palm" => Ok(GestureLabel::Stop),
            "peace" => Ok(GestureLabel::Peace),
            "fist" => Ok(GestureLabel::Save),
            "call" => Ok(GestureLabel::PalmOut),
            other => Err(GestureError::UnknownGestureName(other.to_string())),
        }
    }

    /// Canonical name
    pub fn name(self) -> &'static str {
        match self {
            GestureLabel::PointRight => "point_right",
            GestureLabel::PointLeft => "point_left",
            GestureLabel::Pointer => "pointer",
            GestureLabel::PalmOut => "palm_out",
            GestureLabel::Stop => "stop",
            GestureLabel::OpenHand => "open_hand",
            GestureLabel::Peace => "peace",
            GestureLabel::Draw => "draw",
            GestureLabel::Save => "save",
            GestureLabel::Highlight => "highlight",
            GestureLabel::ZoomIn => "zoom_in",
            GestureLabel::ZoomOut => "zoom_out",
            GestureLabel::FirstSlide => "first_slide",
            GestureLabel::LastSlide => "last_slide",
        }
    }

    /// Only detectable across several frames?
    #[inline]
    pub fn is_sequence(self) -> bool {
        self.family() == GestureFamily::Sequence
    }

    pub fn family(self) -> GestureFamily {
        match self {
            GestureLabel::PointRight
            | GestureLabel::PointLeft
            | GestureLabel::OpenHand
            | GestureLabel::Peace => GestureFamily::Navigation,
            GestureLabel::PalmOut | GestureLabel::Draw | GestureLabel::Highlight => {
                GestureFamily::Drawing
            }
            GestureLabel::Pointer | GestureLabel::Stop | GestureLabel::Save => {
                GestureFamily::Control
            }
            GestureLabel::ZoomIn
            | GestureLabel::ZoomOut
            | GestureLabel::FirstSlide
            | GestureLabel::LastSlide => GestureFamily::Sequence,
        }
    }

    /// Presentation command triggered by this gesture
    pub fn action(self) -> PresentationAction {
        match self {
            GestureLabel::PointRight => PresentationAction::NextSlide,
            GestureLabel::PointLeft => PresentationAction::PreviousSlide,
            GestureLabel::Pointer => PresentationAction::ShowPointer,
            GestureLabel::PalmOut => PresentationAction::Erase,
            GestureLabel::Stop => PresentationAction::StopPresentation,
            GestureLabel::OpenHand | GestureLabel::FirstSlide => PresentationAction::FirstSlide,
            GestureLabel::Peace | GestureLabel::LastSlide => PresentationAction::LastSlide,
            GestureLabel::Draw => PresentationAction::Draw,
            GestureLabel::Save => PresentationAction::Save,
            GestureLabel::Highlight => PresentationAction::Highlight,
            GestureLabel::ZoomIn => PresentationAction::ZoomIn,
            GestureLabel::ZoomOut => PresentationAction::ZoomOut,
        }
    }
}

impl FromStr for GestureLabel {
    type Err = GestureError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|label| label.name() == s)
            .ok_or_else(|| GestureError::UnknownGestureName(s.to_string()))
    }
}

impl fmt::Display for GestureLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class_roundtrip() {
        for label in GestureLabel::all() {
            assert_eq!(GestureLabel::from_class(label.class()).unwrap(), *label);
        }
    }

    #[test]
    fn test_unknown_class_is_an_error() {
        assert_eq!(
            GestureLabel::from_class(14),
            Err(GestureError::UnknownGestureClass(14))
        );
        assert!(GestureLabel::from_class(255).is_err());
    }

    #[test]
    fn test_name_roundtrip() {
        for label in GestureLabel::all() {
            assert_eq!(label.name().parse::<GestureLabel>().unwrap(), *label);
        }
        assert!(matches!(
            "wave".parse::<GestureLabel>(),
            Err(GestureError::UnknownGestureName(_))
        ));
    }

    #[test]
    fn test_serde_uses_canonical_names() {
        for label in GestureLabel::all() {
            let json = serde_json::to_string(label).unwrap();
            assert_eq!(json, format!("\"{}\"", label.name()));
        }
    }

    #[test]
    fn test_hagrid_mapping() {
        assert_eq!(GestureLabel::from_hagrid("point").unwrap(), GestureLabel::PointRight);
        assert_eq!(GestureLabel::from_hagrid("palm").unwrap(), GestureLabel::Stop);
        assert_eq!(GestureLabel::from_hagrid("fist").unwrap(), GestureLabel::Save);
        assert_eq!(GestureLabel::from_hagrid("call").unwrap(), GestureLabel::PalmOut);
        assert!(GestureLabel::from_hagrid("like").is_err());
    }

    #[test]
    fn test_single_frame_and_sequence_partition() {
        assert_eq!(GestureLabel::single_frame().len(), 10);
        assert_eq!(GestureLabel::sequence().len(), 4);
        assert!(GestureLabel::single_frame().iter().all(|l| !l.is_sequence()));
        assert!(GestureLabel::sequence().iter().all(|l| l.is_sequence()));
    }
}
