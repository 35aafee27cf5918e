//! Visual configuration for popups.
//!
//! A [`MenuStyle`] is read once when a popup is built. Popups keep their
//! own [`StyleHandle`], so swapping the manager's current style never
//! changes a popup that is already on screen.

use dropmenu_core::{Color, TextStyle};
use serde::{Deserialize, Serialize};
use std::rc::Rc;
use std::time::Duration;

/// Shared, immutable style. Compare handles with [`same_style`].
pub type StyleHandle = Rc<MenuStyle>;

/// Whether two handles refer to the very same style instance.
#[must_use]
pub fn same_style(a: &StyleHandle, b: &StyleHandle) -> bool {
    Rc::ptr_eq(a, b)
}

/// Spacing, colors, font and background references for menu popups.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MenuStyle {
    /// Height of action and submenu rows
    pub row_height: f32,
    /// Height of separator rows
    pub separator_height: f32,
    /// Space above the first and below the last row
    pub padding: f32,
    /// Horizontal space before the label (after the icon column)
    pub label_inset: f32,
    /// Width reserved for selection icons
    pub icon_column: f32,
    /// Width reserved for the cascade indicator
    pub cascade_column: f32,
    /// Minimum popup width
    pub min_width: f32,
    /// Average glyph advance used to estimate label widths
    pub char_width: f32,
    /// How far a child popup overlaps its parent horizontally
    pub submenu_overlap: f32,
    /// Pixels scrolled per wheel notch
    pub scroll_step: f32,
    /// Hover time before a submenu opens; `None` opens immediately
    #[serde(with = "settle_millis")]
    pub settle_delay: Option<Duration>,
    /// Label font size
    pub text_size: f32,
    /// Opaque font reference for the presentation layer
    pub font: Option<String>,
    /// Opaque background template reference (nine-slice sprite, etc.)
    pub background_template: Option<String>,
    /// Popup background
    pub background: Color,
    /// Popup border
    pub border: Color,
    /// Label color
    pub text: Color,
    /// Label color of disabled rows
    pub disabled_text: Color,
    /// Highlighted row background
    pub highlight: Color,
    /// Separator line color
    pub separator: Color,
}

impl Default for MenuStyle {
    fn default() -> Self {
        Self::simple()
    }
}

impl MenuStyle {
    /// Flat light style.
    #[must_use]
    pub fn simple() -> Self {
        Self {
            row_height: 24.0,
            separator_height: 9.0,
            padding: 4.0,
            label_inset: 6.0,
            icon_column: 20.0,
            cascade_column: 20.0,
            min_width: 120.0,
            char_width: 7.0,
            submenu_overlap: 2.0,
            scroll_step: 24.0,
            settle_delay: None,
            text_size: 14.0,
            font: None,
            background_template: None,
            background: Color::WHITE,
            border: Color::rgb8(191, 191, 191),
            text: Color::BLACK,
            disabled_text: Color::rgb8(153, 153, 153),
            highlight: Color::rgba8(51, 120, 245, 51),
            separator: Color::rgb8(224, 224, 224),
        }
    }

    /// Raised, textured style with roomier rows and a hover delay.
    #[must_use]
    pub fn skeuo() -> Self {
        Self {
            row_height: 30.0,
            separator_height: 12.0,
            padding: 8.0,
            label_inset: 8.0,
            icon_column: 24.0,
            cascade_column: 24.0,
            min_width: 160.0,
            char_width: 8.0,
            submenu_overlap: 6.0,
            scroll_step: 30.0,
            settle_delay: Some(Duration::from_millis(250)),
            text_size: 16.0,
            font: Some("serif".to_string()),
            background_template: Some("bevel-panel".to_string()),
            background: Color::rgb8(237, 227, 204),
            border: Color::rgb8(115, 89, 64),
            text: Color::rgb8(51, 33, 18),
            disabled_text: Color::rgb8(153, 140, 128),
            highlight: Color::rgba8(140, 89, 38, 89),
            separator: Color::rgb8(166, 140, 115),
        }
    }

    /// Wrap in a shareable handle.
    #[must_use]
    pub fn into_handle(self) -> StyleHandle {
        Rc::new(self)
    }

    /// Set the hover settle delay.
    #[must_use]
    pub const fn with_settle_delay(mut self, delay: Option<Duration>) -> Self {
        self.settle_delay = delay;
        self
    }

    /// Text style for labels.
    #[must_use]
    pub fn label_style(&self, enabled: bool) -> TextStyle {
        TextStyle {
            size: self.text_size,
            color: if enabled { self.text } else { self.disabled_text },
            font: self.font.clone(),
        }
    }

    /// Space taken by rows before and after the label.
    #[must_use]
    pub fn row_chrome_width(&self) -> f32 {
        self.icon_column + self.label_inset * 2.0 + self.cascade_column
    }
}

mod settle_millis {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub(super) fn serialize<S: Serializer>(
        value: &Option<Duration>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(d) => serializer.serialize_some(&(d.as_millis() as u64)),
            None => serializer.serialize_none(),
        }
    }

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Duration>, D::Error> {
        Ok(Option::<u64>::deserialize(deserializer)?
            .filter(|ms| *ms > 0)
            .map(Duration::from_millis))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_differ() {
        assert_ne!(MenuStyle::simple(), MenuStyle::skeuo());
        assert_eq!(MenuStyle::default(), MenuStyle::simple());
        assert!(MenuStyle::simple().settle_delay.is_none());
        assert_eq!(
            MenuStyle::skeuo().settle_delay,
            Some(Duration::from_millis(250))
        );
    }

    #[test]
    fn test_same_style_is_identity_not_equality() {
        let a = MenuStyle::simple().into_handle();
        let b = MenuStyle::simple().into_handle();
        assert_eq!(*a, *b);
        assert!(!same_style(&a, &b));
        assert!(same_style(&a, &Rc::clone(&a)));
    }

    #[test]
    fn test_label_style_uses_disabled_color() {
        let style = MenuStyle::simple();
        assert_eq!(style.label_style(true).color, style.text);
        assert_eq!(style.label_style(false).color, style.disabled_text);
        assert_eq!(style.label_style(true).size, style.text_size);
    }

    #[test]
    fn test_row_chrome_width() {
        let style = MenuStyle::simple();
        assert_eq!(style.row_chrome_width(), 20.0 + 12.0 + 20.0);
    }

    #[test]
    fn test_style_json_roundtrip() {
        let style = MenuStyle::skeuo();
        let json = serde_json::to_string(&style).unwrap();
        assert!(json.contains("\"settle_delay\":250"));
        let back: MenuStyle = serde_json::from_str(&json).unwrap();
        assert_eq!(back, style);
    }

    #[test]
    fn test_presets_survive_yaml_file() {
        for style in [MenuStyle::simple(), MenuStyle::skeuo()] {
            let yaml = serde_yaml_ng::to_string(&style).unwrap();
            let back: MenuStyle = serde_yaml_ng::from_str(&yaml).unwrap();
            assert_eq!(back, style);
        }
    }

    #[test]
    fn test_style_yaml_partial_uses_defaults() {
        let yaml = "row_height: 40.0\nbackground: '#202020'\nsettle_delay: 100\n";
        let style: MenuStyle = serde_yaml_ng::from_str(yaml).unwrap();
        assert_eq!(style.row_height, 40.0);
        assert_eq!(style.background.to_hex(), "#202020");
        assert_eq!(style.settle_delay, Some(Duration::from_millis(100)));
        assert_eq!(style.separator_height, MenuStyle::simple().separator_height);
    }

    #[test]
    fn test_zero_settle_delay_means_immediate() {
        let style: MenuStyle = serde_json::from_str("{\"settle_delay\":0}").unwrap();
        assert!(style.settle_delay.is_none());
    }
}
