//! The demo scenes, one trigger button each.

use clap::ValueEnum;
use dropmenu::{ActionOptions, Callback, IconRef, MenuStyle, MenuTree, Rect, Result, StackBuilder};
use std::cell::RefCell;
use std::rc::Rc;

/// Demo scene selectable on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Scene {
    /// One action
    Simple,
    /// Two actions around a separator
    Separated,
    /// One level of cascading submenu
    Submenu,
    /// Two levels of cascading submenus
    Deeper,
    /// A hundred actions in a scrolling popup
    Tall,
    /// Actions, separator and a generated submenu
    Readme,
    /// Style picker that changes the style of later menus
    Style,
}

impl Scene {
    /// Every scene, in button order.
    pub const ALL: [Self; 7] = [
        Self::Simple,
        Self::Separated,
        Self::Submenu,
        Self::Deeper,
        Self::Tall,
        Self::Readme,
        Self::Style,
    ];

    /// Button caption.
    pub const fn caption(self) -> &'static str {
        match self {
            Self::Simple => "Simple Sample",
            Self::Separated => "Separated Sample",
            Self::Submenu => "SubMenu Sample",
            Self::Deeper => "Deeper SubMenu",
            Self::Tall => "Tall Scrollable",
            Self::Readme => "README Sample",
            Self::Style => "Style Pulldown",
        }
    }

    /// Rectangle of the scene's trigger button; buttons form a column.
    pub fn anchor(self) -> Rect {
        let index = Self::ALL.iter().position(|s| *s == self).unwrap_or(0);
        Rect::new(24.0, 24.0 + 44.0 * index as f32, 180.0, 32.0)
    }
}

/// Named style preset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Preset {
    /// Flat light style
    Simple,
    /// Raised, textured style
    Skeuo,
}

impl Preset {
    /// The style this preset names.
    pub fn style(self) -> MenuStyle {
        match self {
            Self::Simple => MenuStyle::simple(),
            Self::Skeuo => MenuStyle::skeuo(),
        }
    }

    /// Caption shown next to the style pulldown.
    pub const fn caption(self) -> &'static str {
        match self {
            Self::Simple => "Style: Simple",
            Self::Skeuo => "Style: Skeuo",
        }
    }
}

/// What callbacks report back to the runner.
#[derive(Debug, Default)]
pub struct SceneLog {
    /// Lines printed by callbacks, in order
    pub lines: Vec<String>,
    /// Style picked in the style pulldown, applied after the event
    pub requested_style: Option<Preset>,
}

/// Shared handle callbacks write through.
pub type SharedLog = Rc<RefCell<SceneLog>>;

fn say(log: &SharedLog, line: impl Into<String>) -> impl Fn() + 'static {
    let log = Rc::clone(log);
    let line = line.into();
    move || log.borrow_mut().lines.push(line.clone())
}

/// Build the menu for `scene`. `current` is the style in effect, used by
/// the style pulldown to mark its selected row.
pub fn build(scene: Scene, log: &SharedLog, current: Preset) -> Result<MenuTree> {
    let mut menu = StackBuilder::new(scene.caption());
    match scene {
        Scene::Simple => {
            menu.add_action("Function Action", say(log, "Ran function action"))?;
        }
        Scene::Separated => {
            menu.add_action("Option 1", say(log, "Lambda for Option 1"))?;
            menu.add_separator()?;
            menu.add_action("Below Separator", say(log, "Lambda for Below Separator"))?;
        }
        Scene::Submenu => {
            menu.add_action("Option 1", say(log, "Lambda for Option 1"))?;
            menu.add_action("Option 2", say(log, "Lambda for Option 2"))?;
            menu.submenu("Pushed Sub Menu", |m| {
                for i in 3..=5 {
                    m.add_action(format!("Option {i}"), say(log, "Ran function action"))?;
                }
                Ok(())
            })?;
            menu.add_action("Option 6", || {})?;
        }
        Scene::Deeper => {
            menu.push_menu("Pushed Sub Menu (1)")?;
            menu.add_action("Option 1", || {})?;
            menu.push_menu("Pushed Sub Menu (2)")?;
            menu.add_action("Option 2", || {})?;
            menu.add_action("Option 3", || {})?;
            menu.pop_menu()?;
            menu.add_action("Option 4", || {})?;
            menu.pop_menu()?;
        }
        Scene::Tall => {
            for i in 0..100 {
                menu.add_action(format!("Option {i}"), || {})?;
            }
        }
        Scene::Readme => {
            menu.add_action("Option 1", say(log, "Called Option 1"))?;
            menu.add_action("Option 2", say(log, "Called OnMenu_Option2"))?;
            menu.add_separator()?;
            menu.push_menu("Submenu")?;
            for i in 0..10 {
                menu.add_action(format!("SubSubOpt {i}"), say(log, i.to_string()))?;
            }
            menu.pop_menu()?;
        }
        Scene::Style => {
            let dot = IconRef::new("green-dot");
            for (label, preset) in [("Simple", Preset::Simple), ("Skeuo", Preset::Skeuo)] {
                let chosen = preset == current;
                let options = ActionOptions::default()
                    .selected(chosen)
                    .icon(chosen.then(|| dot.clone()));
                let log = Rc::clone(log);
                let pick: Callback = Rc::new(move || log.borrow_mut().requested_style = Some(preset));
                menu.add_action_with(label, Some(pick), options)?;
            }
        }
    }
    Ok(menu.root())
}
