//! Screen implementations. Each screen is a top-level Component.

pub mod items;

use crate::component::Component;
use crate::screen::ScreenId;

/// One items screen per tab.
pub fn create_screens() -> Vec<(ScreenId, Box<dyn Component>)> {
    ScreenId::ALL
        .iter()
        .map(|&id| {
            let screen: Box<dyn Component> = Box::new(items::ItemsScreen::new(id));
            (id, screen)
        })
        .collect()
}
