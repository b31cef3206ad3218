use gpui::{Context, Entity, EventEmitter};

use crate::{
    entities::settings_entity::SettingsEntity,
    routes::{PageUi, Redirect},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigateEvent {
    Page(PageUi),
    /// A server page was handed to the system browser.
    External(String),
}

/// Owns the active page. The window shell listens for [`NavigateEvent`]s and
/// swaps the page view.
pub struct NavigationEntity {
    current: PageUi,
    settings: Entity<SettingsEntity>,
}

impl NavigationEntity {
    pub fn new(settings: Entity<SettingsEntity>) -> Self {
        Self {
            current: PageUi::Overview,
            settings,
        }
    }

    pub fn current(&self) -> PageUi {
        self.current
    }

    pub fn navigate(&mut self, page: PageUi, cx: &mut Context<Self>) {
        self.current = page;
        cx.emit(NavigateEvent::Page(page));
        cx.notify();
    }

    /// Switches to the page `target` names, or opens it relative to the
    /// configured server when the client has no such page.
    pub fn follow_redirect(&mut self, target: &str, cx: &mut Context<Self>) {
        let server_url = self.settings.read(cx).client.server_url.clone();
        match Redirect::resolve(target, &server_url) {
            Redirect::Page(page) => self.navigate(page, cx),
            Redirect::External(url) => {
                log::info!("Opening {url} in the browser");
                cx.open_url(&url);
                cx.emit(NavigateEvent::External(url));
            }
        }
    }
}

impl EventEmitter<NavigateEvent> for NavigationEntity {}
