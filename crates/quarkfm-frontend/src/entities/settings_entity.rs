use gpui::{AppContext, Entity};
use quarkfm_bridge::config::{ClientConfig, ServerConfig};

#[derive(Debug, Clone, Default)]
pub struct SettingsEntity {
    pub client: ClientConfig,
    /// Configuration document of the server, once it has been fetched.
    pub server: Option<ServerConfig>,
}

impl SettingsEntity {
    pub fn update_client<C: AppContext>(entity: &Entity<Self>, config: ClientConfig, cx: &mut C) {
        let _ = entity.update(cx, |this, cx| {
            this.client = config;
            cx.notify();
        });
    }

    pub fn update_server<C: AppContext>(entity: &Entity<Self>, config: ServerConfig, cx: &mut C) {
        let _ = entity.update(cx, |this, cx| {
            this.server = Some(config);
            cx.notify();
        });
    }
}
