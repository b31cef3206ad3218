use std::time::Duration;

use gpui::{
    Animation, AnimationExt, App, ClickEvent, InteractiveElement, IntoElement, ParentElement, Rgba,
    SharedString,
    Styled, Window, div, prelude::FluentBuilder, px, rgb,
};
use gpui_component::{
    ActiveTheme, Icon, IconName, Sizable,
    button::{Button, ButtonVariants},
};
use quarkfm_bridge::notification::NotificationKind;

use crate::notifications::{ActiveNotification, LEAVE_DURATION};

type CloseHandler = Box<dyn Fn(&ClickEvent, &mut Window, &mut App) + 'static>;

pub fn accent(kind: NotificationKind) -> Rgba {
    match kind {
        NotificationKind::Success => rgb(0x10b981),
        NotificationKind::Error => rgb(0xef4444),
        NotificationKind::Info => rgb(0x2563eb),
    }
}

fn icon(kind: NotificationKind) -> IconName {
    match kind {
        NotificationKind::Success => IconName::CircleCheck,
        NotificationKind::Error => IconName::CircleX,
        NotificationKind::Info => IconName::Info,
    }
}

/// A dismissable banner. While leaving it slides out to the right.
#[derive(IntoElement)]
pub struct Toast {
    key: SharedString,
    kind: NotificationKind,
    message: SharedString,
    leaving: bool,
    on_close: Option<CloseHandler>,
}

impl Toast {
    pub fn new(notification: &ActiveNotification) -> Self {
        Self {
            key: format!("toast-{}", notification.id.get()).into(),
            kind: notification.kind,
            message: notification.message.clone().into(),
            leaving: notification.is_leaving(),
            on_close: None,
        }
    }

    pub fn on_close(
        mut self,
        handler: impl Fn(&ClickEvent, &mut Window, &mut App) + 'static,
    ) -> Self {
        self.on_close = Some(Box::new(handler));
        self
    }
}

impl gpui::RenderOnce for Toast {
    fn render(self, _: &mut Window, cx: &mut App) -> impl IntoElement {
        let accent = accent(self.kind);

        let banner = div()
            .id(self.key.clone())
            .relative()
            .flex()
            .items_start()
            .gap_3()
            .p_3()
            .rounded_lg()
            .shadow_lg()
            .border_1()
            .border_l_4()
            .border_color(accent)
            .bg(cx.theme().background)
            .text_color(cx.theme().foreground)
            .child(Icon::new(icon(self.kind)).text_color(accent))
            .child(div().flex_1().text_sm().child(self.message))
            .when_some(self.on_close, |this, on_close| {
                this.child(
                    Button::new("toast-close")
                        .ghost()
                        .xsmall()
                        .icon(IconName::Close)
                        .on_click(on_close),
                )
            });

        if self.leaving {
            banner
                .with_animation(
                    SharedString::from(format!("{}-leave", self.key)),
                    Animation::new(LEAVE_DURATION),
                    |this, delta| this.left(px(400. * delta)).opacity(1. - delta),
                )
                .into_any_element()
        } else {
            banner
                .with_animation(
                    SharedString::from(format!("{}-enter", self.key)),
                    Animation::new(Duration::from_millis(200)),
                    |this, delta| this.left(px(400. * (1. - delta))),
                )
                .into_any_element()
        }
    }
}
