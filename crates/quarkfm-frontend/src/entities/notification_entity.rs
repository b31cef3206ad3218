use gpui::{Context, IntoElement, ParentElement, Render, Styled, Task, Window, div, prelude::FluentBuilder, px};
use quarkfm_bridge::notification::NotificationMessage;

use crate::{
    components::toast::Toast,
    notifications::{ActiveNotification, NotificationCenter, NotificationId},
};

/// The toast slot of the window. Wraps a [`NotificationCenter`] and keeps a
/// timer running for its next deadline.
#[derive(Default)]
pub struct NotificationEntity {
    center: NotificationCenter,
    timer: Option<Task<()>>,
}

impl NotificationEntity {
    pub fn show(&mut self, notification: NotificationMessage, cx: &mut Context<Self>) {
        log::debug!("Showing {:?} notification: {}", notification.kind, notification.message);
        let now = cx.background_executor().now();
        self.center.show(notification, now);
        self.schedule(cx);
        cx.notify();
    }

    pub fn dismiss(&mut self, id: NotificationId, cx: &mut Context<Self>) {
        let now = cx.background_executor().now();
        if self.center.dismiss(id, now) {
            self.schedule(cx);
            cx.notify();
        }
    }

    pub fn current(&self) -> Option<&ActiveNotification> {
        self.center.current()
    }

    // Replacing the task drops the previous timer.
    fn schedule(&mut self, cx: &mut Context<Self>) {
        let Some(deadline) = self.center.next_deadline() else {
            self.timer = None;
            return;
        };
        let delay = deadline.saturating_duration_since(cx.background_executor().now());
        self.timer = Some(cx.spawn(async move |this, cx| {
            cx.background_executor().timer(delay).await;
            let _ = this.update(cx, |this, cx| {
                let now = cx.background_executor().now();
                if this.center.tick(now) {
                    cx.notify();
                }
                this.schedule(cx);
            });
        }));
    }
}

impl Render for NotificationEntity {
    fn render(&mut self, _: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        let current = self.center.current().cloned();

        div()
            .absolute()
            .top_4()
            .right_4()
            .w(px(360.))
            .when_some(current, |this, notification| {
                let id = notification.id;
                this.child(Toast::new(&notification).on_close(cx.listener(
                    move |this, _, _, cx| this.dismiss(id, cx),
                )))
            })
    }
}

#[cfg(test)]
mod tests {
    use gpui::{AppContext, TestAppContext};
    use quarkfm_bridge::notification::NotificationKind;

    use super::*;
    use crate::notifications::{AUTO_DISMISS_AFTER, LEAVE_DURATION};

    #[gpui::test]
    fn toast_dismisses_itself(cx: &mut TestAppContext) {
        let toasts = cx.new(|_| NotificationEntity::default());
        toasts.update(cx, |this, cx| this.show(NotificationMessage::success("Saved"), cx));
        cx.run_until_parked();
        toasts.read_with(cx, |this, _| {
            let current = this.current().unwrap();
            assert_eq!(current.kind, NotificationKind::Success);
            assert!(!current.is_leaving());
        });

        cx.executor().advance_clock(AUTO_DISMISS_AFTER);
        cx.run_until_parked();
        toasts.read_with(cx, |this, _| assert!(this.current().unwrap().is_leaving()));

        cx.executor().advance_clock(LEAVE_DURATION);
        cx.run_until_parked();
        toasts.read_with(cx, |this, _| assert!(this.current().is_none()));
    }

    #[gpui::test]
    fn newer_toast_restarts_the_timer(cx: &mut TestAppContext) {
        let toasts = cx.new(|_| NotificationEntity::default());
        toasts.update(cx, |this, cx| this.show(NotificationMessage::info("first"), cx));
        cx.executor().advance_clock(AUTO_DISMISS_AFTER / 2);
        cx.run_until_parked();

        toasts.update(cx, |this, cx| this.show(NotificationMessage::error("second"), cx));
        cx.executor().advance_clock(AUTO_DISMISS_AFTER / 2 + LEAVE_DURATION);
        cx.run_until_parked();
        toasts.read_with(cx, |this, _| {
            let current = this.current().unwrap();
            assert_eq!(current.message, "second");
            assert!(!current.is_leaving());
        });
    }

    #[gpui::test]
    fn closing_skips_the_visible_period(cx: &mut TestAppContext) {
        let toasts = cx.new(|_| NotificationEntity::default());
        toasts.update(cx, |this, cx| this.show(NotificationMessage::error("boom"), cx));
        let id = toasts.read_with(cx, |this, _| this.current().unwrap().id);

        toasts.update(cx, |this, cx| this.dismiss(id, cx));
        cx.executor().advance_clock(LEAVE_DURATION);
        cx.run_until_parked();
        toasts.read_with(cx, |this, _| assert!(this.current().is_none()));
    }
}
