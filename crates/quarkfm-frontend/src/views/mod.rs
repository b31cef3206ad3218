mod config_page;
mod overview_page;
mod results_page;

use std::future::Future;

use gpui::{
    AnyView, AppContext, Context, IntoElement, ParentElement, Render, Styled, Subscription,
    Window, div,
};
use gpui_component::{
    IconName, Side,
    sidebar::{Sidebar, SidebarGroup, SidebarHeader, SidebarMenu, SidebarMenuItem},
};
use quarkfm_bridge::api::FormOutcome;

use crate::{
    Services,
    entities::{DataEntities, navigation_entity::NavigateEvent},
    forms::{AutoSubmitForm, REDIRECT_DELAY, SubmitEffects},
    routes::PageUi,
    views::{config_page::ConfigPage, overview_page::OverviewPage, results_page::ResultsPage},
};

/// Waits for a submission of the form picked by `form`, restores its submit
/// control and reports the outcome. `on_success` runs only when the server
/// accepted the submission. A redirect is followed after [`REDIRECT_DELAY`].
pub(crate) fn spawn_submission<V: 'static>(
    services: &Services,
    cx: &mut Context<V>,
    outcome: impl Future<Output = FormOutcome> + 'static,
    form: fn(&mut V) -> &mut AutoSubmitForm,
    on_success: impl FnOnce(&mut V, &mut Context<V>) + 'static,
) {
    let notifications = services.notifications.clone();
    let navigation = services.navigation.clone();

    cx.spawn(async move |this, cx| {
        let outcome = outcome.await;
        let accepted = matches!(&outcome, Ok(result) if result.success);

        let effects = this
            .update(cx, |view, cx| {
                let effects = form(view).complete(&outcome);
                if accepted {
                    on_success(view, cx);
                }
                cx.notify();
                effects
            })
            .unwrap_or_else(|_| SubmitEffects::from_outcome(&outcome));

        let _ = notifications.update(cx, |this, cx| this.show(effects.notification, cx));

        if let Some(target) = effects.redirect {
            cx.background_executor().timer(REDIRECT_DELAY).await;
            let _ = navigation.update(cx, |this, cx| this.follow_redirect(&target, cx));
        }
    })
    .detach();
}

pub struct FrontendUi {
    services: Services,
    data: DataEntities,
    active_page: PageUi,
    active_page_view: AnyView,
    _subscriptions: Vec<Subscription>,
}

impl FrontendUi {
    pub fn new(
        services: &Services,
        data: &DataEntities,
        window: &mut Window,
        cx: &mut Context<Self>,
    ) -> Self {
        let active_page = services.navigation.read(cx).current();
        let active_page_view = Self::build_page(active_page, services, data, window, cx);
        let subscriptions = vec![cx.subscribe_in(
            &services.navigation,
            window,
            |this, _, event: &NavigateEvent, window, cx| {
                if let NavigateEvent::Page(page) = event {
                    this.change_page(*page, window, cx);
                }
            },
        )];

        Self {
            services: services.clone(),
            data: data.clone(),
            active_page,
            active_page_view,
            _subscriptions: subscriptions,
        }
    }

    fn build_page(
        page: PageUi,
        services: &Services,
        data: &DataEntities,
        window: &mut Window,
        cx: &mut Context<Self>,
    ) -> AnyView {
        match page {
            PageUi::Overview => cx.new(|cx| OverviewPage::new(services, data, cx)).into(),
            PageUi::Config => cx
                .new(|cx| ConfigPage::new(services, data, window, cx))
                .into(),
            PageUi::Results => cx
                .new(|cx| ResultsPage::new(services, data, window, cx))
                .into(),
        }
    }

    pub fn change_page(&mut self, page: PageUi, window: &mut Window, cx: &mut Context<Self>) {
        log::debug!("Switching to the {} page", page.title());
        self.active_page_view = Self::build_page(page, &self.services, &self.data, window, cx);
        self.active_page = page;
        cx.notify();
    }
}

impl Render for FrontendUi {
    fn render(&mut self, _: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        let menu_item = |page: PageUi, icon: IconName| {
            SidebarMenuItem::new(page.title())
                .active(self.active_page == page)
                .icon(icon)
                .on_click(cx.listener(move |this, _, _, cx| {
                    this.services
                        .navigation
                        .update(cx, |navigation, cx| navigation.navigate(page, cx));
                }))
        };

        div()
            .relative()
            .flex()
            .size_full()
            .child(
                Sidebar::new(Side::Left)
                    .header(SidebarHeader::new().child("quarkfm"))
                    .child(
                        SidebarGroup::new("Navigation").child(
                            SidebarMenu::new()
                                .child(menu_item(PageUi::Overview, IconName::LayoutDashboard))
                                .child(menu_item(PageUi::Config, IconName::Settings))
                                .child(menu_item(PageUi::Results, IconName::Inbox)),
                        ),
                    ),
            )
            .child(div().p_5().size_full().child(self.active_page_view.clone()))
            .child(self.services.notifications.clone())
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, rc::Rc};

    use gpui::{Entity, TestAppContext};
    use quarkfm_bridge::{api::ApiResult, notification::NotificationKind};
    use tokio::sync::mpsc;

    use super::*;
    use crate::{
        BackendBridge,
        entities::{
            navigation_entity::NavigationEntity, notification_entity::NotificationEntity,
            settings_entity::SettingsEntity,
        },
        forms::{DEFAULT_SUCCESS_MESSAGE, SUBMITTING_LABEL},
    };

    struct SaveView {
        form: AutoSubmitForm,
        accepted: bool,
    }

    fn services(cx: &mut TestAppContext) -> Services {
        let (to_backend, _) = mpsc::channel(1);
        let settings = cx.new(|_| SettingsEntity::default());
        Services {
            bridge: BackendBridge { to_backend },
            notifications: cx.new(|_| NotificationEntity::default()),
            navigation: cx.new(|_| NavigationEntity::new(settings)),
        }
    }

    fn record_navigation(
        services: &Services,
        cx: &mut TestAppContext,
    ) -> Rc<RefCell<Vec<NavigateEvent>>> {
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = events.clone();
        let navigation = services.navigation.clone();
        cx.update(|cx| {
            cx.subscribe(&navigation, move |_, event: &NavigateEvent, _| {
                sink.borrow_mut().push(event.clone())
            })
            .detach();
        });
        events
    }

    fn save_view(cx: &mut TestAppContext) -> Entity<SaveView> {
        cx.new(|_| SaveView {
            form: AutoSubmitForm::post("/api/config/save", "Save"),
            accepted: false,
        })
    }

    fn submit(
        view: &Entity<SaveView>,
        services: &Services,
        outcome: FormOutcome,
        cx: &mut TestAppContext,
    ) {
        view.update(cx, |this, cx| {
            assert!(this.form.submit([("model", "deepseek-chat")]).is_some());
            assert_eq!(this.form.submit_control().label(), SUBMITTING_LABEL);
            spawn_submission(
                services,
                cx,
                async move { outcome },
                |this| &mut this.form,
                |this, _| this.accepted = true,
            );
        });
    }

    fn redirecting_to(target: &str) -> FormOutcome {
        Ok(ApiResult {
            success: true,
            redirect: Some(target.to_owned()),
            ..Default::default()
        })
    }

    #[gpui::test]
    fn accepted_submission_redirects_after_the_delay(cx: &mut TestAppContext) {
        let services = services(cx);
        let events = record_navigation(&services, cx);
        let view = save_view(cx);

        submit(&view, &services, redirecting_to("/config"), cx);
        cx.run_until_parked();

        view.read_with(cx, |this, _| {
            assert!(this.accepted);
            assert_eq!(this.form.submit_control().label(), "Save");
            assert!(this.form.submit_control().is_enabled());
        });
        services.notifications.read_with(cx, |this, _| {
            let current = this.current().unwrap();
            assert_eq!(current.kind, NotificationKind::Success);
            assert_eq!(current.message, DEFAULT_SUCCESS_MESSAGE);
        });
        assert!(events.borrow().is_empty());

        cx.executor().advance_clock(REDIRECT_DELAY);
        cx.run_until_parked();
        assert_eq!(*events.borrow(), vec![NavigateEvent::Page(PageUi::Config)]);
        assert_eq!(
            services.navigation.read_with(cx, |this, _| this.current()),
            PageUi::Config
        );
    }

    #[gpui::test]
    fn unknown_redirect_opens_the_server_page(cx: &mut TestAppContext) {
        let services = services(cx);
        let events = record_navigation(&services, cx);
        let view = save_view(cx);

        submit(&view, &services, redirecting_to("/done"), cx);
        cx.executor().advance_clock(REDIRECT_DELAY);
        cx.run_until_parked();

        assert_eq!(
            *events.borrow(),
            vec![NavigateEvent::External("http://localhost:5180/done".to_owned())]
        );
        assert_eq!(
            services.navigation.read_with(cx, |this, _| this.current()),
            PageUi::Overview
        );
    }

    #[gpui::test]
    fn network_failure_restores_the_control_without_redirect(cx: &mut TestAppContext) {
        let services = services(cx);
        let events = record_navigation(&services, cx);
        let view = save_view(cx);

        submit(&view, &services, Err("connection refused".to_owned()), cx);
        cx.run_until_parked();
        cx.executor().advance_clock(REDIRECT_DELAY);
        cx.run_until_parked();

        view.read_with(cx, |this, _| {
            assert!(!this.accepted);
            assert_eq!(this.form.submit_control().label(), "Save");
            assert!(this.form.submit_control().is_enabled());
        });
        services.notifications.read_with(cx, |this, _| {
            let current = this.current().unwrap();
            assert_eq!(current.kind, NotificationKind::Error);
            assert_eq!(current.message, "Network error: connection refused");
        });
        assert!(events.borrow().is_empty());
    }
}
