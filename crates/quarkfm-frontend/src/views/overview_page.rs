use gpui::{
    AppContext, Context, Entity, IntoElement, ParentElement, Render, Styled, Window, div,
    prelude::FluentBuilder,
};
use gpui_component::{
    ActiveTheme, Disableable, IconName, StyledExt,
    button::{Button, ButtonVariants},
    group_box::{GroupBox, GroupBoxVariants},
};
use quarkfm_bridge::classification::ScanSummary;

use crate::{
    Services,
    components::{
        settings_item::SettingsItem, status_indicator::StatusIndicator, submit_button::submit_button,
    },
    entities::{
        DataEntities, classification_entity::ClassificationEntity, settings_entity::SettingsEntity,
    },
    forms::AutoSubmitForm,
    views::spawn_submission,
};

/// Number of scanned files listed by name.
const LISTED_FILES: usize = 8;

pub struct OverviewPage {
    services: Services,
    settings: Entity<SettingsEntity>,
    classification: Entity<ClassificationEntity>,
    status_indicator: Entity<StatusIndicator>,
    check_form: AutoSubmitForm,
    start_form: AutoSubmitForm,
}

impl OverviewPage {
    pub fn new(services: &Services, data: &DataEntities, cx: &mut Context<Self>) -> Self {
        cx.observe(&data.settings, |_, _, cx| cx.notify()).detach();
        cx.observe(&data.classification, |_, _, cx| cx.notify())
            .detach();

        Self {
            services: services.clone(),
            settings: data.settings.clone(),
            classification: data.classification.clone(),
            status_indicator: cx.new(|cx| StatusIndicator::new(data, cx)),
            check_form: AutoSubmitForm::get("/api/check", "Check API"),
            start_form: AutoSubmitForm::post("/api/classify/start", "Start classification"),
        }
    }

    fn check_api(&mut self, cx: &mut Context<Self>) {
        let Some(request) = self.check_form.submit(Vec::<(String, String)>::new()) else {
            return;
        };
        cx.notify();

        let bridge = self.services.bridge.clone();
        spawn_submission(
            &self.services,
            cx,
            async move { bridge.submit_form(request).await },
            |this| &mut this.check_form,
            |_, _| {},
        );
    }

    fn start_classification(&mut self, cx: &mut Context<Self>) {
        let Some(request) = self.start_form.submit(Vec::<(String, String)>::new()) else {
            return;
        };
        cx.notify();

        let bridge = self.services.bridge.clone();
        spawn_submission(
            &self.services,
            cx,
            async move { bridge.submit_form(request).await },
            |this| &mut this.start_form,
            |this, cx| {
                let bridge = this.services.bridge.clone();
                cx.spawn(async move |_, _| bridge.watch_classification().await)
                    .detach();
            },
        );
    }

    fn render_summary(summary: &ScanSummary, cx: &Context<Self>) -> impl IntoElement {
        let hidden = summary.files.len().saturating_sub(LISTED_FILES);

        div()
            .flex()
            .flex_col()
            .gap_1()
            .child(format!(
                "{} files in {} batches, {} categories",
                summary.count, summary.batches, summary.categories
            ))
            .children(
                summary
                    .files
                    .iter()
                    .take(LISTED_FILES)
                    .map(|file| div().text_sm().child(file.clone())),
            )
            .when(hidden > 0, |this| {
                this.child(
                    div()
                        .text_sm()
                        .text_color(cx.theme().muted_foreground)
                        .child(format!("and {hidden} more")),
                )
            })
    }
}

impl Render for OverviewPage {
    fn render(&mut self, _: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        let server_url = self.settings.read(cx).client.server_url.clone();
        let classification = self.classification.read(cx);
        let running = classification.is_running();
        let summary = classification.summary.clone();

        div()
            .flex()
            .flex_col()
            .gap_6()
            .child(div().child("Overview").text_2xl().font_bold())
            .child(
                GroupBox::new()
                    .outline()
                    .child(div().child("Server").text_xl().font_bold())
                    .child(
                        SettingsItem::new("Address")
                            .description("Change it on the configuration page")
                            .child(server_url),
                    )
                    .child(
                        div().child(
                            submit_button("check_api", &self.check_form)
                                .icon(IconName::Globe)
                                .on_click(cx.listener(|this, _, _, cx| this.check_api(cx))),
                        ),
                    ),
            )
            .child(
                GroupBox::new()
                    .outline()
                    .child(div().child("Files").text_xl().font_bold())
                    .when_some(summary, |this, summary| {
                        this.child(Self::render_summary(&summary, cx))
                    })
                    .child(
                        div()
                            .flex()
                            .gap_3()
                            .child(
                                Button::new("scan_files")
                                    .outline()
                                    .icon(IconName::Search)
                                    .label("Scan files")
                                    .disabled(running)
                                    .on_click(cx.listener(|this, _, _, cx| {
                                        let bridge = this.services.bridge.clone();
                                        cx.spawn(async move |_, _| bridge.scan_files().await)
                                            .detach();
                                    })),
                            )
                            .child(
                                submit_button("start_classification", &self.start_form)
                                    .disabled(running || self.start_form.is_submitting())
                                    .on_click(cx.listener(|this, _, _, cx| {
                                        this.start_classification(cx)
                                    })),
                            ),
                    )
                    .child(self.status_indicator.clone()),
            )
    }
}
