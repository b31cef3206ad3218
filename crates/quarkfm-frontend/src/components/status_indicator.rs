use gpui::{Entity, ParentElement, Styled, div, prelude::FluentBuilder, relative};
use gpui_component::ActiveTheme;
use quarkfm_bridge::classification::{ClassificationPhase, ClassificationStatus};

use crate::entities::{DataEntities, classification_entity::ClassificationEntity};

fn describe(status: &ClassificationStatus) -> String {
    match status.status {
        ClassificationPhase::Processing if status.current_file.is_empty() => format!(
            "Batch {} of {} ({}%)",
            status.current_batch, status.total_batches, status.progress
        ),
        ClassificationPhase::Processing => format!(
            "Batch {} of {} ({}%): {}",
            status.current_batch, status.total_batches, status.progress, status.current_file
        ),
        ClassificationPhase::Completed => "Classification finished".to_owned(),
        ClassificationPhase::Error => "Classification failed".to_owned(),
        ClassificationPhase::Idle | ClassificationPhase::Unknown => "Idle".to_owned(),
    }
}

/// Progress bar of the running classification.
pub struct StatusIndicator {
    classification: Entity<ClassificationEntity>,
}

impl StatusIndicator {
    pub fn new(data: &DataEntities, cx: &mut gpui::Context<Self>) -> Self {
        cx.observe(&data.classification, |_, _, cx| cx.notify())
            .detach();
        Self {
            classification: data.classification.clone(),
        }
    }
}

impl gpui::Render for StatusIndicator {
    fn render(
        &mut self,
        _: &mut gpui::Window,
        cx: &mut gpui::Context<Self>,
    ) -> impl gpui::IntoElement {
        let status = self.classification.read(cx).status.clone();
        let theme = cx.theme();

        div()
            .flex()
            .flex_col()
            .gap_2()
            .when_some(status, |this, status| {
                let progress = f32::from(status.progress.min(100)) / 100.;
                this.child(
                    div()
                        .w_full()
                        .h_2()
                        .rounded_full()
                        .bg(theme.muted)
                        .child(div().h_full().rounded_full().bg(theme.primary).w(relative(progress))),
                )
                .child(
                    div()
                        .text_sm()
                        .text_color(theme.muted_foreground)
                        .child(describe(&status)),
                )
            })
    }
}
