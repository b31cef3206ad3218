use gpui::{
    AppContext, Context, Entity, IntoElement, ParentElement, Render, SharedString, Styled,
    Subscription, Window, div, prelude::FluentBuilder,
};
use gpui_component::{
    ActiveTheme, IndexPath, StyledExt,
    group_box::{GroupBox, GroupBoxVariants},
    select::{Select, SelectEvent, SelectItem, SelectState},
};
use quarkfm_bridge::classification::ClassificationResults;

use crate::{
    Services,
    components::submit_button::submit_button,
    entities::{DataEntities, classification_entity::ClassificationEntity},
    forms::{AutoSubmitForm, SelectStyle},
    views::spawn_submission,
};

#[derive(Debug, Clone)]
struct CategoryOption {
    label: SharedString,
    index: usize,
}

impl SelectItem for CategoryOption {
    type Value = usize;

    fn title(&self) -> SharedString {
        self.label.clone()
    }

    fn value(&self) -> &Self::Value {
        &self.index
    }
}

struct FileRow {
    file_id: u32,
    filename: SharedString,
    category: Entity<SelectState<Vec<CategoryOption>>>,
    style: SelectStyle,
    _subscription: Subscription,
}

/// Which form of the page a submission belongs to.
#[derive(Debug, Clone, Copy)]
enum ResultsAction {
    Execute,
    Cleanup,
    Rollback,
}

impl ResultsAction {
    fn form(self) -> fn(&mut ResultsPage) -> &mut AutoSubmitForm {
        match self {
            ResultsAction::Execute => |page| &mut page.execute_form,
            ResultsAction::Cleanup => |page| &mut page.cleanup_form,
            ResultsAction::Rollback => |page| &mut page.rollback_form,
        }
    }
}

pub struct ResultsPage {
    services: Services,
    classification: Entity<ClassificationEntity>,
    rows: Vec<FileRow>,
    /// File ids and categories the rows were built from.
    layout: Option<(Vec<u32>, Vec<String>)>,
    execute_form: AutoSubmitForm,
    cleanup_form: AutoSubmitForm,
    rollback_form: AutoSubmitForm,
}

impl ResultsPage {
    pub fn new(
        services: &Services,
        data: &DataEntities,
        window: &mut Window,
        cx: &mut Context<Self>,
    ) -> Self {
        cx.observe_in(&data.classification, window, |this, _, window, cx| {
            this.sync_rows(window, cx);
        })
        .detach();

        let bridge = services.bridge.clone();
        cx.spawn(async move |_, _| bridge.request_results().await)
            .detach();

        let mut page = Self {
            services: services.clone(),
            classification: data.classification.clone(),
            rows: Vec::new(),
            layout: None,
            execute_form: AutoSubmitForm::post("/api/classify/execute", "Execute"),
            cleanup_form: AutoSubmitForm::post("/api/classify/cleanup", "Clean up sources"),
            rollback_form: AutoSubmitForm::post("/api/classify/rollback", "Roll back"),
        };
        page.sync_rows(window, cx);
        page
    }

    /// Rebuilds the rows when other files or categories arrived. Local
    /// adjustments keep the rows, and with them their styles.
    fn sync_rows(&mut self, window: &mut Window, cx: &mut Context<Self>) {
        let Some(results) = self.classification.read(cx).results.clone() else {
            return;
        };
        let layout = (
            results.results.iter().map(|file| file.id).collect::<Vec<_>>(),
            results.categories.clone(),
        );
        if self.layout.as_ref() == Some(&layout) {
            return;
        }

        self.rows = Self::build_rows(&results, window, cx);
        self.layout = Some(layout);
        cx.notify();
    }

    fn build_rows(
        results: &ClassificationResults,
        window: &mut Window,
        cx: &mut Context<Self>,
    ) -> Vec<FileRow> {
        let options: Vec<CategoryOption> = results
            .categories
            .iter()
            .enumerate()
            .map(|(index, label)| CategoryOption {
                label: label.clone().into(),
                index,
            })
            .collect();

        results
            .results
            .iter()
            .map(|file| {
                let selected = (file.category_index < options.len())
                    .then(|| IndexPath::new(file.category_index));
                let category =
                    cx.new(|cx| SelectState::new(options.clone(), selected, window, cx));

                let file_id = file.id;
                let subscription = cx.subscribe_in(
                    &category,
                    window,
                    move |this, _, event: &SelectEvent<Vec<CategoryOption>>, _, cx| match event {
                        SelectEvent::Confirm(Some(category_index)) => {
                            this.change_category(file_id, *category_index, cx)
                        }
                        SelectEvent::Confirm(None) => {}
                    },
                );

                FileRow {
                    file_id,
                    filename: file.filename.clone().into(),
                    category,
                    style: SelectStyle::default(),
                    _subscription: subscription,
                }
            })
            .collect()
    }

    fn change_category(&mut self, file_id: u32, category_index: usize, cx: &mut Context<Self>) {
        if let Some(row) = self.rows.iter_mut().find(|row| row.file_id == file_id) {
            row.style.on_change();
        }
        let adjusted = self
            .classification
            .update(cx, |this, cx| this.adjust(file_id, category_index, cx));
        if !adjusted {
            log::warn!("Ignoring category {category_index} for unknown file {file_id}");
            return;
        }
        cx.notify();

        let bridge = self.services.bridge.clone();
        cx.spawn(async move |_, _| bridge.adjust_classification(file_id, category_index).await)
            .detach();
    }

    fn submit(&mut self, action: ResultsAction, cx: &mut Context<Self>) {
        let form = action.form();
        let Some(request) = form(self).submit(Vec::<(String, String)>::new()) else {
            return;
        };
        cx.notify();

        let bridge = self.services.bridge.clone();
        spawn_submission(
            &self.services,
            cx,
            async move { bridge.submit_form(request).await },
            form,
            |this, cx| {
                let bridge = this.services.bridge.clone();
                cx.spawn(async move |_, _| bridge.request_results().await)
                    .detach();
            },
        );
    }

    fn render_row(row: &FileRow, cx: &Context<Self>) -> impl IntoElement {
        div()
            .w_full()
            .flex()
            .items_center()
            .justify_between()
            .gap_4()
            .child(div().flex_1().child(row.filename.clone()))
            .child(
                div()
                    .w_64()
                    .rounded_md()
                    .when(row.style == SelectStyle::Highlighted, |this| {
                        this.border_1().border_color(cx.theme().primary)
                    })
                    .child(Select::new(&row.category).placeholder("Choose a category...")),
            )
    }
}

impl Render for ResultsPage {
    fn render(&mut self, _: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        let total_files = self
            .classification
            .read(cx)
            .results
            .as_ref()
            .map(|results| results.total_files);

        div()
            .size_full()
            .flex()
            .flex_col()
            .gap_6()
            .child(div().child("Results").text_2xl().font_bold())
            .child(match total_files {
                Some(total) => div().child(format!("{total} files classified")),
                None => div()
                    .text_color(cx.theme().muted_foreground)
                    .child("No classification results yet"),
            })
            .when(!self.rows.is_empty(), |this| {
                this.child(
                    GroupBox::new()
                        .outline()
                        .children(self.rows.iter().map(|row| Self::render_row(row, cx))),
                )
            })
            .child(
                div()
                    .flex()
                    .gap_3()
                    .child(
                        submit_button("execute", &self.execute_form).on_click(cx.listener(
                            |this, _, _, cx| this.submit(ResultsAction::Execute, cx),
                        )),
                    )
                    .child(
                        submit_button("cleanup", &self.cleanup_form).on_click(cx.listener(
                            |this, _, _, cx| this.submit(ResultsAction::Cleanup, cx),
                        )),
                    )
                    .child(
                        submit_button("rollback", &self.rollback_form).on_click(cx.listener(
                            |this, _, _, cx| this.submit(ResultsAction::Rollback, cx),
                        )),
                    ),
            )
    }
}
