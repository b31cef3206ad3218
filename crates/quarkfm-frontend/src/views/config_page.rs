use gpui::{
    AppContext, Context, Entity, IntoElement, ParentElement, Render, SharedString, Styled, Window,
    div,
};
use gpui_component::{
    Disableable, IconName, StyledExt,
    button::{Button, ButtonVariants},
    group_box::{GroupBox, GroupBoxVariants},
    input::{Input, InputState},
};
use quarkfm_bridge::config::{ServerConfig, field};

use crate::{
    Services,
    components::{settings_item::SettingsItem, submit_button::submit_button},
    entities::{DataEntities, settings_entity::SettingsEntity},
    forms::AutoSubmitForm,
    views::spawn_submission,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FolderField {
    Source,
    TargetBase,
}

/// Inputs of the configuration form, one per [`ServerConfig`] value.
struct ConfigInputs {
    api_key: Entity<InputState>,
    base_url: Entity<InputState>,
    model: Entity<InputState>,
    categories: Entity<InputState>,
    category_paths: Entity<InputState>,
    category_descriptions: Entity<InputState>,
    source_folder: Entity<InputState>,
    target_base_folder: Entity<InputState>,
}

impl ConfigInputs {
    fn new(window: &mut Window, cx: &mut Context<ConfigPage>) -> Self {
        let api_key = cx.new(|cx| InputState::new(window, cx).masked(true));
        let mut input = |placeholder: &'static str| {
            cx.new(|cx| InputState::new(window, cx).placeholder(placeholder))
        };

        Self {
            api_key,
            base_url: input("https://api.openai.com/v1"),
            model: input("gpt-4o-mini"),
            categories: input("Invoices, Contracts, Photos"),
            category_paths: input("Invoices:finance/invoices; Photos:media/photos"),
            category_descriptions: input("What each category contains"),
            source_folder: input("Folder with the files to classify"),
            target_base_folder: input("Folder the categories are created in"),
        }
    }

    fn entries(&self) -> [(&'static str, &Entity<InputState>); 8] {
        [
            (field::API_KEY, &self.api_key),
            (field::BASE_URL, &self.base_url),
            (field::MODEL, &self.model),
            (field::CATEGORIES, &self.categories),
            (field::CATEGORY_PATHS, &self.category_paths),
            (field::CATEGORY_DESCRIPTIONS, &self.category_descriptions),
            (field::SOURCE_FOLDER, &self.source_folder),
            (field::TARGET_BASE_FOLDER, &self.target_base_folder),
        ]
    }

    fn fields(&self, cx: &Context<ConfigPage>) -> Vec<(String, String)> {
        self.entries()
            .into_iter()
            .map(|(name, input)| (name.to_owned(), input.read(cx).value().to_string()))
            .collect()
    }

    fn fill(&self, config: &ServerConfig, window: &mut Window, cx: &mut Context<ConfigPage>) {
        let values: [(&Entity<InputState>, String); 8] = [
            (&self.api_key, config.api.api_key.clone()),
            (&self.base_url, config.api.base_url.clone()),
            (&self.model, config.api.model.clone()),
            (&self.categories, config.classification.categories.clone()),
            (&self.category_paths, config.inline_category_paths()),
            (
                &self.category_descriptions,
                config.classification.category_descriptions.clone(),
            ),
            (&self.source_folder, config.paths.source_folder.clone()),
            (
                &self.target_base_folder,
                config.paths.target_base_folder.clone(),
            ),
        ];
        for (input, value) in values {
            input.update(cx, |state, cx| state.set_value(value, window, cx));
        }
    }

    fn folder(&self, folder: FolderField) -> &Entity<InputState> {
        match folder {
            FolderField::Source => &self.source_folder,
            FolderField::TargetBase => &self.target_base_folder,
        }
    }
}

pub struct ConfigPage {
    services: Services,
    settings: Entity<SettingsEntity>,
    server_url: Entity<InputState>,
    inputs: ConfigInputs,
    /// Document the inputs were last filled from.
    filled_from: Option<ServerConfig>,
    browsing: Option<FolderField>,
    save_form: AutoSubmitForm,
}

impl ConfigPage {
    pub fn new(
        services: &Services,
        data: &DataEntities,
        window: &mut Window,
        cx: &mut Context<Self>,
    ) -> Self {
        let server_url = {
            let current = data.settings.read(cx).client.server_url.clone();
            cx.new(|cx| InputState::new(window, cx).default_value(current))
        };

        cx.observe_in(&data.settings, window, |this, settings, window, cx| {
            let server = settings.read(cx).server.clone();
            this.fill_from(server, window, cx);
        })
        .detach();

        let bridge = services.bridge.clone();
        cx.spawn(async move |_, _| bridge.request_server_config().await)
            .detach();

        let mut page = Self {
            services: services.clone(),
            settings: data.settings.clone(),
            server_url,
            inputs: ConfigInputs::new(window, cx),
            filled_from: None,
            browsing: None,
            save_form: AutoSubmitForm::post("/api/config/save", "Save configuration"),
        };
        let cached = page.settings.read(cx).server.clone();
        page.fill_from(cached, window, cx);
        page
    }

    fn fill_from(&mut self, server: Option<ServerConfig>, window: &mut Window, cx: &mut Context<Self>) {
        let Some(server) = server else {
            return;
        };
        if self.filled_from.as_ref() == Some(&server) {
            return;
        }
        self.inputs.fill(&server, window, cx);
        self.filled_from = Some(server);
        cx.notify();
    }

    fn apply_server_url(&mut self, cx: &mut Context<Self>) {
        let server_url = self.server_url.read(cx).value().trim().to_owned();
        let bridge = self.services.bridge.clone();
        cx.spawn(async move |_, _| bridge.change_server_url(server_url).await)
            .detach();
    }

    fn browse(&mut self, folder: FolderField, window: &mut Window, cx: &mut Context<Self>) {
        if self.browsing.is_some() {
            return;
        }
        self.browsing = Some(folder);
        cx.notify();

        let bridge = self.services.bridge.clone();
        cx.spawn_in(window, async move |this, cx| {
            let path = bridge.select_folder().await;
            let _ = this.update_in(cx, |this, window, cx| {
                this.browsing = None;
                if !path.is_empty() {
                    this.inputs
                        .folder(folder)
                        .update(cx, |state, cx| state.set_value(path, window, cx));
                }
                cx.notify();
            });
        })
        .detach();
    }

    /// Saving waits until the inputs hold the server's document.
    fn can_save(&self) -> bool {
        self.filled_from.is_some() && !self.save_form.is_submitting()
    }

    fn save(&mut self, cx: &mut Context<Self>) {
        if self.filled_from.is_none() {
            log::warn!("Configuration not loaded yet, not saving");
            return;
        }
        let fields = self.inputs.fields(cx);
        let Some(request) = self.save_form.submit(fields) else {
            return;
        };
        cx.notify();

        let config = ServerConfig::from_fields(&request.fields);
        let bridge = self.services.bridge.clone();
        spawn_submission(
            &self.services,
            cx,
            async move { bridge.save_server_config(config).await },
            |this| &mut this.save_form,
            |_, _| {},
        );
    }

    fn browse_button(&self, id: &'static str, folder: FolderField, cx: &Context<Self>) -> Button {
        Button::new(id)
            .outline()
            .icon(IconName::FolderOpen)
            .label("Browse")
            .loading(self.browsing == Some(folder))
            .disabled(self.browsing.is_some())
            .on_click(cx.listener(move |this, _, window, cx| this.browse(folder, window, cx)))
    }
}

fn group_title(title: impl Into<SharedString>) -> impl IntoElement {
    div().child(title.into()).text_xl().font_bold()
}

impl Render for ConfigPage {
    fn render(&mut self, _: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        let inputs = &self.inputs;

        div()
            .size_full()
            .flex()
            .flex_col()
            .gap_6()
            .child(div().child("Configuration").text_2xl().font_bold())
            .child(
                GroupBox::new()
                    .outline()
                    .child(group_title("Client"))
                    .child(
                        SettingsItem::new("Server address").child(
                            div()
                                .flex()
                                .gap_2()
                                .child(div().flex_1().child(Input::new(&self.server_url)))
                                .child(
                                    Button::new("apply_server_url")
                                        .outline()
                                        .label("Apply")
                                        .on_click(cx.listener(|this, _, _, cx| {
                                            this.apply_server_url(cx)
                                        })),
                                ),
                        ),
                    ),
            )
            .child(
                GroupBox::new()
                    .outline()
                    .child(group_title("Language model"))
                    .child(SettingsItem::new("API key").child(Input::new(&inputs.api_key)))
                    .child(SettingsItem::new("Base URL").child(Input::new(&inputs.base_url)))
                    .child(SettingsItem::new("Model").child(Input::new(&inputs.model))),
            )
            .child(
                GroupBox::new()
                    .outline()
                    .child(group_title("Categories"))
                    .child(
                        SettingsItem::new("Categories")
                            .description("Separated by commas")
                            .child(Input::new(&inputs.categories)),
                    )
                    .child(
                        SettingsItem::new("Category folders")
                            .description("category:path entries separated by semicolons")
                            .child(Input::new(&inputs.category_paths)),
                    )
                    .child(
                        SettingsItem::new("Descriptions")
                            .child(Input::new(&inputs.category_descriptions)),
                    ),
            )
            .child(
                GroupBox::new()
                    .outline()
                    .child(group_title("Folders"))
                    .child(
                        SettingsItem::new("Source folder").child(
                            div()
                                .flex()
                                .gap_2()
                                .child(div().flex_1().child(Input::new(&inputs.source_folder)))
                                .child(self.browse_button("browse_source", FolderField::Source, cx)),
                        ),
                    )
                    .child(
                        SettingsItem::new("Target folder").child(
                            div()
                                .flex()
                                .gap_2()
                                .child(div().flex_1().child(Input::new(&inputs.target_base_folder)))
                                .child(self.browse_button(
                                    "browse_target",
                                    FolderField::TargetBase,
                                    cx,
                                )),
                        ),
                    ),
            )
            .child(
                div().child(
                    submit_button("save_config", &self.save_form)
                        .disabled(!self.can_save())
                        .on_click(cx.listener(|this, _, _, cx| this.save(cx))),
                ),
            )
    }
}
