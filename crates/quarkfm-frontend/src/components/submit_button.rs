use gpui::ElementId;
use gpui_component::{
    Disableable,
    button::{Button, ButtonVariants},
};

use crate::forms::AutoSubmitForm;

/// Submit control of `form`, reflecting whether a submission is in flight.
/// The caller attaches the click handler.
pub fn submit_button(id: impl Into<ElementId>, form: &AutoSubmitForm) -> Button {
    let control = form.submit_control();
    Button::new(id)
        .primary()
        .label(control.label().to_owned())
        .loading(!control.is_enabled())
        .disabled(!control.is_enabled())
}
