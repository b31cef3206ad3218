use gpui::Entity;

pub mod classification_entity;
pub mod navigation_entity;
pub mod notification_entity;
pub mod settings_entity;

#[derive(Debug, Clone)]
pub struct DataEntities {
    pub settings: Entity<settings_entity::SettingsEntity>,
    pub classification: Entity<classification_entity::ClassificationEntity>,
}
