pub mod app;
pub mod image_clipper;
pub mod settings_modal;
