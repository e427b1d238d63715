pub mod code_viewer;
pub mod file_drop_zone;
pub mod requirements_form;
pub mod result_tabs;
pub mod sidebar;
pub mod spec_preview;
pub mod status_panel;
