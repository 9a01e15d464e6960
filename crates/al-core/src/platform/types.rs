/// Settings panes the host can be asked to open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsPanel {
    Main,
    LocationServices,
    SoftwareUpdate,
}
